/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! scene footprint geometry: corner coordinates of a scene and the relative position of a point within it

use std::fmt;
use geo::{coord, Intersects, Rect};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{GeoPoint, SceneRecord, errors::{parse_error, Result}};

lazy_static! {
    // [deg, min, sec, hemisphere] - e.g. 70°55'00.00"N or -49° 0' 3.24"
    static ref DMS_RE: Regex = Regex::new(
        r#"^(-)?\s*(\d+(?:\.\d+)?)\s*°\s*(?:(\d+(?:\.\d+)?)\s*['′]\s*)?(?:(\d+(?:\.\d+)?)\s*(?:"|″|'')\s*)?([NSEWnsew])?$"#
    ).unwrap();
}

// record keys for corner coordinates, in order of preference
const UL_LAT_KEYS: [&str;2] = ["cornerUpperLeftLatDMS", "cornerUpperLeftLatitude"];
const UL_LNG_KEYS: [&str;2] = ["cornerUpperLeftLongDMS", "cornerUpperLeftLongitude"];
const LR_LAT_KEYS: [&str;2] = ["cornerLowerRightLatDMS", "cornerLowerRightLatitude"];
const LR_LNG_KEYS: [&str;2] = ["cornerLowerRightLongDMS", "cornerLowerRightLongitude"];

/// bounding rectangle of a satellite scene in decimal degrees.
/// For well formed grid cells `upper_left_lat > lower_right_lat` and `lower_right_lng > upper_left_lng`, which is
/// assumed but not checked
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct SceneCorners {
    pub upper_left_lat: f64,
    pub upper_left_lng: f64,
    pub lower_right_lat: f64,
    pub lower_right_lng: f64,
}

impl SceneCorners {
    pub fn new (upper_left_lat: f64, upper_left_lng: f64, lower_right_lat: f64, lower_right_lng: f64)->Self {
        SceneCorners { upper_left_lat, upper_left_lng, lower_right_lat, lower_right_lng }
    }

    /// get corners from the DMS fields of a record, falling back to decimal corner fields
    pub fn from_record (rec: &SceneRecord)->Result<Self> {
        Ok( SceneCorners {
            upper_left_lat: corner_value( rec, &UL_LAT_KEYS)?,
            upper_left_lng: corner_value( rec, &UL_LNG_KEYS)?,
            lower_right_lat: corner_value( rec, &LR_LAT_KEYS)?,
            lower_right_lng: corner_value( rec, &LR_LNG_KEYS)?,
        })
    }

    pub fn center (&self)->GeoPoint {
        GeoPoint::from_lat_lng( (self.upper_left_lat + self.lower_right_lat) / 2.0, (self.upper_left_lng + self.lower_right_lng) / 2.0)
    }

    pub fn to_rect (&self)->Rect {
        Rect::new(
            coord! { x: self.upper_left_lng, y: self.upper_left_lat },
            coord! { x: self.lower_right_lng, y: self.lower_right_lat }
        )
    }

    /// boundary inclusive
    pub fn contains (&self, p: &GeoPoint)->bool {
        self.to_rect().intersects( p.point())
    }

    pub fn is_degenerate (&self)->bool {
        self.upper_left_lat == self.lower_right_lat || self.upper_left_lng == self.lower_right_lng
    }
}

fn corner_value (rec: &SceneRecord, keys: &[&str])->Result<f64> {
    keys.iter()
        .find_map( |k| rec.metadata.get(*k).and_then( parse_degrees))
        .ok_or_else( || parse_error!("no valid {} in scene {}/{}", keys[0], rec.wrs_path, rec.wrs_row))
}

/// marker position within a scene image as percentages from the top and left edges.
/// Values are not clamped - points outside of the scene are outside of [0,100]
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct PinPosition {
    pub top: f64,
    pub left: f64,
}

impl PinPosition {
    /// degenerate corners produce non-finite values, which should not be rendered
    pub fn is_renderable (&self)->bool {
        self.top.is_finite() && self.left.is_finite()
    }

    pub fn is_inside (&self)->bool {
        let r = 0.0..=100.0;
        r.contains( &self.top) && r.contains( &self.left)
    }
}

impl fmt::Display for PinPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "top: {}%; left: {}%", self.top, self.left)
    }
}

/// linear interpolation of the point position within the corner rectangle
pub fn compute_pin_position (corners: &SceneCorners, point: &GeoPoint)->PinPosition {
    let lat_fraction = (corners.upper_left_lat - point.lat()) / (corners.upper_left_lat - corners.lower_right_lat);
    let lng_fraction = (point.lng() - corners.upper_left_lng) / (corners.lower_right_lng - corners.upper_left_lng);

    PinPosition { top: lat_fraction * 100.0, left: lng_fraction * 100.0 }
}

/// parse degrees given as decimal number or as degree/minute/second string with optional hemisphere
/// (S and W are negative)
pub fn parse_dms (s: &str)->Option<f64> {
    let s = s.trim();
    if let Ok(deg) = s.parse::<f64>() { return Some(deg) }

    let caps = DMS_RE.captures( s)?;
    let deg: f64 = caps.get(2)?.as_str().parse().ok()?;
    let min: f64 = caps.get(3).map_or( Some(0.0), |m| m.as_str().parse().ok())?;
    let sec: f64 = caps.get(4).map_or( Some(0.0), |m| m.as_str().parse().ok())?;
    if min >= 60.0 || sec >= 60.0 { return None }

    let mut v = deg + min / 60.0 + sec / 3600.0;
    if caps.get(1).is_some() { v = -v }
    if let Some(h) = caps.get(5) {
        match h.as_str() {
            "S" | "s" | "W" | "w" => v = -v.abs(),
            _ => {}
        }
    }
    Some(v)
}

/// degrees of a JSON record value (number, decimal string or DMS string)
pub fn parse_degrees (v: &Value)->Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_dms( s),
        _ => None
    }
}
