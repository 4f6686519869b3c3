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

//! odin_landsat - locate the 3x3 grid of Landsat scenes around a user selected point, compute where that point
//! falls within the center scene, notify before the next overpass and export the acquisition records as CSV

use std::{collections::BTreeMap, fmt};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use geo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub mod errors;
use errors::{parse_error, OdinLandsatError, Result};

pub mod macros;
pub mod config;
pub mod footprint;
pub mod notifier;
pub mod results;
pub mod attributes;
pub mod search;

/* #region GeoPoint ***********************************************************************************************/

/// a wrapper for geo::Point (x = longitude, y = latitude) in geodetic degrees.
/// Ranges are not normalized or enforced - this is the raw user input
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GeoPoint(Point);

impl GeoPoint {
    pub fn from_lat_lng (lat: f64, lng: f64)->Self { GeoPoint( Point::new( lng, lat)) }

    pub fn lat (&self)->f64 { self.0.y() }
    pub fn lng (&self)->f64 { self.0.x() }

    pub fn point (&self)->&Point { &self.0 }

    /// true if both coordinates are within their geodetic ranges
    pub fn is_valid (&self)->bool {
        (-90.0..=90.0).contains( &self.lat()) && (-180.0..=180.0).contains( &self.lng())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat(), self.lng())
    }
}

#[derive(Serialize,Deserialize)]
struct LatLng {
    #[serde(alias="latitude", alias="y")]
    lat: f64,
    #[serde(alias="lon", alias="longitude", alias="x")]
    lng: f64
}

impl Serialize for GeoPoint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        LatLng { lat: self.lat(), lng: self.lng() }.serialize( serializer)
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let ll = LatLng::deserialize( deserializer)?;
        Ok( GeoPoint::from_lat_lng( ll.lat, ll.lng))
    }
}

/// parse manually entered latitude/longitude strings. Both have to be provided
pub fn parse_location (lat: &str, lng: &str)->Result<GeoPoint> {
    let lat = lat.trim();
    let lng = lng.trim();
    if lat.is_empty() || lng.is_empty() {
        return Err( OdinLandsatError::MissingInput("Please enter both latitude and longitude.".to_string()))
    }

    let lat: f64 = lat.parse().map_err( |_| parse_error!("invalid latitude '{}'", lat))?;
    let lng: f64 = lng.parse().map_err( |_| parse_error!("invalid longitude '{}'", lng))?;
    Ok( GeoPoint::from_lat_lng( lat, lng))
}

/* #endregion GeoPoint */

/* #region SceneRecord ********************************************************************************************/

/// a dataset record as returned by the dataset search service.
/// Only the fields we directly operate on are typed, all other (metadata) fields are kept verbatim
/// so that they can be passed through to table views and CSV exports
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase", try_from="SceneRecordData")]
pub struct SceneRecord {
    // WRS ids as received (e.g. "012"), for table and CSV cells
    #[serde(rename="wrsPath")]
    wrs_path_value: Value,
    #[serde(rename="wrsRow")]
    wrs_row_value: Value,

    #[serde(skip_serializing)]
    pub wrs_path: u32,
    #[serde(skip_serializing)]
    pub wrs_row: u32,

    pub acquisition_start_time: String, // ISO 8601

    #[serde(skip_serializing_if="Option::is_none")]
    pub acquisition_stop_time: Option<String>,

    pub acquisition_day: String, // YYYY-MM-DD

    pub land_cloud_cover: Value, // services report this as string or number

    #[serde(skip_serializing_if="Option::is_none")]
    pub image_url: Option<String>,

    #[serde(flatten)]
    pub metadata: BTreeMap<String,Value>,
}

/// the wire format of SceneRecord. WRS ids can be numbers or numeric strings
#[derive(Deserialize)]
#[serde(rename_all="camelCase")]
struct SceneRecordData {
    wrs_path: Value,
    wrs_row: Value,
    acquisition_start_time: String,
    #[serde(default)]
    acquisition_stop_time: Option<String>,
    acquisition_day: String,
    #[serde(default)]
    land_cloud_cover: Value,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(flatten)]
    metadata: BTreeMap<String,Value>,
}

impl TryFrom<SceneRecordData> for SceneRecord {
    type Error = OdinLandsatError;

    fn try_from (data: SceneRecordData)->Result<Self> {
        Ok( SceneRecord {
            wrs_path: wrs_id( &data.wrs_path)?,
            wrs_row: wrs_id( &data.wrs_row)?,
            acquisition_start_time: data.acquisition_start_time,
            acquisition_stop_time: data.acquisition_stop_time,
            acquisition_day: data.acquisition_day,
            land_cloud_cover: data.land_cloud_cover,
            image_url: data.image_url,
            metadata: data.metadata,
            wrs_path_value: data.wrs_path,
            wrs_row_value: data.wrs_row,
        })
    }
}

fn wrs_id (v: &Value)->Result<u32> {
    let id = match v {
        Value::Number(n) => n.as_u64().and_then( |id| u32::try_from(id).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None
    };
    id.ok_or_else( || parse_error!("invalid WRS id {}", v))
}

impl SceneRecord {
    pub fn acquisition_start (&self)->Result<DateTime<Utc>> {
        parse_datetime( &self.acquisition_start_time)
            .ok_or_else( || parse_error!("invalid acquisitionStartTime '{}' for scene {}/{}", self.acquisition_start_time, self.wrs_path, self.wrs_row))
    }

    pub fn acquisition_date (&self)->Option<NaiveDate> {
        parse_day( &self.acquisition_day)
    }

    /// land cloud cover in percent, if it can be parsed
    pub fn cloud_cover (&self)->Option<f64> {
        value_as_f64( &self.land_cloud_cover)
    }

    /// generic field lookup by (camelCase) record key
    pub fn field (&self, key: &str)->Option<Value> {
        match key {
            "wrsPath" => Some( self.wrs_path_value.clone()),
            "wrsRow" => Some( self.wrs_row_value.clone()),
            "acquisitionStartTime" => Some( Value::from( self.acquisition_start_time.as_str())),
            "acquisitionStopTime" => self.acquisition_stop_time.as_deref().map( Value::from),
            "acquisitionDay" => Some( Value::from( self.acquisition_day.as_str())),
            "landCloudCover" => if self.land_cloud_cover.is_null() { None } else { Some( self.land_cloud_cover.clone()) },
            "imageUrl" => self.image_url.as_deref().map( Value::from),
            _ => self.metadata.get( key).cloned()
        }
    }

    /// text representation of a field as it appears in tables and CSV cells (empty if missing)
    pub fn field_text (&self, key: &str)->String {
        self.field( key).map( |v| value_text(&v)).unwrap_or_default()
    }
}

/// cell text of JSON values: strings without quotes, null as empty, compound values as compact JSON
pub fn value_text (v: &Value)->String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string()
    }
}

/// numeric value of numbers or numeric strings (an optional trailing '%' is ignored)
pub fn value_as_f64 (v: &Value)->Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok(),
        _ => None
    }
}

/* #endregion SceneRecord */

/* #region SceneGrid **********************************************************************************************/

pub const GRID_DIM: usize = 3;
pub const GRID_SIZE: usize = GRID_DIM * GRID_DIM;
pub const CENTER_INDEX: usize = GRID_SIZE / 2;

/// the 3x3 neighborhood of scenes around a location in row-major order. The center scene is the one closest
/// to the location
#[derive(Debug,Clone)]
pub struct SceneGrid {
    records: Vec<SceneRecord>
}

impl SceneGrid {
    pub fn center (&self)->&SceneRecord { &self.records[CENTER_INDEX] }

    pub fn records (&self)->&[SceneRecord] { &self.records }

    /// (row,col,scene) tuples in row-major order
    pub fn cells (&self)->impl Iterator<Item=(usize,usize,&SceneRecord)> {
        self.records.iter().enumerate().map( |(i,r)| (i / GRID_DIM, i % GRID_DIM, r))
    }

    pub fn summary (&self)->String {
        let c = self.center();
        format!("Found datasets, closest Path: {}, Row: {}", c.wrs_path, c.wrs_row)
    }
}

impl TryFrom<Vec<SceneRecord>> for SceneGrid {
    type Error = OdinLandsatError;

    fn try_from (records: Vec<SceneRecord>)->Result<Self> {
        if records.len() == GRID_SIZE {
            Ok( SceneGrid { records })
        } else {
            Err( OdinLandsatError::NotEnoughDatasets( records.len()))
        }
    }
}

/// the center scenes of all successful searches, in order of retrieval
#[derive(Debug,Clone,Default)]
pub struct AcquisitionLog {
    entries: Vec<SceneRecord>
}

impl AcquisitionLog {
    pub fn new ()->Self { AcquisitionLog { entries: Vec::new() } }

    pub fn record (&mut self, grid: &SceneGrid) {
        self.entries.push( grid.center().clone());
    }

    pub fn entries (&self)->&[SceneRecord] { &self.entries }
    pub fn len (&self)->usize { self.entries.len() }
    pub fn is_empty (&self)->bool { self.entries.is_empty() }
}

/* #endregion SceneGrid */

//--- general utility functions

/// this should be used wherever we might have to inject a different clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// parse RFC 3339 or naive ISO 8601 datetimes. Naive datetimes (without offset) are interpreted as UTC
pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339( s) {
        return Some( dt.with_timezone( &Utc))
    }

    if let Ok(dt) = DateTime::parse_from_str( s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some( dt.with_timezone( &Utc))
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str( s, fmt) {
            return Some( ndt.and_utc())
        }
    }

    NaiveDate::parse_from_str( s, "%Y-%m-%d").ok()
        .and_then( |d| d.and_hms_opt( 0, 0, 0))
        .map( |ndt| ndt.and_utc())
}

/// parse a `YYYY-MM-DD` day, also accepting full datetimes
pub fn parse_day (s: &str)->Option<NaiveDate> {
    parse_datetime( s).map( |dt| dt.date_naive())
}
