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

#![allow(unused)]

use serde_json::json;
use odin_landsat::{GeoPoint, SceneRecord, errors::OdinLandsatError};
use odin_landsat::footprint::{compute_pin_position, parse_degrees, parse_dms, PinPosition, SceneCorners};

fn center_corners()->SceneCorners {
    SceneCorners::new( 71.5, -51.0, 70.0, -47.0)
}

fn assert_close (a: f64, b: f64) {
    assert!( (a - b).abs() < 1e-9, "{a} != {b}");
}

fn record_with (corners: serde_json::Value)->SceneRecord {
    let mut v = json!({
        "wrsPath": 12, "wrsRow": 8,
        "acquisitionStartTime": "2024-05-02T14:52:14.123Z",
        "acquisitionDay": "2024-05-02",
        "landCloudCover": 14.99
    });
    if let (Some(obj), Some(cs)) = (v.as_object_mut(), corners.as_object()) {
        for (k,cv) in cs { obj.insert( k.clone(), cv.clone()); }
    }
    serde_json::from_value( v).unwrap()
}

#[test]
fn test_pin_corners_and_center () {
    let corners = center_corners();

    let pin = compute_pin_position( &corners, &GeoPoint::from_lat_lng( 71.5, -51.0));
    assert_close( pin.top, 0.0);
    assert_close( pin.left, 0.0);

    let pin = compute_pin_position( &corners, &GeoPoint::from_lat_lng( 70.0, -47.0));
    assert_close( pin.top, 100.0);
    assert_close( pin.left, 100.0);

    let pin = compute_pin_position( &corners, &corners.center());
    assert_close( pin.top, 50.0);
    assert_close( pin.left, 50.0);
    assert!( pin.is_renderable() && pin.is_inside());
    assert_eq!( pin.to_string(), "top: 50%; left: 50%");
}

#[test]
fn test_pin_outside () {
    let corners = center_corners();

    let pin = compute_pin_position( &corners, &GeoPoint::from_lat_lng( 72.25, -53.0)); // north-west of scene
    assert_close( pin.top, -50.0);
    assert_close( pin.left, -50.0);
    assert!( pin.is_renderable());
    assert!( !pin.is_inside());
    assert!( !corners.contains( &GeoPoint::from_lat_lng( 72.25, -53.0)));

    let pin = compute_pin_position( &corners, &GeoPoint::from_lat_lng( 69.25, -45.0)); // south-east
    assert_close( pin.top, 150.0);
    assert_close( pin.left, 150.0);
    assert!( !pin.is_inside());
}

#[test]
fn test_contains_is_boundary_inclusive () {
    let corners = center_corners();
    assert!( corners.contains( &GeoPoint::from_lat_lng( 71.5, -51.0)));
    assert!( corners.contains( &GeoPoint::from_lat_lng( 70.0, -47.0)));
    assert!( corners.contains( &GeoPoint::from_lat_lng( 70.75, -49.0)));
    assert!( !corners.contains( &GeoPoint::from_lat_lng( 69.99, -49.0)));
}

#[test]
fn test_degenerate_corners () {
    let corners = SceneCorners::new( 70.0, -49.0, 70.0, -47.0);
    assert!( corners.is_degenerate());

    let pin = compute_pin_position( &corners, &GeoPoint::from_lat_lng( 70.0, -48.0));
    assert!( !pin.is_renderable());
    assert!( !pin.is_inside());

    let pin = compute_pin_position( &corners, &GeoPoint::from_lat_lng( 71.0, -48.0));
    assert!( !pin.is_renderable());
}

#[test]
fn test_parse_dms () {
    assert_close( parse_dms( "70°55'00.00\"N").unwrap(), 70.0 + 55.0/60.0);
    assert_close( parse_dms( "49°00'03.24\"W").unwrap(), -(49.0 + 3.24/3600.0));
    assert_close( parse_dms( "-49° 0' 3.24\"").unwrap(), -(49.0 + 3.24/3600.0));
    assert_close( parse_dms( "12°30'S").unwrap(), -12.5);
    assert_close( parse_dms( "45°").unwrap(), 45.0);
    assert_close( parse_dms( " -122.25 ").unwrap(), -122.25);

    assert!( parse_dms( "70°75'00.00\"N").is_none()); // minutes out of range
    assert!( parse_dms( "70 55 00").is_none());
    assert!( parse_dms( "").is_none());

    assert_close( parse_degrees( &json!(71.5)).unwrap(), 71.5);
    assert_close( parse_degrees( &json!("71°30'00.00\"N")).unwrap(), 71.5);
    assert!( parse_degrees( &json!(null)).is_none());
}

#[test]
fn test_corners_from_dms_record () {
    let rec = record_with( json!({
        "cornerUpperLeftLatDMS": "71°30'00.00\"N",
        "cornerUpperLeftLongDMS": "51°00'00.00\"W",
        "cornerLowerRightLatDMS": "70°00'00.00\"N",
        "cornerLowerRightLongDMS": "47°00'00.00\"W",
        "cornerUpperLeftLatitude": 0.0 // DMS takes precedence
    }));
    let corners = SceneCorners::from_record( &rec).unwrap();
    assert_close( corners.upper_left_lat, 71.5);
    assert_close( corners.upper_left_lng, -51.0);
    assert_close( corners.lower_right_lat, 70.0);
    assert_close( corners.lower_right_lng, -47.0);
}

#[test]
fn test_corners_decimal_fallback () {
    let rec = record_with( json!({
        "cornerUpperLeftLatDMS": "n/a",
        "cornerUpperLeftLatitude": 71.5,
        "cornerUpperLeftLongitude": "-51.0",
        "cornerLowerRightLatitude": 70.0,
        "cornerLowerRightLongitude": -47.0
    }));
    let corners = SceneCorners::from_record( &rec).unwrap();
    assert_eq!( corners, center_corners());
}

#[test]
fn test_missing_corners () {
    let rec = record_with( json!({
        "cornerUpperLeftLatitude": 71.5,
        "cornerUpperLeftLongitude": -51.0,
        "cornerLowerRightLatitude": 70.0
    }));
    match SceneCorners::from_record( &rec) {
        Err(OdinLandsatError::ParseError(msg)) => assert!( msg.contains("cornerLowerRightLongDMS")),
        other => panic!("unexpected result {other:?}")
    }
}
