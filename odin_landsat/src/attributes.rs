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

//! comparison series of a selected scene attribute across the cells of a scene grid

use serde::Serialize;
use serde_json::Value;

use crate::{SceneGrid, value_as_f64};

pub const AVAILABLE_ATTRIBUTES: [&str;8] = [
    "reflectance", "temperature", "landCloudCover", "dayNightIndicator",
    "sunElevationL0RA", "sunAzimuthL0RA", "sensorIdentifier", "satellite"
];

pub const DEFAULT_BAND_COUNT: usize = 7;

#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct BandSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug,Clone,PartialEq,Serialize)]
#[serde(tag="type", rename_all="camelCase")]
pub enum AttributeSeries {
    /// list valued attributes (e.g. per band reflectance) - one series per grid cell
    Bands { labels: Vec<String>, series: Vec<BandSeries> },

    /// scalar attributes - one value per grid cell
    Values { label: String, labels: Vec<String>, values: Vec<Option<f64>> },
}

/// attribute name with capitalized first letter
pub fn attribute_title (attr: &str)->String {
    let mut cs = attr.chars();
    match cs.next() {
        Some(c) => c.to_uppercase().chain( cs).collect(),
        None => String::new()
    }
}

/// extract the series for `attr`. Whether `attr` is list valued is determined by the first grid cell
pub fn attribute_series (grid: &SceneGrid, attr: &str)->AttributeSeries {
    let values: Vec<Option<Value>> = grid.records().iter().map( |r| r.field( attr)).collect();
    let is_list = matches!( values.first(), Some(Some(Value::Array(_))));

    if is_list {
        let series: Vec<BandSeries> = values.iter().enumerate().map( |(i,v)| {
            let values = match v {
                Some(Value::Array(a)) => a.iter().map( value_as_f64).collect(),
                _ => Vec::new()
            };
            BandSeries { label: format!("Dataset {} - {}", i+1, attr), values }
        }).collect();

        let n_bands = series.iter().map( |s| s.values.len()).max().unwrap_or( DEFAULT_BAND_COUNT);
        let labels = (1..=n_bands).map( |i| format!("Band {i}")).collect();
        AttributeSeries::Bands { labels, series }

    } else {
        let labels = (1..=values.len()).map( |i| format!("Dataset {i}")).collect();
        let values = values.iter().map( |v| v.as_ref().and_then( value_as_f64)).collect();
        AttributeSeries::Values { label: format!("{attr} Comparison"), labels, values }
    }
}
