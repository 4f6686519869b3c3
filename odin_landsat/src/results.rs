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

//! the acquisition results table: filtering by cloud cover and date range, sorting by acquisition day, and
//! CSV export with a fixed column order

use std::{cmp::Ordering, io};
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{SceneRecord, parse_day, config::ResultsConfig, errors::{parse_error, Result}};

/// (header, record key) of the columns that are always shown
pub const BASE_COLUMNS: [(&str,&str);6] = [
    ("wrsPath",                "wrsPath"),
    ("wrsRow",                 "wrsRow"),
    ("Acquisition Start Time", "acquisitionStartTime"),
    ("Acquisition Stop Time",  "acquisitionStopTime"),
    ("Acquisition Day",        "acquisitionDay"),
    ("Land Cloud Cover (%)",   "landCloudCover"),
];

/// (header, record key) of the optional metadata columns
pub const METADATA_COLUMNS: [(&str,&str);46] = [
    ("Satellite",                      "satellite"),
    ("Product Identifier L2",          "productIdentifierL2"),
    ("Product Identifier L1",          "productIdentifierL1"),
    ("Landsat Scene Identifier",       "landsatSceneIdentifier"),
    ("Collection Category",            "collectionCategory"),
    ("Collection Number",              "collectionNumber"),
    ("Nadir/Off Nadir",                "nadirOffNadir"),
    ("Roll Angle",                     "rollAngle"),
    ("Date Product Generated L2",      "dateProductGeneratedL2"),
    ("Date Product Generated L1",      "dateProductGeneratedL1"),
    ("Station Identifier",             "stationIdentifier"),
    ("Day/Night Indicator",            "dayNightIndicator"),
    ("Scene Cloud Cover L1",           "sceneCloudCoverL1"),
    ("Ground Control Points Model",    "groundControlPointsModel"),
    ("Ground Control Points Version",  "groundControlPointsVersion"),
    ("Geometric RMSE Model",           "geometricRMSEModel"),
    ("Geometric RMSE Model X",         "geometricRMSEModelX"),
    ("Geometric RMSE Model Y",         "geometricRMSEModelY"),
    ("Processing Software Version",    "processingSoftwareVersion"),
    ("Sun Elevation L0RA",             "sunElevationL0RA"),
    ("Sun Azimuth L0RA",               "sunAzimuthL0RA"),
    ("Sensor Identifier",              "sensorIdentifier"),
    ("Product Map Projection L1",      "productMapProjectionL1"),
    ("UTM Zone",                       "utmZone"),
    ("Datum",                          "datum"),
    ("Ellipsoid",                      "ellipsoid"),
    ("Scene Center Lat DMS",           "sceneCenterLatDMS"),
    ("Scene Center Long DMS",          "sceneCenterLongDMS"),
    ("Corner Upper Left Lat DMS",      "cornerUpperLeftLatDMS"),
    ("Corner Upper Left Long DMS",     "cornerUpperLeftLongDMS"),
    ("Corner Upper Right Lat DMS",     "cornerUpperRightLatDMS"),
    ("Corner Upper Right Long DMS",    "cornerUpperRightLongDMS"),
    ("Corner Lower Left Lat DMS",      "cornerLowerLeftLatDMS"),
    ("Corner Lower Left Long DMS",     "cornerLowerLeftLongDMS"),
    ("Corner Lower Right Lat DMS",     "cornerLowerRightLatDMS"),
    ("Corner Lower Right Long DMS",    "cornerLowerRightLongDMS"),
    ("Scene Center Latitude",          "sceneCenterLatitude"),
    ("Scene Center Longitude",         "sceneCenterLongitude"),
    ("Corner Upper Left Latitude",     "cornerUpperLeftLatitude"),
    ("Corner Upper Left Longitude",    "cornerUpperLeftLongitude"),
    ("Corner Upper Right Latitude",    "cornerUpperRightLatitude"),
    ("Corner Upper Right Longitude",   "cornerUpperRightLongitude"),
    ("Corner Lower Left Latitude",     "cornerLowerLeftLatitude"),
    ("Corner Lower Left Longitude",    "cornerLowerLeftLongitude"),
    ("Corner Lower Right Latitude",    "cornerLowerRightLatitude"),
    ("Corner Lower Right Longitude",   "cornerLowerRightLongitude"),
];

pub fn columns (show_metadata: bool)->impl Iterator<Item=&'static (&'static str,&'static str)> {
    let base: &'static [(&str,&str)] = &BASE_COLUMNS;
    let metadata: &'static [(&str,&str)] = if show_metadata { &METADATA_COLUMNS } else { &[] };
    base.iter().chain( metadata.iter())
}

pub fn csv_headers (show_metadata: bool)->Vec<&'static str> {
    columns( show_metadata).map( |(header,_)| *header).collect()
}

pub fn csv_row (rec: &SceneRecord, show_metadata: bool)->Vec<String> {
    columns( show_metadata).map( |(_,key)| rec.field_text( key)).collect()
}

/// the user controlled view parameters of the results table
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ResultsFilter {
    pub cloud_cover_threshold: f64, // records need to be strictly below
    pub date_from: Option<NaiveDate>, // inclusive
    pub date_to: Option<NaiveDate>,  // inclusive
    pub show_metadata: bool,
}

impl Default for ResultsFilter {
    fn default()->Self {
        ResultsFilter { cloud_cover_threshold: 15.0, date_from: None, date_to: None, show_metadata: false }
    }
}

impl From<&ResultsConfig> for ResultsFilter {
    fn from (config: &ResultsConfig)->Self {
        ResultsFilter { cloud_cover_threshold: config.cloud_cover_threshold, show_metadata: config.show_metadata, ..Default::default() }
    }
}

impl ResultsFilter {
    pub fn accepts (&self, rec: &SceneRecord)->bool {
        let is_cloud_cover_ok = rec.cloud_cover().is_some_and( |cc| cc < self.cloud_cover_threshold);

        let is_date_in_range = if self.date_from.is_none() && self.date_to.is_none() {
            true
        } else {
            match rec.acquisition_date() {
                Some(date) => self.date_from.is_none_or( |d| date >= d) && self.date_to.is_none_or( |d| date <= d),
                None => false
            }
        };

        is_cloud_cover_ok && is_date_in_range
    }
}

/// the records accepted by `filter`, sorted by ascending acquisition day (records without valid day last)
pub fn filter_and_sort<'a> (records: &'a [SceneRecord], filter: &ResultsFilter)->Vec<&'a SceneRecord> {
    let mut list: Vec<&SceneRecord> = records.iter().filter( |r| filter.accepts(r)).collect();
    list.sort_by( |a,b| cmp_days( a.acquisition_date(), b.acquisition_date()));
    debug!("{} of {} records pass results filter", list.len(), records.len());
    list
}

fn cmp_days (a: Option<NaiveDate>, b: Option<NaiveDate>)->Ordering {
    match (a,b) {
        (Some(a),Some(b)) => a.cmp(&b),
        (Some(_),None) => Ordering::Less,
        (None,Some(_)) => Ordering::Greater,
        (None,None) => Ordering::Equal
    }
}

/// parse a `YYYY-MM-DD` date range bound
pub fn parse_date_bound (s: &str)->Result<NaiveDate> {
    parse_day( s).ok_or_else( || parse_error!("invalid date '{}' (expected YYYY-MM-DD)", s))
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default)]
pub enum CsvQuoting {
    /// plain comma joined cells - embedded separators or quotes are not escaped
    #[default]
    Never,
    /// RFC 4180 quoting of cells that need it
    Necessary
}

impl CsvQuoting {
    pub fn from_config (quote_fields: bool)->Self {
        if quote_fields { CsvQuoting::Necessary } else { CsvQuoting::Never }
    }

    fn quote_style (&self)->QuoteStyle {
        match self {
            CsvQuoting::Never => QuoteStyle::Never,
            CsvQuoting::Necessary => QuoteStyle::Necessary
        }
    }
}

/// write header and one row per record. Rows are newline separated, there is no newline after the last row.
/// Returns the number of records written
pub fn write_csv<'a,W,I> (mut writer: W, records: I, show_metadata: bool, quoting: CsvQuoting)->Result<usize>
    where W: io::Write, I: IntoIterator<Item=&'a SceneRecord>
{
    let mut w = WriterBuilder::new()
        .quote_style( quoting.quote_style())
        .terminator( Terminator::Any(b'\n'))
        .from_writer( Vec::new());

    w.write_record( csv_headers( show_metadata))?;

    let mut n = 0;
    for rec in records {
        w.write_record( csv_row( rec, show_metadata))?;
        n += 1;
    }

    let mut buf = w.into_inner().map_err( |e| e.into_error())?;
    if buf.last() == Some(&b'\n') { buf.pop(); }

    writer.write_all( &buf)?;
    writer.flush()?;

    Ok(n)
}

pub fn to_csv_string<'a,I> (records: I, show_metadata: bool, quoting: CsvQuoting)->Result<String> where I: IntoIterator<Item=&'a SceneRecord> {
    let mut buf: Vec<u8> = Vec::new();
    write_csv( &mut buf, records, show_metadata, quoting)?;
    String::from_utf8( buf).map_err( |e| parse_error!("non UTF-8 CSV output: {}", e))
}
