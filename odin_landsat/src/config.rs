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

//! RON based configuration for odin_landsat tools.
//! Config files are looked up (in this order) in
//!   - `$ODIN_HOME/configs/odin_landsat/`
//!   - `$HOME/.odin/configs/odin_landsat/`
//!   - the `configs/` dir of this crate

use std::{env, fs, path::{Path,PathBuf}, time::Duration};
use serde::{Deserialize,Serialize};
use tracing::debug;

use crate::errors::{OdinLandsatError,Result};

pub const CONFIGS: &'static str = "configs";
pub const RESOURCE_CRATE: &'static str = env!("CARGO_PKG_NAME");

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct LandsatConfig {
    pub search: DatasetSearchConfig,

    #[serde(default="default_lead_time")]
    pub lead_time_minutes: i64,

    #[serde(default)]
    pub results: ResultsConfig,
}

/// where and how to query the external dataset search service
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct DatasetSearchConfig {
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default="default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DatasetSearchConfig {
    pub fn timeout (&self)->Duration { Duration::from_secs( self.timeout_secs) }
}

/// defaults for the results table and CSV export
#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub cloud_cover_threshold: f64, // percent, exclusive upper bound
    pub show_metadata: bool,
    pub quote_fields: bool, // false reproduces the plain comma-joined export
    pub csv_filename: String,
}

impl Default for ResultsConfig {
    fn default()->Self {
        ResultsConfig {
            cloud_cover_threshold: 15.0,
            show_metadata: false,
            quote_fields: false,
            csv_filename: "landsat_data.csv".to_string()
        }
    }
}

fn default_lead_time()->i64 { 10 }
fn default_timeout_secs()->u64 { 30 }

/// load a config struct from a RON file found through the standard lookup
pub fn load_config<C> (filename: &str) -> Result<C> where C: for <'a> Deserialize<'a> {
    if let Some(path) = find_config_file( filename) {
        load_config_path( &path)
    } else {
        Err( OdinLandsatError::ConfigNotFound( filename.to_string()))
    }
}

/// load a config struct from an explicit pathname
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let path = path.as_ref();
    debug!("loading config {:?}", path);
    let data = fs::read( path)?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

pub fn find_config_file (filename: &str) -> Option<PathBuf> {
    // an existing path (absolute or relative to cwd) takes precedence
    let p = Path::new( filename);
    if p.components().count() > 1 && p.is_file() { return Some(p.to_path_buf()) }

    if let Ok(odin_home) = env::var("ODIN_HOME") {
        let path = Path::new( &odin_home).join( CONFIGS).join( RESOURCE_CRATE).join( filename);
        if path.is_file() { return Some(path) }
    }

    if let Ok(usr_home) = env::var("HOME") {
        let path = Path::new( &usr_home).join( ".odin").join( CONFIGS).join( RESOURCE_CRATE).join( filename);
        if path.is_file() { return Some(path) }
    }

    let path = Path::new( env!("CARGO_MANIFEST_DIR")).join( CONFIGS).join( filename);
    if path.is_file() { Some(path) } else { None }
}
