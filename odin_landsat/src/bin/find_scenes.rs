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

use std::fs::File;
use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use odin_landsat::{
    define_cli, parse_datetime, parse_location, utc_now, AcquisitionLog,
    config::{load_config, LandsatConfig},
    footprint::{compute_pin_position, SceneCorners},
    notifier::{NotificationState, OverpassNotifier},
    results::{write_csv, CsvQuoting},
    search::{search_grid, DatasetSearch, HttpDatasetSearch, JsonFileDatasetSearch},
};

define_cli! { ARGS [about="find the 3x3 Landsat scene grid around a location and get notified before the next overpass"] =
    lat: Option<String> [help="latitude in degrees", long, allow_hyphen_values=true],
    lng: Option<String> [help="longitude in degrees", long, allow_hyphen_values=true],
    config: String [help="filename of config", long, default_value="landsat.ron"],
    input: Option<String> [help="read scene records from JSON file instead of querying the search service", long, short],
    lead_time: Option<i64> [help="notification lead time in minutes (overrides config)", long],
    now: Option<String> [help="datetime to use as current time (default is wall clock)", long],
    wait: bool [help="wait for a pending overpass notification before exiting", long, short],
    csv: Option<Option<String>> [help="export the center scene record as CSV (default filename from config)", long, num_args=0..=1]
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .with_writer( std::io::stderr)
        .init();

    let config: LandsatConfig = load_config( &ARGS.config)?;
    let point = parse_location( ARGS.lat.as_deref().unwrap_or(""), ARGS.lng.as_deref().unwrap_or(""))?;
    if !point.is_valid() { warn!("location {point} is outside of geodetic range") }

    let lead_time = ARGS.lead_time.unwrap_or( config.lead_time_minutes);
    let now = match &ARGS.now {
        Some(s) => parse_datetime( s).ok_or_else( || anyhow!("invalid datetime {s}"))?,
        None => utc_now()
    };

    let search: Box<dyn DatasetSearch> = match &ARGS.input {
        Some(path) => Box::new( JsonFileDatasetSearch::new( path)),
        None => Box::new( HttpDatasetSearch::new( config.search.clone())?)
    };

    let grid = search_grid( search.as_ref(), &point).await?;
    println!("{}", grid.summary());

    for (row,col,scene) in grid.cells() {
        let acq_time = scene.acquisition_start().map( |t| t.to_string()).unwrap_or_else( |_| scene.acquisition_start_time.clone());
        println!("  [{row},{col}] Path: {}, Row: {}, Acquisition Time: {}, image: {}",
                 scene.wrs_path, scene.wrs_row, acq_time, scene.image_url.as_deref().unwrap_or("-"));
    }

    match SceneCorners::from_record( grid.center()) {
        Ok(corners) => {
            let pin = compute_pin_position( &corners, &point);
            if !pin.is_renderable() {
                warn!("degenerate corners of center scene, no pin position");
            } else if pin.is_inside() {
                println!("pin position in center scene: {pin}");
            } else {
                println!("pin position outside of center scene: {pin}");
            }
        }
        Err(e) => warn!("no pin position: {e}")
    }

    let mut acquisitions = AcquisitionLog::new();
    acquisitions.record( &grid);

    if let Some(path) = &ARGS.csv {
        let path = path.as_deref().unwrap_or( config.results.csv_filename.as_str());
        let file = File::create( path)?;
        let quoting = CsvQuoting::from_config( config.results.quote_fields);
        let n = write_csv( file, acquisitions.entries(), config.results.show_metadata, quoting)?;
        info!("{n} acquisition record(s) saved to {path}");
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut notifier = OverpassNotifier::new( move |msg: &str| {
        println!("{msg}");
        if let Err(e) = tx.send( msg.to_string()) { debug!("overpass message not forwarded: {e}") }
    });

    let state = notifier.update_for_scene( grid.center(), lead_time, now)?;
    if ARGS.wait && state == NotificationState::Pending {
        info!("waiting for overpass notification..");
        rx.recv().await;
    }

    Ok(())
}
