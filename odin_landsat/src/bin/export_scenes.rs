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

use std::{fs::File, io};
use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use odin_landsat::{
    define_cli,
    config::{load_config, ResultsConfig},
    errors::OdinLandsatError,
    results::{filter_and_sort, parse_date_bound, write_csv, CsvQuoting, ResultsFilter},
    search::read_scene_records,
};

define_cli! { ARGS [about="filter and sort Landsat acquisition records and export them as CSV"] =
    config: String [help="filename of results config", long, default_value="results.ron"],
    cloud_cover: Option<f64> [help="exclusive upper cloud cover bound in percent (overrides config)", long],
    from: Option<String> [help="first acquisition day (YYYY-MM-DD) to include", long],
    to: Option<String> [help="last acquisition day (YYYY-MM-DD) to include", long],
    metadata: bool [help="include metadata columns", long, short],
    quote: bool [help="quote cells that contain separators or quotes", long, short],
    output: Option<String> [help="output CSV file (default is stdout)", long, short],
    input: String [help="JSON file with array of acquisition records"]
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .with_writer( io::stderr) // CSV might go to stdout
        .init();

    let config: ResultsConfig = match load_config( &ARGS.config) {
        Ok(config) => config,
        Err(OdinLandsatError::ConfigNotFound(fname)) => {
            warn!("no config {fname}, using defaults");
            ResultsConfig::default()
        }
        Err(e) => return Err(e.into())
    };

    let mut filter = ResultsFilter::from( &config);
    if let Some(cc) = ARGS.cloud_cover { filter.cloud_cover_threshold = cc }
    if let Some(s) = &ARGS.from { filter.date_from = Some( parse_date_bound( s)?) }
    if let Some(s) = &ARGS.to { filter.date_to = Some( parse_date_bound( s)?) }
    filter.show_metadata |= ARGS.metadata;

    let quoting = CsvQuoting::from_config( config.quote_fields || ARGS.quote);

    let records = read_scene_records( &ARGS.input)?;
    let selected = filter_and_sort( &records, &filter);

    let n = match &ARGS.output {
        Some(path) => {
            let n = write_csv( File::create( path)?, selected, filter.show_metadata, quoting)?;
            info!("{n} of {} records saved to {path}", records.len());
            n
        }
        None => write_csv( io::stdout().lock(), selected, filter.show_metadata, quoting)?
    };

    if n == 0 { warn!("no records match the filter criteria") }
    Ok(())
}
