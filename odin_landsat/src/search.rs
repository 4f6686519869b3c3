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

//! access to the external dataset search service that returns the scene records around a location

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use crate::{GeoPoint, SceneGrid, SceneRecord, config::DatasetSearchConfig, errors::{op_failed, Result}};

/// abstraction for the dataset search service. Implementations are expected to return the 3x3 scene
/// neighborhood of `point` in row-major order
#[async_trait]
pub trait DatasetSearch: Send + Sync {
    async fn find_datasets_in_area (&self, point: &GeoPoint)->Result<Vec<SceneRecord>>;
}

/// JSON-over-HTTP search: `GET <base_url>?lat=<lat>&lng=<lng>` returning an array of scene records
pub struct HttpDatasetSearch {
    client: Client,
    config: DatasetSearchConfig
}

impl HttpDatasetSearch {
    pub fn new (config: DatasetSearchConfig)->Result<Self> {
        let client = Client::builder().timeout( config.timeout()).build()?;
        Ok( HttpDatasetSearch { client, config })
    }
}

#[async_trait]
impl DatasetSearch for HttpDatasetSearch {
    async fn find_datasets_in_area (&self, point: &GeoPoint)->Result<Vec<SceneRecord>> {
        let query = [("lat", point.lat().to_string()), ("lng", point.lng().to_string())];
        let mut req = self.client.get( &self.config.base_url).query( &query);
        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth( api_key);
        }

        let response = req.send().await?;
        match response.status() {
            StatusCode::OK => Ok( response.json::<Vec<SceneRecord>>().await? ),
            other => Err( op_failed!("dataset search for {} failed with status {}", point, other))
        }
    }
}

/// offline search that returns the records stored in a JSON file, regardless of location
pub struct JsonFileDatasetSearch {
    path: PathBuf
}

impl JsonFileDatasetSearch {
    pub fn new (path: impl AsRef<Path>)->Self {
        JsonFileDatasetSearch { path: path.as_ref().to_path_buf() }
    }
}

#[async_trait]
impl DatasetSearch for JsonFileDatasetSearch {
    async fn find_datasets_in_area (&self, _point: &GeoPoint)->Result<Vec<SceneRecord>> {
        let data = tokio::fs::read( &self.path).await?;
        parse_scene_records( &data)
    }
}

pub fn parse_scene_records (data: &[u8])->Result<Vec<SceneRecord>> {
    Ok( serde_json::from_slice( data)? )
}

pub fn read_scene_records (path: impl AsRef<Path>)->Result<Vec<SceneRecord>> {
    let data = std::fs::read( path.as_ref())?;
    parse_scene_records( &data)
}

/// search and check that we got a full 3x3 grid
pub async fn search_grid (search: &dyn DatasetSearch, point: &GeoPoint)->Result<SceneGrid> {
    let records = search.find_datasets_in_area( point).await?;
    info!("received {} scene records for {}", records.len(), point);

    SceneGrid::try_from( records).inspect_err( |e| warn!("{e}"))
}
