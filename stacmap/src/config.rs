//! On-disk configuration, merged with CLI arguments at startup.

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stacmap_core::catalog::CatalogClient;
use tilejson::Bounds;
use tracing::info;
use url::Url;

use crate::{StacmapError, StacmapResult};

pub const KEEP_ALIVE_DEFAULT: u64 = 75;
pub const LISTEN_ADDRESSES_DEFAULT: &str = "0.0.0.0:3000";

/// The catalog served when none is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://pgstac-backend.apps.silver.devops.gov.bc.ca/";

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SrvConfig {
    pub keep_alive: Option<u64>,
    pub listen_addresses: Option<String>,
    pub worker_processes: Option<usize>,
    /// Permissive GET-only CORS on API responses; on unless set to `false`.
    pub cors: Option<bool>,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogConfig {
    /// Base URL of the upstream catalog.
    pub url: Option<String>,
    /// `Origin` header sent with every catalog request.
    /// Defaults to the catalog's own origin.
    pub origin: Option<String>,
    /// Bounding box applied to item feeds when a request sets none,
    /// as `[west, south, east, north]`. Defaults to the fixed regional box.
    pub default_bbox: Option<Bounds>,
    /// Page size hint forwarded to the catalog.
    pub limit: Option<u32>,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub srv: SrvConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Resolved per-process state shared with every request handler.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub client: CatalogClient,
    pub default_bbox: Option<Bounds>,
    pub default_limit: Option<u32>,
}

impl Config {
    /// Validates the configuration and builds the shared server state.
    pub fn resolve(&self) -> StacmapResult<ServerState> {
        let url_str = self
            .catalog
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());
        let url =
            Url::parse(&url_str).map_err(|e| StacmapError::CatalogUrlError(e, url_str.clone()))?;
        info!("Serving catalog {url}");

        let client = CatalogClient::new(url, self.catalog.origin.as_deref())?;
        Ok(ServerState {
            client,
            default_bbox: self.catalog.default_bbox,
            default_limit: self.catalog.limit,
        })
    }

    /// Saves the resulting config to a file, or prints it when `file_name`
    /// is `-`.
    pub fn save_to_file(&self, file_name: &Path) -> StacmapResult<()> {
        let yaml = serde_yaml::to_string(&self)?;
        if file_name.as_os_str() == "-" {
            info!("Current stacmap configuration:\n{yaml}");
            Ok(())
        } else {
            info!("Saving config to {}", file_name.display());
            File::create(file_name)
                .and_then(|mut f| f.write_all(yaml.as_bytes()))
                .map_err(|e| StacmapError::ConfigWriteError(e, file_name.into()))
        }
    }
}

/// Reads config from a file, substituting `${VAR}` references from the
/// process environment.
pub fn read_config(file_name: &Path) -> StacmapResult<Config> {
    let mut file =
        File::open(file_name).map_err(|e| StacmapError::ConfigLoadError(e, file_name.into()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| StacmapError::ConfigLoadError(e, file_name.into()))?;
    subst::yaml::from_str(&contents, &subst::Env)
        .map_err(|e| StacmapError::ConfigParseError(e, file_name.into()))
}

/// Parses a `west,south,east,north` bounding box.
pub fn parse_bbox(value: &str) -> StacmapResult<Bounds> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse())
        .collect::<Result<_, _>>()
        .map_err(|_| StacmapError::BboxError(value.to_string()))?;
    let [west, south, east, north] = parts.as_slice() else {
        return Err(StacmapError::BboxError(value.to_string()));
    };
    if west > east || south > north {
        return Err(StacmapError::BboxError(value.to_string()));
    }
    Ok(Bounds::new(*west, *south, *east, *north))
}
