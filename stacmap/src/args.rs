//! Command line arguments, merged over the config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, KEEP_ALIVE_DEFAULT, LISTEN_ADDRESSES_DEFAULT, parse_bbox};
use crate::{StacmapError, StacmapResult};

#[derive(Parser, Debug, PartialEq, Default)]
#[command(
    about,
    version,
    after_help = "Use RUST_LOG environment variable to control logging level, e.g. RUST_LOG=debug or RUST_LOG=stacmap=debug."
)]
pub struct Args {
    #[command(flatten)]
    pub meta: MetaArgs,
    #[command(flatten)]
    pub srv: SrvArgs,
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

// None of these params will be transferred to the config
#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct MetaArgs {
    /// Path to config file. If set, the catalog URL argument is not allowed.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Save resulting config to a file or use "-" to print to stdout.
    #[arg(long)]
    pub save_config: Option<PathBuf>,
    /// Base URL of the upstream catalog, e.g. `https://stac.example.com/`
    pub catalog_url: Option<String>,
}

#[derive(clap::Args, Debug, PartialEq, Default)]
pub struct SrvArgs {
    #[arg(help = format!("Connection keep alive timeout. [DEFAULT: {KEEP_ALIVE_DEFAULT}]"), short, long)]
    pub keep_alive: Option<u64>,
    #[arg(help = format!("The socket address to bind. [DEFAULT: {LISTEN_ADDRESSES_DEFAULT}]"), short, long)]
    pub listen_addresses: Option<String>,
    /// Number of web server workers
    #[arg(short = 'W', long)]
    pub workers: Option<usize>,
    /// Disable permissive CORS on API responses
    #[arg(long)]
    pub no_cors: bool,
}

#[derive(clap::Args, Debug, PartialEq, Default)]
pub struct CatalogArgs {
    /// Origin header value sent with catalog requests
    #[arg(long)]
    pub origin: Option<String>,
    /// Default bounding box for item feeds as "west,south,east,north"
    #[arg(short = 'b', long, allow_hyphen_values = true)]
    pub bbox: Option<String>,
    /// Page size hint forwarded to the catalog
    #[arg(long)]
    pub limit: Option<u32>,
}

impl Args {
    pub fn merge_into_config(self, config: &mut Config) -> StacmapResult<()> {
        if let (Some(_), Some(url)) = (&self.meta.config, &self.meta.catalog_url) {
            return Err(StacmapError::ConfigAndUrlError(url.clone()));
        }

        if self.meta.catalog_url.is_some() {
            config.catalog.url = self.meta.catalog_url;
        }
        if self.srv.keep_alive.is_some() {
            config.srv.keep_alive = self.srv.keep_alive;
        }
        if self.srv.listen_addresses.is_some() {
            config.srv.listen_addresses = self.srv.listen_addresses;
        }
        if self.srv.workers.is_some() {
            config.srv.worker_processes = self.srv.workers;
        }
        if self.srv.no_cors {
            config.srv.cors = Some(false);
        }
        if self.catalog.origin.is_some() {
            config.catalog.origin = self.catalog.origin;
        }
        if self.catalog.limit.is_some() {
            config.catalog.limit = self.catalog.limit;
        }
        if let Some(bbox) = &self.catalog.bbox {
            config.catalog.default_bbox = Some(parse_bbox(bbox)?);
        }
        Ok(())
    }
}
