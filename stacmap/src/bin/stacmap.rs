use std::env;

use clap::Parser;
use stacmap::StacmapResult;
use stacmap::args::Args;
use stacmap::config::{Config, read_config};
use stacmap::logging::init_tracing;
use stacmap::srv::new_server;
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

async fn start(args: Args) -> StacmapResult<()> {
    info!("Starting stacmap v{VERSION}");

    let save_config = args.meta.save_config.clone();
    let mut config = if let Some(ref cfg_filename) = args.meta.config {
        info!("Using {}", cfg_filename.display());
        read_config(cfg_filename)?
    } else {
        Config::default()
    };

    args.merge_into_config(&mut config)?;
    let state = config.resolve()?;

    if let Some(file_name) = save_config {
        config.save_to_file(file_name.as_path())?;
    } else {
        info!("Use --save-config to save or print the stacmap configuration.");
    }

    let (server, listen_addresses) = new_server(config.srv, state)?;
    info!("stacmap has been started on {listen_addresses}.");
    info!("Use http://{listen_addresses}/api/collections to browse the catalog.");

    server.await
}

#[tokio::main]
async fn main() {
    init_tracing(
        env::var("RUST_LOG").ok().as_deref(),
        env::var("STACMAP_FORMAT").ok().as_deref(),
    );

    let args = Args::parse();
    if let Err(e) = start(args).await {
        error!("{e}");
        std::process::exit(1);
    }
}
