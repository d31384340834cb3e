use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::error::{ErrorBadGateway, ErrorInternalServerError, ErrorNotFound};
use actix_web::http::header::CACHE_CONTROL;
use actix_web::middleware::{Condition, NormalizePath, TrailingSlash};
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, route, web};
use futures::TryFutureExt as _;
use stacmap_core::catalog::CatalogError;
use tracing::error;
use tracing_actix_web::TracingLogger;

use crate::config::{KEEP_ALIVE_DEFAULT, LISTEN_ADDRESSES_DEFAULT, ServerState, SrvConfig};
use crate::srv::{collections, items, viewer};
use crate::{StacmapError, StacmapResult};

/// Translates an upstream catalog failure into the HTTP response the viewer
/// should see: missing collections stay 404, everything else the upstream
/// did wrong becomes 502, undecodable bodies 500. Always logged.
pub fn map_catalog_error(e: &CatalogError) -> actix_web::Error {
    error!("{e}");
    match e {
        CatalogError::Http { status: 404, .. } => ErrorNotFound("Collection not found"),
        CatalogError::Http { .. } | CatalogError::Network(_) => {
            ErrorBadGateway("Catalog request failed")
        }
        _ => ErrorInternalServerError("Catalog response could not be processed"),
    }
}

/// Root path: a plain-text pointer at the API.
#[route("/", method = "GET", method = "HEAD")]
#[allow(clippy::unused_async)]
async fn get_index() -> &'static str {
    "stacmap server is running.\n\n\
    Collections are listed at http://<host>/api/collections\n\
    Map bootstrap payloads at http://<host>/api/map?collectionID=<id>\n\n\
    See documentation https://github.com/stacmap/stacmap"
}

/// Return 200 OK if healthy. Used for readiness and liveness probes.
#[route("/health", method = "GET", method = "HEAD")]
#[allow(clippy::unused_async)]
async fn get_health() -> impl Responder {
    HttpResponse::Ok()
        .insert_header((CACHE_CONTROL, "no-cache"))
        .message_body("OK")
}

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(get_health)
        .service(collections::get_collections)
        .service(collections::get_collection)
        .service(items::get_items)
        .service(viewer::get_map)
        .service(get_index);
}

pub type Server = Pin<Box<dyn Future<Output = StacmapResult<()>>>>;

/// Create a future for an Actix web server together with the listening address.
pub fn new_server(config: SrvConfig, state: ServerState) -> StacmapResult<(Server, String)> {
    let keep_alive = Duration::from_secs(config.keep_alive.unwrap_or(KEEP_ALIVE_DEFAULT));
    let worker_processes = config.worker_processes.unwrap_or_else(num_cpus::get);
    let listen_addresses = config
        .listen_addresses
        .clone()
        .unwrap_or_else(|| LISTEN_ADDRESSES_DEFAULT.to_string());
    let cors_enabled = config.cors.unwrap_or(true);

    let factory = move || {
        let cors = cors_enabled.then(|| {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "HEAD"])
                .max_age(3600)
        });

        App::new()
            .app_data(Data::new(state.clone()))
            .wrap(Condition::new(cors.is_some(), cors.unwrap_or_default()))
            .wrap(TracingLogger::default())
            .wrap(NormalizePath::new(TrailingSlash::MergeOnly))
            .configure(router)
    };

    let server = HttpServer::new(factory)
        .bind(listen_addresses.clone())
        .map_err(|e| StacmapError::BindingError(e, listen_addresses.clone()))?
        .keep_alive(keep_alive)
        .shutdown_timeout(0)
        .workers(worker_processes)
        .run()
        .err_into();

    Ok((Box::pin(server), listen_addresses))
}
