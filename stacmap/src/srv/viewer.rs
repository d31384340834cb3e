//! The map bootstrap payload: everything one collection view needs.

use actix_web::error::ErrorBadRequest;
use actix_web::web::{Data, Query};
use actix_web::{HttpResponse, Result as ActixResult, route};
use serde::{Deserialize, Serialize};
use stacmap_core::bootstrap_map;
use stacmap_core::catalog::ItemFilters;
use stacmap_core::catalog::model::{Collection, Item};
use stacmap_core::view::{DateFilter, FeatureStyle, StylePalette, Viewport};

use crate::config::ServerState;

/// Label shown when no collection is selected.
pub const PLACEHOLDER_LABEL: &str = "STAC Browser";

#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    /// The active collection; absent falls back to the placeholder label.
    #[serde(rename = "collectionID")]
    pub collection_id: Option<String>,
    /// Optional initial date filter, applied before styling.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// One footprint with its initial style.
#[derive(Debug, Serialize)]
pub struct MapFeature {
    pub feature: Item,
    pub style: FeatureStyle,
    pub interactive: bool,
}

/// The bootstrap payload for one map view.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct MapDocument {
    /// Header label: the collection title, its id, or the placeholder.
    pub label: String,
    pub collection: Option<Collection>,
    pub viewport: Viewport,
    pub features: Vec<MapFeature>,
    pub palette: StylePalette,
}

/// Builds the map view for `collectionID`.
///
/// Upstream fetch failures are logged and degrade to a base-layer-only
/// document, mirroring a viewer that stays usable when the catalog is down.
#[route("/api/map", method = "GET", method = "HEAD")]
pub async fn get_map(
    query: Query<MapQuery>,
    state: Data<ServerState>,
) -> ActixResult<HttpResponse> {
    let Some(collection_id) = query.collection_id.clone().filter(|id| !id.is_empty()) else {
        return Ok(HttpResponse::Ok().json(MapDocument {
            label: PLACEHOLDER_LABEL.to_string(),
            collection: None,
            viewport: Viewport::new(),
            features: Vec::new(),
            palette: StylePalette::default(),
        }));
    };

    let filters = ItemFilters {
        start: None,
        end: None,
        bbox: state.default_bbox,
        limit: state.default_limit,
    };
    let mut view = bootstrap_map(&state.client, &collection_id, &filters).await;

    if query.start_date.is_some() || query.end_date.is_some() {
        let filter = DateFilter::parse(query.start_date.as_deref(), query.end_date.as_deref())
            .map_err(|e| ErrorBadRequest(format!("Invalid date filter: {e}")))?;
        view.sync.apply_date_filter(filter);
    }

    let label = view
        .collection
        .as_ref()
        .and_then(|c| c.title.clone())
        .unwrap_or_else(|| collection_id.clone());
    let features = view
        .sync
        .geometries()
        .iter()
        .map(|g| MapFeature {
            feature: g.item().clone(),
            style: g.style(),
            interactive: g.is_interactive(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(MapDocument {
        label,
        collection: view.collection,
        viewport: view.viewport,
        features,
        palette: StylePalette::default(),
    }))
}
