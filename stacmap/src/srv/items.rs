//! The aggregated (de-paginated) item feed endpoint.

use actix_web::error::ErrorBadRequest;
use actix_web::web::{Data, Path, Query};
use actix_web::{HttpResponse, Result as ActixResult, route};
use serde::{Deserialize, Serialize};
use stacmap_core::catalog::ItemFilters;
use stacmap_core::catalog::model::Item;
use stacmap_core::view::DateFilter;

use crate::config::{ServerState, parse_bbox};
use crate::srv::collections::CollectionPath;
use crate::srv::map_catalog_error;

#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// `west,south,east,north`; the configured default applies when unset.
    pub bbox: Option<String>,
    pub limit: Option<u32>,
}

impl ItemsQuery {
    /// Builds upstream filters from the query, falling back to the
    /// configured defaults.
    pub fn to_filters(&self, state: &ServerState) -> Result<ItemFilters, actix_web::Error> {
        let dates = DateFilter::parse(self.start_date.as_deref(), self.end_date.as_deref())
            .map_err(|e| ErrorBadRequest(format!("Invalid date filter: {e}")))?;
        let bbox = match &self.bbox {
            Some(value) => {
                Some(parse_bbox(value).map_err(|e| ErrorBadRequest(e.to_string()))?)
            }
            None => state.default_bbox,
        };
        Ok(ItemFilters {
            start: dates.start,
            end: dates.end,
            bbox,
            limit: self.limit.or(state.default_limit),
        })
    }
}

/// The whole feed as one FeatureCollection, in upstream order.
#[derive(Debug, Serialize)]
pub struct ItemFeed {
    #[serde(rename = "type")]
    pub collection_type: &'static str,
    #[serde(rename = "numberReturned")]
    pub number_returned: usize,
    pub features: Vec<Item>,
}

/// Follows upstream pagination to exhaustion and returns all items at once.
#[route(
    "/api/collections/{collection_id}/items",
    method = "GET",
    method = "HEAD"
)]
pub async fn get_items(
    path: Path<CollectionPath>,
    query: Query<ItemsQuery>,
    state: Data<ServerState>,
) -> ActixResult<HttpResponse> {
    let filters = query.to_filters(&state)?;
    let items = state
        .client
        .list_items(&path.collection_id, &filters)
        .await
        .map_err(|e| map_catalog_error(&e))?;

    Ok(HttpResponse::Ok().json(ItemFeed {
        collection_type: "FeatureCollection",
        number_returned: items.len(),
        features: items,
    }))
}
