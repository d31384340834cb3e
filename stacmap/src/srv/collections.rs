//! Collection list (landing page cards) and single-collection endpoints.

use actix_web::web::{Data, Path};
use actix_web::{HttpResponse, Result as ActixResult, route};
use serde::{Deserialize, Serialize};
use stacmap_core::catalog::model::Collection;

use crate::config::ServerState;
use crate::srv::map_catalog_error;

#[derive(Debug, Deserialize)]
pub struct CollectionPath {
    pub collection_id: String,
}

/// One navigable card on the landing page.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionCard {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Start of the collection's first temporal interval.
    pub temporal_start: Option<String>,
    /// Viewer path for this collection, `collectionID` included.
    pub map_path: String,
}

impl CollectionCard {
    fn from_collection(collection: &Collection) -> Self {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("collectionID", &collection.id)
            .finish();
        Self {
            id: collection.id.clone(),
            title: collection.title.clone(),
            description: collection.description.clone(),
            temporal_start: collection.temporal_start().map(ToString::to_string),
            map_path: format!("/api/map?{query}"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionList {
    pub collections: Vec<CollectionCard>,
}

/// The landing page's collection cards, fetched once per request.
#[route("/api/collections", method = "GET", method = "HEAD")]
pub async fn get_collections(state: Data<ServerState>) -> ActixResult<HttpResponse> {
    let collections = state
        .client
        .list_collections()
        .await
        .map_err(|e| map_catalog_error(&e))?;

    let cards = collections
        .collections
        .iter()
        .map(CollectionCard::from_collection)
        .collect();
    Ok(HttpResponse::Ok().json(CollectionList { collections: cards }))
}

/// A single collection record, passed through as the catalog sent it.
#[route("/api/collections/{collection_id}", method = "GET", method = "HEAD")]
pub async fn get_collection(
    path: Path<CollectionPath>,
    state: Data<ServerState>,
) -> ActixResult<HttpResponse> {
    let collection = state
        .client
        .get_collection(&path.collection_id)
        .await
        .map_err(|e| map_catalog_error(&e))?;
    Ok(HttpResponse::Ok().json(collection))
}
