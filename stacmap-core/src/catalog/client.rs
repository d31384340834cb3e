//! HTTP client for a STAC/OGC-family catalog API.

use chrono::NaiveDate;
use reqwest::header::{
    ACCESS_CONTROL_REQUEST_METHOD, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN,
};
use serde::de::DeserializeOwned;
use tilejson::Bounds;
use tracing::debug;
use url::Url;

use crate::catalog::model::{Catalog, Collection, Collections, Item, ItemPage};
use crate::catalog::{CatalogError, CatalogResult};
use crate::geo;

/// Query filters for an item feed request.
///
/// The date range is inclusive on both ends and either bound may be open.
/// When no bounding box is set, the fixed regional box
/// ([`geo::region_bounds`]) is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilters {
    /// Inclusive lower bound of the content date.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound of the content date.
    pub end: Option<NaiveDate>,
    /// Bounding box restriction; defaults to the fixed regional box.
    pub bbox: Option<Bounds>,
    /// Server page size hint.
    pub limit: Option<u32>,
}

impl ItemFilters {
    /// The `datetime` query value in STAC interval syntax, if any bound is set.
    fn datetime_param(&self) -> Option<String> {
        if self.start.is_none() && self.end.is_none() {
            return None;
        }
        let start = self
            .start
            .map_or_else(|| "..".to_string(), |d| format!("{d}T00:00:00Z"));
        let end = self
            .end
            .map_or_else(|| "..".to_string(), |d| format!("{d}T23:59:59Z"));
        Some(format!("{start}/{end}"))
    }
}

/// Client for one catalog service.
///
/// Issues plain GET requests with the fixed header set the upstream expects;
/// no caching, no retries, no request deduplication.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client for the catalog at `base_url`.
    ///
    /// The `Origin` header defaults to the origin of `base_url`; pass
    /// `origin` to override it (e.g. with the viewer's own public origin).
    pub fn new(base_url: Url, origin: Option<&str>) -> CatalogResult<Self> {
        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let origin = origin
            .map(ToString::to_string)
            .unwrap_or_else(|| base_url.origin().ascii_serialization());
        let origin = HeaderValue::from_str(&origin)
            .map_err(|_| CatalogError::InvalidOrigin(origin.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, origin);
        headers.insert(ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("GET"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// The catalog base URL (always with a trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the collection list.
    pub fn collections_url(&self) -> CatalogResult<Url> {
        Ok(self.base_url.join("collections")?)
    }

    /// URL of a single collection.
    pub fn collection_url(&self, collection_id: &str) -> CatalogResult<Url> {
        Ok(self.base_url.join(&format!("collections/{collection_id}"))?)
    }

    /// URL of the first item feed page for a collection, filters applied.
    pub fn items_url(&self, collection_id: &str, filters: &ItemFilters) -> CatalogResult<Url> {
        let mut url = self
            .base_url
            .join(&format!("collections/{collection_id}/items"))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(limit) = filters.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(datetime) = filters.datetime_param() {
                query.append_pair("datetime", &datetime);
            }
            let bbox = filters.bbox.unwrap_or_else(geo::region_bounds);
            query.append_pair(
                "bbox",
                &format!("{},{},{},{}", bbox.left, bbox.bottom, bbox.right, bbox.top),
            );
        }
        Ok(url)
    }

    /// Fetches the catalog root document.
    pub async fn fetch_catalog(&self) -> CatalogResult<Catalog> {
        self.get_json(self.base_url.clone()).await
    }

    /// Fetches the collection list.
    pub async fn list_collections(&self) -> CatalogResult<Collections> {
        self.get_json(self.collections_url()?).await
    }

    /// Fetches a single collection record.
    pub async fn get_collection(&self, collection_id: &str) -> CatalogResult<Collection> {
        self.get_json(self.collection_url(collection_id)?).await
    }

    /// Fetches the complete item feed for a collection.
    ///
    /// Follows server-provided `next` links until none is present,
    /// accumulating all pages into one sequence in server order. If any page
    /// request fails, the whole operation fails — no partial results.
    pub async fn list_items(
        &self,
        collection_id: &str,
        filters: &ItemFilters,
    ) -> CatalogResult<Vec<Item>> {
        let mut next = Some(self.items_url(collection_id, filters)?);
        let mut items = Vec::new();
        let mut pages = 0_u32;

        while let Some(url) = next {
            let page: ItemPage = self.get_json(url).await?;
            pages += 1;
            next = page.next_href().map(Url::parse).transpose()?;
            items.extend(page.features);
        }

        debug!(
            collection_id,
            pages,
            items = items.len(),
            "item feed fetched"
        );
        Ok(items)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> CatalogResult<T> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string();
            return Err(CatalogError::Http {
                status: status.as_u16(),
                message,
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::UnexpectedBody(e, url.to_string()))
    }
}
