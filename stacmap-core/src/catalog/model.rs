//! STAC data model as consumed by the viewer.
//!
//! Deserialization is deliberately tolerant: every field a response may omit
//! is optional or defaulted, and unknown fields are preserved where callers
//! may want to pass them through. A malformed item never aborts handling of
//! the rest of a feed — accessors degrade field-by-field instead.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tilejson::Bounds;

use crate::geo;

/// A hyperlink in a STAC entity's `links` list.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StacLink {
    /// Link relation, e.g. `self`, `next`, `items`.
    pub rel: String,
    /// Link target.
    pub href: String,
    /// Media type of the target.
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    /// Human-readable title.
    pub title: Option<String>,
}

/// A downloadable or linked file associated with an item.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset location.
    pub href: String,
    /// Media type of the asset.
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    /// Human-readable title.
    pub title: Option<String>,
    /// Role tags, e.g. `thumbnail` or `data`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// A data provider entry.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Provider name.
    pub name: String,
    /// Provider homepage.
    pub url: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Provider roles, e.g. `producer`, `host`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// The `properties` object of an item.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemProperties {
    /// Acquisition/content datetime, RFC 3339.
    pub datetime: Option<String>,
    /// Creation timestamp, RFC 3339.
    pub created: Option<String>,
    /// Human-readable title.
    pub title: Option<String>,
    /// Providers of this item.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Provider>,
    /// Any other property is kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

/// One catalog record: a GeoJSON Feature with time and linked assets.
///
/// Immutable once fetched; identified by [`id`](Self::id), unique within its
/// collection.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Always `Feature`.
    #[serde(rename = "type", default = "feature_type")]
    pub item_type: String,
    /// Item identifier, unique within the collection.
    pub id: String,
    /// Identifier of the owning collection.
    pub collection: Option<String>,
    /// Footprint geometry.
    pub geometry: Option<geojson::Geometry>,
    /// Bounding box as `[west, south, east, north]` (2D) or with elevation (3D).
    pub bbox: Option<Vec<f64>>,
    /// Item properties.
    #[serde(default)]
    pub properties: ItemProperties,
    /// Named assets.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, Asset>,
    /// Item links; at minimum a `self` link on well-formed feeds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<StacLink>,
}

impl Item {
    /// Human-readable title, when present.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.properties.title.as_deref()
    }

    /// Content datetime in UTC, when present and parseable.
    #[must_use]
    pub fn content_datetime(&self) -> Option<DateTime<Utc>> {
        parse_rfc3339(self.properties.datetime.as_deref()?)
    }

    /// Content datetime reduced to a UTC calendar day.
    #[must_use]
    pub fn content_date(&self) -> Option<NaiveDate> {
        self.content_datetime().map(|dt| dt.date_naive())
    }

    /// Creation timestamp reduced to a UTC calendar day.
    #[must_use]
    pub fn created_date(&self) -> Option<NaiveDate> {
        parse_rfc3339(self.properties.created.as_deref()?).map(|dt| dt.date_naive())
    }

    /// Footprint bounds: the `bbox` when usable, else computed from the
    /// geometry, else `None`.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        if let Some(bbox) = self.bbox.as_deref()
            && let Some(bounds) = geo::from_bbox(bbox)
        {
            return Some(bounds);
        }
        let geometry = self.geometry.as_ref()?;
        geo::geometry_bounds(&geometry.value)
    }

    /// First link with the given relation.
    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&StacLink> {
        self.links.iter().find(|l| l.rel == rel)
    }

    /// The item's `self` link target.
    #[must_use]
    pub fn self_url(&self) -> Option<&str> {
        self.link("self").map(|l| l.href.as_str())
    }

    /// A preview image for the item: the `rendered_preview` or `thumbnail`
    /// asset, or any asset tagged with the `thumbnail` role.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        if let Some(asset) = self
            .assets
            .get("rendered_preview")
            .or_else(|| self.assets.get("thumbnail"))
        {
            return Some(asset.href.as_str());
        }
        self.assets
            .values()
            .find(|a| a.roles.iter().any(|r| r == "thumbnail"))
            .map(|a| a.href.as_str())
    }
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Spatial extent of a collection: one or more bounding boxes, the first
/// being the overall extent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpatialExtent {
    /// Bounding boxes in `[west, south, east, north]` order.
    #[serde(default)]
    pub bbox: Vec<Vec<f64>>,
}

/// Temporal extent of a collection: one or more `[start, end]` intervals,
/// either bound possibly open (`null`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemporalExtent {
    /// Intervals as RFC 3339 strings.
    #[serde(default)]
    pub interval: Vec<Vec<Option<String>>>,
}

/// Combined spatial and temporal extent.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    /// Spatial extent.
    pub spatial: Option<SpatialExtent>,
    /// Temporal extent.
    pub temporal: Option<TemporalExtent>,
}

/// A named grouping of items sharing spatial/temporal extent.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection identifier.
    pub id: String,
    /// Human-readable title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Spatial and temporal extent.
    pub extent: Option<Extent>,
    /// Collection links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<StacLink>,
    /// Any other field is kept verbatim so single-collection responses can be
    /// passed through unmodified.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Collection {
    /// Overall spatial extent as bounds, when present.
    #[must_use]
    pub fn spatial_bounds(&self) -> Option<Bounds> {
        let bbox = self
            .extent
            .as_ref()?
            .spatial
            .as_ref()?
            .bbox
            .first()?
            .as_slice();
        geo::from_bbox(bbox)
    }

    /// Start of the first temporal interval, when present.
    #[must_use]
    pub fn temporal_start(&self) -> Option<&str> {
        self.extent
            .as_ref()?
            .temporal
            .as_ref()?
            .interval
            .first()?
            .first()?
            .as_deref()
    }

    /// Whether the collection advertises an `items` link.
    #[must_use]
    pub fn has_items_link(&self) -> bool {
        self.links.iter().any(|l| l.rel == "items")
    }
}

/// The `GET {base}/collections` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Collections {
    /// The collections.
    #[serde(default)]
    pub collections: Vec<Collection>,
    /// Response links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<StacLink>,
}

/// The catalog root document.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog identifier.
    pub id: Option<String>,
    /// Human-readable title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// STAC version advertised by the server.
    pub stac_version: Option<String>,
    /// Catalog links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<StacLink>,
    /// Any other field, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of an item feed: a GeoJSON FeatureCollection with paging links.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemPage {
    /// Items on this page, in server order.
    #[serde(default)]
    pub features: Vec<Item>,
    /// Page links; a `next` relation points at the following page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<StacLink>,
}

impl ItemPage {
    /// Target of the `next` pagination link, if any.
    #[must_use]
    pub fn next_href(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel == "next")
            .map(|l| l.href.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_item() -> Item {
        serde_json::from_value(serde_json::json!({
            "type": "Feature",
            "id": "scene-001",
            "collection": "vegetation",
            "bbox": [-128.0, 52.0, -126.0, 54.0],
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-128.0, 52.0], [-126.0, 52.0], [-126.0, 54.0],
                    [-128.0, 54.0], [-128.0, 52.0]
                ]]
            },
            "properties": {
                "datetime": "2021-07-15T18:20:00Z",
                "created": "2021-08-01T00:00:00Z",
                "title": "Scene 1",
                "providers": [{"name": "Prov", "url": "https://prov.example"}],
                "gsd": 10
            },
            "assets": {
                "data": {"href": "https://x/scene-001.tif", "type": "image/tiff"},
                "rendered_preview": {"href": "https://x/scene-001.png", "roles": ["overview"]}
            },
            "links": [
                {"rel": "self", "href": "https://x/collections/vegetation/items/scene-001"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_item_accessors() {
        let item = sample_item();
        assert_eq!(item.title(), Some("Scene 1"));
        assert_eq!(
            item.content_date(),
            NaiveDate::from_ymd_opt(2021, 7, 15)
        );
        assert_eq!(item.created_date(), NaiveDate::from_ymd_opt(2021, 8, 1));
        assert_eq!(
            item.bounds(),
            Some(Bounds::new(-128.0, 52.0, -126.0, 54.0))
        );
        assert_eq!(
            item.self_url(),
            Some("https://x/collections/vegetation/items/scene-001")
        );
        assert_eq!(item.thumbnail_url(), Some("https://x/scene-001.png"));
        // unknown properties are preserved
        assert_eq!(
            item.properties.extra.get("gsd"),
            Some(&serde_json::json!(10))
        );
    }

    #[test]
    fn test_item_degrades_field_by_field() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "id": "bare",
            "properties": {"datetime": "not-a-date"}
        }))
        .unwrap();
        assert_eq!(item.item_type, "Feature");
        assert_eq!(item.content_date(), None);
        assert_eq!(item.bounds(), None);
        assert_eq!(item.self_url(), None);
        assert_eq!(item.thumbnail_url(), None);
    }

    #[test]
    fn test_item_bounds_falls_back_to_geometry() {
        let mut item = sample_item();
        item.bbox = None;
        assert_eq!(
            item.bounds(),
            Some(Bounds::new(-128.0, 52.0, -126.0, 54.0))
        );
        item.bbox = Some(vec![1.0]); // unusable bbox, same fallback
        assert_eq!(
            item.bounds(),
            Some(Bounds::new(-128.0, 52.0, -126.0, 54.0))
        );
    }

    #[test]
    fn test_collection_extent() {
        let collection: Collection = serde_json::from_value(serde_json::json!({
            "id": "vegetation",
            "title": "Vegetation mapping",
            "extent": {
                "spatial": {"bbox": [[-139.0, 48.0, -114.0, 60.0]]},
                "temporal": {"interval": [["2019-01-01T00:00:00Z", null]]}
            },
            "links": [{"rel": "items", "href": "https://x/collections/vegetation/items"}]
        }))
        .unwrap();
        assert_eq!(
            collection.spatial_bounds(),
            Some(Bounds::new(-139.0, 48.0, -114.0, 60.0))
        );
        assert_eq!(collection.temporal_start(), Some("2019-01-01T00:00:00Z"));
        assert!(collection.has_items_link());
    }

    #[test]
    fn test_item_page_next() {
        let page: ItemPage = serde_json::from_value(serde_json::json!({
            "features": [],
            "links": [
                {"rel": "self", "href": "https://x/items?page=1"},
                {"rel": "next", "href": "https://x/items?page=2"}
            ]
        }))
        .unwrap();
        assert_eq!(page.next_href(), Some("https://x/items?page=2"));
        assert_eq!(ItemPage::default().next_href(), None);
    }
}
