//! Builds one live map view for one collection identifier.

use tilejson::Bounds;
use tracing::{debug, error};

use crate::catalog::model::Collection;
use crate::catalog::{CatalogClient, ItemFilters};
use crate::view::{SelectionSync, Viewport};

/// One mounted map view, bound to one collection identifier.
///
/// Owns the viewport and the selection synchronizer for the lifetime of the
/// collection view. Switching collections means dropping this value and
/// bootstrapping a new one — that is the teardown contract that prevents
/// duplicate layers and listeners. An in-flight bootstrap for a previous
/// collection is not cancelled; callers must not apply its result after
/// switching.
#[derive(Debug)]
pub struct MapView {
    /// The bound collection identifier.
    pub collection_id: String,
    /// The collection record, when its fetch succeeded.
    pub collection: Option<Collection>,
    /// Viewport with the fixed envelope, fitted to the collection outline.
    pub viewport: Viewport,
    /// Selection state over the loaded item geometries.
    pub sync: SelectionSync,
}

impl MapView {
    /// The collection outline, which is also the "reset view" target.
    #[must_use]
    pub fn home_bounds(&self) -> Option<Bounds> {
        self.viewport.home
    }

    /// Returns the viewport to the collection outline and drops the
    /// feature highlight. The selection is not touched.
    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    /// Fits the viewport to a feature's bounds and highlights it.
    ///
    /// Returns `false` for unknown ids or items without usable bounds.
    pub fn zoom_to_feature(&mut self, id: &str) -> bool {
        let bounds = self
            .sync
            .geometries()
            .iter()
            .find(|g| g.item().id == id)
            .and_then(crate::view::MapGeometry::bounds);
        match bounds {
            Some(bounds) => {
                self.viewport.fit_bounds(bounds);
                self.viewport.set_highlight(id);
                true
            }
            None => false,
        }
    }
}

/// Bootstraps a map view for a collection.
///
/// Fetches the collection record (outline + home bounds) and the complete
/// item feed, then wires the selection synchronizer over the geometries.
/// Any fetch failure is logged and aborts construction of the failed part —
/// the viewport is still created, so the page stays usable with the base
/// layer only.
pub async fn bootstrap_map(
    client: &CatalogClient,
    collection_id: &str,
    filters: &ItemFilters,
) -> MapView {
    let mut viewport = Viewport::new();

    let collection = match client.get_collection(collection_id).await {
        Ok(collection) => {
            if let Some(bounds) = collection.spatial_bounds() {
                viewport.set_home(bounds);
            }
            Some(collection)
        }
        Err(e) => {
            error!(collection_id, "failed to fetch collection: {e}");
            None
        }
    };

    let sync = if collection.is_some() {
        match client.list_items(collection_id, filters).await {
            Ok(items) => {
                debug!(collection_id, items = items.len(), "map view bootstrapped");
                SelectionSync::new(items)
            }
            Err(e) => {
                error!(collection_id, "failed to fetch item feed: {e}");
                SelectionSync::default()
            }
        }
    } else {
        SelectionSync::default()
    };

    MapView {
        collection_id: collection_id.to_string(),
        collection,
        viewport,
        sync,
    }
}
