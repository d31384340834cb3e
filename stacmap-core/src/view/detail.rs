//! Read-only projection of the current selection, one item at a time.

use chrono::NaiveDate;
use serde::Serialize;
use tilejson::Bounds;

use crate::catalog::model::{Item, Provider};
use crate::view::selection::SelectionSnapshot;

/// Prompt shown when nothing is selected.
pub const EMPTY_PROMPT: &str = "Select a feature on the map to see its details.";

/// One entry of the enumerable asset list.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetEntry {
    /// Asset name (the key in the item's asset mapping).
    pub name: String,
    /// Asset URL.
    pub href: String,
    /// Media type, when declared.
    pub media_type: Option<String>,
}

/// The renderable details of one selected item.
///
/// Missing fields stay `None`; the renderer decides on its "N/A"
/// presentation. Dates are formatted the way the original panel shows them
/// (`2021-7-15`, no zero padding).
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDetails {
    /// Item identifier.
    pub id: String,
    /// Owning collection.
    pub collection: Option<String>,
    /// Item title.
    pub title: Option<String>,
    /// Formatted content date.
    pub content_date: Option<String>,
    /// Formatted creation date.
    pub created_date: Option<String>,
    /// The item's `self` link.
    pub self_url: Option<String>,
    /// Preview image URL.
    pub thumbnail: Option<String>,
    /// Asset list, each entry independently copyable.
    pub assets: Vec<AssetEntry>,
    /// Provider list.
    pub providers: Vec<Provider>,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%-m-%-d").to_string()
}

impl FeatureDetails {
    /// Projects one item into its panel representation.
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            collection: item.collection.clone(),
            title: item.title().map(ToString::to_string),
            content_date: item.content_date().map(format_date),
            created_date: item.created_date().map(format_date),
            self_url: item.self_url().map(ToString::to_string),
            thumbnail: item.thumbnail_url().map(ToString::to_string),
            assets: item
                .assets
                .iter()
                .map(|(name, asset)| AssetEntry {
                    name: name.clone(),
                    href: asset.href.clone(),
                    media_type: asset.media_type.clone(),
                })
                .collect(),
            providers: item.properties.providers.clone(),
        }
    }
}

/// Pages through the selection with a 1-based cursor clamped to
/// `[1, len]` (0 only while the selection is empty).
#[derive(Debug, Clone, Default)]
pub struct DetailPanel {
    snapshot: SelectionSnapshot,
    cursor: usize,
}

impl DetailPanel {
    /// A panel over the given snapshot, cursor on the first item.
    #[must_use]
    pub fn new(snapshot: SelectionSnapshot) -> Self {
        let cursor = usize::from(!snapshot.is_empty());
        Self { snapshot, cursor }
    }

    /// Replaces the snapshot, keeping the cursor on the same item when it is
    /// still selected, otherwise clamping into the new range.
    pub fn update(&mut self, snapshot: SelectionSnapshot) {
        let kept = self
            .current()
            .and_then(|item| snapshot.position_of(&item.id));
        self.cursor = match kept {
            Some(position) => position + 1,
            None if snapshot.is_empty() => 0,
            None => self.cursor.clamp(1, snapshot.len()),
        };
        self.snapshot = snapshot;
    }

    /// Number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Whether the selection is empty (the panel shows [`EMPTY_PROMPT`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// The 1-based cursor, 0 when empty.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves to the next item; clamped, no wraparound.
    pub fn next(&mut self) {
        if self.cursor < self.snapshot.len() {
            self.cursor += 1;
        }
    }

    /// Moves to the previous item; clamped, no wraparound.
    pub fn prev(&mut self) {
        if self.cursor > 1 {
            self.cursor -= 1;
        }
    }

    /// Positions the cursor on the item with the given id.
    ///
    /// Returns `false` (cursor untouched) when the id is not selected.
    pub fn jump_to(&mut self, id: &str) -> bool {
        match self.snapshot.position_of(id) {
            Some(position) => {
                self.cursor = position + 1;
                true
            }
            None => false,
        }
    }

    /// The item under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Item> {
        self.snapshot.get(self.cursor.checked_sub(1)?)
    }

    /// The renderable details of the item under the cursor.
    #[must_use]
    pub fn details(&self) -> Option<FeatureDetails> {
        self.current().map(FeatureDetails::from_item)
    }

    /// Bounds to fit the viewport to for "zoom to feature".
    #[must_use]
    pub fn zoom_target(&self) -> Option<Bounds> {
        self.current()?.bounds()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(id: &str) -> Item {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "bbox": [-128.0, 52.0, -126.0, 54.0],
            "properties": {
                "datetime": "2021-07-15T18:20:00Z",
                "title": format!("Title {id}")
            },
            "assets": {
                "data": {"href": format!("https://x/{id}.tif"), "type": "image/tiff"}
            },
            "links": [{"rel": "self", "href": format!("https://x/items/{id}")}]
        }))
        .unwrap()
    }

    fn snapshot(ids: &[&str]) -> SelectionSnapshot {
        SelectionSnapshot::new(ids.iter().map(|id| item(id)).collect())
    }

    #[test]
    fn test_empty_panel() {
        let panel = DetailPanel::new(SelectionSnapshot::default());
        assert!(panel.is_empty());
        assert_eq!(panel.cursor(), 0);
        assert_eq!(panel.details(), None);
        assert_eq!(panel.zoom_target(), None);
    }

    #[test]
    fn test_cursor_clamps_without_wraparound() {
        let mut panel = DetailPanel::new(snapshot(&["a", "b", "c"]));
        assert_eq!(panel.cursor(), 1);
        panel.prev();
        assert_eq!(panel.cursor(), 1);
        panel.next();
        panel.next();
        panel.next();
        assert_eq!(panel.cursor(), 3);
        assert_eq!(panel.current().map(|i| i.id.as_str()), Some("c"));
    }

    #[test]
    fn test_jump_to_shows_requested_id() {
        let mut panel = DetailPanel::new(snapshot(&["a", "b", "c"]));
        assert!(panel.jump_to("b"));
        assert_eq!(panel.details().map(|d| d.id), Some("b".to_string()));
        assert!(!panel.jump_to("zzz"));
        assert_eq!(panel.cursor(), 2);
    }

    #[test]
    fn test_update_keeps_current_item_when_possible() {
        let mut panel = DetailPanel::new(snapshot(&["a", "b", "c"]));
        panel.jump_to("c");

        panel.update(snapshot(&["b", "c"]));
        assert_eq!(panel.current().map(|i| i.id.as_str()), Some("c"));
        assert_eq!(panel.cursor(), 2);

        panel.update(snapshot(&["a"]));
        assert_eq!(panel.current().map(|i| i.id.as_str()), Some("a"));

        panel.update(SelectionSnapshot::default());
        assert_eq!(panel.cursor(), 0);
        assert!(panel.is_empty());
    }

    #[test]
    fn test_details_projection() {
        let panel = DetailPanel::new(snapshot(&["a"]));
        let details = panel.details().unwrap();
        assert_eq!(details.id, "a");
        assert_eq!(details.title.as_deref(), Some("Title a"));
        assert_eq!(details.content_date.as_deref(), Some("2021-7-15"));
        assert_eq!(details.created_date, None);
        assert_eq!(details.self_url.as_deref(), Some("https://x/items/a"));
        assert_eq!(details.assets.len(), 1);
        assert_eq!(details.assets[0].name, "data");
        assert_eq!(details.assets[0].media_type.as_deref(), Some("image/tiff"));
        assert_eq!(
            panel.zoom_target(),
            Some(Bounds::new(-128.0, 52.0, -126.0, 54.0))
        );
    }
}
