//! Selection synchronization between map interactions and the selection set.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use chrono::NaiveDate;
use tilejson::Bounds;
use tracing::warn;

use crate::catalog::model::Item;
use crate::geo;
use crate::view::filter::DateFilter;
use crate::view::selection::SelectionSnapshot;
use crate::view::style::FeatureStyle;

/// One interactive footprint on the map.
#[derive(Debug, Clone)]
pub struct MapGeometry {
    item: Item,
    bounds: Option<Bounds>,
    date: Option<NaiveDate>,
    selected: bool,
    filtered_out: bool,
}

impl MapGeometry {
    fn new(item: Item) -> Self {
        let bounds = item.bounds();
        let date = item.content_date();
        Self {
            item,
            bounds,
            date,
            selected: false,
            filtered_out: false,
        }
    }

    /// The underlying item.
    #[must_use]
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Footprint bounds, when the item has usable geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// The style currently applied. `Disabled` overrides `Selected`.
    #[must_use]
    pub fn style(&self) -> FeatureStyle {
        if self.filtered_out {
            FeatureStyle::Disabled
        } else if self.selected {
            FeatureStyle::Selected
        } else {
            FeatureStyle::Default
        }
    }

    /// Whether the geometry reacts to clicks and rectangle draws.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.filtered_out
    }

    /// Whether the geometry is currently selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

type Observer = Box<dyn FnMut(&SelectionSnapshot)>;

/// Owns the mapping from loaded item geometries to the selected subset.
///
/// Reacts to three inputs — single click, rectangle draw, date filter — and
/// produces two outputs: an updated style per geometry and an updated
/// selection snapshot. Mutators return the new snapshot and notify the
/// registered observer, if any.
///
/// The synchronizer owns its geometries for the lifetime of one loaded feed;
/// a reloaded feed means a new synchronizer, so stale selections cannot
/// survive a collection change.
#[derive(Default)]
pub struct SelectionSync {
    geometries: Vec<MapGeometry>,
    index: HashMap<String, usize>,
    filter: Option<DateFilter>,
    observer: Option<Observer>,
}

impl Debug for SelectionSync {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionSync")
            .field("geometries", &self.geometries.len())
            .field("selected", &self.snapshot().len())
            .field("filter", &self.filter)
            .finish()
    }
}

impl SelectionSync {
    /// Builds the synchronizer over a loaded feed, everything unselected and
    /// active. Items repeating an id are dropped (first occurrence wins).
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        let mut geometries = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.id) {
                warn!(id = %item.id, "duplicate item id in feed, keeping first");
                continue;
            }
            index.insert(item.id.clone(), geometries.len());
            geometries.push(MapGeometry::new(item));
        }
        Self {
            geometries,
            index,
            filter: None,
            observer: None,
        }
    }

    /// Registers the observer called with every new snapshot.
    pub fn set_observer(&mut self, observer: impl FnMut(&SelectionSnapshot) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// The loaded geometries in feed order.
    #[must_use]
    pub fn geometries(&self) -> &[MapGeometry] {
        &self.geometries
    }

    /// Number of loaded geometries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    /// Whether no geometries are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// The active date filter, if one is applied.
    #[must_use]
    pub fn filter(&self) -> Option<DateFilter> {
        self.filter
    }

    /// Style of the geometry with the given id.
    #[must_use]
    pub fn style_of(&self, id: &str) -> Option<FeatureStyle> {
        self.geometry(id).map(MapGeometry::style)
    }

    /// Current selection as an immutable snapshot, in feed order.
    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot::new(
            self.geometries
                .iter()
                .filter(|g| g.selected)
                .map(|g| g.item.clone())
                .collect(),
        )
    }

    /// Click on a geometry: toggles it between unselected and selected.
    ///
    /// Clicking a filtered-out or unknown geometry is a no-op and returns
    /// `None`; the observer is not notified.
    pub fn toggle(&mut self, id: &str) -> Option<SelectionSnapshot> {
        let slot = *self.index.get(id)?;
        let geometry = &mut self.geometries[slot];
        if !geometry.is_interactive() {
            return None;
        }
        geometry.selected = !geometry.selected;
        Some(self.emit())
    }

    /// Rectangle draw: additively selects every active geometry whose bounds
    /// intersect `rect`.
    ///
    /// Idempotent for already-selected geometries; geometries outside the
    /// rectangle (or without usable bounds) are untouched — never an
    /// implicit deselect.
    pub fn select_within(&mut self, rect: &Bounds) -> SelectionSnapshot {
        for geometry in &mut self.geometries {
            if !geometry.is_interactive() {
                continue;
            }
            if let Some(bounds) = geometry.bounds
                && geo::intersects(&bounds, rect)
            {
                geometry.selected = true;
            }
        }
        self.emit()
    }

    /// Applies a date filter.
    ///
    /// The entire selection is cleared first, then every geometry with a
    /// parseable datetime is partitioned: outside `[start, end]` (inclusive,
    /// calendar days) becomes filtered out and non-interactive, inside stays
    /// active with the default style. Geometries without a datetime are left
    /// active at the default style.
    pub fn apply_date_filter(&mut self, filter: DateFilter) -> SelectionSnapshot {
        self.filter = Some(filter);
        for geometry in &mut self.geometries {
            geometry.selected = false;
            geometry.filtered_out = match geometry.date {
                Some(date) => !filter.matches(date),
                None => false,
            };
        }
        self.emit()
    }

    /// Removes the date filter: every geometry returns to the active,
    /// default-styled state and the selection is cleared.
    pub fn reset_filter(&mut self) -> SelectionSnapshot {
        self.filter = None;
        for geometry in &mut self.geometries {
            geometry.selected = false;
            geometry.filtered_out = false;
        }
        self.emit()
    }

    /// Clears the selection without touching the filter: active geometries
    /// return to the default style, filtered-out geometries keep the
    /// disabled style.
    pub fn clear_selection(&mut self) -> SelectionSnapshot {
        for geometry in &mut self.geometries {
            geometry.selected = false;
        }
        self.emit()
    }

    fn geometry(&self, id: &str) -> Option<&MapGeometry> {
        self.index.get(id).map(|&slot| &self.geometries[slot])
    }

    fn emit(&mut self) -> SelectionSnapshot {
        let snapshot = self.snapshot();
        if let Some(observer) = self.observer.as_mut() {
            observer(&snapshot);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::view::style::FeatureStyle::{Default as Unstyled, Disabled, Selected};

    fn item(id: &str, datetime: Option<&str>, bbox: Option<[f64; 4]>) -> Item {
        let mut value = serde_json::json!({"id": id, "properties": {}});
        if let Some(datetime) = datetime {
            value["properties"]["datetime"] = serde_json::json!(datetime);
        }
        if let Some(bbox) = bbox {
            value["bbox"] = serde_json::json!(bbox);
        }
        serde_json::from_value(value).unwrap()
    }

    /// Three items on distinct days: `a` and `b` side by side, `c` far east.
    fn sync() -> SelectionSync {
        SelectionSync::new(vec![
            item(
                "a",
                Some("2021-06-01T10:00:00Z"),
                Some([-130.0, 50.0, -128.0, 52.0]),
            ),
            item(
                "b",
                Some("2021-06-15T10:00:00Z"),
                Some([-127.0, 50.0, -125.0, 52.0]),
            ),
            item(
                "c",
                Some("2021-07-01T10:00:00Z"),
                Some([-110.0, 55.0, -108.0, 57.0]),
            ),
        ])
    }

    fn june() -> DateFilter {
        DateFilter::parse(Some("2021-06-01"), Some("2021-06-30")).unwrap()
    }

    #[rstest]
    #[case(1, true)]
    #[case(2, false)]
    #[case(3, true)]
    #[case(4, false)]
    fn test_click_toggle_parity(#[case] clicks: usize, #[case] selected: bool) {
        let mut sync = sync();
        for _ in 0..clicks {
            sync.toggle("a").unwrap();
        }
        assert_eq!(sync.style_of("a"), Some(if selected { Selected } else { Unstyled }));
        assert_eq!(sync.snapshot().len(), usize::from(selected));
    }

    #[test]
    fn test_click_unknown_id_is_noop() {
        let mut sync = sync();
        assert!(sync.toggle("nope").is_none());
        assert!(sync.snapshot().is_empty());
    }

    #[test]
    fn test_click_filtered_out_is_noop() {
        let mut sync = sync();
        sync.apply_date_filter(june());
        assert_eq!(sync.style_of("c"), Some(Disabled));
        assert!(sync.toggle("c").is_none());
        assert_eq!(sync.style_of("c"), Some(Disabled));
        assert!(sync.snapshot().is_empty());
    }

    #[test]
    fn test_rectangle_select_is_additive_and_monotonic() {
        let mut sync = sync();
        sync.toggle("c").unwrap();

        // covers a and b, far from c
        let before: Vec<String> = sync.snapshot().ids().map(String::from).collect();
        let after = sync.select_within(&Bounds::new(-131.0, 49.0, -126.0, 53.0));

        let ids: Vec<&str> = after.ids().collect();
        assert_eq!(ids, ["a", "b", "c"]);
        for id in before {
            assert!(after.position_of(&id).is_some(), "{id} lost by draw");
        }

        // drawing the same rectangle again changes nothing
        let again = sync.select_within(&Bounds::new(-131.0, 49.0, -126.0, 53.0));
        assert_eq!(again, after);
    }

    #[test]
    fn test_rectangle_skips_filtered_out_and_boundless() {
        let mut sync = SelectionSync::new(vec![
            item("dated", Some("2021-06-01T00:00:00Z"), Some([0.0, 0.0, 1.0, 1.0])),
            item("late", Some("2022-01-01T00:00:00Z"), Some([0.0, 0.0, 1.0, 1.0])),
            item("boundless", Some("2021-06-01T00:00:00Z"), None),
        ]);
        sync.apply_date_filter(june());

        let snapshot = sync.select_within(&Bounds::new(-10.0, -10.0, 10.0, 10.0));
        let ids: Vec<&str> = snapshot.ids().collect();
        assert_eq!(ids, ["dated"]);
        assert_eq!(sync.style_of("late"), Some(Disabled));
        assert_eq!(sync.style_of("boundless"), Some(Unstyled));
    }

    #[test]
    fn test_filter_clears_selection_and_partitions_styles() {
        let mut sync = sync();
        sync.toggle("a").unwrap();
        sync.toggle("c").unwrap();

        let snapshot = sync.apply_date_filter(june());
        assert!(snapshot.is_empty());

        // a (June 1) and b (June 15) are in range, inclusive bounds; c is out
        assert_eq!(sync.style_of("a"), Some(Unstyled));
        assert_eq!(sync.style_of("b"), Some(Unstyled));
        assert_eq!(sync.style_of("c"), Some(Disabled));

        for geometry in sync.geometries() {
            let in_range = geometry
                .item()
                .content_date()
                .is_some_and(|d| june().matches(d));
            assert_eq!(geometry.is_interactive(), in_range);
        }
    }

    #[test]
    fn test_filter_spares_items_without_datetime() {
        let mut sync = SelectionSync::new(vec![
            item("undated", None, Some([0.0, 0.0, 1.0, 1.0])),
            item("garbled", Some("yesterday"), Some([0.0, 0.0, 1.0, 1.0])),
        ]);
        sync.apply_date_filter(june());
        assert_eq!(sync.style_of("undated"), Some(Unstyled));
        assert_eq!(sync.style_of("garbled"), Some(Unstyled));
    }

    #[test]
    fn test_reset_filter_reactivates_everything() {
        let mut sync = sync();
        sync.apply_date_filter(june());
        sync.toggle("a").unwrap();

        let snapshot = sync.reset_filter();
        assert!(snapshot.is_empty());
        assert_eq!(sync.filter(), None);
        for id in ["a", "b", "c"] {
            assert_eq!(sync.style_of(id), Some(Unstyled));
        }
    }

    #[test]
    fn test_clear_selection_keeps_disabled_style() {
        let mut sync = sync();
        sync.apply_date_filter(june());
        sync.toggle("a").unwrap();
        sync.toggle("b").unwrap();

        let snapshot = sync.clear_selection();
        assert!(snapshot.is_empty());
        assert_eq!(sync.style_of("a"), Some(Unstyled));
        assert_eq!(sync.style_of("b"), Some(Unstyled));
        assert_eq!(sync.style_of("c"), Some(Disabled)); // untouched
    }

    #[test]
    fn test_snapshot_is_in_feed_order() {
        let mut sync = sync();
        sync.toggle("c").unwrap();
        sync.toggle("a").unwrap();
        let snapshot = sync.snapshot();
        let ids: Vec<&str> = snapshot.ids().collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_observer_sees_every_change() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let mut sync = sync();
        let sink = Rc::clone(&seen);
        sync.set_observer(move |snapshot| sink.borrow_mut().push(snapshot.len()));

        sync.toggle("a").unwrap();
        sync.select_within(&Bounds::new(-131.0, 49.0, -126.0, 53.0));
        sync.clear_selection();
        assert!(sync.toggle("nope").is_none()); // no-op, not observed

        assert_eq!(*seen.borrow(), vec![1, 2, 0]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let sync = SelectionSync::new(vec![
            item("dup", Some("2021-06-01T00:00:00Z"), None),
            item("dup", Some("2022-01-01T00:00:00Z"), None),
        ]);
        assert_eq!(sync.len(), 1);
        assert_eq!(
            sync.geometries()[0].item().content_date(),
            Some(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap())
        );
    }
}
