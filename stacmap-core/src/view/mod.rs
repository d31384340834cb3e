//! Map view state: selection synchronization, viewport, detail projection.
//!
//! Everything in this module is single-threaded, event-driven state. Inputs
//! are plain method calls (a click, a drawn rectangle, a filter change);
//! outputs are per-geometry styles and immutable selection snapshots. No
//! framework reactivity and no module-level mutable state.

mod copy;
mod detail;
mod filter;
mod selection;
mod style;
mod sync;
mod viewport;

pub use copy::{COPY_ACK_TTL, CopyFeedback};
pub use detail::{AssetEntry, DetailPanel, EMPTY_PROMPT, FeatureDetails};
pub use filter::DateFilter;
pub use selection::SelectionSnapshot;
pub use style::{FeatureStyle, PathStyle, StylePalette};
pub use sync::{MapGeometry, SelectionSync};
pub use viewport::Viewport;
