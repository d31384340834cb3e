#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

/// STAC catalog client and data model
pub mod catalog;

/// Longitude/latitude bounds math
pub mod geo;

/// Map view state: selection synchronization, viewport, detail projection
pub mod view;

mod bootstrap;
pub use bootstrap::{MapView, bootstrap_map};
