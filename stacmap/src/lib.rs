#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![forbid(unsafe_code)]

pub mod args;
pub mod config;
pub mod logging;
pub mod srv;

mod error;
pub use error::{StacmapError, StacmapResult};
