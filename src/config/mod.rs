//! Configuration module - settings and preset tables

pub mod catalog;
pub mod settings;

pub use catalog::{AspectRatio, Catalog, StylePreset, DEFAULT_ASPECT_RATIO, DEFAULT_STYLE};
pub use settings::*;
