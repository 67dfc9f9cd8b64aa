//! Common utilities for the MText layout engine.
//!
//! This crate provides shared infrastructure used by the layout crates:
//! - **Warning System** - deduplicated warnings for missing fonts and glyphs

pub mod warning;
