//! Common utilities for the floatcol crates.
//!
//! This crate provides shared infrastructure used by the layout core and the CLI:
//! - **Warning System** - deduplicated reports of accepted-but-unsupported configuration

pub mod warning;
