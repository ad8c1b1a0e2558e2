//! Parsing functions for CLI arguments.

mod geometry;

pub use geometry::{parse_pad_anchor, parse_target_size};
