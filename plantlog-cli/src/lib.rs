//! Plantlog CLI support library
//!
//! Argument parsing and output formatting used by the `plantlog` binary.

pub mod input;
pub mod render;
