//! Input/Output operations for DMFT calculations
//!
//! This module handles logging setup and writing results tables.

mod output;

pub use output::{setup_output, write_hybridization, write_results_file};
