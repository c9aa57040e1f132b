//! Pipeline conversions module
//!
//! This module contains orchestration logic for the raw unpacking and
//! pseudo-color conversions.

mod raw_to_tiff;
mod pseudocolor;

#[cfg(test)]
mod tests;

pub use raw_to_tiff::{BatchReport, RawToTiffPipeline, RAW_OUTPUT_DIR};
pub use pseudocolor::{wavelength_from_filename, PseudocolorConfig, PseudocolorPipeline};
