//! RAW sensor reading module
//!
//! This module decodes the packed 12-bit raw block embedded in camera captures.

mod reader;
mod brcm_reader;
pub mod types;

pub use reader::RawImageReader;
pub use brcm_reader::BrcmReader;
pub use types::{ColorPlanes, SensorGeometry};

#[cfg(test)]
pub(crate) mod test_support;
