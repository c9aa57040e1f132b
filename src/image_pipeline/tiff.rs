//! TIFF module
//!
//! This module provides TIFF encoding with various compression options and
//! decoding of the 16-bit images consumed by mixing and measurement.

mod writer;
mod reader;
mod standard_tiff_writer;
mod standard_tiff_reader;
pub mod types;

pub use writer::TiffWriter;
pub use reader::TiffReader;
pub use standard_tiff_writer::StandardTiffWriter;
pub use standard_tiff_reader::StandardTiffReader;
pub use types::{TiffCompression, ConversionConfig, ConversionConfigBuilder, DEFAULT_MIN_INPUT_SIZE};
