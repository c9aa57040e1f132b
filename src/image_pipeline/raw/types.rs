//! RAW sensor data types

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::{ColorPlane, ImageData};

/// Size of the raw block appended to the end of a JPEG+RAW capture
pub const DEFAULT_RAW_REGION_LEN: usize = 0x11D81FF + 1;
pub const DEFAULT_HEADER_SIZE: usize = 32768;
pub const DEFAULT_BYTES_PER_LINE: usize = 6112;
pub const DEFAULT_USED_BYTES_PER_LINE: usize = 6084;
/// Output geometry is half the 4056x3040 sensor: one sample per 2x2 Bayer cell
pub const DEFAULT_WIDTH: usize = 4056 / 2;
pub const DEFAULT_HEIGHT: usize = 3040 / 2;
pub const BRCM_MAGIC: [u8; 4] = *b"BRCM";

/// Layout of the packed 12-bit raw region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorGeometry {
    /// Number of bytes, counted from the end of the file, that make up the raw region
    pub raw_region_len: usize,
    /// Bytes skipped at the start of the raw region before the first scanline
    pub header_size: usize,
    /// Stride between physical scanlines
    pub bytes_per_line: usize,
    /// Bytes of each scanline that carry samples (the rest is padding)
    pub used_bytes_per_line: usize,
    /// Output plane width
    pub width: usize,
    /// Output plane height (half the number of physical scanlines)
    pub height: usize,
    /// Tag expected at the start of the raw region
    pub magic: [u8; 4],
}

impl Default for SensorGeometry {
    fn default() -> Self {
        Self {
            raw_region_len: DEFAULT_RAW_REGION_LEN,
            header_size: DEFAULT_HEADER_SIZE,
            bytes_per_line: DEFAULT_BYTES_PER_LINE,
            used_bytes_per_line: DEFAULT_USED_BYTES_PER_LINE,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            magic: BRCM_MAGIC,
        }
    }
}

impl SensorGeometry {
    /// Bytes of the raw region actually touched by a decode.
    pub fn required_len(&self) -> usize {
        self.header_size + (2 * self.height - 1) * self.bytes_per_line + self.used_bytes_per_line
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConversionError::InvalidDimensions(self.width, self.height));
        }
        // 3 packed bytes carry one sample of each of the line's two colors
        if self.used_bytes_per_line != 3 * self.width {
            return Err(ConversionError::ConfigurationError(format!(
                "used_bytes_per_line ({}) must be 3 * width ({})",
                self.used_bytes_per_line, self.width
            )));
        }
        if self.used_bytes_per_line > self.bytes_per_line {
            return Err(ConversionError::ConfigurationError(format!(
                "used_bytes_per_line ({}) exceeds bytes_per_line ({})",
                self.used_bytes_per_line, self.bytes_per_line
            )));
        }
        if self.header_size < self.magic.len() || self.required_len() > self.raw_region_len {
            return Err(ConversionError::ConfigurationError(format!(
                "geometry needs {} bytes but the raw region is {} bytes",
                self.required_len(),
                self.raw_region_len
            )));
        }
        Ok(())
    }
}

/// The three color planes decoded from one raw region
#[derive(Debug, Clone)]
pub struct ColorPlanes {
    pub red: ColorPlane,
    /// Sum of the two green sub-samples, each scaled by 8
    pub green: ColorPlane,
    pub blue: ColorPlane,
}

impl ColorPlanes {
    pub fn width(&self) -> usize {
        self.red.width
    }

    pub fn height(&self) -> usize {
        self.red.height
    }

    /// Interleaves the planes into a single RGB image.
    pub fn to_rgb(&self) -> ImageData {
        let data = self
            .red
            .data
            .iter()
            .zip(&self.green.data)
            .zip(&self.blue.data)
            .flat_map(|((&r, &g), &b)| [r, g, b])
            .collect();

        ImageData {
            width: self.width(),
            height: self.height(),
            channels: 3,
            data,
        }
    }
}
