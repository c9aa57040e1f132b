//! In-memory image types

use crate::image_pipeline::common::error::{ConversionError, Result};

/// A decoded image with interleaved 16-bit samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Samples per pixel (1 for gray, 3 for RGB)
    pub channels: usize,
    /// Pixel data, row-major, channels interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u16>,
}

impl ImageData {
    /// Wraps an interleaved buffer, checking that its length matches the shape.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u16>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        if channels != 1 && channels != 3 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} channels per pixel",
                channels
            )));
        }
        if data.len() != width * height * channels {
            return Err(ConversionError::UnsupportedFormat(format!(
                "expected {} samples for {}x{}x{}, got {}",
                width * height * channels,
                width,
                height,
                channels,
                data.len()
            )));
        }
        Ok(Self { width, height, channels, data })
    }

    pub fn gray(width: usize, height: usize, data: Vec<u16>) -> Result<Self> {
        Self::new(width, height, 1, data)
    }

    pub fn rgb(width: usize, height: usize, data: Vec<u16>) -> Result<Self> {
        Self::new(width, height, 3, data)
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns the samples of one channel as a contiguous plane.
    pub fn channel(&self, channel: usize) -> Vec<u16> {
        self.data
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .copied()
            .collect()
    }
}

/// A single color plane of 16-bit samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPlane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u16>,
}

impl ColorPlane {
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.data[y * self.width + x]
    }
}
