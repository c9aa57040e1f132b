//! TIFF decoding for excitation images and measurement inputs.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::ImageData;
use crate::image_pipeline::tiff::reader::TiffReader;

/// Reads 8- or 16-bit gray/RGB TIFFs. 8-bit samples are widened to 16 bits.
pub struct StandardTiffReader;

impl TiffReader for StandardTiffReader {
    fn read_tiff(&self, data: &[u8]) -> Result<ImageData> {
        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;
        let (width, height) = (width as usize, height as usize);

        let samples: Vec<u16> = match decoder
            .read_image()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?
        {
            DecodingResult::U16(values) => values,
            DecodingResult::U8(values) => values.iter().map(|&v| (v as u16) << 8).collect(),
            _ => {
                return Err(ConversionError::UnsupportedFormat(
                    "only 8- and 16-bit unsigned TIFF samples are supported".to_string(),
                ));
            }
        };

        let pixels = width * height;
        if pixels == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        let channels = samples.len() / pixels;
        debug!("Decoded TIFF: {}x{}x{}", width, height, channels);

        ImageData::new(width, height, channels, samples)
    }
}
