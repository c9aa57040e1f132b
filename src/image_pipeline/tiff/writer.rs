use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::ImageData;
use crate::image_pipeline::tiff::types::ConversionConfig;

pub trait TiffWriter {
    /// Encodes a gray or RGB 16-bit image into `output`.
    fn write_tiff(&self, image: &ImageData, output: &mut dyn Write, config: &ConversionConfig) -> Result<()>;
}
