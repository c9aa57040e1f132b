use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::ImageData;

pub trait TiffReader {
    /// Decodes a TIFF file held in memory into 16-bit samples.
    fn read_tiff(&self, data: &[u8]) -> Result<ImageData>;
}
