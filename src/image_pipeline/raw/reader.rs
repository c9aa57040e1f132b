use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::ColorPlanes;

pub trait RawImageReader {
    /// Locates the raw region inside a complete capture file.
    fn extract_raw_region<'a>(&self, file_data: &'a [u8]) -> Result<&'a [u8]>;

    /// Decodes a raw region into color planes.
    fn read_raw(&self, data: &[u8]) -> Result<ColorPlanes>;
}
