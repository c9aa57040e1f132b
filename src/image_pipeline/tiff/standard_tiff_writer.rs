use std::io::Write;
use tracing::debug;
use tiff::encoder::colortype::{Gray16, RGB16};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Predictor;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::common::types::ImageData;
use crate::image_pipeline::tiff::types::{ConversionConfig, TiffCompression};
use crate::image_pipeline::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

impl TiffWriter for StandardTiffWriter {
    fn write_tiff(&self, image: &ImageData, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}x{}", image.width, image.height, image.channels);
        
        let mut buffer = Vec::new();
        
        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };
        
        {
            let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
                .map_err(|e| ConversionError::EncodeError(e.to_string()))?
                .with_compression(compression);
        
            if let Some(predictor_val) = config.predictor {
                let predictor = match predictor_val {
                    2 => Predictor::Horizontal,
                    _ => Predictor::None,
                };
                encoder = encoder.with_predictor(predictor);
            }

            let (width, height) = (image.width as u32, image.height as u32);
            let written = match image.channels {
                1 => encoder.write_image::<Gray16>(width, height, &image.data),
                3 => encoder.write_image::<RGB16>(width, height, &image.data),
                n => {
                    return Err(ConversionError::UnsupportedFormat(format!(
                        "cannot encode {} channel image",
                        n
                    )));
                }
            };
            written.map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        }

        output.write_all(&buffer)?;
        
        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
