//! Decoder for the packed 12-bit raw block that Raspberry Pi cameras append
//! to JPEG captures.
//!
//! The block starts with a `BRCM` tagged header followed by fixed-stride
//! scanlines. Each scanline packs two 12-bit samples into three bytes:
//!
//! ```text
//!  byte 0   byte 1   byte 2
//! AAAAAAAA BBBBBBBB BBBBAAAA
//! ```
//!
//! Even scanlines carry green/red sample pairs, odd scanlines blue/green.
//! Every 2x2 Bayer cell is reduced to one output pixel, so the planes are
//! half the sensor resolution in each direction.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::ColorPlane;
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::{ColorPlanes, SensorGeometry};

/// Raw region reader parameterised by sensor geometry.
#[derive(Debug, Clone)]
pub struct BrcmReader {
    geometry: SensorGeometry,
}

impl Default for BrcmReader {
    fn default() -> Self {
        Self {
            geometry: SensorGeometry::default(),
        }
    }
}

impl BrcmReader {
    pub fn new(geometry: SensorGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self { geometry })
    }

    pub fn geometry(&self) -> &SensorGeometry {
        &self.geometry
    }
}

/// Splits three packed bytes into the two 12-bit samples they hold.
#[inline]
fn unpack_pair(bytes: &[u8]) -> (u16, u16) {
    let low = bytes[2] as u16;
    let first = (bytes[0] as u16) << 4 | (low & 0x0F);
    let second = (bytes[1] as u16) << 4 | ((low >> 4) & 0x0F);
    (first, second)
}

impl RawImageReader for BrcmReader {
    fn extract_raw_region<'a>(&self, file_data: &'a [u8]) -> Result<&'a [u8]> {
        let region_len = self.geometry.raw_region_len;
        if file_data.len() < region_len {
            return Err(ConversionError::FormatError(format!(
                "file is {} bytes, too small to hold a {} byte raw region",
                file_data.len(),
                region_len
            )));
        }
        Ok(&file_data[file_data.len() - region_len..])
    }

    /// Decodes the raw region into red, green and blue planes.
    ///
    /// Red and blue are scaled from 12 to 16 bits by a left shift of 4. The
    /// two greens of each cell are scaled by 8 and summed, which averages
    /// them at 16-bit scale.
    fn read_raw(&self, data: &[u8]) -> Result<ColorPlanes> {
        let g = &self.geometry;

        if data.len() < g.magic.len() || data[..g.magic.len()] != g.magic {
            return Err(ConversionError::FormatError(format!(
                "raw data header not found (expected {:?})",
                String::from_utf8_lossy(&g.magic)
            )));
        }
        if data.len() < g.required_len() {
            return Err(ConversionError::FormatError(format!(
                "raw region truncated: {} bytes, need {}",
                data.len(),
                g.required_len()
            )));
        }

        debug!("Unpacking raw region, {} bytes -> {}x{}", data.len(), g.width, g.height);

        let pixels = g.width * g.height;
        let mut red = vec![0u16; pixels];
        let mut green = vec![0u16; pixels];
        let mut blue = vec![0u16; pixels];

        let payload = &data[g.header_size..];
        for row in 0..g.height {
            let even_start = 2 * row * g.bytes_per_line;
            let odd_start = even_start + g.bytes_per_line;
            let even = &payload[even_start..even_start + g.used_bytes_per_line];
            let odd = &payload[odd_start..odd_start + g.used_bytes_per_line];

            let out = row * g.width..(row + 1) * g.width;
            let cells = even.chunks_exact(3).zip(odd.chunks_exact(3));
            for (((r, gr), b), (even_px, odd_px)) in red[out.clone()]
                .iter_mut()
                .zip(&mut green[out.clone()])
                .zip(&mut blue[out])
                .zip(cells)
            {
                let (green1, red_sample) = unpack_pair(even_px);
                let (blue_sample, green2) = unpack_pair(odd_px);
                *r = red_sample << 4;
                *b = blue_sample << 4;
                *gr = (green1 << 3) + (green2 << 3);
            }
        }

        let plane = |data| ColorPlane {
            width: g.width,
            height: g.height,
            data,
        };
        Ok(ColorPlanes {
            red: plane(red),
            green: plane(green),
            blue: plane(blue),
        })
    }
}
