//! Linear recombination of excitation images into an RGB composite.
//!
//! Each wavelength `n` is first reduced to a hidden plane by weighting its
//! color channels with column `n` of A; a gray image feeds the same sample to
//! all three weights. The hidden planes are then projected to RGB by B:
//!
//! ```text
//! Z[p, n] = sum_k A[k, n] * X_n[p, k]
//! Y[p, c] = sum_n Z[p, n] * B[n, c]
//! ```

use tracing::{debug, instrument, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::ImageData;
use crate::image_pipeline::mixing::spec::{MixingConfig, MixingMatrices};
use crate::image_pipeline::mixing::types::{ExcitationImage, MixOutput};

pub struct ChannelMixer {
    matrices: MixingMatrices,
}

/// Rounds half to even and saturates into the u16 range.
fn quantize(value: f64) -> u16 {
    value.round_ties_even().clamp(0.0, u16::MAX as f64) as u16
}

impl ChannelMixer {
    pub fn new(config: &MixingConfig) -> Result<Self> {
        Ok(Self {
            matrices: MixingMatrices::new(config)?,
        })
    }

    pub fn matrices(&self) -> &MixingMatrices {
        &self.matrices
    }

    pub fn mix(&self, images: &[ExcitationImage]) -> Result<MixOutput> {
        self.run(images, false)
    }

    /// Like [`ChannelMixer::mix`], also returning the quantized hidden planes.
    pub fn mix_with_hidden(&self, images: &[ExcitationImage]) -> Result<MixOutput> {
        self.run(images, true)
    }

    /// Assigns each image to its wavelength slot, checking labels and shapes.
    fn assign<'a>(&self, images: &'a [ExcitationImage]) -> Result<Vec<Option<&'a ImageData>>> {
        let first = images.first().ok_or_else(|| {
            ConversionError::EmptyInputError("no excitation images supplied".to_string())
        })?;
        let expected = first.image.shape();

        let mut slots: Vec<Option<&ImageData>> = vec![None; self.matrices.len()];
        for excitation in images {
            let index = self.matrices.index_of(&excitation.wavelength).ok_or_else(|| {
                ConversionError::ConfigurationError(format!(
                    "no entry in mixing tables for excitation wavelength {}",
                    excitation.wavelength
                ))
            })?;

            if excitation.image.shape() != expected {
                return Err(ConversionError::ShapeMismatchError {
                    expected,
                    found: excitation.image.shape(),
                    source_name: excitation.wavelength.clone(),
                });
            }

            if slots[index].replace(&excitation.image).is_some() {
                return Err(ConversionError::ConfigurationError(format!(
                    "more than one image for excitation wavelength {}",
                    excitation.wavelength
                )));
            }
        }

        for (label, slot) in self.matrices.labels().iter().zip(&slots) {
            if slot.is_none() {
                warn!("No image for excitation {}, treating it as dark", label);
            }
        }

        Ok(slots)
    }

    #[instrument(skip(self, images), fields(images = images.len()))]
    fn run(&self, images: &[ExcitationImage], keep_hidden: bool) -> Result<MixOutput> {
        let slots = self.assign(images)?;
        let (width, height, channels) = images[0].image.shape();
        let pixels = width * height;

        let mut composite = vec![0f64; pixels * 3];
        let mut hidden = Vec::new();

        for (n, slot) in slots.iter().enumerate() {
            let Some(image) = slot else { continue };
            let a = self.matrices.input_column(n);
            let b = self.matrices.output_row(n);

            let plane: Vec<f64> = if channels == 3 {
                image
                    .data
                    .chunks_exact(3)
                    .map(|px| a[0] * px[0] as f64 + a[1] * px[1] as f64 + a[2] * px[2] as f64)
                    .collect()
            } else {
                let gain = a.iter().sum::<f64>();
                image.data.iter().map(|&v| gain * v as f64).collect()
            };

            for (out, &z) in composite.chunks_exact_mut(3).zip(&plane) {
                out[0] += z * b[0];
                out[1] += z * b[1];
                out[2] += z * b[2];
            }

            if keep_hidden {
                let data = plane.iter().map(|&z| quantize(z)).collect();
                hidden.push(ExcitationImage::new(
                    self.matrices.labels()[n].clone(),
                    ImageData::gray(width, height, data)?,
                ));
            }
        }

        let residual_norm = composite
            .iter()
            .map(|&y| (y - y.round_ties_even()).powi(2))
            .sum::<f64>()
            .sqrt();
        debug!(residual_norm, "Composite rounding residual");

        let data = composite.iter().map(|&y| quantize(y)).collect();
        Ok(MixOutput {
            composite: ImageData::rgb(width, height, data)?,
            residual_norm,
            hidden,
        })
    }
}
