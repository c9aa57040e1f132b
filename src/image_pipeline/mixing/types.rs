//! Types exchanged with the channel mixer

use crate::image_pipeline::common::types::ImageData;

/// An image captured under one excitation wavelength
#[derive(Debug, Clone)]
pub struct ExcitationImage {
    /// Wavelength label, e.g. "450"
    pub wavelength: String,
    /// Gray or RGB pixel data
    pub image: ImageData,
}

impl ExcitationImage {
    pub fn new(wavelength: impl Into<String>, image: ImageData) -> Self {
        Self {
            wavelength: wavelength.into(),
            image,
        }
    }
}

/// Result of one mixing run
#[derive(Debug, Clone)]
pub struct MixOutput {
    /// RGB composite, rounded and saturated to 16 bits
    pub composite: ImageData,
    /// Euclidean norm of the rounding error over all composite samples
    pub residual_norm: f64,
    /// Hidden planes, one per wavelength, when requested
    pub hidden: Vec<ExcitationImage>,
}
