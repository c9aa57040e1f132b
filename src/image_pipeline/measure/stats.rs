//! Per-region, per-channel pixel statistics.

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::ImageData;
use crate::image_pipeline::measure::types::{ChannelStats, RegionMeasurement, Roi};

pub trait RegionMeasurer {
    fn measure(&self, image: &ImageData, rois: &[Roi]) -> Result<Vec<RegionMeasurement>>;
}

/// Measures rectangular regions directly on the pixel data.
pub struct PixelStatsMeasurer;

/// Computes statistics of a sample set, or `None` when it is empty. Sorts `values` in place.
pub fn channel_stats(values: &mut [u16]) -> Option<ChannelStats> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    values.sort_unstable();

    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        0.0
    };
    let median = if n % 2 == 1 {
        values[n / 2] as f64
    } else {
        (values[n / 2 - 1] as f64 + values[n / 2] as f64) / 2.0
    };

    let mut mode = values[0];
    let mut best_run = 0;
    for run in values.chunk_by(|a, b| a == b) {
        if run.len() > best_run {
            best_run = run.len();
            mode = run[0];
        }
    }

    Some(ChannelStats {
        mean,
        std,
        median,
        min: values[0],
        max: values[n - 1],
        mode,
    })
}

impl RegionMeasurer for PixelStatsMeasurer {
    fn measure(&self, image: &ImageData, rois: &[Roi]) -> Result<Vec<RegionMeasurement>> {
        rois.iter()
            .map(|roi| {
                let x_end = roi.x.saturating_add(roi.width).min(image.width);
                let y_end = roi.y.saturating_add(roi.height).min(image.height);
                if roi.x >= x_end || roi.y >= y_end {
                    return Err(ConversionError::ConfigurationError(format!(
                        "region {} does not overlap the {}x{} image",
                        roi.name, image.width, image.height
                    )));
                }

                let pixels = (x_end - roi.x) * (y_end - roi.y);
                let mut samples = vec![Vec::with_capacity(pixels); image.channels];
                for y in roi.y..y_end {
                    let start = (y * image.width + roi.x) * image.channels;
                    let end = (y * image.width + x_end) * image.channels;
                    let row = &image.data[start..end];
                    for px in row.chunks_exact(image.channels) {
                        for (channel, &v) in samples.iter_mut().zip(px) {
                            channel.push(v);
                        }
                    }
                }

                let channels = samples
                    .iter_mut()
                    .map(|s| channel_stats(s))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| {
                        ConversionError::ConfigurationError(format!("region {} has no pixels", roi.name))
                    })?;

                Ok(RegionMeasurement {
                    roi: roi.name.clone(),
                    pixels,
                    channels,
                })
            })
            .collect()
    }
}
