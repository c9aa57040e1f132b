use tracing::{info, instrument};
use std::path::{Path, PathBuf};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    common::types::ImageData,
    mixing::{ChannelMixer, ExcitationImage, MixOutput, MixingConfig},
    tiff::{ConversionConfig, StandardTiffReader, StandardTiffWriter, TiffCompression, TiffReader, TiffWriter},
};

/// Configuration for building a pseudo-color composite from a directory of excitation images
#[derive(Debug, Clone)]
pub struct PseudocolorConfig {
    /// Input and output weight tables
    pub mixing: MixingConfig,
    /// Extension of the excitation images; a leading dot is ignored
    pub extension: String,
    /// Also write each hidden plane as `<output stem>_<wavelength>.tif`
    pub write_hidden_planes: bool,
    /// Compression of the written composite
    pub compression: TiffCompression,
}

impl Default for PseudocolorConfig {
    fn default() -> Self {
        Self {
            mixing: MixingConfig::default(),
            extension: "tiff".to_string(),
            write_hidden_planes: false,
            compression: TiffCompression::None,
        }
    }
}

/// Extracts the excitation label from names like `spot_450_003.tiff`: the
/// second-to-last underscore-delimited segment.
pub fn wavelength_from_filename(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ConversionError::ConfigurationError(format!("invalid file name: {}", path.display())))?;

    let segments: Vec<&str> = name.split('_').collect();
    match segments.len() {
        n if n >= 2 && !segments[n - 2].is_empty() => Ok(segments[n - 2].to_string()),
        _ => Err(ConversionError::ConfigurationError(format!(
            "cannot find an excitation wavelength in file name {}",
            name
        ))),
    }
}

pub struct PseudocolorPipeline<R: TiffReader, W: TiffWriter> {
    reader: R,
    writer: W,
    mixer: ChannelMixer,
    config: PseudocolorConfig,
}

impl PseudocolorPipeline<StandardTiffReader, StandardTiffWriter> {
    pub fn new(config: PseudocolorConfig) -> Result<Self> {
        Self::with_custom(StandardTiffReader, StandardTiffWriter, config)
    }
}

impl<R: TiffReader, W: TiffWriter> PseudocolorPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: PseudocolorConfig) -> Result<Self> {
        Ok(Self {
            reader,
            writer,
            mixer: ChannelMixer::new(&config.mixing)?,
            config,
        })
    }

    pub fn config(&self) -> &PseudocolorConfig {
        &self.config
    }

    fn tiff_config(&self) -> ConversionConfig {
        ConversionConfig::builder()
            .compression(self.config.compression)
            .build()
    }

    /// Reads every excitation image in `dir`, in file name order.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub fn load_directory(&self, dir: &Path) -> Result<Vec<ExcitationImage>> {
        if !dir.is_dir() {
            return Err(ConversionError::InputReadError(format!(
                "{} does not exist",
                dir.display()
            )));
        }

        let extension = self.config.extension.trim_start_matches('.');
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(extension)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(ConversionError::EmptyInputError(format!(
                "no .{} files in {}",
                extension,
                dir.display()
            )));
        }

        files
            .iter()
            .map(|path| {
                let wavelength = wavelength_from_filename(path)?;
                let data = std::fs::read(path).map_err(|e| {
                    ConversionError::InputReadError(format!("{}: {}", path.display(), e))
                })?;
                let image = self.reader.read_tiff(&data)?;
                info!(wavelength = %wavelength, "Loaded {}", path.display());
                Ok(ExcitationImage::new(wavelength, image))
            })
            .collect()
    }

    pub fn mix(&self, images: &[ExcitationImage]) -> Result<MixOutput> {
        if self.config.write_hidden_planes {
            self.mixer.mix_with_hidden(images)
        } else {
            self.mixer.mix(images)
        }
    }

    fn write_image(&self, image: &ImageData, path: &Path) -> Result<()> {
        let mut encoded = Vec::new();
        self.writer.write_tiff(image, &mut encoded, &self.tiff_config())?;
        std::fs::write(path, &encoded).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", path.display(), e))
        })
    }

    /// Mixes the excitation images of `dir` and writes the composite to `dir/output_name`.
    #[instrument(skip(self, dir, output_name))]
    pub fn run<P: AsRef<Path>>(&self, dir: P, output_name: &str) -> Result<MixOutput> {
        let dir = dir.as_ref();
        info!("Working in directory {}", dir.display());

        let images = self.load_directory(dir)?;
        let output = {
            let _span = tracing::info_span!("mix", images = images.len()).entered();
            self.mix(&images)?
        };

        info!(residual_norm = output.residual_norm, "Composite rounding residual");

        let output_path = dir.join(output_name);
        self.write_image(&output.composite, &output_path)?;
        info!("Wrote file {}", output_path.display());

        if !output.hidden.is_empty() {
            let stem = Path::new(output_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(output_name);
            for plane in &output.hidden {
                let path = dir.join(format!("{}_{}.tif", stem, plane.wavelength));
                self.write_image(&plane.image, &path)?;
                info!("Wrote hidden plane {}", path.display());
            }
        }

        Ok(output)
    }
}
