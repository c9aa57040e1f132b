use rayon::prelude::*;
use tracing::{error, info, instrument};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    raw::{BrcmReader, ColorPlanes, RawImageReader, SensorGeometry},
    tiff::{TiffWriter, StandardTiffWriter, ConversionConfig},
};

/// Name of the directory created next to the captures by [`RawToTiffPipeline::convert_directory`]
pub const RAW_OUTPUT_DIR: &str = "raws";
const CAPTURE_EXTENSION: &str = "jpg";

/// Outcome of converting a directory of captures
#[derive(Debug, Default)]
pub struct BatchReport {
    /// TIFF files written
    pub converted: Vec<PathBuf>,
    /// Captures below the minimum size
    pub skipped: Vec<PathBuf>,
    /// Captures that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

enum FileOutcome {
    Converted(PathBuf),
    Skipped(PathBuf),
    Failed(PathBuf, String),
}

pub struct RawToTiffPipeline<R: RawImageReader, W: TiffWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl RawToTiffPipeline<BrcmReader, StandardTiffWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: BrcmReader::default(),
            writer: StandardTiffWriter,
            config,
        }
    }

    pub fn with_geometry(geometry: SensorGeometry, config: ConversionConfig) -> Result<Self> {
        Ok(Self {
            reader: BrcmReader::new(geometry)?,
            writer: StandardTiffWriter,
            config,
        })
    }
}

impl<R: RawImageReader, W: TiffWriter> RawToTiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Locates and unpacks the raw region of a complete capture.
    pub fn decode(&self, file_data: &[u8]) -> Result<ColorPlanes> {
        let region = self.reader.extract_raw_region(file_data)?;
        self.reader.read_raw(region)
    }

    /// Decodes a capture and writes it to `output` as an RGB TIFF.
    #[instrument(skip(self, file_data, output), fields(input_size = file_data.len()))]
    pub fn convert(&self, file_data: &[u8], output: &mut dyn Write) -> Result<ColorPlanes> {
        info!("Starting raw to TIFF conversion");

        let planes = {
            let _span = tracing::info_span!("unpack_raw").entered();
            self.decode(file_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions", 
                width = planes.width(), 
                height = planes.height()
            ).entered();
            self.validate_dimensions(planes.width(), planes.height())?;
        }

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_tiff(&planes.to_rgb(), output, &self.config)?;
        }

        info!(
            width = planes.width(),
            height = planes.height(),
            "Conversion complete"
        );
        Ok(planes)
    }

    /// Converts one capture. The output extension is always replaced by `.tiff`;
    /// the path actually written is returned.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref().with_extension("tiff");

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut encoded = Vec::new();
        self.convert(&input_data, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(&output_path, &encoded).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        info!("Wrote file {}", output_path.display());
        Ok(output_path)
    }

    fn convert_capture(&self, capture: &Path, output_dir: &Path) -> FileOutcome {
        let size = match std::fs::metadata(capture) {
            Ok(metadata) => metadata.len(),
            Err(e) => return FileOutcome::Failed(capture.to_path_buf(), e.to_string()),
        };

        if size < self.config.min_input_size {
            info!(
                "{} is too small to contain raw data ({} bytes), skipping",
                capture.display(),
                size
            );
            return FileOutcome::Skipped(capture.to_path_buf());
        }

        let target = match capture.file_name() {
            Some(name) => output_dir.join(name),
            None => return FileOutcome::Failed(capture.to_path_buf(), "no file name".to_string()),
        };

        match self.convert_file(capture, target) {
            Ok(written) => FileOutcome::Converted(written),
            Err(e) => {
                error!("Failed to convert {}: {}", capture.display(), e);
                FileOutcome::Failed(capture.to_path_buf(), e.to_string())
            }
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}

impl<R, W> RawToTiffPipeline<R, W>
where
    R: RawImageReader + Sync,
    W: TiffWriter + Sync,
{
    /// Converts every `*.jpg` capture in `dir` into `dir/raws/<name>.tiff`.
    ///
    /// Fails up front if `raws` already exists. Captures below the configured
    /// minimum size are skipped; per-file failures are logged and reported
    /// without stopping the batch.
    #[instrument(skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn convert_directory<P: AsRef<Path>>(&self, dir: P) -> Result<BatchReport> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ConversionError::InputReadError(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let output_dir = dir.join(RAW_OUTPUT_DIR);
        if output_dir.exists() {
            return Err(ConversionError::OutputWriteError(format!(
                "{} already exists, assuming already converted",
                output_dir.display()
            )));
        }
        std::fs::create_dir(&output_dir)?;
        info!("Created dir {}", output_dir.display());

        let mut captures: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(CAPTURE_EXTENSION)
            })
            .collect();
        captures.sort();

        let outcomes: Vec<FileOutcome> = captures
            .par_iter()
            .map(|capture| self.convert_capture(capture, &output_dir))
            .collect();

        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Converted(path) => report.converted.push(path),
                FileOutcome::Skipped(path) => report.skipped.push(path),
                FileOutcome::Failed(path, reason) => report.failed.push((path, reason)),
            }
        }

        info!(
            converted = report.converted.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Done! Converted {} files",
            report.converted.len()
        );
        Ok(report)
    }
}
