use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::{ColorPlane, ImageData};
use crate::image_pipeline::conversions::{
    wavelength_from_filename, PseudocolorConfig, PseudocolorPipeline, RawToTiffPipeline,
};
use crate::image_pipeline::mixing::MixingSpec;
use crate::image_pipeline::raw::test_support::{build_capture, small_geometry};
use crate::image_pipeline::raw::{ColorPlanes, RawImageReader};
use crate::image_pipeline::tiff::{
    ConversionConfig, StandardTiffReader, StandardTiffWriter, TiffCompression, TiffReader, TiffWriter,
};

struct MockReader {
    should_fail: bool,
    width: usize,
}

impl RawImageReader for MockReader {
    fn extract_raw_region<'a>(&self, file_data: &'a [u8]) -> Result<&'a [u8]> {
        Ok(file_data)
    }

    fn read_raw(&self, _data: &[u8]) -> Result<ColorPlanes> {
        if self.should_fail {
            return Err(ConversionError::FormatError("Mock decode error".to_string()));
        }
        let plane = |value| ColorPlane {
            width: self.width,
            height: 2,
            data: vec![value; self.width * 2],
        };
        Ok(ColorPlanes {
            red: plane(16),
            green: plane(32),
            blue: plane(48),
        })
    }
}

struct MockWriter {
    should_fail: bool,
    written_data: Arc<Mutex<Vec<ImageData>>>,
}

impl TiffWriter for MockWriter {
    fn write_tiff(&self, image: &ImageData, _output: &mut dyn Write, _config: &ConversionConfig) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        self.written_data.lock().unwrap().push(image.clone());
        Ok(())
    }
}

fn mock_pipeline(
    reader_fails: bool,
    writer_fails: bool,
    width: usize,
    config: ConversionConfig,
) -> (RawToTiffPipeline<MockReader, MockWriter>, Arc<Mutex<Vec<ImageData>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let pipeline = RawToTiffPipeline::with_custom(
        MockReader { should_fail: reader_fails, width },
        MockWriter { should_fail: writer_fails, written_data: written.clone() },
        config,
    );
    (pipeline, written)
}

#[test]
fn test_successful_conversion() {
    let (pipeline, written) = mock_pipeline(false, false, 3, ConversionConfig::default());

    let mut output = Vec::new();
    let planes = pipeline.convert(b"fake capture", &mut output).unwrap();

    assert_eq!(planes.width(), 3);
    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].shape(), (3, 2, 3));
    assert_eq!(&written[0].data[..3], &[16, 32, 48]);
}

#[test]
fn test_reader_failure() {
    let (pipeline, written) = mock_pipeline(true, false, 3, ConversionConfig::default());

    let mut output = Vec::new();
    let result = pipeline.convert(b"fake capture", &mut output);

    assert!(matches!(result, Err(ConversionError::FormatError(_))));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_writer_failure() {
    let (pipeline, _) = mock_pipeline(false, true, 3, ConversionConfig::default());

    let mut output = Vec::new();
    let result = pipeline.convert(b"fake capture", &mut output);

    assert!(matches!(result, Err(ConversionError::EncodeError(_))));
}

#[test]
fn test_dimension_validation() {
    let (pipeline, _) = mock_pipeline(false, false, 0, ConversionConfig::default());
    let result = pipeline.convert(b"fake capture", &mut Vec::new());
    assert!(matches!(result, Err(ConversionError::InvalidDimensions(0, 2))));

    let config = ConversionConfig::builder().validate_dimensions(false).build();
    let (pipeline, written) = mock_pipeline(false, false, 0, config);
    assert!(pipeline.convert(b"fake capture", &mut Vec::new()).is_ok());
    assert_eq!(written.lock().unwrap().len(), 1);
}

fn small_pipeline(min_input_size: u64) -> RawToTiffPipeline<crate::image_pipeline::raw::BrcmReader, StandardTiffWriter> {
    let config = ConversionConfig::builder()
        .compression(TiffCompression::Lzw)
        .min_input_size(min_input_size)
        .build();
    RawToTiffPipeline::with_geometry(small_geometry(), config).unwrap()
}

#[test]
fn test_convert_file_writes_rgb_tiff() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.jpg");
    std::fs::write(&input, build_capture(&small_geometry(), 64)).unwrap();

    let pipeline = small_pipeline(0);
    let written = pipeline.convert_file(&input, dir.path().join("capture.jpg")).unwrap();
    assert_eq!(written, dir.path().join("capture.tiff"));

    let expected = pipeline.decode(&std::fs::read(&input).unwrap()).unwrap().to_rgb();
    let decoded = StandardTiffReader.read_tiff(&std::fs::read(&written).unwrap()).unwrap();
    assert_eq!(decoded, expected);
}

#[test]
fn test_convert_file_rejects_missing_magic() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plain.jpg");
    std::fs::write(&input, vec![0u8; 200]).unwrap();

    let result = small_pipeline(0).convert_file(&input, dir.path().join("plain"));
    assert!(matches!(result, Err(ConversionError::FormatError(_))));
    assert!(!dir.path().join("plain.tiff").exists());
}

#[test]
fn test_convert_file_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let result = small_pipeline(0).convert_file(dir.path().join("nope.jpg"), dir.path().join("out"));
    assert!(matches!(result, Err(ConversionError::InputReadError(_))));
}

#[test]
fn test_convert_directory_skips_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = small_geometry();
    std::fs::write(dir.path().join("a.jpg"), build_capture(&geometry, 100)).unwrap();
    std::fs::write(dir.path().join("small.jpg"), vec![0u8; 10]).unwrap();
    let mut bad = build_capture(&geometry, 100);
    let magic_at = bad.len() - geometry.raw_region_len;
    bad[magic_at] = b'X';
    std::fs::write(dir.path().join("bad.jpg"), bad).unwrap();
    std::fs::write(dir.path().join("notes.txt"), vec![0u8; 500]).unwrap();

    let pipeline = small_pipeline(150);
    let report = pipeline.convert_directory(dir.path()).unwrap();

    assert_eq!(report.converted, vec![dir.path().join("raws").join("a.tiff")]);
    assert_eq!(report.skipped, vec![dir.path().join("small.jpg")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, dir.path().join("bad.jpg"));
    assert!(dir.path().join("raws").join("a.tiff").is_file());

    let again = pipeline.convert_directory(dir.path());
    assert!(matches!(again, Err(ConversionError::OutputWriteError(_))));
}

#[test]
fn test_convert_directory_requires_directory() {
    let dir = tempfile::tempdir().unwrap();
    let result = small_pipeline(0).convert_directory(dir.path().join("missing"));
    assert!(matches!(result, Err(ConversionError::InputReadError(_))));
}

#[test]
fn test_wavelength_from_filename() {
    assert_eq!(wavelength_from_filename(Path::new("/data/spot_450_001.tiff")).unwrap(), "450");
    assert_eq!(wavelength_from_filename(Path::new("a_b_c_645_x.tiff")).unwrap(), "645");
    assert_eq!(wavelength_from_filename(Path::new("529_1.tiff")).unwrap(), "529");
    assert!(matches!(
        wavelength_from_filename(Path::new("nounderscore.tiff")),
        Err(ConversionError::ConfigurationError(_))
    ));
}

fn write_gray_tiff(path: &Path, width: usize, height: usize, value: u16) {
    let image = ImageData::gray(width, height, vec![value; width * height]).unwrap();
    let mut bytes = Vec::new();
    StandardTiffWriter.write_tiff(&image, &mut bytes, &ConversionConfig::default()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

#[test]
fn test_pseudocolor_run_with_default_tables() {
    let dir = tempfile::tempdir().unwrap();
    for w in ["450", "529", "590", "645"] {
        write_gray_tiff(&dir.path().join(format!("cycle1_{}_01.tiff", w)), 4, 4, 1000);
    }

    let pipeline = PseudocolorPipeline::new(PseudocolorConfig::default()).unwrap();
    let output = pipeline.run(dir.path(), "composite.tiff").unwrap();

    assert_eq!(output.residual_norm, 0.0);
    let written = StandardTiffReader
        .read_tiff(&std::fs::read(dir.path().join("composite.tiff")).unwrap())
        .unwrap();
    assert_eq!(written, output.composite);
    for px in written.data.chunks_exact(3) {
        assert_eq!(px, &[1000, 1000, 2000]);
    }
    assert!(!dir.path().join("composite_450.tif").exists());
}

#[test]
fn test_pseudocolor_writes_hidden_planes() {
    let dir = tempfile::tempdir().unwrap();
    write_gray_tiff(&dir.path().join("s_450_1.tiff"), 2, 2, 10);
    write_gray_tiff(&dir.path().join("s_645_1.tiff"), 2, 2, 20);

    let config = PseudocolorConfig {
        write_hidden_planes: true,
        ..PseudocolorConfig::default()
    };
    let pipeline = PseudocolorPipeline::new(config).unwrap();
    pipeline.run(dir.path(), "mix.tiff").unwrap();

    let hidden = StandardTiffReader
        .read_tiff(&std::fs::read(dir.path().join("mix_450.tif")).unwrap())
        .unwrap();
    assert_eq!(hidden.data, vec![20; 4]);
    assert!(dir.path().join("mix_645.tif").is_file());
    assert!(!dir.path().join("mix_529.tif").exists());
}

#[test]
fn test_pseudocolor_extension_with_leading_dot() {
    let dir = tempfile::tempdir().unwrap();
    write_gray_tiff(&dir.path().join("s_645_1.tiff"), 2, 2, 40);

    let config = PseudocolorConfig {
        extension: ".tiff".to_string(),
        ..PseudocolorConfig::default()
    };
    let pipeline = PseudocolorPipeline::new(config).unwrap();
    let images = pipeline.load_directory(dir.path()).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].wavelength, "645");

    let output = pipeline.run(dir.path(), "mix.tiff").unwrap();
    assert_eq!(&output.composite.data[..3], &[20, 0, 0]);
}

#[test]
fn test_pseudocolor_unknown_wavelength() {
    let dir = tempfile::tempdir().unwrap();
    write_gray_tiff(&dir.path().join("s_450_1.tiff"), 2, 2, 10);
    write_gray_tiff(&dir.path().join("s_700_1.tiff"), 2, 2, 10);

    let pipeline = PseudocolorPipeline::new(PseudocolorConfig::default()).unwrap();
    let result = pipeline.run(dir.path(), "mix.tiff");
    assert!(matches!(result, Err(ConversionError::ConfigurationError(_))));
}

#[test]
fn test_pseudocolor_shape_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    write_gray_tiff(&dir.path().join("s_450_1.tiff"), 2, 2, 10);
    write_gray_tiff(&dir.path().join("s_529_1.tiff"), 3, 2, 10);

    let pipeline = PseudocolorPipeline::new(PseudocolorConfig::default()).unwrap();
    let result = pipeline.run(dir.path(), "mix.tiff");
    assert!(matches!(result, Err(ConversionError::ShapeMismatchError { .. })));
}

#[test]
fn test_pseudocolor_empty_and_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme_450_1.txt"), b"not an image").unwrap();

    let pipeline = PseudocolorPipeline::new(PseudocolorConfig::default()).unwrap();
    assert!(matches!(
        pipeline.run(dir.path(), "mix.tiff"),
        Err(ConversionError::EmptyInputError(_))
    ));
    assert!(matches!(
        pipeline.run(dir.path().join("missing"), "mix.tiff"),
        Err(ConversionError::InputReadError(_))
    ));
}

#[test]
fn test_pseudocolor_rejects_mismatched_tables() {
    let config = PseudocolorConfig {
        mixing: crate::image_pipeline::mixing::MixingConfig {
            input: MixingSpec::new().with("450", [0.0, 0.0, 1.0]),
            output: MixingSpec::new().with("529", [0.0, 1.0, 0.0]),
        },
        ..PseudocolorConfig::default()
    };
    assert!(matches!(
        PseudocolorPipeline::new(config),
        Err(ConversionError::ConfigurationError(_))
    ));
}
