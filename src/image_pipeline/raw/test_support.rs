//! Builders for synthetic raw regions used across the test suites.

use crate::image_pipeline::raw::types::SensorGeometry;

/// Samples of one output pixel: (green1, red) from the even line, (blue, green2) from the odd line.
pub type Cell = (u16, u16, u16, u16);

/// A 4x2 output geometry with an 8 byte header and 4 bytes of line padding.
pub fn small_geometry() -> SensorGeometry {
    SensorGeometry {
        raw_region_len: 8 + 4 * 16,
        header_size: 8,
        bytes_per_line: 16,
        used_bytes_per_line: 12,
        width: 4,
        height: 2,
        magic: *b"BRCM",
    }
}

pub fn pack_pair(first: u16, second: u16) -> [u8; 3] {
    [
        (first >> 4) as u8,
        (second >> 4) as u8,
        ((first & 0x0F) | ((second & 0x0F) << 4)) as u8,
    ]
}

pub fn build_region(geometry: &SensorGeometry, rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut region = vec![0xEEu8; geometry.raw_region_len];
    region[..4].copy_from_slice(&geometry.magic);
    for (row, cells) in rows.iter().enumerate() {
        let even = geometry.header_size + 2 * row * geometry.bytes_per_line;
        let odd = even + geometry.bytes_per_line;
        for (i, &(g1, r, b, g2)) in cells.iter().enumerate() {
            region[even + 3 * i..even + 3 * i + 3].copy_from_slice(&pack_pair(g1, r));
            region[odd + 3 * i..odd + 3 * i + 3].copy_from_slice(&pack_pair(b, g2));
        }
    }
    region
}

pub fn sample_rows() -> Vec<Vec<Cell>> {
    vec![
        vec![(0x000, 0xFFF, 0x123, 0x456), (0x789, 0xABC, 0xDEF, 0x001), (0x800, 0x7FF, 0x010, 0x100), (1, 2, 3, 4)],
        vec![(0xFFF, 0xFFF, 0xFFF, 0xFFF), (0x0F0, 0x00F, 0xF00, 0x5A5), (42, 4095, 0, 17), (100, 200, 300, 400)],
    ]
}

/// A fake JPEG+RAW capture: `prefix_len` bytes of JPEG-ish data followed by the raw region.
pub fn build_capture(geometry: &SensorGeometry, prefix_len: usize) -> Vec<u8> {
    let mut file = vec![0u8; prefix_len];
    if prefix_len >= 2 {
        file[..2].copy_from_slice(&[0xFF, 0xD8]);
    }
    file.extend_from_slice(&build_region(geometry, &sample_rows()));
    file
}
