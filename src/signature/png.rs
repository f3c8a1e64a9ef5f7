//! Minimal PNG writer for greyscale+alpha rasters

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

use crate::error::{Error, Result};

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
const BIT_DEPTH: u8 = 8;
const COLOR_GRAY_ALPHA: u8 = 4;

/// Encode black ink with per-pixel coverage `alpha` (row-major, one byte per pixel)
pub fn encode_ink(width: u32, height: u32, alpha: &[u8]) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize;
    if alpha.len() != expected {
        return Err(Error::Encoding(format!(
            "raster has {} pixels, expected {}",
            alpha.len(),
            expected
        )));
    }

    // Each scanline: filter type 0 followed by (grey, alpha) pairs
    let row_len = 1 + width as usize * 2;
    let mut raw = Vec::with_capacity(row_len * height as usize);
    for row in alpha.chunks(width.max(1) as usize).take(height as usize) {
        raw.push(0);
        for &a in row {
            raw.push(0);
            raw.push(a);
        }
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[BIT_DEPTH, COLOR_GRAY_ALPHA, 0, 0, 0]);

    let mut out = Vec::with_capacity(SIGNATURE.len() + compressed.len() + 64);
    out.extend_from_slice(&SIGNATURE);
    write_chunk(&mut out, b"IHDR", &ihdr);
    write_chunk(&mut out, b"IDAT", &compressed);
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}
