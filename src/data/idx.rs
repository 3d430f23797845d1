//! IDX file format (the MNIST distribution format)
//!
//! ```text
//! u32 magic   0x00000803 for images, 0x00000801 for labels (big-endian)
//! u32 dims[n] one per dimension
//! u8  data[]  row-major
//! ```

use ndarray::{Array1, Array3};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub const IMAGES_MAGIC: u32 = 0x0000_0803;
pub const LABELS_MAGIC: u32 = 0x0000_0801;

/// Raw `[n, rows, cols]` pixel values.
pub fn read_idx_images<P: AsRef<Path>>(path: P) -> Result<Array3<u8>> {
    let path = path.as_ref();
    parse_idx_images(&read_file(path)?).map_err(|e| annotate(path, e))
}

pub fn read_idx_labels<P: AsRef<Path>>(path: P) -> Result<Array1<u8>> {
    let path = path.as_ref();
    parse_idx_labels(&read_file(path)?).map_err(|e| annotate(path, e))
}

pub fn parse_idx_images(bytes: &[u8]) -> Result<Array3<u8>> {
    let mut cursor = Cursor::new(bytes);
    cursor.expect_magic(IMAGES_MAGIC)?;
    let n = cursor.read_u32()? as usize;
    let rows = cursor.read_u32()? as usize;
    let cols = cursor.read_u32()? as usize;
    let len = n
        .checked_mul(rows)
        .and_then(|len| len.checked_mul(cols))
        .ok_or_else(|| Error::Dataset(format!("image dimensions overflow: {n}x{rows}x{cols}")))?;
    let data = cursor.payload(len)?;
    Array3::from_shape_vec((n, rows, cols), data.to_vec())
        .map_err(|e| Error::Dataset(format!("bad image shape: {e}")))
}

pub fn parse_idx_labels(bytes: &[u8]) -> Result<Array1<u8>> {
    let mut cursor = Cursor::new(bytes);
    cursor.expect_magic(LABELS_MAGIC)?;
    let n = cursor.read_u32()? as usize;
    Ok(Array1::from(cursor.payload(n)?.to_vec()))
}

/// Encode images in IDX form.
pub fn encode_idx_images(images: &Array3<u8>) -> Vec<u8> {
    let (n, rows, cols) = images.dim();
    let mut out = Vec::with_capacity(16 + images.len());
    for word in [IMAGES_MAGIC, n as u32, rows as u32, cols as u32] {
        out.extend_from_slice(&word.to_be_bytes());
    }
    out.extend(images.iter().copied());
    out
}

pub fn encode_idx_labels(labels: &Array1<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + labels.len());
    out.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
    out.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    out.extend(labels.iter().copied());
    out
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::Io(format!("Failed to read {}: {e}", path.display())))
}

fn annotate(path: &Path, err: Error) -> Error {
    match err {
        Error::Dataset(msg) => Error::Dataset(format!("{}: {msg}", path.display())),
        other => other,
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn read_u32(&mut self) -> Result<u32> {
        let end = self.pos + 4;
        let word = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| Error::Dataset("truncated header".to_string()))?;
        self.pos = end;
        Ok(u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
    }

    fn expect_magic(&mut self, expected: u32) -> Result<()> {
        let magic = self.read_u32()?;
        if magic != expected {
            return Err(Error::Dataset(format!(
                "invalid magic 0x{magic:08x}, expected 0x{expected:08x}"
            )));
        }
        Ok(())
    }

    /// Exactly `len` remaining bytes.
    fn payload(&self, len: usize) -> Result<&'a [u8]> {
        let rest = &self.bytes[self.pos..];
        if rest.len() != len {
            return Err(Error::Dataset(format!(
                "expected {len} data bytes, found {}",
                rest.len()
            )));
        }
        Ok(rest)
    }
}
