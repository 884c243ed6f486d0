//! Readers for the IDX binary files used by MNIST and its derivatives
//! (Fashion-MNIST, EMNIST, ...).
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   0x00000803  (magic: uint8 data, 3 dimensions, big-endian)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00000801  (magic: uint8 data, 1 dimension, big-endian)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index
//! ```

use crate::data::{dataset::Dataset, normalize::Normalization};
use crate::error::{NetError, Result};

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// Raw images decoded from an IDX3 file.
#[derive(Debug, Clone, PartialEq)]
pub struct IdxImages {
    pub rows: usize,
    pub cols: usize,
    pub pixels: Vec<Vec<u8>>,
}

pub fn parse_images(bytes: &[u8]) -> Result<IdxImages> {
    if bytes.len() < 16 {
        return Err(NetError::Data(format!(
            "IDX image file too short: expected at least 16 header bytes, got {}",
            bytes.len()
        )));
    }

    let magic = read_u32(bytes, 0);
    if magic != IMAGE_MAGIC {
        return Err(NetError::Data(format!(
            "expected magic header {:#x} for images but received {:#x}",
            IMAGE_MAGIC, magic
        )));
    }

    let n_items = read_u32(bytes, 4) as usize;
    let rows = read_u32(bytes, 8) as usize;
    let cols = read_u32(bytes, 12) as usize;

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        NetError::Data(format!("IDX image file: rows * cols overflows (rows={}, cols={})", rows, cols))
    })?;
    let data_len = n_items.checked_mul(n_pixels).ok_or_else(|| {
        NetError::Data(format!(
            "IDX image file: n_items * n_pixels overflows (n_items={}, n_pixels={})",
            n_items, n_pixels
        ))
    })?;

    let payload = &bytes[16..];
    if payload.len() < data_len {
        return Err(NetError::Data(format!(
            "IDX image file too short: header declares {} items of {}x{} pixels \
             ({} data bytes), but only {} follow the header",
            n_items, rows, cols, data_len, payload.len()
        )));
    }

    let pixels = if n_pixels == 0 {
        vec![Vec::new(); n_items]
    } else {
        payload[..data_len].chunks_exact(n_pixels).map(<[u8]>::to_vec).collect()
    };

    Ok(IdxImages { rows, cols, pixels })
}

pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 8 {
        return Err(NetError::Data(format!(
            "IDX label file too short: expected at least 8 header bytes, got {}",
            bytes.len()
        )));
    }

    let magic = read_u32(bytes, 0);
    if magic != LABEL_MAGIC {
        return Err(NetError::Data(format!(
            "expected magic header {:#x} for labels but received {:#x}",
            LABEL_MAGIC, magic
        )));
    }

    let n_items = read_u32(bytes, 4) as usize;
    let payload = &bytes[8..];
    if payload.len() < n_items {
        return Err(NetError::Data(format!(
            "IDX label file too short: header declares {} labels but only {} bytes follow",
            n_items,
            payload.len()
        )));
    }

    Ok(payload[..n_items].to_vec())
}

/// Decodes an image/label file pair into a normalized [`Dataset`].
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], normalization: Normalization) -> Result<Dataset> {
    let images = parse_images(image_bytes)?;
    let labels = parse_labels(label_bytes)?;

    if images.pixels.len() != labels.len() {
        return Err(NetError::Data(format!(
            "IDX file mismatch: image file declares {} items but label file declares {}",
            images.pixels.len(),
            labels.len()
        )));
    }

    let inputs = images.pixels.iter().map(|p| normalization.apply_all(p)).collect();
    Dataset::new(inputs, labels.into_iter().map(usize::from).collect())
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

/// Encodes images as an IDX3 file. All images must be `rows * cols` long.
pub fn encode_images(rows: usize, cols: usize, images: &[Vec<u8>]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(16 + images.len() * rows * cols);
    out.extend_from_slice(&IMAGE_MAGIC.to_be_bytes());
    out.extend_from_slice(&header_u32(images.len())?.to_be_bytes());
    out.extend_from_slice(&header_u32(rows)?.to_be_bytes());
    out.extend_from_slice(&header_u32(cols)?.to_be_bytes());
    for (i, image) in images.iter().enumerate() {
        if image.len() != rows * cols {
            return Err(NetError::Data(format!(
                "image {} has {} pixels, expected {}x{}",
                i, image.len(), rows, cols
            )));
        }
        out.extend_from_slice(image);
    }
    Ok(out)
}

/// Encodes labels as an IDX1 file.
pub fn encode_labels(labels: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(8 + labels.len());
    out.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
    out.extend_from_slice(&header_u32(labels.len())?.to_be_bytes());
    out.extend_from_slice(labels);
    Ok(out)
}

fn header_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| NetError::Data(format!("{} does not fit an IDX header field", value)))
}
