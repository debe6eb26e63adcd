use std::io::Read;

use tracing::{debug, warn};

use crate::bytes::ByteOrderReader;
use crate::error::{DecodeError, Result};
use crate::transform::Padding;

/// Magic number of an IDX1 label file (`00 00 08 01`: uint8, one dimension).
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// Magic number of an IDX3 image file (`00 00 08 03`: uint8, three dimensions).
pub const IMAGE_MAGIC: u32 = 0x0000_0803;

/// Upper bound on samples per decoded image, padding included.
pub const MAX_IMAGE_CELLS: u64 = 1 << 28;

/// Header of an IDX1 label file.
///
/// ```text
/// bytes 0-3:  0x00000801   (magic, big-endian u32)
/// bytes 4-7:  N            (number of labels, big-endian u32)
/// bytes 8..:  N bytes, one class id each
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelHeader {
    pub item_count: u32,
}

impl LabelHeader {
    pub fn read<R: Read>(reader: &mut ByteOrderReader<R>) -> Result<LabelHeader> {
        check_magic(reader, LABEL_MAGIC)?;
        let item_count = read_nonzero(reader, "item count")?;
        debug!(item_count, "parsed IDX label header");
        Ok(LabelHeader { item_count })
    }
}

/// Header of an IDX3 image file.
///
/// ```text
/// bytes  0-3:   0x00000803  (magic, big-endian u32)
/// bytes  4-7:   N           (number of images)
/// bytes  8-11:  rows        (image height in pixels)
/// bytes 12-15:  cols        (image width in pixels)
/// bytes 16..:   N * rows * cols bytes, row-major
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub item_count: u32,
    pub rows: u32,
    pub cols: u32,
}

impl ImageHeader {
    /// The magic number is checked before any count is read, so a label file
    /// passed by mistake fails with `BadMagic` rather than a truncation.
    pub fn read<R: Read>(reader: &mut ByteOrderReader<R>) -> Result<ImageHeader> {
        check_magic(reader, IMAGE_MAGIC)?;
        let item_count = read_nonzero(reader, "item count")?;
        let rows = read_nonzero(reader, "row count")?;
        let cols = read_nonzero(reader, "column count")?;
        let header = ImageHeader { item_count, rows, cols };
        header.pixels_per_image()?;
        debug!(item_count, rows, cols, "parsed IDX image header");
        Ok(header)
    }

    /// Raw bytes per image, `rows * cols`.
    pub fn pixels_per_image(&self) -> Result<usize> {
        self.image_len(Padding::NONE)
    }

    /// Length of each decoded image once `padding` is applied. Fails with
    /// `Oversized` above [`MAX_IMAGE_CELLS`].
    pub fn image_len(&self, padding: Padding) -> Result<usize> {
        let height = self.rows as u64 + 2 * padding.y as u64;
        let width = self.cols as u64 + 2 * padding.x as u64;
        match height.checked_mul(width) {
            Some(cells) if cells <= MAX_IMAGE_CELLS => Ok(cells as usize),
            _ => {
                warn!(height, width, "IDX image geometry too large");
                Err(DecodeError::Oversized { height, width })
            }
        }
    }
}

fn check_magic<R: Read>(reader: &mut ByteOrderReader<R>, expected: u32) -> Result<()> {
    let found = reader.read_u32_be("magic number")?;
    if found != expected {
        warn!(expected, found, "IDX magic number mismatch");
        return Err(DecodeError::BadMagic { expected, found });
    }
    Ok(())
}

fn read_nonzero<R: Read>(reader: &mut ByteOrderReader<R>, field: &'static str) -> Result<u32> {
    let value = reader.read_u32_be(field)?;
    if value == 0 {
        warn!(field, "IDX header declares zero");
        return Err(DecodeError::EmptyHeader { field });
    }
    Ok(value)
}
