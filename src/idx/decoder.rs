use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use tracing::info;

use crate::bytes::ByteOrderReader;
use crate::dataset::{Image, Label, LabeledDataset};
use crate::error::{DecodeError, Result};
use crate::idx::header::{ImageHeader, LabelHeader};
use crate::transform::{transform, Padding, ScaleRange};

/// Opens `path` for buffered sequential reading.
pub(crate) fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Decodes an IDX1 label file into one `u32` class id per item, in file order.
///
/// Each label byte is widened without scaling. A wrong magic number, a zero
/// item count, or a file shorter than its header declares is an error; no
/// partial sequence is ever returned.
pub fn decode_labels<P: AsRef<Path>>(path: P) -> Result<Vec<Label>> {
    let path = path.as_ref();
    let labels = labels_from_reader(open(path)?)?;
    info!(path = %path.display(), count = labels.len(), "decoded IDX labels");
    Ok(labels)
}

/// Same as [`decode_labels`] over any byte source.
pub fn labels_from_reader<R: Read>(source: R) -> Result<Vec<Label>> {
    let mut reader = ByteOrderReader::new(source);
    let header = LabelHeader::read(&mut reader)?;
    let raw = reader.read_bytes(header.item_count as usize, "label data")?;
    Ok(raw.into_iter().map(Label::from).collect())
}

/// Decodes an IDX3 image file.
///
/// Every image is rescaled from `[0, 255]` onto `scale` and padded with
/// `padding` on each side, so each output has
/// `(cols + 2 * padding.x) * (rows + 2 * padding.y)` samples.
pub fn decode_images<P: AsRef<Path>>(
    path: P,
    scale: ScaleRange,
    padding: Padding,
) -> Result<Vec<Image>> {
    let path = path.as_ref();
    let images = images_from_reader(open(path)?, scale, padding)?;
    info!(
        path = %path.display(),
        count = images.len(),
        image_len = images.first().map_or(0, Vec::len),
        "decoded IDX images"
    );
    Ok(images)
}

/// Same as [`decode_images`] over any byte source.
pub fn images_from_reader<R: Read>(
    source: R,
    scale: ScaleRange,
    padding: Padding,
) -> Result<Vec<Image>> {
    let mut reader = ByteOrderReader::new(source);
    let header = ImageHeader::read(&mut reader)?;
    let rows = header.rows as usize;
    let cols = header.cols as usize;
    let pixels = header.pixels_per_image()?;
    header.image_len(padding)?;

    let mut images = Vec::new();
    for _ in 0..header.item_count {
        let raw = reader.read_bytes(pixels, "image data")?;
        images.push(transform(&raw, rows, cols, scale, padding));
    }
    Ok(images)
}

/// Decodes a matching image/label file pair and checks that both declare the
/// same number of items.
pub fn decode_idx_pair<P: AsRef<Path>, Q: AsRef<Path>>(
    images_path: P,
    labels_path: Q,
    scale: ScaleRange,
    padding: Padding,
) -> Result<LabeledDataset> {
    let images = decode_images(images_path, scale, padding)?;
    let labels = decode_labels(labels_path)?;
    LabeledDataset::new(images, labels)
}

/// Parses in-memory IDX image and label files into `(inputs, labels)` ready
/// for ferrite-nn's training loop: pixels on `[0, 1]`, labels one-hot of
/// length `n_classes`.
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    let images = images_from_reader(Cursor::new(image_bytes), ScaleRange::UNIT, Padding::NONE)?;
    let labels = labels_from_reader(Cursor::new(label_bytes))?;
    let dataset = LabeledDataset::new(images, labels)?;
    let one_hot = dataset.one_hot_labels(n_classes)?;
    let (inputs, _) = dataset.into_parts();
    Ok((inputs, one_hot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::idx::header::{IMAGE_MAGIC, LABEL_MAGIC};

    fn label_file(labels: &[u8]) -> Vec<u8> {
        let mut bytes = LABEL_MAGIC.to_be_bytes().to_vec();
        bytes.extend((labels.len() as u32).to_be_bytes());
        bytes.extend_from_slice(labels);
        bytes
    }

    fn image_file(count: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for word in [IMAGE_MAGIC, count, rows, cols] {
            bytes.extend(word.to_be_bytes());
        }
        bytes.extend_from_slice(pixels);
        bytes
    }

    #[test]
    fn labels_keep_file_order() {
        let labels = labels_from_reader(Cursor::new(label_file(&[7, 0, 255, 3]))).unwrap();
        assert_eq!(labels, vec![7, 0, 255, 3]);
    }

    #[test]
    fn truncated_label_data_fails_whole_call() {
        let mut bytes = label_file(&[1, 2, 3]);
        bytes.pop();
        let err = labels_from_reader(Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn decodes_padded_images() {
        let bytes = image_file(2, 1, 2, &[0, 255, 255, 0]);
        let images = images_from_reader(Cursor::new(bytes), ScaleRange::UNIT, Padding::new(0, 1)).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0], vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(images[1], vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn truncation_mid_item_loop_discards_everything() {
        let bytes = image_file(3, 2, 2, &[1; 10]);
        let err = images_from_reader(Cursor::new(bytes), ScaleRange::UNIT, Padding::NONE).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { what: "image data", offset: 26, needed: 2 }));
    }

    #[test]
    fn oversized_header_is_an_error_not_a_panic() {
        let bytes = image_file(1, u32::MAX, u32::MAX, &[]);
        let err = images_from_reader(Cursor::new(bytes.clone()), ScaleRange::UNIT, Padding::NONE)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Oversized { .. }));
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = parse_idx_pair(&bytes, &label_file(&[1]), 10).unwrap_err();
        assert!(matches!(err, DecodeError::Oversized { .. }));
    }

    #[test]
    fn padding_overflow_is_an_error() {
        let bytes = image_file(1, 1, 1, &[9]);
        let err = images_from_reader(Cursor::new(bytes), ScaleRange::UNIT, Padding::new(u32::MAX, 0))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Oversized { .. }));
    }

    #[test]
    fn label_count_beyond_file_is_truncation() {
        let mut bytes = LABEL_MAGIC.to_be_bytes().to_vec();
        bytes.extend(u32::MAX.to_be_bytes());
        bytes.extend([1, 2, 3]);
        let err = labels_from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { what: "label data", offset: 11, .. }));
    }

    #[test]
    fn swapped_files_are_format_errors() {
        let err = images_from_reader(Cursor::new(label_file(&[1, 2])), ScaleRange::UNIT, Padding::NONE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = labels_from_reader(Cursor::new(image_file(1, 1, 1, &[9]))).unwrap_err();
        assert!(matches!(err, DecodeError::BadMagic { expected: LABEL_MAGIC, found: IMAGE_MAGIC }));
    }

    #[test]
    fn parse_pair_one_hot_encodes() {
        let (inputs, labels) =
            parse_idx_pair(&image_file(2, 1, 1, &[0, 255]), &label_file(&[1, 0]), 2).unwrap();
        assert_eq!(inputs, vec![vec![0.0], vec![1.0]]);
        assert_eq!(labels, vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn parse_pair_rejects_count_mismatch() {
        let err = parse_idx_pair(&image_file(2, 1, 1, &[0, 255]), &label_file(&[1]), 2).unwrap_err();
        assert!(matches!(err, DecodeError::CountMismatch { images: 2, labels: 1 }));
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = decode_labels("/definitely/not/here/labels-idx1-ubyte").unwrap_err();
        assert!(matches!(err, DecodeError::Open { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
