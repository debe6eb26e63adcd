//! End-to-end decoding of synthetic dataset files written to disk.

use std::io::Write;

use ferrite_data::idx::{IMAGE_MAGIC, LABEL_MAGIC};
use ferrite_data::{
    decode_batch, decode_idx_pair, decode_images, decode_labels, BatchLayout, ColorMode,
    DecodeConfig, DecodeError, ErrorKind, Padding, ScaleRange,
};
use tempfile::NamedTempFile;

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

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

/// Deterministic pseudo-random record bytes so every plane differs.
fn batch_file() -> Vec<u8> {
    let layout = BatchLayout::CIFAR10;
    let mut bytes = Vec::with_capacity(layout.records * layout.record_len());
    for record in 0..layout.records {
        bytes.push((record % 10) as u8);
        for i in 0..layout.planes * layout.plane_len() {
            bytes.push(((record * 31 + i * 7) % 256) as u8);
        }
    }
    bytes
}

#[test]
fn labels_round_trip_through_disk() {
    let file = write_temp(&label_file(&[5, 0, 4, 1, 9, 2]));
    let labels = decode_labels(file.path()).unwrap();
    assert_eq!(labels, vec![5, 0, 4, 1, 9, 2]);
}

#[test]
fn two_by_two_scenario() {
    let file = write_temp(&image_file(1, 2, 2, &[0, 128, 255, 64]));
    let images = decode_images(file.path(), ScaleRange::new(-1.0, 1.0), Padding::new(1, 0)).unwrap();

    assert_eq!(images.len(), 1);
    let img = &images[0];
    assert_eq!(img.len(), 8);

    let v = |b: f64| (b / 255.0) * 2.0 - 1.0;
    let expected = [-1.0, v(0.0), v(128.0), -1.0, -1.0, v(255.0), v(64.0), -1.0];
    for (i, (got, want)) in img.iter().zip(expected.iter()).enumerate() {
        assert!((got - want).abs() < 1e-12, "cell {}: got {} want {}", i, got, want);
    }
    assert_eq!(img[5], 1.0);
}

#[test]
fn config_drives_image_decode() {
    let config: DecodeConfig =
        serde_json::from_str(r#"{ "scale_min": -1.0, "scale_max": 1.0, "x_padding": 1.9, "y_padding": 1.2 }"#)
            .unwrap();
    let config_file = NamedTempFile::new().unwrap();
    config.save_json(config_file.path()).unwrap();
    let loaded = DecodeConfig::load_json(config_file.path()).unwrap();
    assert_eq!(loaded, config);

    let (scale, padding) = loaded.transform_params().unwrap();
    let file = write_temp(&image_file(2, 3, 3, &[200; 18]));
    let images = decode_images(file.path(), scale, padding).unwrap();
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|img| img.len() == 5 * 5));
    assert_eq!(images[0][0], -1.0);
}

#[test]
fn swapped_label_and_image_files_fail_with_format() {
    let labels = write_temp(&label_file(&[1, 2, 3]));
    let images = write_temp(&image_file(1, 1, 1, &[7]));

    let err = decode_images(labels.path(), ScaleRange::UNIT, Padding::NONE).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    let err = decode_labels(images.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn empty_file_is_not_an_empty_dataset() {
    let file = write_temp(&[]);
    let err = decode_labels(file.path()).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { offset: 0, .. }));
}

#[test]
fn idx_pair_checks_counts() {
    let images = write_temp(&image_file(2, 1, 1, &[0, 255]));
    let labels = write_temp(&label_file(&[3, 8]));
    let dataset = decode_idx_pair(images.path(), labels.path(), ScaleRange::UNIT, Padding::NONE).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.labels(), &[3, 8]);

    let short_labels = write_temp(&label_file(&[3]));
    let err = decode_idx_pair(images.path(), short_labels.path(), ScaleRange::UNIT, Padding::NONE)
        .unwrap_err();
    assert!(matches!(err, DecodeError::CountMismatch { images: 2, labels: 1 }));
}

#[test]
fn batch_grayscale_is_mean_of_color_channels() {
    let file = write_temp(&batch_file());

    let gray = decode_batch(file.path(), ColorMode::Grayscale).unwrap();
    let color = decode_batch(file.path(), ColorMode::Color).unwrap();

    assert_eq!(gray.len(), 10_000);
    assert_eq!(color.len(), 10_000);
    assert_eq!(gray.labels(), color.labels());
    assert_eq!(gray.labels()[13], 3);

    for (g, c) in gray.images().iter().zip(color.images()).step_by(997) {
        assert_eq!(g.len(), 1024);
        assert_eq!(c.len(), 3072);
        for i in 0..1024 {
            let mean = (c[3 * i] + c[3 * i + 1] + c[3 * i + 2]) / 3.0;
            assert!((g[i] - mean).abs() < 1e-12);
            assert!((0.0..=255.0).contains(&g[i]));
        }
    }
}

#[test]
fn batch_short_by_one_byte_fails() {
    let mut bytes = batch_file();
    bytes.pop();
    let file = write_temp(&bytes);
    let err = decode_batch(file.path(), ColorMode::Grayscale).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
