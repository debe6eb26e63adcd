use serde::{Deserialize, Serialize};

use crate::dataset::labeled::{class_histogram, Image, Label};

/// Aggregate statistics over a decoded dataset.
///
/// Printed as JSON by the `ferrite-data` binary so a decoded file can be
/// sanity-checked without loading it into a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of items (images, labels, or pairs).
    pub items: usize,
    /// Samples per image; `None` when there are no images or lengths differ.
    pub image_len: Option<usize>,
    pub pixel_min: Option<f64>,
    pub pixel_max: Option<f64>,
    pub pixel_mean: Option<f64>,
    /// Items per class id; empty when no labels were decoded.
    pub class_counts: Vec<usize>,
}

impl DatasetSummary {
    pub fn from_parts(images: &[Image], labels: &[Label]) -> DatasetSummary {
        let image_len = match images.first() {
            Some(first) if images.iter().all(|img| img.len() == first.len()) => Some(first.len()),
            _ => None,
        };

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;
        for &px in images.iter().flatten() {
            min = min.min(px);
            max = max.max(px);
            sum += px;
            count += 1;
        }
        let (pixel_min, pixel_max, pixel_mean) = if count > 0 {
            (Some(min), Some(max), Some(sum / count as f64))
        } else {
            (None, None, None)
        };

        DatasetSummary {
            items: images.len().max(labels.len()),
            image_len,
            pixel_min,
            pixel_max,
            pixel_mean,
            class_counts: class_histogram(labels),
        }
    }

    pub fn from_labels(labels: &[Label]) -> DatasetSummary {
        DatasetSummary::from_parts(&[], labels)
    }

    pub fn from_images(images: &[Image]) -> DatasetSummary {
        DatasetSummary::from_parts(images, &[])
    }
}
