use crate::error::{DecodeError, Result};
use crate::dataset::summary::DatasetSummary;
use crate::transform::ScaleRange;

/// One decoded image: flat, row-major `f64` samples.
pub type Image = Vec<f64>;

/// Class id of one item.
pub type Label = u32;

/// Images paired with their labels, index for index.
///
/// Constructed only through [`LabeledDataset::new`], which rejects unequal
/// lengths, so `images.len() == labels.len()` always holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabeledDataset {
    images: Vec<Image>,
    labels: Vec<Label>,
}

impl LabeledDataset {
    pub fn new(images: Vec<Image>, labels: Vec<Label>) -> Result<LabeledDataset> {
        if images.len() != labels.len() {
            return Err(DecodeError::CountMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }
        Ok(LabeledDataset { images, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Image, Label)> + '_ {
        self.images.iter().zip(self.labels.iter().copied())
    }

    /// Hands both sequences to the caller.
    pub fn into_parts(self) -> (Vec<Image>, Vec<Label>) {
        (self.images, self.labels)
    }

    /// One-hot encodes every label into a vector of length `n_classes`,
    /// the target shape ferrite-nn's training loop expects.
    pub fn one_hot_labels(&self, n_classes: usize) -> Result<Vec<Vec<f64>>> {
        self.labels
            .iter()
            .enumerate()
            .map(|(index, &class)| {
                if class as usize >= n_classes {
                    return Err(DecodeError::ClassOutOfRange { index, class, n_classes });
                }
                let mut one_hot = vec![0.0f64; n_classes];
                one_hot[class as usize] = 1.0;
                Ok(one_hot)
            })
            .collect()
    }

    /// Number of items per class id, indexed by class. Length is
    /// `max(label) + 1`, or 0 for an empty dataset.
    pub fn class_histogram(&self) -> Vec<usize> {
        class_histogram(&self.labels)
    }

    /// Applies the `[0, 255] → [min, max]` map to every sample in place.
    ///
    /// Batch files decode to raw byte values; this brings them onto the same
    /// footing as the rescaled IDX path when a caller wants that. Never
    /// applied implicitly.
    pub fn rescale(&mut self, scale: ScaleRange) {
        for px in self.images.iter_mut().flat_map(|img| img.iter_mut()) {
            *px = scale.apply(*px);
        }
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::from_parts(&self.images, &self.labels)
    }
}

pub(crate) fn class_histogram(labels: &[Label]) -> Vec<usize> {
    let n = labels.iter().max().map_or(0, |&m| m as usize + 1);
    let mut counts = vec![0usize; n];
    for &label in labels {
        counts[label as usize] += 1;
    }
    counts
}
