use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bytes::ByteOrderReader;
use crate::dataset::{Image, Label, LabeledDataset};
use crate::error::Result;
use crate::idx::decoder::open;

/// Fixed geometry of a headerless batch file.
///
/// Each record is one label byte followed by `planes` consecutive planes of
/// `rows * cols` bytes, row-major within a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLayout {
    pub records: usize,
    pub rows: usize,
    pub cols: usize,
    pub planes: usize,
}

impl BatchLayout {
    /// CIFAR-10 binary batch: 10000 records of 32×32 RGB.
    pub const CIFAR10: BatchLayout = BatchLayout { records: 10_000, rows: 32, cols: 32, planes: 3 };

    pub const fn plane_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Bytes per record including the label byte.
    pub const fn record_len(&self) -> usize {
        1 + self.planes * self.plane_len()
    }

    pub const fn image_len(&self, mode: ColorMode) -> usize {
        match mode {
            ColorMode::Grayscale => self.plane_len(),
            ColorMode::Color => self.plane_len() * self.planes,
        }
    }
}

/// How the colour planes of a batch record become output samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// One sample per pixel: the mean of the plane values.
    #[default]
    Grayscale,
    /// `planes` samples per pixel, interleaved (`R, G, B, R, G, B, ...`).
    Color,
}

impl ColorMode {
    pub fn from_color_flag(color: bool) -> ColorMode {
        if color { ColorMode::Color } else { ColorMode::Grayscale }
    }
}

/// Decodes one CIFAR-10 style binary batch file.
///
/// Always yields exactly [`BatchLayout::CIFAR10`]`.records` images and labels.
/// Samples stay in the raw `[0, 255]` domain; see
/// [`LabeledDataset::rescale`] to map them elsewhere. No padding is applied.
pub fn decode_batch<P: AsRef<Path>>(path: P, mode: ColorMode) -> Result<LabeledDataset> {
    let path = path.as_ref();
    let dataset = batch_from_reader(open(path)?, mode)?;
    info!(path = %path.display(), count = dataset.len(), ?mode, "decoded batch file");
    Ok(dataset)
}

/// Same as [`decode_batch`] over any byte source.
pub fn batch_from_reader<R: Read>(source: R, mode: ColorMode) -> Result<LabeledDataset> {
    read_batch(source, BatchLayout::CIFAR10, mode)
}

pub(crate) fn read_batch<R: Read>(
    source: R,
    layout: BatchLayout,
    mode: ColorMode,
) -> Result<LabeledDataset> {
    let mut reader = ByteOrderReader::new(source);
    let mut planes = vec![0u8; layout.planes * layout.plane_len()];

    let mut images: Vec<Image> = Vec::with_capacity(layout.records);
    let mut labels: Vec<Label> = Vec::with_capacity(layout.records);
    for _ in 0..layout.records {
        labels.push(Label::from(reader.read_u8("record label")?));
        reader.read_into(&mut planes, "record planes")?;
        images.push(merge_planes(&planes, layout, mode));
    }

    LabeledDataset::new(images, labels)
}

fn merge_planes(planes: &[u8], layout: BatchLayout, mode: ColorMode) -> Image {
    let plane_len = layout.plane_len();
    match mode {
        ColorMode::Grayscale => (0..plane_len)
            .map(|i| {
                let sum: f64 = (0..layout.planes).map(|ch| planes[ch * plane_len + i] as f64).sum();
                sum / layout.planes as f64
            })
            .collect(),
        ColorMode::Color => (0..plane_len)
            .flat_map(|i| (0..layout.planes).map(move |ch| planes[ch * plane_len + i] as f64))
            .collect(),
    }
}
