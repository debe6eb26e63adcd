use serde::{Deserialize, Serialize};

/// Target interval for the linear `[0, 255] → [min, max]` pixel rescale.
///
/// `min` doubles as the fill value for padding, so a padded border is
/// indistinguishable from a zero-intensity pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl ScaleRange {
    /// Pixels mapped onto `[0.0, 1.0]`.
    pub const UNIT: ScaleRange = ScaleRange { min: 0.0, max: 1.0 };

    /// Pixels mapped onto `[-1.0, 1.0]`.
    pub const SYMMETRIC: ScaleRange = ScaleRange { min: -1.0, max: 1.0 };

    /// # Panics
    /// Panics if either bound is not finite or `min > max`.
    pub fn new(min: f64, max: f64) -> ScaleRange {
        ScaleRange::try_new(min, max)
            .unwrap_or_else(|| panic!("invalid scale range [{}, {}]", min, max))
    }

    pub fn try_new(min: f64, max: f64) -> Option<ScaleRange> {
        if min.is_finite() && max.is_finite() && min <= max {
            Some(ScaleRange { min, max })
        } else {
            None
        }
    }

    /// Maps a raw sample in `[0, 255]` onto this range.
    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        (raw / 255.0) * (self.max - self.min) + self.min
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        ScaleRange::UNIT
    }
}

/// Symmetric border added around a decoded image: `x` columns on the left and
/// right, `y` rows on the top and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub x: u32,
    pub y: u32,
}

impl Padding {
    pub const NONE: Padding = Padding { x: 0, y: 0 };

    pub fn new(x: u32, y: u32) -> Padding {
        Padding { x, y }
    }

    /// Builds a padding from floating-point pixel counts, truncating toward
    /// zero. Negative and NaN inputs become 0.
    pub fn from_f64(x: f64, y: f64) -> Padding {
        // `as` saturates: NaN and negatives map to 0.
        Padding { x: x.trunc() as u32, y: y.trunc() as u32 }
    }

    /// Returns `(height, width)` of a `rows × cols` image once padded.
    pub fn output_dims(&self, rows: usize, cols: usize) -> (usize, usize) {
        (rows + 2 * self.y as usize, cols + 2 * self.x as usize)
    }
}

/// Rescales and pads one raw `rows × cols` image.
///
/// Output is row-major with stride `cols + 2 * padding.x`. Every cell starts
/// at `scale.min`; each raw byte at `(r, c)` lands at
/// `(r + padding.y, c + padding.x)`.
///
/// # Panics
/// Panics if `raw.len() != rows * cols`.
pub fn transform(
    raw: &[u8],
    rows: usize,
    cols: usize,
    scale: ScaleRange,
    padding: Padding,
) -> Vec<f64> {
    assert_eq!(
        raw.len(),
        rows * cols,
        "raw image has {} bytes, expected {}x{}",
        raw.len(),
        rows,
        cols
    );

    let (height, width) = padding.output_dims(rows, cols);
    let (x_pad, y_pad) = (padding.x as usize, padding.y as usize);

    let mut out = vec![scale.min; width * height];
    for (r, src_row) in raw.chunks_exact(cols.max(1)).take(rows).enumerate() {
        let start = width * (r + y_pad) + x_pad;
        for (dst, &px) in out[start..start + cols].iter_mut().zip(src_row) {
            *dst = scale.apply(px as f64);
        }
    }
    out
}
