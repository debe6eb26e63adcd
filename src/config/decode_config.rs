use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::batch::ColorMode;
use crate::error::{DecodeError, Result};
use crate::random::{RandomEngine, DEFAULT_SEED};
use crate::transform::{Padding, ScaleRange};

/// Decode and sampling parameters that can be stored next to a dataset.
///
/// Every field has a default, so a JSON file only needs the fields it changes:
///
/// ```json
/// { "scale_min": -1.0, "scale_max": 1.0, "x_padding": 2, "y_padding": 2 }
/// ```
///
/// Padding is kept as `f64` and truncated toward zero when applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub scale_min: f64,
    pub scale_max: f64,
    pub x_padding: f64,
    pub y_padding: f64,
    pub color_mode: ColorMode,
    pub seed: u64,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            scale_min: ScaleRange::UNIT.min,
            scale_max: ScaleRange::UNIT.max,
            x_padding: 0.0,
            y_padding: 0.0,
            color_mode: ColorMode::Grayscale,
            seed: DEFAULT_SEED,
        }
    }
}

impl DecodeConfig {
    /// Validated scale interval.
    pub fn scale(&self) -> Result<ScaleRange> {
        ScaleRange::try_new(self.scale_min, self.scale_max).ok_or_else(|| {
            DecodeError::Config(format!(
                "scale range [{}, {}] must be finite with scale_min <= scale_max",
                self.scale_min, self.scale_max
            ))
        })
    }

    pub fn padding(&self) -> Padding {
        Padding::from_f64(self.x_padding, self.y_padding)
    }

    pub fn transform_params(&self) -> Result<(ScaleRange, Padding)> {
        Ok((self.scale()?, self.padding()))
    }

    pub fn random_engine(&self) -> RandomEngine {
        RandomEngine::new(self.seed)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| DecodeError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Deserializes a config from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<DecodeConfig> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = std::io::BufReader::new(file);
        let config: DecodeConfig = serde_json::from_reader(reader)
            .map_err(|e| DecodeError::Config(format!("{}: {}", path.display(), e)))?;
        config.scale()?;
        Ok(config)
    }
}
