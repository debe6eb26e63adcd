pub mod error;
pub mod bytes;
pub mod transform;
pub mod dataset;
pub mod idx;
pub mod batch;
pub mod random;
pub mod config;

// Convenience re-exports
pub use error::{DecodeError, ErrorKind, Result};
pub use bytes::ByteOrderReader;
pub use transform::{transform, Padding, ScaleRange};
pub use dataset::{DatasetSummary, Image, Label, LabeledDataset};
pub use idx::{decode_idx_pair, decode_images, decode_labels, parse_idx_pair};
pub use batch::{decode_batch, BatchLayout, ColorMode};
pub use random::RandomEngine;
pub use config::DecodeConfig;
