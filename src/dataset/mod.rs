pub mod labeled;
pub mod summary;

pub use labeled::{Image, Label, LabeledDataset};
pub use summary::DatasetSummary;
