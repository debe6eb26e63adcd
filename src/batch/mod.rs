pub mod decoder;

pub use decoder::{batch_from_reader, decode_batch, BatchLayout, ColorMode};
