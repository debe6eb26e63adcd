pub mod header;
pub mod decoder;

pub use header::{ImageHeader, LabelHeader, IMAGE_MAGIC, LABEL_MAGIC, MAX_IMAGE_CELLS};
pub use decoder::{
    decode_idx_pair, decode_images, decode_labels, images_from_reader, labels_from_reader,
    parse_idx_pair,
};
