pub mod image_transform;

pub use image_transform::{transform, Padding, ScaleRange};
