pub mod engine;

pub use engine::{RandomEngine, Stream, UniformKind, DEFAULT_SEED};
