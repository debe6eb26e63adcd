use std::fmt::Debug;

use rand::distributions::uniform::SampleUniform;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used by [`RandomEngine::default`].
pub const DEFAULT_SEED: u64 = 1;

/// Identifies the independent generator stream behind one numeric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    I32 = 0,
    I64 = 1,
    U32 = 2,
    U64 = 3,
    F32 = 4,
    F64 = 5,
}

const STREAM_COUNT: usize = 6;

/// A numeric type the engine can draw uniformly.
pub trait UniformKind: SampleUniform + Copy + PartialOrd + Debug {
    const STREAM: Stream;
}

macro_rules! uniform_kind {
    ($($ty:ty => $stream:ident),* $(,)?) => {
        $(impl UniformKind for $ty {
            const STREAM: Stream = Stream::$stream;
        })*
    };
}

uniform_kind! {
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

/// Deterministic random draws for weight initialization and sampling.
///
/// Each numeric kind draws from its own ChaCha8 stream, all derived from one
/// seed: drawing `f64` values never shifts the `i32` sequence. Two engines
/// built from the same seed and called in the same order produce identical
/// outputs on every platform.
///
/// The engine is an ordinary value. Give each thread or task its own rather
/// than sharing one behind a lock.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    seed: u64,
    streams: [ChaCha8Rng; STREAM_COUNT],
}

impl RandomEngine {
    pub fn new(seed: u64) -> RandomEngine {
        let streams = std::array::from_fn(|id| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(id as u64);
            rng
        });
        RandomEngine { seed, streams }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn stream(&mut self, stream: Stream) -> &mut ChaCha8Rng {
        &mut self.streams[stream as usize]
    }

    /// Draws uniformly from the closed interval `[min, max]`.
    ///
    /// # Panics
    /// Panics if `min > max`, or for floats if the interval is not finite.
    pub fn uniform<T: UniformKind>(&mut self, min: T, max: T) -> T {
        assert!(min <= max, "uniform: min {:?} is greater than max {:?}", min, max);
        self.stream(T::STREAM).gen_range(min..=max)
    }

    /// Overwrites every element of `buf` with an independent draw from
    /// `[min, max]`. Consumes the stream exactly as `buf.len()` calls to
    /// [`uniform`](Self::uniform) would.
    pub fn fill_uniform<T: UniformKind>(&mut self, buf: &mut [T], min: T, max: T) {
        for slot in buf.iter_mut() {
            *slot = self.uniform(min, max);
        }
    }

    /// `true` with probability `p`: a draw from `[0, 1]` on the `f64` stream
    /// compared with `<= p`. Values of `p` outside `[0, 1]` saturate.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.uniform(0.0f64, 1.0) <= p
    }

    /// Single-precision variant of [`bernoulli`](Self::bernoulli), drawn from
    /// the `f32` stream.
    pub fn bernoulli_f32(&mut self, p: f32) -> bool {
        self.uniform(0.0f32, 1.0) <= p
    }

    /// [`bernoulli`](Self::bernoulli) widened to `0` or `1`.
    pub fn bernoulli_u32(&mut self, p: f64) -> u32 {
        u32::from(self.bernoulli(p))
    }

    /// [`bernoulli_f32`](Self::bernoulli_f32) widened to `0` or `1`.
    pub fn bernoulli_f32_u32(&mut self, p: f32) -> u32 {
        u32::from(self.bernoulli_f32(p))
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        RandomEngine::new(DEFAULT_SEED)
    }
}
