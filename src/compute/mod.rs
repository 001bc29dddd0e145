//! Compute module - Growth, smoothing and classification for island maps.

mod classify;
mod direct_convolution;
mod fft;
mod field;
mod growth;
mod kernel;
mod pipeline;
mod rng;
mod smoothing;

pub use classify::*;
pub use direct_convolution::*;
pub use fft::*;
pub use field::*;
pub use growth::*;
pub use kernel::*;
pub use pipeline::*;
pub use rng::*;
pub use smoothing::*;
