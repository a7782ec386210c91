#![allow(clippy::excessive_precision)]
//! Hide bits in 8x8 blocks of an intensity image by nudging their cosine transform coefficients.
//!
//! Two policies are available, see [`policy`]. The free functions in this module are shortcuts
//! for the common cases, the [`Writer`] and [`Reader`] give access to every configuration option.

pub mod algorithm;
pub mod capacity;
pub mod dct2d;
pub mod error;
pub mod metrics;
pub mod payload;
pub mod policy;
pub mod prepare;
pub mod tiling;
pub mod util;

// expose the trait in the prelude.
pub mod prelude {
    pub use crate::policy::EmbeddingPolicy;
}
// Export the public components from the algorithm here.
pub use algorithm::{ReadConfig, Reader};
pub use algorithm::{WriteConfig, Writer};
pub use capacity::capacity;
pub use error::{Error, Result};
pub use payload::{bits_to_text, text_to_bits, BitGrid, Payload};
pub use policy::{AdditiveBias, Policy, RelativeMagnitude};

use image::GrayImage;

/// Embed the payload with the relative magnitude policy, one bit per tile in row-major order.
pub fn embed_relative(image: &GrayImage, payload: &Payload, strength: f32) -> Result<GrayImage> {
    let config = WriteConfig::new(Policy::RelativeMagnitude(RelativeMagnitude::new(strength)));
    Writer::new(image, config)?.mark(payload.bits())
}

/// Blindly extract `bit_count` bits written by [`embed_relative`].
///
/// The strength is not needed to decode, only the ordering of the coefficients is inspected.
pub fn extract_relative(image: &GrayImage, bit_count: usize, strength: f32) -> Result<Payload> {
    let config = ReadConfig::new(Policy::RelativeMagnitude(RelativeMagnitude::new(strength)));
    Reader::new(image, config)?.extract(bit_count)
}

/// Embed a watermark bitmap with the additive bias policy, bit (i, j) into tile (i, j).
pub fn embed_bias(container: &GrayImage, watermark: &BitGrid, strength: f32) -> Result<GrayImage> {
    let config = WriteConfig::new(Policy::AdditiveBias(AdditiveBias::new(strength)));
    Writer::new(container, config)?.mark_grid(watermark)
}

/// Extract a watermark bitmap of `shape` (rows, cols) written by [`embed_bias`].
///
/// This is non-blind, `original` must be the container the watermark was embedded into.
pub fn extract_bias(
    watermarked: &GrayImage,
    original: &GrayImage,
    shape: (usize, usize),
    strength: f32,
) -> Result<BitGrid> {
    let config = ReadConfig::new(Policy::AdditiveBias(AdditiveBias::new(strength)));
    Reader::new(watermarked, config)?
        .with_original(original)?
        .extract_grid(shape)
}
