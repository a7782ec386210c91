//! Error type shared by the whole engine.
//!
//! Every failure is an input-validation failure detected before any tile is touched, so none of
//! these are transient and a failed call never leaves a partially written image behind.

use thiserror::Error;

/// Errors returned by the embedding and extraction operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The image can not be split into full 8x8 tiles.
    #[error("image dimensions {width}x{height} are not a multiple of the 8x8 tile size")]
    UnsupportedDimensions { width: u32, height: u32 },

    /// More payload bits were supplied than there are tiles to carry them.
    #[error("payload of {bits} bits exceeds the image capacity of {capacity} bits")]
    PayloadTooLarge { bits: usize, capacity: usize },

    /// More bits were requested during extraction than the image can hold.
    #[error("requested {bits} bits, but the image can hold at most {capacity} bits")]
    RequestExceedsCapacity { bits: usize, capacity: usize },

    /// A bit string contained something other than '0' or '1'.
    #[error("invalid character {found:?} at position {position} in bit string")]
    InvalidPayloadEncoding { position: usize, found: char },

    /// A text character does not fit in a single byte.
    #[error("character {0:?} can not be represented in 8 bits")]
    UnrepresentableCharacter(char),

    /// A non-blind decode was attempted without the unmodified reference image.
    #[error("non-blind extraction requires the original image")]
    MissingOriginal,

    /// Two grids that must agree in shape do not, shapes are (rows, cols).
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

pub type Result<T> = std::result::Result<T, Error>;
