//! Payload representations: flat bit sequences for hidden messages and two dimensional bitmaps
//! for watermarks.

use crate::error::{Error, Result};
use image::GrayImage;

/// Samples above this value become a one when thresholding a watermark.
pub const WATERMARK_THRESHOLD: u8 = 128;

/// An ordered sequence of bits, one per tile.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Payload {
    bits: Vec<bool>,
}

impl Payload {
    pub fn new() -> Self {
        Payload { bits: vec![] }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }
}

impl From<Vec<bool>> for Payload {
    fn from(bits: Vec<bool>) -> Self {
        Payload { bits }
    }
}

impl From<&[bool]> for Payload {
    fn from(bits: &[bool]) -> Self {
        Payload {
            bits: bits.to_vec(),
        }
    }
}

impl AsRef<[bool]> for Payload {
    fn as_ref(&self) -> &[bool] {
        &self.bits
    }
}

impl std::str::FromStr for Payload {
    type Err = Error;

    /// Parse a string of '0' and '1' characters.
    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .enumerate()
            .map(|(position, found)| match found {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::InvalidPayloadEncoding { position, found }),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(Payload { bits })
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.bits.iter() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Encode text as 8 bits per character, most significant bit first.
///
/// Characters beyond U+00FF do not fit and are rejected.
pub fn text_to_bits(text: &str) -> Result<Payload> {
    let mut bits = Vec::with_capacity(text.len() * 8);
    for c in text.chars() {
        let byte = u8::try_from(c).map_err(|_| Error::UnrepresentableCharacter(c))?;
        bits.extend((0..8).rev().map(|shift| (byte >> shift) & 1 == 1));
    }
    Ok(Payload { bits })
}

/// Decode 8 bits per character, trailing NUL characters from zero padding are dropped.
///
/// A trailing group shorter than 8 bits is read as a number of that many bits.
pub fn bits_to_text(payload: &Payload) -> String {
    let text: String = payload
        .bits
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, bit| (acc << 1) | (*bit as u8)))
        .map(char::from)
        .collect();
    text.trim_end_matches('\0').to_owned()
}

/// A two dimensional bitmap, one bit per tile, stored row first.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct BitGrid {
    rows: usize,
    cols: usize,
    bits: Vec<bool>,
}

impl BitGrid {
    /// Create a bitmap of the provided shape with all bits cleared.
    pub fn new(rows: usize, cols: usize) -> Self {
        BitGrid {
            rows,
            cols,
            bits: vec![false; rows * cols],
        }
    }

    /// Create a bitmap from row first bits, the length must match the shape.
    pub fn from_bits(rows: usize, cols: usize, bits: Vec<bool>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(bits.len()) {
            return Err(Error::DimensionMismatch {
                expected: (rows, cols),
                found: (bits.len() / cols.max(1), cols),
            });
        }
        Ok(BitGrid { rows, cols, bits })
    }

    pub fn from_fn<F: FnMut(usize, usize) -> bool>(rows: usize, cols: usize, mut f: F) -> Self {
        let bits = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        BitGrid { rows, cols, bits }
    }

    /// Threshold a grayscale watermark into a bitmap of `rows` x `cols`.
    ///
    /// The watermark is resized with nearest neighbor sampling first, then every sample above
    /// the midpoint of the range becomes a one.
    pub fn from_watermark(watermark: &GrayImage, rows: usize, cols: usize) -> Self {
        let resized = image::imageops::resize(
            watermark,
            cols as u32,
            rows as u32,
            image::imageops::FilterType::Nearest,
        );
        let bits = resized
            .pixels()
            .map(|p| p.0[0] > WATERMARK_THRESHOLD)
            .collect();
        BitGrid { rows, cols, bits }
    }

    /// The (rows, cols) shape of the tile grid of a container, the natural watermark shape.
    pub fn tile_shape(container: &GrayImage) -> (usize, usize) {
        crate::tiling::TileGrid::of(container).shape()
    }

    /// Render the bitmap as an image, ones become 255 and zeros become 0.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.cols as u32, self.rows as u32, |x, y| {
            let on = self.get(y as usize, x as usize);
            image::Luma([if on { 255 } else { 0 }])
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Panics if the position is outside of the bitmap.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.rows && col < self.cols);
        self.bits[row * self.cols + col]
    }

    /// Panics if the position is outside of the bitmap.
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        assert!(row < self.rows && col < self.cols);
        self.bits[row * self.cols + col] = value;
    }

    /// The bits in row first order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}
