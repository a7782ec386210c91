//! Contains the actual logic that ties everything together.
//!
//! The main steps for embedding are:
//! - Split the intensity image into 8x8 tiles, in row-major order.
//! - Validate that the payload fits, before anything is modified.
//! - For every tile that is assigned a bit: compute the discrete cosine transform, let the
//!   policy modify its coefficients, and perform the inverse transform.
//! - Reassemble the image, tiles that did not get a bit are copied as they are.
//!
//! Extraction performs the forward transform on the same tiles and asks the policy for the bit,
//! handing it the coefficients of the original image as well when one was provided.
//!
//! Every tile only reads its own region of the input and produces its own output, so the per tile
//! pass is a plain map. With the `parallel` feature it runs on the rayon thread pool.

use crate::capacity;
use crate::dct2d::BlockTransform;
use crate::error::{Error, Result};
use crate::payload::{BitGrid, Payload};
use crate::policy::{EmbeddingPolicy, Policy};
use crate::tiling::{self, Tile, TileGrid};
use image::GrayImage;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Configuration to embed with.
#[derive(PartialEq, Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct WriteConfig {
    pub policy: Policy,
}

impl WriteConfig {
    pub fn new(policy: Policy) -> Self {
        WriteConfig { policy }
    }
}

/// Configuration to extract with, must select the same policy the payload was written with.
#[derive(PartialEq, Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct ReadConfig {
    pub policy: Policy,
}

impl ReadConfig {
    pub fn new(policy: Policy) -> Self {
        ReadConfig { policy }
    }
}

impl From<WriteConfig> for ReadConfig {
    fn from(config: WriteConfig) -> Self {
        ReadConfig {
            policy: config.policy,
        }
    }
}

/// Apply `f` to every item, in parallel when the `parallel` feature is enabled.
fn map_tiles<I, T, F>(items: Vec<I>, f: F) -> Vec<T>
where
    I: Send,
    T: Send,
    F: Fn(I) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    let mapped = items.into_par_iter().map(f).collect();
    #[cfg(not(feature = "parallel"))]
    let mapped = items.into_iter().map(f).collect();
    mapped
}

/// Writer to embed payloads into an image.
pub struct Writer<'a> {
    image: &'a GrayImage,
    grid: TileGrid,
    transform: BlockTransform,
    policy: Policy,
}

impl<'a> Writer<'a> {
    /// Create a writer, rejecting images that do not split into full tiles.
    pub fn new(image: &'a GrayImage, config: WriteConfig) -> Result<Self> {
        let grid = capacity::check_dimensions(image)?;
        Ok(Writer {
            image,
            grid,
            transform: BlockTransform::new(),
            policy: config.policy,
        })
    }

    /// Number of bits this image can carry.
    pub fn capacity(&self) -> usize {
        self.grid.capacity()
    }

    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    /// Embed the bits one per tile in row-major order and return the new image.
    ///
    /// Tiles after the last bit are left untouched.
    pub fn mark(&self, bits: &[bool]) -> Result<GrayImage> {
        capacity::check_payload(&self.grid, bits.len())?;
        log::debug!(
            "embedding {} bits into {}x{} tiles, strength {}",
            bits.len(),
            self.grid.rows,
            self.grid.cols,
            self.policy.as_policy().strength()
        );

        let assignments = tiling::tiles(self.image)
            .into_iter()
            .zip(bits.iter().copied())
            .collect::<Vec<_>>();
        Ok(self.embed_assignments(assignments))
    }

    /// Embed a bitmap positionally, the bit at (row, col) goes into the tile at (row, col).
    ///
    /// Tiles outside the bitmap's shape are left untouched.
    pub fn mark_grid(&self, bits: &BitGrid) -> Result<GrayImage> {
        capacity::check_bitmap(&self.grid, bits.shape(), true)?;
        log::debug!(
            "embedding {}x{} bitmap into {}x{} tiles, strength {}",
            bits.rows(),
            bits.cols(),
            self.grid.rows,
            self.grid.cols,
            self.policy.as_policy().strength()
        );

        let assignments = tiling::tiles(self.image)
            .into_iter()
            .filter(|t| t.row < bits.rows() && t.col < bits.cols())
            .map(|t| {
                let bit = bits.get(t.row, t.col);
                (t, bit)
            })
            .collect::<Vec<_>>();
        Ok(self.embed_assignments(assignments))
    }

    /// Run every (tile, bit) through transform, policy and inverse transform, then reassemble.
    fn embed_assignments(&self, assignments: Vec<(Tile, bool)>) -> GrayImage {
        let policy = self.policy.as_policy();
        let transform = &self.transform;
        let processed = map_tiles(assignments, |(tile, bit)| {
            Self::embed_tile(transform, policy, tile, bit)
        });
        tiling::reassemble(self.image, &processed)
    }

    fn embed_tile(
        transform: &BlockTransform,
        policy: &dyn EmbeddingPolicy,
        tile: Tile,
        bit: bool,
    ) -> Tile {
        let mut coefficients = transform.forward(&tile.samples);
        policy.embed_bit(&mut coefficients, bit);
        log::trace!("tile ({}, {}) <- {}", tile.row, tile.col, bit as u8);
        Tile {
            samples: transform.inverse(&coefficients),
            ..tile
        }
    }
}

/// Reader to extract payloads from an image.
pub struct Reader<'a> {
    image: &'a GrayImage,
    original: Option<&'a GrayImage>,
    grid: TileGrid,
    transform: BlockTransform,
    policy: Policy,
}

impl<'a> Reader<'a> {
    /// Create a reader for the (possibly) marked image.
    pub fn new(image: &'a GrayImage, config: ReadConfig) -> Result<Self> {
        let grid = capacity::check_dimensions(image)?;
        Ok(Reader {
            image,
            original: None,
            grid,
            transform: BlockTransform::new(),
            policy: config.policy,
        })
    }

    /// Provide the unmodified image, required for non-blind policies.
    pub fn with_original(mut self, original: &'a GrayImage) -> Result<Self> {
        let grid = capacity::check_dimensions(original)?;
        if grid != self.grid {
            log::warn!("original tile grid {:?} differs from {:?}", grid, self.grid);
            return Err(Error::DimensionMismatch {
                expected: self.grid.shape(),
                found: grid.shape(),
            });
        }
        self.original = Some(original);
        Ok(self)
    }

    /// Number of bits this image can carry.
    pub fn capacity(&self) -> usize {
        self.grid.capacity()
    }

    fn check_original(&self) -> Result<()> {
        if !self.policy.as_policy().is_blind() && self.original.is_none() {
            log::warn!("non-blind policy selected, but no original image provided");
            return Err(Error::MissingOriginal);
        }
        Ok(())
    }

    /// Extract `bit_count` bits from the first tiles in row-major order.
    pub fn extract(&self, bit_count: usize) -> Result<Payload> {
        capacity::check_request(&self.grid, bit_count)?;
        self.check_original()?;
        log::debug!(
            "extracting {} bits from {}x{} tiles",
            bit_count,
            self.grid.rows,
            self.grid.cols
        );

        let tiles = tiling::tiles(self.image)
            .into_iter()
            .take(bit_count)
            .collect::<Vec<_>>();
        Ok(Payload::from(self.decode_tiles(tiles)?))
    }

    /// Extract a bitmap of `shape` (rows, cols), one bit from each tile at the same position.
    pub fn extract_grid(&self, shape: (usize, usize)) -> Result<BitGrid> {
        capacity::check_bitmap(&self.grid, shape, false)?;
        self.check_original()?;
        let (rows, cols) = shape;
        log::debug!(
            "extracting {}x{} bitmap from {}x{} tiles",
            rows,
            cols,
            self.grid.rows,
            self.grid.cols
        );

        let tiles = tiling::tiles(self.image)
            .into_iter()
            .filter(|t| t.row < rows && t.col < cols)
            .collect::<Vec<_>>();
        BitGrid::from_bits(rows, cols, self.decode_tiles(tiles)?)
    }

    fn decode_tiles(&self, tiles: Vec<Tile>) -> Result<Vec<bool>> {
        let policy = self.policy.as_policy();
        let transform = &self.transform;
        let original = self.original;
        map_tiles(tiles, |tile| {
            let coefficients = transform.forward(&tile.samples);
            let reference = original
                .map(|o| tiling::tile_at(o, tile.row, tile.col))
                .map(|t| transform.forward(&t.samples));
            let bit = policy.decode_bit(&coefficients, reference.as_ref());
            log::trace!("tile ({}, {}) -> {:?}", tile.row, tile.col, bit);
            bit
        })
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AdditiveBias, RelativeMagnitude};

    /// Symmetric within each tile, so (2, 3) and (3, 2) start out equal.
    fn cover(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let (dx, dy) = (x % 8, y % 8);
            image::Luma([(64 + dx * dy + 4 * (dx + dy) + 3 * (x / 8 + y / 8)) as u8])
        })
    }

    #[test]
    fn test_writer_rejects_dimensions() {
        let img = GrayImage::new(20, 16);
        assert_eq!(
            Writer::new(&img, WriteConfig::default()).err(),
            Some(Error::UnsupportedDimensions {
                width: 20,
                height: 16
            })
        );
        assert!(Reader::new(&img, ReadConfig::default()).is_err());
    }

    #[test]
    fn test_mark_leaves_trailing_tiles() {
        let img = cover(32, 16);
        let writer = Writer::new(&img, WriteConfig::default()).unwrap();
        assert_eq!(writer.capacity(), 8);
        let marked = writer.mark(&[true, false, true]).unwrap();
        assert_ne!(marked, img);
        for (x, y, p) in marked.enumerate_pixels() {
            let tile_index = (y / 8) * 4 + x / 8;
            if tile_index >= 3 {
                assert_eq!(p, img.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_empty_payload_is_identity() {
        let img = cover(16, 16);
        let writer = Writer::new(&img, WriteConfig::default()).unwrap();
        assert_eq!(writer.mark(&[]).unwrap(), img);
    }

    #[test]
    fn test_relative_round_trip() {
        let img = cover(48, 32);
        let bits = (0..24).map(|i| (i * 7) % 3 == 0).collect::<Vec<_>>();
        let marked = Writer::new(&img, WriteConfig::default())
            .unwrap()
            .mark(&bits)
            .unwrap();
        let reader = Reader::new(&marked, ReadConfig::default()).unwrap();
        assert_eq!(reader.extract(bits.len()).unwrap().bits(), &bits[..]);
        // Fewer bits is a prefix.
        assert_eq!(reader.extract(5).unwrap().bits(), &bits[..5]);
    }

    #[test]
    fn test_bias_needs_original() {
        let img = cover(16, 16);
        let config = ReadConfig::new(Policy::AdditiveBias(AdditiveBias::default()));
        let reader = Reader::new(&img, config).unwrap();
        assert_eq!(reader.extract(1).err(), Some(Error::MissingOriginal));
        assert_eq!(reader.extract_grid((1, 1)).err(), Some(Error::MissingOriginal));
    }

    #[test]
    fn test_original_must_match() {
        let img = cover(16, 16);
        let other = cover(16, 24);
        let reader = Reader::new(&img, ReadConfig::default()).unwrap();
        assert_eq!(
            reader.with_original(&other).err(),
            Some(Error::DimensionMismatch {
                expected: (2, 2),
                found: (3, 2)
            })
        );
    }

    #[test]
    fn test_bias_grid_round_trip() {
        let img = cover(64, 32);
        let policy = Policy::AdditiveBias(AdditiveBias::default());
        let wm = BitGrid::from_fn(3, 5, |r, c| (r * 5 + c) % 3 != 1);
        let marked = Writer::new(&img, WriteConfig::new(policy))
            .unwrap()
            .mark_grid(&wm)
            .unwrap();

        // Tiles outside the 3x5 bitmap are unchanged.
        for (x, y, p) in marked.enumerate_pixels() {
            if x >= 40 || y >= 24 {
                assert_eq!(p, img.get_pixel(x, y));
            }
        }

        let extracted = Reader::new(&marked, ReadConfig::new(policy))
            .unwrap()
            .with_original(&img)
            .unwrap()
            .extract_grid(wm.shape())
            .unwrap();
        assert_eq!(extracted, wm);
    }

    #[test]
    fn test_grid_too_large() {
        let img = cover(16, 16);
        let writer = Writer::new(&img, WriteConfig::default()).unwrap();
        assert_eq!(
            writer.mark_grid(&BitGrid::new(1, 3)).err(),
            Some(Error::PayloadTooLarge {
                bits: 3,
                capacity: 4
            })
        );
    }

    #[test]
    fn test_relative_policy_with_custom_positions() {
        let img = cover(32, 32);
        let policy = Policy::RelativeMagnitude(RelativeMagnitude {
            strength: 60.0,
            first: crate::dct2d::Position::new(1, 2),
            second: crate::dct2d::Position::new(2, 1),
        });
        let bits = [false, true, true, false, true, false, false, true];
        let marked = Writer::new(&img, WriteConfig::new(policy))
            .unwrap()
            .mark(&bits)
            .unwrap();
        let extracted = Reader::new(&marked, ReadConfig::new(policy))
            .unwrap()
            .extract(bits.len())
            .unwrap();
        assert_eq!(extracted.bits(), &bits);
    }
}
