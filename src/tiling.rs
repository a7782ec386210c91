//! Splitting an intensity image into 8x8 tiles and putting processed tiles back.

use crate::dct2d::{BLOCK_AREA, BLOCK_SIZE};
use image::GrayImage;

/// The grid of full tiles that fits in an image.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct TileGrid {
    pub rows: usize,
    pub cols: usize,
}

impl TileGrid {
    /// Grid of full tiles, partial tiles at the bottom and right edge are not counted.
    pub fn of(image: &GrayImage) -> Self {
        TileGrid {
            rows: image.height() as usize / BLOCK_SIZE,
            cols: image.width() as usize / BLOCK_SIZE,
        }
    }

    /// Number of tiles, one bit can be embedded per tile.
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// A single 8x8 block of samples, `row` and `col` are in tile units.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub samples: [f32; BLOCK_AREA],
}

impl Tile {
    /// Pixel coordinate (x, y) of the top left sample.
    pub fn origin(&self) -> (u32, u32) {
        ((self.col * BLOCK_SIZE) as u32, (self.row * BLOCK_SIZE) as u32)
    }
}

/// Read the tile at the provided tile coordinate.
pub fn tile_at(image: &GrayImage, row: usize, col: usize) -> Tile {
    let mut samples = [0f32; BLOCK_AREA];
    let (x0, y0) = ((col * BLOCK_SIZE) as u32, (row * BLOCK_SIZE) as u32);
    for (i, sample) in samples.iter_mut().enumerate() {
        let (dy, dx) = ((i / BLOCK_SIZE) as u32, (i % BLOCK_SIZE) as u32);
        *sample = image.get_pixel(x0 + dx, y0 + dy).0[0] as f32;
    }
    Tile { row, col, samples }
}

/// All full tiles of the image in row-major order.
pub fn tiles(image: &GrayImage) -> Vec<Tile> {
    let grid = TileGrid::of(image);
    (0..grid.rows)
        .flat_map(|row| (0..grid.cols).map(move |col| (row, col)))
        .map(|(row, col)| tile_at(image, row, col))
        .collect()
}

/// Create a new image from `image`, with the samples covered by `processed` replaced.
///
/// Tile samples are clipped to [0, 255] and rounded, everything not covered by a processed tile
/// is copied unchanged.
pub fn reassemble(image: &GrayImage, processed: &[Tile]) -> GrayImage {
    let mut result = image.clone();
    for tile in processed.iter() {
        let (x0, y0) = tile.origin();
        for (i, sample) in tile.samples.iter().enumerate() {
            let (dy, dx) = ((i / BLOCK_SIZE) as u32, (i % BLOCK_SIZE) as u32);
            result.get_pixel_mut(x0 + dx, y0 + dy).0[0] = crate::util::quantize(*sample);
        }
    }
    result
}
