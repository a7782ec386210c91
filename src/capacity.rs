//! Validation that runs before any tile is modified.

use crate::dct2d::BLOCK_SIZE;
use crate::error::{Error, Result};
use crate::tiling::TileGrid;
use image::GrayImage;

/// Number of bits that can be embedded into this image, one per full tile.
pub fn capacity(image: &GrayImage) -> usize {
    TileGrid::of(image).capacity()
}

/// Ensure the image splits into full tiles without a remainder, returning its tile grid.
pub fn check_dimensions(image: &GrayImage) -> Result<TileGrid> {
    let (width, height) = image.dimensions();
    let block = BLOCK_SIZE as u32;
    if width % block != 0 || height % block != 0 {
        log::warn!("rejecting {width}x{height} image, not a multiple of {BLOCK_SIZE}");
        return Err(Error::UnsupportedDimensions { width, height });
    }
    Ok(TileGrid::of(image))
}

/// Ensure a payload of `bits` fits in the grid.
pub fn check_payload(grid: &TileGrid, bits: usize) -> Result<()> {
    let capacity = grid.capacity();
    if bits > capacity {
        log::warn!("payload of {bits} bits exceeds capacity {capacity}");
        return Err(Error::PayloadTooLarge { bits, capacity });
    }
    Ok(())
}

/// Ensure an extraction of `bits` can be served by the grid.
pub fn check_request(grid: &TileGrid, bits: usize) -> Result<()> {
    let capacity = grid.capacity();
    if bits > capacity {
        log::warn!("request for {bits} bits exceeds capacity {capacity}");
        return Err(Error::RequestExceedsCapacity { bits, capacity });
    }
    Ok(())
}

/// Ensure a bitmap of `shape` (rows, cols) fits onto the tile grid, one bit per tile.
///
/// A bitmap wider or taller than the grid is rejected even when its total bit count would fit,
/// as its bits are placed positionally.
pub fn check_bitmap(grid: &TileGrid, shape: (usize, usize), embedding: bool) -> Result<()> {
    let (rows, cols) = shape;
    if rows <= grid.rows && cols <= grid.cols {
        return Ok(());
    }
    let bits = rows.saturating_mul(cols);
    let capacity = grid.capacity();
    log::warn!("bitmap of {rows}x{cols} does not fit tile grid {}x{}", grid.rows, grid.cols);
    if embedding {
        Err(Error::PayloadTooLarge { bits, capacity })
    } else {
        Err(Error::RequestExceedsCapacity { bits, capacity })
    }
}
