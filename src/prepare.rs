//! Helpers to turn arbitrary caller images into something the engine accepts.
//!
//! The engine itself rejects anything that is not a single intensity plane with dimensions that
//! are a multiple of the tile size; these are the conversions a caller would do beforehand.

use crate::dct2d::BLOCK_SIZE;
use image::GrayImage;

/// Reduce an image of any color type to a single 8 bit intensity plane.
pub fn to_intensity(image: &image::DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Round a dimension up to the next multiple of the tile size.
fn round_up(v: u32) -> u32 {
    let block = BLOCK_SIZE as u32;
    v.div_ceil(block) * block
}

/// Resize the image so both dimensions are a multiple of the tile size, rounding up.
///
/// An image that already fits is returned unchanged.
pub fn fit_to_tiles(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = (round_up(width), round_up(height));
    if (new_width, new_height) == (width, height) {
        return image.clone();
    }
    log::debug!("resizing {width}x{height} to {new_width}x{new_height}");
    image::imageops::resize(
        image,
        new_width,
        new_height,
        image::imageops::FilterType::Triangle,
    )
}
