//! Distortion measures between a cover and its marked version.

use crate::error::{Error, Result};
use image::GrayImage;

fn check_same_shape(a: &GrayImage, b: &GrayImage) -> Result<()> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::DimensionMismatch {
            expected: (a.height() as usize, a.width() as usize),
            found: (b.height() as usize, b.width() as usize),
        });
    }
    Ok(())
}

/// Mean squared error over all samples.
pub fn mse(a: &GrayImage, b: &GrayImage) -> Result<f64> {
    check_same_shape(a, b)?;
    let count = a.as_raw().len();
    if count == 0 {
        return Ok(0.0);
    }
    let sum: f64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw().iter())
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum();
    Ok(sum / count as f64)
}

/// Peak signal to noise ratio in dB for 8 bit samples, infinite for identical images.
pub fn psnr(a: &GrayImage, b: &GrayImage) -> Result<f64> {
    let mse = mse(a, b)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0 * 255.0 / mse).log10())
}
