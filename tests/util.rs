#![allow(dead_code)]
use image::GrayImage;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A smooth cover with a little gaussian noise, all samples well inside [0, 255].
///
/// Keeping the noise small keeps the unperturbed coefficient pairs close together, which is the
/// situation the relative magnitude policy is designed for.
pub fn generate_cover(seed: u64, width: u32, height: u32) -> GrayImage {
    let mut generator = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0f32, 2.0).unwrap();
    GrayImage::from_fn(width, height, |x, y| {
        let base = 80.0 + 60.0 * (x as f32 / width as f32) + 40.0 * (y as f32 / height as f32);
        let v: f32 = base + generator.sample(noise);
        image::Luma([v.clamp(40.0, 215.0).round() as u8])
    })
}

/// A random text of printable ASCII characters.
pub fn generate_text(seed: u64, length: usize) -> String {
    let mut generator = ChaCha8Rng::seed_from_u64(seed);
    (0..length)
        .map(|_| generator.gen_range(b' '..=b'~') as char)
        .collect()
}

/// Add uniform noise in [-amplitude, amplitude] to every sample.
pub fn add_noise(seed: u64, image: &GrayImage, amplitude: i16) -> GrayImage {
    let mut generator = ChaCha8Rng::seed_from_u64(seed);
    let mut noisy = image.clone();
    for p in noisy.pixels_mut() {
        let v = p.0[0] as i16 + generator.gen_range(-amplitude..=amplitude);
        p.0[0] = v.clamp(0, 255) as u8;
    }
    noisy
}
