/// Convert a reconstructed sample back to 8 bits, clipping to [0, 255] and rounding to nearest.
pub fn quantize(sample: f32) -> u8 {
    sample.clamp(0.0, 255.0).round() as u8
}

/// Assert that two slices are element wise within `max_error` of each other.
pub fn approx_equal(a: &[f32], b: &[f32], max_error: f32) {
    assert_eq!(a.len(), b.len(), "a and b are not equal length");
    for delta in a.iter().zip(b.iter()).map(|(av, bv)| (*av - *bv).abs()) {
        if delta > max_error {
            panic!("a: {a:?}, b: {b:?}, delta was {delta}, this exceeded allowed {max_error}.");
        }
    }
}
