use block_dct_stego as stego;
use image::GrayImage;
mod util;
use util::{generate_cover, generate_text, init_logging};

#[test]
fn test_text_round_trip() {
    init_logging();

    // ================ Start of embedding section. ================

    let cover = generate_cover(1, 256, 128);
    assert_eq!(stego::capacity(&cover), 512);

    // 64 characters, exactly the capacity of the image.
    let text = generate_text(1, 64);
    let payload = stego::text_to_bits(&text).unwrap();
    let marked = stego::embed_relative(&cover, &payload, 100.0).unwrap();

    // ================ End of embedding section. ================

    // ================ Start of extraction section. ================

    let extracted = stego::extract_relative(&marked, text.len() * 8, 100.0).unwrap();
    assert_eq!(extracted, payload);
    assert_eq!(stego::bits_to_text(&extracted), text);

    // ================ End of extraction section. ================

    // Every tile is modified, yet the distortion stays moderate.
    let psnr = stego::metrics::psnr(&cover, &marked).unwrap();
    println!("relative psnr: {psnr}");
    assert!(psnr > 25.0);
}

#[test]
fn test_short_message_leaves_rest_untouched() {
    init_logging();
    let cover = generate_cover(2, 128, 64);
    let payload = stego::text_to_bits("lishchuk").unwrap();
    let marked = stego::embed_relative(&cover, &payload, 100.0).unwrap();

    // 64 bits, the first 64 tiles of 128; that is the top half of the image.
    for (x, y, p) in marked.enumerate_pixels() {
        if y >= 32 {
            assert_eq!(p, cover.get_pixel(x, y));
        }
    }

    let extracted = stego::extract_relative(&marked, payload.len(), 100.0).unwrap();
    assert_eq!(stego::bits_to_text(&extracted), "lishchuk");
}

#[test]
fn test_zero_image_scenario() {
    // 32x32 all-zero image has 16 tiles, the payload uses the first four.
    let cover = GrayImage::new(32, 32);
    let payload: stego::Payload = "1010".parse().unwrap();
    let marked = stego::embed_relative(&cover, &payload, 100.0).unwrap();
    let extracted = stego::extract_relative(&marked, 4, 100.0).unwrap();
    assert_eq!(extracted.to_string(), "1010");

    // Tiles 4 to 15 were not touched.
    for (x, y, p) in marked.enumerate_pixels() {
        if y >= 8 {
            assert_eq!(p.0[0], 0, "sample ({x}, {y}) changed");
        }
    }
}

#[test]
fn test_capacity_boundary() {
    let cover = generate_cover(3, 64, 32);
    let capacity = stego::capacity(&cover);
    assert_eq!(capacity, 32);

    let exact = stego::Payload::from(vec![true; capacity]);
    assert!(stego::embed_relative(&cover, &exact, 100.0).is_ok());

    let over = stego::Payload::from(vec![true; capacity + 1]);
    assert_eq!(
        stego::embed_relative(&cover, &over, 100.0),
        Err(stego::Error::PayloadTooLarge {
            bits: 33,
            capacity: 32
        })
    );

    assert!(stego::extract_relative(&cover, capacity, 100.0).is_ok());
    assert_eq!(
        stego::extract_relative(&cover, capacity + 1, 100.0),
        Err(stego::Error::RequestExceedsCapacity {
            bits: 33,
            capacity: 32
        })
    );
}

#[test]
fn test_dimension_validation() {
    let payload = stego::Payload::from(vec![false]);
    for (width, height) in [(30, 32), (32, 30), (9, 9)] {
        let cover = GrayImage::new(width, height);
        let expected = stego::Error::UnsupportedDimensions { width, height };
        assert_eq!(
            stego::embed_relative(&cover, &payload, 100.0),
            Err(expected.clone())
        );
        assert_eq!(stego::extract_relative(&cover, 1, 100.0), Err(expected));
    }

    // Fitting the cover first makes it usable.
    let fitted = stego::prepare::fit_to_tiles(&GrayImage::new(30, 30));
    assert!(stego::embed_relative(&fitted, &payload, 100.0).is_ok());
}

#[test]
fn test_invalid_bit_string() {
    assert_eq!(
        "10a1".parse::<stego::Payload>(),
        Err(stego::Error::InvalidPayloadEncoding {
            position: 2,
            found: 'a'
        })
    );
    assert_eq!(
        stego::text_to_bits("\u{100}"),
        Err(stego::Error::UnrepresentableCharacter('\u{100}'))
    );
}
