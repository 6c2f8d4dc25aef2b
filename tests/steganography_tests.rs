use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use lsb_ascii::{
    StegoError,
    bits::{bit_length, decode_length, encode_length, from_bits, header_length, to_bits},
    raster::{Carrier, Raster},
    steganography::{Location, embed, extract, locate, max_message_len},
};
use rand::{Rng, RngCore};

/// 创建一个带有随机像素的 RGB 图像
fn random_rgb(width: u32, height: u32) -> RgbImage {
    let mut raw = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw);
    RgbImage::from_raw(width, height, raw).expect("Buffer size matches dimensions.")
}

/// 生成指定长度的随机可打印 ASCII 字符串
fn random_ascii(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(rng.random_range(0x20u8..0x7F)))
        .collect()
}

#[test]
fn test_bit_length() {
    assert_eq!(bit_length(0), 0);
    assert_eq!(bit_length(1), 1);
    assert_eq!(bit_length(12), 4);
    assert_eq!(bit_length(48), 6);
    assert_eq!(bit_length(u64::MAX), 64);
}

#[test]
fn test_header_length_examples() {
    // 2x2x3 = 12 -> 4 位 -> 向上取整到 6
    assert_eq!(header_length(2, 2, 3), 6);
    // 4x4x3 = 48 -> 6 位，已是 3 的倍数
    assert_eq!(header_length(4, 4, 3), 6);
    // 100x100x4 = 40000 -> 16 位
    assert_eq!(header_length(100, 100, 4), 16);
    assert_eq!(header_length(0, 10, 3), 0);
}

#[test]
fn test_header_length_monotonic_and_aligned() {
    for channels in 1..=4u8 {
        let mut previous = 0;
        for width in 1..=300u32 {
            let h = header_length(width, 1, channels);
            assert_eq!(h % u64::from(channels), 0, "width {width}, channels {channels}");
            assert!(h >= u64::from(bit_length(u64::from(width) * u64::from(channels))));
            assert!(h >= previous, "header shrank at width {width}");
            previous = h;
        }
    }
}

#[test]
fn test_to_bits_is_msb_first() -> anyhow::Result<()> {
    let bits = to_bits("A")?;
    assert_eq!(bits, vec![false, true, false, false, false, false, false, true]);
    assert_eq!(to_bits("Hi")?.len(), 16);
    assert!(to_bits("")?.is_empty());
    Ok(())
}

#[test]
fn test_to_bits_rejects_non_ascii() {
    assert_eq!(
        to_bits("café"),
        Err(StegoError::NonAsciiCharacter {
            character: 'é',
            index: 3
        })
    );
}

#[test]
fn test_from_bits() -> anyhow::Result<()> {
    let message = "Hello, LSB!\n\t~";
    assert_eq!(from_bits(&to_bits(message)?)?, message);
    assert_eq!(
        from_bits(&[true; 9]),
        Err(StegoError::BinaryLength { length: 9 })
    );
    Ok(())
}

#[test]
fn test_length_field_encoding() {
    assert_eq!(
        encode_length(9, 6),
        vec![false, false, true, false, false, true]
    );
    assert_eq!(decode_length(&encode_length(9, 6)), Some(9));
    assert_eq!(encode_length(u64::MAX, 68)[..4], [false; 4]);
    assert_eq!(decode_length(&encode_length(u64::MAX, 68)), Some(u64::MAX));
    assert_eq!(decode_length(&[true; 65]), None);
    assert_eq!(decode_length(&[]), Some(0));
}

#[test]
fn test_locate_row_major() {
    assert_eq!(locate(0, 4, 3), Location { x: 0, y: 0, channel: 0 });
    assert_eq!(locate(2, 4, 3), Location { x: 0, y: 0, channel: 2 });
    assert_eq!(locate(3, 4, 3), Location { x: 1, y: 0, channel: 0 });
    assert_eq!(locate(13, 4, 3), Location { x: 0, y: 1, channel: 1 });
    assert_eq!(locate(47, 4, 3), Location { x: 3, y: 3, channel: 2 });
}

#[test]
fn test_too_small_raster_is_rejected() {
    let mut raster: RgbImage = ImageBuffer::from_pixel(2, 2, Rgb([10, 20, 30]));
    let original = raster.clone();

    assert_eq!(
        embed(&mut raster, "A"),
        Err(StegoError::MessageLength {
            required: 14,
            available: 12
        })
    );
    assert_eq!(raster, original, "A failed embed must not touch the raster.");
}

#[test]
fn test_embed_and_extract_single_char() -> anyhow::Result<()> {
    let mut raster: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([10, 21, 32]));
    embed(&mut raster, "A")?;
    assert_eq!(extract(&raster)?, "A");
    Ok(())
}

#[test]
fn test_capacity_boundary() -> anyhow::Result<()> {
    // 12 个通道：4 位头部 + 8 位消息恰好填满
    let mut exact: GrayImage = ImageBuffer::from_pixel(12, 1, Luma([128]));
    assert_eq!(header_length(12, 1, 1), 4);
    embed(&mut exact, "Z")?;
    assert_eq!(extract(&exact)?, "Z");

    // 11 个通道：少一位即失败
    let mut short: GrayImage = ImageBuffer::from_pixel(11, 1, Luma([128]));
    assert_eq!(
        embed(&mut short, "Z"),
        Err(StegoError::MessageLength {
            required: 12,
            available: 11
        })
    );
    Ok(())
}

#[test]
fn test_non_ascii_is_rejected_without_writes() {
    let mut raster = random_rgb(16, 16);
    let original = raster.clone();

    let result = embed(&mut raster, "café");
    assert!(matches!(
        result,
        Err(StegoError::NonAsciiCharacter { character: 'é', .. })
    ));
    assert_eq!(raster, original);
}

#[test]
fn test_bit_isolation() -> anyhow::Result<()> {
    let mut raster = random_rgb(32, 32);
    let original = raster.clone();
    let message = "Only the least significant bits may change.";

    embed(&mut raster, message)?;

    let frame = (header_length(32, 32, 3) + 8 * message.len() as u64) as usize;
    for (i, (&after, &before)) in raster.as_raw().iter().zip(original.as_raw()).enumerate() {
        assert!(after.abs_diff(before) <= 1, "channel {i} changed by more than 1");
        assert_eq!(after & 0xFE, before & 0xFE);
        if i >= frame {
            assert_eq!(after, before, "channel {i} lies outside the frame");
        }
    }
    Ok(())
}

#[test]
fn test_random_round_trips() -> anyhow::Result<()> {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let width = rng.random_range(8..64);
        let height = rng.random_range(8..64);
        let mut raster = random_rgb(width, height);
        let len = rng.random_range(0..=max_message_len(&raster) as usize);
        let message = random_ascii(len);

        embed(&mut raster, &message)?;
        assert_eq!(extract(&raster)?, message);
    }
    Ok(())
}

#[test]
fn test_full_capacity_rgba_round_trip() -> anyhow::Result<()> {
    let mut raster: RgbaImage = ImageBuffer::from_pixel(20, 10, Rgba([255, 0, 127, 255]));
    let message = random_ascii(max_message_len(&raster) as usize);

    embed(&mut raster, &message)?;
    assert_eq!(extract(&raster)?, message);

    let too_long = format!("{message}!");
    assert!(matches!(
        embed(&mut raster, &too_long),
        Err(StegoError::MessageLength { .. })
    ));
    Ok(())
}

#[test]
fn test_empty_message_round_trip() -> anyhow::Result<()> {
    let mut raster = random_rgb(4, 4);
    embed(&mut raster, "")?;
    assert_eq!(extract(&raster)?, "");
    Ok(())
}

#[test]
fn test_extract_rejects_corrupt_header() {
    // 头部全为 1：声明 63 位，超过 48 个通道
    let raster: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([255, 255, 255]));
    assert_eq!(
        extract(&raster),
        Err(StegoError::CorruptHeader {
            declared: 63,
            capacity: 48
        })
    );
}

#[test]
fn test_extract_rejects_partial_byte_length() {
    let mut raster: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([0, 0, 0]));
    for (i, bit) in encode_length(9, 6).into_iter().enumerate() {
        let loc = locate(i as u64, 4, 3);
        raster.set_channel(loc.x, loc.y, loc.channel, u8::from(bit));
    }

    assert_eq!(extract(&raster), Err(StegoError::BinaryLength { length: 9 }));
}

#[test]
fn test_empty_raster() {
    let mut raster = RgbImage::new(0, 0);
    assert_eq!(embed(&mut raster, "A"), Err(StegoError::EmptyRaster));
    assert_eq!(extract(&raster), Err(StegoError::EmptyRaster));
    assert_eq!(max_message_len(&raster), 0);
}

#[test]
fn test_carrier_keeps_channel_layout() -> anyhow::Result<()> {
    let rgba = Carrier::from(DynamicImage::new_rgba8(5, 5));
    assert_eq!(rgba.raster().channel_count(), 4);

    let gray = Carrier::from(DynamicImage::new_luma8(5, 5));
    assert_eq!(gray.raster().channel_count(), 1);

    // 16 位图像被转换为 8 位布局
    let wide = Carrier::from(DynamicImage::new_rgb16(5, 5));
    assert!(matches!(wide, Carrier::Rgb(_)));
    let wide_alpha = Carrier::from(DynamicImage::new_luma_a16(5, 5));
    assert!(matches!(wide_alpha, Carrier::Rgba(_)));

    let mut carrier = Carrier::from(DynamicImage::new_rgb8(10, 10));
    embed(carrier.raster_mut(), "dyn")?;
    let restored = Carrier::from(carrier.into_dynamic());
    assert_eq!(extract(restored.raster())?, "dyn");
    Ok(())
}

#[test]
fn test_carrier_layout_for_container() {
    let gray = || Carrier::from(DynamicImage::new_luma8(3, 3));
    let gray_alpha = || Carrier::from(DynamicImage::new_luma_a8(3, 3));

    assert!(matches!(gray().for_container("png"), Carrier::Luma(_)));
    assert!(matches!(gray().for_container("tiff"), Carrier::Luma(_)));
    assert!(matches!(gray_alpha().for_container("png"), Carrier::LumaAlpha(_)));

    for extension in ["bmp", "qoi", "webp"] {
        assert!(matches!(gray().for_container(extension), Carrier::Rgb(_)));
    }
    for extension in ["bmp", "tiff", "qoi", "webp"] {
        assert!(matches!(gray_alpha().for_container(extension), Carrier::Rgba(_)));
    }

    let rgb = Carrier::from(DynamicImage::new_rgb8(3, 3)).for_container("bmp");
    assert_eq!(rgb.raster().channel_count(), 3);
}
