use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;
use webp::{Encoder as WebPEncoder, WebPMemory};

use crate::error::CompressError;
use crate::state::settings::OutputFormat;

/// Map a quality fraction in [0, 1] to the JPEG encoder's 1..=100 scale
pub fn jpeg_quality(fraction: f32) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
}

/// Drop the alpha channel by compositing onto opaque black
///
/// `to_rgb8` alone would keep whatever colour sits under a transparent pixel.
fn flatten_on_black(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let over = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        Rgb([over(r), over(g), over(b)])
    })
}

/// Encode a bitmap in the requested format
///
/// JPEG and WebP are lossy and honour `quality`; PNG is always lossless.
/// JPEG has no alpha, so transparent areas come out black.
pub fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, CompressError> {
    match format {
        OutputFormat::Jpeg => {
            let mut buf = Cursor::new(Vec::new());
            let encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality));
            flatten_on_black(img)
                .write_with_encoder(encoder)
                .map_err(|e| CompressError::encode(format!("JPEG: {e}")))?;
            Ok(buf.into_inner())
        }
        OutputFormat::Png => {
            let mut buf = Cursor::new(Vec::new());
            let encoder = PngEncoder::new(&mut buf);
            img.to_rgba8()
                .write_with_encoder(encoder)
                .map_err(|e| CompressError::encode(format!("PNG: {e}")))?;
            Ok(buf.into_inner())
        }
        OutputFormat::Webp => {
            let rgba = img.to_rgba8();
            let encoder = WebPEncoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
            let webp: WebPMemory = encoder.encode(quality.clamp(0.0, 1.0) * 100.0);
            Ok(webp.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8])
        }))
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(2.0), 100);
    }

    #[test]
    fn test_encode_jpeg() {
        let data = encode_image(&gradient(16, 16), OutputFormat::Jpeg, 0.8).unwrap();
        // JPEG SOI marker
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_jpeg_from_rgba() {
        let img = DynamicImage::new_rgba8(8, 8);
        assert!(encode_image(&img, OutputFormat::Jpeg, 0.5).is_ok());
    }

    #[test]
    fn test_encode_png() {
        let data = encode_image(&gradient(16, 16), OutputFormat::Png, 0.8).unwrap();
        assert_eq!(&data[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_webp() {
        let data = encode_image(&gradient(16, 16), OutputFormat::Webp, 0.8).unwrap();
        // RIFF container
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WEBP");
    }

    #[test]
    fn test_lower_jpeg_quality_is_smaller() {
        let img = gradient(64, 64);
        let low = encode_image(&img, OutputFormat::Jpeg, 0.1).unwrap();
        let high = encode_image(&img, OutputFormat::Jpeg, 1.0).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_lower_webp_quality_is_smaller() {
        let img = gradient(64, 64);
        let low = encode_image(&img, OutputFormat::Webp, 0.1).unwrap();
        let high = encode_image(&img, OutputFormat::Webp, 1.0).unwrap();
        assert!(low.len() < high.len(), "{} >= {}", low.len(), high.len());
    }

    #[test]
    fn test_jpeg_transparent_pixels_become_black() {
        // Fully transparent red: the hidden colour must not survive
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 0])));
        let data = encode_image(&img, OutputFormat::Jpeg, 1.0).unwrap();

        let decoded = image::load_from_memory(&data).unwrap().to_rgb8();
        for pixel in decoded.pixels() {
            assert!(pixel.0.iter().all(|&c| c < 16), "expected black, got {:?}", pixel);
        }
    }

    #[test]
    fn test_flatten_scales_by_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([200, 100, 255, 128])));
        let flat = flatten_on_black(&img);
        assert_eq!(flat.get_pixel(0, 0).0, [100, 50, 128]);
    }
}
