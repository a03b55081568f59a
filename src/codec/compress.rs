/// Re-encoding pipeline for a single image
///
/// Decode the original data URL into a bitmap, clamp its dimensions,
/// resize onto a surface of that size, then encode in the selected format.
/// The work is CPU-bound, so it runs on tokio's blocking pool.

use image::imageops::FilterType;
use tokio::task;
use tracing::debug;

use super::data_url::DataUrl;
use super::dimensions::clamp_dimensions;
use super::encode::encode_image;
use crate::error::CompressError;
use crate::state::entry::CompressedImage;
use crate::state::settings::CompressionSettings;

/// Output of one compression: the record stored on the entry plus the raw
/// encoded bytes for the preview
#[derive(Debug, Clone)]
pub struct Compression {
    pub image: CompressedImage,
    pub bytes: Vec<u8>,
}

/// Compress an image with a settings snapshot taken at dispatch time
pub async fn compress(
    original: DataUrl,
    settings: CompressionSettings,
) -> Result<Compression, CompressError> {
    task::spawn_blocking(move || compress_blocking(&original, &settings))
        .await
        .map_err(|e| CompressError::Join(e.to_string()))?
}

/// Blocking implementation of `compress`
pub fn compress_blocking(
    original: &DataUrl,
    settings: &CompressionSettings,
) -> Result<Compression, CompressError> {
    let bytes = original.decode()?;

    let img = image::load_from_memory(&bytes).map_err(|e| CompressError::decode(e.to_string()))?;

    let (source_width, source_height) = (img.width(), img.height());
    let (width, height) = clamp_dimensions(
        source_width,
        source_height,
        settings.max_width,
        settings.max_height,
    );

    let surface = if (width, height) == (source_width, source_height) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let encoded = encode_image(&surface, settings.format, settings.quality_fraction())?;
    let data_url = DataUrl::encode(settings.format.mime_type(), &encoded);
    let byte_size = data_url.estimated_byte_size();

    debug!(
        "🗜️  {}x{} -> {}x{} {} q={} ({} bytes)",
        source_width,
        source_height,
        width,
        height,
        settings.format,
        settings.quality,
        byte_size
    );

    Ok(Compression {
        image: CompressedImage {
            data_url,
            byte_size,
            width,
            height,
            format: settings.format,
        },
        bytes: encoded,
    })
}
