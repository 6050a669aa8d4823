//! Encoding of stitched images
//!
//! This module turns an [`ImageBuffer`] into PNG or JPEG bytes and writes
//! them to disk.
//!
//! # Format Support
//!
//! - **PNG**: Lossless; quality selects the compression level
//! - **JPEG**: Lossy with quality 1-100; the alpha channel is dropped
//!
//! # Examples
//!
//! ```
//! use stitch_core::{
//!     capture::ImageBuffer,
//!     util::encode::{ImageFormat, encode_image},
//! };
//!
//! let img = ImageBuffer::from_test_pattern(640, 480);
//! let png_bytes = encode_image(&img, ImageFormat::Png, 80).unwrap();
//! assert!(!png_bytes.is_empty());
//! ```

use std::{fmt, io::Cursor, path::Path, str::FromStr};

use image::{
    ImageEncoder,
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    capture::ImageBuffer,
    error::{StitchError, StitchResult},
};

/// Output format of a stitched image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless PNG
    #[default]
    Png,
    /// Lossy JPEG
    Jpeg,
}

impl ImageFormat {
    /// Returns the format name as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    /// Returns the conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    /// Guesses the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            other => Err(StitchError::InvalidParameter {
                parameter: "format".to_string(),
                reason: format!("unsupported image format '{}'", other),
            }),
        }
    }
}

/// Maps a quality value (0-100) to a PNG compression level
///
/// ```
/// use image::codecs::png::CompressionType;
/// use stitch_core::util::encode::compression_type_from_quality;
///
/// assert!(matches!(compression_type_from_quality(20), CompressionType::Fast));
/// assert!(matches!(compression_type_from_quality(90), CompressionType::Best));
/// ```
pub fn compression_type_from_quality(quality: u8) -> CompressionType {
    match quality {
        0..=33 => CompressionType::Fast,
        34..=66 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Encodes an image as PNG with default compression
pub fn encode_png(buffer: &ImageBuffer) -> StitchResult<Vec<u8>> {
    encode_png_with_compression(buffer, CompressionType::Default)
}

/// Encodes an image as PNG with the given compression level
pub fn encode_png_with_compression(
    buffer: &ImageBuffer,
    compression: CompressionType,
) -> StitchResult<Vec<u8>> {
    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(Cursor::new(&mut output), compression, FilterType::Adaptive);

    let rgba = buffer.to_rgba8();
    let (width, height) = rgba.dimensions();

    encoder
        .write_image(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| StitchError::EncodingFailed {
            format: "png".to_string(),
            reason: e.to_string(),
        })?;

    Ok(output)
}

/// Encodes an image as JPEG with quality 1-100 (clamped)
///
/// Transparent canvas areas become black, since JPEG has no alpha channel.
pub fn encode_jpeg(buffer: &ImageBuffer, quality: u8) -> StitchResult<Vec<u8>> {
    let quality = quality.clamp(1, 100);

    let rgb = buffer.inner().to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(StitchError::InvalidParameter {
            parameter: "dimensions".to_string(),
            reason: "Image dimensions must be > 0".to_string(),
        });
    }

    let mut output = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut output), quality)
        .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| StitchError::EncodingFailed {
            format: "jpeg".to_string(),
            reason: e.to_string(),
        })?;

    Ok(output)
}

/// Encodes an image in `format`
pub fn encode_image(
    buffer: &ImageBuffer,
    format: ImageFormat,
    quality: u8,
) -> StitchResult<Vec<u8>> {
    match format {
        ImageFormat::Png => {
            encode_png_with_compression(buffer, compression_type_from_quality(quality))
        }
        ImageFormat::Jpeg => encode_jpeg(buffer, quality),
    }
}

/// Encodes an image and writes it to `path`, returning the number of bytes
/// written
pub fn save_image(
    buffer: &ImageBuffer,
    path: impl AsRef<Path>,
    format: ImageFormat,
    quality: u8,
) -> StitchResult<usize> {
    let bytes = encode_image(buffer, format, quality)?;
    std::fs::write(path.as_ref(), &bytes)?;
    debug!(
        "Wrote {}x{} {} ({} bytes) to {}",
        buffer.width(),
        buffer.height(),
        format,
        bytes.len(),
        path.as_ref().display()
    );
    Ok(bytes.len())
}
