//! Image normalization before analysis.
//!
//! The analysis service rejects very large images, so anything that does not
//! fit inside `MAX_DIMENSION` x `MAX_DIMENSION` is downscaled and re-encoded in
//! its original format. Smaller images pass through untouched.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use ropsdoc_core::DocError;
use tracing::debug;

pub const MAX_DIMENSION: u32 = 2000;

#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub resized: bool,
}

/// Validate that `bytes` hold a JPEG or PNG and bound its resolution.
pub fn normalize_image(bytes: &[u8]) -> Result<NormalizedImage, DocError> {
    let format = image::guess_format(bytes)
        .map_err(|e| DocError::InvalidImage(format!("unrecognized image data: {e}")))?;

    let content_type = match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        other => {
            return Err(DocError::UnsupportedFile(format!(
                "unsupported image format {other:?}; please upload a JPEG, PNG, or PDF file"
            )));
        }
    };

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DocError::InvalidImage(e.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());
    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return Ok(NormalizedImage {
            bytes: bytes.to_vec(),
            content_type,
            width,
            height,
            resized: false,
        });
    }

    let scaled = decoded.thumbnail(MAX_DIMENSION, MAX_DIMENSION);
    let encoded = encode(&scaled, format)?;
    debug!(
        from = %format!("{width}x{height}"),
        to = %format!("{}x{}", scaled.width(), scaled.height()),
        "Downscaled uploaded image"
    );

    Ok(NormalizedImage {
        bytes: encoded,
        content_type,
        width: scaled.width(),
        height: scaled.height(),
        resized: true,
    })
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, DocError> {
    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), format)
        .map_err(|e| DocError::InvalidImage(format!("failed to re-encode image: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([200u8, 10, 10])));
        encode(&img, ImageFormat::Png).unwrap()
    }

    #[test]
    fn small_image_passes_through() {
        let bytes = png(40, 30);
        let out = normalize_image(&bytes).unwrap();
        assert!(!out.resized);
        assert_eq!(out.bytes, bytes);
        assert_eq!(out.content_type, "image/png");
    }

    #[test]
    fn large_image_is_downscaled_keeping_aspect() {
        let out = normalize_image(&png(2500, 1000)).unwrap();
        assert!(out.resized);
        assert_eq!((out.width, out.height), (2000, 800));
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn jpeg_is_reencoded_as_jpeg() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(2100, 2100, Rgb([1u8, 2, 3])));
        let jpeg = encode(&img, ImageFormat::Jpeg).unwrap();
        let out = normalize_image(&jpeg).unwrap();
        assert_eq!(out.content_type, "image/jpeg");
        assert_eq!((out.width, out.height), (2000, 2000));
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn rejects_garbage() {
        let err = normalize_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DocError::InvalidImage(_)));
    }

    #[test]
    fn rejects_other_formats() {
        let gif = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";
        let err = normalize_image(gif).unwrap_err();
        assert!(matches!(err, DocError::UnsupportedFile(_)));
    }
}
