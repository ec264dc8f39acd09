//! Photo decoding with EXIF orientation extraction.
//!
//! The orientation is read and stored as a tag but not applied here. The
//! crop session normalizes it exactly once, before any corner is mapped.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode a photo (JPEG or PNG) into RGB pixels plus its orientation tag.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are empty.
/// Returns `DecodeError::CorruptedFile` if the image cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let decoded = DecodedImage::from_rgb_image(img.into_rgb8()).with_orientation(orientation);
    log::debug!(
        "decoded {}x{} image, orientation {:?}",
        decoded.width,
        decoded.height,
        orientation
    );
    Ok(decoded)
}

/// Extract the EXIF orientation from encoded image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_jpeg;

    fn gray_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = DecodedImage::new(width, height, vec![128; (width * height * 3) as usize]);
        encode_jpeg(&img, 90).unwrap()
    }

    #[test]
    fn test_decode_encoded_jpeg() {
        let bytes = gray_jpeg(16, 8);
        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (16, 8));
        assert_eq!(img.pixels.len(), 16 * 8 * 3);
        assert_eq!(img.orientation, Orientation::Normal);
    }

    #[test]
    fn test_decode_png() {
        let rgb = image::RgbImage::from_pixel(3, 5, image::Rgb([1, 2, 3]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width, img.height), (3, 5));
        assert_eq!(img.pixel(2, 4), [1, 2, 3]);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        match decode_image(&[0x00, 0x01, 0x02, 0x03]) {
            Err(DecodeError::CorruptedFile(_)) => {}
            other => panic!("Expected CorruptedFile error, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let bytes = gray_jpeg(16, 16);
        assert!(decode_image(&bytes[..20]).is_err());
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(get_orientation(&gray_jpeg(4, 4)), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }
}
