//! Orientation normalization.
//!
//! Turns a tagged image into an upright one by rotating/mirroring its pixels
//! with the `image` crate, then clears the tag. Every stage downstream of
//! this works on upright pixels only.

use std::borrow::Cow;

use image::DynamicImage;

use super::{DecodeError, DecodedImage, Orientation};

/// Apply an EXIF orientation transformation to an image.
pub(crate) fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Produce the upright form of `image`, tagged [`Orientation::Normal`].
///
/// Borrows when the image is already upright.
pub fn normalize_orientation(image: &DecodedImage) -> Result<Cow<'_, DecodedImage>, DecodeError> {
    if image.orientation == Orientation::Normal {
        return Ok(Cow::Borrowed(image));
    }

    let rgb = image.to_rgb_image().ok_or(DecodeError::BufferMismatch {
        width: image.width,
        height: image.height,
        expected: image.pixel_count() * 3,
        actual: image.pixels.len(),
    })?;

    let upright = apply_orientation(DynamicImage::ImageRgb8(rgb), image.orientation);
    log::debug!(
        "normalized {:?} image {}x{} -> {}x{}",
        image.orientation,
        image.width,
        image.height,
        upright.width(),
        upright.height()
    );
    Ok(Cow::Owned(DecodedImage::from_rgb_image(upright.into_rgb8())))
}

impl DecodedImage {
    /// Owned upright copy of this image.
    pub fn to_upright(&self) -> Result<DecodedImage, DecodeError> {
        normalize_orientation(self).map(Cow::into_owned)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 3x2 upright reference: every pixel has a distinct colour.
    pub(crate) fn upright_reference() -> DecodedImage {
        let mut pixels = Vec::new();
        for y in 0..2u8 {
            for x in 0..3u8 {
                pixels.extend_from_slice(&[x * 80, y * 200, 10 + x + 3 * y]);
            }
        }
        DecodedImage::new(3, 2, pixels)
    }

    /// Stored buffer whose tag `orientation` turns it back into `upright`.
    ///
    /// Built by applying the inverse of each transform.
    pub(crate) fn stored_for(upright: &DecodedImage, orientation: Orientation) -> DecodedImage {
        let img = DynamicImage::ImageRgb8(upright.to_rgb_image().unwrap());
        let stored = match orientation {
            Orientation::Normal => img,
            Orientation::FlipHorizontal => img.fliph(),
            Orientation::Rotate180 => img.rotate180(),
            Orientation::FlipVertical => img.flipv(),
            // Transpose and transverse are their own inverses
            Orientation::Transpose => img.rotate90().fliph(),
            Orientation::Transverse => img.rotate270().fliph(),
            Orientation::Rotate90CW => img.rotate270(),
            Orientation::Rotate270CW => img.rotate90(),
        };
        DecodedImage::from_rgb_image(stored.into_rgb8()).with_orientation(orientation)
    }

    #[test]
    fn test_normal_is_borrowed() {
        let img = upright_reference();
        let result = normalize_orientation(&img).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_every_orientation_restores_reference() {
        let reference = upright_reference();
        for orientation in Orientation::ALL {
            let stored = stored_for(&reference, orientation);
            if orientation.swaps_dimensions() {
                assert_eq!((stored.width, stored.height), (2, 3));
            }
            let upright = stored.to_upright().unwrap();
            assert_eq!(upright, reference, "orientation {:?}", orientation);
            assert_eq!(upright.orientation, Orientation::Normal);
        }
    }

    #[test]
    fn test_rotate90_moves_top_left() {
        // Stored 2x1: red | green. Tag 6 means rotate 90 CW for display.
        let stored = DecodedImage::new(2, 1, vec![255, 0, 0, 0, 255, 0])
            .with_orientation(Orientation::Rotate90CW);
        let upright = stored.to_upright().unwrap();
        assert_eq!((upright.width, upright.height), (1, 2));
        assert_eq!(upright.pixel(0, 0), [255, 0, 0]);
        assert_eq!(upright.pixel(0, 1), [0, 255, 0]);
    }

    #[test]
    fn test_flip_horizontal_swaps_pixels() {
        let stored = DecodedImage::new(2, 1, vec![255, 0, 0, 0, 255, 0])
            .with_orientation(Orientation::FlipHorizontal);
        let upright = stored.to_upright().unwrap();
        assert_eq!(upright.pixel(0, 0), [0, 255, 0]);
        assert_eq!(upright.pixel(1, 0), [255, 0, 0]);
    }

    #[test]
    fn test_corrupt_buffer_is_error() {
        let img = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![0; 5],
            orientation: Orientation::Rotate180,
        };
        assert!(normalize_orientation(&img).is_err());
    }
}
