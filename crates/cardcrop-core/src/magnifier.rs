//! Drag loupe: a zoomed square crop of the source centred under the finger.
//!
//! Purely a visual aid; nothing here feeds back into the corner geometry.

use crate::config::MagnifierConfig;
use crate::decode::DecodedImage;
use crate::geometry::Point;
use crate::redress::InterpolationFilter;

/// Render the loupe centred on `center`, in top-left-origin pixel space of
/// the upright `image`.
///
/// Areas beyond the image edge repeat the edge pixels. Returns `None` for
/// an empty image.
pub fn render_magnifier(
    image: &DecodedImage,
    center: Point,
    config: &MagnifierConfig,
) -> Option<DecodedImage> {
    if image.is_empty() || config.size == 0 || !(config.zoom > 0.0) {
        return None;
    }

    let size = config.size;
    let half = size as f64 / 2.0;
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 3);

    for y in 0..size {
        let sy = center.y + (y as f64 + 0.5 - half) / config.zoom;
        for x in 0..size {
            let sx = center.x + (x as f64 + 0.5 - half) / config.zoom;
            pixels.extend_from_slice(&InterpolationFilter::Bilinear.sample(image, sx, sy));
        }
    }

    Some(DecodedImage::new(size, size, pixels))
}
