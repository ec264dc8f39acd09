//! Aspect-fit layout of an image inside a container, and drag clamping.
//!
//! # Coordinate System
//!
//! - Container space: origin at the container's top-left, y grows downward
//! - The display rect is expressed in container space

use crate::geometry::{Point, Rect, Size};

/// Compute where an image is drawn inside a container under aspect-fit
/// ("contain") scaling.
///
/// When the container is relatively wider than the image, the image fills
/// the container height and is centred horizontally. Otherwise it fills the
/// width and is centred vertically.
///
/// Degenerate sizes (zero, negative or non-finite) produce an empty rect at
/// the container centre.
///
/// # Example
///
/// ```
/// use cardcrop_core::geometry::{Rect, Size};
/// use cardcrop_core::viewport::compute_display_rect;
///
/// let rect = compute_display_rect(Size::new(200.0, 100.0), Size::new(50.0, 50.0));
/// assert_eq!(rect, Rect::new(50.0, 0.0, 100.0, 100.0));
/// ```
pub fn compute_display_rect(container: Size, image: Size) -> Rect {
    if !container.is_drawable() || !image.is_drawable() {
        let cx = if container.width.is_finite() {
            container.width.max(0.0) / 2.0
        } else {
            0.0
        };
        let cy = if container.height.is_finite() {
            container.height.max(0.0) / 2.0
        } else {
            0.0
        };
        return Rect::new(cx, cy, 0.0, 0.0);
    }

    let container_aspect = container.aspect();
    let image_aspect = image.aspect();

    if container_aspect > image_aspect {
        // Height-constrained: pillarbox left and right
        let height = container.height;
        let width = height * image_aspect;
        Rect::new((container.width - width) / 2.0, 0.0, width, height)
    } else {
        // Width-constrained: letterbox top and bottom
        let width = container.width;
        let height = width / image_aspect;
        Rect::new(0.0, (container.height - height) / 2.0, width, height)
    }
}

/// Clamp a point into a rectangle, each axis independently.
///
/// Corner drags are clamped to the display rect, not the container, so the
/// letterbox margins are never reachable.
pub fn clamp_to_rect(point: Point, rect: Rect) -> Point {
    Point::new(
        clamp_axis(point.x, rect.min_x(), rect.max_x()),
        clamp_axis(point.y, rect.min_y(), rect.max_y()),
    )
}

/// Like `f64::clamp` but tolerant of inverted bounds and NaN input.
#[inline]
fn clamp_axis(value: f64, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if value.is_nan() {
        return lo;
    }
    value.max(lo).min(hi)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
