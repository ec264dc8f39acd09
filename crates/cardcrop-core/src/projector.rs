//! Display-space to source-pixel-space projection.
//!
//! # Coordinate System
//!
//! - Display space: top-left origin, y grows downward (container units)
//! - Source space: bottom-left origin, y grows upward (source pixels)
//!
//! The redress engine consumes source-space corners, so the y axis is
//! inverted here. No pixel snapping is applied.

use crate::corners::CornerSet;
use crate::geometry::{Point, Rect, Size};

/// Project a display-space point into source-image pixel space.
///
/// `display_rect` is where the (orientation-normalized) source image is
/// drawn; `source_size` is that image's pixel size.
pub fn project_to_source_space(view_point: Point, display_rect: Rect, source_size: Size) -> Point {
    let raw = display_to_pixel(view_point, display_rect, source_size);
    Point::new(raw.x, source_size.height - raw.y)
}

/// Project all four corners, keeping their roles.
pub fn project_corners(corners: &CornerSet, display_rect: Rect, source_size: Size) -> CornerSet {
    corners.map(|p| project_to_source_space(p, display_rect, source_size))
}

/// Scale a display-space point into top-left-origin pixel space.
///
/// Same scaling as [`project_to_source_space`] without the y inversion.
pub fn display_to_pixel(view_point: Point, display_rect: Rect, source_size: Size) -> Point {
    let scale_x = source_size.width / display_rect.width;
    let scale_y = source_size.height / display_rect.height;
    Point::new(
        (view_point.x - display_rect.x) * scale_x,
        (view_point.y - display_rect.y) * scale_y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corners::CornerRole;
    use crate::viewport::compute_display_rect;

    #[test]
    fn test_full_rect_maps_to_source_corners() {
        let source = Size::new(3000.0, 2000.0);
        let rect = compute_display_rect(Size::new(300.0, 600.0), source);
        let projected = project_corners(&CornerSet::from_rect(rect), rect, source);

        let expect = [
            (CornerRole::TopLeft, Point::new(0.0, 2000.0)),
            (CornerRole::TopRight, Point::new(3000.0, 2000.0)),
            (CornerRole::BottomRight, Point::new(3000.0, 0.0)),
            (CornerRole::BottomLeft, Point::new(0.0, 0.0)),
        ];
        for (role, want) in expect {
            let got = projected.get(role);
            assert!(
                got.distance(want) < 1e-6,
                "{:?}: got {:?}, expected {:?}",
                role,
                got,
                want
            );
        }
    }

    #[test]
    fn test_centre_maps_to_centre() {
        let source = Size::new(800.0, 600.0);
        let rect = Rect::new(50.0, 0.0, 400.0, 300.0);
        let p = project_to_source_space(Point::new(250.0, 150.0), rect, source);
        assert_eq!(p, Point::new(400.0, 300.0));
    }

    #[test]
    fn test_y_axis_is_inverted() {
        let source = Size::new(100.0, 100.0);
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        // A quarter of the way down the display is three quarters up the source.
        let p = project_to_source_space(Point::new(0.0, 12.5), rect, source);
        assert_eq!(p, Point::new(0.0, 75.0));
    }

    #[test]
    fn test_no_pixel_snapping() {
        let source = Size::new(10.0, 10.0);
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let p = project_to_source_space(Point::new(1.0, 1.0), rect, source);
        assert_eq!(p, Point::new(2.5, 7.5));
    }

    #[test]
    fn test_display_to_pixel_keeps_top_left_origin() {
        let source = Size::new(200.0, 100.0);
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(
            display_to_pixel(Point::new(10.0, 20.0), rect, source),
            Point::new(0.0, 0.0)
        );
        assert_eq!(
            display_to_pixel(Point::new(110.0, 70.0), rect, source),
            Point::new(200.0, 100.0)
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
