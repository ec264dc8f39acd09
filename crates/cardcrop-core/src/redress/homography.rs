//! Four-point homography.
//!
//! Solves the 8x8 direct linear system for `H` with `h33 = 1`:
//!
//! ```text
//! u = (h11 x + h12 y + h13) / (h31 x + h32 y + 1)
//! v = (h21 x + h22 y + h23) / (h31 x + h32 y + 1)
//! ```

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::geometry::Point;

/// Projective transform between two planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    m: Matrix3<f64>,
}

impl Homography {
    /// Homography mapping each `src[i]` onto `dst[i]`.
    ///
    /// Returns `None` when the system is singular (three or more collinear
    /// points on either side) or the solution does not reproduce the
    /// correspondences.
    pub fn from_correspondences(src: [Point; 4], dst: [Point; 4]) -> Option<Self> {
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let (x, y, u, v) = (s.x, s.y, d.x, d.y);
            let r = i * 2;

            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;

            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b)?;
        if h.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let hom = Self {
            m: Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0),
        };
        hom.reproduces(&src, &dst).then_some(hom)
    }

    /// Map a point; `None` when it lands on the line at infinity.
    pub fn apply(&self, p: Point) -> Option<Point> {
        let v = self.m * Vector3::new(p.x, p.y, 1.0);
        if v.z.abs() < 1e-12 || !v.z.is_finite() {
            return None;
        }
        Some(Point::new(v.x / v.z, v.y / v.z))
    }

    pub fn inverse(&self) -> Option<Self> {
        let inv = self.m.try_inverse()?;
        if inv.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self { m: inv })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    fn reproduces(&self, src: &[Point; 4], dst: &[Point; 4]) -> bool {
        let scale = dst
            .iter()
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(1.0, f64::max);
        let tolerance = 1e-6 * scale;
        src.iter().zip(dst.iter()).all(|(s, d)| {
            self.apply(*s)
                .is_some_and(|mapped| mapped.distance(*d) <= tolerance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(side: f64) -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ]
    }

    #[test]
    fn test_identity_correspondence() {
        let sq = unit_square(10.0);
        let h = Homography::from_correspondences(sq, sq).unwrap();
        let diff = h.matrix() - Matrix3::identity();
        assert!(diff.abs().max() < 1e-9);
    }

    #[test]
    fn test_scale_and_translate() {
        let src = unit_square(1.0);
        let dst = [
            Point::new(5.0, 5.0),
            Point::new(9.0, 5.0),
            Point::new(9.0, 7.0),
            Point::new(5.0, 7.0),
        ];
        let h = Homography::from_correspondences(src, dst).unwrap();
        let mid = h.apply(Point::new(0.5, 0.5)).unwrap();
        assert!(mid.distance(Point::new(7.0, 6.0)) < 1e-9);
    }

    #[test]
    fn test_perspective_round_trip() {
        let quad = [
            Point::new(120.0, 80.0),
            Point::new(900.0, 140.0),
            Point::new(960.0, 700.0),
            Point::new(60.0, 640.0),
        ];
        let rect = unit_square(500.0);
        let h = Homography::from_correspondences(quad, rect).unwrap();
        let inv = h.inverse().unwrap();
        for (q, r) in quad.iter().zip(rect.iter()) {
            assert!(h.apply(*q).unwrap().distance(*r) < 1e-6);
            assert!(inv.apply(*r).unwrap().distance(*q) < 1e-6);
        }
    }

    #[test]
    fn test_collinear_points_fail() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        assert!(Homography::from_correspondences(src, unit_square(10.0)).is_none());
    }

    #[test]
    fn test_coincident_points_fail() {
        let src = [Point::new(3.0, 3.0); 4];
        assert!(Homography::from_correspondences(src, unit_square(10.0)).is_none());
    }
}
