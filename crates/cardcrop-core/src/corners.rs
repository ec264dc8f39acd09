//! Corner roles, the four-corner set, and convexity validation.
//!
//! The validator, projector and redress engine all walk the corners in the
//! same cyclic order: top-left, top-right, bottom-right, bottom-left. Nothing
//! requires `top_left.x < top_right.x`; only the winding of consecutive
//! edges is checked.

use serde::{Deserialize, Serialize};

use crate::geometry::{cross, Point, Rect};

/// Which of the four handles a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CornerRole {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl CornerRole {
    /// Cyclic order shared by every stage of the pipeline.
    pub const CYCLE: [CornerRole; 4] = [
        CornerRole::TopLeft,
        CornerRole::TopRight,
        CornerRole::BottomRight,
        CornerRole::BottomLeft,
    ];

    /// Position of this role in [`CornerRole::CYCLE`].
    pub fn index(self) -> usize {
        match self {
            CornerRole::TopLeft => 0,
            CornerRole::TopRight => 1,
            CornerRole::BottomRight => 2,
            CornerRole::BottomLeft => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::CYCLE.get(index).copied()
    }
}

/// Four points with fixed semantic roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerSet {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl CornerSet {
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// The four corners of a rectangle, each on its matching role.
    pub fn from_rect(rect: Rect) -> Self {
        let [tl, tr, br, bl] = rect.corners();
        Self::new(tl, tr, br, bl)
    }

    pub fn from_cycle(points: [Point; 4]) -> Self {
        let [tl, tr, br, bl] = points;
        Self::new(tl, tr, br, bl)
    }

    pub fn get(&self, role: CornerRole) -> Point {
        match role {
            CornerRole::TopLeft => self.top_left,
            CornerRole::TopRight => self.top_right,
            CornerRole::BottomRight => self.bottom_right,
            CornerRole::BottomLeft => self.bottom_left,
        }
    }

    pub fn set(&mut self, role: CornerRole, point: Point) {
        let slot = match role {
            CornerRole::TopLeft => &mut self.top_left,
            CornerRole::TopRight => &mut self.top_right,
            CornerRole::BottomRight => &mut self.bottom_right,
            CornerRole::BottomLeft => &mut self.bottom_left,
        };
        *slot = point;
    }

    /// Points in cyclic order.
    pub fn to_cycle(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CornerRole, Point)> + '_ {
        CornerRole::CYCLE.iter().map(move |&role| (role, self.get(role)))
    }

    /// Apply `f` to every corner, keeping roles.
    pub fn map(&self, f: impl FnMut(Point) -> Point) -> Self {
        Self::from_cycle(self.to_cycle().map(f))
    }
}

/// Signed turn at each vertex of the cyclic order.
///
/// Entry `i` is the cross product of edge `p[i-1] -> p[i]` with edge
/// `p[i] -> p[i+1]`.
pub fn vertex_turns(corners: &CornerSet) -> [f64; 4] {
    let p = corners.to_cycle();
    let mut turns = [0.0; 4];
    for (i, turn) in turns.iter_mut().enumerate() {
        let prev = p[(i + 3) % 4];
        let next = p[(i + 1) % 4];
        *turn = cross(prev.to(p[i]), p[i].to(next));
    }
    turns
}

/// Whether the corners form a convex quadrilateral with consistent winding.
///
/// The sign at the top-left vertex is the reference; every vertex must
/// match it strictly. Collinear triples (a zero turn) and non-finite
/// coordinates are rejected.
pub fn is_convex(corners: &CornerSet) -> bool {
    if !corners.to_cycle().iter().all(|p| p.is_finite()) {
        return false;
    }

    let turns = vertex_turns(corners);
    let reference = turns[0];
    if reference == 0.0 {
        return false;
    }

    turns
        .iter()
        .all(|&turn| turn != 0.0 && turn.is_sign_positive() == reference.is_sign_positive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> CornerSet {
        CornerSet::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        )
    }

    #[test]
    fn test_rect_is_convex() {
        assert!(is_convex(&square()));
    }

    #[test]
    fn test_opposite_winding_is_convex() {
        // Mirrored horizontally: roles no longer match their visual position,
        // but the winding is still consistent.
        let mirrored = CornerSet::new(
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        );
        assert!(is_convex(&mirrored));
    }

    #[test]
    fn test_trapezoid_is_convex() {
        let trapezoid = CornerSet::new(
            Point::new(30.0, 10.0),
            Point::new(70.0, 12.0),
            Point::new(95.0, 90.0),
            Point::new(5.0, 88.0),
        );
        assert!(is_convex(&trapezoid));
    }

    #[test]
    fn test_bowtie_is_not_convex() {
        let mut corners = square();
        corners.set(CornerRole::BottomRight, Point::new(0.0, 10.0));
        corners.set(CornerRole::BottomLeft, Point::new(10.0, 10.0));
        assert!(!is_convex(&corners));
    }

    #[test]
    fn test_dented_corner_is_not_convex() {
        let mut corners = square();
        // Pull bottom-right inside the triangle formed by the others.
        corners.set(CornerRole::BottomRight, Point::new(3.0, 3.0));
        assert!(!is_convex(&corners));
    }

    #[test]
    fn test_collinear_corners_rejected() {
        let mut corners = square();
        // Three corners along the top edge.
        corners.set(CornerRole::TopRight, Point::new(5.0, 0.0));
        corners.set(CornerRole::BottomRight, Point::new(10.0, 0.0));
        assert!(!is_convex(&corners));
    }

    #[test]
    fn test_collinear_at_reference_vertex_rejected() {
        let corners = CornerSet::new(
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
        );
        assert_eq!(vertex_turns(&corners)[0], 0.0);
        assert!(!is_convex(&corners));
    }

    #[test]
    fn test_coincident_corners_rejected() {
        let mut corners = square();
        corners.set(CornerRole::TopRight, Point::new(0.0, 0.0));
        assert!(!is_convex(&corners));
    }

    #[test]
    fn test_nan_rejected() {
        let mut corners = square();
        corners.set(CornerRole::TopLeft, Point::new(f64::NAN, 0.0));
        assert!(!is_convex(&corners));
    }

    #[test]
    fn test_get_set_by_role() {
        let mut corners = square();
        for (i, role) in CornerRole::CYCLE.iter().enumerate() {
            assert_eq!(role.index(), i);
            assert_eq!(CornerRole::from_index(i), Some(*role));
        }
        corners.set(CornerRole::BottomLeft, Point::new(-1.0, 11.0));
        assert_eq!(corners.get(CornerRole::BottomLeft), Point::new(-1.0, 11.0));
        assert_eq!(CornerRole::from_index(4), None);
    }

    #[test]
    fn test_from_rect_assigns_roles() {
        let corners = CornerSet::from_rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(corners.top_left, Point::new(1.0, 2.0));
        assert_eq!(corners.top_right, Point::new(4.0, 2.0));
        assert_eq!(corners.bottom_right, Point::new(4.0, 6.0));
        assert_eq!(corners.bottom_left, Point::new(1.0, 6.0));
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_string(&square()).unwrap();
        assert!(json.contains("\"topLeft\""));
        assert!(json.contains("\"bottomRight\""));
        let role: CornerRole = serde_json::from_str("\"bottomLeft\"").unwrap();
        assert_eq!(role, CornerRole::BottomLeft);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Convex quad built by jittering each corner of a rectangle inside its
    /// own quadrant, which keeps every turn strictly on one side.
    fn convex_quad_strategy() -> impl Strategy<Value = CornerSet> {
        (
            (0.0f64..40.0, 0.0f64..40.0),
            (60.0f64..100.0, 0.0f64..40.0),
            (60.0f64..100.0, 60.0f64..100.0),
            (0.0f64..40.0, 60.0f64..100.0),
        )
            .prop_map(|(tl, tr, br, bl)| {
                CornerSet::new(
                    Point::new(tl.0, tl.1),
                    Point::new(tr.0, tr.1),
                    Point::new(br.0, br.1),
                    Point::new(bl.0, bl.1),
                )
            })
            .prop_filter("jitter can still dent a corner", |c| {
                vertex_turns(c).iter().all(|&t| t > 1.0)
            })
    }

    proptest! {
        /// Property: quads with every corner in its own quadrant are convex.
        #[test]
        fn prop_quadrant_quads_are_convex(corners in convex_quad_strategy()) {
            prop_assert!(is_convex(&corners));
        }

        /// Property: swapping two adjacent corners produces a bowtie.
        #[test]
        fn prop_swapped_bottom_is_bowtie(corners in convex_quad_strategy()) {
            let mut bowtie = corners;
            bowtie.set(CornerRole::BottomRight, corners.bottom_left);
            bowtie.set(CornerRole::BottomLeft, corners.bottom_right);
            prop_assert!(!is_convex(&bowtie));
        }

        /// Property: reversing the cyclic order keeps convexity.
        #[test]
        fn prop_reverse_winding_keeps_convexity(corners in convex_quad_strategy()) {
            let reversed = CornerSet::new(
                corners.top_left,
                corners.bottom_left,
                corners.bottom_right,
                corners.top_right,
            );
            prop_assert!(is_convex(&reversed));
        }

        /// Property: translating a quad never changes the verdict.
        #[test]
        fn prop_translation_invariant(
            corners in convex_quad_strategy(),
            dx in -500.0f64..500.0,
            dy in -500.0f64..500.0,
        ) {
            let moved = corners.map(|p| Point::new(p.x + dx, p.y + dy));
            prop_assert!(is_convex(&moved));
        }
    }
}
