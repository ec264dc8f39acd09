//! Perspective redress: flatten a quadrilateral region onto an upright
//! rectangle.
//!
//! # Algorithm
//!
//! 1. Normalize the source orientation (once, before any corner is read)
//! 2. Move the bottom-left-origin corners into row-major pixel space
//! 3. Size the output from the straightened edge lengths
//! 4. Solve the quad -> rectangle homography and invert it
//! 5. For each output pixel, map back through the inverse and sample
//!
//! # Coordinate System
//!
//! Corners arrive in source space as produced by
//! [`crate::projector::project_to_source_space`]: origin at the bottom-left
//! of the upright image, y growing upward.

mod homography;
mod sample;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::corners::{is_convex, CornerSet};
use crate::decode::{normalize_orientation, DecodedImage};
use crate::geometry::Point;

pub use homography::Homography;
pub use sample::InterpolationFilter;

/// The redress transform could not be built or rasterized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("perspective redress failed: {reason}")]
pub struct RedressFailure {
    pub reason: String,
}

impl RedressFailure {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Knobs for a single redress call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedressOptions {
    /// Resampling filter.
    pub filter: InterpolationFilter,
    /// Longest allowed output edge in pixels; larger outputs are scaled down.
    pub max_output_edge: u32,
}

impl Default for RedressOptions {
    fn default() -> Self {
        Self {
            filter: InterpolationFilter::Bilinear,
            max_output_edge: 8192,
        }
    }
}

/// Flatten the region bounded by `corners` into a new upright image.
///
/// `corners` must be in source space of the orientation-normalized image.
/// The source is never mutated; the result is tagged `Orientation::Normal`.
///
/// # Errors
///
/// Returns [`RedressFailure`] for a degenerate quadrilateral, a singular
/// transform, or an unusable source buffer.
pub fn redress(
    image: &DecodedImage,
    corners: &CornerSet,
    options: &RedressOptions,
) -> Result<DecodedImage, RedressFailure> {
    let never = AtomicBool::new(false);
    redress_cancellable(image, corners, options, &never)
        .unwrap_or_else(|| Err(RedressFailure::new("cancelled")))
}

/// [`redress`] that gives up between rows once `cancel` is set.
///
/// Returns `None` when cancelled; no partial image is ever produced.
pub fn redress_cancellable(
    image: &DecodedImage,
    corners: &CornerSet,
    options: &RedressOptions,
    cancel: &AtomicBool,
) -> Option<Result<DecodedImage, RedressFailure>> {
    let plan = match RedressPlan::new(image, corners, options) {
        Ok(plan) => plan,
        Err(e) => return Some(Err(e)),
    };
    plan.execute(cancel).map(Ok)
}

/// Everything needed to rasterize, computed up front so failures surface
/// before any pixel work.
struct RedressPlan<'a> {
    source: std::borrow::Cow<'a, DecodedImage>,
    inverse: Homography,
    width: u32,
    height: u32,
    filter: InterpolationFilter,
}

impl<'a> RedressPlan<'a> {
    fn new(
        image: &'a DecodedImage,
        corners: &CornerSet,
        options: &RedressOptions,
    ) -> Result<Self, RedressFailure> {
        if image.is_empty() || image.pixels.len() != image.pixel_count() * 3 {
            return Err(RedressFailure::new(format!(
                "source buffer unusable ({}x{}, {} bytes)",
                image.width,
                image.height,
                image.pixels.len()
            )));
        }

        let source =
            normalize_orientation(image).map_err(|e| RedressFailure::new(e.to_string()))?;

        if !is_convex(corners) {
            return Err(RedressFailure::new("quadrilateral is degenerate or not convex"));
        }

        let source_height = source.height as f64;
        let quad = corners
            .map(|p| Point::new(p.x, source_height - p.y))
            .to_cycle();

        let (width, height) = output_size(&quad, options.max_output_edge)?;
        let (w, h) = (width as f64, height as f64);
        let rect = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ];

        let forward = Homography::from_correspondences(quad, rect)
            .ok_or_else(|| RedressFailure::new("perspective transform is singular"))?;
        let inverse = forward
            .inverse()
            .ok_or_else(|| RedressFailure::new("perspective transform is not invertible"))?;

        Ok(Self {
            source,
            inverse,
            width,
            height,
            filter: options.filter,
        })
    }

    fn execute(&self, cancel: &AtomicBool) -> Option<DecodedImage> {
        log::debug!(
            "redress {}x{} -> {}x{} ({:?})",
            self.source.width,
            self.source.height,
            self.width,
            self.height,
            self.filter
        );

        let row_len = self.width as usize * 3;
        let mut output = vec![0u8; row_len * self.height as usize];

        for (y, row) in output.chunks_exact_mut(row_len).enumerate() {
            if cancel.load(Ordering::Relaxed) {
                log::debug!("redress cancelled at row {}", y);
                return None;
            }
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                // The line at infinity never crosses a convex quad's interior.
                let src = self
                    .inverse
                    .apply(Point::new(x as f64, y as f64))
                    .unwrap_or_default();
                px.copy_from_slice(&self.filter.sample(&self.source, src.x, src.y));
            }
        }

        Some(DecodedImage::new(self.width, self.height, output))
    }
}

/// Output size: the longer of each pair of opposite edges.
fn output_size(quad: &[Point; 4], max_edge: u32) -> Result<(u32, u32), RedressFailure> {
    let [tl, tr, br, bl] = *quad;
    let mut width = tl.distance(tr).max(bl.distance(br));
    let mut height = tl.distance(bl).max(tr.distance(br));

    let max_edge = max_edge.max(1) as f64;
    let longest = width.max(height);
    if longest > max_edge {
        let scale = max_edge / longest;
        width *= scale;
        height *= scale;
    }

    let (width, height) = (width.round(), height.round());
    if !(width >= 1.0 && height >= 1.0) {
        return Err(RedressFailure::new(format!(
            "output size {}x{} is empty",
            width, height
        )));
    }
    Ok((width as u32, height as u32))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
