//! Interactive crop session.
//!
//! A session is opened when the crop tool appears and dropped when it
//! closes. It owns the upright source, the display rect, the live and
//! initial corners, the convexity flag and the drag state. Nothing in it is
//! persisted.
//!
//! # Pipeline
//!
//! ```text
//! drag event -> clamp to display rect -> validate convexity
//! commit     -> project corners to source space -> redress
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CropConfig;
use crate::corners::{is_convex, CornerRole, CornerSet};
use crate::decode::{DecodeError, DecodedImage};
use crate::geometry::{Point, Rect, Size};
use crate::magnifier::render_magnifier;
use crate::projector::{display_to_pixel, project_corners};
use crate::redress::{redress, RedressFailure};
use crate::repository::{store_card_image, CardRepository, RepositoryError};
use crate::viewport::{clamp_to_rect, compute_display_rect};
use crate::worker::PendingRedress;

/// Why a session could not be opened or committed.
#[derive(Debug, Error)]
pub enum CropError {
    /// The corners do not form a convex quadrilateral; commit is blocked.
    #[error("Corner selection is not a convex quadrilateral")]
    NonConvex,

    /// The session has no source image to crop.
    #[error("No source image available")]
    MissingSourceImage,

    /// The container has no drawable area.
    #[error("Container size {width}x{height} has no drawable area")]
    EmptyViewport { width: f64, height: f64 },

    /// The source image could not be made upright.
    #[error("Source image unusable: {0}")]
    Source(#[from] DecodeError),

    /// The perspective transform failed.
    #[error(transparent)]
    Redress(#[from] RedressFailure),

    /// The redressed image could not be stored on its card.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Drag gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(CornerRole),
}

/// Phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    /// The pointer moved while pressed.
    Changed,
    /// The pointer was released.
    Ended,
}

/// One input event aimed at a corner handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    pub phase: DragPhase,
    pub role: CornerRole,
    /// Raw pointer position in container space.
    pub position: Point,
}

impl DragEvent {
    pub fn changed(role: CornerRole, position: Point) -> Self {
        Self {
            phase: DragPhase::Changed,
            role,
            position,
        }
    }

    pub fn ended(role: CornerRole, position: Point) -> Self {
        Self {
            phase: DragPhase::Ended,
            role,
            position,
        }
    }
}

/// State of one open crop tool.
#[derive(Debug)]
pub struct CropSession {
    source: Option<Arc<DecodedImage>>,
    display_rect: Rect,
    initial: CornerSet,
    corners: CornerSet,
    convex: bool,
    drag: DragState,
    config: CropConfig,
}

impl CropSession {
    /// Open a session once the container size is known.
    ///
    /// The source orientation is normalized here, before the display rect
    /// and any corner coordinate are derived from it.
    pub fn open(
        source: Option<DecodedImage>,
        container: Size,
        config: CropConfig,
    ) -> Result<Self, CropError> {
        if !container.is_drawable() {
            return Err(CropError::EmptyViewport {
                width: container.width,
                height: container.height,
            });
        }

        let source = match source {
            Some(image) => Some(Arc::new(image.to_upright()?)),
            None => {
                log::warn!("crop session opened without a source image");
                None
            }
        };

        let image_size = source
            .as_deref()
            .map(|img| Size::from((img.width, img.height)))
            .unwrap_or_default();
        let display_rect = compute_display_rect(container, image_size);
        let initial = CornerSet::from_rect(display_rect);

        log::debug!(
            "crop session opened: container {}x{}, display rect {:?}",
            container.width,
            container.height,
            display_rect
        );

        Ok(Self {
            source,
            display_rect,
            initial,
            corners: initial,
            convex: true,
            drag: DragState::Idle,
            config,
        })
    }

    pub fn corners(&self) -> &CornerSet {
        &self.corners
    }

    pub fn initial_corners(&self) -> &CornerSet {
        &self.initial
    }

    pub fn is_convex(&self) -> bool {
        self.convex
    }

    pub fn display_rect(&self) -> Rect {
        self.display_rect
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// The upright source, if any.
    pub fn source(&self) -> Option<&DecodedImage> {
        self.source.as_deref()
    }

    /// Feed one drag event; returns the convexity flag afterwards.
    ///
    /// A `Changed` event while idle starts dragging its corner. While one
    /// corner is dragged, events for the other corners are ignored.
    pub fn handle_drag(&mut self, event: DragEvent) -> bool {
        match (self.drag, event.phase) {
            (DragState::Idle, DragPhase::Changed) => {
                self.drag = DragState::Dragging(event.role);
                self.move_corner(event.role, event.position);
            }
            (DragState::Dragging(active), DragPhase::Changed) if active == event.role => {
                self.move_corner(active, event.position);
            }
            (DragState::Dragging(active), DragPhase::Ended) if active == event.role => {
                self.drag = DragState::Idle;
            }
            (state, phase) => {
                log::trace!("ignored {:?} for {:?} in {:?}", phase, event.role, state);
            }
        }
        self.convex
    }

    fn move_corner(&mut self, role: CornerRole, position: Point) {
        let clamped = clamp_to_rect(position, self.display_rect);
        self.corners.set(role, clamped);

        let convex = is_convex(&self.corners);
        if convex != self.convex {
            log::debug!("selection became {}", if convex { "convex" } else { "non-convex" });
        }
        self.convex = convex;
    }

    /// Nearest handle within the configured hit radius of `point`.
    pub fn hit_test(&self, point: Point) -> Option<CornerRole> {
        self.corners
            .iter()
            .map(|(role, corner)| (role, corner.distance(point)))
            .filter(|&(_, d)| d <= self.config.handle_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(role, _)| role)
    }

    /// Restore the initial corners and mark the selection convex.
    pub fn reset(&mut self) {
        self.corners = self.initial;
        self.convex = true;
        self.drag = DragState::Idle;
    }

    /// The live corners mapped into source space, ready for redress.
    pub fn source_corners(&self) -> Result<CornerSet, CropError> {
        let source = self.source.as_deref().ok_or(CropError::MissingSourceImage)?;
        Ok(project_corners(
            &self.corners,
            self.display_rect,
            Size::from((source.width, source.height)),
        ))
    }

    /// Check commit preconditions and return the source plus its corners.
    fn prepare_commit(&self) -> Result<(&Arc<DecodedImage>, CornerSet), CropError> {
        let source = match self.source.as_ref() {
            Some(source) => source,
            None => {
                log::warn!("commit ignored: no source image");
                return Err(CropError::MissingSourceImage);
            }
        };
        if !self.convex {
            log::warn!("commit refused: selection is not convex");
            return Err(CropError::NonConvex);
        }
        Ok((source, self.source_corners()?))
    }

    /// Redress the current selection into a new image.
    ///
    /// The session is unchanged by both success and failure, so the user can
    /// keep adjusting or cancel.
    pub fn commit(&self) -> Result<DecodedImage, CropError> {
        let (source, corners) = self.prepare_commit()?;
        log::info!("redressing selection {:?}", corners);
        let result = redress(source, &corners, &self.config.redress_options()).map_err(|e| {
            log::warn!("{}", e);
            e
        })?;
        log::info!("redress produced {}x{} image", result.width, result.height);
        Ok(result)
    }

    /// Commit and store the result as the image of card `index`, encoded at
    /// the configured JPEG quality.
    ///
    /// Nothing is stored when the commit is refused or fails.
    pub fn commit_to_card<R: CardRepository + ?Sized>(
        &self,
        repo: &mut R,
        index: usize,
    ) -> Result<DecodedImage, CropError> {
        let image = self.commit()?;
        store_card_image(repo, index, &image, self.config.jpeg_quality)?;
        Ok(image)
    }

    /// [`CropSession::commit`] on a worker thread.
    pub fn commit_in_background(&self) -> Result<PendingRedress, CropError> {
        let (source, corners) = self.prepare_commit()?;
        Ok(PendingRedress::spawn(
            Arc::clone(source),
            corners,
            self.config.redress_options(),
        ))
    }

    /// Loupe image for the corner being dragged, `None` while idle.
    pub fn magnifier(&self) -> Option<DecodedImage> {
        let DragState::Dragging(role) = self.drag else {
            return None;
        };
        let source = self.source.as_deref()?;
        let center = display_to_pixel(
            self.corners.get(role),
            self.display_rect,
            Size::from((source.width, source.height)),
        );
        render_magnifier(source, center, &self.config.magnifier)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
