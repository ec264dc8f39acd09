//! Cardcrop Core - perspective crop engine
//!
//! This crate turns a user-dragged quadrilateral over a photographed card
//! into a flat, rectangular image. It covers convexity validation, fitting
//! the image into its on-screen container, mapping display points into
//! source pixels, the perspective redress itself and the drag session that
//! ties them together.

pub mod config;
pub mod corners;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod magnifier;
pub mod projector;
pub mod redress;
pub mod repository;
pub mod session;
pub mod viewport;
pub mod worker;

pub use config::{ConfigError, CropConfig, MagnifierConfig};
pub use corners::{is_convex, CornerRole, CornerSet};
pub use decode::{decode_image, DecodeError, DecodedImage, Orientation};
pub use encode::{encode_jpeg, EncodeError};
pub use geometry::{Point, Rect, Size};
pub use projector::project_to_source_space;
pub use redress::{redress, InterpolationFilter, RedressFailure, RedressOptions};
pub use repository::{store_card_image, Card, CardRepository, MemoryRepository, RepositoryError};
pub use session::{CropError, CropSession, DragEvent, DragPhase, DragState};
pub use viewport::{clamp_to_rect, compute_display_rect};
pub use worker::PendingRedress;
