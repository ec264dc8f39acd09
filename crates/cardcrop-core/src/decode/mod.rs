//! Image decoding for card photos.
//!
//! This module provides functionality for:
//! - Decoding JPEG/PNG photos handed over by the camera or photo picker
//! - Reading the EXIF orientation tag
//! - Normalizing a tagged image to an upright one
//!
//! # Examples
//!
//! ```ignore
//! use cardcrop_core::decode::decode_image;
//!
//! let bytes = std::fs::read("card.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let upright = image.to_upright().unwrap();
//! ```

mod jpeg;
mod orientation;
mod types;

pub use jpeg::{decode_image, get_orientation};
pub use orientation::normalize_orientation;
pub use types::{DecodeError, DecodedImage, Orientation};

#[cfg(test)]
pub(crate) use orientation::tests::{stored_for, upright_reference};
