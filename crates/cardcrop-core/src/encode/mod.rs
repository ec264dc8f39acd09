//! Image encoding for the card persistence seam.
//!
//! Redressed images are re-encoded as JPEG before the surrounding
//! application stores them.

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError};
