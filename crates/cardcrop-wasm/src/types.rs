//! WASM-compatible wrapper types for image data.

use cardcrop_core::decode::{DecodedImage, Orientation};
use wasm_bindgen::prelude::*;

/// A decoded RGB image handed across the JS boundary.
///
/// Pixel data lives in WASM memory; `pixels()` copies it out as a
/// `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    orientation: u32,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create an upright image from dimensions and RGB pixel data
    /// (3 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
            orientation: 1,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// EXIF orientation tag (1-8) of the stored pixels.
    #[wasm_bindgen(getter)]
    pub fn orientation(&self) -> u32 {
        self.orientation
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            orientation: img.orientation.exif_value(),
            pixels: img.pixels,
        }
    }

    /// Convert back to a core image. Clones the pixel data.
    ///
    /// The buffer length is not checked here; core functions report a
    /// mismatch as an error.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
            orientation: Orientation::from(self.orientation),
        }
    }
}

/// Map a JS error message out of any displayable core error.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
