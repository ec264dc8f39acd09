//! Decode and encode bindings.
//!
//! ```typescript
//! import { decode_image, encode_jpeg } from '@cardcrop/wasm';
//!
//! const photo = decode_image(new Uint8Array(await file.arrayBuffer()));
//! console.log(`${photo.width}x${photo.height}, EXIF ${photo.orientation}`);
//! const jpeg = encode_jpeg(photo, 90);
//! ```

use cardcrop_core::{decode, encode};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsDecodedImage};

/// Decode a JPEG or PNG photo.
///
/// The EXIF orientation is reported on the result, not applied; pass it on
/// to `JsCropSession`, which makes the image upright before cropping.
///
/// # Errors
///
/// Returns an error if the bytes are empty or cannot be decoded.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Read only the EXIF orientation tag (1-8) of an encoded photo.
#[wasm_bindgen]
pub fn get_orientation(bytes: &[u8]) -> u32 {
    decode::get_orientation(bytes).exif_value()
}

/// Encode an image as JPEG, written upright.
///
/// # Arguments
///
/// * `image` - The image to encode
/// * `quality` - JPEG quality, clamped to 1-100
///
/// # Errors
///
/// Returns an error if the image has zero dimensions or a pixel buffer of
/// the wrong length.
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsDecodedImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(&image.to_decoded(), quality).map_err(to_js_error)
}
