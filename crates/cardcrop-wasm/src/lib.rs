//! Cardcrop WASM - WebAssembly bindings for the card crop tool
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for image data
//! - `codec` - Photo decoding and JPEG encoding
//! - `session` - The interactive four-corner crop session
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsCropSession } from '@cardcrop/wasm';
//!
//! await init();
//!
//! const photo = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const session = new JsCropSession(
//!   photo.pixels(), photo.width, photo.height, photo.orientation, 390, 600, undefined,
//! );
//! ```

use wasm_bindgen::prelude::*;

mod codec;
mod session;
mod types;

pub use codec::{decode_image, encode_jpeg, get_orientation};
pub use session::JsCropSession;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load).
///
/// Routes the core's `log` output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("cardcrop WASM module initialized");
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
