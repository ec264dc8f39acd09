//! Crop session bindings.
//!
//! The host view forwards pointer events and reads the corner positions
//! back after each one to draw the handles and the outline.
//!
//! ```typescript
//! import { JsCropSession } from '@cardcrop/wasm';
//!
//! const session = new JsCropSession(
//!   photo.pixels(), photo.width, photo.height, photo.orientation,
//!   view.clientWidth, view.clientHeight, undefined,
//! );
//! const convex = session.drag(0, false, event.offsetX, event.offsetY);
//! warning.hidden = convex;
//! const card = session.commit(); // undefined while the quad is not convex
//! ```

use cardcrop_core::session::{CropError, CropSession, DragEvent};
use cardcrop_core::{CornerRole, CropConfig, DecodedImage, Orientation, Point, Size};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsDecodedImage};

/// An open crop tool.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Open a session over a photo laid out in a container.
    ///
    /// # Arguments
    /// * `pixels` - RGB pixel data as stored, before orientation
    /// * `width`, `height` - Stored dimensions
    /// * `orientation` - EXIF orientation tag (1-8)
    /// * `container_width`, `container_height` - Size of the view the image is fitted into
    /// * `config_json` - Optional JSON crop configuration
    ///
    /// # Errors
    /// Returns an error for a malformed configuration, a pixel buffer that
    /// does not match the dimensions, or an empty container.
    #[wasm_bindgen(constructor)]
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        orientation: u32,
        container_width: f64,
        container_height: f64,
        config_json: Option<String>,
    ) -> Result<JsCropSession, JsValue> {
        let config = match config_json {
            Some(json) => CropConfig::from_json(&json).map_err(to_js_error)?,
            None => CropConfig::default(),
        };
        let source =
            DecodedImage::try_new(width, height, pixels, Orientation::from(orientation))
                .map_err(to_js_error)?;
        Self::open(source, Size::new(container_width, container_height), config)
            .map_err(to_js_error)
    }

    /// Feed one pointer event for corner `role` (0 = top-left, then clockwise).
    ///
    /// Returns whether the corners form a convex quadrilateral afterwards.
    pub fn drag(&mut self, role: u8, ended: bool, x: f64, y: f64) -> bool {
        let Some(role) = CornerRole::from_index(role as usize) else {
            log::warn!("drag for unknown corner {}", role);
            return self.inner.is_convex();
        };
        let position = Point::new(x, y);
        let event = if ended {
            DragEvent::ended(role, position)
        } else {
            DragEvent::changed(role, position)
        };
        self.inner.handle_drag(event)
    }

    /// Corner index under `(x, y)`, if any is within the handle radius.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<u8> {
        self.inner
            .hit_test(Point::new(x, y))
            .map(|role| role.index() as u8)
    }

    /// Put the corners back on the display rect.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn is_convex(&self) -> bool {
        self.inner.is_convex()
    }

    /// Corners as `{ topLeft: {x, y}, topRight, bottomRight, bottomLeft }`.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn corners(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.corners())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize corners: {}", e)))
    }

    /// Corners as `[x0, y0, x1, y1, x2, y2, x3, y3]` in cycle order.
    pub fn corners_flat(&self) -> Vec<f64> {
        self.inner
            .corners()
            .to_cycle()
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    /// The fitted image rect as `[x, y, width, height]`.
    pub fn display_rect(&self) -> Vec<f64> {
        let rect = self.inner.display_rect();
        vec![rect.x, rect.y, rect.width, rect.height]
    }

    /// Redress the selection. `undefined` when refused or failed; the
    /// reason is logged to the console.
    pub fn commit(&self) -> Option<JsDecodedImage> {
        match self.inner.commit() {
            Ok(image) => Some(JsDecodedImage::from_decoded(image)),
            Err(CropError::NonConvex) => None,
            Err(e) => {
                log::error!("crop commit failed: {}", e);
                None
            }
        }
    }

    /// Loupe for the corner being dragged, `undefined` while idle.
    pub fn magnifier(&self) -> Option<JsDecodedImage> {
        self.inner.magnifier().map(JsDecodedImage::from_decoded)
    }
}

impl JsCropSession {
    fn open(source: DecodedImage, container: Size, config: CropConfig) -> Result<Self, CropError> {
        let inner = CropSession::open(Some(source), container, config)?;
        Ok(Self { inner })
    }
}
