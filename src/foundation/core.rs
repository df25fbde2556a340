use crate::foundation::error::{OgError, OgResult};

pub(crate) use kurbo::Rect;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest edge the raster backend can address.
    pub const MAX_EDGE: u32 = u16::MAX as u32;

    /// Create a validated canvas; both edges must be in `1..=MAX_EDGE`.
    pub fn new(width: u32, height: u32) -> OgResult<Self> {
        if width == 0 || height == 0 {
            return Err(OgError::validation("canvas width and height must be > 0"));
        }
        if width > Self::MAX_EDGE || height > Self::MAX_EDGE {
            return Err(OgError::validation(format!(
                "canvas {width}x{height} exceeds {max}x{max}",
                max = Self::MAX_EDGE
            )));
        }
        Ok(Self { width, height })
    }

    /// Full canvas rectangle anchored at the origin.
    pub(crate) fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub(crate) fn as_u16(self) -> (u16, u16) {
        // `new` guarantees both edges fit.
        (self.width as u16, self.height as u16)
    }
}

/// Premultiply a tightly packed straight-alpha RGBA8 buffer in place.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
