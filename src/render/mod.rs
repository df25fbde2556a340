//! Compositing: palette resolution, pattern tiles and the CPU painter.

use std::io::Cursor;

use crate::assets::color::ColorDef;
use crate::assets::decode::PreparedImage;
use crate::assets::fonts::{FontBook, TextLayoutEngine};
use crate::foundation::error::{OgError, OgResult};
use crate::layout::{TextColors, layout_card};
use crate::scene::render_spec::{DEFAULT_ACCENT, DEFAULT_BACKGROUND, DEFAULT_TEXT, RenderSpec};

pub(crate) mod cpu;
pub(crate) mod pattern;

/// Parsed card colors. Unparsable inputs fall back to the field default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Palette {
    pub(crate) background: ColorDef,
    pub(crate) text: ColorDef,
    pub(crate) accent: ColorDef,
}

impl Palette {
    pub(crate) fn resolve(spec: &RenderSpec) -> Self {
        Self {
            background: ColorDef::parse_or(&spec.background_color, DEFAULT_BACKGROUND, "bg"),
            text: ColorDef::parse_or(&spec.text_color, DEFAULT_TEXT, "text"),
            accent: ColorDef::parse_or(&spec.accent_color, DEFAULT_ACCENT, "accent"),
        }
    }
}

/// A rendered card in straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedCard {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major, tightly packed RGBA8 (not premultiplied).
    pub rgba8: Vec<u8>,
}

impl RenderedCard {
    /// RGBA8 value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.rgba8.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> OgResult<Vec<u8>> {
        let mut buf = Vec::new();
        image::write_buffer_with_format(
            &mut Cursor::new(&mut buf),
            &self.rgba8,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| OgError::encode(e.to_string()))?;
        Ok(buf)
    }
}

/// Lay out and paint `spec`. `logo` is drawn only when present.
pub(crate) fn render_card(
    spec: &RenderSpec,
    logo: Option<&PreparedImage>,
    fonts: &FontBook,
) -> OgResult<RenderedCard> {
    let palette = Palette::resolve(spec);
    let tile = pattern::rasterize_tile(spec.pattern, palette.accent)?;

    let mut text = TextLayoutEngine::new(fonts);
    let layout = layout_card(
        spec,
        TextColors {
            text: palette.text,
            accent: palette.accent,
        },
        logo.is_some(),
        &mut text,
    )?;
    tracing::trace!(
        title_px = layout.title_px,
        has_logo = layout.logo.is_some(),
        "card laid out"
    );

    cpu::compose(&layout, &palette, tile.as_ref(), logo, fonts)
}
