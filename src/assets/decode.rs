use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::premultiply_rgba8_in_place;
use crate::foundation::error::{OgError, OgResult};

/// Prepared raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub(crate) struct PreparedImage {
    /// Width in pixels.
    pub(crate) width: u32,
    /// Height in pixels.
    pub(crate) height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

pub(crate) fn parse_svg(bytes: &[u8]) -> OgResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize `tree` stretched to exactly `width`x`height`, returning premultiplied RGBA8.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> OgResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| OgError::render("failed to allocate svg pixmap"))?;

    let size = tree.size();
    if !(size.width().is_finite() && size.height().is_finite())
        || size.width() <= 0.0
        || size.height() <= 0.0
    {
        return Err(OgError::render("svg has invalid width/height"));
    }
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// Decode logo bytes into a `size`x`size` image, stretching like an `<img>` with fixed
/// width and height.
///
/// SVG documents are rasterized directly at the target size; everything else goes through the
/// `image` crate and is resampled.
pub(crate) fn decode_logo(bytes: &[u8], size: u32) -> OgResult<PreparedImage> {
    if size == 0 {
        return Err(OgError::validation("logo size must be > 0"));
    }

    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, size, size)?;
        return Ok(PreparedImage {
            width: size,
            height: size,
            rgba8_premul: Arc::new(rgba8_premul),
        });
    }

    let mut rgba = image::load_from_memory(bytes)
        .context("decode logo image")?
        .to_rgba8();
    if rgba.dimensions() != (size, size) {
        rgba = image::imageops::resize(&rgba, size, size, image::imageops::FilterType::CatmullRom);
    }
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width: size,
        height: size,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
