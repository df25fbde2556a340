use std::sync::Arc;

use crate::assets::color::ColorDef;
use crate::assets::decode::{parse_svg, rasterize_svg_to_premul_rgba8};
use crate::foundation::error::OgResult;
use crate::scene::render_spec::Pattern;

/// Opacity applied to the accent color inside every tile.
pub(crate) const PATTERN_OPACITY: f64 = 0.1;

const WAVES_PATH: &str = "M21.184 20c.357-.13.72-.264 1.088-.402l1.768-.661C33.64 15.347 39.647 14 50 14c10.271 0 15.362 1.222 24.629 4.928.955.383 1.869.74 2.75 1.072h6.225c-2.51-.73-5.139-1.691-8.233-2.928C65.888 13.278 60.562 12 50 12c-10.626 0-16.855 1.397-26.66 5.063l-1.767.662c-2.475.923-4.66 1.674-6.724 2.275h6.335zm0-20C13.258 2.892 8.077 4 0 4V2c5.744 0 9.951-.574 14.85-2h6.334zM77.38 0C85.239 2.966 90.502 4 100 4V2c-6.842 0-11.386-.542-16.396-2h-6.225zM0 14c8.44 0 13.718-1.21 22.272-4.402l1.768-.661C33.64 5.347 39.647 4 50 4c10.271 0 15.362 1.222 24.629 4.928C84.112 12.722 89.438 14 100 14v-2c-10.271 0-15.362-1.222-24.629-4.928C65.888 3.278 60.562 2 50 2 39.374 2 33.145 3.397 23.34 7.063l-1.767.662C13.223 10.84 8.163 12 0 12v2z";

/// Tile size in pixels, or `None` for [`Pattern::None`].
pub(crate) fn tile_size(pattern: Pattern) -> Option<(u32, u32)> {
    match pattern {
        Pattern::Dots => Some((20, 20)),
        Pattern::Grid => Some((40, 40)),
        Pattern::Waves => Some((100, 20)),
        Pattern::None => None,
    }
}

/// SVG markup for one tile drawn in `accent`.
pub(crate) fn tile_svg(pattern: Pattern, accent: ColorDef) -> Option<String> {
    let (w, h) = tile_size(pattern)?;
    let (rgb, alpha) = accent.to_svg_paint();
    let opacity = alpha * PATTERN_OPACITY;
    let body = match pattern {
        Pattern::Dots => format!(
            r#"<g fill="{rgb}" fill-opacity="{opacity}"><circle cx="3" cy="3" r="1.5"/></g>"#
        ),
        Pattern::Grid => format!(
            r#"<g fill="none" stroke="{rgb}" stroke-opacity="{opacity}"><path d="M0 0h40v40H0z"/></g>"#
        ),
        Pattern::Waves => format!(
            r#"<path d="{WAVES_PATH}" fill="{rgb}" fill-opacity="{opacity}" fill-rule="evenodd"/>"#
        ),
        Pattern::None => return None,
    };
    Some(format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">{body}</svg>"#
    ))
}

/// A rasterized tile ready to be used as a repeating paint.
#[derive(Clone, Debug)]
pub(crate) struct PatternTile {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

/// Rasterize the tile for `pattern`; `Ok(None)` for [`Pattern::None`].
pub(crate) fn rasterize_tile(pattern: Pattern, accent: ColorDef) -> OgResult<Option<PatternTile>> {
    let (Some((width, height)), Some(svg)) = (tile_size(pattern), tile_svg(pattern, accent)) else {
        return Ok(None);
    };
    let tree = parse_svg(svg.as_bytes())?;
    let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    Ok(Some(PatternTile {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pattern.rs"]
mod tests;
