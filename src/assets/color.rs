/// A resolved straight-alpha color in normalized `0..=1` channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ColorDef {
    pub(crate) r: f64,
    pub(crate) g: f64,
    pub(crate) b: f64,
    pub(crate) a: f64,
}

impl ColorDef {
    pub(crate) fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse any CSS color string (hex, `rgb()`, `hsl()`, `hwb()`, named colors, `transparent`).
    pub(crate) fn parse_css(s: &str) -> Result<Self, String> {
        let c = csscolorparser::parse(s.trim()).map_err(|e| format!("invalid color \"{s}\": {e}"))?;
        Ok(Self::rgba(
            f64::from(c.r),
            f64::from(c.g),
            f64::from(c.b),
            f64::from(c.a),
        ))
    }

    /// Parse `s`, falling back to `fallback` (which must itself be valid) when `s` is not a color.
    pub(crate) fn parse_or(s: &str, fallback: &str, field: &'static str) -> Self {
        match Self::parse_css(s) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(field, %err, fallback, "unparsable color; using default");
                Self::parse_css(fallback).unwrap_or(Self::rgba(0.0, 0.0, 0.0, 1.0))
            }
        }
    }

    pub(crate) fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    /// Straight-alpha color for the CPU rasterizer.
    pub(crate) fn to_cpu_color(self) -> vello_cpu::peniko::Color {
        let [r, g, b, a] = self.to_rgba8();
        vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
    }

    /// `(rgb(..), opacity)` pair for embedding into generated SVG markup.
    ///
    /// Only numeric output is produced, so the result is always safe inside an XML attribute.
    pub(crate) fn to_svg_paint(self) -> (String, f64) {
        let [r, g, b, _] = self.to_rgba8();
        (format!("rgb({r},{g},{b})"), self.a.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
