//! The card description and the query-string interpreter that builds it.

use std::fmt;

use crate::foundation::core::Canvas;
use crate::foundation::error::OgResult;

/// Title used when `title` is absent or empty.
pub const DEFAULT_TITLE: &str = "Your Title Here";
/// Description used when `description` is absent.
pub const DEFAULT_DESCRIPTION: &str = "Add a description for your content";
/// Default `bg`.
pub const DEFAULT_BACKGROUND: &str = "#0f172a";
/// Default `text`.
pub const DEFAULT_TEXT: &str = "#ffffff";
/// Default `accent`.
pub const DEFAULT_ACCENT: &str = "#3b82f6";
/// Default `width`.
pub const DEFAULT_WIDTH: u32 = 1200;
/// Default `height`.
pub const DEFAULT_HEIGHT: u32 = 630;
/// Default upper bound for `width` and `height`; larger values are clamped.
pub const MAX_DIMENSION: u32 = 4096;

/// Titles longer than this many characters use the small title size.
pub const LONG_TITLE_CHARS: usize = 40;
/// Title size for short titles.
pub const TITLE_PX: f32 = 64.0;
/// Title size for long titles.
pub const LONG_TITLE_PX: f32 = 48.0;

/// Background swatch tiled behind the card content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// 20px grid of small dots.
    #[default]
    Dots,
    /// 40px square outline grid.
    Grid,
    /// 100x20 wave bands.
    Waves,
    /// Plain background.
    None,
}

impl Pattern {
    /// All patterns in query-name order.
    pub const ALL: [Pattern; 4] = [Pattern::Dots, Pattern::Grid, Pattern::Waves, Pattern::None];

    /// Resolve a query value; anything unrecognized (including empty) means [`Pattern::Dots`].
    pub fn parse(s: &str) -> Self {
        match s {
            "dots" => Self::Dots,
            "grid" => Self::Grid,
            "waves" => Self::Waves,
            "none" => Self::None,
            _ => Self::Dots,
        }
    }

    /// Query-string name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dots => "dots",
            Self::Grid => "grid",
            Self::Waves => "waves",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated description of one card.
///
/// Color fields hold the caller's CSS strings verbatim; the renderer resolves them.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSpec {
    /// Headline text.
    pub title: String,
    /// Secondary text; `None` omits the block.
    pub description: Option<String>,
    /// Canvas fill (`bg`).
    pub background_color: String,
    /// Title and description color (`text`).
    pub text_color: String,
    /// Author, bar and pattern color (`accent`).
    pub accent_color: String,
    /// Background swatch.
    pub pattern: Pattern,
    /// Logo source (`logo`).
    pub logo_url: Option<String>,
    /// Author label.
    pub author: Option<String>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: Some(DEFAULT_DESCRIPTION.to_string()),
            background_color: DEFAULT_BACKGROUND.to_string(),
            text_color: DEFAULT_TEXT.to_string(),
            accent_color: DEFAULT_ACCENT.to_string(),
            pattern: Pattern::Dots,
            logo_url: None,
            author: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl RenderSpec {
    /// Interpret a query string with the default dimension bound.
    pub fn from_query(query: &str) -> Self {
        Interpreter::default().interpret_query(query)
    }

    /// Title size class: 48px above [`LONG_TITLE_CHARS`] characters, 64px otherwise.
    pub fn title_font_px(&self) -> f32 {
        if self.title.chars().count() > LONG_TITLE_CHARS {
            LONG_TITLE_PX
        } else {
            TITLE_PX
        }
    }

    /// Output canvas.
    pub fn canvas(&self) -> OgResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Canonical form-urlencoded query string for this spec.
    ///
    /// `author`, `logo` and the dimensions are only emitted when they differ from the defaults.
    /// An omitted description is emitted as an empty `description=`.
    pub fn to_query_string(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        ser.append_pair("title", &self.title);
        ser.append_pair("description", self.description.as_deref().unwrap_or(""));
        ser.append_pair("bg", &self.background_color);
        ser.append_pair("text", &self.text_color);
        ser.append_pair("accent", &self.accent_color);
        ser.append_pair("pattern", self.pattern.as_str());
        if let Some(author) = &self.author {
            ser.append_pair("author", author);
        }
        if let Some(logo) = &self.logo_url {
            ser.append_pair("logo", logo);
        }
        if self.width != DEFAULT_WIDTH {
            ser.append_pair("width", &self.width.to_string());
        }
        if self.height != DEFAULT_HEIGHT {
            ser.append_pair("height", &self.height.to_string());
        }
        ser.finish()
    }
}

/// Turns raw query parameters into a [`RenderSpec`]. Never fails: bad input is defaulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interpreter {
    max_dimension: u32,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
        }
    }
}

impl Interpreter {
    /// Interpreter clamping dimensions to `max_dimension` (at least 1, at most [`Canvas::MAX_EDGE`]).
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.clamp(1, Canvas::MAX_EDGE),
        }
    }

    /// Upper bound applied to `width` and `height`.
    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Interpret a raw query string; a leading `?` is ignored.
    pub fn interpret_query(&self, query: &str) -> RenderSpec {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.interpret_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Interpret decoded name/value pairs. The first occurrence of a name wins.
    pub fn interpret_pairs<I, K, V>(&self, pairs: I) -> RenderSpec
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = RawParams::default();
        for (k, v) in pairs {
            let slot = match k.as_ref() {
                "title" => &mut raw.title,
                "description" => &mut raw.description,
                "bg" => &mut raw.bg,
                "text" => &mut raw.text,
                "accent" => &mut raw.accent,
                "pattern" => &mut raw.pattern,
                "logo" => &mut raw.logo,
                "author" => &mut raw.author,
                "width" => &mut raw.width,
                "height" => &mut raw.height,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(v.as_ref().to_string());
            }
        }

        let spec = RenderSpec {
            title: non_empty_or(raw.title, DEFAULT_TITLE),
            description: match raw.description {
                None => Some(DEFAULT_DESCRIPTION.to_string()),
                Some(d) if d.is_empty() => None,
                Some(d) => Some(d),
            },
            background_color: non_empty_or(raw.bg, DEFAULT_BACKGROUND),
            text_color: non_empty_or(raw.text, DEFAULT_TEXT),
            accent_color: non_empty_or(raw.accent, DEFAULT_ACCENT),
            pattern: raw.pattern.as_deref().map(Pattern::parse).unwrap_or_default(),
            logo_url: raw.logo.filter(|s| !s.is_empty()),
            author: raw.author.filter(|s| !s.is_empty()),
            width: parse_dimension(raw.width.as_deref(), DEFAULT_WIDTH, self.max_dimension),
            height: parse_dimension(raw.height.as_deref(), DEFAULT_HEIGHT, self.max_dimension),
        };
        tracing::trace!(?spec, "interpreted request");
        spec
    }
}

#[derive(Default)]
struct RawParams {
    title: Option<String>,
    description: Option<String>,
    bg: Option<String>,
    text: Option<String>,
    accent: Option<String>,
    pattern: Option<String>,
    logo: Option<String>,
    author: Option<String>,
    width: Option<String>,
    height: Option<String>,
}

fn non_empty_or(v: Option<String>, default: &str) -> String {
    match v {
        Some(s) if !s.is_empty() => s,
        _ => default.to_string(),
    }
}

/// Leading-integer parse: whitespace, optional sign, digits, trailing garbage ignored.
///
/// No digits or a non-positive value yield `default`; values above `max` are clamped.
pub(crate) fn parse_dimension(raw: Option<&str>, default: u32, max: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = {
        let end = digits
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };
    if digits.is_empty() {
        return default;
    }
    let value = digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });
    if negative || value == 0 {
        return default;
    }
    u32::try_from(value).unwrap_or(u32::MAX).min(max)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/render_spec.rs"]
mod tests;
