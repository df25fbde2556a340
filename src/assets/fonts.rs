use std::borrow::Cow;
use std::path::Path;

use anyhow::Context;

use crate::assets::color::ColorDef;
use crate::foundation::error::{OgError, OgResult};

/// Families tried, in order, before falling back to whatever the database contains.
const PREFERRED_FAMILIES: &[&str] = &[
    "Inter",
    "Helvetica Neue",
    "Helvetica",
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Roboto",
    "Open Sans",
    "Cantarell",
];

/// Weights used by the card: body, author and title.
pub(crate) const WEIGHTS: [u16; 3] = [400, 600, 800];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

impl From<ColorDef> for TextBrushRgba8 {
    fn from(c: ColorDef) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Self { r, g, b, a }
    }
}

/// One resolved font face held in memory, ready for both shaping and drawing.
#[derive(Clone)]
pub(crate) struct FontFace {
    pub(crate) family: String,
    pub(crate) weight: u16,
    blob: parley::fontique::Blob<u8>,
    font: vello_cpu::peniko::FontData,
}

impl FontFace {
    pub(crate) fn new(bytes: Vec<u8>, index: u32, family: String, weight: u16) -> Self {
        let blob = parley::fontique::Blob::from(bytes.clone());
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index);
        Self {
            family,
            weight,
            blob,
            font,
        }
    }

    pub(crate) fn cpu_font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// The sans-serif faces available to the renderer.
///
/// Loaded once at startup and shared read-only across renders.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
}

impl FontBook {
    /// Discover a sans-serif family among the installed system fonts.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::from_database(&db)
    }

    /// Load faces from a single font file, ignoring system fonts.
    pub fn from_file(path: &Path) -> OgResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_file(path)
            .with_context(|| format!("load font file {}", path.display()))?;
        let book = Self::from_database(&db);
        if book.is_empty() {
            return Err(OgError::validation(format!(
                "font file {} contains no usable faces",
                path.display()
            )));
        }
        Ok(book)
    }

    /// Build a book from raw font bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> OgResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(bytes);
        let book = Self::from_database(&db);
        if book.is_empty() {
            return Err(OgError::validation("font data contains no usable faces"));
        }
        Ok(book)
    }

    /// `true` when no face could be resolved; text then renders as nothing.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Family name of the resolved faces, if any.
    pub fn family(&self) -> Option<&str> {
        self.faces.first().map(|f| f.family.as_str())
    }

    fn from_database(db: &usvg::fontdb::Database) -> Self {
        use usvg::fontdb::{Family, Query, Style};

        let mut families: Vec<Family<'_>> =
            PREFERRED_FAMILIES.iter().map(|n| Family::Name(*n)).collect();
        families.push(Family::SansSerif);

        let family = db
            .query(&Query {
                families: &families,
                ..Query::default()
            })
            .and_then(|id| db.face(id))
            .or_else(|| db.faces().find(|f| f.style == Style::Normal))
            .or_else(|| db.faces().next())
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()));
        let Some(family) = family else {
            return Self::default();
        };

        let mut faces: Vec<FontFace> = Vec::new();
        let mut seen = Vec::new();
        for weight in WEIGHTS {
            let query = Query {
                families: &[Family::Name(&family)],
                weight: usvg::fontdb::Weight(weight),
                ..Query::default()
            };
            let Some(id) = db.query(&query) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            let Some(info) = db.face(id) else {
                continue;
            };
            let face_weight = info.weight.0;
            let Some((bytes, index)) = db.with_face_data(id, |data, index| (data.to_vec(), index))
            else {
                continue;
            };
            seen.push(id);
            faces.push(FontFace::new(bytes, index, family.clone(), face_weight));
        }

        tracing::debug!(family = %family, faces = faces.len(), "resolved font faces");
        Self { faces }
    }

    /// Face whose weight is closest to `weight`.
    pub(crate) fn face_for_weight(&self, weight: u16) -> Option<(usize, &FontFace)> {
        self.faces
            .iter()
            .enumerate()
            .min_by_key(|(_, f)| f.weight.abs_diff(weight))
    }

    pub(crate) fn face(&self, idx: usize) -> Option<&FontFace> {
        self.faces.get(idx)
    }
}

/// Styling for one block of text.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TextStyle {
    pub(crate) size_px: f32,
    pub(crate) weight: u16,
    pub(crate) line_height: f32,
    pub(crate) brush: TextBrushRgba8,
}

/// A shaped text block bound to the face it was shaped with.
pub(crate) struct TextBlock {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) face: usize,
}

impl TextBlock {
    pub(crate) fn width(&self) -> f32 {
        self.layout.width()
    }

    pub(crate) fn height(&self) -> f32 {
        self.layout.height()
    }
}

/// Stateful helper for building Parley text layouts from a [`FontBook`].
pub(crate) struct TextLayoutEngine<'a> {
    book: &'a FontBook,
    registered: Vec<bool>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl<'a> TextLayoutEngine<'a> {
    /// Construct a new layout engine with fresh Parley contexts.
    pub(crate) fn new(book: &'a FontBook) -> Self {
        Self {
            book,
            registered: vec![false; book.faces.len()],
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out plain text, wrapping at `max_width_px` when given.
    ///
    /// Returns `Ok(None)` when the book has no faces.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        style: TextStyle,
        max_width_px: Option<f32>,
    ) -> OgResult<Option<TextBlock>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(OgError::validation("text size_px must be finite and > 0"));
        }
        let Some((face_idx, face)) = self.book.face_for_weight(style.weight) else {
            return Ok(None);
        };

        if !self.registered[face_idx] {
            let families = self
                .font_ctx
                .collection
                .register_fonts(face.blob.clone(), None);
            if families.is_empty() {
                return Err(OgError::layout(format!(
                    "font family {} failed to register",
                    face.family
                )));
            }
            self.registered[face_idx] = true;
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        // The face's own weight so Parley picks exactly the face glyphs are drawn with.
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::LineHeight(
            parley::style::LineHeight::FontSizeRelative(style.line_height),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(style.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(max_width_px);
        layout.align(
            max_width_px,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        Ok(Some(TextBlock {
            layout,
            face: face_idx,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
