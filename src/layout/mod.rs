//! Card layout (Taffy).
//!
//! The card is a padded column with three regions distributed by `space-between`: a top band
//! (logo and author), a middle block (title and description) and the accent bar. Text leaves are
//! measured with Parley; after solving, each text is re-shaped at its final box width so the
//! painted line breaks match the measured ones.

use taffy::prelude::{AvailableSpace, NodeId, Rect, Size};
use taffy::style::{
    AlignItems, Dimension, Display, FlexDirection, JustifyContent, LengthPercentage, Style,
};

use crate::assets::color::ColorDef;
use crate::assets::fonts::{TextBlock, TextLayoutEngine, TextStyle};
use crate::foundation::core::Canvas;
use crate::foundation::error::{OgError, OgResult};
use crate::scene::render_spec::RenderSpec;

/// Padding on every edge of the card.
pub(crate) const PADDING: f32 = 60.0;
/// Gap between logo and author.
pub(crate) const BAND_GAP: f32 = 16.0;
/// Gap between title and description.
pub(crate) const MIDDLE_GAP: f32 = 20.0;
pub(crate) const LOGO_PX: f32 = 48.0;
pub(crate) const BAR_W: f32 = 120.0;
pub(crate) const BAR_H: f32 = 6.0;

pub(crate) const TITLE_WEIGHT: u16 = 800;
pub(crate) const TITLE_LINE_HEIGHT: f32 = 1.1;
pub(crate) const DESCRIPTION_PX: f32 = 28.0;
pub(crate) const DESCRIPTION_WEIGHT: u16 = 400;
pub(crate) const DESCRIPTION_LINE_HEIGHT: f32 = 1.4;
pub(crate) const AUTHOR_PX: f32 = 24.0;
pub(crate) const AUTHOR_WEIGHT: u16 = 600;
pub(crate) const AUTHOR_LINE_HEIGHT: f32 = 1.2;

/// Pixel-space rectangle produced by the layout solver.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RectPx {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) w: f32,
    pub(crate) h: f32,
}

/// A text element placed on the card.
pub(crate) struct PlacedText {
    pub(crate) rect: RectPx,
    /// `None` when no font face is available.
    pub(crate) block: Option<TextBlock>,
}

/// Absolute placement of every card element.
pub(crate) struct CardLayout {
    pub(crate) canvas: Canvas,
    pub(crate) logo: Option<RectPx>,
    pub(crate) author: Option<PlacedText>,
    pub(crate) title: PlacedText,
    pub(crate) title_px: f32,
    pub(crate) description: Option<PlacedText>,
    pub(crate) bar: RectPx,
}

/// Resolved text colors used for brushes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextColors {
    pub(crate) text: ColorDef,
    pub(crate) accent: ColorDef,
}

struct TextLeaf {
    text: String,
    style: TextStyle,
    max_width: f32,
}

#[derive(Debug, Clone, Copy)]
enum NodeCtx {
    Text(usize),
}

/// Wrap limit for the title: 90% of the canvas, never wider than the content box.
pub(crate) fn title_max_width(canvas: Canvas) -> f32 {
    let w = canvas.width as f32;
    (w * 0.9).min(content_width(canvas))
}

/// Wrap limit for the description: 80% of the canvas, never wider than the content box.
pub(crate) fn description_max_width(canvas: Canvas) -> f32 {
    let w = canvas.width as f32;
    (w * 0.8).min(content_width(canvas))
}

pub(crate) fn content_width(canvas: Canvas) -> f32 {
    (canvas.width as f32 - 2.0 * PADDING).max(0.0)
}

/// Solve the card layout for `spec`.
pub(crate) fn layout_card(
    spec: &RenderSpec,
    colors: TextColors,
    has_logo: bool,
    engine: &mut TextLayoutEngine<'_>,
) -> OgResult<CardLayout> {
    let canvas = spec.canvas()?;
    let title_px = spec.title_font_px();

    let mut leaves: Vec<TextLeaf> = Vec::with_capacity(3);
    let mut taffy: taffy::TaffyTree<NodeCtx> = taffy::TaffyTree::new();

    let fixed = |w: f32, h: f32| Style {
        size: Size {
            width: Dimension::length(w),
            height: Dimension::length(h),
        },
        flex_shrink: 0.0,
        ..Style::default()
    };
    let text_style = |max_width: f32| Style {
        max_size: Size {
            width: Dimension::length(max_width),
            height: Dimension::auto(),
        },
        flex_shrink: 0.0,
        ..Style::default()
    };

    // Top band.
    let mut band_children = Vec::new();
    let logo_node = if has_logo {
        let n = taffy.new_leaf(fixed(LOGO_PX, LOGO_PX))?;
        band_children.push(n);
        Some(n)
    } else {
        None
    };
    let author_node = match &spec.author {
        Some(author) => {
            let max_width = content_width(canvas);
            leaves.push(TextLeaf {
                text: author.clone(),
                style: TextStyle {
                    size_px: AUTHOR_PX,
                    weight: AUTHOR_WEIGHT,
                    line_height: AUTHOR_LINE_HEIGHT,
                    brush: colors.accent.into(),
                },
                max_width,
            });
            let n = taffy.new_leaf_with_context(
                text_style(max_width),
                NodeCtx::Text(leaves.len() - 1),
            )?;
            band_children.push(n);
            Some((n, leaves.len() - 1))
        }
        None => None,
    };
    let band = taffy.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            align_items: Some(AlignItems::Center),
            gap: Size {
                width: LengthPercentage::length(BAND_GAP),
                height: LengthPercentage::length(0.0),
            },
            flex_shrink: 0.0,
            ..Style::default()
        },
        &band_children,
    )?;

    // Middle block.
    let title_max = title_max_width(canvas);
    leaves.push(TextLeaf {
        text: spec.title.clone(),
        style: TextStyle {
            size_px: title_px,
            weight: TITLE_WEIGHT,
            line_height: TITLE_LINE_HEIGHT,
            brush: colors.text.into(),
        },
        max_width: title_max,
    });
    let title_leaf = leaves.len() - 1;
    let title_node = taffy.new_leaf_with_context(text_style(title_max), NodeCtx::Text(title_leaf))?;
    let mut middle_children = vec![title_node];

    let description_node = match &spec.description {
        Some(description) => {
            let max_width = description_max_width(canvas);
            leaves.push(TextLeaf {
                text: description.clone(),
                style: TextStyle {
                    size_px: DESCRIPTION_PX,
                    weight: DESCRIPTION_WEIGHT,
                    line_height: DESCRIPTION_LINE_HEIGHT,
                    brush: colors.text.into(),
                },
                max_width,
            });
            let n = taffy.new_leaf_with_context(
                text_style(max_width),
                NodeCtx::Text(leaves.len() - 1),
            )?;
            middle_children.push(n);
            Some((n, leaves.len() - 1))
        }
        None => None,
    };
    let middle = taffy.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            align_items: Some(AlignItems::FlexStart),
            gap: Size {
                width: LengthPercentage::length(0.0),
                height: LengthPercentage::length(MIDDLE_GAP),
            },
            flex_shrink: 0.0,
            ..Style::default()
        },
        &middle_children,
    )?;

    let bar = taffy.new_leaf(fixed(BAR_W, BAR_H))?;

    let root = taffy.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            justify_content: Some(JustifyContent::SpaceBetween),
            align_items: Some(AlignItems::FlexStart),
            size: Size {
                width: Dimension::length(canvas.width as f32),
                height: Dimension::length(canvas.height as f32),
            },
            padding: Rect {
                left: LengthPercentage::length(PADDING),
                right: LengthPercentage::length(PADDING),
                top: LengthPercentage::length(PADDING),
                bottom: LengthPercentage::length(PADDING),
            },
            ..Style::default()
        },
        &[band, middle, bar],
    )?;

    let mut measure_err: Option<OgError> = None;
    taffy.compute_layout_with_measure(
        root,
        Size {
            width: AvailableSpace::Definite(canvas.width as f32),
            height: AvailableSpace::Definite(canvas.height as f32),
        },
        |known, available, _node_id, node_context, _style| {
            let Some(NodeCtx::Text(i)) = node_context.as_deref().copied() else {
                return known.unwrap_or(Size::ZERO);
            };
            let leaf = &leaves[i];
            let limit = known
                .width
                .or(match available.width {
                    AvailableSpace::Definite(w) => Some(w),
                    AvailableSpace::MinContent => Some(0.0),
                    AvailableSpace::MaxContent => None,
                })
                .map_or(leaf.max_width, |w| w.min(leaf.max_width));
            match engine.layout(&leaf.text, leaf.style, Some(limit)) {
                Ok(Some(block)) => Size {
                    width: known.width.unwrap_or(block.width().ceil()),
                    height: known.height.unwrap_or(block.height().ceil()),
                },
                Ok(None) => known.unwrap_or(Size::ZERO),
                Err(err) => {
                    measure_err.get_or_insert(err);
                    Size::ZERO
                }
            }
        },
    )?;
    if let Some(err) = measure_err {
        return Err(err);
    }

    let root_rect = rect_of(&taffy, root, 0.0, 0.0)?;
    let band_rect = rect_of(&taffy, band, root_rect.x, root_rect.y)?;
    let middle_rect = rect_of(&taffy, middle, root_rect.x, root_rect.y)?;
    let bar_rect = rect_of(&taffy, bar, root_rect.x, root_rect.y)?;

    let logo = match logo_node {
        Some(n) => Some(rect_of(&taffy, n, band_rect.x, band_rect.y)?),
        None => None,
    };

    let mut place = |node: NodeId, leaf: usize, origin: RectPx| -> OgResult<PlacedText> {
        let rect = rect_of(&taffy, node, origin.x, origin.y)?;
        let leaf = &leaves[leaf];
        let block = engine.layout(&leaf.text, leaf.style, Some(rect.w.max(1.0)))?;
        Ok(PlacedText { rect, block })
    };

    let author = match author_node {
        Some((n, leaf)) => Some(place(n, leaf, band_rect)?),
        None => None,
    };
    let title = place(title_node, title_leaf, middle_rect)?;
    let description = match description_node {
        Some((n, leaf)) => Some(place(n, leaf, middle_rect)?),
        None => None,
    };

    tracing::debug!(
        title_px,
        title_h = title.rect.h,
        has_description = description.is_some(),
        has_author = author.is_some(),
        has_logo,
        "card layout solved"
    );

    Ok(CardLayout {
        canvas,
        logo,
        author,
        title,
        title_px,
        description,
        bar: bar_rect,
    })
}

fn rect_of(
    taffy: &taffy::TaffyTree<NodeCtx>,
    node: NodeId,
    origin_x: f32,
    origin_y: f32,
) -> OgResult<RectPx> {
    let l = taffy.layout(node)?;
    Ok(RectPx {
        x: origin_x + l.location.x,
        y: origin_y + l.location.y,
        w: l.size.width,
        h: l.size.height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/card.rs"]
mod tests;
