use crate::assets::fonts::TextLayoutEngine;
use crate::layout::{TextColors, layout_card};
use crate::render::render_card;
use crate::scene::render_spec::RenderSpec;

use super::*;

fn render(query: &str, logo: Option<&PreparedImage>) -> RenderedCard {
    let spec = RenderSpec::from_query(query);
    render_card(&spec, logo, &FontBook::default()).unwrap()
}

fn compose_with(book: &FontBook, query: &str) -> (CardLayout, RenderedCard) {
    let spec = RenderSpec::from_query(query);
    let palette = Palette::resolve(&spec);
    let mut text = TextLayoutEngine::new(book);
    let colors = TextColors {
        text: palette.text,
        accent: palette.accent,
    };
    let layout = layout_card(&spec, colors, false, &mut text).unwrap();
    let card = compose(&layout, &palette, None, None, book).unwrap();
    (layout, card)
}

fn red_ink(card: &RenderedCard, x: u32, y: u32) -> bool {
    card.pixel(x, y).is_some_and(|px| px[0] > 128)
}

/// Inclusive bounding box of red ink.
fn ink_bbox(card: &RenderedCard) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for y in 0..card.height {
        for x in 0..card.width {
            if red_ink(card, x, y) {
                let (x0, y0, x1, y1) = bbox.unwrap_or((x, y, x, y));
                bbox = Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y)));
            }
        }
    }
    bbox
}

fn solid_logo(px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width: 48,
        height: 48,
        rgba8_premul: Arc::new(px.repeat(48 * 48)),
    }
}

#[test]
fn plain_background_and_accent_bar() {
    let card = render(
        "title=Hello&bg=%23000000&text=%23ffffff&accent=%23ff0000&pattern=none&width=600&height=300",
        None,
    );
    assert_eq!((card.width, card.height), (600, 300));
    assert_eq!(card.rgba8.len(), 600 * 300 * 4);
    assert_eq!(card.pixel(5, 5), Some([0, 0, 0, 255]));
    assert_eq!(card.pixel(599, 299), Some([0, 0, 0, 255]));
    // Bar spans x 60..180, y 234..240.
    assert_eq!(card.pixel(120, 237), Some([255, 0, 0, 255]));
    assert_eq!(card.pixel(200, 237), Some([0, 0, 0, 255]));
    assert_eq!(card.pixel(600, 0), None);
}

#[test]
fn dots_pattern_tints_the_tile_origin_only() {
    let card = render("pattern=dots", None);
    let bg = [15, 23, 42, 255];
    assert_ne!(card.pixel(2, 2), Some(bg));
    assert_ne!(card.pixel(22, 42), Some(bg));
    assert_eq!(card.pixel(10, 10), Some(bg));
    assert_eq!(card.pixel(30, 30), Some(bg));
}

#[test]
fn unparsable_colors_fall_back_to_defaults() {
    let card = render("bg=not-a-color&pattern=none", None);
    assert_eq!(card.pixel(5, 5), Some([15, 23, 42, 255]));
}

#[test]
fn logo_is_clipped_to_rounded_square() {
    let logo = solid_logo([0, 255, 0, 255]);
    let card = render("bg=black&pattern=none", Some(&logo));
    assert_eq!(card.pixel(84, 84), Some([0, 255, 0, 255]));
    assert_eq!(card.pixel(60, 60), Some([0, 0, 0, 255]));
    assert_eq!(card.pixel(107, 107), Some([0, 0, 0, 255]));
}

#[test]
fn encoded_png_decodes_to_requested_size() {
    let card = render("width=320&height=200", None);
    let png = card.encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (320, 200));
    assert_eq!(decoded.as_raw(), &card.rgba8);
}

#[test]
fn pixmap_rejects_mismatched_buffers() {
    assert!(pixmap_from_premul_bytes(&[0; 12], 2, 2).is_err());
    assert!(pixmap_from_premul_bytes(&[0; 16], 2, 2).is_ok());
    assert!(pixmap_from_premul_bytes(&[], 70_000, 0).is_err());
}

const RED_TITLE_ONLY: &str =
    "description=&bg=%23000000&text=%23ff0000&accent=%23000000&pattern=none";

#[test]
fn title_ink_fills_its_layout_box() {
    let book = FontBook::system();
    if book.is_empty() {
        return;
    }
    let (layout, card) = compose_with(
        &book,
        &format!("title=HELLO%20WORLD%20HELLO%20WORLD&{RED_TITLE_ONLY}"),
    );
    let rect = layout.title.rect;
    let (x0, y0, x1, y1) = ink_bbox(&card).expect("title ink");

    let inked_w = (x1 - x0 + 1) as f32;
    assert!(
        inked_w > rect.w * 0.8,
        "ink {x0}..{x1} covers too little of a {}px title box",
        rect.w
    );
    assert!(inked_w > 600.0, "23 chars at 64px inked only {inked_w}px");
    assert!(x0 as f32 >= rect.x - 2.0 && x1 as f32 <= rect.x + rect.w + 2.0);
    assert!(y0 as f32 >= rect.y - 2.0 && y1 as f32 <= rect.y + rect.h + 2.0);
    // Glyphs sit on a baseline inside the line box, not above it.
    assert!(y0 as f32 > rect.y + 2.0);
}

#[test]
fn wrapped_title_lines_land_on_separate_rows() {
    let book = FontBook::system();
    if book.is_empty() {
        return;
    }
    let (layout, card) = compose_with(
        &book,
        &format!("title=HELLO%20WORLD%20HELLO%20WORLD&width=600&height=630&{RED_TITLE_ONLY}"),
    );
    let rect = layout.title.rect;
    let lines = layout.title.block.as_ref().expect("shaped title").layout.len();
    assert!(lines >= 2, "expected the title to wrap at 480px");

    // Count vertical runs of inked rows; all-caps text leaves blank rows between lines.
    let mut bands = 0;
    let mut in_band = false;
    for y in 0..card.height {
        let inked = (0..card.width).any(|x| red_ink(&card, x, y));
        if inked && !in_band {
            bands += 1;
        }
        in_band = inked;
    }
    assert_eq!(bands, lines);

    let (_, y0, _, y1) = ink_bbox(&card).expect("title ink");
    assert!((y1 - y0) as f32 > rect.h * 0.5);
}
