use std::sync::Arc;

use vello_cpu::kurbo::{Affine, RoundedRect, Shape};

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::FontBook;
use crate::foundation::error::{OgError, OgResult};
use crate::layout::{CardLayout, PlacedText, RectPx};
use crate::render::pattern::PatternTile;
use crate::render::{Palette, RenderedCard};

const LOGO_RADIUS: f64 = 8.0;
const BAR_RADIUS: f64 = 3.0;
const DESCRIPTION_OPACITY: f32 = 0.8;
const PATH_TOLERANCE: f64 = 0.1;

/// Paint a solved card into straight-alpha RGBA8 pixels.
pub(crate) fn compose(
    layout: &CardLayout,
    palette: &Palette,
    tile: Option<&PatternTile>,
    logo: Option<&PreparedImage>,
    fonts: &FontBook,
) -> OgResult<RenderedCard> {
    let (width, height) = layout.canvas.as_u16();
    let mut ctx = vello_cpu::RenderContext::new(width, height);
    let full = layout.canvas.rect();

    ctx.set_paint(palette.background.to_cpu_color());
    ctx.fill_rect(&full);

    if let Some(tile) = tile {
        let pixmap = pixmap_from_premul_bytes(&tile.rgba8_premul, tile.width, tile.height)?;
        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default()
                .with_extend(vello_cpu::peniko::Extend::Repeat)
                .with_quality(vello_cpu::peniko::ImageQuality::Low),
        });
        ctx.fill_rect(&full);
    }

    if let (Some(rect), Some(img)) = (layout.logo, logo) {
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        ctx.set_transform(translate(rect));
        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        let shape = RoundedRect::new(
            0.0,
            0.0,
            f64::from(rect.w),
            f64::from(rect.h),
            LOGO_RADIUS,
        );
        ctx.fill_path(&shape.to_path(PATH_TOLERANCE));
        ctx.reset_transform();
    }

    if let Some(author) = &layout.author {
        draw_text(&mut ctx, author, fonts, 1.0);
    }
    draw_text(&mut ctx, &layout.title, fonts, 1.0);
    if let Some(description) = &layout.description {
        draw_text(&mut ctx, description, fonts, DESCRIPTION_OPACITY);
    }

    let bar = layout.bar;
    ctx.set_paint(palette.accent.to_cpu_color());
    let shape = RoundedRect::new(
        f64::from(bar.x),
        f64::from(bar.y),
        f64::from(bar.x + bar.w),
        f64::from(bar.y + bar.h),
        BAR_RADIUS,
    );
    ctx.fill_path(&shape.to_path(PATH_TOLERANCE));

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    let rgba8 = pixmap
        .take_unpremultiplied()
        .into_iter()
        .flat_map(|px| [px.r, px.g, px.b, px.a])
        .collect::<Vec<u8>>();

    Ok(RenderedCard {
        width: u32::from(width),
        height: u32::from(height),
        rgba8,
    })
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    placed: &PlacedText,
    fonts: &FontBook,
    opacity: f32,
) {
    let Some(block) = &placed.block else {
        return;
    };
    let Some(face) = fonts.face(block.face) else {
        return;
    };
    let font = face.cpu_font();

    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.set_transform(translate(placed.rect));
    for line in block.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            // Positioned glyphs carry the pen advance and line baseline.
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.reset_transform();
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn translate(rect: RectPx) -> Affine {
    Affine::translate((f64::from(rect.x), f64::from(rect.y)))
}

/// Wrap tightly packed premultiplied RGBA8 bytes as a pixmap.
pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> OgResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| OgError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| OgError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(OgError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
