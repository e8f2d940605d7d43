use std::{error::Error, fs, path::PathBuf, result};

use ab_glyph::{point, Font, FontVec, GlyphId, OutlinedGlyph, Point, PxScale, Rect, ScaleFont};
use fontdb::{Database, Family, Query};
use image::Rgba;
use log::debug;

use crate::canvas::Canvas;

type Result<T> = result::Result<T, Box<dyn Error>>;

/// Where to look for the font used to draw the glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Installed font looked up by family name.
    System(String),
    /// Font file on disk (TrueType / OpenType, first face of a collection).
    File(PathBuf),
}

impl FontSource {
    pub fn load(&self) -> Result<FontVec> {
        match self {
            FontSource::System(family) => load_system_font(family),
            FontSource::File(path) => {
                debug!("loading font file {}", path.display());
                let data = fs::read(path)
                    .map_err(|e| format!("cannot read font file {}: {}", path.display(), e))?;
                Ok(FontVec::try_from_vec(data)?)
            }
        }
    }
}

fn load_system_font(family: &str) -> Result<FontVec> {
    let mut db = Database::new();
    db.load_system_fonts();
    debug!("{} system font faces available", db.len());

    let families = [Family::Name(family)];
    let query = Query {
        families: &families,
        ..Query::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| format!("no system font found for family {:?}", family))?;
    let (data, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or("font face data is unavailable")?;

    debug!("resolved font family {:?} (face index {})", family, index);
    Ok(FontVec::try_from_vec_and_index(data, index)?)
}

/// How a piece of text is placed on a canvas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    /// Em size in pixels.
    pub size: f32,
    /// Added to the vertical position after centering; negative moves up.
    pub offset_y: f32,
    pub color: Rgba<u8>,
}

/// Draws `text` centered on the canvas.
///
/// The string is laid out on one line from a top-left origin whose baseline
/// sits one ascent below it. The ink box measured from that origin is used to
/// center the origin itself, then `offset_y` is applied. Nothing is drawn
/// unless every character has an outline-capable glyph in `font`: a character
/// missing from the font is an error, not a `.notdef` box, so callers can
/// switch to a fallback shape instead of rendering tofu.
pub fn draw_centered(
    canvas: &mut Canvas,
    font: &FontVec,
    text: &str,
    style: &TextStyle,
) -> Result<()> {
    let (width, height) = canvas.dimensions();

    let measured = layout(font, text, style.size, point(0.0, 0.0))?;
    let ink = ink_bounds(&measured).ok_or("text has no ink")?;
    let ink_w = ink.max.x - ink.min.x;
    let ink_h = ink.max.y - ink.min.y;

    let origin = point(
        (width as f32 - ink_w) / 2.0,
        (height as f32 - ink_h) / 2.0 + style.offset_y,
    );
    let glyphs = layout(font, text, style.size, origin)?;

    for glyph in &glyphs {
        let b = glyph.px_bounds();
        glyph.draw(|x, y, coverage| {
            canvas.blend(
                b.min.x as i32 + x as i32,
                b.min.y as i32 + y as i32,
                style.color,
                coverage,
            );
        });
    }

    Ok(())
}

/// Outlines every glyph of `text` positioned from `origin`.
fn layout(font: &FontVec, text: &str, size: f32, origin: Point) -> Result<Vec<OutlinedGlyph>> {
    let units_per_em = font
        .units_per_em()
        .ok_or("font does not declare units per em")?;
    let scale = PxScale::from(size * font.height_unscaled() / units_per_em);
    let scaled = font.as_scaled(scale);

    let mut caret = point(origin.x, origin.y + scaled.ascent());
    let mut previous: Option<GlyphId> = None;
    let mut outlined = Vec::new();

    for c in text.chars() {
        let id = font.glyph_id(c);
        if id.0 == 0 {
            return Err(format!("font has no glyph for {:?}", c).into());
        }
        if let Some(prev) = previous {
            caret.x += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, caret);
        caret.x += scaled.h_advance(id);
        previous = Some(id);

        if let Some(g) = font.outline_glyph(glyph) {
            outlined.push(g);
        }
    }

    if outlined.is_empty() {
        return Err(format!("nothing to draw for {:?}", text).into());
    }
    Ok(outlined)
}

fn ink_bounds(glyphs: &[OutlinedGlyph]) -> Option<Rect> {
    glyphs.iter().map(|g| g.px_bounds()).reduce(|a, b| Rect {
        min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
        max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
    })
}
