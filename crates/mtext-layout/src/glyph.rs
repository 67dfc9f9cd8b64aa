//! Glyph run builder: one character to one shaped outline plus advance.
//!
//! Lookup walks a fallback chain and never fails:
//!
//! 1. the active font,
//! 2. the configured big font,
//! 3. any loaded font,
//! 4. the placeholder character of the active font,
//! 5. a synthesized box.
//!
//! The returned outline sits at the pen origin with the width factor,
//! synthetic bold and oblique shear already applied; the driver only
//! translates it into place.

use mtext_common::warning::warn_once;

use crate::context::FormattingContext;
use crate::diagnostics::LayoutDiagnostics;
use crate::font::{FontKind, GlyphProvider, GlyphShape};
use crate::geometry::{BoundingBox, Outline, Point};
use crate::options::LayoutOptions;
use crate::output::PositionedGlyph;

/// A shaped glyph not yet placed on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedGlyph {
    /// The character actually drawn.
    pub ch: char,
    /// Kind of the font that answered.
    pub kind: FontKind,
    /// Advance including width factor, bold and tracking.
    pub advance: f64,
    /// Outline relative to the pen origin.
    pub outline: Outline,
    /// Union of the advance cell and the outline, relative to the origin.
    pub bounds: BoundingBox,
}

impl ShapedGlyph {
    /// Move the glyph so its pen origin sits at `origin`.
    #[must_use]
    pub fn placed_at(self, origin: Point) -> PositionedGlyph {
        let mut outline = self.outline;
        outline.translate(origin.x, origin.y);
        PositionedGlyph {
            ch: self.ch,
            kind: self.kind,
            origin,
            advance: self.advance,
            outline,
            bounds: self.bounds.translated(origin.x, origin.y),
        }
    }
}

/// Builds [`ShapedGlyph`]s from the glyph provider.
pub struct GlyphBuilder<'a> {
    fonts: &'a dyn GlyphProvider,
    options: &'a LayoutOptions,
}

impl<'a> GlyphBuilder<'a> {
    /// Create a builder over `fonts`.
    #[must_use]
    pub const fn new(fonts: &'a dyn GlyphProvider, options: &'a LayoutOptions) -> Self {
        Self { fonts, options }
    }

    /// Shape `ch` with the attributes of `context`.
    pub fn shape(
        &self,
        ch: char,
        context: &FormattingContext,
        diagnostics: &mut LayoutDiagnostics,
    ) -> ShapedGlyph {
        let size = context.glyph_size();
        let (drawn, kind, shape) = self.lookup(ch, context, size, diagnostics);
        self.finish(drawn, kind, shape, context)
    }

    /// Shape every character of `text`, returning the glyphs and their
    /// total advance. Nothing is placed; the caller decides where.
    pub fn shape_text(
        &self,
        text: impl IntoIterator<Item = char>,
        context: &FormattingContext,
        diagnostics: &mut LayoutDiagnostics,
    ) -> (Vec<ShapedGlyph>, f64) {
        let glyphs: Vec<ShapedGlyph> = text
            .into_iter()
            .map(|ch| self.shape(ch, context, diagnostics))
            .collect();
        let width = glyphs.iter().map(|glyph| glyph.advance).sum();
        (glyphs, width)
    }

    fn lookup(
        &self,
        ch: char,
        context: &FormattingContext,
        size: f64,
        diagnostics: &mut LayoutDiagnostics,
    ) -> (char, FontKind, GlyphShape) {
        if let Some(shape) = self.fonts.glyph(ch, &context.font, size) {
            return (ch, context.font_kind, shape);
        }

        if let Some(big_font) = &self.options.big_font
            && let Some(shape) = self.fonts.glyph(ch, big_font, size)
        {
            return (ch, self.kind_of(big_font, context.font_kind), shape);
        }

        if let Some((font, shape)) = self.fonts.find_glyph(ch, size) {
            return (ch, self.kind_of(&font, context.font_kind), shape);
        }

        diagnostics.record_unsupported_char(&context.font, ch);
        warn_once(
            "Glyph",
            &format!("no font provides U+{:04X}, drawing placeholder", u32::from(ch)),
        );

        let placeholder = self.options.not_found_char;
        if let Some(shape) = self.fonts.glyph(placeholder, &context.font, size) {
            return (placeholder, context.font_kind, shape);
        }
        (placeholder, context.font_kind, placeholder_box(size))
    }

    fn kind_of(&self, font: &str, fallback: FontKind) -> FontKind {
        self.fonts
            .font_info(font)
            .map_or(fallback, |info| info.kind)
    }

    fn finish(
        &self,
        ch: char,
        kind: FontKind,
        shape: GlyphShape,
        context: &FormattingContext,
    ) -> ShapedGlyph {
        let size = context.effective_size();
        let mut advance = shape.advance * context.width_factor;
        let mut outline = shape.outline.unwrap_or_default();

        outline.map_points(|point| Point::new(point.x * context.width_factor, point.y));

        if context.bold {
            let expansion = self.options.bold_expansion * size;
            match kind {
                FontKind::Filled => {
                    if advance > 0.0 {
                        let stretch = (advance + expansion) / advance;
                        outline.map_points(|point| Point::new(point.x * stretch, point.y));
                    }
                }
                FontKind::Stroke => {
                    let mut double = outline.clone();
                    double.translate(expansion, 0.0);
                    outline.extend(double);
                }
            }
            advance += expansion;
        }

        let oblique = context.effective_oblique();
        if oblique != 0.0 {
            let shear = oblique.to_radians().tan();
            outline.map_points(|point| Point::new(point.x + point.y * shear, point.y));
        }

        advance *= context.tracking;

        let cell = BoundingBox::from_corners(Point::ORIGIN, Point::new(advance, size));
        let bounds = cell.union(outline.bounds());
        ShapedGlyph {
            ch,
            kind,
            advance,
            outline,
            bounds,
        }
    }
}

/// Rectangle drawn when not even the placeholder character exists.
fn placeholder_box(size: f64) -> GlyphShape {
    let width = size * 0.6;
    let inset = size * 0.1;
    GlyphShape {
        advance: width,
        outline: Some(Outline::new(vec![vec![
            Point::new(inset, 0.0),
            Point::new(width - inset, 0.0),
            Point::new(width - inset, size),
            Point::new(inset, size),
            Point::new(inset, 0.0),
        ]])),
    }
}
