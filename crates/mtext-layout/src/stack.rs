//! Stacked expressions: fractions, tolerances and lone sub/superscripts.
//!
//! A stack is laid out in its own frame with the pen at `x = 0` on the
//! line's baseline. The driver translates the result to the cursor.
//!
//! ```text
//!          ┌───┐
//!          │ 1 │  numerator baseline   +0.6 × size
//!   ───────┴───┴──────  divider         +0.5 × size
//!          │ 2 │  denominator baseline −0.6 × size
//!          └───┘
//! ```

use crate::context::FormattingContext;
use crate::diagnostics::LayoutDiagnostics;
use crate::geometry::Point;
use crate::glyph::{GlyphBuilder, ShapedGlyph};
use crate::options::LayoutOptions;
use crate::token::{StackDivider, StackedExpression};

/// Numerator baseline above the line baseline, in units of the size.
const NUMERATOR_RISE: f64 = 0.6;

/// Denominator baseline below the line baseline, in units of the size.
const DENOMINATOR_DROP: f64 = 0.6;

/// Height of the horizontal rule, in units of the size.
const DIVIDER_HEIGHT: f64 = 0.5;

/// A glyph placed in the stack frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StackGlyph {
    /// The shaped glyph.
    pub glyph: ShapedGlyph,
    /// Pen origin relative to the stack origin.
    pub origin: Point,
}

/// A laid-out stack, relative to its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct StackLayout {
    /// Glyphs of both halves.
    pub glyphs: Vec<StackGlyph>,
    /// Divider segment, when the divider kind draws one.
    pub divider: Option<(Point, Point)>,
    /// Shared width of the stack.
    pub width: f64,
    /// Extent above the line baseline, counted toward the line height.
    pub height: f64,
}

/// Which layout a stack gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackShape {
    Superscript,
    Subscript,
    Fraction,
    Empty,
}

fn classify(expression: &StackedExpression) -> StackShape {
    let has_top = !expression.numerator.is_empty();
    let has_bottom = !expression.denominator.is_empty();
    match (expression.divider, has_top, has_bottom) {
        (_, false, false) => StackShape::Empty,
        (StackDivider::Tolerance, true, false) => StackShape::Superscript,
        (StackDivider::Tolerance, false, true) => StackShape::Subscript,
        _ => StackShape::Fraction,
    }
}

/// Lay out `expression` with the attributes of `context`.
///
/// Both halves are measured with tracking forced to 1. Lone scripts are
/// shaped at `script_scale` of the current size. The caller's context is
/// never modified.
pub fn layout_stack(
    expression: &StackedExpression,
    context: &FormattingContext,
    builder: &GlyphBuilder<'_>,
    options: &LayoutOptions,
    diagnostics: &mut LayoutDiagnostics,
) -> StackLayout {
    let mut untracked = context.clone();
    untracked.tracking = 1.0;
    let size = untracked.effective_size();

    match classify(expression) {
        StackShape::Empty => StackLayout {
            glyphs: Vec::new(),
            divider: None,
            width: 0.0,
            height: size,
        },
        shape @ (StackShape::Superscript | StackShape::Subscript) => {
            let (text, offset) = if shape == StackShape::Superscript {
                (&expression.numerator, options.superscript_offset)
            } else {
                (&expression.denominator, options.subscript_offset)
            };
            let mut script = untracked;
            script.font_size_scale_factor *= options.script_scale;
            script.refresh_blank_width();
            let script_size = script.effective_size();
            let (shaped, width) = builder.shape_text(text.chars(), &script, diagnostics);
            StackLayout {
                glyphs: place_row(shaped, 0.0, offset * size),
                divider: None,
                width,
                height: (offset * size + script_size).max(script_size),
            }
        }
        StackShape::Fraction => {
            let (top, top_width) =
                builder.shape_text(expression.numerator.chars(), &untracked, diagnostics);
            let (bottom, bottom_width) =
                builder.shape_text(expression.denominator.chars(), &untracked, diagnostics);
            let width = top_width.max(bottom_width);

            let top_baseline = NUMERATOR_RISE * size;
            let bottom_baseline = -DENOMINATOR_DROP * size;
            let mut glyphs = place_row(top, (width - top_width) / 2.0, top_baseline);
            glyphs.extend(place_row(bottom, (width - bottom_width) / 2.0, bottom_baseline));

            let divider = match expression.divider {
                StackDivider::Line => Some((
                    Point::new(0.0, DIVIDER_HEIGHT * size),
                    Point::new(width, DIVIDER_HEIGHT * size),
                )),
                StackDivider::Slash => Some((
                    Point::new(0.0, bottom_baseline),
                    Point::new(width, top_baseline + size),
                )),
                StackDivider::Tolerance => None,
            };

            StackLayout {
                glyphs,
                divider,
                width,
                height: top_baseline + size,
            }
        }
    }
}

fn place_row(glyphs: Vec<ShapedGlyph>, start_x: f64, baseline: f64) -> Vec<StackGlyph> {
    let mut pen = start_x;
    glyphs
        .into_iter()
        .map(|glyph| {
            let origin = Point::new(pen, baseline);
            pen += glyph.advance;
            StackGlyph { glyph, origin }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::font::{ApproximateGlyphProvider, FontKind};

    const EPS: f64 = 1e-9;

    fn run(expression: &StackedExpression) -> StackLayout {
        let fonts = ApproximateGlyphProvider::default();
        let options = LayoutOptions::default();
        let builder = GlyphBuilder::new(&fonts, &options);
        let mut context = FormattingContext::new("arial", FontKind::Filled, 10.0, Rgb::WHITE);
        context.tracking = 3.0;
        layout_stack(
            expression,
            &context,
            &builder,
            &options,
            &mut LayoutDiagnostics::default(),
        )
    }

    #[test]
    fn test_fraction_centers_shorter_half() {
        let layout = run(&StackedExpression::new("1", "234", StackDivider::Line));
        // Tracking is forced to 1: "234" is 3 × 6 wide.
        assert!((layout.width - 18.0).abs() < EPS);
        let numerator = &layout.glyphs[0];
        assert!((numerator.origin.x - 6.0).abs() < EPS);
        assert!((numerator.origin.y - 6.0).abs() < EPS);
        let denominator = &layout.glyphs[1];
        assert!(denominator.origin.x.abs() < EPS);
        assert!((denominator.origin.y + 6.0).abs() < EPS);

        let (start, end) = layout.divider.unwrap();
        assert!((end.x - start.x - 18.0).abs() < EPS);
        assert!((start.y - 5.0).abs() < EPS);
    }

    #[test]
    fn test_slash_divider_is_diagonal() {
        let layout = run(&StackedExpression::new("1", "2", StackDivider::Slash));
        let (start, end) = layout.divider.unwrap();
        assert!(end.y > start.y);
        assert!((end.x - layout.width).abs() < EPS);
    }

    #[test]
    fn test_tolerance_has_no_divider() {
        let layout = run(&StackedExpression::new("+1", "-1", StackDivider::Tolerance));
        assert!(layout.divider.is_none());
        assert_eq!(layout.glyphs.len(), 4);
    }

    #[test]
    fn test_superscript_shrinks_and_rises() {
        let layout = run(&StackedExpression::new("2", "", StackDivider::Tolerance));
        assert_eq!(layout.glyphs.len(), 1);
        // Raised by 1.0, so the 7.0 glyph reaches 8.0 above the baseline.
        assert!((layout.height - 8.0).abs() < EPS);
        assert!((layout.glyphs[0].origin.y - 1.0).abs() < EPS);
        assert!((layout.width - 4.2).abs() < EPS);
    }

    #[test]
    fn test_subscript_drops() {
        let layout = run(&StackedExpression::new("", "2", StackDivider::Tolerance));
        assert!((layout.glyphs[0].origin.y + 3.0).abs() < EPS);
        assert!((layout.height - 7.0).abs() < EPS);
    }

    #[test]
    fn test_fraction_height_covers_numerator() {
        let layout = run(&StackedExpression::new("1", "2", StackDivider::Line));
        // Numerator baseline 6.0 plus a 10.0 glyph.
        assert!((layout.height - 16.0).abs() < EPS);
    }

    #[test]
    fn test_empty_stack() {
        let layout = run(&StackedExpression::new("", "", StackDivider::Line));
        assert!(layout.glyphs.is_empty());
        assert!(layout.width.abs() < EPS);
    }
}
