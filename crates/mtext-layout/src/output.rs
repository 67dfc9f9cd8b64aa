//! Layout output: positioned glyphs grouped into runs and lines.
//!
//! The output is renderer-agnostic. A renderer either walks the lines and
//! runs directly or asks for [`LayoutResult::geometry_groups`], which
//! batches consecutive geometry by kind and color so that each group becomes
//! one mesh (filled fonts) or one line-segment buffer (stroke fonts).

use serde::Serialize;
use strum_macros::Display;

use crate::color::Rgb;
use crate::diagnostics::LayoutDiagnostics;
use crate::font::FontKind;
use crate::geometry::{BoundingBox, Outline, Point, Transform};
use crate::token::VerticalAlignment;

/// One glyph placed in the layout frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedGlyph {
    /// The character drawn (the placeholder for missing glyphs).
    pub ch: char,
    /// Kind of the font that supplied the outline.
    pub kind: FontKind,
    /// Pen position on the baseline.
    pub origin: Point,
    /// Horizontal advance including width factor, bold and tracking.
    pub advance: f64,
    /// Outline in layout coordinates; empty for blanks.
    pub outline: Outline,
    /// Union of the advance cell and the outline.
    pub bounds: BoundingBox,
}

impl PositionedGlyph {
    fn translate(&mut self, dx: f64, dy: f64) {
        self.origin = self.origin.offset(dx, dy);
        self.outline.translate(dx, dy);
        self.bounds = self.bounds.translated(dx, dy);
    }

    fn transform(&mut self, transform: &Transform) {
        self.origin = transform.apply(self.origin);
        self.outline.map_points(|point| transform.apply(point));
        self.bounds = self.bounds.transformed(transform);
    }
}

/// What a decoration segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecorationKind {
    /// Below the baseline.
    Underline,
    /// Above the cap height.
    Overline,
    /// Through the middle of the glyph.
    StrikeThrough,
    /// Divider of a stacked fraction.
    StackDivider,
}

/// A straight line segment drawn independently of any glyph outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecorationSegment {
    /// What the segment represents.
    pub kind: DecorationKind,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Color of the segment.
    pub color: Rgb,
}

impl DecorationSegment {
    /// Decoration of `kind` under/over/through a glyph with the given
    /// baseline origin, size and advance.
    #[must_use]
    pub fn for_glyph(kind: DecorationKind, origin: Point, size: f64, advance: f64, color: Rgb) -> Self {
        let y = match kind {
            DecorationKind::Underline => -0.2 * size,
            DecorationKind::Overline => 1.2 * size,
            DecorationKind::StrikeThrough | DecorationKind::StackDivider => 0.5 * size,
        };
        Self {
            kind,
            start: origin.offset(0.0, y),
            end: origin.offset(advance, y),
            color,
        }
    }

    /// Horizontal length (for horizontal segments).
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_corners(self.start, self.end)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.start = self.start.offset(dx, dy);
        self.end = self.end.offset(dx, dy);
    }

    fn transform(&mut self, transform: &Transform) {
        self.start = transform.apply(self.start);
        self.end = transform.apply(self.end);
    }
}

/// Glyphs sharing one color, laid out from one word or one stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphRun {
    /// Color of every glyph and decoration in the run.
    pub color: Rgb,
    /// Nominal size the run was laid out at.
    pub size: f64,
    /// Placement within the line.
    pub char_alignment: VerticalAlignment,
    /// Pen position where the run starts.
    pub start_x: f64,
    /// Sum of the advances in the run.
    pub width: f64,
    /// Glyphs in layout order.
    pub glyphs: Vec<PositionedGlyph>,
    /// Decorations and stack dividers.
    pub decorations: Vec<DecorationSegment>,
}

impl GlyphRun {
    /// Empty run starting at `start_x`.
    #[must_use]
    pub const fn new(
        color: Rgb,
        size: f64,
        char_alignment: VerticalAlignment,
        start_x: f64,
    ) -> Self {
        Self {
            color,
            size,
            char_alignment,
            start_x,
            width: 0.0,
            glyphs: Vec::new(),
            decorations: Vec::new(),
        }
    }

    /// Pen position after the last glyph.
    #[must_use]
    pub fn end_x(&self) -> f64 {
        self.start_x + self.width
    }

    /// Union of glyph and decoration bounds.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        let glyphs = self
            .glyphs
            .iter()
            .fold(BoundingBox::EMPTY, |acc, glyph| acc.union(glyph.bounds));
        self.decorations
            .iter()
            .fold(glyphs, |acc, segment| acc.union(segment.bounds()))
    }

    /// Translate every glyph and decoration.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.start_x += dx;
        for glyph in &mut self.glyphs {
            glyph.translate(dx, dy);
        }
        for segment in &mut self.decorations {
            segment.translate(dx, dy);
        }
    }

    fn transform(&mut self, transform: &Transform) {
        for glyph in &mut self.glyphs {
            glyph.transform(transform);
        }
        for segment in &mut self.decorations {
            segment.transform(transform);
        }
    }
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGroup {
    /// Baseline position in the layout frame.
    pub baseline: f64,
    /// Vertical advance this line contributed to the total height.
    pub advance: f64,
    /// Largest nominal size on the line.
    pub max_font_size: f64,
    /// Whether this line starts a paragraph (and therefore got the indent).
    pub starts_paragraph: bool,
    /// Runs in layout order.
    pub runs: Vec<GlyphRun>,
    /// Union of the run bounds.
    pub bounds: BoundingBox,
}

impl LineGroup {
    /// Recompute `bounds` from the runs.
    pub fn update_bounds(&mut self) {
        self.bounds = self
            .runs
            .iter()
            .fold(BoundingBox::EMPTY, |acc, run| acc.union(run.bounds()));
    }

    /// Characters of the line, runs concatenated without separators.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .flat_map(|run| run.glyphs.iter().map(|glyph| glyph.ch))
            .collect()
    }
}

/// A batch of geometry that a renderer draws with one primitive type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryGroup {
    /// Fill (mesh) or stroke (line segments).
    pub kind: FontKind,
    /// Color of the whole batch.
    pub color: Rgb,
    /// Contours: closed polygons for fills, polylines for strokes.
    pub contours: Vec<Vec<Point>>,
}

/// The complete output of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Sum of the line advances.
    pub total_height: f64,
    /// Lines in layout order.
    pub lines: Vec<LineGroup>,
    /// Union of all line bounds.
    pub bounds: BoundingBox,
    /// Recovered problems.
    pub diagnostics: LayoutDiagnostics,
}

impl LayoutResult {
    /// Number of glyphs across all lines.
    #[must_use]
    pub fn glyph_count(&self) -> usize {
        self.runs().map(|run| run.glyphs.len()).sum()
    }

    /// Iterate over every run in layout order.
    pub fn runs(&self) -> impl Iterator<Item = &GlyphRun> {
        self.lines.iter().flat_map(|line| line.runs.iter())
    }

    /// Iterate over every decoration segment in layout order.
    pub fn decorations(&self) -> impl Iterator<Item = &DecorationSegment> {
        self.runs().flat_map(|run| run.decorations.iter())
    }

    /// Recompute every line's bounds and the overall bounds.
    pub fn update_bounds(&mut self) {
        for line in &mut self.lines {
            line.update_bounds();
        }
        self.bounds = self
            .lines
            .iter()
            .fold(BoundingBox::EMPTY, |acc, line| acc.union(line.bounds));
    }

    /// Apply `transform` to all geometry. Line baselines and run start
    /// positions stay in the local frame; bounds become axis-aligned boxes
    /// in the target frame.
    pub fn transform(&mut self, transform: &Transform) {
        for line in &mut self.lines {
            for run in &mut line.runs {
                run.transform(transform);
            }
        }
        self.update_bounds();
    }

    /// Merge consecutive geometry sharing kind and color into batches.
    ///
    /// Decoration segments are strokes and join the stroke batch of their
    /// color.
    #[must_use]
    pub fn geometry_groups(&self) -> Vec<GeometryGroup> {
        let mut groups: Vec<GeometryGroup> = Vec::new();
        let mut push = |kind: FontKind, color: Rgb, contours: Vec<Vec<Point>>| {
            match groups.last_mut() {
                Some(last) if last.kind == kind && last.color == color => {
                    last.contours.extend(contours);
                }
                _ => groups.push(GeometryGroup {
                    kind,
                    color,
                    contours,
                }),
            }
        };
        for run in self.runs() {
            for glyph in &run.glyphs {
                if !glyph.outline.is_empty() {
                    push(glyph.kind, run.color, glyph.outline.contours.clone());
                }
            }
            for segment in &run.decorations {
                push(
                    FontKind::Stroke,
                    segment.color,
                    vec![vec![segment.start, segment.end]],
                );
            }
        }
        groups
    }
}
