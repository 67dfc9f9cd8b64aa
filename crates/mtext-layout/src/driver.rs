//! The line and paragraph driver.
//!
//! [`Typesetter`] owns the injected collaborators and runs one
//! [`LayoutPass`] per request. A pass walks the token stream once:
//!
//! ```text
//!            word / stack                 space / tab / stack
//!   ┌──────────────────────┐   ┌─────────────────────────────────┐
//!   │                      ▼   │                                 ▼
//! AtParagraphBreak ──► InLine ─┴──────────────────────► AtWordBoundary
//!        ▲                 │                                     │
//!        └──── \P ─────────┴──────────────── \P ─────────────────┘
//! ```
//!
//! Lines only wrap when a word or stack arrives at a word boundary, so text
//! glued together by formatting commands or non-breaking spaces stays on
//! one line.

use log::debug;
#[cfg(feature = "layout-trace")]
use log::trace;
use strum_macros::Display;

use crate::align::{LineFrame, align_line};
use crate::color::{ColorIndexResolver, ColorSettings};
use crate::context::{ContextStack, FormattingContext};
use crate::diagnostics::LayoutDiagnostics;
use crate::font::{FontKind, GlyphProvider};
use crate::format::FormatInterpreter;
use crate::geometry::Point;
use crate::glyph::{GlyphBuilder, ShapedGlyph};
use crate::line::{LineCursor, LineMetrics};
use crate::options::{LayoutOptions, MTextEntity};
use crate::output::{DecorationKind, DecorationSegment, GlyphRun, LayoutResult, LineGroup};
use crate::paragraph::ParagraphState;
use crate::placement::place;
use crate::stack::layout_stack;
use crate::token::{MTextToken, StackedExpression, WordText};

/// Where the driver stands between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DriverState {
    /// Inside a word; the next word continues it without a break point.
    InLine,
    /// After a blank; the next word may start a new line.
    AtWordBoundary,
    /// At the start of a paragraph; the next content receives the indent.
    AtParagraphBreak,
}

/// Lays out token streams with injected fonts and colors.
pub struct Typesetter<'a> {
    fonts: &'a dyn GlyphProvider,
    palette: &'a dyn ColorIndexResolver,
    colors: ColorSettings,
    options: &'a LayoutOptions,
}

impl<'a> Typesetter<'a> {
    /// Create a typesetter with white by-layer and by-block colors.
    #[must_use]
    pub fn new(
        fonts: &'a dyn GlyphProvider,
        palette: &'a dyn ColorIndexResolver,
        options: &'a LayoutOptions,
    ) -> Self {
        Self {
            fonts,
            palette,
            colors: ColorSettings::default(),
            options,
        }
    }

    /// Use `colors` for the by-layer and by-block indices.
    #[must_use]
    pub const fn with_colors(mut self, colors: ColorSettings) -> Self {
        self.colors = colors;
        self
    }

    /// Lay out `tokens` in the local frame: origin at the top-left of the
    /// first line, y up.
    ///
    /// This never fails. Missing glyphs, missing fonts and malformed
    /// grouping are recovered and reported in
    /// [`LayoutResult::diagnostics`].
    #[must_use]
    pub fn layout(&self, tokens: &[MTextToken], entity: &MTextEntity) -> LayoutResult {
        let mut pass = LayoutPass::new(self, entity);
        for token in tokens {
            pass.process(token);
        }
        pass.finish()
    }

    /// Lay out `tokens` and move the result to the entity's insertion
    /// point, attachment and rotation.
    #[must_use]
    pub fn render(&self, tokens: &[MTextToken], entity: &MTextEntity) -> LayoutResult {
        let mut result = self.layout(tokens, entity);
        place(&mut result, entity);
        result
    }
}

/// State of one forward pass over a token stream.
struct LayoutPass<'a> {
    entity: &'a MTextEntity,
    options: &'a LayoutOptions,
    builder: GlyphBuilder<'a>,
    formats: FormatInterpreter<'a>,
    contexts: ContextStack,
    paragraph: ParagraphState,
    cursor: LineCursor,
    metrics: LineMetrics,
    state: DriverState,
    lines: Vec<LineGroup>,
    total_height: f64,
    diagnostics: LayoutDiagnostics,
}

impl<'a> LayoutPass<'a> {
    fn new(typesetter: &'a Typesetter<'a>, entity: &'a MTextEntity) -> Self {
        let options = typesetter.options;
        let formats = FormatInterpreter::new(
            typesetter.fonts,
            typesetter.palette,
            &typesetter.colors,
            options,
            entity,
        );
        let mut diagnostics = LayoutDiagnostics::default();

        let requested = if entity.font.trim().is_empty() {
            options.default_font.as_str()
        } else {
            entity.font.as_str()
        };
        let font = formats.resolve_font(requested, FontKind::Stroke, &mut diagnostics);
        let height = if entity.height.is_finite() && entity.height > 0.0 {
            entity.height
        } else {
            1.0
        };
        let color = typesetter.colors.resolve(entity.color, typesetter.palette);

        let mut base = FormattingContext::new(&font.name, font.info.kind, height, color);
        base.font_scale_factor = font.info.scale_factor;
        if entity.width_factor.is_finite() && entity.width_factor > 0.0 {
            base.width_factor = entity.width_factor;
        }
        base.oblique_angle = entity.oblique;
        base.refresh_blank_width();

        Self {
            entity,
            options,
            builder: GlyphBuilder::new(typesetter.fonts, options),
            formats,
            contexts: ContextStack::new(base),
            paragraph: ParagraphState::new(entity.attachment.default_alignment()),
            cursor: LineCursor::default(),
            metrics: LineMetrics {
                line_space_factor: entity.line_space_factor,
                line_spacing_constant: options.line_spacing_constant,
                flow_direction: entity.flow_direction,
            },
            state: DriverState::AtParagraphBreak,
            lines: Vec::new(),
            total_height: 0.0,
            diagnostics,
        }
    }

    fn process(&mut self, token: &MTextToken) {
        #[cfg(feature = "layout-trace")]
        trace!(target: "mtext", "[{}] {token:?}", self.state);

        match token {
            MTextToken::Word(text) => self.add_word(text),
            MTextToken::Space => self.add_blank(DriverState::AtWordBoundary),
            MTextToken::NonBreakingSpace => self.add_blank(DriverState::InLine),
            MTextToken::Tab => self.add_tab(),
            MTextToken::ParagraphBreak => self.break_paragraph(),
            MTextToken::Stack(expression) => self.add_stack(expression),
            MTextToken::Format(command) => self.formats.apply(
                command,
                &mut self.contexts,
                &mut self.paragraph,
                &mut self.diagnostics,
            ),
        }
    }

    fn finish(mut self) -> LayoutResult {
        if !self.cursor.is_line_empty() {
            self.break_line(false);
        }
        let mut result = LayoutResult {
            total_height: self.total_height,
            lines: self.lines,
            diagnostics: self.diagnostics,
            ..LayoutResult::default()
        };
        result.update_bounds();
        debug!(
            target: "mtext",
            "laid out {} lines, {} glyphs, height {:.3}",
            result.lines.len(),
            result.glyph_count(),
            result.total_height
        );
        result
    }

    /// Apply the first-line indent when content opens a paragraph.
    fn begin_content(&mut self) {
        if self.state == DriverState::AtParagraphBreak && self.cursor.is_line_empty() {
            self.cursor.h_offset = self.paragraph.indent;
        }
    }

    /// Start a new line if `width` does not fit after the cursor.
    ///
    /// Only a word boundary is a break point, and a line never breaks
    /// before its first run.
    fn wrap_if_needed(&mut self, width: f64) {
        if self.state != DriverState::AtWordBoundary || self.cursor.is_line_empty() {
            return;
        }
        let Some(usable) = self.paragraph.usable_width(self.entity.width) else {
            return;
        };
        if self.cursor.h_offset + width > usable {
            self.break_line(false);
        }
    }

    fn add_word(&mut self, text: &WordText) {
        if text.is_empty() {
            return;
        }
        self.begin_content();

        // STEP 1: Shape the whole word before touching the cursor.
        let context = self.contexts.active().clone();
        let (glyphs, width) = self
            .builder
            .shape_text(text.chars(), &context, &mut self.diagnostics);

        // STEP 2: Move the whole word to the next line if it overflows.
        self.wrap_if_needed(width);

        // STEP 3: Emit the run at the cursor.
        let start_x = self.paragraph.left_margin + self.cursor.h_offset;
        let run = build_word_run(glyphs, width, start_x, &context);
        self.cursor.record_size(context.effective_size());
        self.cursor.push_run(run);
        self.cursor.h_offset += width;
        self.state = DriverState::InLine;
    }

    fn add_blank(&mut self, next: DriverState) {
        self.begin_content();
        let context = self.contexts.active();
        self.cursor.h_offset += context.blank_width * context.word_space;
        self.state = next;
    }

    fn add_tab(&mut self) {
        self.begin_content();
        let h_offset = self.cursor.h_offset;
        let step = self.options.default_tab_size * self.contexts.active().blank_width;
        self.cursor.h_offset = match self.paragraph.next_tab_stop(h_offset) {
            Some(stop) => stop,
            None if step > 0.0 => ((h_offset / step).floor() + 1.0) * step,
            None => h_offset,
        };
        self.state = DriverState::AtWordBoundary;
    }

    fn add_stack(&mut self, expression: &StackedExpression) {
        self.begin_content();

        let context = self.contexts.active().clone();
        let layout = layout_stack(
            expression,
            &context,
            &self.builder,
            self.options,
            &mut self.diagnostics,
        );
        self.wrap_if_needed(layout.width);

        let start_x = self.paragraph.left_margin + self.cursor.h_offset;
        let size = context.effective_size();
        let mut run = GlyphRun::new(context.color, layout.height, context.char_alignment, start_x);
        run.width = layout.width;
        for placed in layout.glyphs {
            let origin = placed.origin.offset(start_x, 0.0);
            run.glyphs.push(placed.glyph.placed_at(origin));
        }
        if let Some((start, end)) = layout.divider {
            run.decorations.push(DecorationSegment {
                kind: DecorationKind::StackDivider,
                start: start.offset(start_x, 0.0),
                end: end.offset(start_x, 0.0),
                color: context.color,
            });
        }
        for kind in active_decorations(&context) {
            run.decorations.push(DecorationSegment::for_glyph(
                kind,
                Point::new(start_x, 0.0),
                size,
                layout.width,
                context.color,
            ));
        }

        self.cursor.record_size(layout.height);
        self.cursor.push_run(run);
        self.cursor.h_offset += layout.width + context.blank_width;
        self.state = DriverState::AtWordBoundary;
    }

    fn break_paragraph(&mut self) {
        self.break_line(true);
        self.paragraph = ParagraphState::new(self.entity.attachment.default_alignment());
        self.state = DriverState::AtParagraphBreak;
        debug!(target: "mtext", "paragraph break after line {}", self.cursor.line_count);
    }

    fn break_line(&mut self, next_starts_paragraph: bool) {
        let current_size = self.contexts.active().effective_size();
        let mut line = self
            .cursor
            .finish(&self.metrics, current_size, next_starts_paragraph);

        let frame = LineFrame {
            left_margin: self.paragraph.left_margin,
            indent: if line.starts_paragraph {
                self.paragraph.indent
            } else {
                0.0
            },
            usable_width: self.paragraph.usable_width(self.entity.width),
        };
        align_line(&mut line, self.paragraph.alignment, &frame);

        debug!(
            target: "mtext",
            "line {} at baseline {:.3}, advance {:.3}",
            self.cursor.line_count,
            line.baseline,
            line.advance
        );
        self.total_height += line.advance;
        self.lines.push(line);
    }
}

fn active_decorations(context: &FormattingContext) -> impl Iterator<Item = DecorationKind> {
    [
        (context.underline, DecorationKind::Underline),
        (context.overline, DecorationKind::Overline),
        (context.strike_through, DecorationKind::StrikeThrough),
    ]
    .into_iter()
    .filter_map(|(on, kind)| on.then_some(kind))
}

fn build_word_run(
    glyphs: Vec<ShapedGlyph>,
    width: f64,
    start_x: f64,
    context: &FormattingContext,
) -> GlyphRun {
    let size = context.effective_size();
    let mut run = GlyphRun::new(context.color, size, context.char_alignment, start_x);
    run.width = width;

    let mut pen = start_x;
    for glyph in glyphs {
        let origin = Point::new(pen, 0.0);
        let advance = glyph.advance;
        for kind in active_decorations(context) {
            run.decorations.push(DecorationSegment::for_glyph(
                kind,
                origin,
                size,
                advance,
                context.color,
            ));
        }
        run.glyphs.push(glyph.placed_at(origin));
        pen += advance;
    }
    run
}
