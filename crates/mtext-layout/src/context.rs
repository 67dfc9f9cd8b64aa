//! Character formatting state and the `{}` group stack.

use serde::Serialize;

use crate::color::Rgb;
use crate::font::FontKind;
use crate::token::VerticalAlignment;

/// Snapshot of every inline character attribute.
///
/// Opening a `{` group pushes a copy of the active context; closing it
/// restores that copy, so anything changed inside the group is undone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattingContext {
    /// Resolved font name.
    pub font: String,
    /// Kind of the resolved font.
    pub font_kind: FontKind,
    /// Scale factor reported by the font's metadata.
    pub font_scale_factor: f64,
    /// Nominal text height.
    pub font_size: f64,
    /// Multiplier applied to `font_size` by relative height commands.
    pub font_size_scale_factor: f64,
    /// Text color.
    pub color: Rgb,
    /// Underline active.
    pub underline: bool,
    /// Overline active.
    pub overline: bool,
    /// Strike-through active.
    pub strike_through: bool,
    /// Explicit oblique angle in degrees.
    pub oblique_angle: f64,
    /// Italic face requested.
    pub italic: bool,
    /// Bold face requested.
    pub bold: bool,
    /// Horizontal glyph scale.
    pub width_factor: f64,
    /// Character spacing factor.
    pub tracking: f64,
    /// Multiplier applied to blanks.
    pub word_space: f64,
    /// Advance of one blank at the current font and size.
    pub blank_width: f64,
    /// Placement of smaller characters within the line.
    pub char_alignment: VerticalAlignment,
}

impl FormattingContext {
    /// Context for a resolved base font at the given height.
    #[must_use]
    pub fn new(font: &str, font_kind: FontKind, font_size: f64, color: Rgb) -> Self {
        let mut context = Self {
            font: font.to_string(),
            font_kind,
            font_scale_factor: 1.0,
            font_size,
            font_size_scale_factor: 1.0,
            color,
            underline: false,
            overline: false,
            strike_through: false,
            oblique_angle: 0.0,
            italic: false,
            bold: false,
            width_factor: 1.0,
            tracking: 1.0,
            word_space: 1.0,
            blank_width: 0.0,
            char_alignment: VerticalAlignment::Bottom,
        };
        context.refresh_blank_width();
        context
    }

    /// Nominal size after relative height changes. This is the size that
    /// counts toward line height.
    #[must_use]
    pub fn effective_size(&self) -> f64 {
        self.font_size * self.font_size_scale_factor
    }

    /// Size requested from the glyph provider.
    #[must_use]
    pub fn glyph_size(&self) -> f64 {
        self.effective_size() * self.font_scale_factor
    }

    /// Oblique angle in degrees with italic simulation applied.
    #[must_use]
    pub fn effective_oblique(&self) -> f64 {
        self.font_kind
            .effective_oblique(self.oblique_angle, self.italic)
    }

    /// Recompute `blank_width` after a font or size change.
    pub fn refresh_blank_width(&mut self) {
        self.blank_width = self.effective_size() * self.font_kind.blank_ratio();
    }
}

/// The active context plus the contexts saved by open groups.
#[derive(Debug, Clone)]
pub struct ContextStack {
    active: FormattingContext,
    saved: Vec<FormattingContext>,
}

impl ContextStack {
    /// Stack with `base` active and no open groups.
    #[must_use]
    pub const fn new(base: FormattingContext) -> Self {
        Self {
            active: base,
            saved: Vec::new(),
        }
    }

    /// The active context.
    #[must_use]
    pub const fn active(&self) -> &FormattingContext {
        &self.active
    }

    /// Mutable access to the active context.
    pub const fn active_mut(&mut self) -> &mut FormattingContext {
        &mut self.active
    }

    /// Number of open groups.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Open a group: save a copy of the active context.
    pub fn push(&mut self) {
        self.saved.push(self.active.clone());
    }

    /// Close a group: restore the most recently saved context.
    ///
    /// Closing with no open group leaves the active context unchanged.
    pub fn pop(&mut self) {
        if let Some(saved) = self.saved.pop() {
            self.active = saved;
        }
    }
}
