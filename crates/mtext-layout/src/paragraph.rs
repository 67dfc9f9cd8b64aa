//! Paragraph-scoped properties.
//!
//! Unlike character formatting these survive the closing of a `{}` group.
//! They are reset to the engine defaults at every paragraph break.

use serde::Serialize;

use crate::token::{HorizontalAlignment, ParagraphChange};

/// Alignment, indent, margins and tab stops of the current paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphState {
    /// Horizontal alignment.
    pub alignment: HorizontalAlignment,
    /// Extra offset of the first line, relative to the left margin.
    pub indent: f64,
    /// Left margin.
    pub left_margin: f64,
    /// Right margin.
    pub right_margin: f64,
    /// Tab stops relative to the left margin, ascending.
    pub tabs: Vec<f64>,
}

impl ParagraphState {
    /// Defaults for a paragraph with the given alignment.
    #[must_use]
    pub const fn new(alignment: HorizontalAlignment) -> Self {
        Self {
            alignment,
            indent: 0.0,
            left_margin: 0.0,
            right_margin: 0.0,
            tabs: Vec::new(),
        }
    }

    /// Apply the fields present in `change`.
    pub fn apply(&mut self, change: &ParagraphChange) {
        if let Some(indent) = change.indent {
            self.indent = indent;
        }
        if let Some(left) = change.left {
            self.left_margin = left;
        }
        if let Some(right) = change.right {
            self.right_margin = right;
        }
        if let Some(alignment) = change.alignment {
            self.alignment = alignment;
        }
        if let Some(tabs) = &change.tabs {
            self.tabs.clone_from(tabs);
            self.tabs.sort_by(f64::total_cmp);
        }
    }

    /// Width available between the margins of a `width`-wide box.
    ///
    /// Returns `None` when lines do not wrap (`width <= 0`).
    #[must_use]
    pub fn usable_width(&self, width: f64) -> Option<f64> {
        (width > 0.0).then(|| (width - self.left_margin - self.right_margin).max(0.0))
    }

    /// Next tab stop strictly after `h_offset`, or `None` past the last one.
    #[must_use]
    pub fn next_tab_stop(&self, h_offset: f64) -> Option<f64> {
        self.tabs.iter().copied().find(|stop| *stop > h_offset)
    }
}
