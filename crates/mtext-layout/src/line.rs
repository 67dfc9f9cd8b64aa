//! Line cursor and line assembly.
//!
//! Runs are collected at a line-local baseline of `0`. When the line ends
//! its height is known, so [`LineCursor::finish`] computes the vertical
//! advance, moves the baseline, applies character alignment and hands the
//! finished [`LineGroup`] back to the driver.

use crate::geometry::BoundingBox;
use crate::options::FlowDirection;
use crate::output::{GlyphRun, LineGroup};
use crate::token::VerticalAlignment;

/// Horizontal and vertical pen state.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCursor {
    /// Pen position relative to the paragraph's left margin.
    pub h_offset: f64,
    /// Baseline of the most recently finished line.
    pub v_offset: f64,
    /// Number of finished lines.
    pub line_count: usize,
    /// Largest nominal size seen on the current line.
    pub max_font_size_in_line: f64,
    /// Runs of the current line.
    runs: Vec<GlyphRun>,
    /// Whether the current line opens a paragraph.
    starts_paragraph: bool,
}

impl Default for LineCursor {
    fn default() -> Self {
        Self {
            h_offset: 0.0,
            v_offset: 0.0,
            line_count: 0,
            max_font_size_in_line: 0.0,
            runs: Vec::new(),
            starts_paragraph: true,
        }
    }
}

/// Vertical metrics shared by every line of one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Entity line spacing factor.
    pub line_space_factor: f64,
    /// Engine line spacing constant.
    pub line_spacing_constant: f64,
    /// Flow direction of successive lines.
    pub flow_direction: FlowDirection,
}

impl LineMetrics {
    /// Advance of a line whose largest size is `max_size`, laid out while
    /// the active size is `current_size`.
    ///
    /// The first line advances by its height alone; later lines add the
    /// leading.
    #[must_use]
    pub fn advance(&self, line_index: usize, max_size: f64, current_size: f64) -> f64 {
        if line_index == 0 {
            max_size
        } else {
            self.line_space_factor * current_size * self.line_spacing_constant + max_size
        }
    }
}

impl LineCursor {
    /// Whether the current line holds no run.
    #[must_use]
    pub fn is_line_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Whether the current line opens a paragraph.
    #[must_use]
    pub const fn starts_paragraph(&self) -> bool {
        self.starts_paragraph
    }

    /// Record a nominal size on the current line.
    pub fn record_size(&mut self, size: f64) {
        if size > self.max_font_size_in_line {
            self.max_font_size_in_line = size;
        }
    }

    /// Append a run to the current line.
    pub fn push_run(&mut self, run: GlyphRun) {
        self.runs.push(run);
    }

    /// End the current line and start the next one.
    ///
    /// `current_size` is the active effective size; it is used for the
    /// leading, and as the line height of a line that recorded no size.
    /// `next_starts_paragraph` marks the following line as a paragraph
    /// opener.
    pub fn finish(
        &mut self,
        metrics: &LineMetrics,
        current_size: f64,
        next_starts_paragraph: bool,
    ) -> LineGroup {
        let max_size = if self.max_font_size_in_line > 0.0 {
            self.max_font_size_in_line
        } else {
            current_size
        };
        let advance = metrics.advance(self.line_count, max_size, current_size);

        self.v_offset = if self.line_count == 0 {
            match metrics.flow_direction {
                FlowDirection::BottomToTop => 0.0,
                FlowDirection::LeftToRight | FlowDirection::TopToBottom | FlowDirection::ByStyle => {
                    -max_size
                }
            }
        } else {
            self.v_offset + metrics.flow_direction.line_advance_sign() * advance
        };

        let mut runs = std::mem::take(&mut self.runs);
        for run in &mut runs {
            let shift = match run.char_alignment {
                VerticalAlignment::Bottom => 0.0,
                VerticalAlignment::Center => (max_size - run.size) / 2.0,
                VerticalAlignment::Top => max_size - run.size,
            };
            run.translate(0.0, self.v_offset + shift);
        }

        let mut line = LineGroup {
            baseline: self.v_offset,
            advance,
            max_font_size: max_size,
            starts_paragraph: self.starts_paragraph,
            runs,
            bounds: BoundingBox::EMPTY,
        };
        line.update_bounds();

        self.line_count += 1;
        self.h_offset = 0.0;
        self.max_font_size_in_line = 0.0;
        self.starts_paragraph = next_starts_paragraph;
        line
    }
}
