//! Horizontal alignment of finished lines.

use crate::output::LineGroup;
use crate::token::HorizontalAlignment;

/// Horizontal frame a line is aligned in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFrame {
    /// Absolute x of the paragraph's left margin.
    pub left_margin: f64,
    /// Extra offset of this line's start (the indent on a paragraph's first
    /// line, otherwise `0`).
    pub indent: f64,
    /// Width between the margins, or `None` when lines do not wrap.
    pub usable_width: Option<f64>,
}

impl LineFrame {
    /// Absolute x where the line's content starts.
    #[must_use]
    pub fn line_start(&self) -> f64 {
        self.left_margin + self.indent
    }
}

/// Shift the runs of `line` according to `alignment`.
///
/// Without a usable width, center and right alignment are taken relative to
/// a zero-width box at the left margin. Distributed alignment spreads the
/// runs so the line fills the usable width exactly; a line with a single
/// run, or a line that does not wrap, is left as it is.
pub fn align_line(line: &mut LineGroup, alignment: HorizontalAlignment, frame: &LineFrame) {
    let Some(content_end) = line.runs.iter().map(|run| run.end_x()).reduce(f64::max) else {
        return;
    };
    let start = frame.line_start();

    let shift = match (alignment, frame.usable_width) {
        (HorizontalAlignment::Left, _) => 0.0,
        (HorizontalAlignment::Center, Some(usable)) => {
            frame.left_margin + usable / 2.0 - (start + content_end) / 2.0
        }
        (HorizontalAlignment::Center, None) => frame.left_margin - (start + content_end) / 2.0,
        (HorizontalAlignment::Right, Some(usable)) => frame.left_margin + usable - content_end,
        (HorizontalAlignment::Right, None) => frame.left_margin - content_end,
        (HorizontalAlignment::Distributed, Some(usable)) => {
            distribute(line, start, usable - frame.indent);
            0.0
        }
        (HorizontalAlignment::Distributed, None) => 0.0,
    };

    if shift != 0.0 {
        for run in &mut line.runs {
            run.translate(shift, 0.0);
        }
    }
    line.update_bounds();
}

/// Place runs left to right from `start` with equal gaps so that runs and
/// gaps together span `width`. Lines whose runs already reach `width` are
/// left as they are.
fn distribute(line: &mut LineGroup, start: f64, width: f64) {
    let count = line.runs.len();
    if count < 2 {
        return;
    }
    let content: f64 = line.runs.iter().map(|run| run.width).sum();
    if content >= width {
        return;
    }
    let gap = (width - content) / (count - 1) as f64;

    let mut pen = start;
    for run in &mut line.runs {
        let dx = pen - run.start_x;
        run.translate(dx, 0.0);
        pen += run.width + gap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::geometry::BoundingBox;
    use crate::output::GlyphRun;
    use crate::token::VerticalAlignment;

    const EPS: f64 = 1e-9;

    fn line(spans: &[(f64, f64)]) -> LineGroup {
        let runs = spans
            .iter()
            .map(|&(start, width)| {
                let mut run = GlyphRun::new(Rgb::WHITE, 1.0, VerticalAlignment::Bottom, start);
                run.width = width;
                run
            })
            .collect();
        LineGroup {
            baseline: 0.0,
            advance: 1.0,
            max_font_size: 1.0,
            starts_paragraph: false,
            runs,
            bounds: BoundingBox::EMPTY,
        }
    }

    fn frame(usable_width: Option<f64>) -> LineFrame {
        LineFrame {
            left_margin: 1.0,
            indent: 0.0,
            usable_width,
        }
    }

    #[test]
    fn test_center_and_right() {
        let mut centered = line(&[(1.0, 2.0), (4.0, 2.0)]);
        align_line(&mut centered, HorizontalAlignment::Center, &frame(Some(10.0)));
        assert!((centered.runs[0].start_x - 3.5).abs() < EPS);

        let mut right = line(&[(1.0, 2.0), (4.0, 2.0)]);
        align_line(&mut right, HorizontalAlignment::Right, &frame(Some(10.0)));
        assert!((right.runs[1].end_x() - 11.0).abs() < EPS);
    }

    #[test]
    fn test_without_wrapping_aligns_about_left_margin() {
        let mut centered = line(&[(1.0, 4.0)]);
        align_line(&mut centered, HorizontalAlignment::Center, &frame(None));
        assert!((centered.runs[0].start_x + 1.0).abs() < EPS);

        let mut right = line(&[(1.0, 4.0)]);
        align_line(&mut right, HorizontalAlignment::Right, &frame(None));
        assert!((right.runs[0].end_x() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_distributed_fills_usable_width() {
        let mut spread = line(&[(1.0, 2.0), (3.5, 1.0), (5.0, 3.0)]);
        align_line(&mut spread, HorizontalAlignment::Distributed, &frame(Some(12.0)));
        let runs = &spread.runs;
        assert!((runs[0].start_x - 1.0).abs() < EPS);
        assert!((runs[2].end_x() - 13.0).abs() < EPS);
        let first_gap = runs[1].start_x - runs[0].end_x();
        let second_gap = runs[2].start_x - runs[1].end_x();
        assert!((first_gap - second_gap).abs() < EPS);
        assert!((first_gap - 3.0).abs() < EPS);
    }

    #[test]
    fn test_distributed_single_run_unchanged() {
        let mut single = line(&[(1.0, 2.0)]);
        align_line(&mut single, HorizontalAlignment::Distributed, &frame(Some(12.0)));
        assert!((single.runs[0].start_x - 1.0).abs() < EPS);
    }

    #[test]
    fn test_distributed_overflowing_line_unchanged() {
        let mut wide = line(&[(1.0, 2.4), (3.4, 2.4)]);
        align_line(&mut wide, HorizontalAlignment::Distributed, &frame(Some(2.0)));
        assert!((wide.runs[0].start_x - 1.0).abs() < EPS);
        assert!((wide.runs[1].start_x - 3.4).abs() < EPS);
    }

    #[test]
    fn test_empty_line_is_untouched() {
        let mut empty = line(&[]);
        align_line(&mut empty, HorizontalAlignment::Right, &frame(Some(5.0)));
        assert!(empty.runs.is_empty());
    }
}
