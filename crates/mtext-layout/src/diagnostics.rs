//! Counters for recoverable problems met during a layout pass.
//!
//! Nothing here is an error: every problem counted has already been worked
//! around (placeholder glyph, default font, synthesized style).

use std::collections::BTreeMap;

use serde::Serialize;

/// Recovered problems, keyed for deterministic reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutDiagnostics {
    /// Characters no font could provide, per requesting font.
    pub unsupported_chars: BTreeMap<String, BTreeMap<char, usize>>,
    /// Requested fonts that were unavailable, with the number of requests.
    pub missing_fonts: BTreeMap<String, usize>,
    /// Bold or italic requests a stroke font can only approximate.
    pub unsupported_font_styles: usize,
}

impl LayoutDiagnostics {
    /// Record a character replaced by the placeholder glyph.
    pub fn record_unsupported_char(&mut self, font: &str, ch: char) {
        *self
            .unsupported_chars
            .entry(font.to_string())
            .or_default()
            .entry(ch)
            .or_insert(0) += 1;
    }

    /// Record a font request that fell back to another font.
    pub fn record_missing_font(&mut self, font: &str) {
        *self.missing_fonts.entry(font.to_string()).or_insert(0) += 1;
    }

    /// Record a face style that had to be simulated on a stroke font.
    pub const fn record_unsupported_style(&mut self) {
        self.unsupported_font_styles += 1;
    }

    /// Total number of placeholder substitutions.
    #[must_use]
    pub fn unsupported_char_count(&self) -> usize {
        self.unsupported_chars
            .values()
            .flat_map(BTreeMap::values)
            .sum()
    }

    /// Whether the pass met no problem at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unsupported_chars.is_empty()
            && self.missing_fonts.is_empty()
            && self.unsupported_font_styles == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut diagnostics = LayoutDiagnostics::default();
        assert!(diagnostics.is_clean());
        diagnostics.record_unsupported_char("arial", '€');
        diagnostics.record_unsupported_char("arial", '€');
        diagnostics.record_unsupported_char("simplex", '✓');
        diagnostics.record_missing_font("romans");
        assert_eq!(diagnostics.unsupported_char_count(), 3);
        assert_eq!(diagnostics.unsupported_chars["arial"][&'€'], 2);
        assert_eq!(diagnostics.missing_fonts["romans"], 1);
        assert!(!diagnostics.is_clean());
    }
}
