//! Glyph and font metadata interface consumed during layout.
//!
//! Font files, their parsing and caching live outside this crate. The layout
//! engine only issues read queries through [`GlyphProvider`], so a single
//! provider may be shared by layout passes running on several threads as long
//! as the implementation is `Sync`.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::geometry::{Outline, Point};

/// Skew applied to simulate italics, in degrees.
pub const ITALIC_SKEW_DEGREES: f64 = 15.0;

/// How a font's glyphs are drawn.
///
/// The two kinds differ in a handful of fixed ratios and in how italic and
/// bold are simulated; [`FontKind`] carries those per-kind rules so call
/// sites select them with a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FontKind {
    /// Open polylines (SHX-style shape fonts). Rendered as line segments.
    Stroke,
    /// Closed fillable contours (TrueType/OpenType). Rendered as meshes.
    Filled,
}

impl FontKind {
    /// Width of a blank as a fraction of the font size.
    #[must_use]
    pub const fn blank_ratio(self) -> f64 {
        match self {
            Self::Stroke => 0.5,
            Self::Filled => 0.3,
        }
    }

    /// Effective oblique angle in degrees once the italic flag is applied.
    ///
    /// Filled fonts add the italic skew on top of an explicit oblique angle.
    /// Stroke fonts replace the oblique angle with the italic skew.
    #[must_use]
    pub fn effective_oblique(self, oblique: f64, italic: bool) -> f64 {
        match (self, italic) {
            (_, false) => oblique,
            (Self::Filled, true) => oblique + ITALIC_SKEW_DEGREES,
            (Self::Stroke, true) => ITALIC_SKEW_DEGREES,
        }
    }
}

/// Metadata about a loaded font.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontInfo {
    /// Stroke or filled.
    pub kind: FontKind,
    /// Multiplier applied to the requested size before querying glyphs.
    pub scale_factor: f64,
}

/// A glyph as answered by the provider, positioned at the origin.
///
/// The outline is expressed at the requested size with the baseline on
/// `y = 0` and the pen position at `x = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphShape {
    /// Horizontal pen advance.
    pub advance: f64,
    /// Outline, `None` for glyphs without ink (e.g. a space).
    pub outline: Option<Outline>,
}

/// Source of glyph outlines and font metadata.
///
/// All methods answer "not found" with `None`; provider failures (I/O,
/// parse errors, network) must never unwind a layout pass.
pub trait GlyphProvider {
    /// Look up `ch` in `font` at `size` drawing units.
    fn glyph(&self, ch: char, font: &str, size: f64) -> Option<GlyphShape>;

    /// Metadata for `font`, or `None` when the font is not available.
    fn font_info(&self, font: &str) -> Option<FontInfo>;

    /// Name mapping for a missing font (e.g. `"txt"` to `"simplex"`).
    fn fallback_font(&self, font: &str) -> Option<String>;

    /// Search every loaded font for `ch`, returning the font that has it.
    fn find_glyph(&self, ch: char, size: f64) -> Option<(String, GlyphShape)>;
}

/// Glyph provider using fixed ratios and box outlines.
///
/// Every known font answers every non-control character with a rectangle
/// `0.6 × size` wide (the advance) and `size` tall, so layouts can be
/// verified with simple arithmetic. Characters listed in `missing` are
/// reported as not found in every font, those in `gaps` only in their font.
///
/// This is used as a fallback when no font is available, and in tests.
#[derive(Debug, Clone)]
pub struct ApproximateGlyphProvider {
    fonts: Vec<(String, FontInfo)>,
    missing: Vec<char>,
    gaps: Vec<(String, char)>,
    aliases: Vec<(String, String)>,
}

impl Default for ApproximateGlyphProvider {
    fn default() -> Self {
        Self::new()
            .with_font("simplex", FontKind::Stroke)
            .with_font("arial", FontKind::Filled)
    }
}

impl ApproximateGlyphProvider {
    /// Advance width as a fraction of the size.
    pub const CHAR_WIDTH_RATIO: f64 = 0.6;

    /// A provider with no fonts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fonts: Vec::new(),
            missing: Vec::new(),
            gaps: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// Register a font of the given kind with scale factor 1.
    #[must_use]
    pub fn with_font(self, name: &str, kind: FontKind) -> Self {
        self.with_scaled_font(name, kind, 1.0)
    }

    /// Register a font with an explicit scale factor.
    #[must_use]
    pub fn with_scaled_font(mut self, name: &str, kind: FontKind, scale_factor: f64) -> Self {
        self.fonts.push((
            name.to_ascii_lowercase(),
            FontInfo { kind, scale_factor },
        ));
        self
    }

    /// Report `ch` as missing from every font.
    #[must_use]
    pub fn without_char(mut self, ch: char) -> Self {
        self.missing.push(ch);
        self
    }

    /// Report `ch` as missing from `font` only.
    #[must_use]
    pub fn without_char_in(mut self, font: &str, ch: char) -> Self {
        self.gaps.push((font.to_ascii_lowercase(), ch));
        self
    }

    /// Map a missing font name to a loaded one.
    #[must_use]
    pub fn with_alias(mut self, missing: &str, target: &str) -> Self {
        self.aliases
            .push((missing.to_ascii_lowercase(), target.to_ascii_lowercase()));
        self
    }

    fn box_glyph(ch: char, size: f64) -> GlyphShape {
        let advance = size * Self::CHAR_WIDTH_RATIO;
        let outline = (!ch.is_whitespace()).then(|| {
            Outline::new(vec![vec![
                Point::new(0.0, 0.0),
                Point::new(advance, 0.0),
                Point::new(advance, size),
                Point::new(0.0, size),
                Point::new(0.0, 0.0),
            ]])
        });
        GlyphShape { advance, outline }
    }
}

impl GlyphProvider for ApproximateGlyphProvider {
    fn glyph(&self, ch: char, font: &str, size: f64) -> Option<GlyphShape> {
        if ch.is_control() || self.missing.contains(&ch) || self.font_info(font).is_none() {
            return None;
        }
        let font = font.to_ascii_lowercase();
        if self.gaps.iter().any(|(name, gap)| *name == font && *gap == ch) {
            return None;
        }
        Some(Self::box_glyph(ch, size))
    }

    fn font_info(&self, font: &str) -> Option<FontInfo> {
        let font = font.to_ascii_lowercase();
        self.fonts
            .iter()
            .find(|(name, _)| *name == font)
            .map(|(_, info)| *info)
    }

    fn fallback_font(&self, font: &str) -> Option<String> {
        let font = font.to_ascii_lowercase();
        self.aliases
            .iter()
            .find(|(missing, _)| *missing == font)
            .map(|(_, target)| target.clone())
    }

    fn find_glyph(&self, ch: char, size: f64) -> Option<(String, GlyphShape)> {
        self.fonts.iter().find_map(|(name, _)| {
            self.glyph(ch, name, size).map(|glyph| (name.clone(), glyph))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_ratio_per_kind() {
        assert!((FontKind::Stroke.blank_ratio() - 0.5).abs() < f64::EPSILON);
        assert!((FontKind::Filled.blank_ratio() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_italic_simulation_per_kind() {
        assert!((FontKind::Filled.effective_oblique(10.0, true) - 25.0).abs() < 1e-9);
        assert!((FontKind::Stroke.effective_oblique(10.0, true) - 15.0).abs() < 1e-9);
        assert!((FontKind::Stroke.effective_oblique(10.0, false) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_approximate_provider_answers_known_fonts_only() {
        let provider = ApproximateGlyphProvider::default();
        let glyph = provider.glyph('A', "Simplex", 2.0).unwrap();
        assert!((glyph.advance - 1.2).abs() < 1e-9);
        assert!(glyph.outline.is_some());
        assert!(provider.glyph('A', "missing", 2.0).is_none());
        assert!(provider.glyph(' ', "arial", 2.0).unwrap().outline.is_none());
    }

    #[test]
    fn test_missing_char_is_not_found_anywhere() {
        let provider = ApproximateGlyphProvider::default().without_char('€');
        assert!(provider.glyph('€', "arial", 1.0).is_none());
        assert!(provider.find_glyph('€', 1.0).is_none());
        assert_eq!(provider.find_glyph('x', 1.0).unwrap().0, "simplex");
    }

    #[test]
    fn test_find_glyph_searches_every_font() {
        let provider = ApproximateGlyphProvider::default().without_char_in("Simplex", 'λ');
        assert!(provider.glyph('λ', "simplex", 1.0).is_none());
        assert_eq!(provider.find_glyph('λ', 1.0).unwrap().0, "arial");

        let provider = provider.without_char_in("arial", 'λ');
        assert!(provider.find_glyph('λ', 1.0).is_none());
    }

    #[test]
    fn test_font_kind_display() {
        assert_eq!(FontKind::Stroke.to_string(), "stroke");
    }
}
