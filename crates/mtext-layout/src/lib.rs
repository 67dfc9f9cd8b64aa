//! Layout engine for CAD MText.
//!
//! # Scope
//!
//! This crate turns a token stream produced by an external MText tokenizer
//! into positioned glyph geometry:
//!
//! - **Formatting** - `{}` groups, font, color, height, width factor,
//!   tracking, oblique, decorations and character alignment
//! - **Line driver** - word wrapping at word boundaries, blanks, tabs,
//!   paragraph breaks with first-line indent and margins
//! - **Stacks** - fractions with horizontal or diagonal dividers, tolerances
//!   and lone sub/superscripts
//! - **Alignment** - left, center, right and distributed lines
//! - **Placement** - attachment point, flow direction and rotation
//!
//! Glyph outlines and font metadata come from an injected
//! [`GlyphProvider`]; ACI colors from an injected [`ColorIndexResolver`].
//!
//! # Example
//!
//! ```
//! use mtext_layout::{
//!     AciPalette, ApproximateGlyphProvider, LayoutOptions, MTextEntity, MTextToken, Typesetter,
//! };
//!
//! let fonts = ApproximateGlyphProvider::default();
//! let options = LayoutOptions::default();
//! let tokens = vec![
//!     MTextToken::Word("Hello".into()),
//!     MTextToken::Space,
//!     MTextToken::Word("world".into()),
//! ];
//! let result = Typesetter::new(&fonts, &AciPalette, &options)
//!     .layout(&tokens, &MTextEntity::default());
//! assert_eq!(result.lines.len(), 1);
//! assert_eq!(result.glyph_count(), 10);
//! ```

/// Horizontal alignment of finished lines.
pub mod align;
/// RGB values, ACI indices and the standard palette.
pub mod color;
/// Character formatting state and the group stack.
pub mod context;
/// Counters for recovered problems.
pub mod diagnostics;
/// The line and paragraph driver.
pub mod driver;
/// Formatting command interpretation.
pub mod format;
/// Font kinds and the glyph provider interface.
pub mod font;
/// Points, boxes, outlines and affine transforms.
pub mod geometry;
/// Glyph lookup with fallback and synthetic styles.
pub mod glyph;
/// Line cursor and line assembly.
pub mod line;
/// Engine options and entity parameters.
pub mod options;
/// Layout output types.
pub mod output;
/// Paragraph-scoped properties.
pub mod paragraph;
/// Attachment, rotation and insertion.
pub mod placement;
/// Stacked expression layout.
pub mod stack;
/// Token stream model.
pub mod token;

// Re-exports for convenience
pub use color::{AciPalette, ColorIndexResolver, ColorSettings, ColorSpec, Rgb};
pub use context::{ContextStack, FormattingContext};
pub use diagnostics::LayoutDiagnostics;
pub use driver::{DriverState, Typesetter};
pub use font::{ApproximateGlyphProvider, FontInfo, FontKind, GlyphProvider, GlyphShape};
pub use geometry::{BoundingBox, Outline, Point, Transform};
pub use options::{AttachmentPoint, ConfigError, FlowDirection, LayoutOptions, MTextEntity};
pub use output::{
    DecorationKind, DecorationSegment, GeometryGroup, GlyphRun, LayoutResult, LineGroup,
    PositionedGlyph,
};
pub use paragraph::ParagraphState;
pub use token::{
    FormatCommand, HorizontalAlignment, MTextToken, ParagraphChange, Scale, StackDivider,
    StackedExpression, VerticalAlignment, WordText,
};
