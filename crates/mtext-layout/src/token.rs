//! Token stream consumed by the layout engine.
//!
//! The MText markup tokenizer lives outside this crate. It turns a raw
//! string such as `{\C1;Hello}\P\S1/2;` into the tokens below, which the
//! [`Typesetter`](crate::Typesetter) interprets in a single forward pass.
//!
//! Tokens derive serde so a stream can be stored as JSON, e.g.
//!
//! ```json
//! [
//!   { "type": "format", "value": { "command": "group_open" } },
//!   { "type": "format", "value": { "command": "color", "value": { "index": 1 } } },
//!   { "type": "word", "value": "Hello" },
//!   { "type": "format", "value": { "command": "group_close" } },
//!   { "type": "paragraph_break" }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::color::ColorSpec;

/// One token of an MText stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MTextToken {
    /// A run of characters laid out without internal wrap opportunities.
    Word(WordText),
    /// A breakable blank.
    Space,
    /// A blank that never starts a new line (`\~`).
    NonBreakingSpace,
    /// Advance to the next tab stop (`^I`).
    Tab,
    /// End the paragraph (`\P`).
    ParagraphBreak,
    /// A stacked fraction, tolerance or sub/superscript (`\S`).
    Stack(StackedExpression),
    /// An inline formatting command.
    Format(FormatCommand),
}

/// Text of a word token: a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordText {
    /// Plain text.
    Text(String),
    /// Text split into pieces by the tokenizer (e.g. around escapes).
    Parts(Vec<String>),
}

impl WordText {
    /// Iterate over every character of the word in order.
    pub fn chars(&self) -> Box<dyn Iterator<Item = char> + '_> {
        match self {
            Self::Text(text) => Box::new(text.chars()),
            Self::Parts(parts) => Box::new(parts.iter().flat_map(|part| part.chars())),
        }
    }

    /// Whether the word has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars().next().is_none()
    }
}

impl From<&str> for WordText {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for WordText {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// How the two halves of a stack are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum StackDivider {
    /// `/`: numerator over denominator with a horizontal rule.
    #[serde(rename = "/")]
    #[strum(serialize = "/")]
    Line,
    /// `#`: numerator and denominator separated by a diagonal slash.
    #[serde(rename = "#")]
    #[strum(serialize = "#")]
    Slash,
    /// `^`: tolerance stack without a rule, or a lone sub/superscript.
    #[serde(rename = "^")]
    #[strum(serialize = "^")]
    Tolerance,
}

impl StackDivider {
    /// Map the markup divider character.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '/' => Some(Self::Line),
            '#' => Some(Self::Slash),
            '^' => Some(Self::Tolerance),
            _ => None,
        }
    }
}

/// A stacked expression (`\Snum/den;`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackedExpression {
    /// Upper text.
    pub numerator: String,
    /// Lower text.
    pub denominator: String,
    /// Divider kind.
    pub divider: StackDivider,
}

impl StackedExpression {
    /// Create a stacked expression.
    #[must_use]
    pub fn new(numerator: &str, denominator: &str, divider: StackDivider) -> Self {
        Self {
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
            divider,
        }
    }
}

/// An absolute value or a factor relative to the current value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// Replace the current value (`\H2.5;`).
    Absolute(f64),
    /// Multiply the current value (`\H0.5x;`).
    Relative(f64),
}

/// Paragraph alignment (`\pq?`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HorizontalAlignment {
    /// Flush left.
    #[default]
    Left,
    /// Centred between the margins.
    Center,
    /// Flush right.
    Right,
    /// Runs spread so the line fills the usable width.
    Distributed,
}

/// Character alignment within a line (`\A0;` .. `\A2;`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerticalAlignment {
    /// Baselines shared with the tallest run.
    #[default]
    Bottom,
    /// Centred on the tallest run.
    Center,
    /// Tops aligned with the tallest run.
    Top,
}

/// A paragraph-scoped property change (`\p...;`). Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphChange {
    /// First-line indent.
    pub indent: Option<f64>,
    /// Left margin.
    pub left: Option<f64>,
    /// Right margin.
    pub right: Option<f64>,
    /// Horizontal alignment.
    pub alignment: Option<HorizontalAlignment>,
    /// Tab stop positions, relative to the left margin.
    pub tabs: Option<Vec<f64>>,
}

/// An inline formatting command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormatCommand {
    /// `{`: push a copy of the active formatting context.
    GroupOpen,
    /// `}`: restore the context saved by the matching `{`.
    GroupClose,
    /// `\F` / `\f`: change font, optionally with a face style.
    Font {
        /// Requested font name.
        name: String,
        /// Bold face requested.
        #[serde(default)]
        bold: bool,
        /// Italic face requested.
        #[serde(default)]
        italic: bool,
    },
    /// `\C` / `\c`: change color.
    Color(ColorSpec),
    /// `\W`: width factor.
    WidthFactor(Scale),
    /// `\H`: capital height.
    Height(Scale),
    /// `\T`: tracking.
    Tracking(Scale),
    /// `\Q`: oblique angle in degrees.
    Oblique(f64),
    /// `\L` / `\l`.
    Underline(bool),
    /// `\O` / `\o`.
    Overline(bool),
    /// `\K` / `\k`.
    StrikeThrough(bool),
    /// `\A`: vertical alignment of characters within the line.
    CharAlignment(VerticalAlignment),
    /// `\p`: paragraph properties.
    Paragraph(ParagraphChange),
    /// Any command this engine does not implement; ignored.
    Unknown(String),
}
