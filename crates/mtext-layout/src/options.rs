//! Engine configuration and entity-level parameters.
//!
//! [`LayoutOptions`] holds engine-wide policy (fallback fonts, spacing
//! constants, compatibility switches) and is usually loaded once from JSON.
//! [`MTextEntity`] holds the per-entity parameters stored with the drawing
//! object: insertion point, text height, reference width, attachment point
//! and orientation.

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;

use crate::color::{ACI_BY_LAYER, ColorSpec};
use crate::geometry::Point;
use crate::token::HorizontalAlignment;

/// Errors raised while loading or validating configuration.
///
/// The layout pass itself never fails; only configuration does.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid layout configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Engine-wide layout policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Font substituted when a requested font is unavailable and has no
    /// mapping.
    pub default_font: String,
    /// Font searched second when the active font lacks a glyph.
    pub big_font: Option<String>,
    /// Character drawn in place of glyphs no font provides.
    pub not_found_char: char,
    /// Leading constant: line height is
    /// `line_space_factor × size × line_spacing_constant + max size`.
    pub line_spacing_constant: f64,
    /// Synthetic bold expansion as a fraction of the font size.
    pub bold_expansion: f64,
    /// Interpret relative width factors (`\W0.8x;`) as a fraction of the
    /// reference width instead of the current factor.
    pub legacy_relative_width_factor: bool,
    /// Size of lone superscripts and subscripts relative to the text.
    pub script_scale: f64,
    /// Baseline shift of a lone superscript, in units of the text size.
    pub superscript_offset: f64,
    /// Baseline shift of a lone subscript, in units of the text size.
    pub subscript_offset: f64,
    /// Distance between default tab stops, in blank widths.
    pub default_tab_size: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            default_font: "simplex".to_string(),
            big_font: None,
            not_found_char: '?',
            line_spacing_constant: 2.0 / 3.0,
            bold_expansion: 0.06,
            legacy_relative_width_factor: true,
            script_scale: 0.7,
            superscript_offset: 0.1,
            subscript_offset: -0.3,
            default_tab_size: 4.0,
        }
    }
}

impl LayoutOptions {
    /// Parse and validate options from JSON. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_font.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "default_font",
                reason: "must not be empty".to_string(),
            });
        }
        check_range(
            "line_spacing_constant",
            self.line_spacing_constant,
            self.line_spacing_constant >= 0.0,
            ">= 0",
        )?;
        check_range(
            "script_scale",
            self.script_scale,
            self.script_scale > 0.0 && self.script_scale <= 1.0,
            "in (0, 1]",
        )?;
        check_range(
            "bold_expansion",
            self.bold_expansion,
            self.bold_expansion >= 0.0,
            ">= 0",
        )?;
        check_range(
            "default_tab_size",
            self.default_tab_size,
            self.default_tab_size > 0.0,
            "> 0",
        )?;
        Ok(())
    }
}

/// NaN compares false, so `in_range` is false for it.
fn check_range(
    field: &'static str,
    value: f64,
    in_range: bool,
    expected: &str,
) -> Result<(), ConfigError> {
    if in_range {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be {expected}, got {value}"),
        })
    }
}

/// Horizontal component of an attachment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HorizontalAnchor {
    /// Left edge.
    Left,
    /// Horizontal centre.
    Center,
    /// Right edge.
    Right,
}

/// Vertical component of an attachment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum VerticalAnchor {
    /// Top edge.
    Top,
    /// Vertical middle.
    Middle,
    /// Bottom edge.
    Bottom,
}

/// Which point of the text block sits on the insertion point (DXF group 71).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(try_from = "u8", into = "u8")]
pub enum AttachmentPoint {
    /// 1
    #[default]
    TopLeft,
    /// 2
    TopCenter,
    /// 3
    TopRight,
    /// 4
    MiddleLeft,
    /// 5
    MiddleCenter,
    /// 6
    MiddleRight,
    /// 7
    BottomLeft,
    /// 8
    BottomCenter,
    /// 9
    BottomRight,
}

impl AttachmentPoint {
    /// Horizontal component.
    #[must_use]
    pub const fn horizontal(self) -> HorizontalAnchor {
        match self {
            Self::TopLeft | Self::MiddleLeft | Self::BottomLeft => HorizontalAnchor::Left,
            Self::TopCenter | Self::MiddleCenter | Self::BottomCenter => HorizontalAnchor::Center,
            Self::TopRight | Self::MiddleRight | Self::BottomRight => HorizontalAnchor::Right,
        }
    }

    /// Vertical component.
    #[must_use]
    pub const fn vertical(self) -> VerticalAnchor {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => VerticalAnchor::Top,
            Self::MiddleLeft | Self::MiddleCenter | Self::MiddleRight => VerticalAnchor::Middle,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => VerticalAnchor::Bottom,
        }
    }

    /// Paragraph alignment used until a paragraph command overrides it.
    #[must_use]
    pub const fn default_alignment(self) -> HorizontalAlignment {
        match self.horizontal() {
            HorizontalAnchor::Left => HorizontalAlignment::Left,
            HorizontalAnchor::Center => HorizontalAlignment::Center,
            HorizontalAnchor::Right => HorizontalAlignment::Right,
        }
    }
}

impl TryFrom<u8> for AttachmentPoint {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::TopLeft,
            2 => Self::TopCenter,
            3 => Self::TopRight,
            4 => Self::MiddleLeft,
            5 => Self::MiddleCenter,
            6 => Self::MiddleRight,
            7 => Self::BottomLeft,
            8 => Self::BottomCenter,
            9 => Self::BottomRight,
            other => {
                return Err(ConfigError::Invalid {
                    field: "attachment",
                    reason: format!("expected 1..=9, got {other}"),
                });
            }
        })
    }
}

impl From<AttachmentPoint> for u8 {
    fn from(point: AttachmentPoint) -> Self {
        match point {
            AttachmentPoint::TopLeft => 1,
            AttachmentPoint::TopCenter => 2,
            AttachmentPoint::TopRight => 3,
            AttachmentPoint::MiddleLeft => 4,
            AttachmentPoint::MiddleCenter => 5,
            AttachmentPoint::MiddleRight => 6,
            AttachmentPoint::BottomLeft => 7,
            AttachmentPoint::BottomCenter => 8,
            AttachmentPoint::BottomRight => 9,
        }
    }
}

/// Direction in which successive lines are stacked (DXF group 72).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowDirection {
    /// Horizontal text, lines advancing downwards.
    #[default]
    LeftToRight,
    /// Lines advancing downwards.
    TopToBottom,
    /// Lines advancing upwards.
    BottomToTop,
    /// Inherit from the text style (treated as left-to-right).
    ByStyle,
}

impl FlowDirection {
    /// Sign of the vertical advance between lines.
    #[must_use]
    pub const fn line_advance_sign(self) -> f64 {
        match self {
            Self::BottomToTop => 1.0,
            Self::LeftToRight | Self::TopToBottom | Self::ByStyle => -1.0,
        }
    }
}

/// Entity-level parameters of one MText object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MTextEntity {
    /// Insertion point in drawing coordinates.
    pub insertion: Point,
    /// Nominal text height.
    pub height: f64,
    /// Reference rectangle width; `0` disables wrapping.
    pub width: f64,
    /// Attachment point.
    pub attachment: AttachmentPoint,
    /// Line flow direction.
    pub flow_direction: FlowDirection,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f64,
    /// Explicit direction vector; overrides `rotation` when present.
    pub direction: Option<Point>,
    /// Line spacing factor (DXF group 44).
    pub line_space_factor: f64,
    /// Text style font.
    pub font: String,
    /// Text style width factor.
    pub width_factor: f64,
    /// Text style oblique angle in degrees.
    pub oblique: f64,
    /// Entity color.
    pub color: ColorSpec,
}

impl Default for MTextEntity {
    fn default() -> Self {
        Self {
            insertion: Point::ORIGIN,
            height: 1.0,
            width: 0.0,
            attachment: AttachmentPoint::TopLeft,
            flow_direction: FlowDirection::LeftToRight,
            rotation: 0.0,
            direction: None,
            line_space_factor: 1.0,
            font: String::new(),
            width_factor: 1.0,
            oblique: 0.0,
            color: ColorSpec::Index(ACI_BY_LAYER),
        }
    }
}

impl MTextEntity {
    /// Rotation angle in radians, derived from the direction vector when one
    /// is set and non-degenerate.
    #[must_use]
    pub fn angle(&self) -> f64 {
        match self.direction {
            Some(direction) if direction.x != 0.0 || direction.y != 0.0 => {
                direction.y.atan2(direction.x)
            }
            _ => self.rotation,
        }
    }

    /// Whether lines wrap at the reference width.
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.width > 0.0
    }
}
