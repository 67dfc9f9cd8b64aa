//! Color values and AutoCAD Color Index (ACI) resolution.
//!
//! MText colors are either a true color (`\c` with a packed 24-bit RGB
//! value) or an index into the 256-entry ACI palette (`\C`). Two indices
//! are reserved: 0 means "by block" and 256 means "by layer", both deferring
//! to colors supplied by the caller.

use serde::{Deserialize, Serialize};

/// ACI index meaning "use the color of the enclosing block reference".
pub const ACI_BY_BLOCK: u16 = 0;

/// ACI index meaning "use the color of the entity's layer".
pub const ACI_BY_LAYER: u16 = 256;

/// An sRGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
}

impl Rgb {
    /// White (#ffffff)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` integer. Bits above the low 24 are ignored.
    #[must_use]
    pub const fn from_packed(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Pack into a `0xRRGGBB` integer.
    #[must_use]
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse `#rrggbb` or `rrggbb`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_packed)
    }
}

/// A color request carried by a color command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpec {
    /// An ACI index (0 = by block, 256 = by layer).
    Index(u16),
    /// A packed `0xRRGGBB` true color.
    Rgb(u32),
}

/// Resolves non-reserved ACI indices (1..=255) to RGB.
pub trait ColorIndexResolver {
    /// Look up `index`. Returns `None` for indices the palette does not know.
    fn resolve_index(&self, index: u8) -> Option<Rgb>;
}

/// Caller-supplied colors for the reserved indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSettings {
    /// Color substituted for index 256.
    pub by_layer: Rgb,
    /// Color substituted for index 0.
    pub by_block: Rgb,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            by_layer: Rgb::WHITE,
            by_block: Rgb::WHITE,
        }
    }
}

impl ColorSettings {
    /// Resolve a color request to RGB.
    ///
    /// Unknown or out-of-range indices fall back to the by-layer color.
    #[must_use]
    pub fn resolve(&self, spec: ColorSpec, palette: &dyn ColorIndexResolver) -> Rgb {
        match spec {
            ColorSpec::Rgb(packed) => Rgb::from_packed(packed),
            ColorSpec::Index(ACI_BY_BLOCK) => self.by_block,
            ColorSpec::Index(ACI_BY_LAYER) => self.by_layer,
            ColorSpec::Index(index) => u8::try_from(index)
                .ok()
                .and_then(|index| palette.resolve_index(index))
                .unwrap_or(self.by_layer),
        }
    }
}

/// The standard AutoCAD 256-color palette.
///
/// Indices 1-9 are fixed colors. Indices 10-249 form 24 hues spaced 15°
/// apart; within each hue the last digit selects one of five brightness
/// levels (even digits fully saturated, odd digits half saturated).
/// Indices 250-255 are a gray ramp.
#[derive(Debug, Clone, Copy, Default)]
pub struct AciPalette;

/// Colors for indices 1-9.
const ACI_FIXED: [Rgb; 9] = [
    Rgb::new(255, 0, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 255, 255),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 0, 255),
    Rgb::new(255, 255, 255),
    Rgb::new(65, 65, 65),
    Rgb::new(128, 128, 128),
];

/// Gray ramp for indices 250-255.
const ACI_GRAYS: [u8; 6] = [51, 80, 105, 130, 190, 255];

/// Value channel for each brightness level of the hue block.
const ACI_LEVELS: [f64; 5] = [255.0, 165.0, 127.0, 76.0, 38.0];

impl ColorIndexResolver for AciPalette {
    fn resolve_index(&self, index: u8) -> Option<Rgb> {
        match index {
            0 => None,
            1..=9 => Some(ACI_FIXED[usize::from(index - 1)]),
            10..=249 => {
                let hue = f64::from(index / 10 - 1) * 15.0;
                let digit = index % 10;
                let value = ACI_LEVELS[usize::from(digit / 2)];
                let saturation = if digit % 2 == 0 { 1.0 } else { 0.5 };
                Some(hsv_to_rgb(hue, saturation, value))
            }
            250..=255 => {
                let gray = ACI_GRAYS[usize::from(index - 250)];
                Some(Rgb::new(gray, gray, gray))
            }
        }
    }
}

/// HSV to RGB with `value` already in channel units (0-255).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let sector = hue / 60.0;
    let fraction = sector - sector.floor();
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * fraction);
    let t = value * (1.0 - saturation * (1.0 - fraction));
    let (r, g, b) = match sector.floor() as u8 % 6 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    Rgb::new(r as u8, g as u8, b as u8)
}
