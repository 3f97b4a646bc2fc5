//! Ride label colors.

use std::fmt;

/// Error returned when a color string is not 6 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {input:?}: {reason}")]
pub struct ColorFormatError {
    input: String,
    reason: &'static str,
}

impl ColorFormatError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// An ARGB color, 8 bits per channel.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Create an opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Packed `0xAARRGGBB` value.
    pub const fn argb(&self) -> u32 {
        self.0
    }

    pub const fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(&self) -> u8 {
        self.0 as u8
    }

    pub const fn is_opaque(&self) -> bool {
        self.alpha() == 0xFF
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08X})", self.0)
    }
}

impl fmt::Display for Color {
    /// Formats as `#RRGGBB`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0x00FF_FFFF)
    }
}

/// Decode a `RRGGBB` or `#RRGGBB` string into an opaque color.
///
/// Both cases of hex digit are accepted. Anything else is rejected rather
/// than defaulted.
///
/// ```
/// use departure_board::domain::{Color, decode_color};
///
/// assert_eq!(decode_color("#FFD700").unwrap(), Color::rgb(0xFF, 0xD7, 0x00));
/// assert_eq!(decode_color("c91412").unwrap().argb(), 0xFFC91412);
/// assert!(decode_color("#FFF").is_err());
/// assert!(decode_color("#GGGGGG").is_err());
/// ```
pub fn decode_color(hex: &str) -> Result<Color, ColorFormatError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if digits.len() != 6 {
        return Err(ColorFormatError::new(hex, "expected 6 hex digits"));
    }

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorFormatError::new(hex, "non-hex character"));
    }

    let rgb = u32::from_str_radix(digits, 16)
        .map_err(|_| ColorFormatError::new(hex, "non-hex character"))?;

    Ok(Color(0xFF00_0000 | rgb))
}
