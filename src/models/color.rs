//! Job colors.
//!
//! Colors are stored as exactly six lowercase hex digits without a leading `#`.
//! Parsing accepts an optional `#` prefix because that is what color pickers
//! and users tend to type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default swatches offered by the color picker, in display order.
pub const DEFAULT_PALETTE: &[&str] = &[
    "ff6900", "fcb900", "7bdcb5", "00d084", "8ed1fc", "0693e3", "abb8c3", "eb144c",
    "f78da7", "9900ef",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color '{0}' must have exactly 6 hex digits")]
    Length(String),

    #[error("color '{0}' contains a non-hex character")]
    NotHex(String),
}

/// A validated 6-digit hex color
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a color, accepting an optional leading `#`.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.chars().count() != 6 {
            return Err(ColorParseError::Length(input.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::NotHex(input.to_string()));
        }
        Ok(Self(digits.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components
    #[must_use]
    pub fn rgb(&self) -> (u8, u8, u8) {
        // Validated on construction, so every pair is a hex byte.
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

/// Parse the built-in palette
#[must_use]
pub fn default_palette() -> Vec<HexColor> {
    DEFAULT_PALETTE
        .iter()
        .filter_map(|hex| HexColor::parse(hex).ok())
        .collect()
}
