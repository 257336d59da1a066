use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// An RGBA8 color as written into the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn bytes(self) -> [u8; 4] {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("color '{0}' must start with '#'")]
    MissingHash(String),
    #[error("color '{0}' must have 6 or 8 hex digits")]
    InvalidLength(String),
    #[error("color '{0}' contains a non-hex digit")]
    InvalidDigit(String),
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Some(digits) = raw.strip_prefix('#') else {
            return Err(ParseColorError::MissingHash(raw.to_string()));
        };
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ParseColorError::InvalidLength(raw.to_string()));
        }
        if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigit(raw.to_string()));
        }

        let channel = |index: usize| -> Result<u8, ParseColorError> {
            u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16)
                .map_err(|_| ParseColorError::InvalidDigit(raw.to_string()))
        };
        let alpha = if digits.len() == 8 { channel(3)? } else { 255 };
        Ok(Self([channel(0)?, channel(1)?, channel(2)?, alpha]))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}
