//! Color parsing for color-valued properties.
//!
//! Supported forms: `#rgb`, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`,
//! case-insensitive, whitespace ignored. Channels are integers in `0..=255`;
//! alpha is `0` or `1` optionally followed by a fraction.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("hex color is not in the right format: \"{0}\"")]
    InvalidHex(String),

    #[error("rgb or rgba color is not in the right format: \"{0}\"")]
    InvalidRgb(String),

    #[error("empty color value")]
    Empty,
}

/// A parsed RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex or rgb(a) color string.
    pub fn parse(value: &str) -> Result<Self, ColorError> {
        let first = value.trim_start().chars().next().ok_or(ColorError::Empty)?;

        if first.eq_ignore_ascii_case(&'r') {
            parse_rgb(value)
        } else {
            parse_hex(value)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn parse_hex(value: &str) -> Result<Rgba, ColorError> {
    let invalid = || ColorError::InvalidHex(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;

    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    // #abc -> #aabbcc
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(invalid()),
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());

    Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, 1.0))
}

fn parse_rgb(value: &str) -> Result<Rgba, ColorError> {
    let invalid = || ColorError::InvalidRgb(value.to_string());
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let (args, has_alpha) = if let Some(rest) = compact.strip_prefix("rgba(") {
        (rest, true)
    } else if let Some(rest) = compact.strip_prefix("rgb(") {
        (rest, false)
    } else {
        return Err(invalid());
    };
    let args = args.strip_suffix(')').ok_or_else(invalid)?;
    let parts: Vec<&str> = args.split(',').collect();

    let expected = if has_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return Err(invalid());
    }

    let r = parse_channel(parts[0]).ok_or_else(invalid)?;
    let g = parse_channel(parts[1]).ok_or_else(invalid)?;
    let b = parse_channel(parts[2]).ok_or_else(invalid)?;
    let a = if has_alpha {
        parse_alpha(parts[3]).ok_or_else(invalid)?
    } else {
        1.0
    };

    Ok(Rgba::new(r, g, b, a))
}

/// One to three decimal digits, at most 255.
fn parse_channel(part: &str) -> Option<u8> {
    if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<u8>().ok()
}

/// `[01](\.\d+)?`
fn parse_alpha(part: &str) -> Option<f64> {
    let (int, frac) = match part.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (part, None),
    };
    if int != "0" && int != "1" {
        return None;
    }
    if let Some(frac) = frac {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    part.parse().ok()
}
