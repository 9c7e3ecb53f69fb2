//! Scroll-position interpolation of numbers and colors.

use thiserror::Error;

use crate::color::{ColorError, Rgba};
use crate::easing::{self, Easing};

/// Errors raised while interpolating one property.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    #[error("{side} is not a number: \"{value}\"")]
    NotANumber { side: ValueSide, value: String },

    #[error("{side} is not a color: {value}")]
    NotAColor { side: ValueSide, value: f64 },

    #[error("duration is zero or not a number: {0}")]
    InvalidDuration(f64),

    #[error("easing returned a non-finite value at progress {progress}")]
    NonFiniteEasing { progress: f64 },

    #[error(transparent)]
    Color(#[from] ColorError),
}

/// Which endpoint of a property range a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSide {
    Start,
    End,
}

impl std::fmt::Display for ValueSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValueSide::Start => "startValue",
            ValueSide::End => "endValue",
        })
    }
}

/// Clamped `[0, 1]` fraction of the segment elapsed at `scroll_position`.
pub fn progress(scroll_position: f64, start: f64, duration: f64) -> f64 {
    ((scroll_position - start) / duration).clamp(0.0, 1.0)
}

/// Floor to 4 decimal places.
fn truncate(value: f64) -> f64 {
    (value * 10_000.0).floor() / 10_000.0
}

/// Interpolate a number over `[start, start + duration]`.
///
/// Works for ranges counting up or down; the result is truncated to four
/// decimals.
pub fn linear(
    scroll_position: f64,
    start: f64,
    duration: f64,
    start_value: f64,
    end_value: f64,
    easing: Option<&Easing>,
) -> Result<f64, InterpolationError> {
    if duration == 0.0 || !duration.is_finite() {
        return Err(InterpolationError::InvalidDuration(duration));
    }

    let invert = start_value > end_value;
    let (min, max) = if invert {
        (end_value, start_value)
    } else {
        (start_value, end_value)
    };

    let remap = easing::resolve(easing);
    let t = progress(scroll_position, start, duration);
    let p = remap(t);
    if !p.is_finite() {
        return Err(InterpolationError::NonFiniteEasing { progress: t });
    }
    let value = p * (max - min);

    let value = if invert { max - value } else { min + value };

    Ok(truncate(value))
}

/// Interpolate two colors channel by channel and render `rgba(...)`.
pub fn color(
    scroll_position: f64,
    start: f64,
    duration: f64,
    start_value: &str,
    end_value: &str,
    easing: Option<&Easing>,
) -> Result<String, InterpolationError> {
    let from = Rgba::parse(start_value)?;
    let to = Rgba::parse(end_value)?;

    let channel = |a: f64, b: f64| linear(scroll_position, start, duration, a, b, easing);

    let r = channel(from.r.into(), to.r.into())?;
    let g = channel(from.g.into(), to.g.into())?;
    let b = channel(from.b.into(), to.b.into())?;
    let a = channel(from.a, to.a)?;

    let rgba = Rgba::new(to_channel(r), to_channel(g), to_channel(b), a);
    Ok(rgba.to_string())
}

fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
