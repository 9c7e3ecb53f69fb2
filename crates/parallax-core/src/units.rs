//! Conversion of segment boundaries into absolute scroll offsets.
//!
//! A boundary is written as a pixel number, a length string (`"120px"`,
//! `"50%"`, `"10vh"`), `"self"`, a selector, or a direct element handle.
//! Percentages are relative to the maximum scroll distance and `vh` to the
//! viewport height. Element anchors resolve to the scroll position at which
//! the element's top edge reaches the bottom of the viewport, or to the
//! element's height when used as a duration.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::{ElementId, LayoutHost};

/// Errors raised while turning a boundary into pixels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("\"{0}\" is not a valid length (expected <number>, <number>px, <number>% or <number>vh)")]
    InvalidLength(String),

    #[error("\"{value}\" is not a valid {boundary} value")]
    InvalidValue { boundary: Boundary, value: String },

    #[error("{boundary} selector matches no elements: \"{selector}\"")]
    SelectorNotFound { boundary: Boundary, selector: String },

    #[error("{boundary} element {element:?} has no layout")]
    ElementDetached { boundary: Boundary, element: ElementId },

    #[error("segment has neither a duration nor an end")]
    MissingDuration,
}

/// Which segment boundary is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Start,
    End,
    Duration,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Boundary::Start => "start",
            Boundary::End => "end",
            Boundary::Duration => "duration",
        })
    }
}

/// Unit of a [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
    #[default]
    Px,
    /// Percent of the maximum scroll distance.
    Percent,
    /// Percent of the viewport height.
    Vh,
}

/// A number with an optional scroll-relative unit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Scalar")]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Px,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Percent,
        }
    }

    pub fn vh(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Vh,
        }
    }

    /// Convert to pixels.
    pub fn to_pixels(&self, max_scroll: f64, viewport_height: f64) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Percent => self.value * max_scroll / 100.0,
            LengthUnit::Vh => self.value * (viewport_height / 100.0),
        }
    }
}

impl FromStr for Length {
    type Err = ResolveError;

    /// Accepts `-?\d+(\.\d+)?(px|%|vh)?`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolveError::InvalidLength(s.to_string());

        let (number, unit) = if let Some(n) = s.strip_suffix("px") {
            (n, LengthUnit::Px)
        } else if let Some(n) = s.strip_suffix("vh") {
            (n, LengthUnit::Vh)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, LengthUnit::Percent)
        } else {
            (s, LengthUnit::Px)
        };

        if !is_plain_decimal(number) {
            return Err(invalid());
        }
        let value = number.parse::<f64>().map_err(|_| invalid())?;

        Ok(Self { value, unit })
    }
}

/// `-?\d+(\.\d+)?`, nothing else (no exponent, no leading `+` or `.`).
fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    all_digits(int) && frac.map_or(true, all_digits)
}

/// Where a segment boundary is anchored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Scalar")]
pub enum Anchor {
    /// Absolute scroll offset in pixels.
    Pixels(f64),
    /// Scroll-relative length.
    Length(Length),
    /// The animated element itself.
    SelfElement,
    /// First element matching a selector.
    Selector(String),
    /// A specific element.
    Element(ElementId),
}

impl Anchor {
    /// Parse the string form of a boundary.
    ///
    /// Length strings win; `"self"` names the animated element; anything
    /// else that does not start with a digit is a selector.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        if let Ok(length) = raw.parse::<Length>() {
            return Ok(Anchor::Length(length));
        }
        if raw == "self" {
            return Ok(Anchor::SelfElement);
        }
        match raw.chars().next() {
            Some(c) if !c.is_ascii_digit() && !c.is_whitespace() => {
                Ok(Anchor::Selector(raw.to_string()))
            }
            _ => Err(ResolveError::InvalidLength(raw.to_string())),
        }
    }
}

impl FromStr for Anchor {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::parse(s)
    }
}

impl From<f64> for Anchor {
    fn from(px: f64) -> Self {
        Anchor::Pixels(px)
    }
}

impl From<Length> for Anchor {
    fn from(length: Length) -> Self {
        Anchor::Length(length)
    }
}

impl From<ElementId> for Anchor {
    fn from(element: ElementId) -> Self {
        Anchor::Element(element)
    }
}

/// Raw JSON form of a boundary or offset.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl TryFrom<Scalar> for Anchor {
    type Error = ResolveError;

    fn try_from(raw: Scalar) -> Result<Self, Self::Error> {
        match raw {
            Scalar::Number(px) => Ok(Anchor::Pixels(px)),
            Scalar::Text(text) => Anchor::parse(&text),
        }
    }
}

impl TryFrom<Scalar> for Length {
    type Error = ResolveError;

    fn try_from(raw: Scalar) -> Result<Self, Self::Error> {
        match raw {
            Scalar::Number(px) => Ok(Length::px(px)),
            Scalar::Text(text) => text.parse(),
        }
    }
}

/// Page metrics captured once per evaluation pass.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    host: &'a dyn LayoutHost,
    element: ElementId,
    max_scroll: f64,
    viewport_height: f64,
}

impl<'a> ResolveContext<'a> {
    /// Capture metrics from `host` for the animated `element`.
    pub fn new(host: &'a dyn LayoutHost, element: ElementId) -> Self {
        Self {
            host,
            element,
            max_scroll: host.max_scroll(),
            viewport_height: host.viewport_height(),
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn length_to_pixels(&self, length: &Length) -> f64 {
        length.to_pixels(self.max_scroll, self.viewport_height)
    }

    fn element_position(&self, boundary: Boundary, element: ElementId) -> Result<f64, ResolveError> {
        let detached = || ResolveError::ElementDetached { boundary, element };
        match boundary {
            Boundary::Start | Boundary::End => {
                let top = self.host.element_top(element).ok_or_else(detached)?;
                Ok(top - self.viewport_height)
            }
            Boundary::Duration => self.host.element_height(element).ok_or_else(detached),
        }
    }
}

/// Resolve a boundary plus optional offset into a non-negative pixel value.
pub fn resolve(
    boundary: Boundary,
    anchor: &Anchor,
    offset: Option<&Length>,
    ctx: &ResolveContext<'_>,
) -> Result<f64, ResolveError> {
    let base = match anchor {
        Anchor::Pixels(px) if px.is_finite() => *px,
        Anchor::Pixels(px) => {
            return Err(ResolveError::InvalidValue {
                boundary,
                value: px.to_string(),
            })
        }
        Anchor::Length(length) => ctx.length_to_pixels(length),
        Anchor::SelfElement => ctx.element_position(boundary, ctx.element)?,
        Anchor::Element(element) => ctx.element_position(boundary, *element)?,
        Anchor::Selector(selector) => {
            let element = ctx.host.query_selector(selector).ok_or_else(|| {
                ResolveError::SelectorNotFound {
                    boundary,
                    selector: selector.clone(),
                }
            })?;
            ctx.element_position(boundary, element)?
        }
    };

    let offset_px = offset.map_or(0.0, |o| ctx.length_to_pixels(o));

    Ok((base + offset_px).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StaticLayout;

    fn page() -> (StaticLayout, ElementId) {
        // max scroll = 1000, vh = 8px
        let mut layout = StaticLayout::new(800.0, 1800.0);
        let target = layout.add_element("#target", 1500.0, 300.0);
        layout.add_element("#footer", 1700.0, 100.0);
        (layout, target)
    }

    #[test]
    fn test_length_parse() {
        assert_eq!("120".parse::<Length>().unwrap(), Length::px(120.0));
        assert_eq!("120px".parse::<Length>().unwrap(), Length::px(120.0));
        assert_eq!("-2.5vh".parse::<Length>().unwrap(), Length::vh(-2.5));
        assert_eq!("50%".parse::<Length>().unwrap(), Length::percent(50.0));

        for bad in ["", "px", "1.", ".5", "+3", "1e3", "12em", "1 px", "--1"] {
            assert!(bad.parse::<Length>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_anchor_parse() {
        assert_eq!(Anchor::parse("self").unwrap(), Anchor::SelfElement);
        assert_eq!(Anchor::parse("10vh").unwrap(), Anchor::Length(Length::vh(10.0)));
        assert_eq!(
            Anchor::parse(".hero h1").unwrap(),
            Anchor::Selector(".hero h1".into())
        );
        assert!(Anchor::parse("12abc").is_err());
        assert!(Anchor::parse("").is_err());
    }

    #[test]
    fn test_anchor_deserialize() {
        let anchors: Vec<Anchor> = serde_json::from_str(r##"[300, "20%", "#footer"]"##).unwrap();
        assert_eq!(anchors[0], Anchor::Pixels(300.0));
        assert_eq!(anchors[1], Anchor::Length(Length::percent(20.0)));
        assert_eq!(anchors[2], Anchor::Selector("#footer".into()));

        assert!(serde_json::from_str::<Anchor>(r#""5em""#).is_err());
        assert!(serde_json::from_str::<Length>(r##""#footer""##).is_err());
    }

    #[test]
    fn test_percent_and_viewport_units() {
        let (layout, target) = page();
        let ctx = ResolveContext::new(&layout, target);

        let start = resolve(Boundary::Start, &Anchor::parse("50%").unwrap(), None, &ctx);
        assert_eq!(start, Ok(500.0));

        let duration = resolve(Boundary::Duration, &Anchor::parse("10vh").unwrap(), None, &ctx);
        assert_eq!(duration, Ok(80.0));
    }

    #[test]
    fn test_element_anchors() {
        let (layout, target) = page();
        let ctx = ResolveContext::new(&layout, target);

        // Element enters the viewport: top - viewport height.
        assert_eq!(resolve(Boundary::Start, &Anchor::SelfElement, None, &ctx), Ok(700.0));
        assert_eq!(
            resolve(Boundary::End, &Anchor::Selector("#footer".into()), None, &ctx),
            Ok(900.0)
        );
        assert_eq!(resolve(Boundary::Duration, &Anchor::SelfElement, None, &ctx), Ok(300.0));
        assert_eq!(
            resolve(Boundary::Duration, &Anchor::Element(ElementId::new(1)), None, &ctx),
            Ok(100.0)
        );
    }

    #[test]
    fn test_offset_and_clamp() {
        let (layout, target) = page();
        let ctx = ResolveContext::new(&layout, target);

        let with_offset = resolve(Boundary::Start, &Anchor::Pixels(100.0), Some(&Length::vh(10.0)), &ctx);
        assert_eq!(with_offset, Ok(180.0));

        let negative = resolve(Boundary::Start, &Anchor::Pixels(100.0), Some(&Length::px(-300.0)), &ctx);
        assert_eq!(negative, Ok(0.0));
    }

    #[test]
    fn test_resolution_failures() {
        let (layout, target) = page();
        let ctx = ResolveContext::new(&layout, target);

        assert!(matches!(
            resolve(Boundary::Start, &Anchor::Selector(".nope".into()), None, &ctx),
            Err(ResolveError::SelectorNotFound { boundary: Boundary::Start, .. })
        ));
        assert!(matches!(
            resolve(Boundary::Duration, &Anchor::Element(ElementId::new(42)), None, &ctx),
            Err(ResolveError::ElementDetached { .. })
        ));
        assert!(resolve(Boundary::Start, &Anchor::Pixels(f64::NAN), None, &ctx).is_err());
    }
}
