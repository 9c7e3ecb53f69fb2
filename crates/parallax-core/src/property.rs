//! Animated CSS properties.
//!
//! Every recognized property is a [`CssProperty`] variant carrying its
//! category and formatting rule. The variant order is the canonical order in
//! which transform and filter functions are composed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::interpolate::{self, InterpolationError, ValueSide};
use crate::style::{format_number, StyleValue};

/// How a property's interpolated value reaches the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyCategory {
    /// Composed into the `transform` value.
    Transform,
    /// Composed into the `filter` value.
    Filter,
    /// Interpolated in color space, written as its own property.
    Color,
    /// Any other property, written as its own property.
    Plain,
}

/// Default unit appended to a transform or filter function argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultUnit {
    Px,
    Deg,
    /// Argument is a bare number; configured units are ignored.
    None,
}

macro_rules! css_properties {
    ($($variant:ident => $name:literal, $category:ident, $unit:ident;)*) => {
        /// A property a segment can animate.
        ///
        /// Ordering follows declaration order, which puts transforms in
        /// composition order, then filters, then colors, then everything else.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum CssProperty {
            $($variant,)*
            /// Any property without special handling, keyed by its name.
            Other(String),
        }

        impl CssProperty {
            /// Look up a property by its camelCase name.
            pub fn from_name(name: &str) -> Self {
                match name {
                    $($name => CssProperty::$variant,)*
                    other => CssProperty::Other(other.to_string()),
                }
            }

            /// The camelCase name.
            pub fn name(&self) -> &str {
                match self {
                    $(CssProperty::$variant => $name,)*
                    CssProperty::Other(name) => name,
                }
            }

            pub fn category(&self) -> PropertyCategory {
                match self {
                    $(CssProperty::$variant => PropertyCategory::$category,)*
                    CssProperty::Other(_) => PropertyCategory::Plain,
                }
            }

            fn default_unit(&self) -> DefaultUnit {
                match self {
                    $(CssProperty::$variant => DefaultUnit::$unit,)*
                    CssProperty::Other(_) => DefaultUnit::None,
                }
            }
        }
    };
}

css_properties! {
    TranslateX => "translateX", Transform, Px;
    TranslateY => "translateY", Transform, Px;
    TranslateZ => "translateZ", Transform, Px;
    Skew => "skew", Transform, Deg;
    SkewX => "skewX", Transform, Deg;
    SkewY => "skewY", Transform, Deg;
    SkewZ => "skewZ", Transform, Deg;
    Rotate => "rotate", Transform, Deg;
    RotateX => "rotateX", Transform, Deg;
    RotateY => "rotateY", Transform, Deg;
    RotateZ => "rotateZ", Transform, Deg;
    Scale => "scale", Transform, None;
    ScaleX => "scaleX", Transform, None;
    ScaleY => "scaleY", Transform, None;
    ScaleZ => "scaleZ", Transform, None;

    Blur => "blur", Filter, Px;
    Brightness => "brightness", Filter, None;
    Contrast => "contrast", Filter, None;
    Grayscale => "grayscale", Filter, None;
    HueRotate => "hueRotate", Filter, Deg;
    Invert => "invert", Filter, None;
    OpacityFilter => "opacityFilter", Filter, None;
    Saturate => "saturate", Filter, None;
    Sepia => "sepia", Filter, None;

    BackgroundColor => "backgroundColor", Color, None;
    BorderBottomColor => "borderBottomColor", Color, None;
    BorderColor => "borderColor", Color, None;
    BorderLeftColor => "borderLeftColor", Color, None;
    BorderRightColor => "borderRightColor", Color, None;
    BorderTopColor => "borderTopColor", Color, None;
    Color => "color", Color, None;
    Fill => "fill", Color, None;
    Stroke => "stroke", Color, None;
}

impl CssProperty {
    /// CSS function name for transform and filter properties.
    pub fn function_name(&self) -> &str {
        match self {
            CssProperty::HueRotate => "hue-rotate",
            CssProperty::OpacityFilter => "opacity",
            other => other.name(),
        }
    }

    /// Unit written after a function argument, honoring a configured unit
    /// where the function takes one.
    fn function_unit<'a>(&self, configured: Option<&'a str>) -> &'a str {
        match self.default_unit() {
            DefaultUnit::None => "",
            DefaultUnit::Px => configured.unwrap_or("px"),
            DefaultUnit::Deg => configured.unwrap_or("deg"),
        }
    }
}

impl fmt::Display for CssProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for CssProperty {
    fn from(name: &str) -> Self {
        CssProperty::from_name(name)
    }
}

impl From<String> for CssProperty {
    fn from(name: String) -> Self {
        CssProperty::from_name(&name)
    }
}

impl From<CssProperty> for String {
    fn from(property: CssProperty) -> Self {
        property.name().to_string()
    }
}

impl Serialize for CssProperty {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for CssProperty {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(CssProperty::from)
    }
}

/// Configured start or end value of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl PropertyValue {
    fn as_number(&self, side: ValueSide) -> Result<f64, InterpolationError> {
        match self {
            PropertyValue::Number(n) => Ok(*n),
            PropertyValue::Text(text) => Err(InterpolationError::NotANumber {
                side,
                value: text.clone(),
            }),
        }
    }

    fn as_color(&self, side: ValueSide) -> Result<&str, InterpolationError> {
        match self {
            PropertyValue::Text(text) => Ok(text),
            PropertyValue::Number(n) => Err(InterpolationError::NotAColor { side, value: *n }),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::Text(text.to_string())
    }
}

/// One property animation within a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub property: CssProperty,
    pub start_value: PropertyValue,
    pub end_value: PropertyValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Property {
    pub fn new(
        property: impl Into<CssProperty>,
        start_value: impl Into<PropertyValue>,
        end_value: impl Into<PropertyValue>,
    ) -> Self {
        Self {
            property: property.into(),
            start_value: start_value.into(),
            end_value: end_value.into(),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Interpolate at `scroll_position` and format the result for its
    /// category: a function call for transforms and filters, an `rgba(...)`
    /// string for colors, a number or number-with-unit otherwise.
    pub fn sample(
        &self,
        scroll_position: f64,
        start: f64,
        duration: f64,
        easing: Option<&Easing>,
    ) -> Result<StyleValue, InterpolationError> {
        let category = self.property.category();

        if category == PropertyCategory::Color {
            let text = interpolate::color(
                scroll_position,
                start,
                duration,
                self.start_value.as_color(ValueSide::Start)?,
                self.end_value.as_color(ValueSide::End)?,
                easing,
            )?;
            return Ok(StyleValue::Text(text));
        }

        let value = interpolate::linear(
            scroll_position,
            start,
            duration,
            self.start_value.as_number(ValueSide::Start)?,
            self.end_value.as_number(ValueSide::End)?,
            easing,
        )?;

        let unit = self.unit.as_deref();
        Ok(match category {
            PropertyCategory::Transform | PropertyCategory::Filter => StyleValue::Text(format!(
                "{}({}{})",
                self.property.function_name(),
                format_number(value),
                self.property.function_unit(unit)
            )),
            _ => match unit {
                Some(unit) => StyleValue::Text(format!("{}{}", format_number(value), unit)),
                None => StyleValue::Number(value),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(CssProperty::from_name("translateY"), CssProperty::TranslateY);
        assert_eq!(CssProperty::TranslateY.category(), PropertyCategory::Transform);
        assert_eq!(CssProperty::from_name("hueRotate").category(), PropertyCategory::Filter);
        assert_eq!(CssProperty::from_name("borderTopColor").category(), PropertyCategory::Color);
        assert_eq!(
            CssProperty::from_name("opacity"),
            CssProperty::Other("opacity".into())
        );
        assert_eq!(CssProperty::from_name("opacity").category(), PropertyCategory::Plain);
    }

    #[test]
    fn test_canonical_order() {
        assert!(CssProperty::TranslateX < CssProperty::Skew);
        assert!(CssProperty::RotateZ < CssProperty::Scale);
        assert!(CssProperty::ScaleZ < CssProperty::Blur);
        assert!(CssProperty::Sepia < CssProperty::Other("a".into()));
    }

    #[test]
    fn test_transform_units() {
        let translate = Property::new("translateX", 0.0, 100.0);
        assert_eq!(
            translate.sample(50.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("translateX(50px)".into())
        );

        let rotate = Property::new("rotate", 0.0, 90.0);
        assert_eq!(
            rotate.sample(100.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("rotate(90deg)".into())
        );

        let turns = Property::new("rotate", 0.0, 1.0).with_unit("turn");
        assert_eq!(
            turns.sample(100.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("rotate(1turn)".into())
        );

        let scale = Property::new("scale", 1.0, 2.0).with_unit("px");
        assert_eq!(
            scale.sample(50.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("scale(1.5)".into())
        );
    }

    #[test]
    fn test_filter_formatting() {
        let hue = Property::new("hueRotate", 0.0, 180.0);
        assert_eq!(
            hue.sample(100.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("hue-rotate(180deg)".into())
        );

        let opacity = Property::new("opacityFilter", 1.0, 0.0);
        assert_eq!(
            opacity.sample(100.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("opacity(0)".into())
        );

        let blur = Property::new("blur", 0.0, 4.0);
        assert_eq!(
            blur.sample(50.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("blur(2px)".into())
        );
    }

    #[test]
    fn test_plain_and_color() {
        let opacity = Property::new("opacity", 0.0, 1.0);
        assert_eq!(
            opacity.sample(25.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Number(0.25)
        );

        let width = Property::new("width", 100.0, 200.0).with_unit("%");
        assert_eq!(
            width.sample(100.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("200%".into())
        );

        let color = Property::new("backgroundColor", "#000", "#fff");
        assert_eq!(
            color.sample(0.0, 0.0, 100.0, None).unwrap(),
            StyleValue::Text("rgba(0, 0, 0, 1)".into())
        );
    }

    #[test]
    fn test_mismatched_values() {
        let text_number = Property::new("opacity", "half", 1.0);
        assert!(matches!(
            text_number.sample(0.0, 0.0, 100.0, None),
            Err(InterpolationError::NotANumber { side: ValueSide::Start, .. })
        ));

        let numeric_color = Property::new("color", "#fff", 3.0);
        assert!(matches!(
            numeric_color.sample(0.0, 0.0, 100.0, None),
            Err(InterpolationError::NotAColor { side: ValueSide::End, .. })
        ));
    }

    #[test]
    fn test_deserialize() {
        let json = r##"{"property": "translateY", "startValue": 0, "endValue": -50, "unit": "vh"}"##;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.property, CssProperty::TranslateY);
        assert_eq!(property.end_value, PropertyValue::Number(-50.0));
        assert_eq!(property.unit.as_deref(), Some("vh"));
    }
}
