//! Turns accumulated property values into a style snapshot.

use crate::property::PropertyCategory;
use crate::segment::Segment;
use crate::style::{kebab_case, StyleAccumulator, StyleSnapshot, StyleValue};

pub const TRANSFORM: &str = "transform";
pub const WEBKIT_TRANSFORM: &str = "webkitTransform";
pub const FILTER: &str = "filter";
pub const WEBKIT_FILTER: &str = "webkitFilter";

/// Compose a snapshot.
///
/// Transform and filter functions are joined in canonical order into
/// `transform` and `filter`, each mirrored under its webkit alias. Both are
/// always present, empty when nothing contributes. Color and plain
/// properties keep their own names.
pub fn compose(values: &StyleAccumulator) -> StyleSnapshot {
    let mut snapshot = StyleSnapshot::new();
    let mut transforms = Vec::new();
    let mut filters = Vec::new();

    for (property, value) in values.iter() {
        match property.category() {
            PropertyCategory::Transform => transforms.push(value.to_string()),
            PropertyCategory::Filter => filters.push(value.to_string()),
            PropertyCategory::Color | PropertyCategory::Plain => {
                snapshot.insert(property.name(), value.clone());
            }
        }
    }

    let transform = transforms.join(" ");
    snapshot.insert(WEBKIT_TRANSFORM, StyleValue::Text(transform.clone()));
    snapshot.insert(TRANSFORM, StyleValue::Text(transform));

    let filter = filters.join(" ");
    snapshot.insert(WEBKIT_FILTER, StyleValue::Text(filter.clone()));
    snapshot.insert(FILTER, StyleValue::Text(filter));

    snapshot
}

/// Style keys any segment in `segments` can write, in first-seen order.
pub fn touched_style_keys(segments: &[Segment]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut push = |key: &str| {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    };

    for property in segments.iter().flat_map(|s| &s.properties) {
        match property.property.category() {
            PropertyCategory::Transform => {
                push(TRANSFORM);
                push(WEBKIT_TRANSFORM);
            }
            PropertyCategory::Filter => {
                push(FILTER);
                push(WEBKIT_FILTER);
            }
            PropertyCategory::Color | PropertyCategory::Plain => push(property.property.name()),
        }
    }

    keys
}

/// `will-change` value announcing the touched keys.
pub fn will_change(keys: &[String]) -> String {
    keys.iter()
        .map(|key| kebab_case(key))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{CssProperty, Property};
    use crate::units::Anchor;

    #[test]
    fn test_canonical_transform_order() {
        let mut values = StyleAccumulator::new();
        values.insert(CssProperty::Scale, "scale(2)".into());
        values.insert(CssProperty::Rotate, "rotate(45deg)".into());
        values.insert(CssProperty::TranslateX, "translateX(10px)".into());

        let snapshot = compose(&values);
        assert_eq!(
            snapshot.get(TRANSFORM),
            Some(&StyleValue::from("translateX(10px) rotate(45deg) scale(2)"))
        );
        assert_eq!(snapshot.get(WEBKIT_TRANSFORM), snapshot.get(TRANSFORM));
    }

    #[test]
    fn test_filters_and_plain() {
        let mut values = StyleAccumulator::new();
        values.insert(CssProperty::Sepia, "sepia(1)".into());
        values.insert(CssProperty::Blur, "blur(2px)".into());
        values.insert(CssProperty::from_name("opacity"), 0.5.into());
        values.insert(CssProperty::Color, "rgba(0, 0, 0, 1)".into());

        let snapshot = compose(&values);
        assert_eq!(snapshot.get(FILTER), Some(&StyleValue::from("blur(2px) sepia(1)")));
        assert_eq!(snapshot.get("opacity"), Some(&StyleValue::Number(0.5)));
        assert_eq!(snapshot.get("color"), Some(&StyleValue::from("rgba(0, 0, 0, 1)")));
        assert_eq!(snapshot.get(TRANSFORM), Some(&StyleValue::from("")));
    }

    #[test]
    fn test_empty_composition() {
        let snapshot = compose(&StyleAccumulator::new());
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.to_css(), "");
    }

    #[test]
    fn test_touched_keys_and_will_change() {
        let segments = vec![
            Segment::new(Anchor::Pixels(0.0))
                .duration(Anchor::Pixels(100.0))
                .property(Property::new("scale", 1.0, 2.0))
                .property(Property::new("opacity", 0.0, 1.0)),
            Segment::new(Anchor::Pixels(100.0))
                .duration(Anchor::Pixels(100.0))
                .property(Property::new("translateY", 0.0, 10.0))
                .property(Property::new("blur", 0.0, 2.0))
                .property(Property::new("backgroundColor", "#000", "#fff")),
        ];

        let keys = touched_style_keys(&segments);
        assert_eq!(
            keys,
            vec![
                "transform",
                "webkitTransform",
                "opacity",
                "filter",
                "webkitFilter",
                "backgroundColor"
            ]
        );
        assert_eq!(
            will_change(&keys),
            "transform,-webkit-transform,opacity,filter,-webkit-filter,background-color"
        );
    }
}
