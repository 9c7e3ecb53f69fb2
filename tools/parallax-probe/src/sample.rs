//! Sampling the engine over a scroll range.

use std::path::Path;

use parallax_common::{OptionExt, ParallaxError, ParallaxSettings, Result};
use parallax_core::{
    parse_segments, BindingOptions, Classification, LayoutHost, ParallaxController,
    ParallaxEvent, Segment, StaticLayout, StyleSnapshot,
};
use serde::Serialize;
use tracing::debug;

/// Scroll positions to visit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub from: f64,
    /// Defaults to the layout's maximum scroll.
    pub to: Option<f64>,
    pub step: f64,
}

impl SampleRange {
    fn positions(&self, max_scroll: f64) -> Result<Vec<f64>> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ParallaxError::InvalidArgument(format!(
                "step must be a positive number, got {}",
                self.step
            )));
        }

        let to = self.to.unwrap_or(max_scroll);
        let mut positions = Vec::new();
        let mut scroll = self.from;
        while scroll <= to {
            positions.push(scroll);
            scroll += self.step;
        }
        Ok(positions)
    }
}

/// Engine state at one scroll position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub scroll: f64,
    /// `None` when the pass was skipped (element outside the viewport).
    pub classification: Option<Classification>,
    pub class_name: String,
    pub changed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ParallaxEvent>,
    pub style: StyleSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

pub fn load_segments(path: &Path) -> Result<Vec<Segment>> {
    let json = std::fs::read_to_string(path)?;
    let segments = parse_segments(&json)?;
    debug!(path = %path.display(), count = segments.len(), "Loaded segments");
    Ok(segments)
}

pub fn load_layout(path: &Path) -> Result<StaticLayout> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Drive a controller across `range` on a static page.
pub fn sample(
    segments: Vec<Segment>,
    mut layout: StaticLayout,
    settings: ParallaxSettings,
    options: BindingOptions,
    range: SampleRange,
) -> Result<Vec<Sample>> {
    let element = layout
        .target_element()
        .ok_or_not_found("target element (set \"target\" or add an element)")?;
    let positions = range.positions(layout.max_scroll())?;

    let mut controller = ParallaxController::new(element, segments, settings).with_options(options);
    let mut samples = Vec::with_capacity(positions.len());

    for scroll in positions {
        layout.set_scroll_position(scroll);
        let outcome = controller.update(scroll, &layout);
        controller.mark_shown();

        samples.push(Sample {
            scroll,
            classification: outcome.and(controller.classification().cloned()),
            class_name: controller.class_name(),
            changed: outcome.is_some_and(|o| o.style_changed || o.classes_changed),
            events: controller.take_events(),
            style: controller.snapshot().clone(),
            diagnostics: controller
                .diagnostics()
                .iter()
                .map(ToString::to_string)
                .collect(),
        });
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_core::{Property, StyleValue};

    fn layout() -> StaticLayout {
        let mut layout = StaticLayout::new(800.0, 1200.0);
        layout.add_element("#box", 300.0, 100.0);
        layout
    }

    #[test]
    fn test_positions() {
        let range = SampleRange {
            from: 0.0,
            to: None,
            step: 100.0,
        };
        assert_eq!(range.positions(400.0).unwrap(), vec![0.0, 100.0, 200.0, 300.0, 400.0]);

        let bad = SampleRange { step: 0.0, ..range };
        assert!(matches!(bad.positions(400.0), Err(ParallaxError::InvalidArgument(_))));
    }

    #[test]
    fn test_sample_sweep() {
        let segments = vec![Segment::new(100.0)
            .duration(200.0)
            .property(Property::new("opacity", 0.0, 1.0))];
        let range = SampleRange {
            from: 0.0,
            to: Some(400.0),
            step: 100.0,
        };

        let samples = sample(
            segments,
            layout(),
            ParallaxSettings::default(),
            BindingOptions::default(),
            range,
        )
        .unwrap();

        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].classification, Some(Classification::Above));
        assert!(samples[0].changed);
        assert_eq!(samples[2].style.get("opacity"), Some(&StyleValue::Number(0.5)));
        assert_eq!(samples[1].events, vec![ParallaxEvent::Start]);
        assert_eq!(samples[4].classification, Some(Classification::Below));
        assert_eq!(samples[4].events, vec![ParallaxEvent::End]);
        assert_eq!(samples[4].class_name, "Plx Plx--below");
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let segments_path = dir.path().join("segments.json");
        let layout_path = dir.path().join("page.json");
        std::fs::write(
            &segments_path,
            r#"[{"start": "self", "duration": 100, "properties": [
                {"property": "translateY", "startValue": 0, "endValue": 100}
            ]}]"#,
        )
        .unwrap();
        std::fs::write(
            &layout_path,
            r##"{"viewportHeight": 800, "documentHeight": 2000, "target": "#box",
                "elements": [{"selector": "#box", "top": 900, "height": 100}]}"##,
        )
        .unwrap();

        let segments = load_segments(&segments_path).unwrap();
        let layout = load_layout(&layout_path).unwrap();
        let range = SampleRange {
            from: 150.0,
            to: Some(150.0),
            step: 1.0,
        };
        let samples = sample(
            segments,
            layout,
            ParallaxSettings::default(),
            BindingOptions::default(),
            range,
        )
        .unwrap();
        assert_eq!(
            samples[0].style.get("transform"),
            Some(&StyleValue::from("translateY(50px)"))
        );

        std::fs::write(&segments_path, r#"[{"start": 0}]"#).unwrap();
        assert_eq!(load_segments(&segments_path).unwrap_err().category(), "config");
        assert_eq!(
            load_segments(&dir.path().join("missing.json")).unwrap_err().category(),
            "io"
        );
    }

    #[test]
    fn test_missing_target() {
        let layout = StaticLayout::new(800.0, 1200.0);
        let range = SampleRange {
            from: 0.0,
            to: None,
            step: 10.0,
        };
        let err = sample(
            Vec::new(),
            layout,
            ParallaxSettings::default(),
            BindingOptions::default(),
            range,
        )
        .unwrap_err();
        assert_eq!(err.category(), "not_found");
    }
}
