//! Animation-state classification and start/end edges.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::segment::{Segment, SegmentId};

/// Where the scroll position sits relative to the segment list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Before the first segment starts.
    Above,
    /// Inside a segment.
    ActiveIn(SegmentId),
    /// In the gap after a segment and before the next one.
    ActiveBetween(SegmentId, SegmentId),
    /// Past the end of the last segment.
    Below,
}

impl Classification {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Classification::ActiveIn(_) | Classification::ActiveBetween(..)
        )
    }

    /// State classes with the given prefix, e.g. `Plx--active Plx--in Plx--in-0`.
    pub fn css_classes(&self, prefix: &str) -> String {
        match self {
            Classification::Above => format!("{prefix}--above"),
            Classification::Below => format!("{prefix}--below"),
            Classification::ActiveIn(id) => {
                format!("{prefix}--active {prefix}--in {prefix}--in-{id}")
            }
            Classification::ActiveBetween(id, next) => format!(
                "{prefix}--active {prefix}--between {prefix}--between-{id}-and-{next}"
            ),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Above => f.write_str("above"),
            Classification::Below => f.write_str("below"),
            Classification::ActiveIn(id) => write!(f, "active-in:{}", id),
            Classification::ActiveBetween(id, next) => write!(f, "active-between:{}:{}", id, next),
        }
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Classify a pass from its active index and in-segment flag.
pub fn classify(active_index: Option<usize>, is_in_segment: bool, segments: &[Segment]) -> Classification {
    let id = |index: usize| {
        segments
            .get(index)
            .map_or(SegmentId::Index(index), |segment| segment.id(index))
    };

    match active_index {
        None => Classification::Above,
        Some(index) if is_in_segment => Classification::ActiveIn(id(index)),
        Some(index) if index + 1 >= segments.len() => Classification::Below,
        Some(index) => Classification::ActiveBetween(id(index), id(index + 1)),
    }
}

/// Start/end notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallaxEvent {
    Start,
    End,
}

/// Notification fired by moving from `previous` to `next`, if any.
///
/// Only changes of the active bit count; no previous state is inactive.
pub fn edge(previous: Option<&Classification>, next: &Classification) -> Option<ParallaxEvent> {
    let was_active = previous.is_some_and(Classification::is_active);
    match (was_active, next.is_active()) {
        (false, true) => Some(ParallaxEvent::Start),
        (true, false) => Some(ParallaxEvent::End),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<Segment> {
        vec![
            Segment::new(0.0).duration(100.0),
            Segment::new(200.0).duration(100.0).name("fade"),
            Segment::new(400.0).duration(100.0),
        ]
    }

    #[test]
    fn test_classify_states() {
        let segments = segments();
        assert_eq!(classify(None, false, &segments), Classification::Above);
        assert_eq!(
            classify(Some(0), true, &segments),
            Classification::ActiveIn(SegmentId::Index(0))
        );
        assert_eq!(
            classify(Some(0), false, &segments).to_string(),
            "active-between:0:fade"
        );
        assert_eq!(classify(Some(2), true, &segments).to_string(), "active-in:2");
        assert_eq!(classify(Some(2), false, &segments), Classification::Below);
    }

    #[test]
    fn test_css_classes() {
        let between = Classification::ActiveBetween(SegmentId::Index(0), SegmentId::Name("fade".into()));
        assert_eq!(
            between.css_classes("Plx"),
            "Plx--active Plx--between Plx--between-0-and-fade"
        );
        assert_eq!(
            Classification::ActiveIn(SegmentId::Index(1)).css_classes("Plx"),
            "Plx--active Plx--in Plx--in-1"
        );
        assert_eq!(Classification::Below.css_classes("X"), "X--below");
    }

    #[test]
    fn test_edges() {
        let in_first = Classification::ActiveIn(SegmentId::Index(0));
        let between = Classification::ActiveBetween(SegmentId::Index(0), SegmentId::Index(1));

        assert_eq!(edge(None, &Classification::Above), None);
        assert_eq!(edge(None, &in_first), Some(ParallaxEvent::Start));
        assert_eq!(edge(Some(&Classification::Above), &in_first), Some(ParallaxEvent::Start));
        assert_eq!(edge(Some(&in_first), &between), None);
        assert_eq!(edge(Some(&in_first), &in_first), None);
        assert_eq!(edge(Some(&between), &Classification::Below), Some(ParallaxEvent::End));
        assert_eq!(edge(Some(&Classification::Above), &Classification::Below), None);
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&Classification::ActiveIn(SegmentId::Name("a".into()))).unwrap();
        assert_eq!(json, r#""active-in:a""#);
        assert_eq!(serde_json::to_string(&ParallaxEvent::End).unwrap(), r#""end""#);
    }
}
