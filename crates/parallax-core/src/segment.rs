//! Segment configuration.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::easing::Easing;
use crate::property::Property;
use crate::units::{Anchor, Length};

/// Errors found while loading or validating a segment list.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid segment configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("segment {segment} has neither a duration nor an end")]
    MissingDuration { segment: SegmentId },

    #[error("segment {segment}: {boundary} is not a finite number")]
    NonFiniteBoundary {
        segment: SegmentId,
        boundary: &'static str,
    },

    #[error("segment {segment}: property {index} has an empty name")]
    EmptyPropertyName { segment: SegmentId, index: usize },
}

/// Identifies a segment in classifications: its name, or its position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentId {
    Name(String),
    Index(usize),
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentId::Name(name) => f.write_str(name),
            SegmentId::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A scroll range and the properties animated across it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: Anchor,
    #[serde(default)]
    pub start_offset: Option<Length>,
    #[serde(default)]
    pub duration: Option<Anchor>,
    /// Takes precedence over `duration`.
    #[serde(default)]
    pub end: Option<Anchor>,
    #[serde(default)]
    pub end_offset: Option<Length>,
    #[serde(default)]
    pub easing: Option<Easing>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Segment {
    pub fn new(start: impl Into<Anchor>) -> Self {
        Self {
            start: start.into(),
            start_offset: None,
            duration: None,
            end: None,
            end_offset: None,
            easing: None,
            name: None,
            properties: Vec::new(),
        }
    }

    pub fn start_offset(mut self, offset: Length) -> Self {
        self.start_offset = Some(offset);
        self
    }

    pub fn duration(mut self, duration: impl Into<Anchor>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn end(mut self, end: impl Into<Anchor>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn end_offset(mut self, offset: Length) -> Self {
        self.end_offset = Some(offset);
        self
    }

    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Identifier of this segment at position `index`.
    pub fn id(&self, index: usize) -> SegmentId {
        match &self.name {
            Some(name) if !name.is_empty() => SegmentId::Name(name.clone()),
            _ => SegmentId::Index(index),
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let segment = || self.id(index);

        if self.duration.is_none() && self.end.is_none() {
            return Err(ConfigError::MissingDuration { segment: segment() });
        }

        let boundaries = [
            ("start", Some(&self.start)),
            ("end", self.end.as_ref()),
            ("duration", self.duration.as_ref()),
        ];
        for (boundary, anchor) in boundaries {
            if let Some(Anchor::Pixels(px)) = anchor {
                if !px.is_finite() {
                    return Err(ConfigError::NonFiniteBoundary {
                        segment: segment(),
                        boundary,
                    });
                }
            }
        }

        for (i, property) in self.properties.iter().enumerate() {
            if property.property.name().is_empty() {
                return Err(ConfigError::EmptyPropertyName {
                    segment: segment(),
                    index: i,
                });
            }
        }

        Ok(())
    }
}

/// Check a segment list for errors that would make it unusable.
pub fn validate_segments(segments: &[Segment]) -> Result<(), ConfigError> {
    segments
        .iter()
        .enumerate()
        .try_for_each(|(index, segment)| segment.validate(index))
}

/// Deserialize and validate a JSON array of segments.
pub fn parse_segments(json: &str) -> Result<Vec<Segment>, ConfigError> {
    let segments: Vec<Segment> = serde_json::from_str(json)?;
    validate_segments(&segments)?;
    debug!(count = segments.len(), "Parsed segments");
    Ok(segments)
}
