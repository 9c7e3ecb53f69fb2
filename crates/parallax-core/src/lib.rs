//! # Parallax Core
//!
//! Scroll-position driven style interpolation.
//!
//! Given a scroll position, a list of segments and the page geometry, the
//! engine computes the style an element should have: composed `transform`
//! and `filter` values, interpolated colors, and any other numeric property.
//! It also classifies where the scroll position sits relative to the segments
//! so a view layer can expose state classes and start/end notifications.
//!
//! ## Architecture
//!
//! ```text
//! ParallaxController
//!    ├── evaluate ── resolve_segment ── units::resolve ── LayoutHost
//!    │      └── Property::sample ── interpolate ── easing / color
//!    ├── compose ── StyleSnapshot
//!    └── classify ── Classification / ParallaxEvent
//! ```
//!
//! Every output is a pure function of the scroll position and configuration.
//! Failures never abort a pass: they are logged and reported as
//! [`Diagnostic`]s.

pub mod classify;
pub mod color;
pub mod compose;
pub mod controller;
pub mod easing;
pub mod evaluate;
pub mod interpolate;
pub mod layout;
pub mod property;
pub mod segment;
pub mod style;
pub mod units;

pub use classify::{classify, edge, Classification, ParallaxEvent};
pub use color::{ColorError, Rgba};
pub use compose::{compose, touched_style_keys, will_change};
pub use controller::{BindingOptions, ParallaxController, UpdateOutcome};
pub use easing::{CubicBezier, Easing, EasingError, NamedEasing};
pub use evaluate::{evaluate, resolve_segment, Diagnostic, DiagnosticKind, Evaluation, ResolvedSegment};
pub use interpolate::InterpolationError;
pub use layout::{ElementBox, ElementId, LayoutHost, StaticLayout, ViewportRect};
pub use property::{CssProperty, Property, PropertyCategory, PropertyValue};
pub use segment::{parse_segments, validate_segments, ConfigError, Segment, SegmentId};
pub use style::{StyleAccumulator, StyleSnapshot, StyleValue};
pub use units::{Anchor, Boundary, Length, LengthUnit, ResolveContext, ResolveError};

use parallax_common::ParallaxError;

impl From<ConfigError> for ParallaxError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Json(e) => ParallaxError::Json(e),
            other => ParallaxError::config_with_source("invalid segments", other),
        }
    }
}

impl From<ResolveError> for ParallaxError {
    fn from(err: ResolveError) -> Self {
        ParallaxError::resolution_with_source("unresolvable boundary", err)
    }
}

impl From<InterpolationError> for ParallaxError {
    fn from(err: InterpolationError) -> Self {
        ParallaxError::interpolation_with_source("interpolation failed", err)
    }
}

impl From<EasingError> for ParallaxError {
    fn from(err: EasingError) -> Self {
        ParallaxError::config_with_source("invalid easing", err)
    }
}
