//! Segment evaluation.
//!
//! A pass resolves every reachable segment against the current geometry and
//! fills a [`StyleAccumulator`]:
//!
//! 1. Segments are visited in declaration order. The first segment whose
//!    start lies beyond the scroll position ends the walk; segment lists are
//!    expected to be sorted by start.
//! 2. Segments containing the scroll position are *active*. Their properties
//!    are written first, later-declared segments first.
//! 3. Segments already scrolled past are *completed*. They only fill
//!    properties no active segment wrote, most recently completed first
//!    (largest end, then later declaration).
//!
//! Nothing here fails. Unresolvable segments and uninterpolatable properties
//! are logged, reported as [`Diagnostic`]s, and skipped.

use std::fmt;

use tracing::{trace, warn};

use crate::easing::Easing;
use crate::interpolate::InterpolationError;
use crate::property::{CssProperty, Property};
use crate::segment::Segment;
use crate::style::{StyleAccumulator, StyleSnapshot};
use crate::units::{self, Boundary, ResolveContext, ResolveError};

/// A segment with boundaries in pixels, valid for one pass.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSegment<'a> {
    pub index: usize,
    pub start_px: f64,
    pub duration_px: f64,
    pub easing: Option<&'a Easing>,
    pub properties: &'a [Property],
}

impl ResolvedSegment<'_> {
    pub fn end_px(&self) -> f64 {
        self.start_px + self.duration_px
    }

    /// Whether `scroll_position` lies within `[start, end]`.
    pub fn contains(&self, scroll_position: f64) -> bool {
        scroll_position >= self.start_px && scroll_position <= self.end_px()
    }
}

/// Resolve a segment's start and duration in pixels.
///
/// `end` wins over `duration`; the duration is then `end - start` and may be
/// negative. When `end` cannot be resolved but `duration` is present, the
/// duration is used instead.
pub fn resolve_segment<'a>(
    index: usize,
    segment: &'a Segment,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedSegment<'a>, ResolveError> {
    let start_px = units::resolve(
        Boundary::Start,
        &segment.start,
        segment.start_offset.as_ref(),
        ctx,
    )?;

    let from_end = segment.end.as_ref().map(|end| {
        units::resolve(Boundary::End, end, segment.end_offset.as_ref(), ctx)
            .map(|end_px| end_px - start_px)
    });

    let duration_px = match (from_end, &segment.duration) {
        (Some(Ok(duration)), _) => duration,
        (Some(Err(e)), Some(duration)) => {
            trace!(segment = index, error = %e, "End unresolved, using duration");
            units::resolve(Boundary::Duration, duration, None, ctx)?
        }
        (Some(Err(e)), None) => return Err(e),
        (None, Some(duration)) => units::resolve(Boundary::Duration, duration, None, ctx)?,
        (None, None) => return Err(ResolveError::MissingDuration),
    };

    Ok(ResolvedSegment {
        index,
        start_px,
        duration_px,
        easing: segment.easing.as_ref(),
        properties: &segment.properties,
    })
}

/// What went wrong with a segment or property during a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    Resolve(ResolveError),
    Interpolate(InterpolationError),
}

/// A non-fatal failure observed during a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub segment: usize,
    /// Set when a single property failed rather than the whole segment.
    pub property: Option<CssProperty>,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {}", self.segment)?;
        if let Some(property) = &self.property {
            write!(f, ", property {}", property)?;
        }
        match &self.kind {
            DiagnosticKind::Resolve(e) => write!(f, ": {}", e),
            DiagnosticKind::Interpolate(e) => write!(f, ": {}", e),
        }
    }
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub values: StyleAccumulator,
    /// Last segment whose start has been scrolled past.
    pub active_index: Option<usize>,
    /// Whether any segment contains the scroll position.
    pub is_in_segment: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    pub fn compose(&self) -> StyleSnapshot {
        crate::compose::compose(&self.values)
    }
}

/// Evaluate `segments` at `scroll_position`.
pub fn evaluate(scroll_position: f64, segments: &[Segment], ctx: &ResolveContext<'_>) -> Evaluation {
    let mut evaluation = Evaluation::default();
    let mut active = Vec::new();
    let mut completed = Vec::new();

    for (index, segment) in segments.iter().enumerate() {
        let resolved = match resolve_segment(index, segment, ctx) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(segment = index, error = %e, "Skipping unresolvable segment");
                evaluation.diagnostics.push(Diagnostic {
                    segment: index,
                    property: None,
                    kind: DiagnosticKind::Resolve(e),
                });
                continue;
            }
        };

        if scroll_position < resolved.start_px {
            break;
        }

        evaluation.active_index = Some(index);

        if resolved.contains(scroll_position) {
            evaluation.is_in_segment = true;
            active.push(resolved);
        } else {
            completed.push(resolved);
        }
    }

    // Latest-declared active segment wins.
    for segment in active.iter().rev() {
        apply_segment(scroll_position, segment, &mut evaluation);
    }

    // Most recently completed first.
    completed.sort_by(|a, b| {
        b.end_px()
            .total_cmp(&a.end_px())
            .then_with(|| b.index.cmp(&a.index))
    });
    for segment in &completed {
        apply_segment(scroll_position, segment, &mut evaluation);
    }

    trace!(
        scroll_position,
        active_index = ?evaluation.active_index,
        in_segment = evaluation.is_in_segment,
        active = active.len(),
        completed = completed.len(),
        "Evaluated segments"
    );

    evaluation
}

fn apply_segment(scroll_position: f64, segment: &ResolvedSegment<'_>, evaluation: &mut Evaluation) {
    for property in segment.properties {
        if evaluation.values.is_claimed(&property.property) {
            continue;
        }

        match property.sample(
            scroll_position,
            segment.start_px,
            segment.duration_px,
            segment.easing,
        ) {
            Ok(value) => {
                evaluation.values.insert(property.property.clone(), value);
            }
            Err(e) => {
                warn!(
                    segment = segment.index,
                    property = %property.property,
                    error = %e,
                    "Failed to interpolate property"
                );
                evaluation.values.mark_failed(property.property.clone());
                evaluation.diagnostics.push(Diagnostic {
                    segment: segment.index,
                    property: Some(property.property.clone()),
                    kind: DiagnosticKind::Interpolate(e),
                });
            }
        }
    }
}
