//! Per-element binding state.
//!
//! [`ParallaxController`] is what a view layer holds for each animated
//! element. It decides when a pass should run, remembers the last snapshot and
//! classification for change detection, and queues start/end notifications
//! for the caller to drain.

use parallax_common::ParallaxSettings;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::classify::{classify, edge, Classification, ParallaxEvent};
use crate::compose::{touched_style_keys, will_change};
use crate::evaluate::{evaluate, Diagnostic};
use crate::layout::{ElementId, LayoutHost};
use crate::segment::Segment;
use crate::style::{StyleAccumulator, StyleSnapshot, StyleValue};
use crate::units::ResolveContext;

/// Flags supplied by the view layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingOptions {
    /// Evaluate even when the element is off screen.
    pub animate_when_not_in_viewport: bool,
    /// Never write parallax styles.
    pub disabled: bool,
    /// Stop updating once the element has been shown.
    pub freeze: bool,
}

/// What changed in one [`ParallaxController::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub style_changed: bool,
    pub classes_changed: bool,
    pub event: Option<ParallaxEvent>,
}

/// Parallax state for a single element.
#[derive(Debug)]
pub struct ParallaxController {
    element: ElementId,
    segments: Vec<Segment>,
    options: BindingOptions,
    settings: ParallaxSettings,
    author_class: String,
    touched_keys: Vec<String>,
    values: StyleAccumulator,
    snapshot: StyleSnapshot,
    classification: Option<Classification>,
    diagnostics: Vec<Diagnostic>,
    shown: bool,
    pending_events: Vec<ParallaxEvent>,
}

impl ParallaxController {
    pub fn new(element: ElementId, segments: Vec<Segment>, settings: ParallaxSettings) -> Self {
        let touched_keys = touched_style_keys(&segments);
        Self {
            element,
            segments,
            options: BindingOptions::default(),
            settings,
            author_class: String::new(),
            touched_keys,
            values: StyleAccumulator::new(),
            snapshot: StyleSnapshot::new(),
            classification: None,
            diagnostics: Vec::new(),
            shown: false,
            pending_events: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: BindingOptions) -> Self {
        self.options = options;
        self
    }

    /// Classes the author put on the element.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.author_class = class_name.into();
        self
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn options(&self) -> BindingOptions {
        self.options
    }

    /// Replace the segment list. Takes effect on the next update.
    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        self.touched_keys = touched_style_keys(&segments);
        self.segments = segments;
    }

    pub fn set_options(&mut self, options: BindingOptions) {
        self.options = options;
    }

    /// Run a pass at `scroll_position`.
    ///
    /// Returns `None` when no pass ran: the controller is disabled, frozen
    /// after being shown, or the element is outside the viewport margin.
    pub fn update(&mut self, scroll_position: f64, host: &dyn LayoutHost) -> Option<UpdateOutcome> {
        if self.options.disabled || (self.options.freeze && self.shown) {
            return None;
        }

        if !self.options.animate_when_not_in_viewport && !self.in_viewport(host) {
            trace!(element = self.element.raw(), scroll_position, "Element outside viewport");
            return None;
        }

        let ctx = ResolveContext::new(host, self.element);
        let mut evaluation = evaluate(scroll_position, &self.segments, &ctx);
        evaluation.values.inherit_failed(&self.values);

        let snapshot = evaluation.compose();
        let classification = classify(
            evaluation.active_index,
            evaluation.is_in_segment,
            &self.segments,
        );

        let style_changed = snapshot != self.snapshot;
        let classes_changed = self.classification.as_ref() != Some(&classification);
        let event = edge(self.classification.as_ref(), &classification);

        if let Some(event) = event {
            debug!(element = self.element.raw(), ?event, %classification, "Parallax edge");
            self.pending_events.push(event);
        }

        self.values = evaluation.values;
        self.diagnostics = evaluation.diagnostics;
        self.snapshot = snapshot;
        self.classification = Some(classification);

        Some(UpdateOutcome {
            style_changed,
            classes_changed,
            event,
        })
    }

    fn in_viewport(&self, host: &dyn LayoutHost) -> bool {
        host.bounding_rect(self.element).is_some_and(|rect| {
            rect.intersects_viewport(host.viewport_height(), self.settings.viewport_margin)
        })
    }

    /// Record that the element has been mounted and shown.
    pub fn mark_shown(&mut self) {
        self.shown = true;
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn snapshot(&self) -> &StyleSnapshot {
        &self.snapshot
    }

    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    /// Diagnostics from the most recent pass.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn touched_keys(&self) -> &[String] {
        &self.touched_keys
    }

    pub fn will_change(&self) -> String {
        will_change(&self.touched_keys)
    }

    /// Style to write on the element.
    ///
    /// Starts from `author_style` and overlays every touched key; keys the
    /// last pass did not produce are cleared with an empty value. Until the
    /// element is shown it stays hidden.
    pub fn merged_style(&self, author_style: &StyleSnapshot) -> StyleSnapshot {
        let mut style = author_style.clone();
        if self.options.disabled {
            return style;
        }

        for key in &self.touched_keys {
            let value = self
                .snapshot
                .get(key)
                .cloned()
                .unwrap_or_else(|| StyleValue::Text(String::new()));
            style.insert(key.as_str(), value);
        }

        if !self.shown {
            style.insert("visibility", "hidden");
        }

        style
    }

    /// Full class attribute: author classes, the prefix, then state classes.
    pub fn class_name(&self) -> String {
        let prefix = self.settings.class_prefix.as_str();
        let state = self
            .classification
            .as_ref()
            .map(|c| c.css_classes(prefix))
            .unwrap_or_default();

        [self.author_class.as_str(), prefix, state.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Drain queued start/end notifications.
    pub fn take_events(&mut self) -> Vec<ParallaxEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
