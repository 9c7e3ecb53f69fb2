//! Page geometry as seen by the engine.
//!
//! The engine never touches a real document. Everything it needs to know
//! about the page (viewport size, document height, where anchor elements sit)
//! comes through [`LayoutHost`].

use serde::{Deserialize, Serialize};

/// Opaque handle to an element known by a [`LayoutHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(usize);

impl ElementId {
    /// Create a new ElementId.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> usize {
        self.0
    }
}

/// An element's box relative to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportRect {
    pub top: f64,
    pub height: f64,
}

impl ViewportRect {
    /// Whether the box overlaps the viewport grown by `margin` on both edges.
    pub fn intersects_viewport(&self, viewport_height: f64, margin: f64) -> bool {
        let top_above_bottom_edge = self.top < viewport_height + margin;
        let bottom_below_top_edge = self.top + self.height > -margin;
        top_above_bottom_edge && bottom_below_top_edge
    }
}

/// Geometry queries the engine issues during a pass.
pub trait LayoutHost {
    /// Inner height of the viewport.
    fn viewport_height(&self) -> f64;

    /// Full scroll height of the document.
    fn document_scroll_height(&self) -> f64;

    /// First element matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    /// Element's top edge measured from the top of the document.
    fn element_top(&self, element: ElementId) -> Option<f64>;

    /// Element's rendered height.
    fn element_height(&self, element: ElementId) -> Option<f64>;

    /// Element's box relative to the current viewport.
    fn bounding_rect(&self, element: ElementId) -> Option<ViewportRect>;

    /// Largest reachable scroll position.
    fn max_scroll(&self) -> f64 {
        self.document_scroll_height() - self.viewport_height()
    }
}

/// An element entry of a [`StaticLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBox {
    /// Selector the element answers to. Matching is verbatim.
    pub selector: String,
    /// Document-relative top offset.
    pub top: f64,
    /// Rendered height.
    pub height: f64,
}

/// Fixed, in-memory page geometry.
///
/// Used by tests and the probe tool in place of a live document. Element ids
/// are indices into `elements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticLayout {
    pub viewport_height: f64,
    pub document_height: f64,
    /// Scroll position used to derive bounding rects.
    #[serde(default)]
    pub scroll_position: f64,
    /// Selector of the animated element.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementBox>,
}

impl StaticLayout {
    /// Create a layout with no elements.
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            viewport_height,
            document_height,
            scroll_position: 0.0,
            target: None,
            elements: Vec::new(),
        }
    }

    /// Add an element and return its id.
    pub fn add_element(&mut self, selector: impl Into<String>, top: f64, height: f64) -> ElementId {
        self.elements.push(ElementBox {
            selector: selector.into(),
            top,
            height,
        });
        ElementId::new(self.elements.len() - 1)
    }

    /// Move the viewport.
    pub fn set_scroll_position(&mut self, scroll_position: f64) {
        self.scroll_position = scroll_position;
    }

    /// The animated element, from `target` or else the first element.
    pub fn target_element(&self) -> Option<ElementId> {
        match &self.target {
            Some(selector) => self.query_selector(selector),
            None if !self.elements.is_empty() => Some(ElementId::new(0)),
            None => None,
        }
    }

    fn element(&self, id: ElementId) -> Option<&ElementBox> {
        self.elements.get(id.raw())
    }
}

impl LayoutHost for StaticLayout {
    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn document_scroll_height(&self) -> f64 {
        self.document_height
    }

    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|element| element.selector == selector)
            .map(ElementId::new)
    }

    fn element_top(&self, element: ElementId) -> Option<f64> {
        self.element(element).map(|e| e.top)
    }

    fn element_height(&self, element: ElementId) -> Option<f64> {
        self.element(element).map(|e| e.height)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<ViewportRect> {
        self.element(element).map(|e| ViewportRect {
            top: e.top - self.scroll_position,
            height: e.height,
        })
    }
}
