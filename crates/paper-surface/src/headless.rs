//! In-memory surface used by tests and the demo driver.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::warn;

use crate::surface::{BoxMetrics, Surface, Viewport, format_px, parse_px};

/// State of one element on a [`HeadlessSurface`].
#[derive(Debug, Clone, Default)]
pub struct ElementState {
    /// Metrics the element has from its stylesheet, before inline styles.
    pub natural: BoxMetrics,
    pub viewport: Option<Viewport>,
    pub inline: BTreeMap<String, String>,
    pub html: String,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub value: String,
    pub html_writes: usize,
    pub scrolls: usize,
}

impl ElementState {
    pub fn with_metrics(natural: BoxMetrics) -> Self {
        Self {
            natural,
            ..Self::default()
        }
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport: Some(viewport),
            ..Self::default()
        }
    }
}

/// A DOM-like element store with no rendering.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    elements: HashMap<String, ElementState>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, element: ElementState) -> &mut Self {
        self.elements.insert(id.into(), element);
        self
    }

    pub fn element(&self, id: &str) -> Option<&ElementState> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut ElementState> {
        self.elements.get_mut(id)
    }

    /// How many times the element's content was replaced.
    pub fn html_writes(&self, id: &str) -> usize {
        self.elements.get(id).map_or(0, |element| element.html_writes)
    }

    pub fn scrolls(&self, id: &str) -> usize {
        self.elements.get(id).map_or(0, |element| element.scrolls)
    }

    fn with_element(&mut self, id: &str, op: &str, apply: impl FnOnce(&mut ElementState)) {
        match self.elements.get_mut(id) {
            Some(element) => apply(element),
            None => warn!(id, op, "surface: unknown element"),
        }
    }
}

impl Surface for HeadlessSurface {
    fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn style(&self, id: &str, property: &str) -> Option<String> {
        self.elements.get(id)?.inline.get(property).cloned()
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) {
        self.with_element(id, "set_style", |element| {
            element.inline.insert(property.to_string(), value.to_string());
        });
    }

    fn remove_style(&mut self, id: &str, property: &str) {
        self.with_element(id, "remove_style", |element| {
            element.inline.remove(property);
        });
    }

    fn clear_styles(&mut self, id: &str) {
        self.with_element(id, "clear_styles", |element| element.inline.clear());
    }

    fn box_metrics(&self, id: &str) -> Option<BoxMetrics> {
        let element = self.elements.get(id)?;
        let mut metrics = element.natural;
        for property in BoxMetrics::PROPERTIES {
            if let Some(value) = element.inline.get(property).and_then(|v| parse_px(v)) {
                metrics.set(property, value);
            }
        }
        Some(metrics)
    }

    fn html(&self, id: &str) -> Option<String> {
        self.elements.get(id).map(|element| element.html.clone())
    }

    fn set_html(&mut self, id: &str, html: &str) {
        self.with_element(id, "set_html", |element| {
            element.html = html.to_string();
            element.html_writes += 1;
        });
    }

    fn add_class(&mut self, id: &str, class: &str) {
        self.with_element(id, "add_class", |element| {
            element.classes.insert(class.to_string());
        });
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        self.with_element(id, "remove_class", |element| {
            element.classes.remove(class);
        });
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|element| element.classes.contains(class))
    }

    fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.elements.get(id)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) {
        self.with_element(id, "set_attribute", |element| {
            element.attributes.insert(name.to_string(), value.to_string());
        });
    }

    fn value(&self, id: &str) -> Option<String> {
        self.elements.get(id).map(|element| element.value.clone())
    }

    fn set_value(&mut self, id: &str, value: &str) {
        self.with_element(id, "set_value", |element| element.value = value.to_string());
    }

    fn viewport(&self, id: &str) -> Option<Viewport> {
        self.elements.get(id)?.viewport
    }

    fn scroll_into_view(&mut self, id: &str) {
        self.with_element(id, "scroll_into_view", |element| element.scrolls += 1);
    }
}
