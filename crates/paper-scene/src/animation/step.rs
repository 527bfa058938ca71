//! Animation steps, sequences and style value interpolation.

use paper_surface::{Surface, format_px, parse_px};

use super::easing::EasingFunction;
use super::types::SequenceStatus;

/// Callback invoked exactly once when a sequence finishes or is stopped.
pub type Completion = Box<dyn FnOnce(&mut dyn Surface, SequenceStatus)>;

/// One animation of a set of style properties on one element.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStep {
    /// Element identifier. Empty only for pure waits.
    pub target: String,
    pub duration_ms: f32,
    /// Target style values, applied in order.
    pub properties: Vec<(String, String)>,
    /// When set the step is a pure wait of this length; properties are ignored.
    pub delay_ms: Option<f32>,
    pub easing: EasingFunction,
}

impl AnimationStep {
    pub fn new(target: impl Into<String>, duration_ms: f32) -> Self {
        Self {
            target: target.into(),
            duration_ms,
            properties: Vec::new(),
            delay_ms: None,
            easing: EasingFunction::default(),
        }
    }

    /// A step that only waits.
    pub fn wait(delay_ms: f32) -> Self {
        Self {
            target: String::new(),
            duration_ms: 0.0,
            properties: Vec::new(),
            delay_ms: Some(delay_ms),
            easing: EasingFunction::default(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn is_wait(&self) -> bool {
        self.delay_ms.is_some()
    }

    /// Wall-clock length of the step.
    pub fn length_ms(&self) -> f32 {
        match self.delay_ms {
            Some(delay) => delay.max(0.0),
            None => self.duration_ms.max(0.0),
        }
    }

    /// Zero-length steps settle the moment they start.
    pub fn is_instant(&self) -> bool {
        self.length_ms() <= 0.0
    }
}

/// One element of a sequence: a single step or a group run concurrently.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEntry {
    Single(AnimationStep),
    Parallel(Vec<AnimationStep>),
}

impl SequenceEntry {
    pub fn steps(&self) -> &[AnimationStep] {
        match self {
            Self::Single(step) => std::slice::from_ref(step),
            Self::Parallel(steps) => steps,
        }
    }

    pub fn into_steps(self) -> Vec<AnimationStep> {
        match self {
            Self::Single(step) => vec![step],
            Self::Parallel(steps) => steps,
        }
    }

    /// Length of the entry: its longest step.
    pub fn length_ms(&self) -> f32 {
        self.steps()
            .iter()
            .map(AnimationStep::length_ms)
            .fold(0.0, f32::max)
    }
}

/// An ordered list of entries plus a completion callback.
#[derive(Default)]
pub struct AnimationSequence {
    pub entries: Vec<SequenceEntry>,
    pub(crate) on_complete: Option<Completion>,
}

impl std::fmt::Debug for AnimationSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSequence")
            .field("entries", &self.entries)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl AnimationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: AnimationStep) -> Self {
        self.entries.push(SequenceEntry::Single(step));
        self
    }

    pub fn then_parallel(mut self, steps: Vec<AnimationStep>) -> Self {
        self.entries.push(SequenceEntry::Parallel(steps));
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut dyn Surface, SequenceStatus) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total wall-clock length if the sequence runs uninterrupted.
    pub fn length_ms(&self) -> f32 {
        self.entries.iter().map(SequenceEntry::length_ms).sum()
    }
}

/// A parsed inline style value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// Unitless number (`0.5`, `1`).
    Number(f64),
    /// Pixel length (`12px`).
    Length(f64),
    /// `translateX(<px>)`.
    TranslateX(f64),
    /// Anything else (`block`, `none`, colors...). Not interpolated.
    Keyword(String),
}

impl StyleValue {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if let Some(inner) = trimmed
            .strip_prefix("translateX(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            if let Some(px) = parse_px(inner) {
                return Self::TranslateX(px);
            }
        }
        if trimmed.ends_with("px") {
            if let Some(px) = parse_px(trimmed) {
                return Self::Length(px);
            }
        }
        match trimmed.parse::<f64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Keyword(trimmed.to_string()),
        }
    }

    pub fn to_css(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Length(px) => format_px(*px),
            Self::TranslateX(px) => format!("translateX({})", format_px(*px)),
            Self::Keyword(keyword) => keyword.clone(),
        }
    }

    /// Interpolated value between `self` and `to`, or `None` when the two
    /// cannot be blended (the caller then applies `to` when the step settles).
    pub fn interpolate(&self, to: &Self, t: f32) -> Option<Self> {
        let t = t as f64;
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        match (self, to) {
            (Self::Number(a), Self::Number(b)) => Some(Self::Number(lerp(*a, *b))),
            (Self::Length(a), Self::Length(b))
            | (Self::Number(a), Self::Length(b))
            | (Self::Length(a), Self::Number(b)) => Some(Self::Length(lerp(*a, *b))),
            (Self::TranslateX(a), Self::TranslateX(b)) => Some(Self::TranslateX(lerp(*a, *b))),
            _ => None,
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// The value a property has before a step starts animating it.
pub(crate) fn current_value(surface: &dyn Surface, target: &str, property: &str) -> StyleValue {
    if let Some(value) = surface.style(target, property) {
        let parsed = StyleValue::parse(&value);
        if !(property == "transform" && parsed == StyleValue::Keyword("none".into())) {
            return parsed;
        }
    }
    if let Some(px) = surface
        .box_metrics(target)
        .and_then(|metrics| metrics.get(property))
    {
        return StyleValue::Length(px);
    }
    match property {
        "transform" => StyleValue::TranslateX(0.0),
        "opacity" => StyleValue::Number(1.0),
        _ => StyleValue::Keyword(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paper_surface::{BoxMetrics, ElementState, HeadlessSurface};

    #[test]
    fn parses_style_values() {
        assert_eq!(StyleValue::parse("12px"), StyleValue::Length(12.0));
        assert_eq!(StyleValue::parse("0"), StyleValue::Number(0.0));
        assert_eq!(StyleValue::parse("0.5"), StyleValue::Number(0.5));
        assert_eq!(
            StyleValue::parse("translateX(160px)"),
            StyleValue::TranslateX(160.0)
        );
        assert_eq!(StyleValue::parse("block"), StyleValue::Keyword("block".into()));
    }

    #[test]
    fn interpolates_compatible_values() {
        let from = StyleValue::Length(40.0);
        let to = StyleValue::Number(0.0);
        assert_eq!(from.interpolate(&to, 0.25), Some(StyleValue::Length(30.0)));

        let slide = StyleValue::TranslateX(0.0).interpolate(&StyleValue::TranslateX(160.0), 0.5);
        assert_eq!(slide.map(|v| v.to_css()), Some("translateX(80px)".to_string()));

        assert_eq!(
            StyleValue::Keyword("none".into()).interpolate(&StyleValue::Keyword("block".into()), 0.5),
            None
        );
    }

    #[test]
    fn current_value_falls_back_to_metrics_and_defaults() {
        let mut surface = HeadlessSurface::new();
        surface.insert("btn", ElementState::with_metrics(BoxMetrics::new(40.0, 4.0, 8.0)));

        assert_eq!(current_value(&surface, "btn", "height"), StyleValue::Length(40.0));
        assert_eq!(current_value(&surface, "btn", "transform"), StyleValue::TranslateX(0.0));
        assert_eq!(current_value(&surface, "btn", "opacity"), StyleValue::Number(1.0));

        surface.set_style("btn", "opacity", "0");
        assert_eq!(current_value(&surface, "btn", "opacity"), StyleValue::Number(0.0));
    }

    #[test]
    fn sequence_length_sums_longest_steps() {
        let sequence = AnimationSequence::new()
            .then(AnimationStep::wait(300.0))
            .then_parallel(vec![
                AnimationStep::new("a", 100.0),
                AnimationStep::new("b", 250.0),
            ])
            .then(AnimationStep::new("a", 0.0));
        assert_eq!(sequence.length_ms(), 550.0);
    }
}
