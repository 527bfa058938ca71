/// Size of a sized container (page viewport or offscreen probe).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Vertical box metrics of an element, in pixels.
///
/// These are the properties a toolbar button collapses to zero when hidden
/// and restores when shown again.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxMetrics {
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
}

impl BoxMetrics {
    pub const PROPERTIES: [&'static str; 5] = [
        "height",
        "margin-top",
        "margin-bottom",
        "padding-top",
        "padding-bottom",
    ];

    pub fn new(height: f64, margin: f64, padding: f64) -> Self {
        Self {
            height,
            margin_top: margin,
            margin_bottom: margin,
            padding_top: padding,
            padding_bottom: padding,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Value of one of [`Self::PROPERTIES`].
    pub fn get(&self, property: &str) -> Option<f64> {
        match property {
            "height" => Some(self.height),
            "margin-top" => Some(self.margin_top),
            "margin-bottom" => Some(self.margin_bottom),
            "padding-top" => Some(self.padding_top),
            "padding-bottom" => Some(self.padding_bottom),
            _ => None,
        }
    }

    pub fn set(&mut self, property: &str, value: f64) -> bool {
        let slot = match property {
            "height" => &mut self.height,
            "margin-top" => &mut self.margin_top,
            "margin-bottom" => &mut self.margin_bottom,
            "padding-top" => &mut self.padding_top,
            "padding-bottom" => &mut self.padding_bottom,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Style declarations reproducing these metrics, in [`Self::PROPERTIES`] order.
    pub fn to_properties(&self) -> Vec<(String, String)> {
        Self::PROPERTIES
            .iter()
            .map(|name| (name.to_string(), format_px(self.get(name).unwrap_or(0.0))))
            .collect()
    }
}

/// Format a pixel length the way inline styles are written (`12px`, `0.5px`).
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{}px", value)
    }
}

/// Parse `12px`, `12.5px` or a bare number into pixels.
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number.parse::<f64>().ok()
}

/// The rendering surface (a DOM-equivalent) the viewer mutates.
///
/// Elements are addressed by identifier. Mutating an unknown element is a
/// no-op; callers that require an element check [`Surface::contains`] up front.
pub trait Surface {
    fn contains(&self, id: &str) -> bool;

    /// Inline style value, if set.
    fn style(&self, id: &str, property: &str) -> Option<String>;
    fn set_style(&mut self, id: &str, property: &str, value: &str);
    fn remove_style(&mut self, id: &str, property: &str);
    /// Drop every inline style (the element falls back to its stylesheet look).
    fn clear_styles(&mut self, id: &str);

    /// Current vertical box metrics, inline styles applied.
    fn box_metrics(&self, id: &str) -> Option<BoxMetrics>;

    fn html(&self, id: &str) -> Option<String>;
    fn set_html(&mut self, id: &str, html: &str);

    fn add_class(&mut self, id: &str, class: &str);
    fn remove_class(&mut self, id: &str, class: &str);
    fn has_class(&self, id: &str, class: &str) -> bool;

    fn attribute(&self, id: &str, name: &str) -> Option<String>;
    fn set_attribute(&mut self, id: &str, name: &str, value: &str);

    /// Form control value (e.g. the jump-to-page input).
    fn value(&self, id: &str) -> Option<String>;
    fn set_value(&mut self, id: &str, value: &str);

    /// Size of a container element, when it has one.
    fn viewport(&self, id: &str) -> Option<Viewport>;

    /// Scroll the element into view without smooth scrolling.
    fn scroll_into_view(&mut self, id: &str);

    /// Whether the element takes part in layout (`display` is not `none`).
    fn is_displayed(&self, id: &str) -> bool {
        self.contains(id) && self.style(id, "display").as_deref() != Some("none")
    }
}
