//! Toolbar of named action buttons with animated show/hide transitions.
//!
//! The controller owns which buttons are active and reconciles the visible
//! set with a newly requested one:
//!
//! ```text
//! update_buttons(new)
//!   to_hide = previous − new ──► hide:  [slide out] → [collapse metrics] → display none
//!   to_show = new − previous ──► show:  [lead delay?] → [display block] → [restore metrics] → [slide in] → clear inline styles
//! ```
//!
//! At most one hide run and one show run exist at a time. Starting a run of
//! one kind stops the previous run of that kind, and stops a run of the other
//! kind when they share buttons, so the settled visible set always equals the
//! active set.

use std::collections::HashMap;
use std::fmt;

use paper_config::{TimingConfig, ToolbarConfig};
use paper_surface::{BoxMetrics, Surface, format_px};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use crate::animation::{
    AnimationError, AnimationSequence, AnimationSequencer, AnimationStep, EasingFunction,
};
use crate::timers::Timers;

const PRESSED_CLASS: &str = "active";
const DISABLED_CLASS: &str = "disabled";

/// Name of a toolbar button.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ButtonName {
    Previous,
    JumpTo,
    Next,
    Save,
    Print,
    Email,
    Custom(String),
}

impl ButtonName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Previous => "previous",
            Self::JumpTo => "jumpto",
            Self::Next => "next",
            Self::Save => "save",
            Self::Print => "print",
            Self::Email => "email",
            Self::Custom(name) => name,
        }
    }

    /// Buttons that move through the pages of the active document.
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Previous | Self::JumpTo | Self::Next)
    }
}

impl From<&str> for ButtonName {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "previous" => Self::Previous,
            "jumpto" => Self::JumpTo,
            "next" => Self::Next,
            "save" => Self::Save,
            "print" => Self::Print,
            "email" => Self::Email,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for ButtonName {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<ButtonName> for String {
    fn from(name: ButtonName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for ButtonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolbarError {
    #[error("toolbar element '{0}' not found on the surface")]
    MissingElement(String),
    #[error("unknown toolbar button '{0}'")]
    UnknownButton(ButtonName),
    #[error(transparent)]
    Animation(#[from] AnimationError),
}

/// Every button the toolbar declares, in canonical visual order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonUniverse(Vec<ButtonName>);

impl Default for ButtonUniverse {
    fn default() -> Self {
        Self(vec![
            ButtonName::Previous,
            ButtonName::JumpTo,
            ButtonName::Next,
            ButtonName::Save,
            ButtonName::Print,
            ButtonName::Email,
        ])
    }
}

impl ButtonUniverse {
    /// Declared order is kept; repeated names are dropped.
    pub fn new(names: impl IntoIterator<Item = ButtonName>) -> Self {
        let mut declared = Vec::new();
        for name in names {
            if !declared.contains(&name) {
                declared.push(name);
            }
        }
        Self(declared)
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(names.iter().map(|name| ButtonName::from(name.as_ref())))
    }

    pub fn names(&self) -> &[ButtonName] {
        &self.0
    }

    pub fn contains(&self, name: &ButtonName) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Put `names` in canonical order without duplicates.
    pub fn normalize(&self, names: &[ButtonName]) -> Result<Vec<ButtonName>, ToolbarError> {
        if let Some(unknown) = names.iter().find(|name| !self.contains(name)) {
            return Err(ToolbarError::UnknownButton(unknown.clone()));
        }
        Ok(self
            .0
            .iter()
            .filter(|name| names.contains(name))
            .cloned()
            .collect())
    }

    /// Whether `names` are exactly the last `names.len()` declared buttons.
    pub fn is_trailing_run(&self, names: &[ButtonName]) -> bool {
        names.len() <= self.0.len() && self.0[self.0.len() - names.len()..] == *names
    }
}

pub type ButtonAction = Box<dyn FnMut()>;

/// One declared button.
pub struct Button {
    pub id: String,
    pub disabled: bool,
    action: Option<ButtonAction>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("id", &self.id)
            .field("disabled", &self.disabled)
            .field("action", &self.action.is_some())
            .finish()
    }
}

/// Identifiers of the elements the toolbar drives.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarElements {
    /// Button `save` lives at `<prefix>save`.
    pub button_prefix: String,
    pub jump_input: String,
    pub jump_max: String,
    pub bottom_previous: String,
    pub bottom_next: String,
    pub bottom_indicator: String,
    pub bottom_max: String,
}

impl Default for ToolbarElements {
    fn default() -> Self {
        Self::from_config(&ToolbarConfig::default())
    }
}

impl ToolbarElements {
    pub fn from_config(config: &ToolbarConfig) -> Self {
        Self {
            button_prefix: config.element_prefix.clone(),
            jump_input: config.jump_input_id.clone(),
            jump_max: config.jump_max_id.clone(),
            bottom_previous: config.bottom_previous_id.clone(),
            bottom_next: config.bottom_next_id.clone(),
            bottom_indicator: config.bottom_indicator_id.clone(),
            bottom_max: config.bottom_max_id.clone(),
        }
    }

    pub fn button_id(&self, name: &ButtonName) -> String {
        format!("{}{}", self.button_prefix, name)
    }
}

/// Durations (ms) and offsets of toolbar transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarTimings {
    pub slide_ms: f32,
    pub collapse_ms: f32,
    pub swap_lead_ms: f32,
    pub press_pulse_ms: f32,
    pub slide_offset_px: f64,
    pub easing: EasingFunction,
}

impl Default for ToolbarTimings {
    fn default() -> Self {
        Self::from_config(&TimingConfig::default())
    }
}

impl ToolbarTimings {
    pub fn from_config(config: &TimingConfig) -> Self {
        Self {
            slide_ms: config.slide_ms,
            collapse_ms: config.collapse_ms,
            swap_lead_ms: config.swap_lead_ms,
            press_pulse_ms: config.press_pulse_ms,
            slide_offset_px: config.slide_offset_px,
            easing: EasingFunction::from_name(&config.easing).unwrap_or_else(|| {
                warn!(easing = %config.easing, "toolbar: unknown easing, using swing");
                EasingFunction::default()
            }),
        }
    }
}

/// What one `update_buttons` call decided.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonTransition {
    pub to_hide: Vec<ButtonName>,
    pub to_show: Vec<ButtonName>,
    /// Length of the hide collapse phase.
    pub collapse_ms: f32,
    /// Length of the show metrics-restore phase.
    pub restore_ms: f32,
    /// Wait before the show starts.
    pub lead_delay_ms: f32,
}

impl ButtonTransition {
    pub fn is_noop(&self) -> bool {
        self.to_hide.is_empty() && self.to_show.is_empty()
    }
}

struct Run {
    sequencer: AnimationSequencer,
    buttons: Vec<ButtonName>,
}

impl Run {
    fn overlaps(&self, names: &[ButtonName]) -> bool {
        self.buttons.iter().any(|name| names.contains(name))
    }
}

/// Bottom navigation mirrors of previous/next and the page indicator.
#[derive(Debug, Clone)]
struct BottomNav {
    previous: String,
    next: String,
    indicator: String,
    max: String,
}

pub struct ToolbarController {
    universe: ButtonUniverse,
    elements: ToolbarElements,
    timings: ToolbarTimings,
    buttons: HashMap<ButtonName, Button>,
    active: Vec<ButtonName>,
    previous: Vec<ButtonName>,
    saved_metrics: HashMap<ButtonName, BoxMetrics>,
    hiding: Option<Run>,
    showing: Option<Run>,
    pulses: Timers<ButtonName>,
    jump_input: Option<String>,
    jump_max: Option<String>,
    bottom: Option<BottomNav>,
}

impl fmt::Debug for ToolbarController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolbarController")
            .field("active", &self.active)
            .field("previous", &self.previous)
            .field("hiding", &self.hiding.as_ref().map(|run| &run.buttons))
            .field("showing", &self.showing.as_ref().map(|run| &run.buttons))
            .finish()
    }
}

impl ToolbarController {
    /// Bind every declared button to its element and hide the initially
    /// hidden ones at once.
    pub fn new(
        universe: ButtonUniverse,
        elements: ToolbarElements,
        initially_hidden: &[ButtonName],
        timings: ToolbarTimings,
        surface: &mut dyn Surface,
    ) -> Result<Self, ToolbarError> {
        let mut buttons = HashMap::new();
        for name in universe.names() {
            let id = elements.button_id(name);
            if !surface.contains(&id) {
                error!(button = %name, id = %id, "toolbar: button element missing");
                return Err(ToolbarError::MissingElement(id));
            }
            buttons.insert(
                name.clone(),
                Button {
                    id,
                    disabled: false,
                    action: None,
                },
            );
        }

        let hidden = universe.normalize(initially_hidden)?;
        for name in &hidden {
            surface.set_style(&elements.button_id(name), "display", "none");
        }
        let active: Vec<ButtonName> = universe
            .names()
            .iter()
            .filter(|name| !hidden.contains(name))
            .cloned()
            .collect();

        let optional = |id: &str| surface.contains(id).then(|| id.to_string());
        let jump_input = optional(&elements.jump_input);
        let jump_max = optional(&elements.jump_max);
        let bottom = match (
            optional(&elements.bottom_previous),
            optional(&elements.bottom_next),
            optional(&elements.bottom_indicator),
            optional(&elements.bottom_max),
        ) {
            (Some(previous), Some(next), Some(indicator), Some(max)) => Some(BottomNav {
                previous,
                next,
                indicator,
                max,
            }),
            _ => {
                debug!("toolbar: no bottom navigation on this surface");
                None
            }
        };

        info!(buttons = universe.len(), active = active.len(), "toolbar: ready");
        Ok(Self {
            universe,
            elements,
            timings,
            buttons,
            previous: active.clone(),
            active,
            saved_metrics: HashMap::new(),
            hiding: None,
            showing: None,
            pulses: Timers::new(),
            jump_input,
            jump_max,
            bottom,
        })
    }

    pub fn from_config(
        toolbar: &ToolbarConfig,
        timing: &TimingConfig,
        surface: &mut dyn Surface,
    ) -> Result<Self, ToolbarError> {
        let hidden: Vec<ButtonName> = toolbar
            .initially_hidden
            .iter()
            .map(|name| ButtonName::from(name.as_str()))
            .collect();
        Self::new(
            ButtonUniverse::from_names(&toolbar.buttons),
            ToolbarElements::from_config(toolbar),
            &hidden,
            ToolbarTimings::from_config(timing),
            surface,
        )
    }

    pub fn universe(&self) -> &ButtonUniverse {
        &self.universe
    }

    pub fn timings(&self) -> ToolbarTimings {
        self.timings
    }

    /// Currently active buttons, in canonical order.
    pub fn active(&self) -> &[ButtonName] {
        &self.active
    }

    /// Active buttons before the last `update_buttons`.
    pub fn previous(&self) -> &[ButtonName] {
        &self.previous
    }

    pub fn is_active(&self, name: &ButtonName) -> bool {
        self.active.contains(name)
    }

    pub fn is_enabled(&self, name: &ButtonName) -> bool {
        self.buttons.get(name).is_some_and(|button| !button.disabled)
    }

    pub fn is_animating(&self) -> bool {
        self.hiding.is_some() || self.showing.is_some()
    }

    pub fn saved_metrics(&self, name: &ButtonName) -> Option<BoxMetrics> {
        self.saved_metrics.get(name).copied()
    }

    pub fn button_id(&self, name: &ButtonName) -> Result<&str, ToolbarError> {
        self.button(name).map(|button| button.id.as_str())
    }

    fn button(&self, name: &ButtonName) -> Result<&Button, ToolbarError> {
        self.buttons
            .get(name)
            .ok_or_else(|| ToolbarError::UnknownButton(name.clone()))
    }

    fn ids(&self, names: &[ButtonName]) -> Vec<String> {
        names
            .iter()
            .filter_map(|name| self.buttons.get(name))
            .map(|button| button.id.clone())
            .collect()
    }

    /// Make `new_set` the active set, hiding what left it and showing what
    /// joined it.
    pub fn update_buttons(
        &mut self,
        new_set: &[ButtonName],
        surface: &mut dyn Surface,
    ) -> Result<ButtonTransition, ToolbarError> {
        let new_set = self.universe.normalize(new_set)?;
        self.previous = std::mem::replace(&mut self.active, new_set);

        let to_hide: Vec<ButtonName> = self
            .previous
            .iter()
            .filter(|name| !self.active.contains(name))
            .cloned()
            .collect();
        let to_show: Vec<ButtonName> = self
            .active
            .iter()
            .filter(|name| !self.previous.contains(name))
            .cloned()
            .collect();

        let transition = ButtonTransition {
            collapse_ms: self.collapse_ms(),
            restore_ms: self.restore_ms(&to_show),
            lead_delay_ms: self.lead_delay_ms(),
            to_hide,
            to_show,
        };
        debug!(
            hide = ?transition.to_hide,
            show = ?transition.to_show,
            collapse_ms = transition.collapse_ms,
            restore_ms = transition.restore_ms,
            lead_delay_ms = transition.lead_delay_ms,
            "toolbar: update buttons"
        );

        self.hide(&transition.to_hide, surface)?;
        self.show(&transition.to_show, surface)?;
        Ok(transition)
    }

    fn swapped_entirely(&self) -> bool {
        !self.active.iter().any(|name| self.previous.contains(name))
    }

    fn collapse_ms(&self) -> f32 {
        if self.swapped_entirely() && !self.previous.is_empty() {
            0.0
        } else {
            self.timings.collapse_ms
        }
    }

    fn restore_ms(&self, incoming: &[ButtonName]) -> f32 {
        if self.universe.is_trailing_run(incoming)
            || self.previous.is_empty()
            || self.swapped_entirely()
        {
            0.0
        } else {
            self.timings.collapse_ms
        }
    }

    fn lead_delay_ms(&self) -> f32 {
        if self.swapped_entirely() && !self.previous.is_empty() {
            self.timings.swap_lead_ms
        } else {
            0.0
        }
    }

    /// Slide `names` out and collapse them, then drop them from layout.
    pub fn hide(
        &mut self,
        names: &[ButtonName],
        surface: &mut dyn Surface,
    ) -> Result<(), ToolbarError> {
        if names.is_empty() {
            return Ok(());
        }
        let names = self.universe.normalize(names)?;
        self.active.retain(|name| !names.contains(name));

        if self.showing.as_ref().is_some_and(|run| run.overlaps(&names)) {
            self.stop_show(surface);
        }
        self.stop_hide(surface);

        for name in &names {
            if self.saved_metrics.contains_key(name) {
                continue;
            }
            let id = self.button(name)?.id.clone();
            if let Some(metrics) = surface.box_metrics(&id) {
                self.saved_metrics.insert(name.clone(), metrics);
            }
        }

        let ids = self.ids(&names);
        let offset = format!("translateX({})", format_px(self.timings.slide_offset_px));
        let collapse_ms = self.collapse_ms();
        let sequence = AnimationSequence::new()
            .then_parallel(
                ids.iter()
                    .map(|id| {
                        AnimationStep::new(id.as_str(), self.timings.slide_ms)
                            .with_property("transform", offset.as_str())
                            .with_easing(self.timings.easing)
                    })
                    .collect(),
            )
            .then_parallel(
                ids.iter()
                    .map(|id| {
                        AnimationStep::new(id.as_str(), collapse_ms)
                            .with_properties(BoxMetrics::zero().to_properties())
                            .with_easing(self.timings.easing)
                    })
                    .collect(),
            );

        let sequencer = AnimationSequencer::start(sequence, surface)?;
        trace!(id = sequencer.id().0, buttons = ?names, collapse_ms, "toolbar: hide");
        self.hiding = Some(Run {
            sequencer,
            buttons: names,
        });
        Ok(())
    }

    /// Bring `names` back into layout, restore their metrics and slide them in.
    pub fn show(
        &mut self,
        names: &[ButtonName],
        surface: &mut dyn Surface,
    ) -> Result<(), ToolbarError> {
        if names.is_empty() {
            return Ok(());
        }
        let names = self.universe.normalize(names)?;
        self.active = self
            .universe
            .names()
            .iter()
            .filter(|name| self.active.contains(name) || names.contains(name))
            .cloned()
            .collect();

        if self.hiding.as_ref().is_some_and(|run| run.overlaps(&names)) {
            self.stop_hide(surface);
        }
        self.stop_show(surface);

        let restore_ms = self.restore_ms(&names);
        let lead_delay_ms = self.lead_delay_ms();
        let mut sequence = AnimationSequence::new();
        if lead_delay_ms > 0.0 {
            sequence = sequence.then(AnimationStep::wait(lead_delay_ms));
        }

        let mut reveal = Vec::with_capacity(names.len());
        let mut restore = Vec::with_capacity(names.len());
        let mut slide = Vec::with_capacity(names.len());
        for name in &names {
            let id = self.button(name)?.id.as_str();
            reveal.push(AnimationStep::new(id, 0.0).with_property("display", "block"));
            let metrics = self
                .saved_metrics
                .get(name)
                .map(BoxMetrics::to_properties)
                .unwrap_or_default();
            restore.push(
                AnimationStep::new(id, restore_ms)
                    .with_properties(metrics)
                    .with_easing(self.timings.easing),
            );
            slide.push(
                AnimationStep::new(id, self.timings.slide_ms)
                    .with_property("transform", "translateX(0px)")
                    .with_easing(self.timings.easing),
            );
        }
        let sequence = sequence
            .then_parallel(reveal)
            .then_parallel(restore)
            .then_parallel(slide);

        let sequencer = AnimationSequencer::start(sequence, surface)?;
        trace!(
            id = sequencer.id().0,
            buttons = ?names,
            restore_ms,
            lead_delay_ms,
            "toolbar: show"
        );
        self.showing = Some(Run {
            sequencer,
            buttons: names,
        });
        Ok(())
    }

    fn stop_hide(&mut self, surface: &mut dyn Surface) {
        if let Some(mut run) = self.hiding.take() {
            run.sequencer.stop(surface);
            self.settle_hide(&run.buttons, surface);
        }
    }

    fn stop_show(&mut self, surface: &mut dyn Surface) {
        if let Some(mut run) = self.showing.take() {
            run.sequencer.stop(surface);
            self.settle_show(&run.buttons, surface);
        }
    }

    /// Buttons that are still inactive leave layout.
    fn settle_hide(&mut self, buttons: &[ButtonName], surface: &mut dyn Surface) {
        for name in buttons.iter().filter(|name| !self.active.contains(name)) {
            if let Some(button) = self.buttons.get(name) {
                surface.set_style(&button.id, "display", "none");
            }
        }
    }

    /// Buttons that are still active fall back to their stylesheet look.
    fn settle_show(&mut self, buttons: &[ButtonName], surface: &mut dyn Surface) {
        for name in buttons.iter().filter(|name| self.active.contains(name)) {
            if let Some(button) = self.buttons.get(name) {
                surface.clear_styles(&button.id);
            }
            self.saved_metrics.remove(name);
        }
    }

    /// Toggle the `disabled` state; previous/next also toggle their bottom
    /// navigation mirrors.
    pub fn set_enabled(
        &mut self,
        name: &ButtonName,
        enabled: bool,
        surface: &mut dyn Surface,
    ) -> Result<(), ToolbarError> {
        let button = self
            .buttons
            .get_mut(name)
            .ok_or_else(|| ToolbarError::UnknownButton(name.clone()))?;
        button.disabled = !enabled;
        if enabled {
            surface.remove_class(&button.id, DISABLED_CLASS);
        } else {
            surface.add_class(&button.id, DISABLED_CLASS);
        }

        if let Some(bottom) = &self.bottom {
            let mirror = match name {
                ButtonName::Previous => Some(&bottom.previous),
                ButtonName::Next => Some(&bottom.next),
                _ => None,
            };
            if let Some(mirror) = mirror {
                let visibility = if enabled { "visible" } else { "hidden" };
                surface.set_style(mirror, "visibility", visibility);
            }
        }
        Ok(())
    }

    /// Show `page` in the jump input and the bottom indicator.
    pub fn set_jump_value(&self, page: usize, surface: &mut dyn Surface) {
        let page = page.to_string();
        if let Some(input) = &self.jump_input {
            surface.set_value(input, &page);
        }
        if let Some(bottom) = &self.bottom {
            surface.set_html(&bottom.indicator, &page);
        }
    }

    pub fn set_jump_range(&self, min: usize, max: usize, surface: &mut dyn Surface) {
        let max = max.to_string();
        if let Some(input) = &self.jump_input {
            surface.set_attribute(input, "min", &min.to_string());
            surface.set_attribute(input, "max", &max);
        }
        if let Some(label) = &self.jump_max {
            surface.set_html(label, &max);
        }
        if let Some(bottom) = &self.bottom {
            surface.set_html(&bottom.max, &max);
        }
    }

    /// Page number typed into the jump input, if it parses.
    pub fn jump_value(&self, surface: &dyn Surface) -> Option<usize> {
        let input = self.jump_input.as_ref()?;
        surface.value(input)?.trim().parse().ok()
    }

    /// Pressed pulse on a click. Returns `false` for a disabled button.
    pub fn press(&mut self, name: &ButtonName, surface: &mut dyn Surface) -> Result<bool, ToolbarError> {
        let button = self.button(name)?;
        if button.disabled {
            trace!(button = %name, "toolbar: disabled button ignored");
            return Ok(false);
        }
        surface.add_class(&button.id, PRESSED_CLASS);
        self.pulses.cancel_where(|pending| pending == name);
        self.pulses.schedule(self.timings.press_pulse_ms, name.clone());
        Ok(true)
    }

    pub fn set_action<F>(&mut self, name: &ButtonName, action: F) -> Result<(), ToolbarError>
    where
        F: FnMut() + 'static,
    {
        let button = self
            .buttons
            .get_mut(name)
            .ok_or_else(|| ToolbarError::UnknownButton(name.clone()))?;
        button.action = Some(Box::new(action));
        Ok(())
    }

    /// Run the action bound to `name`. Returns `false` when it is disabled.
    pub fn invoke(&mut self, name: &ButtonName) -> Result<bool, ToolbarError> {
        let button = self
            .buttons
            .get_mut(name)
            .ok_or_else(|| ToolbarError::UnknownButton(name.clone()))?;
        if button.disabled {
            return Ok(false);
        }
        match button.action.as_mut() {
            Some(action) => action(),
            None => info!(button = %name, "toolbar: {name}"),
        }
        Ok(true)
    }

    /// Advance running transitions and press pulses.
    pub fn update(&mut self, delta_ms: f32, surface: &mut dyn Surface) {
        let hide_done = self
            .hiding
            .as_mut()
            .is_some_and(|run| run.sequencer.update(delta_ms, surface).is_done());
        if hide_done {
            if let Some(run) = self.hiding.take() {
                trace!(buttons = ?run.buttons, "toolbar: hide settled");
                self.settle_hide(&run.buttons, surface);
            }
        }

        let show_done = self
            .showing
            .as_mut()
            .is_some_and(|run| run.sequencer.update(delta_ms, surface).is_done());
        if show_done {
            if let Some(run) = self.showing.take() {
                trace!(buttons = ?run.buttons, "toolbar: show settled");
                self.settle_show(&run.buttons, surface);
            }
        }

        for name in self.pulses.update(delta_ms) {
            match self.buttons.get(&name) {
                Some(button) => surface.remove_class(&button.id, PRESSED_CLASS),
                None => warn!(button = %name, "toolbar: pulse for unknown button"),
            }
        }
    }
}
