//! The paper: declared pages sharing one toolbar.
//!
//! Each page owns a [`PageSequencer`] bound to the element carrying the
//! page id. Toolbar clicks are dispatched at click time against whichever
//! page is active, so switching tabs never leaves a button pointing at a
//! stale document.

use std::fmt;

use paper_config::PaperConfig;
use paper_surface::{LayoutProbe, Surface, Viewport};
use tracing::{debug, info, trace, warn};

use crate::navigation::{BottomNavSide, TabShown};
use crate::pagination::{DisplayHooks, PageContent, PageOptions, PageSequencer, PaginationError};
use crate::timers::Timers;
use crate::toolbar::{ButtonName, ToolbarController, ToolbarError};

#[derive(Debug, thiserror::Error)]
pub enum PaperError {
    #[error("no pages declared")]
    NoPages,
    #[error("page '{0}' is declared more than once")]
    DuplicatePage(String),
    #[error("unknown page '{0}'")]
    UnknownPage(String),
    #[error(transparent)]
    Toolbar(#[from] ToolbarError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

/// Declaration of one page.
#[derive(Debug, Clone)]
pub struct PageSpec {
    /// Identifier of the page's content element, also its tab target.
    pub id: String,
    /// Buttons the toolbar shows while this page is active.
    pub toolbar: Vec<ButtonName>,
    pub content: PageContent,
    pub hooks: DisplayHooks,
    pub initial_page: usize,
}

impl PageSpec {
    pub fn new(id: impl Into<String>, toolbar: Vec<ButtonName>, content: PageContent) -> Self {
        Self {
            id: id.into(),
            toolbar,
            content,
            hooks: DisplayHooks::None,
            initial_page: 1,
        }
    }

    pub fn with_hooks(mut self, hooks: DisplayHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_initial_page(mut self, page: usize) -> Self {
        self.initial_page = page;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaperOptions {
    pub fade_ms: f32,
    pub bottom_nav_delay_ms: f32,
    /// Element scrolled into view before a bottom navigation click.
    pub scroll_anchor: String,
    /// Page size used when a page element reports none.
    pub fallback_viewport: Option<Viewport>,
}

impl Default for PaperOptions {
    fn default() -> Self {
        Self::from_config(&PaperConfig::default())
    }
}

impl PaperOptions {
    pub fn from_config(config: &PaperConfig) -> Self {
        Self {
            fade_ms: config.timing.page_fade_ms,
            bottom_nav_delay_ms: config.timing.bottom_nav_delay_ms,
            scroll_anchor: config.toolbar.scroll_anchor_id.clone(),
            fallback_viewport: Some(Viewport::new(
                config.pagination.viewport_width,
                config.pagination.viewport_height,
            )),
        }
    }
}

struct Page {
    id: String,
    toolbar: Vec<ButtonName>,
    sequencer: PageSequencer,
}

pub struct Paper {
    pages: Vec<Page>,
    toolbar: ToolbarController,
    active: Option<usize>,
    options: PaperOptions,
    deferred_clicks: Timers<ButtonName>,
}

impl fmt::Debug for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paper")
            .field("pages", &self.page_ids().collect::<Vec<_>>())
            .field("active", &self.active_page())
            .field("toolbar", &self.toolbar)
            .finish()
    }
}

impl Paper {
    /// Paginate every declared page. Nothing is displayed until a tab is shown.
    pub fn new(
        specs: Vec<PageSpec>,
        toolbar: ToolbarController,
        options: PaperOptions,
        probe: &mut dyn LayoutProbe,
        surface: &dyn Surface,
    ) -> Result<Self, PaperError> {
        if specs.is_empty() {
            return Err(PaperError::NoPages);
        }

        let mut pages: Vec<Page> = Vec::with_capacity(specs.len());
        for spec in specs {
            if pages.iter().any(|page| page.id == spec.id) {
                return Err(PaperError::DuplicatePage(spec.id));
            }
            let buttons = toolbar.universe().normalize(&spec.toolbar)?;
            let page_options = PageOptions {
                initial_page: spec.initial_page,
                hooks: spec.hooks,
                fade_ms: options.fade_ms,
                fallback_viewport: options.fallback_viewport,
            };
            let sequencer =
                PageSequencer::new(spec.id.as_str(), spec.content, page_options, probe, surface)?;
            debug!(page = %spec.id, total = sequencer.total(), buttons = ?buttons, "paper: page declared");
            pages.push(Page {
                id: spec.id,
                toolbar: buttons,
                sequencer,
            });
        }

        Ok(Self {
            pages,
            toolbar,
            active: None,
            options,
            deferred_clicks: Timers::new(),
        })
    }

    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.id.as_str())
    }

    pub fn active_page(&self) -> Option<&str> {
        self.active.map(|index| self.pages[index].id.as_str())
    }

    pub fn page(&self, id: &str) -> Option<&PageSequencer> {
        self.pages
            .iter()
            .find(|page| page.id == id)
            .map(|page| &page.sequencer)
    }

    pub fn active_sequencer(&self) -> Option<&PageSequencer> {
        self.active.map(|index| &self.pages[index].sequencer)
    }

    pub fn toolbar(&self) -> &ToolbarController {
        &self.toolbar
    }

    pub fn toolbar_mut(&mut self) -> &mut ToolbarController {
        &mut self.toolbar
    }

    /// Show the first declared page, as the host does on load.
    pub fn activate_first(&mut self, surface: &mut dyn Surface) -> Result<(), PaperError> {
        let first = self.pages[0].id.clone();
        self.handle_tab_shown(&TabShown::new(first), surface)
    }

    /// Switch to the page behind `event.target`.
    pub fn handle_tab_shown(
        &mut self,
        event: &TabShown,
        surface: &mut dyn Surface,
    ) -> Result<(), PaperError> {
        let target = event.target_id();
        let index = self
            .pages
            .iter()
            .position(|page| page.id == target)
            .ok_or_else(|| {
                warn!(page = target, "paper: tab for unknown page");
                PaperError::UnknownPage(target.to_string())
            })?;

        let page = &mut self.pages[index];
        let current = page.sequencer.current();
        page.sequencer.change_page(current, false, surface)?;
        self.toolbar.update_buttons(&page.toolbar, surface)?;
        self.active = Some(index);
        info!(
            page = target,
            related = event.related_id(),
            current,
            total = page.sequencer.total(),
            "paper: tab shown"
        );
        self.sync_navigation(surface)
    }

    /// Reflect the active page position in previous/next and the jump input.
    pub fn sync_navigation(&mut self, surface: &mut dyn Surface) -> Result<(), PaperError> {
        let Some(index) = self.active else {
            return Ok(());
        };
        let sequencer = &self.pages[index].sequencer;
        let (current, total) = (sequencer.current(), sequencer.total());
        let (first, last) = (sequencer.is_first(), sequencer.is_last());

        for (name, enabled) in [(ButtonName::Previous, !first), (ButtonName::Next, !last)] {
            if self.toolbar.universe().contains(&name) {
                self.toolbar.set_enabled(&name, enabled, surface)?;
            }
        }
        self.toolbar.set_jump_value(current, surface);
        self.toolbar.set_jump_range(1, total, surface);
        Ok(())
    }

    /// A toolbar click. Returns `false` when the button is hidden or disabled.
    pub fn click(&mut self, name: &ButtonName, surface: &mut dyn Surface) -> Result<bool, PaperError> {
        if !self.toolbar.is_active(name) {
            trace!(button = %name, "paper: click on hidden button ignored");
            return Ok(false);
        }
        if !self.toolbar.press(name, surface)? {
            return Ok(false);
        }
        if !name.is_navigation() {
            return Ok(self.toolbar.invoke(name)?);
        }

        let Some(index) = self.active else {
            warn!(button = %name, "paper: navigation before any page is shown");
            return Ok(false);
        };
        let jump = self.toolbar.jump_value(surface);
        let sequencer = &mut self.pages[index].sequencer;
        let moved = match name {
            ButtonName::Previous => sequencer.previous_page(surface),
            ButtonName::Next => sequencer.next_page(surface),
            _ => jump.is_some_and(|page| sequencer.jump_to_page(page, surface)),
        };
        debug!(
            page = %self.pages[index].id,
            button = %name,
            moved,
            current = self.pages[index].sequencer.current(),
            "paper: navigate"
        );
        self.sync_navigation(surface)?;
        Ok(true)
    }

    /// Bottom navigation: jump the view to the anchor, then click the
    /// matching toolbar button once the scroll has settled.
    pub fn click_bottom_nav(&mut self, side: BottomNavSide, surface: &mut dyn Surface) {
        if surface.contains(&self.options.scroll_anchor) {
            surface.scroll_into_view(&self.options.scroll_anchor);
        }
        self.deferred_clicks
            .schedule(self.options.bottom_nav_delay_ms, side.button());
    }

    /// Advance toolbar transitions, page fades and deferred clicks.
    pub fn update(&mut self, delta_ms: f32, surface: &mut dyn Surface) {
        self.toolbar.update(delta_ms, surface);
        for page in &mut self.pages {
            page.sequencer.update(delta_ms, surface);
        }
        for name in self.deferred_clicks.update(delta_ms) {
            if let Err(err) = self.click(&name, surface) {
                warn!(button = %name, error = %err, "paper: deferred click failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbar::{ButtonUniverse, ToolbarElements, ToolbarTimings};
    use paper_surface::{BoxMetrics, ElementState, HeadlessSurface, TextFlowProbe};

    fn surface() -> HeadlessSurface {
        let mut surface = HeadlessSurface::new();
        for name in ButtonUniverse::default().names() {
            surface.insert(
                format!("paper-{name}"),
                ElementState::with_metrics(BoxMetrics::new(40.0, 4.0, 8.0)),
            );
        }
        surface.insert("paper-jumpto-input", ElementState::default());
        for id in ["a", "b"] {
            surface.insert(id, ElementState::with_viewport(Viewport::new(300.0, 100.0)));
        }
        surface
    }

    fn toolbar(surface: &mut HeadlessSurface) -> ToolbarController {
        ToolbarController::new(
            ButtonUniverse::default(),
            ToolbarElements::default(),
            &[],
            ToolbarTimings::default(),
            surface,
        )
        .unwrap()
    }

    fn pages(n: usize) -> PageContent {
        PageContent::Split((1..=n).map(|i| format!("<p>{i}</p>")).collect())
    }

    #[test]
    fn rejects_bad_declarations() {
        let mut surface = surface();
        let mut probe = TextFlowProbe::default();

        let tb = toolbar(&mut surface);
        let err = Paper::new(vec![], tb, PaperOptions::default(), &mut probe, &surface).unwrap_err();
        assert!(matches!(err, PaperError::NoPages));

        let tb = toolbar(&mut surface);
        let specs = vec![
            PageSpec::new("a", vec![ButtonName::Save], pages(1)),
            PageSpec::new("a", vec![ButtonName::Save], pages(1)),
        ];
        let err = Paper::new(specs, tb, PaperOptions::default(), &mut probe, &surface).unwrap_err();
        assert!(matches!(err, PaperError::DuplicatePage(id) if id == "a"));

        let tb = toolbar(&mut surface);
        let specs = vec![PageSpec::new("missing", vec![], pages(1))];
        let err = Paper::new(specs, tb, PaperOptions::default(), &mut probe, &surface).unwrap_err();
        assert!(matches!(
            err,
            PaperError::Pagination(PaginationError::MissingContainer(_))
        ));
    }

    #[test]
    fn clicks_follow_the_active_page() {
        let mut surface = surface();
        let mut probe = TextFlowProbe::default();
        let tb = toolbar(&mut surface);
        let all = ButtonUniverse::default().names().to_vec();
        let specs = vec![
            PageSpec::new("a", all.clone(), pages(3)),
            PageSpec::new("b", all, pages(3)),
        ];
        let mut paper = Paper::new(specs, tb, PaperOptions::default(), &mut probe, &surface).unwrap();
        paper.activate_first(&mut surface).unwrap();

        assert!(paper.click(&ButtonName::Next, &mut surface).unwrap());
        paper.handle_tab_shown(&TabShown::new("#b"), &mut surface).unwrap();
        assert!(paper.click(&ButtonName::Next, &mut surface).unwrap());
        assert!(paper.click(&ButtonName::Next, &mut surface).unwrap());

        assert_eq!(paper.page("a").map(PageSequencer::current), Some(2));
        assert_eq!(paper.page("b").map(PageSequencer::current), Some(3));
        assert!(!paper.toolbar().is_enabled(&ButtonName::Next));
        assert!(!paper.click(&ButtonName::Next, &mut surface).unwrap());
    }

    #[test]
    fn unknown_tab_is_an_error() {
        let mut surface = surface();
        let mut probe = TextFlowProbe::default();
        let tb = toolbar(&mut surface);
        let specs = vec![PageSpec::new("a", vec![], pages(1))];
        let mut paper = Paper::new(specs, tb, PaperOptions::default(), &mut probe, &surface).unwrap();

        let err = paper
            .handle_tab_shown(&TabShown::new("#nowhere"), &mut surface)
            .unwrap_err();
        assert!(matches!(err, PaperError::UnknownPage(id) if id == "nowhere"));
        assert_eq!(paper.active_page(), None);
    }
}
