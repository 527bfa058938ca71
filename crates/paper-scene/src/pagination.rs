//! Splitting a document into viewport-sized pages and moving between them.

use std::fmt;
use std::rc::Rc;

use paper_ir::{Fragment, FragmentNode, join_html};
use paper_surface::{LayoutProbe, Surface, Viewport};
use tracing::{debug, error, trace};

use crate::timers::Timers;

/// Side effect run each time a page is displayed, after its content is swapped in.
pub type DisplayHook = Rc<dyn Fn()>;

/// Document content: one blob to paginate, or pages taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    Single(String),
    Split(Vec<String>),
}

impl From<&str> for PageContent {
    fn from(html: &str) -> Self {
        Self::Single(html.to_string())
    }
}

impl From<Vec<String>> for PageContent {
    fn from(pages: Vec<String>) -> Self {
        Self::Split(pages)
    }
}

#[derive(Clone, Default)]
pub enum DisplayHooks {
    #[default]
    None,
    /// Every page runs the same hook.
    Shared(DisplayHook),
    /// Hook per page; missing trailing entries mean no hook.
    PerPage(Vec<Option<DisplayHook>>),
}

impl fmt::Debug for DisplayHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Shared(_) => f.write_str("Shared"),
            Self::PerPage(hooks) => f
                .debug_list()
                .entries(hooks.iter().map(Option::is_some))
                .finish(),
        }
    }
}

impl DisplayHooks {
    fn expand(self, total: usize) -> Vec<Option<DisplayHook>> {
        match self {
            Self::None => vec![None; total],
            Self::Shared(hook) => vec![Some(hook); total],
            Self::PerPage(mut hooks) => {
                hooks.resize(total, None);
                hooks
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageOptions {
    /// 1-based page shown first.
    pub initial_page: usize,
    pub hooks: DisplayHooks,
    /// Fade-out time before an animated content swap.
    pub fade_ms: f32,
    /// Size used when the container reports none.
    pub fallback_viewport: Option<Viewport>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            initial_page: 1,
            hooks: DisplayHooks::None,
            fade_ms: 150.0,
            fallback_viewport: None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PaginationError {
    #[error("page container '{0}' not found on the surface")]
    MissingContainer(String),
    #[error("page container '{0}' has no size to paginate against")]
    MissingViewport(String),
    #[error("page {page} is outside 1..={total}")]
    PageOutOfRange { page: usize, total: usize },
}

/// Split `html` into pages whose top-level nodes fit in `viewport`.
///
/// Nodes are never split. A node taller than the viewport on its own becomes
/// a page by itself, and whitespace or comment nodes never open a new page.
/// Empty input yields one empty page.
pub fn paginate(html: &str, viewport: Viewport, probe: &mut dyn LayoutProbe) -> Vec<String> {
    let fragment = Fragment::parse(html);
    let mut pages = Vec::new();
    let mut current: Vec<FragmentNode> = Vec::new();

    for node in fragment.nodes {
        let opens_page = !node.is_blank();
        current.push(node);
        if !opens_page || !current[..current.len() - 1].iter().any(|n| !n.is_blank()) {
            continue;
        }
        if probe.measure(&current, viewport.width) > viewport.height {
            let overflow = current.pop();
            pages.push(join_html(&current));
            current = overflow.into_iter().collect();
        }
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(join_html(&current));
    }
    debug!(
        pages = pages.len(),
        width = viewport.width,
        height = viewport.height,
        "pagination: paginated"
    );
    pages
}

/// Pages of one document bound to one container element.
pub struct PageSequencer {
    container: String,
    pages: Vec<String>,
    hooks: Vec<Option<DisplayHook>>,
    current: usize,
    displayed: Option<usize>,
    fade_ms: f32,
    pending: Timers<usize>,
}

impl fmt::Debug for PageSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSequencer")
            .field("container", &self.container)
            .field("current", &self.current)
            .field("total", &self.pages.len())
            .field("displayed", &self.displayed)
            .finish()
    }
}

impl PageSequencer {
    /// Paginate `content` once; nothing is displayed until a page is changed to.
    pub fn new(
        container: impl Into<String>,
        content: PageContent,
        options: PageOptions,
        probe: &mut dyn LayoutProbe,
        surface: &dyn Surface,
    ) -> Result<Self, PaginationError> {
        let container = container.into();
        if !surface.contains(&container) {
            error!(container = %container, "pagination: container missing");
            return Err(PaginationError::MissingContainer(container));
        }

        let pages = match content {
            PageContent::Single(html) => {
                let viewport = surface
                    .viewport(&container)
                    .or(options.fallback_viewport)
                    .ok_or_else(|| PaginationError::MissingViewport(container.clone()))?;
                paginate(&html, viewport, probe)
            }
            PageContent::Split(pages) if pages.is_empty() => vec![String::new()],
            PageContent::Split(pages) => pages,
        };

        let total = pages.len();
        if !(1..=total).contains(&options.initial_page) {
            return Err(PaginationError::PageOutOfRange {
                page: options.initial_page,
                total,
            });
        }

        debug!(container = %container, total, initial = options.initial_page, "pagination: ready");
        Ok(Self {
            container,
            hooks: options.hooks.expand(total),
            pages,
            current: options.initial_page,
            displayed: None,
            fade_ms: options.fade_ms,
            pending: Timers::new(),
        })
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Current 1-based page.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_html(&self, page: usize) -> Option<&str> {
        self.pages.get(page.checked_sub(1)?).map(String::as_str)
    }

    /// Page whose content is in the container right now.
    pub fn displayed(&self) -> Option<usize> {
        self.displayed
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.pages.len()
    }

    /// Whether an animated swap is waiting for its fade-out.
    pub fn is_fading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Display `page`.
    ///
    /// Without animation the content is swapped and the hook run right away.
    /// With animation the container fades out first and the swap happens in
    /// a later `update`; a newer change replaces a pending one.
    pub fn change_page(
        &mut self,
        page: usize,
        animate: bool,
        surface: &mut dyn Surface,
    ) -> Result<(), PaginationError> {
        let total = self.pages.len();
        if !(1..=total).contains(&page) {
            return Err(PaginationError::PageOutOfRange { page, total });
        }
        self.current = page;
        let superseded = self.pending.cancel_where(|_| true) > 0;
        trace!(container = %self.container, page, animate, superseded, "pagination: change page");

        if animate {
            surface.set_style(&self.container, "opacity", "0");
            self.pending.schedule(self.fade_ms, page);
        } else {
            self.swap(page, surface);
            if superseded {
                surface.set_style(&self.container, "opacity", "1");
            }
        }
        Ok(())
    }

    fn swap(&mut self, page: usize, surface: &mut dyn Surface) {
        let index = page - 1;
        surface.set_html(&self.container, &self.pages[index]);
        self.displayed = Some(page);
        if let Some(hook) = &self.hooks[index] {
            hook();
        }
    }

    /// Animated move to the next page. `false` on the last page.
    pub fn next_page(&mut self, surface: &mut dyn Surface) -> bool {
        if self.is_last() {
            trace!(container = %self.container, "pagination: already on last page");
            return false;
        }
        self.change_page(self.current + 1, true, surface).is_ok()
    }

    /// Animated move to the previous page. `false` on the first page.
    pub fn previous_page(&mut self, surface: &mut dyn Surface) -> bool {
        if self.is_first() {
            trace!(container = %self.container, "pagination: already on first page");
            return false;
        }
        self.change_page(self.current - 1, true, surface).is_ok()
    }

    /// Animated move to `page`. `false` when out of range or already there.
    pub fn jump_to_page(&mut self, page: usize, surface: &mut dyn Surface) -> bool {
        if page < 1 || page > self.pages.len() || page == self.current {
            trace!(container = %self.container, page, "pagination: jump ignored");
            return false;
        }
        self.change_page(page, true, surface).is_ok()
    }

    /// Complete a pending swap once its fade-out has elapsed.
    pub fn update(&mut self, delta_ms: f32, surface: &mut dyn Surface) {
        for page in self.pending.update(delta_ms) {
            self.swap(page, surface);
            surface.set_style(&self.container, "opacity", "1");
        }
    }
}
