//! A four-section archive document driven through a full session.

use std::cell::Cell;
use std::rc::Rc;

use paper_scene::{
    BottomNavSide, ButtonName, ButtonUniverse, DisplayHooks, PageContent, PageSpec, Paper,
    PaperError, PaperOptions, TabShown, ToolbarController, ToolbarElements, ToolbarTimings,
};
use paper_surface::{BoxMetrics, ElementState, HeadlessSurface, Surface, TextFlowProbe, Viewport};

use ButtonName::*;

const SECTIONS: [&str; 4] = ["paper-report", "paper-insights", "paper-history", "paper-settings"];

fn archive_surface() -> HeadlessSurface {
    let mut surface = HeadlessSurface::new();
    for name in ButtonUniverse::default().names() {
        surface.insert(
            format!("paper-{name}"),
            ElementState::with_metrics(BoxMetrics::new(36.0, 4.0, 6.0)),
        );
    }
    for id in [
        "paper-jumpto-input",
        "paper-jumpto-max",
        "paper-bottom-nav-previous",
        "paper-bottom-nav-next",
        "paper-bottom-nav-indicator",
        "paper-bottom-nav-indicator-max",
        "main-content",
    ] {
        surface.insert(id, ElementState::default());
    }
    for id in SECTIONS {
        surface.insert(id, ElementState::with_viewport(Viewport::new(300.0, 100.0)));
    }
    surface
}

fn split(prefix: &str, total: usize) -> PageContent {
    PageContent::Split((1..=total).map(|n| format!("<p>{prefix} {n}</p>")).collect())
}

struct Session {
    paper: Paper,
    surface: HeadlessSurface,
    charts: Rc<Cell<u32>>,
    saves: Rc<Cell<u32>>,
}

impl Session {
    fn new() -> Self {
        let mut surface = archive_surface();
        let mut toolbar = ToolbarController::new(
            ButtonUniverse::default(),
            ToolbarElements::default(),
            &[],
            ToolbarTimings::default(),
            &mut surface,
        )
        .unwrap();

        let saves = Rc::new(Cell::new(0));
        let counter = saves.clone();
        toolbar
            .set_action(&Save, move || counter.set(counter.get() + 1))
            .unwrap();

        let charts = Rc::new(Cell::new(0));
        let drawn = charts.clone();
        let report = (1..=12)
            .map(|n| format!("<p>finding {n}</p>"))
            .collect::<String>();
        let specs = vec![
            PageSpec::new(
                "paper-report",
                vec![Previous, JumpTo, Next, Save, Print, Email],
                PageContent::Single(report),
            ),
            PageSpec::new("paper-insights", vec![Save, Print, Email], split("chart", 1))
                .with_hooks(DisplayHooks::Shared(Rc::new(move || {
                    drawn.set(drawn.get() + 1)
                }))),
            PageSpec::new("paper-history", vec![Previous, JumpTo, Next], split("entry", 6)),
            PageSpec::new("paper-settings", vec![Previous, JumpTo, Next], split("option", 2)),
        ];

        let mut probe = TextFlowProbe::new(20.0, 10.0);
        let paper = Paper::new(specs, toolbar, PaperOptions::default(), &mut probe, &surface).unwrap();
        Self {
            paper,
            surface,
            charts,
            saves,
        }
    }

    fn tick(&mut self, ms: f32) {
        self.paper.update(ms, &mut self.surface);
    }

    /// Run whole frames for `ms`.
    fn run(&mut self, ms: f32) {
        let frames = (ms / 16.0).ceil() as usize;
        for _ in 0..frames {
            self.tick(16.0);
        }
    }

    fn show(&mut self, id: &str) {
        self.paper
            .handle_tab_shown(&TabShown::new(format!("#{id}")), &mut self.surface)
            .unwrap();
    }

    fn click(&mut self, name: ButtonName) -> bool {
        self.paper.click(&name, &mut self.surface).unwrap()
    }

    fn html(&self, id: &str) -> String {
        self.surface.html(id).unwrap_or_default()
    }

    fn display(&self, name: &ButtonName) -> Option<String> {
        self.surface.style(&format!("paper-{name}"), "display")
    }

    fn disabled(&self, name: &ButtonName) -> bool {
        self.surface.has_class(&format!("paper-{name}"), "disabled")
    }
}

#[test]
fn nothing_is_displayed_before_a_tab_is_shown() {
    let session = Session::new();
    assert_eq!(session.paper.active_page(), None);
    for id in SECTIONS {
        assert_eq!(session.surface.html_writes(id), 0);
    }
    assert_eq!(session.paper.page("paper-report").map(|p| p.total()), Some(3));
}

#[test]
fn report_navigation_with_toolbar_and_bottom_nav() {
    let mut session = Session::new();
    session.paper.activate_first(&mut session.surface).unwrap();

    let report = session.paper.page("paper-report").unwrap();
    let first = report.page_html(1).unwrap().to_string();
    let third = report.page_html(3).unwrap().to_string();
    assert_eq!(session.html("paper-report"), first);
    assert!(session.disabled(&Previous));
    assert!(!session.disabled(&Next));
    assert_eq!(
        session.surface.style("paper-bottom-nav-previous", "visibility").as_deref(),
        Some("hidden")
    );
    assert_eq!(session.surface.value("paper-jumpto-input").as_deref(), Some("1"));
    assert_eq!(session.html("paper-jumpto-max"), "3");

    assert!(session.click(Next));
    assert_eq!(session.surface.style("paper-report", "opacity").as_deref(), Some("0"));
    session.tick(150.0);
    assert_eq!(session.paper.active_sequencer().map(|p| p.displayed()), Some(Some(2)));
    assert_eq!(session.html("paper-bottom-nav-indicator"), "2");
    assert!(!session.disabled(&Previous));

    session
        .paper
        .click_bottom_nav(BottomNavSide::Next, &mut session.surface);
    assert_eq!(session.surface.scrolls("main-content"), 1);
    session.tick(249.0);
    assert_eq!(session.paper.active_sequencer().map(|p| p.current()), Some(2));
    session.tick(1.0);
    assert_eq!(session.paper.active_sequencer().map(|p| p.current()), Some(3));
    session.tick(150.0);

    assert_eq!(session.html("paper-report"), third);
    assert!(session.disabled(&Next));
    assert_eq!(
        session.surface.style("paper-bottom-nav-next", "visibility").as_deref(),
        Some("hidden")
    );
    assert!(!session.click(Next));
}

#[test]
fn switching_sections_swaps_the_toolbar() {
    let mut session = Session::new();
    session.paper.activate_first(&mut session.surface).unwrap();

    session.show("paper-insights");
    assert_eq!(session.charts.get(), 1);
    assert_eq!(session.paper.toolbar().active(), &[Save, Print, Email]);
    session.run(700.0);
    for name in [Previous, JumpTo, Next] {
        assert_eq!(session.display(&name).as_deref(), Some("none"));
    }
    assert_eq!(session.display(&Save), None);

    assert!(!session.click(Previous));
    assert!(session.click(Save));
    assert_eq!(session.saves.get(), 1);

    session.show("paper-history");
    session.run(700.0);
    for name in [Save, Print, Email] {
        assert_eq!(session.display(&name).as_deref(), Some("none"));
    }
    for name in [Previous, JumpTo, Next] {
        assert_eq!(session.display(&name), None);
        assert!(session.paper.toolbar().saved_metrics(&name).is_none());
    }
    assert!(!session.paper.toolbar().is_animating());

    session.show("paper-insights");
    assert_eq!(session.charts.get(), 2);
}

#[test]
fn jump_and_per_section_state() {
    let mut session = Session::new();
    session.paper.activate_first(&mut session.surface).unwrap();
    session.click(Next);
    session.click(Next);
    session.run(200.0);

    session.show("paper-history");
    session.run(700.0);
    assert_eq!(session.html("paper-jumpto-max"), "6");

    session.surface.set_value("paper-jumpto-input", "5");
    assert!(session.click(JumpTo));
    session.run(200.0);
    let history = session.paper.page("paper-history").unwrap();
    assert_eq!(history.current(), 5);
    assert_eq!(session.html("paper-history"), history.page_html(5).unwrap());

    let writes = session.surface.html_writes("paper-history");
    assert!(session.click(JumpTo));
    session.run(200.0);
    assert_eq!(session.surface.html_writes("paper-history"), writes);

    session.surface.set_value("paper-jumpto-input", "60");
    session.click(JumpTo);
    assert_eq!(session.paper.active_sequencer().map(|p| p.current()), Some(5));

    session.show("paper-report");
    let report = session.paper.page("paper-report").unwrap();
    assert_eq!(report.current(), 3);
    assert_eq!(session.html("paper-report"), report.page_html(3).unwrap());
    assert_eq!(session.surface.value("paper-jumpto-input").as_deref(), Some("3"));
}

#[test]
fn unknown_and_duplicate_sections() {
    let mut session = Session::new();
    let err = session
        .paper
        .handle_tab_shown(&TabShown::new("#paper-missing"), &mut session.surface)
        .unwrap_err();
    assert!(matches!(err, PaperError::UnknownPage(id) if id == "paper-missing"));

    let mut surface = archive_surface();
    let toolbar = ToolbarController::new(
        ButtonUniverse::default(),
        ToolbarElements::default(),
        &[],
        ToolbarTimings::default(),
        &mut surface,
    )
    .unwrap();
    let specs = vec![
        PageSpec::new("paper-history", vec![Previous], split("a", 1)),
        PageSpec::new("paper-history", vec![Next], split("b", 1)),
    ];
    let err = Paper::new(
        specs,
        toolbar,
        PaperOptions::default(),
        &mut TextFlowProbe::default(),
        &surface,
    )
    .unwrap_err();
    assert!(matches!(err, PaperError::DuplicatePage(id) if id == "paper-history"));
}
