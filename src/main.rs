//! Headless driver: builds a paper from `paper.toml` (or a sample archive)
//! and plays a short scripted session against an in-memory surface.

use anyhow::{Context, Result};
use paper_config::{PageConfig, PaperConfig};
use paper_scene::{
    BottomNavSide, ButtonName, DisplayHooks, PageContent, PageSpec, Paper, PaperOptions, TabShown,
    ToolbarController,
};
use paper_surface::{BoxMetrics, ElementState, HeadlessSurface, Surface, TextFlowProbe, Viewport};

fn main() -> Result<()> {
    let config = PaperConfig::load();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let specs = if config.pages.is_empty() {
        log::info!("no pages configured, using the sample archive");
        sample_archive()
    } else {
        config
            .pages
            .iter()
            .map(page_spec)
            .collect::<Result<Vec<_>>>()?
    };

    let mut surface = build_surface(&config, specs.iter().map(|spec| spec.id.as_str()));
    let toolbar = ToolbarController::from_config(&config.toolbar, &config.timing, &mut surface)?;
    let mut probe = TextFlowProbe::new(config.pagination.line_height, config.pagination.glyph_width);
    let mut paper = Paper::new(
        specs,
        toolbar,
        PaperOptions::from_config(&config),
        &mut probe,
        &surface,
    )?;

    let frame_ms = config.timing.frame_ms.max(1.0);
    let run = |paper: &mut Paper, surface: &mut HeadlessSurface, ms: f32| {
        let mut elapsed = 0.0;
        while elapsed < ms {
            paper.update(frame_ms, surface);
            elapsed += frame_ms;
        }
    };

    paper.activate_first(&mut surface)?;
    report(&paper);

    paper.click(&ButtonName::Next, &mut surface)?;
    run(&mut paper, &mut surface, 500.0);
    paper.click_bottom_nav(BottomNavSide::Next, &mut surface);
    run(&mut paper, &mut surface, 500.0);
    report(&paper);

    let ids: Vec<String> = paper.page_ids().map(str::to_string).collect();
    for pair in ids.windows(2) {
        let event = TabShown::new(format!("#{}", pair[1])).with_related(format!("#{}", pair[0]));
        paper.handle_tab_shown(&event, &mut surface)?;
        run(&mut paper, &mut surface, 1000.0);
        report(&paper);
    }

    Ok(())
}

fn report(paper: &Paper) {
    if let Some(page) = paper.active_sequencer() {
        let buttons: Vec<&str> = paper.toolbar().active().iter().map(ButtonName::as_str).collect();
        log::info!(
            "{}: page {}/{} toolbar [{}]",
            page.container(),
            page.current(),
            page.total(),
            buttons.join(", ")
        );
    }
}

fn page_spec(page: &PageConfig) -> Result<PageSpec> {
    let html = match &page.content_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading content of page '{}' from {}", page.id, path.display()))?,
        None => String::new(),
    };
    let content = match &page.split_marker {
        Some(marker) => PageContent::Split(html.split(marker.as_str()).map(str::to_string).collect()),
        None => PageContent::Single(html),
    };
    let toolbar = page.toolbar.iter().map(|name| ButtonName::from(name.as_str())).collect();
    Ok(PageSpec::new(page.id.clone(), toolbar, content).with_initial_page(page.initial_page.unwrap_or(1)))
}

fn sample_archive() -> Vec<PageSpec> {
    use ButtonName::*;

    let report = (1..=120)
        .map(|n| format!("<p>Finding {n}: the archive holds the record as filed.</p>"))
        .collect::<String>();
    let pages = |label: &str, total: usize| {
        PageContent::Split((1..=total).map(|n| format!("<h2>{label} {n}</h2>")).collect())
    };
    vec![
        PageSpec::new(
            "paper-report",
            vec![Previous, JumpTo, Next, Save, Print, Email],
            PageContent::Single(report),
        ),
        PageSpec::new("paper-insights", vec![Save, Print, Email], pages("Chart", 1))
            .with_hooks(DisplayHooks::Shared(std::rc::Rc::new(|| {
                log::info!("paper-insights: chart drawn")
            }))),
        PageSpec::new("paper-history", vec![Previous, JumpTo, Next], pages("Revision", 4)),
        PageSpec::new("paper-settings", vec![Previous, JumpTo, Next], pages("Section", 2)),
    ]
}

fn build_surface<'a>(config: &PaperConfig, pages: impl Iterator<Item = &'a str>) -> HeadlessSurface {
    let toolbar = &config.toolbar;
    let mut surface = HeadlessSurface::new();
    for name in &toolbar.buttons {
        surface.insert(
            format!("{}{}", toolbar.element_prefix, name),
            ElementState::with_metrics(BoxMetrics::new(36.0, 4.0, 6.0)),
        );
    }
    for id in [
        &toolbar.jump_input_id,
        &toolbar.jump_max_id,
        &toolbar.bottom_previous_id,
        &toolbar.bottom_next_id,
        &toolbar.bottom_indicator_id,
        &toolbar.bottom_max_id,
        &toolbar.scroll_anchor_id,
    ] {
        surface.insert(id.as_str(), ElementState::default());
    }
    let viewport = Viewport::new(config.pagination.viewport_width, config.pagination.viewport_height);
    for id in pages {
        surface.insert(id, ElementState::with_viewport(viewport));
    }
    log::debug!(
        "surface ready, jump input present: {}",
        surface.contains(&toolbar.jump_input_id)
    );
    surface
}
