//! Paper configuration system
//!
//! This crate provides centralized configuration for the paper viewer,
//! loading settings from `paper.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "paper.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the paper viewer
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PaperConfig {
    /// Animation and transition timings
    pub timing: TimingConfig,
    /// Toolbar layout and element identifiers
    pub toolbar: ToolbarConfig,
    /// Pagination viewport and measurement settings
    pub pagination: PaginationConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Declared pages, in tab order
    pub pages: Vec<PageConfig>,
}

/// Timing configuration, all durations in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Slide a toolbar button out of / into view
    pub slide_ms: f32,
    /// Collapse or restore a toolbar button's box metrics
    pub collapse_ms: f32,
    /// Lead delay before showing buttons after a full swap
    pub swap_lead_ms: f32,
    /// Pressed-button pulse length
    pub press_pulse_ms: f32,
    /// Fade-out wait before a page's content is swapped
    pub page_fade_ms: f32,
    /// Delay between a bottom-nav click and the toolbar click it forwards to
    pub bottom_nav_delay_ms: f32,
    /// Horizontal offset a hidden button slides to, in pixels
    pub slide_offset_px: f64,
    /// Easing of toolbar transitions (`swing`, `linear`, `ease-out`, `cubic-bezier(...)`)
    pub easing: String,
    /// Frame delta used by the demo driver
    pub frame_ms: f32,
}

/// Toolbar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    /// Declared button order; the canonical universe of toolbar buttons
    pub buttons: Vec<String>,
    /// Buttons hidden before the first page is shown
    pub initially_hidden: Vec<String>,
    /// Element id prefix for buttons (`paper-` + `next` = `paper-next`)
    pub element_prefix: String,
    /// Jump-to-page number input
    pub jump_input_id: String,
    /// Label showing the page count next to the jump input
    pub jump_max_id: String,
    /// Bottom navigation mirror elements
    pub bottom_previous_id: String,
    pub bottom_next_id: String,
    pub bottom_indicator_id: String,
    pub bottom_max_id: String,
    /// Element scrolled into view before a bottom-nav click is forwarded
    pub scroll_anchor_id: String,
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Viewport width used for page containers the host did not size
    pub viewport_width: f64,
    /// Viewport height used for page containers the host did not size
    pub viewport_height: f64,
    /// Line height used by the text-flow measurement probe
    pub line_height: f64,
    /// Average glyph advance used by the text-flow measurement probe
    pub glyph_width: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set (e.g. "info", "paper_scene=debug")
    pub level: String,
}

/// A declared page (one tab of the paper)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PageConfig {
    /// Page container element id, also the tab target
    pub id: String,
    /// Toolbar buttons active while this page is shown
    pub toolbar: Vec<String>,
    /// HTML file providing the page content
    pub content_file: Option<PathBuf>,
    /// When set, the content file is pre-split on this marker and auto-pagination is disabled
    pub split_marker: Option<String>,
    /// First page shown (1-based)
    pub initial_page: Option<usize>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            slide_ms: 300.0,
            collapse_ms: 300.0,
            swap_lead_ms: 300.0,
            press_pulse_ms: 150.0,
            page_fade_ms: 150.0,
            bottom_nav_delay_ms: 250.0,
            slide_offset_px: 160.0,
            easing: "swing".to_string(),
            frame_ms: 16.67,
        }
    }
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            buttons: ["previous", "jumpto", "next", "save", "print", "email"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            initially_hidden: Vec::new(),
            element_prefix: "paper-".to_string(),
            jump_input_id: "paper-jumpto-input".to_string(),
            jump_max_id: "paper-jumpto-max".to_string(),
            bottom_previous_id: "paper-bottom-nav-previous".to_string(),
            bottom_next_id: "paper-bottom-nav-next".to_string(),
            bottom_indicator_id: "paper-bottom-nav-indicator".to_string(),
            bottom_max_id: "paper-bottom-nav-indicator-max".to_string(),
            scroll_anchor_id: "main-content".to_string(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            viewport_width: 720.0,
            viewport_height: 960.0,
            line_height: 24.0,
            glyph_width: 8.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PaperConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from `PAPER_CONFIG` or `paper.toml` in the current directory,
    /// or return the default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        let path = std::env::var("PAPER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from_file(path).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(level) = std::env::var("PAPER_LOG") {
            self.logging.level = level;
        }

        if let Some(width) = env_parse::<f64>("PAPER_VIEWPORT_WIDTH") {
            self.pagination.viewport_width = width;
        }
        if let Some(height) = env_parse::<f64>("PAPER_VIEWPORT_HEIGHT") {
            self.pagination.viewport_height = height;
        }

        if let Some(ms) = env_parse::<f32>("PAPER_SLIDE_MS") {
            self.timing.slide_ms = ms;
        }
        if let Some(ms) = env_parse::<f32>("PAPER_COLLAPSE_MS") {
            self.timing.collapse_ms = ms;
        }
        if let Some(ms) = env_parse::<f32>("PAPER_PAGE_FADE_MS") {
            self.timing.page_fade_ms = ms;
        }
        if let Some(ms) = env_parse::<f32>("PAPER_FRAME_MS") {
            self.timing.frame_ms = ms;
        }
        if let Ok(easing) = std::env::var("PAPER_EASING") {
            self.timing.easing = easing;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from paper.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PaperConfig::default();
        assert_eq!(config.timing.slide_ms, 300.0);
        assert_eq!(config.timing.press_pulse_ms, 150.0);
        assert_eq!(config.toolbar.buttons.len(), 6);
        assert_eq!(config.toolbar.buttons[1], "jumpto");
        assert!(config.pages.is_empty());
    }

    #[test]
    fn test_toml_serialization() {
        let config = PaperConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: PaperConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timing.swap_lead_ms, 300.0);
        assert_eq!(parsed.toolbar.element_prefix, "paper-");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[timing]
slide_ms = 120.0

[[pages]]
id = "paper-report"
toolbar = ["previous", "jumpto", "next"]
"#
        )
        .unwrap();

        let config = PaperConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.timing.slide_ms, 120.0);
        assert_eq!(config.timing.collapse_ms, 300.0);
        assert_eq!(config.timing.easing, "swing");
        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.pages[0].id, "paper-report");
        assert_eq!(config.pages[0].toolbar, vec!["previous", "jumpto", "next"]);
        assert!(config.pages[0].content_file.is_none());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = PaperConfig::load_from_file("/definitely/not/here/paper.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timing = [not valid").unwrap();
        let err = PaperConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("PAPER_LOG", "debug");
            std::env::set_var("PAPER_VIEWPORT_HEIGHT", "480");
            std::env::set_var("PAPER_SLIDE_MS", "not-a-number");
        }

        let mut config = PaperConfig::default();
        config.merge_with_env();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.pagination.viewport_height, 480.0);
        assert_eq!(config.timing.slide_ms, 300.0);

        unsafe {
            std::env::remove_var("PAPER_LOG");
            std::env::remove_var("PAPER_VIEWPORT_HEIGHT");
            std::env::remove_var("PAPER_SLIDE_MS");
        }
    }
}
