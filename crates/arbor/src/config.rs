//! Configuration types for Arbor diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are styled and exported. All types implement [`serde::Deserialize`] for
//! loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style and render settings.
//! - [`StyleConfig`] - Node style, font and the colors of generated edges and clusters.
//! - [`RenderConfig`] - Output [`Format`], [`LayoutEngine`] and the cosmetic code seed.
//!
//! # Example
//!
//! ```
//! # use arbor::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.render().seed(), 0);
//! assert!(config.style().alignment_color().is_ok());
//! ```

use serde::Deserialize;

use arbor_core::color::Color;

use crate::export::{Format, LayoutEngine};

const DEFAULT_NODE_STYLE: &str = "rounded";
const DEFAULT_ALIGNMENT_COLOR: &str = "#70727B";
const DEFAULT_CODE_DIGITS: usize = 5;

/// Top-level application configuration combining style and render settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified style and render configurations.
    pub fn new(style: StyleConfig, render: RenderConfig) -> Self {
        Self { style, render }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns a mutable reference to the render configuration, for
    /// command-line overrides.
    pub fn render_mut(&mut self) -> &mut RenderConfig {
        &mut self.render
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to the built-in defaults:
/// rounded nodes and `#70727B` alignment edges.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Graphviz node `style`, e.g. `rounded` or `rounded,filled`.
    #[serde(default)]
    node_style: Option<String>,

    /// Font used for nodes, edges and cluster labels.
    #[serde(default)]
    font_name: Option<String>,

    /// Color of cross-layer alignment edges, as a color string.
    #[serde(default)]
    alignment_color: Option<String>,

    /// Default border color of clusters, as a color string.
    #[serde(default)]
    cluster_color: Option<String>,
}

impl StyleConfig {
    pub fn node_style(&self) -> &str {
        self.node_style.as_deref().unwrap_or(DEFAULT_NODE_STYLE)
    }

    pub fn font_name(&self) -> Option<&str> {
        self.font_name.as_deref()
    }

    /// Returns the parsed alignment edge [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn alignment_color(&self) -> Result<Color, String> {
        let color = self
            .alignment_color
            .as_deref()
            .unwrap_or(DEFAULT_ALIGNMENT_COLOR);
        Color::new(color).map_err(|err| format!("Invalid alignment color in config: {err}"))
    }

    /// Returns the parsed cluster [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn cluster_color(&self) -> Result<Option<Color>, String> {
        self.cluster_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid cluster color in config: {err}"))
    }
}

/// Export and generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    format: Format,

    #[serde(default)]
    layout: LayoutEngine,

    /// Seed of the cosmetic code generator.
    #[serde(default)]
    seed: u64,

    /// Number of digits in a generated code.
    #[serde(default = "default_code_digits")]
    code_digits: usize,
}

fn default_code_digits() -> usize {
    DEFAULT_CODE_DIGITS
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            layout: LayoutEngine::default(),
            seed: 0,
            code_digits: DEFAULT_CODE_DIGITS,
        }
    }
}

impl RenderConfig {
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn layout(&self) -> LayoutEngine {
        self.layout
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn code_digits(&self) -> usize {
        self.code_digits
    }

    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
