//! Arbor - Render labeled trees as IS-A / PART-OF diagrams.
//!
//! Nested node structures are flattened into a [`RenderSpec`] of typed nodes
//! and labeled edges, then exported as DOT or laid out by graphviz into SVG,
//! PDF or PNG.

pub mod config;
pub mod export;

mod assembly;
mod codes;
mod error;
mod layer;
mod render;

pub use arbor_core::{color, dataset, identifier, model, spec, template};

pub use codes::CodeGenerator;
pub use error::ArborError;
pub use export::{Format, LayoutEngine};
pub use layer::Layer;
pub use render::TreeRenderer;

use std::path::Path;

use log::{debug, info, trace};

use arbor_core::{dataset::Dataset, spec::RenderSpec};

use config::AppConfig;
use export::Exporter;

/// Builder for assembling and exporting Arbor diagrams.
///
/// This provides an API for processing a [`Dataset`] through assembly,
/// DOT generation and graphviz layout.
///
/// # Examples
///
/// ```rust,no_run
/// use arbor::{DiagramBuilder, Format, config::AppConfig, dataset::Dataset, model::Node};
///
/// let mut dataset = Dataset::new("person");
/// dataset.entities.push(Node::new("10502", "person").with_attribute("name", "Ann"));
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Assemble the dataset into a render spec
/// let spec = builder.build(&dataset).expect("Failed to build");
///
/// // Print it as DOT, or write a PDF through graphviz
/// let dot = builder.render_dot(&spec);
/// builder
///     .export(&spec, Format::Pdf, "person.pdf".as_ref())
///     .expect("Failed to export");
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including style and render settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Assemble a dataset into a validated render spec.
    ///
    /// Forests are rendered per layer, followed by standalone entities,
    /// relations and alignment edges. Random display codes are drawn from
    /// the configured seed, so the same dataset and configuration always
    /// yield the same spec.
    ///
    /// # Errors
    ///
    /// Returns `ArborError` for malformed nodes, unknown layers, invalid
    /// colors and edge endpoints that do not resolve to a node.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor::{DiagramBuilder, dataset::{Dataset, Forest}, model::Node};
    ///
    /// let mut dataset = Dataset::new("person_isa");
    /// dataset.forests.push(Forest {
    ///     root: Some(Node::new("01740", "entity")),
    ///     trees: vec![Node::new("10502", "person")],
    ///     ..Forest::default()
    /// });
    ///
    /// let spec = DiagramBuilder::default().build(&dataset).unwrap();
    /// assert_eq!(spec.node_count(), 2);
    /// assert_eq!(spec.edge_count(), 1);
    /// ```
    pub fn build(&self, dataset: &Dataset) -> Result<RenderSpec, ArborError> {
        let spec = assembly::assemble(dataset, &self.config)?;
        trace!(spec:?; "Assembled spec");
        Ok(spec)
    }

    /// Print a render spec as DOT source.
    pub fn render_dot(&self, spec: &RenderSpec) -> String {
        self.exporter().to_dot(spec)
    }

    /// Render a spec to the bytes of `format`.
    ///
    /// # Errors
    ///
    /// Returns `ArborError::Export` if graphviz cannot lay the graph out.
    pub fn render(&self, spec: &RenderSpec, format: Format) -> Result<Vec<u8>, ArborError> {
        info!(format:% = format; "Rendering diagram");
        let bytes = self.exporter().render(spec, format)?;
        debug!(bytes = bytes.len(); "Diagram rendered");
        Ok(bytes)
    }

    /// Render a spec and write it to `path`.
    ///
    /// The file is replaced atomically; on error no file is left at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ArborError::Export` if rendering or writing fails.
    pub fn export(&self, spec: &RenderSpec, format: Format, path: &Path) -> Result<(), ArborError> {
        self.exporter().write(spec, format, path)?;
        Ok(())
    }

    fn exporter(&self) -> Exporter<'_> {
        Exporter::new(self.config.style(), self.config.render())
    }
}
