//! Export of a [`RenderSpec`] to DOT text or a rendered document.
//!
//! DOT is produced in-process. Every other [`Format`] is laid out by the
//! external graphviz executable. Files are written through a temporary file
//! in the destination directory and persisted in one step, so a failed
//! export never leaves a partial file behind.

pub mod dot;
mod graphviz;

use std::{fmt, io::Write, path::Path, str::FromStr};

use log::{debug, info};
use serde::Deserialize;
use tempfile::NamedTempFile;
use thiserror::Error;

use arbor_core::spec::RenderSpec;

use crate::config::{RenderConfig, StyleConfig};

/// Errors raised while exporting a diagram.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("graphviz layout with `{engine}` failed: {source}")]
    Layout {
        engine: LayoutEngine,
        #[source]
        source: std::io::Error,
    },
}

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Graphviz source text; needs no graphviz installation.
    Dot,
    Svg,
    #[default]
    Pdf,
    Png,
}

impl Format {
    /// File extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" | "gv" => Ok(Self::Dot),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            other => Err(format!(
                "unsupported format `{other}` (expected dot, svg, pdf or png)"
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Graphviz layout engine used for rendered formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    #[default]
    Dot,
    Neato,
    Fdp,
    Circo,
    Twopi,
}

impl fmt::Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dot => "dot",
            Self::Neato => "neato",
            Self::Fdp => "fdp",
            Self::Circo => "circo",
            Self::Twopi => "twopi",
        };
        f.write_str(name)
    }
}

/// Turns a [`RenderSpec`] into bytes of the configured format.
pub struct Exporter<'a> {
    style: &'a StyleConfig,
    render: &'a RenderConfig,
}

impl<'a> Exporter<'a> {
    pub fn new(style: &'a StyleConfig, render: &'a RenderConfig) -> Self {
        Self { style, render }
    }

    /// Prints `spec` as DOT source.
    pub fn to_dot(&self, spec: &RenderSpec) -> String {
        dot::to_dot_string(spec, self.style)
    }

    /// Produces the document bytes of `spec` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Layout`] if the graphviz executable cannot be run or
    /// rejects the graph.
    pub fn render(&self, spec: &RenderSpec, format: Format) -> Result<Vec<u8>, Error> {
        let source = self.to_dot(spec);
        debug!(format:% = format, bytes = source.len(); "DOT source generated");

        match format {
            Format::Dot => Ok(source.into_bytes()),
            _ => graphviz::layout(source, format, self.render.layout()),
        }
    }

    /// Renders `spec` and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    /// No file is created at `path` in either case.
    pub fn write(&self, spec: &RenderSpec, format: Format, path: &Path) -> Result<(), Error> {
        let bytes = self.render(spec, format)?;
        write_atomic(path, &bytes)?;
        info!(path = path.display().to_string(), bytes = bytes.len(); "Diagram written");
        Ok(())
    }
}

/// Writes `bytes` to `path` through a temporary file in the same directory.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
