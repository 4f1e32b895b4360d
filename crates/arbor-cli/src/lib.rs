//! CLI logic for the Arbor diagram tool.
//!
//! This module contains the core CLI logic for the Arbor diagram tool.

pub mod error_adapter;

mod args;
mod config;
mod dataset;

pub use args::Args;

use std::path::{Path, PathBuf};

use log::{debug, info};

use arbor::{ArborError, DiagramBuilder, Format};

/// Run the Arbor CLI application
///
/// This function loads the dataset, assembles it into a render spec and
/// writes the diagram in the selected format.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ArborError` for:
/// - File I/O errors
/// - Configuration and dataset loading errors
/// - Malformed nodes, unknown layers and unresolved edge endpoints
/// - Export errors
pub fn run(args: &Args) -> Result<(), ArborError> {
    info!(
        dataset_path = args.dataset,
        output_path:? = args.output;
        "Processing dataset"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        app_config.render_mut().set_seed(seed);
    }
    if let Some(format) = args.format.or_else(|| output_format(args.output.as_deref())) {
        app_config.render_mut().set_format(format);
    }
    let format = app_config.render().format();

    let dataset = dataset::load_dataset(&args.dataset)?;
    let output = match &args.output {
        Some(output) => PathBuf::from(output),
        None => default_output(&dataset.title, &args.dataset, format),
    };

    let builder = DiagramBuilder::new(app_config);
    let spec = builder.build(&dataset)?;
    builder.export(&spec, format, &output)?;

    info!(output_file = output.display().to_string(), format:% = format; "Diagram exported successfully");

    Ok(())
}

/// Format implied by the extension of `output`, if it names one.
fn output_format(output: Option<&str>) -> Option<Format> {
    let extension = Path::new(output?).extension()?.to_str()?;
    let format = extension.parse().ok();
    debug!(extension, format:?; "Format from output extension");
    format
}

/// `{title}.{ext}`, falling back to the dataset file name when the title is
/// empty.
fn default_output(title: &str, dataset_path: &str, format: Format) -> PathBuf {
    let stem = if title.trim().is_empty() {
        Path::new(dataset_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "diagram".to_string())
    } else {
        title.to_string()
    };
    PathBuf::from(format!("{stem}.{}", format.extension()))
}
