//! Layout through the external graphviz executable.

use graphviz_rust::{
    cmd::{CommandArg, Format as GvFormat, Layout},
    exec_dot,
};
use log::debug;

use super::{Error, Format, LayoutEngine};

impl From<LayoutEngine> for Layout {
    fn from(engine: LayoutEngine) -> Self {
        match engine {
            LayoutEngine::Dot => Layout::Dot,
            LayoutEngine::Neato => Layout::Neato,
            LayoutEngine::Fdp => Layout::Fdp,
            LayoutEngine::Circo => Layout::Circo,
            LayoutEngine::Twopi => Layout::Twopi,
        }
    }
}

fn output_format(format: Format) -> Result<GvFormat, Error> {
    match format {
        Format::Svg => Ok(GvFormat::Svg),
        Format::Pdf => Ok(GvFormat::Pdf),
        Format::Png => Ok(GvFormat::Png),
        Format::Dot => Err(Error::Render(
            "DOT output does not go through graphviz".to_string(),
        )),
    }
}

/// Runs `engine` on `source` and returns the document bytes.
pub(super) fn layout(source: String, format: Format, engine: LayoutEngine) -> Result<Vec<u8>, Error> {
    let args = vec![
        CommandArg::Layout(engine.into()),
        CommandArg::Format(output_format(format)?),
    ];
    debug!(engine:% = engine, format:% = format; "Running graphviz");

    exec_dot(source, args).map_err(|source| Error::Layout { engine, source })
}
