//! Error adapter for converting ArborError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use arbor::ArborError;

/// Adapter giving an [`ArborError`] a stable diagnostic code and, where one
/// exists, a help line.
pub struct ErrorAdapter<'a>(pub &'a ArborError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl ErrorAdapter<'_> {
    fn code_str(&self) -> &'static str {
        match self.0 {
            ArborError::Io(_) => "arbor::io",
            ArborError::MalformedNode { .. } => "arbor::malformed_node",
            ArborError::Unresolved(_) => "arbor::unresolved_endpoint",
            ArborError::Dataset { .. } => "arbor::dataset",
            ArborError::UnknownLayer(_) => "arbor::unknown_layer",
            ArborError::Config(_) => "arbor::config",
            ArborError::Export(_) => "arbor::export",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        match self.0 {
            ArborError::MalformedNode { .. } => {
                Some("every node needs a non-empty `id` and `category`")
            }
            ArborError::Unresolved(_) => Some(
                "declare both endpoints as entities or tree nodes of the layer the edge lives in",
            ),
            ArborError::UnknownLayer(_) => {
                Some("add the layer under [[layers]] or fix the layer name")
            }
            ArborError::Export(_) => Some(
                "rendered formats need the graphviz `dot` executable on PATH; `--format dot` does not",
            ),
            ArborError::Io(_) | ArborError::Dataset { .. } | ArborError::Config(_) => None,
        }
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wrap an [`ArborError`] for rendering by miette.
pub fn to_reportable(err: &ArborError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use arbor::{identifier::Id, spec::SpecError};

    use super::*;

    fn code(err: &ArborError) -> String {
        to_reportable(err).code().unwrap().to_string()
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            code(&ArborError::malformed_node("<root>", "id")),
            "arbor::malformed_node"
        );
        assert_eq!(
            code(&ArborError::UnknownLayer("Deutsch".to_string())),
            "arbor::unknown_layer"
        );
        let unresolved = ArborError::from(SpecError::UnresolvedEndpoint {
            from: Id::new("a"),
            to: Id::new("b"),
            missing: Id::new("b"),
        });
        assert_eq!(code(&unresolved), "arbor::unresolved_endpoint");
    }

    #[test]
    fn test_message_is_error_display() {
        let err = ArborError::malformed_node("event_46884 > children[1]", "category");
        let adapter = to_reportable(&err);
        assert_eq!(
            adapter.to_string(),
            "malformed node at `event_46884 > children[1]`: missing category"
        );
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_config_error_has_no_help() {
        let err = ArborError::Config("bad color".to_string());
        assert!(to_reportable(&err).help().is_none());
        assert_eq!(code(&err), "arbor::config");
    }
}
