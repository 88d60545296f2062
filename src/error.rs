use std::path::PathBuf;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

/// A parse error with source location information for rich diagnostics.
#[derive(Debug)]
pub struct ParseDiagnostic {
    pub src: NamedSource<String>,
    pub span: SourceSpan,
    pub message: String,
    /// Text shown next to the highlighted span. Falls back to `message`.
    pub label: Option<String>,
    pub help: Option<String>,
}

impl std::fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseDiagnostic {}

impl Diagnostic for ParseDiagnostic {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let text = self.label.clone().unwrap_or_else(|| self.message.clone());
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(text),
            self.span,
        ))))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }
}

/// Everything that can stop the translation of one root file.
///
/// Import failures are deliberately absent: a missing or broken import is
/// logged and skipped, never surfaced here.
#[derive(Debug, Error, Diagnostic)]
pub enum TranslateError {
    #[error("read {}", .path.display())]
    #[diagnostic(code(twirp_swagger::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseDiagnostic),

    /// The declaration tree violates an invariant the reader guarantees, such
    /// as an `rpc` outside a `service`.
    #[error("malformed declaration tree: {0}")]
    #[diagnostic(code(twirp_swagger::structural))]
    Structural(String),

    /// The root file declared no RPCs, so there is nothing to document.
    #[error("no service definition found in {file}")]
    #[diagnostic(
        code(twirp_swagger::no_service_definition),
        help("only files that declare a `service` with at least one `rpc` produce a document")
    )]
    NoServiceDefinition { file: String },

    #[error("serialize swagger document")]
    #[diagnostic(code(twirp_swagger::serialize))]
    Serialize(#[from] serde_json::Error),
}

impl TranslateError {
    /// Whether this is the "nothing to document" outcome, which batch callers
    /// usually skip rather than treat as a failure.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, TranslateError::NoServiceDefinition { .. })
    }
}

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;
