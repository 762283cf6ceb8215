//! Miette diagnostic wrapper for template parse errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::Path;
use thiserror::Error;
use xcomponent::ParseError;

/// A miette-compatible diagnostic for template parse errors.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(xcomponent::syntax))]
pub struct TemplateDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl TemplateDiagnostic {
    /// Create a diagnostic from a ParseError with source context.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let (message, help) = match err {
            ParseError::Syntax { message, .. } => (message.clone(), None),
            ParseError::UnexpectedEof { .. } => (
                "unexpected end of template".to_string(),
                Some("check for an unclosed tag, brace or string".to_string()),
            ),
        };

        TemplateDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (byte_offset(content, err.line(), err.column()), 1).into(),
            message,
            help,
        }
    }
}

/// Convert a 1-based line and character column to a byte offset, clamped
/// to the content length.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let line_start = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let rest = content.get(line_start..).unwrap_or_default();
    let within = rest
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(rest.len(), |(i, _)| i);
    (line_start + within).min(content.len())
}
