//! Parse error types for templates.

use thiserror::Error;
use winnow::error::{ContextError, ErrMode};

/// An error that occurred during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input at {line}:{column}")]
    UnexpectedEof { line: usize, column: usize },
}

impl ParseError {
    /// The 1-based line of the error.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. } | ParseError::UnexpectedEof { line, .. } => *line,
        }
    }

    /// The 1-based column of the error.
    pub fn column(&self) -> usize {
        match self {
            ParseError::Syntax { column, .. } | ParseError::UnexpectedEof { column, .. } => {
                *column
            }
        }
    }

    /// Build an error for input left over after a successful parse.
    pub(super) fn trailing(original: &str, remaining: &str) -> Self {
        let (line, column) = calculate_position(original, remaining);
        ParseError::Syntax {
            line,
            column,
            message: format!(
                "unexpected character: '{}'",
                remaining.chars().next().unwrap_or('?')
            ),
        }
    }

    /// Build an error from a failed winnow parse.
    pub(super) fn from_winnow(
        original: &str,
        remaining: &str,
        error: &ErrMode<ContextError>,
    ) -> Self {
        let (line, column) = calculate_position(original, remaining);
        let context = match error {
            ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.to_string(),
            ErrMode::Incomplete(_) => String::new(),
        };
        if remaining.is_empty() {
            return ParseError::UnexpectedEof { line, column };
        }
        let message = if context.is_empty() {
            format!(
                "unexpected character: '{}'",
                remaining.chars().next().unwrap_or('?')
            )
        } else {
            context.replace('\n', "; ")
        };
        ParseError::Syntax {
            line,
            column,
            message,
        }
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed_str[pos + 1..].chars().count() + 1,
        None => consumed_str.chars().count() + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::calculate_position;

    #[test]
    fn position_on_first_line() {
        let input = "<p>abc";
        assert_eq!(calculate_position(input, &input[3..]), (1, 4));
    }

    #[test]
    fn position_after_newlines() {
        let input = "<div>\n  <p>\n    x";
        let offset = input.find('x').unwrap();
        assert_eq!(calculate_position(input, &input[offset..]), (3, 5));
    }
}
