//! Error types for the xcomponent interpreter.

use strsim::levenshtein;
use thiserror::Error;

use crate::parser::ParseError;
use crate::types::{ParamType, ValueKind};

/// Errors that occur while registering components, functions or namespaces.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A component body failed to parse.
    #[error("component '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("component '{name}' is already registered")]
    DuplicateComponent { name: String },

    #[error("function '{name}' is already registered")]
    DuplicateFunction { name: String },

    #[error("namespace '{name}' is already in use")]
    DuplicateNamespace { name: String },
}

/// Broad classification of an [`EvalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    TypeMismatch,
    UnresolvedReference,
    RecursionLimit,
    /// Division by zero, integer overflow or a failing host function.
    Evaluation,
}

/// An error that occurred during rendering.
///
/// Any error aborts the whole render; no partial output is returned.
#[derive(Debug, Error)]
pub enum EvalError {
    /// An ad-hoc template failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An operator or output conversion received incompatible kinds.
    #[error("{message}")]
    TypeMismatch { message: String },

    /// An argument's kind is not accepted by the declared parameter.
    #[error("argument '{param}' of '{callee}' expects {expected}, got {got}")]
    ArgumentType {
        callee: String,
        param: String,
        expected: ParamType,
        got: ValueKind,
    },

    /// A required parameter received no argument.
    #[error("component '{component}' is missing argument '{param}'")]
    MissingArgument { component: String, param: String },

    /// An argument does not match any declared parameter.
    #[error("component '{component}' got an unexpected argument '{param}'")]
    UnexpectedArgument { component: String, param: String },

    /// A name could not be resolved at render time.
    #[error("unresolved reference '{name}'{}", format_suggestions(suggestions))]
    UnresolvedReference {
        name: String,
        suggestions: Vec<String>,
    },

    /// A call target is not a function.
    #[error("'{name}' is not callable (it is a {kind})")]
    NotCallable { name: String, kind: ValueKind },

    #[error("function '{name}' expects {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },

    /// A `for` loop source is not a list.
    #[error("cannot iterate over a {kind} value")]
    NotIterable { kind: ValueKind },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{op}'")]
    IntegerOverflow { op: &'static str },

    /// Nested component invocations exceeded the configured depth.
    #[error("maximum component depth {max_depth} exceeded: {}", chain.join(" -> "))]
    RecursionLimit {
        max_depth: usize,
        chain: Vec<String>,
    },

    /// A host function reported a failure.
    #[error("function '{name}' failed: {message}")]
    Function { name: String, message: String },
}

impl EvalError {
    /// A type mismatch with a fixed message.
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        EvalError::TypeMismatch {
            message: message.into(),
        }
    }

    /// An unresolved reference with suggestions drawn from `available`.
    pub fn unresolved<'a>(name: &str, available: impl IntoIterator<Item = &'a str>) -> Self {
        EvalError::UnresolvedReference {
            name: name.to_string(),
            suggestions: compute_suggestions(name, available),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Parse(_) => ErrorKind::Parse,
            EvalError::TypeMismatch { .. }
            | EvalError::ArgumentType { .. }
            | EvalError::MissingArgument { .. }
            | EvalError::UnexpectedArgument { .. }
            | EvalError::NotCallable { .. }
            | EvalError::ArityMismatch { .. }
            | EvalError::NotIterable { .. } => ErrorKind::TypeMismatch,
            EvalError::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            EvalError::RecursionLimit { .. } => ErrorKind::RecursionLimit,
            EvalError::DivisionByZero
            | EvalError::IntegerOverflow { .. }
            | EvalError::Function { .. } => ErrorKind::Evaluation,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Compute "did you mean" suggestions for a misspelled name.
///
/// Names within Levenshtein distance 1 (for names of three characters or
/// fewer) or 2 are returned, closest first, at most three.
pub fn compute_suggestions<'a>(
    name: &str,
    available: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, &str)> = available
        .into_iter()
        .filter_map(|candidate| {
            let dist = levenshtein(name, candidate);
            (dist > 0 && dist <= max_distance).then_some((dist, candidate))
        })
        .collect();

    suggestions.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    suggestions.dedup_by(|a, b| a.1 == b.1);
    suggestions
        .into_iter()
        .take(3)
        .map(|(_, s)| s.to_string())
        .collect()
}
