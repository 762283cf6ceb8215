//! Template interpreter.
//!
//! This module provides the rendering engine that takes parsed templates and
//! produces markup. It binds component arguments, resolves names through
//! catalogs and their namespaces, and evaluates expressions.

mod catalog;
mod component;
mod context;
mod error;
mod evaluator;
mod ops;
mod registry;

pub use catalog::Catalog;
pub use component::{CHILDREN, Component};
pub use context::{DEFAULT_MAX_DEPTH, EvalContext, GLOBALS};
pub use error::{CatalogError, ErrorKind, EvalError, compute_suggestions};
pub use evaluator::{eval_expr, eval_node, render_component};
pub use ops::{equals, stringify};
pub use registry::{ComponentRegistry, FunctionRegistry};
