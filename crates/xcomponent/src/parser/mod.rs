//! Template parser.
//!
//! This module parses markup templates and the expressions embedded in them.
//! The parser produces an AST that is used for rendering, message extraction,
//! or external tooling. Tag names are not resolved here; a tag that names a
//! component is only recognized at render time.

pub mod ast;
pub mod error;
mod expression;
mod markup;
mod nesting;

pub use ast::*;
pub use error::ParseError;
pub use expression::parse_expression;
pub use markup::parse_markup;
pub use nesting::MAX_NESTING;
