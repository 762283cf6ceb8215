pub mod extract;
pub mod interpreter;
pub mod parser;
pub mod types;

pub use extract::{ExtractError, ExtractedMessage, extract, extract_from_markup};
pub use interpreter::{
    Catalog, CatalogError, Component, ErrorKind, EvalContext, EvalError, compute_suggestions,
};
pub use parser::{Expr, Node, ParseError, parse_expression, parse_markup};
pub use types::{Function, Markup, ParamKind, ParamType, Record, Signature, Value, ValueKind};

/// Creates a `HashMap<String, Value>` of render arguments or globals.
///
/// Values are converted via `Into<Value>`, so integers, booleans, strings,
/// markup, lists and records can be passed directly.
///
/// # Example
///
/// ```
/// use xcomponent::{Value, args};
///
/// let a = args! { "count" => 3, "name" => "Alice", "admin" => false };
/// assert_eq!(a.len(), 3);
/// assert_eq!(a["count"].as_int(), Some(3));
/// assert_eq!(a["name"].as_str(), Some("Alice"));
/// assert_eq!(a["admin"], Value::Bool(false));
/// ```
#[macro_export]
macro_rules! args {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
