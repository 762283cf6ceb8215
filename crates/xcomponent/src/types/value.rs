use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::types::{Function, Markup, Record};

/// A runtime value bound to a component parameter, loop variable or global.
///
/// `Value` is a closed set of variants. Binary operators, truthiness and
/// output all dispatch on the variant.
///
/// # Example
///
/// ```
/// use xcomponent::{Markup, Value};
///
/// // Integers become Value::Int
/// let count: Value = 42.into();
///
/// // Strings become Value::Str
/// let name: Value = "Alice".into();
///
/// // Rendered markup passes through untouched
/// let node: Value = Markup::new("<p>4</p>").into();
/// assert_eq!(node.to_string(), "<p>4</p>");
/// ```
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),

    /// Rendered markup, emitted verbatim.
    Node(Markup),

    /// Anything supporting named-field lookup.
    Record(Arc<dyn Record>),

    /// A sequence, iterated by `for` loops.
    List(Vec<Value>),

    /// A callable, such as a translation function held in `globals`.
    Function(Function),
}

/// The kind of a [`Value`], used in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Str,
    Node,
    Record,
    List,
    Function,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Str => "str",
            ValueKind::Node => "node",
            ValueKind::Record => "record",
            ValueKind::List => "list",
            ValueKind::Function => "function",
        })
    }
}

impl Value {
    /// Wrap a record.
    pub fn record(record: impl Record + 'static) -> Self {
        Value::Record(Arc::new(record))
    }

    /// Build a list from anything convertible to values.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Str(_) => ValueKind::Str,
            Value::Node(_) => ValueKind::Node,
            Value::Record(_) => ValueKind::Record,
            Value::List(_) => ValueKind::List,
            Value::Function(_) => ValueKind::Function,
        }
    }

    /// Truthiness for `if`: `false`, `""`, empty markup and the empty list
    /// are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Node(markup) => !markup.as_str().is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Int(_) | Value::Record(_) | Value::Function(_) => true,
        }
    }

    /// Get this value as an integer, coercing booleans to 0 and 1.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Markup> {
        match self {
            Value::Node(markup) => Some(markup),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&dyn Record> {
        match self {
            Value::Record(record) => Some(record.as_ref()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Node(markup) => write!(f, "{markup}"),
            Value::Record(record) => write!(f, "<{}>", record.type_name()),
            Value::List(items) => {
                for item in items {
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Function(function) => write!(f, "<function {}>", function.signature()),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Node(markup) => f.debug_tuple("Node").field(markup).finish(),
            Value::Record(record) => f.debug_tuple("Record").field(&record.type_name()).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Function(function) => f.debug_tuple("Function").field(function).finish(),
        }
    }
}

/// Structural equality for scalars, markup and lists; identity for records
/// and functions.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// From implementations for common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Markup> for Value {
    fn from(markup: Markup) -> Self {
        Value::Node(markup)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Value::record(map)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::record(map)
    }
}
