use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parser::ParseError;
use crate::types::Value;

/// One accepted kind in a parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Bool,
    Int,
    Str,
    Node,
    List,
    Function,
    /// Any record, or only records whose `type_name()` matches.
    Record(Option<String>),
    Any,
}

impl ParamKind {
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamKind::Any, _)
            | (ParamKind::Bool, Value::Bool(_))
            | (ParamKind::Int, Value::Int(_))
            | (ParamKind::Str, Value::Str(_))
            | (ParamKind::Node, Value::Node(_))
            | (ParamKind::List, Value::List(_))
            | (ParamKind::Function, Value::Function(_))
            | (ParamKind::Record(None), Value::Record(_)) => true,
            (ParamKind::Record(Some(name)), Value::Record(record)) => record.type_name() == name,
            _ => false,
        }
    }
}

impl Display for ParamKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ParamKind::Bool => f.write_str("bool"),
            ParamKind::Int => f.write_str("int"),
            ParamKind::Str => f.write_str("str"),
            ParamKind::Node => f.write_str("node"),
            ParamKind::List => f.write_str("list"),
            ParamKind::Function => f.write_str("function"),
            ParamKind::Record(None) => f.write_str("record"),
            ParamKind::Record(Some(name)) => write!(f, "record<{name}>"),
            ParamKind::Any => f.write_str("any"),
        }
    }
}

impl FromStr for ParamKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let kind = match s {
            "bool" => ParamKind::Bool,
            "int" => ParamKind::Int,
            "str" => ParamKind::Str,
            "node" => ParamKind::Node,
            "list" => ParamKind::List,
            "function" => ParamKind::Function,
            "record" => ParamKind::Record(None),
            "any" => ParamKind::Any,
            _ => {
                let name = s
                    .strip_prefix("record<")
                    .and_then(|rest| rest.strip_suffix('>'))
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| ParseError::Syntax {
                        line: 1,
                        column: 1,
                        message: format!("unknown parameter type '{s}'"),
                    })?;
                ParamKind::Record(Some(name.to_string()))
            }
        };
        Ok(kind)
    }
}

/// The set of value kinds a parameter accepts, written `int | bool | str`.
///
/// # Example
///
/// ```
/// use xcomponent::{ParamType, Value};
///
/// let ty: ParamType = "int | bool".parse().unwrap();
/// assert!(ty.accepts(&Value::Int(1)));
/// assert!(!ty.accepts(&Value::from("1")));
/// assert_eq!(ty.to_string(), "int | bool");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParamType {
    kinds: Vec<ParamKind>,
}

impl ParamType {
    pub fn new(kinds: impl IntoIterator<Item = ParamKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn bool() -> Self {
        Self::new([ParamKind::Bool])
    }

    pub fn int() -> Self {
        Self::new([ParamKind::Int])
    }

    pub fn str() -> Self {
        Self::new([ParamKind::Str])
    }

    pub fn node() -> Self {
        Self::new([ParamKind::Node])
    }

    pub fn list() -> Self {
        Self::new([ParamKind::List])
    }

    pub fn function() -> Self {
        Self::new([ParamKind::Function])
    }

    /// Records whose `type_name()` is `name`.
    pub fn record_of(name: impl Into<String>) -> Self {
        Self::new([ParamKind::Record(Some(name.into()))])
    }

    pub fn any() -> Self {
        Self::new([ParamKind::Any])
    }

    /// Add an accepted kind.
    pub fn or(mut self, kind: ParamKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    pub fn kinds(&self) -> &[ParamKind] {
        &self.kinds
    }

    /// Check whether a value's kind is accepted.
    pub fn accepts(&self, value: &Value) -> bool {
        self.kinds.iter().any(|kind| kind.accepts(value))
    }

    pub fn contains(&self, kind: &ParamKind) -> bool {
        self.kinds.contains(kind)
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

impl FromStr for ParamType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kinds = s
            .split('|')
            .map(str::parse)
            .collect::<Result<Vec<ParamKind>, _>>()?;
        Ok(Self::new(kinds))
    }
}

impl TryFrom<String> for ParamType {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ParamType> for String {
    fn from(ty: ParamType) -> Self {
        ty.to_string()
    }
}

impl From<ParamKind> for ParamType {
    fn from(kind: ParamKind) -> Self {
        Self::new([kind])
    }
}
