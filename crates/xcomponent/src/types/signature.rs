use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, delimited, eof, opt, preceded, separated, terminated};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use crate::parser::ParseError;
use crate::parser::ast::quote_attribute;
use crate::types::{ParamType, Value};

/// A declared component parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
    /// Value bound when the call site omits the argument.
    pub default: Option<Value>,
}

/// The ordered parameter list of a component.
///
/// The textual form is `a: int | bool, b: str = "x"`; a parameter written
/// without a type accepts any value.
///
/// # Example
///
/// ```
/// use xcomponent::{ParamType, Signature};
///
/// let parsed: Signature = "title: str, count: int = 1".parse().unwrap();
/// let built = Signature::new()
///     .param("title", ParamType::str())
///     .param_with_default("count", ParamType::int(), 1);
/// assert_eq!(parsed, built);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Create an empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a required parameter.
    pub fn param(mut self, name: impl Into<String>, ty: impl Into<ParamType>) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty: ty.into(),
            default: None,
        });
        self
    }

    /// Append a parameter with a default value.
    pub fn param_with_default(
        mut self,
        name: impl Into<String>,
        ty: impl Into<ParamType>,
        default: impl Into<Value>,
    ) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty: ty.into(),
            default: Some(default.into()),
        });
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|param| param.name.as_str())
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param.name, param.ty)?;
            match &param.default {
                Some(Value::Str(s)) => write!(f, " = {}", quote_attribute(s))?,
                Some(value) => write!(f, " = {value}")?,
                None => {}
            }
        }
        Ok(())
    }
}

impl FromStr for Signature {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut remaining = s;
        let raw: Vec<RawParam<'_>> = delimited(
            multispace0,
            separated(0.., param, (multispace0, ',', multispace0)),
            (multispace0, opt(','), multispace0, eof),
        )
        .parse_next(&mut remaining)
        .map_err(|_| syntax_error(s, remaining, "expected `name: type` parameters"))?;

        let mut params: Vec<Param> = Vec::new();
        for (name, ty, default) in raw {
            if params.iter().any(|p: &Param| p.name == name) {
                return Err(syntax_error(s, "", &format!("duplicate parameter '{name}'")));
            }
            let ty = match ty {
                Some(ty) => ty.parse()?,
                None => ParamType::any(),
            };
            params.push(Param {
                name: name.to_string(),
                ty,
                default,
            });
        }
        Ok(Signature { params })
    }
}

type RawParam<'i> = (&'i str, Option<&'i str>, Option<Value>);

fn param<'i>(input: &mut &'i str) -> ModalResult<RawParam<'i>> {
    (
        param_name,
        opt(preceded((multispace0, ':', multispace0), take_till(1.., [',', '=']))),
        opt(preceded((multispace0, '=', multispace0), default_value)),
    )
        .parse_next(input)
}

fn param_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// Parse a default: an integer, a boolean, or a quoted string.
fn default_value(input: &mut &str) -> ModalResult<Value> {
    terminated(
        alt((
            "true".value(Value::Bool(true)),
            "false".value(Value::Bool(false)),
            digit1.try_map(str::parse::<i64>).map(Value::Int),
            delimited('"', take_till(0.., '"'), '"').map(Value::from),
            delimited('\'', take_till(0.., '\''), '\'').map(Value::from),
        )),
        multispace0,
    )
    .parse_next(input)
}

fn syntax_error(original: &str, remaining: &str, message: &str) -> ParseError {
    let offset = original.len() - remaining.len();
    ParseError::Syntax {
        line: 1,
        column: original[..offset].chars().count() + 1,
        message: message.to_string(),
    }
}
