//! Registered components and argument binding.

use std::collections::HashMap;

use crate::interpreter::EvalError;
use crate::parser::Node;
use crate::types::{Markup, ParamKind, Signature, Value};

/// Name of the parameter that receives the call site's child nodes.
pub const CHILDREN: &str = "children";

/// A named template with a declared signature, parsed once at registration.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    signature: Signature,
    root: Node,
}

impl Component {
    pub fn new(name: impl Into<String>, signature: Signature, root: Node) -> Self {
        Self {
            name: name.into(),
            signature,
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The parsed template.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Bind call-site arguments to the declared parameters.
    ///
    /// Fails on an argument with no matching parameter, a missing argument
    /// without default, or a value of a kind the parameter does not accept.
    /// A `children` argument that is only whitespace is dropped when the
    /// component does not declare `children`; a declared `children` that
    /// receives nothing is bound to empty markup.
    pub fn bind(&self, args: Vec<(String, Value)>) -> Result<HashMap<String, Value>, EvalError> {
        let mut bound = HashMap::with_capacity(self.signature.params().len());

        for (name, value) in args {
            let Some(param) = self.signature.get(&name) else {
                if name == CHILDREN && value.as_node().is_some_and(Markup::is_blank) {
                    continue;
                }
                return Err(EvalError::UnexpectedArgument {
                    component: self.name.clone(),
                    param: name,
                });
            };
            let value = coerce_text(value, param.ty.kinds());
            if !param.ty.accepts(&value) {
                return Err(EvalError::ArgumentType {
                    callee: self.name.clone(),
                    param: name,
                    expected: param.ty.clone(),
                    got: value.kind(),
                });
            }
            bound.insert(name, value);
        }

        for param in self.signature.params() {
            if bound.contains_key(&param.name) {
                continue;
            }
            let value = match &param.default {
                Some(default) => default.clone(),
                None if param.name == CHILDREN => Value::Node(Markup::default()),
                None => {
                    return Err(EvalError::MissingArgument {
                        component: self.name.clone(),
                        param: param.name.clone(),
                    });
                }
            };
            bound.insert(param.name.clone(), value);
        }

        Ok(bound)
    }
}

/// Convert text written as a literal attribute (`count="3"`) for parameters
/// that do not accept strings but accept integers or booleans.
fn coerce_text(value: Value, kinds: &[ParamKind]) -> Value {
    let Value::Str(text) = &value else {
        return value;
    };
    if kinds.iter().any(|k| matches!(k, ParamKind::Str | ParamKind::Any)) {
        return value;
    }
    if kinds.contains(&ParamKind::Int) {
        if let Ok(n) = text.trim().parse::<i64>() {
            return Value::Int(n);
        }
    }
    if kinds.contains(&ParamKind::Bool) {
        match text.trim() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
    }
    value
}
