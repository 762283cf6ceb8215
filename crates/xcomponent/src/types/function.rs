use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::types::{ParamType, Value};

/// Host implementation of a [`Function`].
///
/// Receives arguments already checked against the signature. An `Err`
/// carries a message reported as a render failure.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync;

/// Declared parameter and return kinds of a [`Function`].
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    /// Kinds of the leading fixed parameters.
    pub params: Vec<ParamType>,
    /// Kind of any further arguments, if the function is variadic.
    pub variadic: Option<ParamType>,
    pub returns: ParamType,
}

impl FunctionSignature {
    /// Check if `count` arguments satisfy the arity.
    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.variadic.is_some() {
            count >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// The declared kind of the argument at `index`.
    pub fn param_type(&self, index: usize) -> Option<&ParamType> {
        self.params.get(index).or(self.variadic.as_ref())
    }

    /// Human-readable arity (`2`, `at least 1`).
    pub fn arity(&self) -> String {
        if self.variadic.is_some() {
            format!("at least {}", self.params.len())
        } else {
            self.params.len().to_string()
        }
    }
}

impl Display for FunctionSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("(")?;
        let mut first = true;
        for param in &self.params {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{param}")?;
        }
        if let Some(rest) = &self.variadic {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "*{rest}")?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

/// A callable registered on a catalog or passed in as a value.
///
/// # Example
///
/// ```
/// use xcomponent::{Function, ParamType, Value};
///
/// let max = Function::variadic(ParamType::int(), 1, ParamType::int(), |args| {
///     args.iter()
///         .filter_map(Value::as_int)
///         .max()
///         .map(Value::Int)
///         .ok_or_else(|| "max() of nothing".to_string())
/// });
/// assert_eq!(max.signature().arity(), "at least 1");
/// ```
#[derive(Clone)]
pub struct Function {
    signature: FunctionSignature,
    callable: Arc<NativeFn>,
}

impl Function {
    /// A function taking exactly the listed parameter kinds.
    pub fn new(
        params: Vec<ParamType>,
        returns: ParamType,
        callable: impl Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            signature: FunctionSignature {
                params,
                variadic: None,
                returns,
            },
            callable: Arc::new(callable),
        }
    }

    /// A function taking at least `min` arguments, all of kind `param`.
    pub fn variadic(
        param: ParamType,
        min: usize,
        returns: ParamType,
        callable: impl Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            signature: FunctionSignature {
                params: vec![param.clone(); min],
                variadic: Some(param),
                returns,
            },
            callable: Arc::new(callable),
        }
    }

    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    /// Run the host implementation without checking the signature.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, String> {
        (self.callable)(args)
    }

    /// Whether both handles share the same implementation.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.callable, &other.callable)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Function")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
