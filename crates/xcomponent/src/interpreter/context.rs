//! Evaluation context for tracking state during recursive rendering.

use std::collections::HashMap;
use std::sync::Arc;

use crate::interpreter::EvalError;
use crate::types::Value;

/// Maximum nesting of component invocations unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Name under which the render globals are visible as a record.
pub const GLOBALS: &str = "globals";

/// Evaluation context carrying state through recursive rendering.
///
/// The context tracks:
/// - Arguments bound to the component being rendered
/// - Loop variables, innermost last
/// - Render globals shared by every component reached from one render
/// - Call stack and depth for the recursion guard
pub struct EvalContext {
    /// Arguments bound to the current component.
    params: HashMap<String, Value>,
    /// Loop variable bindings.
    scopes: Vec<(String, Value)>,
    /// Globals supplied by the caller of the render.
    globals: Arc<HashMap<String, Value>>,
    /// Component invocation chain.
    call_stack: Vec<String>,
    /// Current nesting depth.
    depth: usize,
    /// Maximum allowed depth (default 64).
    max_depth: usize,
}

impl EvalContext {
    /// Create a root context with free variables and globals.
    pub fn new(params: HashMap<String, Value>, globals: Arc<HashMap<String, Value>>) -> Self {
        Self::with_max_depth(params, globals, DEFAULT_MAX_DEPTH)
    }

    /// Create a root context with a custom max depth.
    pub fn with_max_depth(
        params: HashMap<String, Value>,
        globals: Arc<HashMap<String, Value>>,
        max_depth: usize,
    ) -> Self {
        Self {
            params,
            scopes: Vec::new(),
            globals,
            call_stack: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Create the context for a nested component invocation.
    ///
    /// Arguments and loop variables are not inherited; globals, the call
    /// stack and the depth are.
    pub fn nested(&self, params: HashMap<String, Value>) -> EvalContext {
        Self {
            params,
            scopes: Vec::new(),
            globals: Arc::clone(&self.globals),
            call_stack: self.call_stack.clone(),
            depth: self.depth,
            max_depth: self.max_depth,
        }
    }

    /// Look up a name: loop variables, then arguments, then globals.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some((_, value)) = self.scopes.iter().rev().find(|(var, _)| var == name) {
            return Some(value.clone());
        }
        if let Some(value) = self.params.get(name) {
            return Some(value.clone());
        }
        if name == GLOBALS {
            return Some(Value::Record(self.globals.clone()));
        }
        self.globals.get(name).cloned()
    }

    /// Names visible to [`lookup`](Self::lookup), for suggestions.
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scopes.iter().map(|(var, _)| var.as_str()).collect();
        names.extend(self.params.keys().map(String::as_str));
        names.push(GLOBALS);
        names.extend(self.globals.keys().map(String::as_str));
        names
    }

    /// Bind a loop variable for the duration of one iteration.
    pub fn push_scope(&mut self, var: &str, value: Value) {
        self.scopes.push((var.to_string(), value));
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Push a component invocation onto the stack.
    ///
    /// Returns an error if the maximum depth would be exceeded.
    pub fn push_call(&mut self, name: &str) -> Result<(), EvalError> {
        if self.depth >= self.max_depth {
            let mut chain = self.call_stack.clone();
            chain.push(name.to_string());
            return Err(EvalError::RecursionLimit {
                max_depth: self.max_depth,
                chain,
            });
        }
        self.call_stack.push(name.to_string());
        self.depth += 1;
        Ok(())
    }

    /// Pop a component invocation from the stack.
    pub fn pop_call(&mut self) {
        self.call_stack.pop();
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    /// Get current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }
}
