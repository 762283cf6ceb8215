//! Template evaluation engine.
//!
//! This module walks parsed templates and produces rendered text. It binds
//! component arguments, resolves identifiers, members and calls, applies
//! operators, and recurses into nested components with a depth guard.

use std::slice;

use tracing::{debug, trace};

use crate::interpreter::component::CHILDREN;
use crate::interpreter::error::compute_suggestions;
use crate::interpreter::ops::{binary, stringify};
use crate::interpreter::{Catalog, Component, EvalContext, EvalError};
use crate::parser::ast::{Attribute, Body, Expr, Literal, Node, quote_attribute};
use crate::types::{Function, Markup, Value};

/// Render a component with call-site arguments.
///
/// The arguments are bound against the component's signature, then the
/// template is walked in a nested context that shares the caller's globals
/// and call stack.
///
/// # Errors
///
/// Returns an error if:
/// - An argument is missing, unexpected, or of the wrong kind
/// - The maximum component depth is exceeded
/// - Any expression in the template fails to evaluate
pub fn render_component(
    catalog: &Catalog,
    component: &Component,
    args: Vec<(String, Value)>,
    ctx: &EvalContext,
) -> Result<Markup, EvalError> {
    let params = component.bind(args)?;
    let mut child_ctx = ctx.nested(params);
    child_ctx.push_call(&catalog.qualify(component.name()))?;
    debug!(
        component = component.name(),
        depth = child_ctx.depth(),
        "rendering component"
    );

    let mut out = String::new();
    eval_node(component.root(), &mut child_ctx, catalog, &mut out)?;
    child_ctx.pop_call();
    Ok(Markup::new(out))
}

/// Render a node, appending the output to `out`.
pub fn eval_node(
    node: &Node,
    ctx: &mut EvalContext,
    catalog: &Catalog,
    out: &mut String,
) -> Result<(), EvalError> {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => render_element(
            &element.tag,
            &element.attrs,
            &element.children,
            element.self_closing,
            ctx,
            catalog,
            out,
        )?,
        Node::Fragment(children) => eval_nodes(children, ctx, catalog, out)?,
        Node::Expression(expr) => {
            let value = eval_expr(expr, ctx, catalog)?;
            out.push_str(&stringify(&value)?);
        }
    }
    Ok(())
}

fn eval_nodes(
    nodes: &[Node],
    ctx: &mut EvalContext,
    catalog: &Catalog,
    out: &mut String,
) -> Result<(), EvalError> {
    for node in nodes {
        eval_node(node, ctx, catalog, out)?;
    }
    Ok(())
}

/// Render a list of nodes into a markup value.
fn render_markup(
    nodes: &[Node],
    ctx: &mut EvalContext,
    catalog: &Catalog,
) -> Result<Markup, EvalError> {
    let mut out = String::new();
    eval_nodes(nodes, ctx, catalog, &mut out)?;
    Ok(Markup::new(out))
}

/// Render an element: a component invocation when the tag names a visible
/// component, otherwise a literal HTML element.
fn render_element(
    tag: &str,
    attrs: &[Attribute],
    children: &[Node],
    self_closing: bool,
    ctx: &mut EvalContext,
    catalog: &Catalog,
    out: &mut String,
) -> Result<(), EvalError> {
    if let Some((owner, component)) = catalog.resolve_component(tag)? {
        trace!(tag, "invoking component");
        let args = call_site_args(attrs, children, ctx, catalog)?;
        let markup = render_component(owner, component, args, ctx)?;
        out.push_str(markup.as_str());
        return Ok(());
    }

    out.push('<');
    out.push_str(tag);
    for attr in attrs {
        let value = eval_attribute(&attr.value, ctx, catalog)?;
        out.push(' ');
        out.push_str(&attr.name);
        out.push('=');
        out.push_str(&quote_attribute(&stringify(&value)?));
    }
    if self_closing && children.is_empty() {
        out.push_str("/>");
        return Ok(());
    }
    out.push('>');
    eval_nodes(children, ctx, catalog, out)?;
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    Ok(())
}

/// Evaluate attributes and children of an invocation in the caller's scope.
fn call_site_args(
    attrs: &[Attribute],
    children: &[Node],
    ctx: &mut EvalContext,
    catalog: &Catalog,
) -> Result<Vec<(String, Value)>, EvalError> {
    let mut args = Vec::with_capacity(attrs.len() + 1);
    for attr in attrs {
        let value = eval_attribute(&attr.value, ctx, catalog)?;
        args.push((attr.name.clone(), value));
    }
    if !children.is_empty() {
        let markup = render_markup(children, ctx, catalog)?;
        args.push((CHILDREN.to_string(), Value::Node(markup)));
    }
    Ok(args)
}

fn eval_attribute(
    value: &Node,
    ctx: &mut EvalContext,
    catalog: &Catalog,
) -> Result<Value, EvalError> {
    match value {
        Node::Text(text) => Ok(Value::Str(text.clone())),
        Node::Expression(expr) => eval_expr(expr, ctx, catalog),
        other => Ok(Value::Node(render_markup(slice::from_ref(other), ctx, catalog)?)),
    }
}

/// Evaluate an expression to a value.
pub fn eval_expr(
    expr: &Expr,
    ctx: &mut EvalContext,
    catalog: &Catalog,
) -> Result<Value, EvalError> {
    trace!(%expr, "evaluating expression");
    match expr {
        Expr::Literal(literal) => Ok(literal_value(literal)),
        Expr::Identifier(name) => resolve_identifier(name, ctx, catalog),
        Expr::MemberAccess { base, field } => {
            let value = eval_expr(base, ctx, catalog)?;
            member(&value, field, &base.to_string())
        }
        Expr::Binary { op, left, right } => {
            let left = eval_expr(left, ctx, catalog)?;
            let right = eval_expr(right, ctx, catalog)?;
            binary(*op, &left, &right)
        }
        Expr::Call { name, args } => {
            let function = resolve_callable(name, ctx, catalog)?;
            let values = args
                .iter()
                .map(|arg| eval_expr(arg, ctx, catalog))
                .collect::<Result<Vec<_>, _>>()?;
            call_function(name, &function, &values)
        }
        Expr::Conditional {
            negate,
            condition,
            then_branch,
            else_branch,
        } => {
            let truthy = eval_expr(condition, ctx, catalog)?.is_truthy();
            if truthy != *negate {
                eval_body(then_branch, ctx, catalog)
            } else if let Some(body) = else_branch {
                eval_body(body, ctx, catalog)
            } else {
                Ok(Value::Str(String::new()))
            }
        }
        Expr::ForLoop { var, source, body } => {
            let items = match eval_expr(source, ctx, catalog)? {
                Value::List(items) => items,
                other => return Err(EvalError::NotIterable { kind: other.kind() }),
            };
            let mut out = String::new();
            for item in items {
                ctx.push_scope(var, item);
                let result = eval_body(body, ctx, catalog);
                ctx.pop_scope();
                out.push_str(&stringify(&result?)?);
            }
            Ok(Value::Node(Markup::new(out)))
        }
        Expr::ComponentInvocation {
            name,
            attrs,
            children,
            self_closing,
        } => {
            let mut out = String::new();
            render_element(name, attrs, children, *self_closing, ctx, catalog, &mut out)?;
            Ok(Value::Node(Markup::new(out)))
        }
    }
}

fn eval_body(body: &Body, ctx: &mut EvalContext, catalog: &Catalog) -> Result<Value, EvalError> {
    match body {
        Body::Expr(expr) => eval_expr(expr, ctx, catalog),
        Body::Nodes(nodes) => Ok(Value::Node(render_markup(nodes, ctx, catalog)?)),
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::Int(*n),
        Literal::Str(s) => Value::Str(s.clone()),
    }
}

/// Resolve a bare name.
///
/// Resolution order:
/// 1. Loop variables, arguments and globals (from the context)
/// 2. Functions of the catalog that owns the current component
fn resolve_identifier(
    name: &str,
    ctx: &EvalContext,
    catalog: &Catalog,
) -> Result<Value, EvalError> {
    if let Some(value) = ctx.lookup(name) {
        return Ok(value);
    }
    if let Some(function) = catalog.function(name) {
        return Ok(Value::Function(function.clone()));
    }
    Err(EvalError::unresolved(
        name,
        ctx.visible_names()
            .into_iter()
            .chain(catalog.function_names()),
    ))
}

/// Look up a field of a record value.
fn member(value: &Value, field: &str, path: &str) -> Result<Value, EvalError> {
    match value {
        Value::Record(record) => record.field(field).ok_or_else(|| {
            let available = record.field_names();
            EvalError::UnresolvedReference {
                name: format!("{path}.{field}"),
                suggestions: compute_suggestions(field, available.iter().map(String::as_str)),
            }
        }),
        other => Err(EvalError::type_mismatch(format!(
            "Cannot access field '{field}' on a {} value",
            other.kind()
        ))),
    }
}

/// Resolve the target of a call.
///
/// An undotted name is looked up as a variable holding a function, then in
/// the catalog's function registry. For a dotted name, a variable root is
/// followed through its fields; otherwise the root must be a namespace.
fn resolve_callable(
    name: &str,
    ctx: &EvalContext,
    catalog: &Catalog,
) -> Result<Function, EvalError> {
    let Some((root, rest)) = name.split_once('.') else {
        if let Some(value) = ctx.lookup(name) {
            return callable(name, value);
        }
        return catalog.resolve_function(name).cloned().map_err(|_| {
            EvalError::unresolved(
                name,
                ctx.visible_names()
                    .into_iter()
                    .chain(catalog.function_names()),
            )
        });
    };

    if let Some(mut value) = ctx.lookup(root) {
        let mut path = root.to_string();
        for field in rest.split('.') {
            value = member(&value, field, &path)?;
            path.push('.');
            path.push_str(field);
        }
        return callable(name, value);
    }

    if catalog.namespace(root).is_some() {
        debug!(namespace = root, call = name, "resolving call in namespace");
        return catalog.resolve_function(name).cloned();
    }

    Err(EvalError::unresolved(
        root,
        ctx.visible_names()
            .into_iter()
            .chain(catalog.namespace_names()),
    ))
}

fn callable(name: &str, value: Value) -> Result<Function, EvalError> {
    match value {
        Value::Function(function) => Ok(function),
        other => Err(EvalError::NotCallable {
            name: name.to_string(),
            kind: other.kind(),
        }),
    }
}

/// Call a function after checking arity and argument kinds.
fn call_function(name: &str, function: &Function, args: &[Value]) -> Result<Value, EvalError> {
    let signature = function.signature();
    if !signature.accepts_arity(args.len()) {
        return Err(EvalError::ArityMismatch {
            name: name.to_string(),
            expected: signature.arity(),
            got: args.len(),
        });
    }
    for (i, arg) in args.iter().enumerate() {
        if let Some(expected) = signature.param_type(i) {
            if !expected.accepts(arg) {
                return Err(EvalError::ArgumentType {
                    callee: name.to_string(),
                    param: format!("#{}", i + 1),
                    expected: expected.clone(),
                    got: arg.kind(),
                });
            }
        }
    }

    trace!(function = name, args = args.len(), "calling function");
    let result = function
        .invoke(args)
        .map_err(|message| EvalError::Function {
            name: name.to_string(),
            message,
        })?;
    if !signature.returns.accepts(&result) {
        return Err(EvalError::type_mismatch(format!(
            "function '{name}' returned {}, expected {}",
            result.kind(),
            signature.returns
        )));
    }
    Ok(result)
}
