//! Public AST types for markup templates and their embedded expressions.
//!
//! These types are public to enable external tooling (message extraction,
//! linters, formatters). `Display` re-prints the template grammar.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// A markup node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text.
    Text(String),
    /// An element: `<tag attr="lit" attr={expr}>children</tag>`.
    ///
    /// At parse time we don't distinguish HTML tags from component names.
    /// Resolution happens at render time.
    Element(Element),
    /// The anonymous fragment: `<>children</>`.
    Fragment(Vec<Node>),
    /// An inline expression: `{expr}`.
    Expression(Expr),
}

impl Node {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Get the text content, if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// An element with its tag, ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name, possibly dotted (`layout.Html`).
    pub tag: String,
    /// Attributes in declaration order. Names are unique.
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Whether the element was written as `<tag/>`.
    pub self_closing: bool,
}

impl Element {
    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&Node> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| &attr.value)
    }
}

/// A single `name=value` attribute.
///
/// Quoted values are stored as [`Node::Text`], braced values as
/// [`Node::Expression`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: Node,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Node) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// An expression embedded in markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// A bare name: parameter, loop variable, global or function.
    Identifier(String),
    /// `base.field`, chainable.
    MemberAccess { base: Box<Expr>, field: String },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `name(args)`. Dotted names (`ns.func`, `globals.gettext`) are kept as
    /// one qualified name and resolved at render time.
    Call { name: String, args: Vec<Expr> },
    /// `if [not] cond { then } [else { else }]`.
    Conditional {
        negate: bool,
        condition: Box<Expr>,
        then_branch: Body,
        else_branch: Option<Body>,
    },
    /// `for var in source { body }`.
    ForLoop {
        var: String,
        source: Box<Expr>,
        body: Body,
    },
    /// `<Name attr=... />` used as a value.
    ComponentInvocation {
        name: String,
        attrs: Vec<Attribute>,
        children: Vec<Node>,
        self_closing: bool,
    },
}

impl Expr {
    /// Binding strength used when re-printing; higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Conditional { .. } | Expr::ForLoop { .. } => 0,
            _ => 4,
        }
    }
}

/// The body of a conditional branch or loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The whole body is a single expression: `{ b }`.
    Expr(Box<Expr>),
    /// The body is markup: `{ <li>{x}</li> }`.
    Nodes(Vec<Node>),
}

/// A literal value written in the template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Binary operators.
///
/// Precedence, highest first: `*` `/`, then `+` `-`, then `==` `!=` `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Gt,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Gt)
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div => 3,
            BinaryOp::Add | BinaryOp::Sub => 2,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Gt => 1,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.symbol())
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Node::Text(text) => f.write_str(text),
            Node::Element(element) => write_element(
                f,
                &element.tag,
                &element.attrs,
                &element.children,
                element.self_closing,
            ),
            Node::Fragment(children) => {
                f.write_str("<>")?;
                write_nodes(f, children)?;
                f.write_str("</>")
            }
            Node::Expression(expr) => write!(f, "{{{expr}}}"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Expr::Literal(literal) => write!(f, "{literal}"),
            Expr::Identifier(name) => f.write_str(name),
            Expr::MemberAccess { base, field } => {
                if base.precedence() < 4 {
                    write!(f, "({base}).{field}")
                } else {
                    write!(f, "{base}.{field}")
                }
            }
            Expr::Binary { op, left, right } => {
                // Left-associative: only the right operand needs parentheses
                // at equal precedence. Comparisons never chain.
                let prec = op.precedence();
                let left_parens =
                    left.precedence() < prec || (op.is_comparison() && left.precedence() == prec);
                let right_parens = right.precedence() <= prec;
                write_operand(f, left, left_parens)?;
                write!(f, " {op} ")?;
                write_operand(f, right, right_parens)
            }
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Conditional {
                negate,
                condition,
                then_branch,
                else_branch,
            } => {
                f.write_str("if ")?;
                if *negate {
                    f.write_str("not ")?;
                }
                write!(f, "{condition} {{ {then_branch} }}")?;
                match else_branch {
                    Some(Body::Expr(nested)) if matches!(**nested, Expr::Conditional { .. }) => {
                        write!(f, " else {nested}")
                    }
                    Some(body) => write!(f, " else {{ {body} }}"),
                    None => Ok(()),
                }
            }
            Expr::ForLoop { var, source, body } => {
                write!(f, "for {var} in {source} {{ {body} }}")
            }
            Expr::ComponentInvocation {
                name,
                attrs,
                children,
                self_closing,
            } => write_element(f, name, attrs, children, *self_closing),
        }
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Body::Expr(expr) => write!(f, "{expr}"),
            Body::Nodes(nodes) => write_nodes(f, nodes),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

fn write_operand(f: &mut Formatter<'_>, expr: &Expr, parens: bool) -> FmtResult {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_nodes(f: &mut Formatter<'_>, nodes: &[Node]) -> FmtResult {
    for node in nodes {
        write!(f, "{node}")?;
    }
    Ok(())
}

/// Quote an attribute value. Double quotes are used unless the value
/// contains one; a value holding both kinds has its double quotes escaped.
pub(crate) fn quote_attribute(text: &str) -> String {
    match (text.contains('"'), text.contains('\'')) {
        (false, _) => format!("\"{text}\""),
        (true, false) => format!("'{text}'"),
        (true, true) => format!("\"{}\"", text.replace('"', "&quot;")),
    }
}

fn write_element(
    f: &mut Formatter<'_>,
    tag: &str,
    attrs: &[Attribute],
    children: &[Node],
    self_closing: bool,
) -> FmtResult {
    write!(f, "<{tag}")?;
    for attr in attrs {
        match &attr.value {
            Node::Text(text) => write!(f, " {}={}", attr.name, quote_attribute(text))?,
            Node::Expression(expr) => write!(f, " {}={{{}}}", attr.name, expr)?,
            other => write!(f, " {}={{{}}}", attr.name, other)?,
        }
    }
    if self_closing && children.is_empty() {
        return f.write_str("/>");
    }
    f.write_str(">")?;
    write_nodes(f, children)?;
    write!(f, "</{tag}>")
}
