//! Expression parser using winnow.
//!
//! Parses the contents of `{...}` in markup. Handles:
//! - Literals: `true`, `false`, integers, `'..'`, `".."`, `'''..'''`, `""".."""`
//! - Identifiers and member chains: `user.address.city`
//! - Calls with dotted names: `max(a, b)`, `globals.gettext('text')`
//! - Binary operators in three tiers: `* /`, then `+ -`, then `== != >`
//! - `if [not] cond { .. } [else { .. }]` and `for x in xs { .. }`
//! - Component invocations used as values: `<Card title={t}/>`

use super::ast::*;
use super::error::ParseError;
use super::markup::{children, element, ws};
use super::nesting::{Input, nested, stream};
use winnow::combinator::{
    alt, cut_err, delimited, eof, fail, not, opt, peek, preceded, repeat, separated, terminated,
};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_until, take_while};

/// Words that cannot be used as identifiers.
const RESERVED: &[&str] = &["if", "else", "not", "for", "in", "true", "false"];

/// Parse a standalone expression (the contents of `{...}` without braces).
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    let mut remaining = stream(input);
    match delimited(ws, expression, (ws, eof)).parse_next(&mut remaining) {
        Ok(expr) => Ok(expr),
        Err(e) => Err(ParseError::from_winnow(input, remaining.input, &e)),
    }
}

/// Parse any expression.
pub(super) fn expression(input: &mut Input<'_>) -> ModalResult<Expr> {
    nested(alt((conditional, for_loop, comparison))).parse_next(input)
}

/// Parse a conditional: `if [not] cond { .. } [else { .. } | else if ..]`
fn conditional(input: &mut Input<'_>) -> ModalResult<Expr> {
    keyword("if").parse_next(input)?;
    cut_err(conditional_rest)
        .context(StrContext::Label("if expression"))
        .parse_next(input)
}

fn conditional_rest(input: &mut Input<'_>) -> ModalResult<Expr> {
    ws(input)?;
    let negate = opt(terminated(keyword("not"), ws))
        .parse_next(input)?
        .is_some();
    let condition = comparison(input)?;
    ws(input)?;
    let then_branch = block(input)?;
    let else_branch = opt(preceded(
        (ws, keyword("else"), ws),
        cut_err(alt((
            nested(conditional).map(|chained| Body::Expr(Box::new(chained))),
            block,
        ))),
    ))
    .parse_next(input)?;

    Ok(Expr::Conditional {
        negate,
        condition: Box::new(condition),
        then_branch,
        else_branch,
    })
}

/// Parse a loop: `for var in source { body }`
fn for_loop(input: &mut Input<'_>) -> ModalResult<Expr> {
    keyword("for").parse_next(input)?;
    cut_err(for_loop_rest)
        .context(StrContext::Label("for expression"))
        .parse_next(input)
}

fn for_loop_rest(input: &mut Input<'_>) -> ModalResult<Expr> {
    ws(input)?;
    let var = identifier(input)?.to_string();
    ws(input)?;
    keyword("in").parse_next(input)?;
    ws(input)?;
    let source = comparison(input)?;
    ws(input)?;
    let body = block(input)?;

    Ok(Expr::ForLoop {
        var,
        source: Box::new(source),
        body,
    })
}

/// Parse a braced body.
///
/// The body is an expression when its whole content is one expression,
/// otherwise it is markup.
fn block(input: &mut Input<'_>) -> ModalResult<Body> {
    '{'.context(StrContext::Expected(StrContextValue::CharLiteral('{')))
        .parse_next(input)?;
    cut_err(terminated(block_content, '}'))
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)
}

fn block_content(input: &mut Input<'_>) -> ModalResult<Body> {
    alt((
        delimited(ws, expression, (ws, peek('}'))).map(|expr| Body::Expr(Box::new(expr))),
        children.map(Body::Nodes),
    ))
    .parse_next(input)
}

/// Parse a comparison. Comparisons do not chain: `a == b != c` needs parentheses.
fn comparison(input: &mut Input<'_>) -> ModalResult<Expr> {
    let left = additive(input)?;
    let Some(op) = opt(preceded(ws, comparison_op)).parse_next(input)? else {
        return Ok(left);
    };
    ws(input)?;
    let right = cut_err(additive)
        .context(StrContext::Label("operand"))
        .parse_next(input)?;

    if opt(preceded(ws, comparison_op)).parse_next(input)?.is_some() {
        return cut_err(fail::<_, Expr, _>)
            .context(StrContext::Label("chained comparison"))
            .context(StrContext::Expected(StrContextValue::Description(
                "parentheses around the inner comparison",
            )))
            .parse_next(input);
    }

    Ok(binary(op, left, right))
}

fn comparison_op(input: &mut Input<'_>) -> ModalResult<BinaryOp> {
    alt((
        "==".value(BinaryOp::Eq),
        "!=".value(BinaryOp::Ne),
        '>'.value(BinaryOp::Gt),
    ))
    .parse_next(input)
}

/// Parse `+` and `-`, left-associative.
fn additive(input: &mut Input<'_>) -> ModalResult<Expr> {
    let first = term(input)?;
    let rest: Vec<(BinaryOp, Expr)> = repeat(
        0..,
        (
            preceded(ws, alt(('+'.value(BinaryOp::Add), '-'.value(BinaryOp::Sub)))),
            preceded(ws, cut_err(term).context(StrContext::Label("operand"))),
        ),
    )
    .parse_next(input)?;
    Ok(fold_left(first, rest))
}

/// Parse `*` and `/`, left-associative.
fn term(input: &mut Input<'_>) -> ModalResult<Expr> {
    let first = postfix(input)?;
    let rest: Vec<(BinaryOp, Expr)> = repeat(
        0..,
        (
            preceded(ws, alt(('*'.value(BinaryOp::Mul), '/'.value(BinaryOp::Div)))),
            preceded(ws, cut_err(postfix).context(StrContext::Label("operand"))),
        ),
    )
    .parse_next(input)?;
    Ok(fold_left(first, rest))
}

fn fold_left(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter()
        .fold(first, |left, (op, right)| binary(op, left, right))
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Parse a primary expression followed by `.field` accesses.
fn postfix(input: &mut Input<'_>) -> ModalResult<Expr> {
    let base = primary(input)?;
    let fields: Vec<&str> = repeat(0.., preceded('.', identifier)).parse_next(input)?;
    Ok(fields.into_iter().fold(base, |base, field| Expr::MemberAccess {
        base: Box::new(base),
        field: field.to_string(),
    }))
}

fn primary(input: &mut Input<'_>) -> ModalResult<Expr> {
    alt((
        delimited(('(', ws), expression, (ws, ')')),
        keyword("true").value(Expr::Literal(Literal::Bool(true))),
        keyword("false").value(Expr::Literal(Literal::Bool(false))),
        integer.map(|n| Expr::Literal(Literal::Int(n))),
        string.map(|s| Expr::Literal(Literal::Str(s))),
        component_invocation,
        path_or_call,
    ))
    .parse_next(input)
}

/// Parse an unsigned decimal integer.
fn integer(input: &mut Input<'_>) -> ModalResult<i64> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .try_map(str::parse::<i64>)
        .context(StrContext::Label("integer"))
        .parse_next(input)
}

/// Parse a string literal in any of its four forms.
fn string(input: &mut Input<'_>) -> ModalResult<String> {
    alt((
        |i: &mut Input<'_>| triple_quoted(i, "\"\"\""),
        |i: &mut Input<'_>| triple_quoted(i, "'''"),
        |i: &mut Input<'_>| quoted(i, '"'),
        |i: &mut Input<'_>| quoted(i, '\''),
    ))
    .parse_next(input)
}

/// Parse a single-line string with backslash escapes.
fn quoted(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    one_of(quote).parse_next(input)?;
    let mut out = String::new();
    loop {
        let c = any.parse_next(input)?;
        match c {
            c if c == quote => return Ok(out),
            '\\' => {
                let escaped = any.parse_next(input)?;
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            }
            '\n' => return Err(ErrMode::Backtrack(ContextError::new())),
            c => out.push(c),
        }
    }
}

/// Parse a triple-quoted raw string, which may span lines.
fn triple_quoted(input: &mut Input<'_>, delimiter: &'static str) -> ModalResult<String> {
    delimited(delimiter, take_until(0.., delimiter), delimiter)
        .map(dedent)
        .parse_next(input)
}

/// Drop a leading line break and the indentation shared by all non-blank
/// lines. Other line breaks are kept as written.
fn dedent(raw: &str) -> String {
    let body = raw
        .strip_prefix("\r\n")
        .or_else(|| raw.strip_prefix('\n'))
        .unwrap_or(raw);
    let indent = body
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(common_prefix)
        .unwrap_or("");
    body.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(indent).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map_or(0, |((i, c), _)| i + c.len_utf8());
    &a[..len]
}

/// Parse a component invocation used as a value: `<Name attr={x}/>`
fn component_invocation(input: &mut Input<'_>) -> ModalResult<Expr> {
    element
        .map(|element| Expr::ComponentInvocation {
            name: element.tag,
            attrs: element.attrs,
            children: element.children,
            self_closing: element.self_closing,
        })
        .parse_next(input)
}

/// Parse `a.b.c` or `a.b.c(args)`.
///
/// A dotted name followed by arguments is a single qualified call name;
/// otherwise the dots are member accesses.
fn path_or_call(input: &mut Input<'_>) -> ModalResult<Expr> {
    let root = identifier(input)?;
    let fields: Vec<&str> = repeat(0.., preceded('.', identifier)).parse_next(input)?;
    let args = opt(call_args).parse_next(input)?;

    match args {
        Some(args) => {
            let mut name = root.to_string();
            for field in &fields {
                name.push('.');
                name.push_str(field);
            }
            Ok(Expr::Call { name, args })
        }
        None => Ok(fields
            .into_iter()
            .fold(Expr::Identifier(root.to_string()), |base, field| {
                Expr::MemberAccess {
                    base: Box::new(base),
                    field: field.to_string(),
                }
            })),
    }
}

/// Parse call arguments: `(arg1, arg2, ...)`, trailing comma allowed.
fn call_args(input: &mut Input<'_>) -> ModalResult<Vec<Expr>> {
    delimited(
        ('(', ws),
        separated(0.., expression, (ws, ',', ws)),
        cut_err((ws, opt((',', ws)), ')'))
            .context(StrContext::Expected(StrContextValue::CharLiteral(')'))),
    )
    .parse_next(input)
}

/// Parse an identifier that is not a reserved word.
pub(super) fn identifier<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (one_of(is_ident_start), take_while(0.., is_ident_cont))
        .take()
        .verify(|name: &&str| !RESERVED.contains(name))
        .parse_next(input)
}

/// Parse a keyword that is not the prefix of a longer identifier.
fn keyword<'i>(word: &'static str) -> impl Parser<Input<'i>, &'i str, ErrMode<ContextError>> {
    terminated(word, not(one_of(is_ident_cont)))
}

/// Check if a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier.
fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
