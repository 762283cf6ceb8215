//! Markup parser using winnow.
//!
//! Parses template source into a [`Node`] tree. Handles:
//! - Elements `<tag attr="lit" attr={expr}>children</tag>` and `<tag/>`
//! - Dotted tags for namespaced components (`<layout.Html>`)
//! - The anonymous fragment `<>...</>`
//! - Text runs and inline `{expr}` nodes
//! - Comments (dropped) and doctype declarations (kept as text)

use super::ast::*;
use super::error::ParseError;
use super::expression::expression;
use super::nesting::{Input, nested, stream};
use winnow::combinator::{alt, cut_err, delimited, fail, opt, preceded, repeat, terminated};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_until, take_while};

/// Parse template source into a node tree.
///
/// A template with a single top-level node yields that node; several
/// top-level nodes are wrapped in a [`Node::Fragment`].
pub fn parse_markup(input: &str) -> Result<Node, ParseError> {
    let mut remaining = stream(input);
    match document(&mut remaining) {
        Ok(node) => {
            if remaining.input.is_empty() {
                Ok(node)
            } else {
                Err(ParseError::trailing(input, remaining.input))
            }
        }
        Err(e) => Err(ParseError::from_winnow(input, remaining.input, &e)),
    }
}

/// Parse a complete document.
fn document(input: &mut Input<'_>) -> ModalResult<Node> {
    let mut nodes = children(input)?;
    // Whitespace around the root is not content.
    nodes.retain(|node| !matches!(node, Node::Text(text) if text.trim().is_empty()));
    if nodes.len() == 1 {
        Ok(nodes.remove(0))
    } else {
        Ok(Node::Fragment(nodes))
    }
}

/// Parse child nodes up to a closing tag, a closing brace or end of input.
pub(super) fn children(input: &mut Input<'_>) -> ModalResult<Vec<Node>> {
    let parsed: Vec<Option<Node>> = nested(repeat(0.., child)).parse_next(input)?;
    let merged = merge_text(parsed.into_iter().flatten().collect());
    Ok(merged
        .into_iter()
        .filter_map(|node| match node {
            Node::Text(text) => normalize_text(&text).map(Node::Text),
            other => Some(other),
        })
        .collect())
}

/// Parse a single child. Comments produce `None`.
fn child(input: &mut Input<'_>) -> ModalResult<Option<Node>> {
    alt((
        comment.value(None),
        doctype.map(|text: &str| Some(Node::text(text))),
        fragment.map(Some),
        element.map(|element| Some(Node::Element(element))),
        expression_node.map(Some),
        text.map(|text: &str| Some(Node::text(text))),
    ))
    .parse_next(input)
}

/// Merge adjacent text nodes (left adjacent once comments are dropped).
fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut result = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            Node::Text(text) => {
                if let Some(Node::Text(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Node::Text(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}

/// Apply JSX whitespace rules to a text run.
///
/// Text without a line break is kept verbatim. Otherwise each line is
/// trimmed (the first only at its end, the last only at its start), blank
/// lines are dropped and the rest joined with single spaces.
fn normalize_text(text: &str) -> Option<String> {
    if !text.contains('\n') {
        return Some(text.to_string());
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    let parts: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let mut line = *line;
            if i != 0 {
                line = line.trim_start();
            }
            if i != last {
                line = line.trim_end();
            }
            line
        })
        .filter(|line| !line.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Parse a text run: everything up to `<`, `{` or `}`.
fn text<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    take_till(1.., ['<', '{', '}']).parse_next(input)
}

/// Parse a comment: `<!-- ... -->`
fn comment<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    preceded(
        "<!--",
        cut_err(terminated(take_until(0.., "-->"), "-->"))
            .context(StrContext::Expected(StrContextValue::StringLiteral("-->"))),
    )
    .parse_next(input)
}

/// Parse a doctype or other `<!...>` declaration, keeping its source text.
fn doctype<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    ("<!", take_till(1.., '>'), '>').take().parse_next(input)
}

/// Parse an inline expression node: `{expr}`
fn expression_node(input: &mut Input<'_>) -> ModalResult<Node> {
    preceded(
        '{',
        cut_err(delimited(ws, expression, (ws, '}'))).context(StrContext::Label("expression")),
    )
    .map(Node::Expression)
    .parse_next(input)
}

/// Parse a fragment: `<>children</>`
fn fragment(input: &mut Input<'_>) -> ModalResult<Node> {
    preceded(
        "<>",
        cut_err(terminated(children, "</>"))
            .context(StrContext::Expected(StrContextValue::StringLiteral("</>"))),
    )
    .map(Node::Fragment)
    .parse_next(input)
}

/// Parse an element: `<tag attrs/>` or `<tag attrs>children</tag>`
pub(super) fn element(input: &mut Input<'_>) -> ModalResult<Element> {
    '<'.parse_next(input)?;
    let tag = tag_name(input)?;
    cut_err(|i: &mut Input<'_>| element_rest(i, tag)).parse_next(input)
}

/// Parse the remainder of an element once its tag name is known.
fn element_rest(input: &mut Input<'_>, tag: &str) -> ModalResult<Element> {
    let attrs = attributes(input)?;
    ws(input)?;

    if opt("/>").parse_next(input)?.is_some() {
        return Ok(Element {
            tag: tag.to_string(),
            attrs,
            children: Vec::new(),
            self_closing: true,
        });
    }

    '>'.context(StrContext::Expected(StrContextValue::CharLiteral('>')))
        .parse_next(input)?;
    let children = children(input)?;
    "</".context(StrContext::Label("closing tag"))
        .context(StrContext::Expected(StrContextValue::StringLiteral("</")))
        .parse_next(input)?;
    ws(input)?;
    tag_name
        .verify(|name: &&str| name.eq_ignore_ascii_case(tag))
        .context(StrContext::Label("closing tag"))
        .context(StrContext::Expected(StrContextValue::Description(
            "the name of the open element",
        )))
        .parse_next(input)?;
    ws(input)?;
    '>'.context(StrContext::Expected(StrContextValue::CharLiteral('>')))
        .parse_next(input)?;

    Ok(Element {
        tag: tag.to_string(),
        attrs,
        children,
        self_closing: false,
    })
}

/// Parse a tag name: one or more name segments separated by dots.
fn tag_name<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (name_segment, repeat(0.., ('.', name_segment)).map(|()| ()))
        .take()
        .parse_next(input)
}

/// Parse one segment of a tag or attribute name.
fn name_segment<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    )
        .take()
        .parse_next(input)
}

/// Parse the attribute list, rejecting duplicate names.
fn attributes(input: &mut Input<'_>) -> ModalResult<Vec<Attribute>> {
    let attrs: Vec<Attribute> = repeat(0.., preceded(ws1, attribute)).parse_next(input)?;
    for (i, attr) in attrs.iter().enumerate() {
        if attrs[..i].iter().any(|prev| prev.name == attr.name) {
            return fail::<_, Vec<Attribute>, _>
                .context(StrContext::Label("attribute"))
                .context(StrContext::Expected(StrContextValue::Description(
                    "unique attribute names",
                )))
                .parse_next(input);
        }
    }
    Ok(attrs)
}

/// Parse a single attribute: `name`, `name="lit"`, `name='lit'` or `name={expr}`.
fn attribute(input: &mut Input<'_>) -> ModalResult<Attribute> {
    let name = attribute_name(input)?;
    let value = opt(preceded((ws, '=', ws), cut_err(attribute_value))).parse_next(input)?;
    Ok(Attribute::new(
        name,
        value.unwrap_or_else(|| Node::text("")),
    ))
}

/// Parse an attribute name (`class`, `aria-label`, `hx-on:click`).
fn attribute_name<'i>(input: &mut Input<'i>) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
        }),
    )
        .take()
        .parse_next(input)
}

/// Parse an attribute value.
fn attribute_value(input: &mut Input<'_>) -> ModalResult<Node> {
    alt((
        delimited('"', take_till(0.., '"'), '"').map(Node::text),
        delimited('\'', take_till(0.., '\''), '\'').map(Node::text),
        delimited(('{', ws), expression, (ws, '}')).map(Node::Expression),
    ))
    .context(StrContext::Label("attribute value"))
    .parse_next(input)
}

/// Parse optional whitespace.
pub(super) fn ws(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

/// Parse at least one whitespace character.
fn ws1(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::normalize_text;

    #[test]
    fn single_line_text_is_verbatim() {
        assert_eq!(normalize_text("  Hello  "), Some("  Hello  ".to_string()));
    }

    #[test]
    fn multi_line_text_is_collapsed() {
        assert_eq!(
            normalize_text("Hello\n    big\n\n    world  \n  "),
            Some("Hello big world".to_string())
        );
    }

    #[test]
    fn indentation_only_is_dropped() {
        assert_eq!(normalize_text("\n        \n    "), None);
    }
}
