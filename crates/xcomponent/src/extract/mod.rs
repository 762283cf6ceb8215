//! Translatable message extraction.
//!
//! [`extract_from_markup`] walks a parsed template and reports the literal
//! arguments of gettext-style calls. [`extract`] does the same for every
//! markup string literal found in a host source file, which is the entry
//! point for translation catalog tooling.

mod source;

use std::collections::HashMap;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::parser::ast::{Attribute, Body, Expr, Literal, Node};
use crate::parser::parse_markup;

pub use source::{HostComment, HostString, ScannedSource, scan};

/// Enclosing name reported at the document root and inside fragments.
pub const FRAGMENT: &str = "fragment";

/// Translation functions and the positions of their message arguments.
///
/// Domain and context arguments are not messages and are skipped.
const TRANSLATION_FUNCTIONS: &[(&str, &[usize])] = &[
    ("gettext", &[0]),
    ("dgettext", &[1]),
    ("ngettext", &[0, 1]),
    ("dngettext", &[1, 2]),
    ("pgettext", &[1]),
    ("dpgettext", &[2]),
    ("npgettext", &[1, 2]),
    ("dnpgettext", &[2, 3]),
];

/// A translatable message found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMessage {
    pub lineno: usize,
    /// Always empty; kept for the `(line, funcname, message, comments)`
    /// shape translation tooling expects.
    pub funcname: String,
    pub message: String,
    /// Translator comments attached from the host source.
    pub comments: String,
    /// Nearest enclosing element or component tag, or `"fragment"`.
    pub context: String,
}

impl ExtractedMessage {
    /// The message as a `(line, funcname, message, comments)` tuple.
    pub fn as_tuple(&self) -> (usize, &str, &str, &str) {
        (
            self.lineno,
            &self.funcname,
            &self.message,
            &self.comments,
        )
    }
}

/// Errors from [`extract`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read source: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("unsupported encoding '{name}'")]
    UnsupportedEncoding { name: String },

    #[error("source is not valid {encoding} at byte {offset}")]
    InvalidEncoding {
        encoding: &'static str,
        offset: usize,
    },
}

/// Text encodings accepted for host source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    /// Look up an encoding by label, ignoring case.
    pub fn from_label(label: &str) -> Result<Self, ExtractError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            _ => Err(ExtractError::UnsupportedEncoding {
                name: label.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Ascii => "ASCII",
            Encoding::Latin1 => "Latin-1",
        }
    }

    /// Decode raw bytes. A leading UTF-8 byte order mark is dropped.
    pub fn decode(self, bytes: &[u8]) -> Result<String, ExtractError> {
        match self {
            Encoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::InvalidEncoding {
                    encoding: self.name(),
                    offset: e.utf8_error().valid_up_to(),
                })
            }
            Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(ExtractError::InvalidEncoding {
                    encoding: self.name(),
                    offset,
                }),
                None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            },
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Extract messages from a host source stream.
///
/// The stream is decoded with the `encoding` option (UTF-8 by default) and
/// scanned for string literals. Each literal containing `{` or `<` is parsed
/// as the children of a fragment; every message found in it is reported at
/// the literal's starting line. Literals that are not valid markup are
/// skipped.
///
/// # Errors
///
/// Fails if the stream cannot be read, the encoding is unknown, or the
/// bytes are not valid in that encoding.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use xcomponent::extract::extract;
///
/// let source = "def render():\n    return \"<p>{globals.gettext('Welcome')}</p>\"\n";
/// let messages = extract(source.as_bytes(), &[] as &[&str], &[] as &[&str], &HashMap::new())
///     .unwrap();
/// assert_eq!(messages[0].as_tuple(), (2, "", "Welcome", ""));
/// ```
pub fn extract<R, K, C>(
    mut reader: R,
    keywords: &[K],
    comment_tags: &[C],
    options: &HashMap<String, String>,
) -> Result<Vec<ExtractedMessage>, ExtractError>
where
    R: Read,
    K: AsRef<str>,
    C: AsRef<str>,
{
    let encoding = match options.get("encoding") {
        Some(label) => Encoding::from_label(label)?,
        None => Encoding::default(),
    };
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = encoding.decode(&bytes)?;

    let scanned = scan(&text);
    let mut messages = Vec::new();
    for literal in &scanned.strings {
        if !literal.value.contains(['{', '<']) {
            continue;
        }
        let node = match parse_markup(&format!("<>{}</>", literal.value)) {
            Ok(node) => node,
            Err(error) => {
                debug!(line = literal.line, %error, "skipping string that is not markup");
                continue;
            }
        };
        let found = extract_from_markup(&node, literal.line, keywords);
        if found.is_empty() {
            continue;
        }
        let comments = scanned.translator_comments(literal.line, comment_tags);
        messages.extend(found.into_iter().map(|message| ExtractedMessage {
            comments: comments.clone(),
            ..message
        }));
    }
    Ok(messages)
}

/// Extract messages from a parsed template.
///
/// Every message is reported at `lineno`. When `keywords` is non-empty only
/// translation functions named there are recognized.
pub fn extract_from_markup<K: AsRef<str>>(
    node: &Node,
    lineno: usize,
    keywords: &[K],
) -> Vec<ExtractedMessage> {
    let mut extractor = Extractor {
        lineno,
        keywords,
        messages: Vec::new(),
    };
    extractor.node(node, FRAGMENT);
    extractor.messages
}

struct Extractor<'k, K> {
    lineno: usize,
    keywords: &'k [K],
    messages: Vec<ExtractedMessage>,
}

impl<K: AsRef<str>> Extractor<'_, K> {
    fn node(&mut self, node: &Node, context: &str) {
        match node {
            Node::Text(_) => {}
            Node::Element(element) => {
                self.element(&element.tag, &element.attrs, &element.children);
            }
            Node::Fragment(children) => self.nodes(children, FRAGMENT),
            Node::Expression(expr) => self.expr(expr, context),
        }
    }

    fn nodes(&mut self, nodes: &[Node], context: &str) {
        for node in nodes {
            self.node(node, context);
        }
    }

    fn element(&mut self, tag: &str, attrs: &[Attribute], children: &[Node]) {
        for attr in attrs {
            self.node(&attr.value, tag);
        }
        self.nodes(children, tag);
    }

    fn expr(&mut self, expr: &Expr, context: &str) {
        match expr {
            Expr::Literal(_) | Expr::Identifier(_) => {}
            Expr::MemberAccess { base, .. } => self.expr(base, context),
            Expr::Binary { left, right, .. } => {
                self.expr(left, context);
                self.expr(right, context);
            }
            Expr::Call { name, args } => {
                if let Some(positions) = self.message_positions(name) {
                    for &position in positions {
                        if let Some(Expr::Literal(Literal::Str(message))) = args.get(position) {
                            self.messages.push(ExtractedMessage {
                                lineno: self.lineno,
                                funcname: String::new(),
                                message: message.clone(),
                                comments: String::new(),
                                context: context.to_string(),
                            });
                        }
                    }
                }
                for arg in args {
                    self.expr(arg, context);
                }
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.expr(condition, context);
                self.body(then_branch, context);
                if let Some(body) = else_branch {
                    self.body(body, context);
                }
            }
            Expr::ForLoop { source, body, .. } => {
                self.expr(source, context);
                self.body(body, context);
            }
            Expr::ComponentInvocation {
                name,
                attrs,
                children,
                ..
            } => self.element(name, attrs, children),
        }
    }

    fn body(&mut self, body: &Body, context: &str) {
        match body {
            Body::Expr(expr) => self.expr(expr, context),
            Body::Nodes(nodes) => self.nodes(nodes, context),
        }
    }

    /// Message argument positions if `name` is a recognized translation call.
    ///
    /// Only the last segment of a dotted name counts, so `gettext`,
    /// `globals.gettext` and `i18n.gettext` are all recognized.
    fn message_positions(&self, name: &str) -> Option<&'static [usize]> {
        let function = name.rsplit('.').next().unwrap_or(name);
        if !self.keywords.is_empty() && !self.keywords.iter().any(|k| k.as_ref() == function) {
            return None;
        }
        TRANSLATION_FUNCTIONS
            .iter()
            .find(|(candidate, _)| *candidate == function)
            .map(|(_, positions)| *positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(source: &str) -> Vec<(String, String)> {
        let node = parse_markup(source).unwrap();
        extract_from_markup(&node, 1, &[] as &[&str])
            .into_iter()
            .map(|m| (m.context, m.message))
            .collect()
    }

    #[test]
    fn reports_context_of_nearest_tag() {
        assert_eq!(
            messages("<div><span>{gettext('inner')}</span>{gettext('outer')}</div>"),
            vec![
                ("span".to_string(), "inner".to_string()),
                ("div".to_string(), "outer".to_string()),
            ]
        );
    }

    #[test]
    fn fragment_is_the_root_context() {
        assert_eq!(
            messages("<>{globals.gettext('hi')}</>"),
            vec![("fragment".to_string(), "hi".to_string())]
        );
    }

    #[test]
    fn skips_domain_and_context_arguments() {
        let found = messages(
            "<p>{dgettext('domain', 'a')}{npgettext('ctx', 'one', 'many', n)}\
             {dnpgettext('domain', 'ctx', 'apple', 'apples', n)}</p>",
        );
        let texts: Vec<&str> = found.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(texts, vec!["a", "one", "many", "apple", "apples"]);
    }

    #[test]
    fn non_literal_arguments_are_skipped() {
        assert!(messages("<p>{gettext(title)}</p>").is_empty());
    }

    #[test]
    fn walks_conditionals_loops_and_invocations() {
        let found = messages(
            "<ul>{for x in xs { <li>{gettext('item')}</li> }}\
             {if ok { gettext('yes') } else { gettext('no') }}\
             <Card title={gettext('card')}/></ul>",
        );
        assert_eq!(
            found,
            vec![
                ("li".to_string(), "item".to_string()),
                ("ul".to_string(), "yes".to_string()),
                ("ul".to_string(), "no".to_string()),
                ("Card".to_string(), "card".to_string()),
            ]
        );
    }

    #[test]
    fn keywords_restrict_recognized_functions() {
        let node = parse_markup("<p>{gettext('a')}{ngettext('b', 'c', n)}</p>").unwrap();
        let found = extract_from_markup(&node, 3, &["ngettext"]);
        let texts: Vec<&str> = found.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert!(found.iter().all(|m| m.lineno == 3));
    }

    #[test]
    fn encoding_labels() {
        assert_eq!(Encoding::from_label("UTF8").unwrap(), Encoding::Utf8);
        assert_eq!(Encoding::from_label("ISO-8859-1").unwrap(), Encoding::Latin1);
        assert!(matches!(
            Encoding::from_label("ebcdic"),
            Err(ExtractError::UnsupportedEncoding { .. })
        ));
    }
}
