//! Scanner for Python-style host source.
//!
//! Finds the text string literals and `#` comments of a host file, with the
//! line each starts on. Byte strings and f-strings are consumed but not
//! reported.

use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

/// A text string literal in host source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostString {
    /// 1-based line of the opening quote.
    pub line: usize,
    /// The literal's value with escapes processed.
    pub value: String,
}

/// A `#` comment in host source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostComment {
    pub line: usize,
    /// Comment text without the `#` and surrounding whitespace.
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ScannedSource {
    pub strings: Vec<HostString>,
    pub comments: Vec<HostComment>,
}

impl ScannedSource {
    /// The block of comments directly above `line` that starts with one of
    /// `tags`, joined with newlines.
    ///
    /// Only consecutive comment lines ending on the line before `line` are
    /// considered; the block starts at the first tagged comment among them.
    pub fn translator_comments<S: AsRef<str>>(&self, line: usize, tags: &[S]) -> String {
        if tags.is_empty() {
            return String::new();
        }
        let mut block = Vec::new();
        let mut expected = line;
        for comment in self.comments.iter().rev() {
            if comment.line >= line {
                continue;
            }
            if comment.line + 1 != expected {
                break;
            }
            block.push(comment);
            expected = comment.line;
        }
        block.reverse();

        let Some(start) = block
            .iter()
            .position(|c| tags.iter().any(|tag| c.text.starts_with(tag.as_ref())))
        else {
            return String::new();
        };
        block[start..]
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone)]
enum Token {
    Str(String),
    Comment(String),
    Other,
}

/// Scan host source for string literals and comments.
///
/// An unterminated literal is skipped one character at a time, so scanning
/// always reaches the end of input.
pub fn scan(source: &str) -> ScannedSource {
    let mut scanned = ScannedSource::default();
    let mut input = source;
    let mut line = 1;

    while !input.is_empty() {
        let start = input;
        match token.parse_next(&mut input) {
            Ok(Token::Str(value)) => scanned.strings.push(HostString { line, value }),
            Ok(Token::Comment(text)) => scanned.comments.push(HostComment { line, text }),
            Ok(Token::Other) => {}
            Err(_) => {
                let mut chars = start.chars();
                chars.next();
                input = chars.as_str();
            }
        }
        let consumed = &start[..start.len() - input.len()];
        line += consumed.matches('\n').count();
    }

    scanned
}

fn token(input: &mut &str) -> ModalResult<Token> {
    alt((
        comment.map(Token::Comment),
        string_literal,
        take_while(1.., is_word).value(Token::Other),
        any.value(Token::Other),
    ))
    .parse_next(input)
}

fn comment(input: &mut &str) -> ModalResult<String> {
    preceded('#', take_till(0.., ['\n', '\r']))
        .map(|text: &str| text.trim().to_string())
        .parse_next(input)
}

/// Parse a string literal with an optional prefix (`r`, `u`, `b`, `f`, ...).
fn string_literal(input: &mut &str) -> ModalResult<Token> {
    let prefix = opt(take_while(1..=2, |c: char| "rRbBuUfF".contains(c)))
        .parse_next(input)?
        .unwrap_or("");
    let raw = prefix.contains(['r', 'R']);
    let value = alt((
        |i: &mut &str| triple_quoted(i, "\"\"\"", raw),
        |i: &mut &str| triple_quoted(i, "'''", raw),
        |i: &mut &str| quoted(i, '"', raw),
        |i: &mut &str| quoted(i, '\'', raw),
    ))
    .parse_next(input)?;

    if prefix.contains(['b', 'B', 'f', 'F']) {
        Ok(Token::Other)
    } else {
        Ok(Token::Str(value))
    }
}

fn triple_quoted(
    input: &mut &str,
    mut delimiter: &'static str,
    raw: bool,
) -> ModalResult<String> {
    delimiter.parse_next(input)?;
    let mut out = String::new();
    loop {
        if opt(delimiter).parse_next(input)?.is_some() {
            return Ok(out);
        }
        match any.parse_next(input)? {
            '\\' => escape(input, raw, &mut out)?,
            c => out.push(c),
        }
    }
}

fn quoted(input: &mut &str, mut quote: char, raw: bool) -> ModalResult<String> {
    quote.parse_next(input)?;
    let mut out = String::new();
    loop {
        match any.parse_next(input)? {
            c if c == quote => return Ok(out),
            '\\' => escape(input, raw, &mut out)?,
            '\n' => return Err(ErrMode::Backtrack(ContextError::new())),
            c => out.push(c),
        }
    }
}

/// Process the character after a backslash.
///
/// Raw literals keep the backslash; in both forms the escaped character
/// never closes the literal.
fn escape(input: &mut &str, raw: bool, out: &mut String) -> ModalResult<()> {
    let c = any.parse_next(input)?;
    if raw {
        out.push('\\');
        out.push(c);
        return Ok(());
    }
    match c {
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        '0' => out.push('\0'),
        '\\' | '\'' | '"' => out.push(c),
        // Line continuation.
        '\n' => {}
        other => {
            out.push('\\');
            out.push(other);
        }
    }
    Ok(())
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
