use std::fmt::{Display, Formatter, Result as FmtResult};

/// Already-rendered markup.
///
/// A `Markup` value is emitted verbatim; it is what a component invocation or
/// a `children` argument evaluates to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    pub fn new(html: impl Into<String>) -> Self {
        Markup(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the markup contains only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for Markup {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for Markup {
    fn from(html: String) -> Self {
        Markup(html)
    }
}

impl From<&str> for Markup {
    fn from(html: &str) -> Self {
        Markup(html.to_string())
    }
}
