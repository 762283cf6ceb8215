//! Parser input carrying the current nesting depth.

use winnow::combinator::{cut_err, fail};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::Stateful;

/// Maximum depth of nested elements, fragments, blocks and parenthesized
/// expressions.
pub const MAX_NESTING: usize = 64;

/// Template source with the nesting depth reached so far.
pub(super) type Input<'i> = Stateful<&'i str, Nesting>;

#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Nesting {
    depth: usize,
}

/// Wrap a source string for parsing.
pub(super) fn stream(source: &str) -> Input<'_> {
    Stateful {
        input: source,
        state: Nesting::default(),
    }
}

/// Run `parser` one level deeper, failing once [`MAX_NESTING`] is reached.
pub(super) fn nested<'i, O, P>(mut parser: P) -> impl Parser<Input<'i>, O, ErrMode<ContextError>>
where
    P: Parser<Input<'i>, O, ErrMode<ContextError>>,
{
    move |input: &mut Input<'i>| -> ModalResult<O> {
        if input.state.depth >= MAX_NESTING {
            return cut_err(fail::<_, O, _>)
                .context(StrContext::Label("nesting depth"))
                .context(StrContext::Expected(StrContextValue::Description(
                    "at most 64 nested levels",
                )))
                .parse_next(input);
        }
        input.state.depth += 1;
        let result = parser.parse_next(input);
        input.state.depth -= 1;
        result
    }
}
