use thiserror::Error;

/// Errors raised while tokenizing or parsing a selector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorSyntaxError {
    #[error("Unclosed string at position {pos}")]
    UnclosedString { pos: usize },

    #[error("Invalid string at position {pos}: unescaped newline")]
    InvalidString { pos: usize },

    #[error("Expected {expected}, got {found}")]
    Unexpected {
        expected: String,
        found: String,
        pos: usize,
    },

    #[error("Got pseudo-element ::{0} not at the end of a selector")]
    PseudoElementNotAtEnd(String),

    #[error("Got nested :not()")]
    NestedNegation,

    #[error("Got pseudo-element ::{0} inside a functional pseudo-class")]
    PseudoElementInArgument(String),

    #[error("Got :scope not at the start of a selector")]
    MisplacedScope,
}

/// Errors raised by the `an+b` series parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("String tokens are not allowed in a series")]
    StringToken,

    #[error("Invalid an+b expression '{0}'")]
    Invalid(String),
}
