//! CSS selector syntax: tokens, the selector tree and the `an+b` series grammar.

pub mod ast;
pub mod error;
pub mod parser;
pub mod series;
pub mod token;
pub mod tokenizer;

pub use ast::{
    AttribOperator, Combinator, FunctionCall, PseudoElement, Selector, SelectorNode, Specificity,
};
pub use error::{SelectorSyntaxError, SeriesError};
pub use parser::parse;
pub use series::{Series, parse_series};
pub use token::{Token, TokenKind, format_tokens, join_tokens};
pub use tokenizer::tokenize;
