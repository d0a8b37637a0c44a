use cssxpath_selector::{SelectorSyntaxError, SeriesError, Token, format_tokens};
use thiserror::Error;

/// Errors raised while translating a selector to XPath. Translation either
/// succeeds completely or returns one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error(transparent)]
    Syntax(#[from] SelectorSyntaxError),

    #[error("Invalid series: '{arguments}'")]
    MalformedSeries {
        arguments: String,
        #[source]
        source: SeriesError,
    },

    #[error("Expected a single string or identifier for :{function}(), got {}", format_tokens(.arguments))]
    InvalidArgument {
        function: String,
        arguments: Vec<Token>,
    },

    #[error("Unsupported selector: {0}")]
    UnsupportedSelector(String),

    #[error("The pseudo-class :{0} is unknown")]
    UnknownPseudoClass(String),

    #[error("The pseudo-class :{0}() is unknown")]
    UnknownFunction(String),

    #[error("Pseudo-elements are not supported: ::{0}")]
    PseudoElement(String),
}
