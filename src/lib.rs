//! CSS selectors to XPath 1.0.
//!
//! The workspace is split the same way the translation runs: `selector`
//! tokenizes and parses CSS, `xpath` holds the expression builder, and
//! `translator` walks the selector tree. This crate re-exports the pieces and
//! offers two shortcuts for the common case.
//!
//! ```
//! let xpath = cssxpath::css_to_xpath("tr:nth-child(2n+1)").unwrap();
//! assert_eq!(
//!     xpath,
//!     "descendant-or-self::*/*[(name() = 'tr') and ((position() -1) mod 2 = 0)]"
//! );
//! ```

pub use cssxpath_selector as selector;
pub use cssxpath_translator as translator;
pub use cssxpath_xpath as xpath;

pub use cssxpath_selector::{
    FunctionCall, Selector, SelectorNode, SelectorSyntaxError, Series, SeriesError, Specificity,
    Token, TokenKind,
};
pub use cssxpath_translator::{
    Dialect, FunctionTranslator, PseudoFunction, TranslateError, Translator, TranslatorConfig,
    lookup,
};
pub use cssxpath_xpath::{XPathExpr, is_safe_name, xpath_literal};

/// Translates `css` for generic XML documents with the default
/// `descendant-or-self::` prefix.
pub fn css_to_xpath(css: &str) -> Result<String, TranslateError> {
    Translator::generic().css_to_xpath(css)
}

/// Translates `css` with HTML semantics: case-insensitive element names and
/// the `:checked`, `:link`, `:disabled` and `:enabled` state tests.
pub fn html_to_xpath(css: &str) -> Result<String, TranslateError> {
    log::trace!("Translating '{}' with the HTML dialect", css);
    Translator::html().css_to_xpath(css)
}
