//! Translates CSS selectors into XPath 1.0 expressions.
//!
//! The [`Translator`] walks a parsed selector and builds an
//! [`XPathExpr`](cssxpath_xpath::XPathExpr) per compound selector. Functional
//! pseudo-classes are dispatched through [`PseudoFunction`].

pub mod attrib;
pub mod config;
pub mod error;
pub mod functions;
pub mod pseudo;
pub mod translator;

pub use config::{Dialect, TranslatorConfig};
pub use error::TranslateError;
pub use functions::{FunctionTranslator, PseudoFunction, lookup};
pub use translator::Translator;
