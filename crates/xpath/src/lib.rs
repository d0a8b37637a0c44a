//! Building blocks for emitting XPath 1.0: a location-path builder and
//! string-literal quoting.

pub mod expr;
pub mod literal;

pub use expr::XPathExpr;
pub use literal::{is_safe_name, xpath_literal};
