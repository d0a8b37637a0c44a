//! Translation of the non-functional pseudo-classes.

use crate::config::TranslatorConfig;
use crate::error::TranslateError;
use cssxpath_xpath::{XPathExpr, xpath_literal};

/// User-interaction and navigation states a static document never has.
const NEVER_MATCHING: &[&str] = &[
    "link",
    "visited",
    "hover",
    "active",
    "focus",
    "focus-within",
    "focus-visible",
    "target",
    "target-within",
    "current",
    "past",
    "future",
    "checked",
    "disabled",
    "enabled",
];

/// Adds the condition for `:ident`. `ident` is expected lower-cased.
pub fn translate_pseudo(
    expr: XPathExpr,
    ident: &str,
    config: &TranslatorConfig,
) -> Result<XPathExpr, TranslateError> {
    if config.dialect.is_html() {
        if let Some(condition) = html_condition(ident) {
            return Ok(expr.add_condition(condition));
        }
    }

    let condition = match ident {
        "root" => "not(parent::*)".to_string(),
        "scope" => "1".to_string(),
        "first-child" => "count(preceding-sibling::*) = 0".to_string(),
        "last-child" => "count(following-sibling::*) = 0".to_string(),
        "only-child" => "count(parent::*/child::*) = 1".to_string(),
        "first-of-type" => format!("count(preceding-sibling::{}) = 0", of_type(&expr, ident)?),
        "last-of-type" => format!("count(following-sibling::{}) = 0", of_type(&expr, ident)?),
        "only-of-type" => format!("count(parent::*/child::{}) = 1", of_type(&expr, ident)?),
        "empty" => "not(*) and not(string-length())".to_string(),
        other if NEVER_MATCHING.contains(&other) => "0".to_string(),
        other => return Err(TranslateError::UnknownPseudoClass(other.to_string())),
    };
    Ok(expr.add_condition(condition))
}

fn of_type<'e>(expr: &'e XPathExpr, ident: &str) -> Result<&'e str, TranslateError> {
    expr.type_name()
        .ok_or_else(|| TranslateError::UnsupportedSelector(format!("*:{ident}")))
}

// --- HTML ---

const TEXT_CONTROLS: &str = "(name(.) = 'input' and @type != 'hidden') \
     or name(.) = 'button' or name(.) = 'select' or name(.) = 'textarea'";

fn html_condition(ident: &str) -> Option<String> {
    let condition = match ident {
        "checked" => "(@selected and name(.) = 'option') or (@checked and \
             (name(.) = 'input' or name(.) = 'command') and \
             (@type = 'checkbox' or @type = 'radio'))"
            .to_string(),
        "link" => format!("@href and {}", names(&["a", "link", "area"])),
        "disabled" => format!(
            "(@disabled and ({TEXT_CONTROLS} or {})) or (({TEXT_CONTROLS}) and ancestor::fieldset[@disabled])",
            names(&["command", "fieldset", "optgroup", "option"])
        ),
        "enabled" => format!(
            "(@href and {}) or ({} and not(@disabled)) \
             or (({TEXT_CONTROLS} or name(.) = 'keygen') and not(@disabled or ancestor::fieldset[@disabled])) \
             or (name(.) = 'option' and not(@disabled or ancestor::optgroup[@disabled]))",
            names(&["a", "link", "area"]),
            names(&["command", "fieldset", "optgroup"])
        ),
        _ => return None,
    };
    Some(condition)
}

/// `(name(.) = 'a' or name(.) = 'b' ...)`
fn names(elements: &[&str]) -> String {
    let tests: Vec<String> = elements
        .iter()
        .map(|element| format!("name(.) = {}", xpath_literal(element)))
        .collect();
    format!("({})", tests.join(" or "))
}
