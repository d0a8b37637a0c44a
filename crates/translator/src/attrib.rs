//! Attribute, id and class selectors.

use crate::config::TranslatorConfig;
use cssxpath_selector::AttribOperator;
use cssxpath_xpath::{XPathExpr, is_safe_name, xpath_literal};

/// A reference to the attribute `name`: `@name`, or a name test on the
/// attribute axis when `name` cannot be written as an XPath name.
pub(crate) fn attribute_ref(name: &str) -> String {
    if is_safe_name(name) {
        format!("@{name}")
    } else {
        format!("attribute::*[name() = {}]", xpath_literal(name))
    }
}

pub fn translate_attrib(
    expr: XPathExpr,
    namespace: Option<&str>,
    attrib: &str,
    operator: AttribOperator,
    value: Option<&str>,
    config: &TranslatorConfig,
) -> XPathExpr {
    let attrib = if config.lower_case_attribute_names {
        attrib.to_ascii_lowercase()
    } else {
        attrib.to_string()
    };
    let attribute = match namespace {
        Some(ns) if is_safe_name(ns) && is_safe_name(&attrib) => format!("@{ns}:{attrib}"),
        Some(ns) => attribute_ref(&format!("{ns}:{attrib}")),
        None => attribute_ref(&attrib),
    };

    let value = value.map(|v| {
        if config.lower_case_attribute_values {
            v.to_ascii_lowercase()
        } else {
            v.to_string()
        }
    });
    let value = value.as_deref().unwrap_or_default();

    expr.add_condition(attribute_condition(&attribute, operator, value))
}

fn attribute_condition(attribute: &str, operator: AttribOperator, value: &str) -> String {
    let literal = xpath_literal(value);
    match operator {
        AttribOperator::Exists => attribute.to_string(),
        AttribOperator::Equals => format!("{attribute} = {literal}"),
        AttribOperator::Includes => includes(attribute, value),
        AttribOperator::DashMatch => format!(
            "{attribute} and ({attribute} = {literal} or starts-with({attribute}, {}))",
            xpath_literal(&format!("{value}-"))
        ),
        AttribOperator::PrefixMatch if value.is_empty() => "0".to_string(),
        AttribOperator::PrefixMatch => format!("{attribute} and starts-with({attribute}, {literal})"),
        AttribOperator::SuffixMatch if value.is_empty() => "0".to_string(),
        AttribOperator::SuffixMatch => format!(
            "{attribute} and substring({attribute}, string-length({attribute})-{}) = {literal}",
            value.chars().count() - 1
        ),
        AttribOperator::SubstringMatch if value.is_empty() => "0".to_string(),
        AttribOperator::SubstringMatch => format!("{attribute} and contains({attribute}, {literal})"),
        AttribOperator::NotEqual => format!("not({attribute}) or {attribute} != {literal}"),
    }
}

/// Whitespace-separated word membership, as used by `~=` and classes.
fn includes(attribute: &str, word: &str) -> String {
    if word.is_empty() || word.chars().any(char::is_whitespace) {
        return "0".to_string();
    }
    format!(
        "{attribute} and contains(concat(' ', normalize-space({attribute}), ' '), {})",
        xpath_literal(&format!(" {word} "))
    )
}

pub fn translate_class(expr: XPathExpr, class_name: &str, config: &TranslatorConfig) -> XPathExpr {
    let attribute = attribute_ref(&config.class_attribute);
    expr.add_condition(includes(&attribute, class_name))
}

pub fn translate_hash(expr: XPathExpr, id: &str, config: &TranslatorConfig) -> XPathExpr {
    let attribute = attribute_ref(&config.id_attribute);
    expr.add_condition(format!("{attribute} = {}", xpath_literal(id)))
}
