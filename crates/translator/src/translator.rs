//! The translation pass from parsed selectors to XPath.

use crate::attrib::{translate_attrib, translate_class, translate_hash};
use crate::config::TranslatorConfig;
use crate::error::TranslateError;
use crate::functions::PseudoFunction;
use crate::pseudo::translate_pseudo;
use cssxpath_selector::{Combinator, Selector, SelectorNode, parse};
use cssxpath_xpath::{XPathExpr, is_safe_name};

/// Translates CSS selectors to XPath 1.0 under a fixed [`TranslatorConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translator {
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    /// Generic XML semantics.
    pub fn generic() -> Self {
        Self::new(TranslatorConfig::default())
    }

    pub fn html() -> Self {
        Self::new(TranslatorConfig::html())
    }

    pub fn xhtml() -> Self {
        Self::new(TranslatorConfig::xhtml())
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translates a selector group using the configured prefix.
    pub fn css_to_xpath(&self, css: &str) -> Result<String, TranslateError> {
        self.css_to_xpath_with_prefix(css, &self.config.prefix)
    }

    /// Translates a selector group; the alternatives are joined with ` | `.
    pub fn css_to_xpath_with_prefix(&self, css: &str, prefix: &str) -> Result<String, TranslateError> {
        log::debug!("Translating selector group '{css}'");
        let result = parse(css)
            .map_err(TranslateError::from)
            .and_then(|selectors| {
                selectors
                    .iter()
                    .map(|selector| self.selector_to_xpath(selector, prefix))
                    .collect::<Result<Vec<_>, _>>()
            });

        match result {
            Ok(alternatives) => Ok(alternatives.join(" | ")),
            Err(err) => {
                log::debug!("Rejected selector '{css}': {err}");
                Err(err)
            }
        }
    }

    pub fn selector_to_xpath(&self, selector: &Selector, prefix: &str) -> Result<String, TranslateError> {
        if let Some(pseudo) = &selector.pseudo_element {
            return Err(TranslateError::PseudoElement(pseudo.to_string()));
        }
        let expr = self.xpath(&selector.tree)?;
        Ok(format!("{prefix}{expr}"))
    }

    /// Translates one selector tree into an expression builder.
    pub fn xpath(&self, node: &SelectorNode) -> Result<XPathExpr, TranslateError> {
        match node {
            SelectorNode::Element { namespace, element } => Ok(self.element(namespace.as_deref(), element.as_deref())),
            SelectorNode::Class {
                selector,
                class_name,
            } => Ok(translate_class(self.xpath(selector)?, class_name, &self.config)),
            SelectorNode::Hash { selector, id } => Ok(translate_hash(self.xpath(selector)?, id, &self.config)),
            SelectorNode::Attrib {
                selector,
                namespace,
                attrib,
                operator,
                value,
            } => Ok(translate_attrib(
                self.xpath(selector)?,
                namespace.as_deref(),
                attrib,
                *operator,
                value.as_ref().map(|token| token.value.as_str()),
                &self.config,
            )),
            SelectorNode::Pseudo { selector, ident } => translate_pseudo(self.xpath(selector)?, ident, &self.config),
            SelectorNode::Function { selector, call } => {
                let expr = self.xpath(selector)?;
                match PseudoFunction::from_name(&call.name) {
                    Some(function) => function.translate(expr, call, &self.config),
                    None => Err(TranslateError::UnknownFunction(call.name.clone())),
                }
            }
            SelectorNode::Negation {
                selector,
                subselector,
            } => {
                let expr = self.xpath(selector)?;
                let condition = argument_condition(self.xpath(subselector)?);
                Ok(match condition {
                    Some(condition) => expr.add_condition(format!("not({condition})")),
                    None => expr.add_condition("0"),
                })
            }
            SelectorNode::Matching {
                selector,
                selector_list,
            }
            | SelectorNode::SpecificityAdjustment {
                selector,
                selector_list,
            } => {
                let expr = self.xpath(selector)?;
                let conditions = selector_list
                    .iter()
                    .map(|argument| -> Result<String, TranslateError> {
                        let condition = argument_condition(self.xpath(argument)?);
                        Ok(condition.unwrap_or_else(|| "1".to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(expr.add_or_conditions(conditions))
            }
            SelectorNode::Relation {
                selector,
                combinator,
                subselector,
            } => {
                let expr = self.xpath(selector)?;
                let relative = self.relative_xpath(*combinator, subselector)?;
                Ok(expr.add_condition(relative.to_string()))
            }
            SelectorNode::Combined {
                left,
                combinator,
                right,
            } => Ok(combine(self.xpath(left)?, *combinator, self.xpath(right)?)),
        }
    }

    fn element(&self, namespace: Option<&str>, element: Option<&str>) -> XPathExpr {
        let (name, mut safe) = match element {
            Some(name) if self.config.lower_case_element_names => {
                let name = name.to_ascii_lowercase();
                let safe = is_safe_name(&name);
                (name, safe)
            }
            Some(name) => (name.to_string(), is_safe_name(name)),
            None => ("*".to_string(), true),
        };
        let name = match namespace {
            Some(ns) => {
                safe = safe && is_safe_name(ns);
                format!("{ns}:{name}")
            }
            None => name,
        };

        let expr = XPathExpr::new(name);
        if safe { expr } else { expr.add_name_test() }
    }

    /// The argument of `:has()`, anchored at the context node.
    fn relative_xpath(&self, combinator: Combinator, node: &SelectorNode) -> Result<XPathExpr, TranslateError> {
        match node {
            SelectorNode::Combined {
                left,
                combinator: inner,
                right,
            } => {
                let left = self.relative_xpath(combinator, left)?;
                Ok(combine(left, *inner, self.xpath(right)?))
            }
            other => Ok(combine(XPathExpr::new("."), combinator, self.xpath(other)?)),
        }
    }
}

fn combine(left: XPathExpr, combinator: Combinator, right: XPathExpr) -> XPathExpr {
    match combinator {
        Combinator::Descendant => left.join("/descendant-or-self::*/", right),
        Combinator::Child => left.join("/", right),
        Combinator::NextSibling => left.join_sibling(right, true),
        Combinator::SubsequentSibling => left.join_sibling(right, false),
    }
}

/// The condition an argument of `:not()`, `:is()` or `:where()` contributes,
/// or `None` when it matches every element. Positional arguments are
/// re-anchored at the parent so their positions count children.
fn argument_condition(argument: XPathExpr) -> Option<String> {
    if argument.has_star_prefix() {
        Some(argument.membership_test())
    } else {
        argument.add_name_test().condition()
    }
}
