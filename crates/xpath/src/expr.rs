//! An incremental builder for XPath 1.0 location paths.

use crate::literal::{is_safe_name, xpath_literal};
use itertools::Itertools;
use std::fmt;

/// A location path under construction: the steps rendered so far, the
/// current step's name test, and the predicates of that step.
///
/// All conditions render as one predicate, so `position()` and `last()` in
/// any of them refer to the step's own axis regardless of the other
/// conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathExpr {
    path: String,
    element: String,
    conditions: Vec<String>,
    star_prefix: bool,
    type_name: Option<String>,
}

impl XPathExpr {
    pub fn new(element: impl Into<String>) -> Self {
        let element = element.into();
        let type_name = (element != "*").then(|| element.clone());
        Self {
            path: String::new(),
            element,
            conditions: Vec::new(),
            star_prefix: false,
            type_name,
        }
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    /// The element name the step was created with, kept after
    /// [`add_name_test`](Self::add_name_test) widens the step to `*`.
    /// `None` for `*` and for names that cannot be written as a name test.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name
            .as_deref()
            .filter(|name| name.splitn(2, ':').all(is_safe_name))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_wildcard(&self) -> bool {
        self.element == "*"
    }

    pub fn has_star_prefix(&self) -> bool {
        self.star_prefix
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// The step's predicate without brackets, or `None` when it has none.
    pub fn condition(&self) -> Option<String> {
        match self.conditions.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(many.iter().map(|c| format!("({c})")).join(" and ")),
        }
    }

    pub fn add_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Adds the disjunction of `conditions` as a single condition.
    pub fn add_or_conditions<I, S>(self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let conditions: Vec<String> = conditions.into_iter().map(Into::into).collect();
        match conditions.as_slice() {
            [] => self,
            [single] => {
                let single = single.clone();
                self.add_condition(single)
            }
            many => {
                let joined = many.iter().map(|c| format!("({c})")).join(" or ");
                self.add_condition(joined)
            }
        }
    }

    /// Turns the name test into a condition so that the step matches any
    /// element. Conditions that were counted among same-named siblings are
    /// first folded into a membership test so they keep their meaning.
    pub fn add_name_test(mut self) -> Self {
        if self.is_wildcard() {
            return self;
        }
        if self.star_prefix && !self.conditions.is_empty() {
            self.conditions = vec![self.membership_test()];
        } else {
            self.conditions
                .push(format!("name() = {}", xpath_literal(&self.element)));
        }
        self.element = "*".to_string();
        self
    }

    /// Inserts a `*/` step so the current step is reached over the child
    /// axis. A step only ever gets one.
    pub fn add_star_prefix(mut self) -> Self {
        if !self.star_prefix {
            self.path.push_str("*/");
            self.star_prefix = true;
        }
        self
    }

    /// Appends `other` as a new step after `combiner`.
    pub fn join(self, combiner: &str, other: XPathExpr) -> Self {
        // The combiner ends in a child step already.
        let other_path = if other.path == "*/" { "" } else { other.path.as_str() };
        let path = format!("{self}{combiner}{other_path}");
        Self {
            path,
            element: other.element,
            conditions: other.conditions,
            star_prefix: other.star_prefix,
            type_name: other.type_name,
        }
    }

    /// Joins `other` over the `following-sibling` axis. `adjacent` restricts
    /// the match to the immediately following element.
    pub fn join_sibling(self, other: XPathExpr, adjacent: bool) -> Self {
        if other.star_prefix {
            let membership = other.membership_test();
            let joined = self.join("/following-sibling::", XPathExpr::new("*"));
            let joined = if adjacent {
                joined.add_condition("position() = 1")
            } else {
                joined
            };
            return joined.add_condition(membership);
        }

        let joined = self.join("/following-sibling::", other);
        if adjacent {
            joined.add_name_test().add_condition("position() = 1")
        } else {
            joined
        }
    }

    /// A condition true when the context node is one of the nodes this step
    /// selects among its parent's children.
    pub fn membership_test(&self) -> String {
        let step = match self.condition() {
            Some(condition) => format!("../{}[{condition}]", self.element),
            None => format!("../{}", self.element),
        };
        format!("count(. | {step}) = count({step})")
    }
}

impl fmt::Display for XPathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.element)?;
        if let Some(condition) = self.condition() {
            write!(f, "[{condition}]")?;
        }
        Ok(())
    }
}
