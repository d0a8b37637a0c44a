//! Translation of the functional pseudo-classes: the `nth-*` family, which
//! compares sibling positions against an `an+b` series, and the literal
//! predicates `:contains()` and `:lang()`.

use crate::attrib::attribute_ref;
use crate::config::TranslatorConfig;
use crate::error::TranslateError;
use cssxpath_selector::{FunctionCall, Series, Token, parse_series};
use cssxpath_xpath::{XPathExpr, xpath_literal};
use std::cmp::Ordering;

/// The signature shared by all functional pseudo-class translators.
pub type FunctionTranslator =
    fn(XPathExpr, &FunctionCall, &TranslatorConfig) -> Result<XPathExpr, TranslateError>;

/// The functional pseudo-classes the translator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoFunction {
    NthChild,
    NthLastChild,
    NthOfType,
    NthLastOfType,
    Contains,
    Lang,
}

impl PseudoFunction {
    pub const ALL: [PseudoFunction; 6] = [
        PseudoFunction::NthChild,
        PseudoFunction::NthLastChild,
        PseudoFunction::NthOfType,
        PseudoFunction::NthLastOfType,
        PseudoFunction::Contains,
        PseudoFunction::Lang,
    ];

    /// Looks a pseudo-class up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|function| function.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            PseudoFunction::NthChild => "nth-child",
            PseudoFunction::NthLastChild => "nth-last-child",
            PseudoFunction::NthOfType => "nth-of-type",
            PseudoFunction::NthLastOfType => "nth-last-of-type",
            PseudoFunction::Contains => "contains",
            PseudoFunction::Lang => "lang",
        }
    }

    pub fn translator(self) -> FunctionTranslator {
        match self {
            PseudoFunction::NthChild => nth_child,
            PseudoFunction::NthLastChild => nth_last_child,
            PseudoFunction::NthOfType => nth_of_type,
            PseudoFunction::NthLastOfType => nth_last_of_type,
            PseudoFunction::Contains => contains,
            PseudoFunction::Lang => lang,
        }
    }

    pub fn translate(
        self,
        expr: XPathExpr,
        call: &FunctionCall,
        config: &TranslatorConfig,
    ) -> Result<XPathExpr, TranslateError> {
        log::trace!("Translating :{call} on '{expr}'");
        (self.translator())(expr, call, config)
    }
}

/// Returns the translator registered for `name`, if any.
pub fn lookup(name: &str) -> Option<FunctionTranslator> {
    PseudoFunction::from_name(name).map(PseudoFunction::translator)
}

// --- Series predicates ---

pub fn nth_child(
    expr: XPathExpr,
    call: &FunctionCall,
    _config: &TranslatorConfig,
) -> Result<XPathExpr, TranslateError> {
    translate_series(expr, call, false, true)
}

pub fn nth_last_child(
    expr: XPathExpr,
    call: &FunctionCall,
    _config: &TranslatorConfig,
) -> Result<XPathExpr, TranslateError> {
    translate_series(expr, call, true, true)
}

pub fn nth_of_type(
    expr: XPathExpr,
    call: &FunctionCall,
    _config: &TranslatorConfig,
) -> Result<XPathExpr, TranslateError> {
    require_element(&expr, call)?;
    translate_series(expr, call, false, false)
}

pub fn nth_last_of_type(
    expr: XPathExpr,
    call: &FunctionCall,
    _config: &TranslatorConfig,
) -> Result<XPathExpr, TranslateError> {
    require_element(&expr, call)?;
    translate_series(expr, call, true, false)
}

fn require_element(expr: &XPathExpr, call: &FunctionCall) -> Result<(), TranslateError> {
    if expr.type_name().is_none() {
        return Err(TranslateError::UnsupportedSelector(format!("*:{call}")));
    }
    Ok(())
}

/// Restricts `expr` to the siblings whose position matches the call's series.
///
/// With `restrict_by_name` the element test becomes a condition so positions
/// count every element sibling; otherwise they count same-named siblings.
fn translate_series(
    expr: XPathExpr,
    call: &FunctionCall,
    from_last: bool,
    restrict_by_name: bool,
) -> Result<XPathExpr, TranslateError> {
    let series = parse_series(&call.arguments).map_err(|source| TranslateError::MalformedSeries {
        arguments: call.arguments_css(),
        source,
    })?;

    let conditions = series_conditions(series, from_last);
    if !conditions.is_empty() && !restrict_by_name && expr.is_wildcard() {
        // An earlier child position widened the step to `*`, so same-named
        // siblings are counted through the parent instead.
        if let Some(name) = expr.type_name() {
            let of_type = XPathExpr::new(name).add_condition(conditions.join(" and "));
            return Ok(expr.add_star_prefix().add_condition(of_type.membership_test()));
        }
    }

    let expr = if restrict_by_name {
        expr.add_name_test()
    } else {
        expr
    };
    let expr = expr.add_star_prefix();

    if conditions.is_empty() {
        Ok(expr)
    } else {
        Ok(expr.add_condition(conditions.join(" and ")))
    }
}

/// The conditions on `position()` equivalent to membership in `series`.
///
/// Counting from the end, the position from the end is `last() + 1 -
/// position()`, so the series becomes `(-a)k + (last() + 1 - b)` over plain
/// positions.
fn series_conditions(series: Series, from_last: bool) -> Vec<String> {
    let (a, b) = (i64::from(series.a), i64::from(series.b));
    let anchor = if from_last {
        last_anchor(b)
    } else {
        b.to_string()
    };

    if a == 0 {
        return vec![format!("position() = {anchor}")];
    }

    let step = if from_last { -a } else { a };
    let mut conditions = Vec::with_capacity(2);

    if step.abs() != 1 {
        let distance = if from_last {
            format!("position() - last() {}", negated(1 - b))
        } else {
            format!("position() {}", negated(b))
        };
        conditions.push(format!("({distance}) mod {} = 0", step.abs()));
    }

    // Positions start at 1 and end at last(), which makes some bounds redundant.
    let redundant = b <= 1 && (from_last == (step < 0));
    if !redundant {
        let comparison = if step > 0 { ">=" } else { "<=" };
        conditions.push(format!("position() {comparison} {anchor}"));
    }

    conditions
}

/// `last() + 1 - b`, folded into the shortest form.
fn last_anchor(b: i64) -> String {
    let shift = 1 - b;
    match shift.cmp(&0) {
        Ordering::Equal => "last()".to_string(),
        Ordering::Greater => format!("last() + {shift}"),
        Ordering::Less => format!("last() - {}", -shift),
    }
}

/// Renders `- n` as a signed term: `-3` for 3, `+2` for -2, `+0` for 0.
fn negated(n: i64) -> String {
    if n > 0 {
        format!("-{n}")
    } else {
        format!("+{}", -n)
    }
}

// --- Literal predicates ---

pub fn contains(
    expr: XPathExpr,
    call: &FunctionCall,
    _config: &TranslatorConfig,
) -> Result<XPathExpr, TranslateError> {
    let value = literal_argument(call)?;
    Ok(expr.add_condition(format!("contains(., {})", xpath_literal(value))))
}

pub fn lang(
    expr: XPathExpr,
    call: &FunctionCall,
    config: &TranslatorConfig,
) -> Result<XPathExpr, TranslateError> {
    let value = literal_argument(call)?;
    if !config.dialect.is_html() {
        return Ok(expr.add_condition(format!("lang({})", xpath_literal(value))));
    }

    // The nearest element carrying the attribute decides, compared
    // case-insensitively with a `-` suffix.
    let attribute = attribute_ref(&config.lang_attribute);
    let prefix = format!("{}-", value.to_ascii_lowercase());
    Ok(expr.add_condition(format!(
        "ancestor-or-self::*[{attribute}][1][starts-with(concat(translate({attribute}, \
         'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), '-'), {})]",
        xpath_literal(&prefix)
    )))
}

/// The first argument of a call that takes a single string or identifier.
fn literal_argument(call: &FunctionCall) -> Result<&str, TranslateError> {
    match call.arguments.first() {
        Some(first) if call.arguments.iter().all(Token::is_string_or_ident) => {
            Ok(first.value.as_str())
        }
        _ => Err(TranslateError::InvalidArgument {
            function: call.name.clone(),
            arguments: call.arguments.clone(),
        }),
    }
}
