pub mod xpath;

use cssxpath::{FunctionCall, PseudoFunction, SelectorNode, TranslatorConfig, XPathExpr};
use xpath::predicate_holds;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds the call of `:nth-child(an+b)` as the parser produces it.
pub fn series_call(a: i32, b: i32) -> FunctionCall {
    let css = format!(":nth-child({a}n{b:+})");
    let selector = cssxpath::selector::parse(&css)
        .unwrap_or_else(|e| panic!("'{css}' should parse: {e}"))
        .remove(0);
    match selector.tree {
        SelectorNode::Function { call, .. } => call,
        other => panic!("Expected a functional pseudo-class in '{css}', got {other:?}"),
    }
}

/// The predicate `function` produces for `an+b`, or `None` if it only
/// adds structural steps.
pub fn series_predicate(function: PseudoFunction, a: i32, b: i32) -> Option<String> {
    let element = match function {
        PseudoFunction::NthOfType | PseudoFunction::NthLastOfType => "p",
        _ => "*",
    };
    function
        .translate(XPathExpr::new(element), &series_call(a, b), &TranslatorConfig::default())
        .unwrap_or_else(|e| panic!("{}({a}n{b:+}) should translate: {e}", function.name()))
        .condition()
}

/// The 1-based positions among `last` siblings the translated predicate selects.
pub fn selected_positions(function: PseudoFunction, a: i32, b: i32, last: usize) -> Vec<usize> {
    let predicate = series_predicate(function, a, b);
    (1..=last)
        .filter(|position| predicate_holds(predicate.as_deref(), *position, last))
        .collect()
}

/// Brute-force `{a*k + b | k >= 0}` restricted to `1..=last`.
pub fn expected_positions(a: i32, b: i32, last: usize) -> Vec<usize> {
    (1..=last)
        .filter(|position| {
            let position = *position as i64;
            (0..=64i64).any(|k| i64::from(a) * k + i64::from(b) == position)
        })
        .collect()
}
