use itertools::Itertools;

/// Quotes `value` as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escape sequences, so a value holding both quote kinds is
/// split into runs and reassembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let runs = value.chars().chunk_by(|c| *c == '\'');
        let parts = runs
            .into_iter()
            .map(|(is_quote, run)| {
                let run: String = run.collect();
                if is_quote {
                    format!("\"{run}\"")
                } else {
                    format!("'{run}'")
                }
            })
            .join(", ");
        format!("concat({parts})")
    }
}

/// Whether `name` can be written directly as an XPath name test
/// (`[a-zA-Z_][a-zA-Z0-9_.-]*`).
pub fn is_safe_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        }
        _ => false,
    }
}
