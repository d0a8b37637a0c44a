use serde::{Deserialize, Serialize};

/// The document flavour the translated expressions are evaluated against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Generic XML: names are case-sensitive and `:lang()` uses `xml:lang`.
    #[default]
    Xml,
    /// HTML parsed into a tree with lower-cased element and attribute names.
    Html,
    /// XHTML: HTML semantics with case-sensitive names.
    Xhtml,
}

impl Dialect {
    pub fn is_html(self) -> bool {
        matches!(self, Dialect::Html | Dialect::Xhtml)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct TranslatorConfig {
    /// Selects the pseudo-class semantics, see [`Dialect`].
    ///
    /// Defaults to [`Dialect::Xml`].
    pub dialect: Dialect,
    /// Prepended to every translated selector.
    ///
    /// Defaults to `descendant-or-self::`, which searches the context node and
    /// all of its descendants.
    pub prefix: String,
    /// Lower-cases type selectors before emitting name tests.
    pub lower_case_element_names: bool,
    /// Lower-cases attribute names in attribute selectors.
    pub lower_case_attribute_names: bool,
    /// Lower-cases the values compared by attribute selectors.
    pub lower_case_attribute_values: bool,
    /// The attribute matched by `#id`. Defaults to `id`.
    pub id_attribute: String,
    /// The attribute matched by `.class`. Defaults to `class`.
    pub class_attribute: String,
    /// The attribute the HTML dialects read for `:lang()`. Defaults to `lang`.
    pub lang_attribute: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Xml,
            prefix: "descendant-or-self::".to_string(),
            lower_case_element_names: false,
            lower_case_attribute_names: false,
            lower_case_attribute_values: false,
            id_attribute: "id".to_string(),
            class_attribute: "class".to_string(),
            lang_attribute: "lang".to_string(),
        }
    }
}

impl TranslatorConfig {
    pub fn for_dialect(dialect: Dialect) -> Self {
        let lower_case_names = dialect == Dialect::Html;
        Self {
            dialect,
            lower_case_element_names: lower_case_names,
            lower_case_attribute_names: lower_case_names,
            ..Self::default()
        }
    }

    pub fn html() -> Self {
        Self::for_dialect(Dialect::Html)
    }

    pub fn xhtml() -> Self {
        Self::for_dialect(Dialect::Xhtml)
    }
}
