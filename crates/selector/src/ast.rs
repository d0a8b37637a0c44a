//! Defines the syntax tree produced by the selector parser.

use crate::token::{Token, TokenKind, join_tokens};
use std::fmt;
use std::ops::Add;

/// One selector of a comma-separated selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub tree: SelectorNode,
    pub pseudo_element: Option<PseudoElement>,
}

impl Selector {
    pub fn specificity(&self) -> Specificity {
        let own = self.tree.specificity();
        if self.pseudo_element.is_some() {
            own + Specificity::new(0, 0, 1)
        } else {
            own
        }
    }
}

/// A functional pseudo-class call such as `:nth-child(2n+1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// The lower-cased pseudo-class name.
    pub name: String,
    /// Argument tokens in source order, whitespace removed.
    pub arguments: Vec<Token>,
}

impl FunctionCall {
    pub fn new(name: &str, arguments: Vec<Token>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            arguments,
        }
    }

    pub fn argument_kinds(&self) -> Vec<TokenKind> {
        self.arguments.iter().map(|t| t.kind).collect()
    }

    /// The arguments as CSS text, e.g. `2n+1` or `2n + 1`.
    pub fn arguments_css(&self) -> String {
        join_tokens(&self.arguments, Token::to_css)
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arguments_css())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {
    /// `::before`, or the CSS2 single-colon forms.
    Simple(String),
    /// `::name(arguments)`
    Functional(FunctionCall),
}

impl fmt::Display for PseudoElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoElement::Simple(name) => f.write_str(name),
            PseudoElement::Functional(call) => write!(f, "{call}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

impl Combinator {
    pub fn from_token(token: &Token) -> Option<Self> {
        if token.kind != TokenKind::Delim {
            return None;
        }
        match token.value.as_str() {
            ">" => Some(Combinator::Child),
            "+" => Some(Combinator::NextSibling),
            "~" => Some(Combinator::SubsequentSibling),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => ">",
            Combinator::NextSibling => "+",
            Combinator::SubsequentSibling => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttribOperator {
    /// `[a]`
    Exists,
    /// `[a=v]`
    Equals,
    /// `[a~=v]`
    Includes,
    /// `[a|=v]`
    DashMatch,
    /// `[a^=v]`
    PrefixMatch,
    /// `[a$=v]`
    SuffixMatch,
    /// `[a*=v]`
    SubstringMatch,
    /// `[a!=v]`, a common non-standard extension.
    NotEqual,
}

impl AttribOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(AttribOperator::Equals),
            "~=" => Some(AttribOperator::Includes),
            "|=" => Some(AttribOperator::DashMatch),
            "^=" => Some(AttribOperator::PrefixMatch),
            "$=" => Some(AttribOperator::SuffixMatch),
            "*=" => Some(AttribOperator::SubstringMatch),
            "!=" => Some(AttribOperator::NotEqual),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AttribOperator::Exists => "",
            AttribOperator::Equals => "=",
            AttribOperator::Includes => "~=",
            AttribOperator::DashMatch => "|=",
            AttribOperator::PrefixMatch => "^=",
            AttribOperator::SuffixMatch => "$=",
            AttribOperator::SubstringMatch => "*=",
            AttribOperator::NotEqual => "!=",
        }
    }
}

/// A node of the selector tree. Simple selectors wrap the selector they
/// qualify, so `div.a:first-child` is `Pseudo(Class(Element(div)))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorNode {
    /// Type or universal selector; `None` means `*`.
    Element {
        namespace: Option<String>,
        element: Option<String>,
    },
    Class {
        selector: Box<SelectorNode>,
        class_name: String,
    },
    Hash {
        selector: Box<SelectorNode>,
        id: String,
    },
    Attrib {
        selector: Box<SelectorNode>,
        namespace: Option<String>,
        attrib: String,
        operator: AttribOperator,
        value: Option<Token>,
    },
    /// A pseudo-class without arguments; `ident` is lower-cased.
    Pseudo {
        selector: Box<SelectorNode>,
        ident: String,
    },
    Function {
        selector: Box<SelectorNode>,
        call: FunctionCall,
    },
    /// `:not(subselector)`
    Negation {
        selector: Box<SelectorNode>,
        subselector: Box<SelectorNode>,
    },
    /// `:is(...)` and its legacy alias `:matches(...)`
    Matching {
        selector: Box<SelectorNode>,
        selector_list: Vec<SelectorNode>,
    },
    /// `:where(...)`, which matches like `:is()` but adds no specificity.
    SpecificityAdjustment {
        selector: Box<SelectorNode>,
        selector_list: Vec<SelectorNode>,
    },
    /// `:has(combinator subselector)`
    Relation {
        selector: Box<SelectorNode>,
        combinator: Combinator,
        subselector: Box<SelectorNode>,
    },
    Combined {
        left: Box<SelectorNode>,
        combinator: Combinator,
        right: Box<SelectorNode>,
    },
}

impl SelectorNode {
    /// The universal selector `*` without namespace.
    pub fn universal() -> Self {
        SelectorNode::Element {
            namespace: None,
            element: None,
        }
    }

    pub fn specificity(&self) -> Specificity {
        match self {
            SelectorNode::Element { element, .. } => {
                Specificity::new(0, 0, u32::from(element.is_some()))
            }
            SelectorNode::Hash { selector, .. } => selector.specificity() + Specificity::new(1, 0, 0),
            SelectorNode::Class { selector, .. }
            | SelectorNode::Attrib { selector, .. }
            | SelectorNode::Pseudo { selector, .. }
            | SelectorNode::Function { selector, .. } => {
                selector.specificity() + Specificity::new(0, 1, 0)
            }
            SelectorNode::Negation {
                selector,
                subselector,
            }
            | SelectorNode::Relation {
                selector,
                subselector,
                ..
            } => selector.specificity() + subselector.specificity(),
            SelectorNode::Matching {
                selector,
                selector_list,
            } => {
                let most_specific = selector_list
                    .iter()
                    .map(SelectorNode::specificity)
                    .max()
                    .unwrap_or_default();
                selector.specificity() + most_specific
            }
            SelectorNode::SpecificityAdjustment { selector, .. } => selector.specificity(),
            SelectorNode::Combined { left, right, .. } => left.specificity() + right.specificity(),
        }
    }
}

/// Selector specificity as `(ids, classes, elements)`; ordering is lexicographic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub elements: u32,
}

impl Specificity {
    pub const fn new(ids: u32, classes: u32, elements: u32) -> Self {
        Self {
            ids,
            classes,
            elements,
        }
    }
}

impl Add for Specificity {
    type Output = Specificity;

    fn add(self, other: Specificity) -> Specificity {
        Specificity::new(
            self.ids + other.ids,
            self.classes + other.classes,
            self.elements + other.elements,
        )
    }
}

// --- CSS serialization ---

fn write_ident(f: &mut fmt::Formatter<'_>, ident: &str) -> fmt::Result {
    for (i, c) in ident.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            write!(f, "\\{:x} ", u32::from(c))?;
        } else if c == '_' || c == '-' || c.is_ascii_alphanumeric() || !c.is_ascii() {
            write!(f, "{c}")?;
        } else {
            write!(f, "\\{c}")?;
        }
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[SelectorNode]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

impl fmt::Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorNode::Element { namespace, element } => {
                if let Some(ns) = namespace {
                    write_ident(f, ns)?;
                    f.write_str("|")?;
                }
                match element {
                    Some(name) => write_ident(f, name),
                    None => f.write_str("*"),
                }
            }
            SelectorNode::Class {
                selector,
                class_name,
            } => {
                write!(f, "{selector}.")?;
                write_ident(f, class_name)
            }
            SelectorNode::Hash { selector, id } => {
                write!(f, "{selector}#")?;
                write_ident(f, id)
            }
            SelectorNode::Attrib {
                selector,
                namespace,
                attrib,
                operator,
                value,
            } => {
                write!(f, "{selector}[")?;
                if let Some(ns) = namespace {
                    write_ident(f, ns)?;
                    f.write_str("|")?;
                }
                write_ident(f, attrib)?;
                if let Some(value) = value {
                    f.write_str(operator.symbol())?;
                    match value.kind {
                        TokenKind::Ident => write_ident(f, &value.value)?,
                        _ => f.write_str(&value.to_css())?,
                    }
                }
                f.write_str("]")
            }
            SelectorNode::Pseudo { selector, ident } => write!(f, "{selector}:{ident}"),
            SelectorNode::Function { selector, call } => write!(f, "{selector}:{call}"),
            SelectorNode::Negation {
                selector,
                subselector,
            } => write!(f, "{selector}:not({subselector})"),
            SelectorNode::Matching {
                selector,
                selector_list,
            } => {
                write!(f, "{selector}:is(")?;
                write_list(f, selector_list)?;
                f.write_str(")")
            }
            SelectorNode::SpecificityAdjustment {
                selector,
                selector_list,
            } => {
                write!(f, "{selector}:where(")?;
                write_list(f, selector_list)?;
                f.write_str(")")
            }
            SelectorNode::Relation {
                selector,
                combinator,
                subselector,
            } => match combinator {
                Combinator::Descendant => write!(f, "{selector}:has({subselector})"),
                other => write!(f, "{selector}:has({} {subselector})", other.symbol()),
            },
            SelectorNode::Combined {
                left,
                combinator,
                right,
            } => match combinator {
                Combinator::Descendant => write!(f, "{left} {right}"),
                other => write!(f, "{left} {} {right}", other.symbol()),
            },
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree)?;
        if let Some(pseudo) = &self.pseudo_element {
            write!(f, "::{pseudo}")?;
        }
        Ok(())
    }
}
