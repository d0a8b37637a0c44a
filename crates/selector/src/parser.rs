//! Recursive-descent parser turning selector tokens into [`Selector`] trees.

use crate::ast::{AttribOperator, Combinator, FunctionCall, PseudoElement, Selector, SelectorNode};
use crate::error::SelectorSyntaxError;
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;

/// Parses a comma-separated selector group.
pub fn parse(css: &str) -> Result<Vec<Selector>, SelectorSyntaxError> {
    let tokens = tokenize(css)?;
    let mut stream = TokenStream::new(&tokens);
    parse_selector_group(&mut stream)
}

/// Where a compound selector is being parsed. Nested contexts end at `)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    TopLevel,
    Nested,
    Negation,
}

struct TokenStream<'t> {
    tokens: &'t [Token],
    index: usize,
}

impl<'t> TokenStream<'t> {
    /// `tokens` must end with an `Eof` token, which `tokenize` guarantees.
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> &'t Token {
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    /// Returns the current token and advances. `Eof` is returned repeatedly.
    fn next(&mut self) -> &'t Token {
        let token = self.peek();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    /// Number of tokens consumed so far.
    fn used(&self) -> usize {
        self.index
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.next();
        }
    }

    fn next_ident(&mut self) -> Result<String, SelectorSyntaxError> {
        let token = self.next();
        if token.kind == TokenKind::Ident {
            Ok(token.value.clone())
        } else {
            Err(unexpected("identifier", token))
        }
    }

    /// `Some(name)` for an identifier, `None` for `*`.
    fn next_ident_or_star(&mut self) -> Result<Option<String>, SelectorSyntaxError> {
        let token = self.next();
        if token.kind == TokenKind::Ident {
            Ok(Some(token.value.clone()))
        } else if token.is_delim(&["*"]) {
            Ok(None)
        } else {
            Err(unexpected("identifier or '*'", token))
        }
    }
}

fn unexpected(expected: &str, found: &Token) -> SelectorSyntaxError {
    SelectorSyntaxError::Unexpected {
        expected: expected.to_string(),
        found: found.to_string(),
        pos: found.pos,
    }
}

fn parse_selector_group(stream: &mut TokenStream) -> Result<Vec<Selector>, SelectorSyntaxError> {
    stream.skip_whitespace();
    let mut selectors = Vec::new();
    loop {
        selectors.push(parse_selector(stream, Context::TopLevel)?);
        if stream.peek().is_delim(&[","]) {
            stream.next();
            stream.skip_whitespace();
        } else {
            break;
        }
    }
    Ok(selectors)
}

fn parse_selector(stream: &mut TokenStream, context: Context) -> Result<Selector, SelectorSyntaxError> {
    let (mut result, mut pseudo_element) = parse_simple_selector(stream, context, true)?;

    loop {
        stream.skip_whitespace();
        let peek = stream.peek();
        if peek.is_eof() || peek.is_delim(&[","]) || (context != Context::TopLevel && peek.is_delim(&[")"])) {
            break;
        }
        if let Some(pseudo) = &pseudo_element {
            return Err(SelectorSyntaxError::PseudoElementNotAtEnd(pseudo.to_string()));
        }

        let combinator = match Combinator::from_token(peek) {
            Some(combinator) => {
                stream.next();
                stream.skip_whitespace();
                combinator
            }
            // Only whitespace separated the previous compound from this one.
            None => Combinator::Descendant,
        };

        let (next, next_pseudo) = parse_simple_selector(stream, context, false)?;
        pseudo_element = next_pseudo;
        result = SelectorNode::Combined {
            left: Box::new(result),
            combinator,
            right: Box::new(next),
        };
    }

    Ok(Selector {
        tree: result,
        pseudo_element,
    })
}

fn parse_simple_selector(
    stream: &mut TokenStream,
    context: Context,
    first_in_selector: bool,
) -> Result<(SelectorNode, Option<PseudoElement>), SelectorSyntaxError> {
    stream.skip_whitespace();
    let selector_start = stream.used();

    let peek = stream.peek();
    let (namespace, element) = if peek.kind == TokenKind::Ident || peek.is_delim(&["*"]) {
        let first = stream.next_ident_or_star()?;
        if stream.peek().is_delim(&["|"]) {
            stream.next();
            (first, stream.next_ident_or_star()?)
        } else {
            (None, first)
        }
    } else {
        (None, None)
    };

    let mut result = SelectorNode::Element { namespace, element };
    let mut pseudo_element: Option<PseudoElement> = None;

    loop {
        let peek = stream.peek();
        if peek.is_whitespace()
            || peek.is_eof()
            || peek.is_delim(&[",", "+", ">", "~"])
            || (context != Context::TopLevel && peek.is_delim(&[")"]))
        {
            break;
        }
        if let Some(pseudo) = &pseudo_element {
            return Err(SelectorSyntaxError::PseudoElementNotAtEnd(pseudo.to_string()));
        }

        if peek.kind == TokenKind::Hash {
            let id = stream.next().value.clone();
            result = SelectorNode::Hash {
                selector: Box::new(result),
                id,
            };
        } else if peek.is_delim(&["."]) {
            stream.next();
            let class_name = stream.next_ident()?;
            result = SelectorNode::Class {
                selector: Box::new(result),
                class_name,
            };
        } else if peek.is_delim(&["|"]) {
            // `|name`: an element in no namespace.
            stream.next();
            let element = stream.next_ident()?;
            result = SelectorNode::Element {
                namespace: None,
                element: Some(element),
            };
        } else if peek.is_delim(&["["]) {
            stream.next();
            result = parse_attrib(result, stream)?;
        } else if peek.is_delim(&[":"]) {
            stream.next();
            if stream.peek().is_delim(&[":"]) {
                stream.next();
                let name = stream.next_ident()?;
                pseudo_element = Some(if stream.peek().is_delim(&["("]) {
                    stream.next();
                    PseudoElement::Functional(FunctionCall::new(&name, parse_arguments(stream)?))
                } else {
                    PseudoElement::Simple(name.to_ascii_lowercase())
                });
                continue;
            }

            let ident = stream.next_ident()?;
            let lower = ident.to_ascii_lowercase();
            if matches!(lower.as_str(), "first-line" | "first-letter" | "before" | "after") {
                // CSS 2.1 pseudo-elements may use a single colon.
                pseudo_element = Some(PseudoElement::Simple(lower));
                continue;
            }

            if !stream.peek().is_delim(&["("]) {
                if lower == "scope" {
                    let at_start = first_in_selector
                        && context == Context::TopLevel
                        && result == SelectorNode::universal()
                        && stream.used() == selector_start + 2;
                    if !at_start {
                        return Err(SelectorSyntaxError::MisplacedScope);
                    }
                }
                result = SelectorNode::Pseudo {
                    selector: Box::new(result),
                    ident: lower,
                };
                continue;
            }

            stream.next();
            stream.skip_whitespace();
            result = match lower.as_str() {
                "not" => {
                    if context == Context::Negation {
                        return Err(SelectorSyntaxError::NestedNegation);
                    }
                    let (argument, argument_pseudo) = parse_simple_selector(stream, Context::Negation, false)?;
                    if let Some(pseudo) = argument_pseudo {
                        return Err(SelectorSyntaxError::PseudoElementInArgument(pseudo.to_string()));
                    }
                    stream.skip_whitespace();
                    let close = stream.next();
                    if !close.is_delim(&[")"]) {
                        return Err(unexpected("')'", close));
                    }
                    SelectorNode::Negation {
                        selector: Box::new(result),
                        subselector: Box::new(argument),
                    }
                }
                "has" => {
                    let (combinator, subselector) = parse_relative_selector(stream)?;
                    SelectorNode::Relation {
                        selector: Box::new(result),
                        combinator,
                        subselector: Box::new(subselector),
                    }
                }
                "is" | "matches" => SelectorNode::Matching {
                    selector: Box::new(result),
                    selector_list: parse_simple_selector_arguments(stream)?,
                },
                "where" => SelectorNode::SpecificityAdjustment {
                    selector: Box::new(result),
                    selector_list: parse_simple_selector_arguments(stream)?,
                },
                _ => SelectorNode::Function {
                    selector: Box::new(result),
                    call: FunctionCall::new(&ident, parse_arguments(stream)?),
                },
            };
        } else {
            return Err(unexpected("selector", peek));
        }
    }

    if stream.used() == selector_start {
        return Err(unexpected("selector", stream.peek()));
    }
    Ok((result, pseudo_element))
}

fn parse_attrib(selector: SelectorNode, stream: &mut TokenStream) -> Result<SelectorNode, SelectorSyntaxError> {
    stream.skip_whitespace();
    let mut attrib = stream.next_ident_or_star()?;
    if attrib.is_none() && !stream.peek().is_delim(&["|"]) {
        return Err(unexpected("'|'", stream.peek()));
    }

    let mut namespace = None;
    let mut operator = None;
    if stream.peek().is_delim(&["|"]) {
        stream.next();
        if stream.peek().is_delim(&["="]) {
            stream.next();
            operator = Some(AttribOperator::DashMatch);
        } else {
            namespace = attrib;
            attrib = Some(stream.next_ident()?);
        }
    }
    let Some(attrib) = attrib else {
        return Err(unexpected("attribute name", stream.peek()));
    };

    let operator = match operator {
        Some(operator) => operator,
        None => {
            stream.skip_whitespace();
            let next = stream.next();
            if next.is_delim(&["]"]) {
                return Ok(SelectorNode::Attrib {
                    selector: Box::new(selector),
                    namespace,
                    attrib,
                    operator: AttribOperator::Exists,
                    value: None,
                });
            }
            match AttribOperator::from_symbol(&next.value) {
                Some(operator) if next.kind == TokenKind::Delim => operator,
                _ => return Err(unexpected("operator", next)),
            }
        }
    };

    stream.skip_whitespace();
    let value = stream.next();
    if !value.is_string_or_ident() {
        return Err(unexpected("string or identifier", value));
    }
    stream.skip_whitespace();
    let close = stream.next();
    if !close.is_delim(&["]"]) {
        return Err(unexpected("']'", close));
    }

    Ok(SelectorNode::Attrib {
        selector: Box::new(selector),
        namespace,
        attrib,
        operator,
        value: Some(value.clone()),
    })
}

/// Collects raw function arguments up to the closing parenthesis.
fn parse_arguments(stream: &mut TokenStream) -> Result<Vec<Token>, SelectorSyntaxError> {
    let mut arguments = Vec::new();
    loop {
        stream.skip_whitespace();
        let next = stream.next();
        if matches!(next.kind, TokenKind::Ident | TokenKind::String | TokenKind::Number)
            || next.is_delim(&["+", "-"])
        {
            arguments.push(next.clone());
        } else if next.is_delim(&[")"]) {
            return Ok(arguments);
        } else {
            return Err(unexpected("an argument", next));
        }
    }
}

/// Comma-separated compound selectors for `:is()` and `:where()`.
fn parse_simple_selector_arguments(stream: &mut TokenStream) -> Result<Vec<SelectorNode>, SelectorSyntaxError> {
    let mut arguments = Vec::new();
    loop {
        let (argument, pseudo) = parse_simple_selector(stream, Context::Nested, false)?;
        if let Some(pseudo) = pseudo {
            return Err(SelectorSyntaxError::PseudoElementInArgument(pseudo.to_string()));
        }
        arguments.push(argument);

        stream.skip_whitespace();
        let next = stream.next();
        if next.is_delim(&[")"]) {
            return Ok(arguments);
        }
        if !next.is_delim(&[","]) {
            return Err(unexpected("',' or ')'", next));
        }
    }
}

/// The argument of `:has()`: an optional leading combinator and a selector.
fn parse_relative_selector(stream: &mut TokenStream) -> Result<(Combinator, SelectorNode), SelectorSyntaxError> {
    stream.skip_whitespace();
    let combinator = match Combinator::from_token(stream.peek()) {
        Some(combinator) => {
            stream.next();
            combinator
        }
        None => Combinator::Descendant,
    };

    let selector = parse_selector(stream, Context::Nested)?;
    if let Some(pseudo) = selector.pseudo_element {
        return Err(SelectorSyntaxError::PseudoElementInArgument(pseudo.to_string()));
    }
    let close = stream.next();
    if !close.is_delim(&[")"]) {
        return Err(unexpected("')'", close));
    }
    Ok((combinator, selector.tree))
}
