//! A `nom`-based tokenizer for CSS selectors.

use crate::error::SelectorSyntaxError;
use crate::token::{Token, TokenKind};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until, take_while_m_n, take_while1},
    character::complete::{anychar, char, digit0, digit1, one_of, satisfy},
    combinator::{map, opt, recognize, rest},
    multi::{many0, many1},
    sequence::{preceded, terminated},
};

const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

// --- Main Public Tokenizer ---

/// Splits `css` into tokens. The result always ends with an `Eof` token.
pub fn tokenize(css: &str) -> Result<Vec<Token>, SelectorSyntaxError> {
    let mut tokens = Vec::new();
    let mut remaining = css;

    while !remaining.is_empty() {
        let pos = css.len() - remaining.len();

        if let Ok((after, _)) = comment(remaining) {
            remaining = after;
            continue;
        }

        if remaining.starts_with(['"', '\'']) {
            let (after, value) = string_token(remaining, pos)?;
            tokens.push(Token::new(TokenKind::String, value, pos));
            remaining = after;
            continue;
        }

        match token(remaining) {
            Ok((after, (kind, value))) => {
                tokens.push(Token::new(kind, value, pos));
                remaining = after;
            }
            // `anychar` accepts any non-empty input, so this only guards the loop.
            Err(_) => break,
        }
    }

    tokens.push(Token::new(TokenKind::Eof, "", css.len()));
    Ok(tokens)
}

fn token(input: &str) -> IResult<&str, (TokenKind, String)> {
    alt((
        map(whitespace, |s: &str| (TokenKind::Whitespace, s.to_string())),
        map(ident, |v| (TokenKind::Ident, v)),
        map(hash, |v| (TokenKind::Hash, v)),
        map(two_char_delim, |s: &str| (TokenKind::Delim, s.to_string())),
        map(number, |s: &str| (TokenKind::Number, s.to_string())),
        map(anychar, |c| (TokenKind::Delim, c.to_string())),
    ))
    .parse(input)
}

// --- Token Parsers ---

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while1(is_css_whitespace).parse(input)
}

fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c')
}

fn comment(input: &str) -> IResult<&str, &str> {
    // An unterminated comment swallows the rest of the input.
    preceded(tag("/*"), alt((terminated(take_until("*/"), tag("*/")), rest))).parse(input)
}

fn two_char_delim(input: &str) -> IResult<&str, &str> {
    alt((
        tag("~="),
        tag("|="),
        tag("^="),
        tag("$="),
        tag("*="),
        tag("!="),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(one_of("+-")),
        alt((recognize((digit0, char('.'), digit1)), digit1)),
    ))
    .parse(input)
}

fn ident(input: &str) -> IResult<&str, String> {
    let (input, dash) = opt(char('-')).parse(input)?;
    let (input, first) = name_start(input)?;
    let (input, tail) = many0(name_char).parse(input)?;

    let mut value = String::with_capacity(tail.len() + 2);
    if dash.is_some() {
        value.push('-');
    }
    value.push(first);
    value.extend(tail);
    Ok((input, value))
}

fn hash(input: &str) -> IResult<&str, String> {
    map(preceded(char('#'), many1(name_char)), |chars| {
        chars.into_iter().collect()
    })
    .parse(input)
}

fn name_start(input: &str) -> IResult<&str, char> {
    alt((
        satisfy(|c| c == '_' || c.is_ascii_alphabetic() || !c.is_ascii()),
        escape,
    ))
    .parse(input)
}

fn name_char(input: &str) -> IResult<&str, char> {
    alt((
        satisfy(|c| c == '_' || c == '-' || c.is_ascii_alphanumeric() || !c.is_ascii()),
        escape,
    ))
    .parse(input)
}

// --- Escapes ---

/// `\` followed by 1-6 hex digits (and one optional whitespace), or by any
/// character other than a newline.
fn escape(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            hex_escape,
            satisfy(|c| !matches!(c, '\n' | '\r' | '\x0c')),
        )),
    )
    .parse(input)
}

fn hex_escape(input: &str) -> IResult<&str, char> {
    let (input, digits) = take_while_m_n(1, 6, |c: char| c.is_ascii_hexdigit()).parse(input)?;
    let (input, _) = opt(alt((tag("\r\n"), recognize(one_of(" \t\r\n\x0c"))))).parse(input)?;

    let decoded = u32::from_str_radix(digits, 16)
        .ok()
        .filter(|code| *code != 0)
        .and_then(char::from_u32)
        .unwrap_or(REPLACEMENT_CHARACTER);
    Ok((input, decoded))
}

fn escaped_newline(input: &str) -> IResult<&str, &str> {
    preceded(
        char('\\'),
        alt((tag("\r\n"), tag("\n"), tag("\r"), tag("\x0c"))),
    )
    .parse(input)
}

// --- Strings ---

fn string_chunk(input: &str, quote: char) -> IResult<&str, &str> {
    take_while1(|c: char| c != quote && c != '\\' && c != '\n').parse(input)
}

/// Reads a quoted string starting at `input`. Newlines may only appear
/// escaped, where they act as a line continuation.
fn string_token(input: &str, pos: usize) -> Result<(&str, String), SelectorSyntaxError> {
    let Some(quote) = input.chars().next() else {
        return Err(SelectorSyntaxError::UnclosedString { pos });
    };
    let mut remaining = &input[quote.len_utf8()..];
    let mut value = String::new();

    loop {
        if let Ok((after, chunk)) = string_chunk(remaining, quote) {
            value.push_str(chunk);
            remaining = after;
        }

        match remaining.chars().next() {
            None => return Err(SelectorSyntaxError::UnclosedString { pos }),
            Some(c) if c == quote => return Ok((&remaining[c.len_utf8()..], value)),
            Some('\n') => return Err(SelectorSyntaxError::InvalidString { pos }),
            Some(_) => {
                if let Ok((after, _)) = escaped_newline(remaining) {
                    remaining = after;
                } else if let Ok((after, c)) = escape(remaining) {
                    value.push(c);
                    remaining = after;
                } else {
                    // A lone backslash at the very end of the input.
                    return Err(SelectorSyntaxError::UnclosedString { pos });
                }
            }
        }
    }
}
