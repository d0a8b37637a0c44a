//! Tokens produced by the selector tokenizer.

use std::fmt;

/// The lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Hash,
    String,
    Number,
    Delim,
    Whitespace,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Ident => "IDENT",
            TokenKind::Hash => "HASH",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Delim => "DELIM",
            TokenKind::Whitespace => "S",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A single selector token. `value` holds the unescaped text (without quotes
/// for strings, without `#` for hashes) and `pos` the byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            pos,
        }
    }

    /// Returns true for a delimiter token whose text is one of `delims`.
    pub fn is_delim(&self, delims: &[&str]) -> bool {
        self.kind == TokenKind::Delim && delims.contains(&self.value.as_str())
    }

    /// Returns true for string and bare identifier literals.
    pub fn is_string_or_ident(&self) -> bool {
        matches!(self.kind, TokenKind::String | TokenKind::Ident)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// The byte offset just past the token's source text, assuming no escapes.
    fn source_end(&self) -> usize {
        let delimiters = match self.kind {
            TokenKind::String => 2,
            TokenKind::Hash => 1,
            _ => 0,
        };
        self.pos + self.value.len() + delimiters
    }

    /// Renders the token back into CSS source form.
    pub fn to_css(&self) -> String {
        match self.kind {
            TokenKind::String => {
                let escaped = self.value.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{escaped}\"")
            }
            TokenKind::Hash => format!("#{}", self.value),
            TokenKind::Eof => String::new(),
            _ => self.value.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "<EOF at {}>", self.pos),
            kind => write!(f, "<{} '{}' at {}>", kind, self.value, self.pos),
        }
    }
}

/// Concatenates `render(token)` over `tokens`, with one space wherever the
/// source had whitespace or a comment between two tokens.
pub fn join_tokens(tokens: &[Token], render: impl Fn(&Token) -> String) -> String {
    let mut text = String::new();
    let mut end = None;
    for token in tokens {
        if end.is_some_and(|end| token.pos > end) {
            text.push(' ');
        }
        text.push_str(&render(token));
        end = Some(token.source_end());
    }
    text
}

/// Formats an argument list the way it appears in error messages,
/// e.g. `[<NUMBER '2' at 11>, <IDENT 'n' at 12>]`.
pub fn format_tokens(tokens: &[Token]) -> String {
    let parts: Vec<String> = tokens.iter().map(Token::to_string).collect();
    format!("[{}]", parts.join(", "))
}
