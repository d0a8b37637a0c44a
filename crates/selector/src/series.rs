//! Parser for the `an+b` micro-syntax used by the `nth-*` pseudo-classes.

use crate::error::SeriesError;
use crate::token::{Token, TokenKind, join_tokens};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_opt, map_res, opt, recognize, value},
};

/// The coefficients of `an+b`: the 1-based positions `a*k + b` for `k >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Series {
    pub a: i32,
    pub b: i32,
}

impl Series {
    pub const fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    pub const fn odd() -> Self {
        Self::new(2, 1)
    }

    pub const fn even() -> Self {
        Self::new(2, 0)
    }

    /// A single position, `0n+b`.
    pub const fn index(b: i32) -> Self {
        Self::new(0, b)
    }

    /// Whether the 1-based `position` is a member of the series.
    pub fn matches(&self, position: i32) -> bool {
        if position < 1 {
            return false;
        }
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        let diff = i64::from(position) - b;
        if a == 0 {
            return diff == 0;
        }
        diff % a == 0 && diff / a >= 0
    }
}

/// Parses the argument tokens of an `nth-*` call.
pub fn parse_series(tokens: &[Token]) -> Result<Series, SeriesError> {
    if tokens.iter().any(|t| t.kind == TokenKind::String) {
        return Err(SeriesError::StringToken);
    }

    // Gaps between tokens stay in the text; only the offset sign may be
    // surrounded by whitespace.
    let text = join_tokens(tokens, |t| t.value.clone());
    let text = text.trim().to_ascii_lowercase();

    all_consuming(series)
        .parse(text.as_str())
        .map(|(_, series)| series)
        .map_err(|_| SeriesError::Invalid(text.clone()))
}

fn series(input: &str) -> IResult<&str, Series> {
    alt((
        value(Series::odd(), tag("odd")),
        value(Series::even(), tag("even")),
        an_plus_b,
        map(integer, Series::index),
    ))
    .parse(input)
}

fn an_plus_b(input: &str) -> IResult<&str, Series> {
    let (input, a) = coefficient(input)?;
    let (input, _) = char('n').parse(input)?;
    let (input, b) = opt(offset).parse(input)?;
    Ok((input, Series::new(a, b.unwrap_or(0))))
}

/// The `a` in `an`: `+`, `-` or nothing stand for 1 and -1.
fn coefficient(input: &str) -> IResult<&str, i32> {
    alt((
        integer,
        value(-1, char('-')),
        value(1, char('+')),
        value(1, tag("")),
    ))
    .parse(input)
}

/// The signed `+b` after the `n` term. The sign is mandatory.
fn offset(input: &str) -> IResult<&str, i32> {
    let (input, _) = multispace0(input)?;
    let (input, sign) = one_of("+-").parse(input)?;
    let (input, _) = multispace0(input)?;
    map_opt(digit1, move |digits: &str| {
        let magnitude = digits.parse::<i64>().ok()?;
        i32::try_from(if sign == '-' { -magnitude } else { magnitude }).ok()
    })
    .parse(input)
}

fn integer(input: &str) -> IResult<&str, i32> {
    map_res(recognize((opt(one_of("+-")), digit1)), str::parse::<i32>).parse(input)
}
