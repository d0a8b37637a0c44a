//! A small XPath 1.0 expression parser used to check generated expressions,
//! plus an evaluator for predicates that only depend on `position()` and
//! `last()`.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, satisfy},
    combinator::{all_consuming, map, not, opt, peek, recognize, value, verify},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Union,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: String,
    pub test: String,
    pub predicates: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Literal(String),
    Call { name: String, args: Vec<Expr> },
    Binary { left: Box<Expr>, op: Op, right: Box<Expr> },
    Negate(Box<Expr>),
    Path {
        start: Option<Box<Expr>>,
        absolute: bool,
        steps: Vec<Step>,
    },
}

const AXES: &[&str] = &[
    "ancestor",
    "ancestor-or-self",
    "attribute",
    "child",
    "descendant",
    "descendant-or-self",
    "following",
    "following-sibling",
    "namespace",
    "parent",
    "preceding",
    "preceding-sibling",
    "self",
];

const NODE_TYPES: &[&str] = &["comment", "text", "processing-instruction", "node"];

/// Parses a complete XPath 1.0 expression.
pub fn parse_xpath(input: &str) -> Result<Expr, String> {
    all_consuming(ws(expression))
        .parse(input)
        .map(|(_, expr)| expr)
        .map_err(|e| format!("'{input}' is not valid XPath 1.0: {e}"))
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(word), not(peek(satisfy(is_name_char))))
}

fn binary_chain<'a>(
    input: &'a str,
    operand: fn(&'a str) -> IResult<&'a str, Expr>,
    operator: fn(&'a str) -> IResult<&'a str, Op>,
) -> IResult<&'a str, Expr> {
    let (input, mut left) = operand(input)?;
    let (input, rest) = many0(pair(ws(operator), operand)).parse(input)?;
    for (op, right) in rest {
        left = Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        };
    }
    Ok((input, left))
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expr> {
    binary_chain(input, and_expr, or_op)
}

fn or_op(input: &str) -> IResult<&str, Op> {
    value(Op::Or, keyword("or")).parse(input)
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    binary_chain(input, equality_expr, and_op)
}

fn and_op(input: &str) -> IResult<&str, Op> {
    value(Op::And, keyword("and")).parse(input)
}

fn equality_expr(input: &str) -> IResult<&str, Expr> {
    binary_chain(input, relational_expr, equality_op)
}

fn equality_op(input: &str) -> IResult<&str, Op> {
    alt((value(Op::Ne, tag("!=")), value(Op::Eq, tag("=")))).parse(input)
}

fn relational_expr(input: &str) -> IResult<&str, Expr> {
    binary_chain(input, additive_expr, relational_op)
}

fn relational_op(input: &str) -> IResult<&str, Op> {
    alt((
        value(Op::Le, tag("<=")),
        value(Op::Ge, tag(">=")),
        value(Op::Lt, tag("<")),
        value(Op::Gt, tag(">")),
    ))
    .parse(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expr> {
    binary_chain(input, multiplicative_expr, additive_op)
}

fn additive_op(input: &str) -> IResult<&str, Op> {
    alt((value(Op::Add, char('+')), value(Op::Sub, char('-')))).parse(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expr> {
    binary_chain(input, unary_expr, multiplicative_op)
}

fn multiplicative_op(input: &str) -> IResult<&str, Op> {
    alt((
        value(Op::Mul, char('*')),
        value(Op::Div, keyword("div")),
        value(Op::Mod, keyword("mod")),
    ))
    .parse(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expr> {
    let (input, negations) = many0(ws(char('-'))).parse(input)?;
    let (input, mut expr) = union_expr(input)?;
    for _ in negations {
        expr = Expr::Negate(Box::new(expr));
    }
    Ok((input, expr))
}

fn union_expr(input: &str) -> IResult<&str, Expr> {
    binary_chain(input, path_expr, union_op)
}

fn union_op(input: &str) -> IResult<&str, Op> {
    value(Op::Union, char('|')).parse(input)
}

/// A filter expression optionally followed by steps, or a location path.
fn path_expr(input: &str) -> IResult<&str, Expr> {
    ws(alt((filter_path, location_path))).parse(input)
}

fn filter_path(input: &str) -> IResult<&str, Expr> {
    let (input, primary) = primary_expr(input)?;
    let (input, predicates) = many0(predicate).parse(input)?;
    let (input, steps) = many0(pair(separator, step)).parse(input)?;

    if predicates.is_empty() && steps.is_empty() {
        return Ok((input, primary));
    }
    let mut all_steps = Vec::new();
    if !predicates.is_empty() {
        all_steps.push(Step {
            axis: "self".to_string(),
            test: "node()".to_string(),
            predicates,
        });
    }
    all_steps.extend(expand_separators(steps));
    Ok((
        input,
        Expr::Path {
            start: Some(Box::new(primary)),
            absolute: false,
            steps: all_steps,
        },
    ))
}

fn primary_expr(input: &str) -> IResult<&str, Expr> {
    alt((
        delimited(char('('), ws(expression), char(')')),
        map(string_literal, Expr::Literal),
        map(number, Expr::Number),
        function_call,
    ))
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        str::to_string,
    )
    .parse(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    let (input, text) = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ))
    .parse(input)?;
    // Digits with an optional fraction always parse.
    Ok((input, text.parse().unwrap_or(f64::NAN)))
}

fn function_call(input: &str) -> IResult<&str, Expr> {
    let (input, name) = verify(q_name, |name: &str| !NODE_TYPES.contains(&name)).parse(input)?;
    let (input, args) = preceded(
        ws(char('(')),
        terminated(separated_list0(char(','), ws(expression)), char(')')),
    )
    .parse(input)?;
    Ok((
        input,
        Expr::Call {
            name: name.to_string(),
            args,
        },
    ))
}

// --- Location Paths ---

fn separator(input: &str) -> IResult<&str, &str> {
    alt((tag("//"), tag("/"))).parse(input)
}

fn expand_separators(steps: Vec<(&str, Step)>) -> Vec<Step> {
    let mut expanded = Vec::new();
    for (separator, step) in steps {
        if separator == "//" {
            expanded.push(Step {
                axis: "descendant-or-self".to_string(),
                test: "node()".to_string(),
                predicates: Vec::new(),
            });
        }
        expanded.push(step);
    }
    expanded
}

fn location_path(input: &str) -> IResult<&str, Expr> {
    let (input, leading) = opt(separator).parse(input)?;
    let (input, first) = match leading {
        Some(_) => opt(step).parse(input)?,
        None => map(step, Some).parse(input)?,
    };
    let (input, rest) = match first {
        Some(_) => many0(pair(separator, step)).parse(input)?,
        None => (input, Vec::new()),
    };

    let mut steps = Vec::new();
    if let (Some(first), Some(separator)) = (&first, leading) {
        steps.extend(expand_separators(vec![(separator, first.clone())]));
    } else if let Some(first) = first {
        steps.push(first);
    }
    steps.extend(expand_separators(rest));

    Ok((
        input,
        Expr::Path {
            start: None,
            absolute: leading.is_some(),
            steps,
        },
    ))
}

fn step(input: &str) -> IResult<&str, Step> {
    let (input, (axis, test)) = alt((
        map(tag(".."), |_| ("parent".to_string(), "node()".to_string())),
        map(char('.'), |_| ("self".to_string(), "node()".to_string())),
        map(preceded(char('@'), node_test), |test| {
            ("attribute".to_string(), test)
        }),
        map(pair(opt(axis), node_test), |(axis, test)| {
            (axis.unwrap_or("child").to_string(), test)
        }),
    ))
    .parse(input)?;
    let (input, predicates) = many0(predicate).parse(input)?;
    Ok((
        input,
        Step {
            axis,
            test,
            predicates,
        },
    ))
}

fn axis(input: &str) -> IResult<&str, &str> {
    terminated(
        verify(take_while1(|c: char| c.is_ascii_lowercase() || c == '-'), |name: &str| {
            AXES.contains(&name)
        }),
        tag("::"),
    )
    .parse(input)
}

fn node_test(input: &str) -> IResult<&str, String> {
    alt((
        map(tag("*"), str::to_string),
        map(recognize((nc_name, char(':'), char('*'))), str::to_string),
        map(
            recognize((
                verify(nc_name, |name: &str| NODE_TYPES.contains(&name)),
                ws(char('(')),
                char(')'),
            )),
            str::to_string,
        ),
        map(q_name, str::to_string),
    ))
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Expr> {
    delimited(ws(char('[')), ws(expression), char(']')).parse(input)
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c == '_' || c == '-' || c == '.' || c.is_alphanumeric()
}

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(is_name_start), take_while(is_name_char))).parse(input)
}

fn q_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(nc_name, opt(pair(char(':'), nc_name)))).parse(input)
}

// --- Positional evaluation ---

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    String(String),
}

impl Value {
    fn number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }

    fn boolean(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
        }
    }
}

/// Evaluates `expr` for a node at `position` of `last` nodes. Panics on
/// anything that needs a document.
pub fn evaluate_positional(expr: &Expr, position: usize, last: usize) -> Value {
    let eval = |e: &Expr| evaluate_positional(e, position, last);
    match expr {
        Expr::Number(n) => Value::Number(*n),
        Expr::Literal(s) => Value::String(s.clone()),
        Expr::Negate(inner) => Value::Number(-eval(inner).number()),
        Expr::Call { name, args } => match (name.as_str(), args.as_slice()) {
            ("position", []) => Value::Number(position as f64),
            ("last", []) => Value::Number(last as f64),
            ("true", []) => Value::Boolean(true),
            ("false", []) => Value::Boolean(false),
            ("not", [arg]) => Value::Boolean(!eval(arg).boolean()),
            ("number", [arg]) => Value::Number(eval(arg).number()),
            _ => panic!("function {name}() is not supported in positional evaluation"),
        },
        Expr::Binary { left, op, right } => {
            let (l, r) = (eval(left), eval(right));
            match op {
                Op::Or => Value::Boolean(l.boolean() || r.boolean()),
                Op::And => Value::Boolean(l.boolean() && r.boolean()),
                Op::Eq | Op::Ne => {
                    let equal = match (&l, &r) {
                        (Value::Boolean(_), _) | (_, Value::Boolean(_)) => l.boolean() == r.boolean(),
                        (Value::Number(_), _) | (_, Value::Number(_)) => l.number() == r.number(),
                        _ => l == r,
                    };
                    Value::Boolean(if *op == Op::Eq { equal } else { !equal })
                }
                Op::Lt => Value::Boolean(l.number() < r.number()),
                Op::Le => Value::Boolean(l.number() <= r.number()),
                Op::Gt => Value::Boolean(l.number() > r.number()),
                Op::Ge => Value::Boolean(l.number() >= r.number()),
                Op::Add => Value::Number(l.number() + r.number()),
                Op::Sub => Value::Number(l.number() - r.number()),
                Op::Mul => Value::Number(l.number() * r.number()),
                Op::Div => Value::Number(l.number() / r.number()),
                // XPath `mod` truncates like Rust's `%`.
                Op::Mod => Value::Number(l.number() % r.number()),
                Op::Union => panic!("union is not supported in positional evaluation"),
            }
        }
        Expr::Path { .. } => panic!("location paths are not supported in positional evaluation"),
    }
}

/// Whether a predicate selects the node at `position` of `last`. A missing
/// predicate selects every node. A numeric predicate compares with
/// `position()`, as in XPath.
pub fn predicate_holds(predicate: Option<&str>, position: usize, last: usize) -> bool {
    let Some(predicate) = predicate else {
        return true;
    };
    let expr = parse_xpath(predicate).unwrap_or_else(|e| panic!("{e}"));
    match evaluate_positional(&expr, position, last) {
        Value::Number(n) => n == position as f64,
        other => other.boolean(),
    }
}
