//! Compiles conditional rule strings into [`RuleExpr`] ASTs.
//!
//! Grammar (keywords case-insensitive):
//!
//! ```text
//! rule       := or_expr
//! or_expr    := and_expr ( "OR" and_expr )*
//! and_expr   := not_expr ( "AND" not_expr )*
//! not_expr   := "NOT" not_expr | primary
//! primary    := "(" or_expr ")" | comparison
//! comparison := operand ( ("=" | "!=" | ">" | ">=" | "<" | "<=") operand )?
//! operand    := 'text' | true | false | number | field_code
//! ```
//!
//! A bare operand without a comparison must evaluate to a boolean at runtime
//! (e.g. a checkbox field referenced by code).

use super::{RuleExpr, Value};
use crate::error::RuleParseError;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{char, multispace0, satisfy},
    combinator::{all_consuming, map, not, opt, recognize, value, verify},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

/// Compiles a rule expression string into its AST.
///
/// Compilation happens once per field definition; evaluation never re-parses.
pub fn parse_rule(expression: &str) -> Result<RuleExpr, RuleParseError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(RuleParseError::Empty);
    }
    match all_consuming(terminated(or_expr, multispace0))(trimmed) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(RuleParseError::Syntax {
            expression: expression.to_string(),
            message: format!("unexpected input near '{}'", snippet(e.input)),
        }),
        Err(nom::Err::Incomplete(_)) => Err(RuleParseError::Syntax {
            expression: expression.to_string(),
            message: "incomplete expression".to_string(),
        }),
    }
}

fn snippet(input: &str) -> &str {
    match input.char_indices().nth(24) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

fn or_expr(input: &str) -> IResult<&str, RuleExpr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(or_op, and_expr))(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |acc, rhs| RuleExpr::Or(Box::new(acc), Box::new(rhs)));
    Ok((input, expr))
}

fn and_expr(input: &str) -> IResult<&str, RuleExpr> {
    let (input, first) = not_expr(input)?;
    let (input, rest) = many0(preceded(and_op, not_expr))(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |acc, rhs| RuleExpr::And(Box::new(acc), Box::new(rhs)));
    Ok((input, expr))
}

fn not_expr(input: &str) -> IResult<&str, RuleExpr> {
    alt((
        map(preceded(not_op, not_expr), |e| RuleExpr::Not(Box::new(e))),
        primary,
    ))(input)
}

fn primary(input: &str) -> IResult<&str, RuleExpr> {
    preceded(
        multispace0,
        alt((
            delimited(
                pair(char('('), multispace0),
                or_expr,
                pair(multispace0, char(')')),
            ),
            comparison,
        )),
    )(input)
}

fn comparison(input: &str) -> IResult<&str, RuleExpr> {
    let (input, left) = operand(input)?;
    let (input, tail) = opt(pair(cmp_op, operand))(input)?;
    let expr = match tail {
        None => left,
        Some((op, right)) => {
            let (l, r) = (Box::new(left), Box::new(right));
            match op {
                "=" => RuleExpr::Equal(l, r),
                "!=" => RuleExpr::NotEqual(l, r),
                ">" => RuleExpr::GreaterThan(l, r),
                ">=" => RuleExpr::GreaterThanOrEqual(l, r),
                "<" => RuleExpr::SmallerThan(l, r),
                "<=" => RuleExpr::SmallerThanOrEqual(l, r),
                _ => unreachable!("cmp_op only yields the operators matched above"),
            }
        }
    };
    Ok((input, expr))
}

fn operand(input: &str) -> IResult<&str, RuleExpr> {
    preceded(
        multispace0,
        alt((
            map(quoted_text, |s| RuleExpr::Literal(Value::Text(s))),
            map(bool_literal, |b| RuleExpr::Literal(Value::Bool(b))),
            map(double, |n| RuleExpr::Literal(Value::Number(n))),
            map(identifier, |s: &str| RuleExpr::Field(s.to_string())),
        )),
    )(input)
}

fn cmp_op(input: &str) -> IResult<&str, &str> {
    // Longest operators first so ">=" never parses as ">" ... "=".
    preceded(
        multispace0,
        alt((
            tag(">="),
            tag("<="),
            tag("!="),
            tag(">"),
            tag("<"),
            tag("="),
        )),
    )(input)
}

fn or_op(input: &str) -> IResult<&str, ()> {
    preceded(multispace0, value((), keyword("OR")))(input)
}

fn and_op(input: &str) -> IResult<&str, ()> {
    preceded(multispace0, value((), keyword("AND")))(input)
}

fn not_op(input: &str) -> IResult<&str, ()> {
    preceded(multispace0, value((), keyword("NOT")))(input)
}

fn bool_literal(input: &str) -> IResult<&str, bool> {
    alt((value(true, keyword("TRUE")), value(false, keyword("FALSE"))))(input)
}

fn quoted_text(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        |s: &str| s.to_string(),
    )(input)
}

/// A keyword match that refuses to split an identifier ("ORDER" is not "OR").
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(kw), not(satisfy(is_ident_char)))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn identifier(input: &str) -> IResult<&str, &str> {
    verify(
        recognize(pair(
            satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
            take_while(is_ident_char),
        )),
        |s: &str| {
            !matches!(
                s.to_ascii_uppercase().as_str(),
                "AND" | "OR" | "NOT" | "TRUE" | "FALSE"
            )
        },
    )(input)
}
