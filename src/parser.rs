//! Textual query syntax using nom.
//!
//! Used by schema files (join `on` criteria) and the CLI.
//!
//! # Syntax Overview
//!
//! ```text
//! criterion    a = 1 AND (b IS NULL OR c NOT IN ('x', 'y')) AND d = @joinAuthor.#id
//! order-by     createdOn DESC, joinAuthor.username
//! update       subject = 'hi', body = NULL, star += 1, views -= @star
//! projections  total: count(id), best: max(star), joinAuthor.username
//! ```
//!
//! Keywords are case-insensitive. Strings use single quotes with `''` as
//! the escaped quote. `@path` is a column reference instead of a literal.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{map, map_res, not as not_followed_by, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use crate::ast::{
    Arg, Condition, ConditionOp, Criterion, DEFAULT_NAME, Junction, JunctionOp, OrderBy,
    ProjectionOp, Projections, Reference, Update, Value, builders,
};
use crate::error::{SqlentError, SqlentResult};

/// Parse a criterion. Blank input is the empty criterion.
///
/// # Example
///
/// ```
/// use sqlent::ast::builders::*;
/// use sqlent::parser::parse_criterion;
///
/// let c = parse_criterion("age >= 18 AND name LIKE 'a%'").unwrap();
/// assert_eq!(c, and(vec![ge("age", 18), like("name", "a%")]));
/// ```
pub fn parse_criterion(input: &str) -> SqlentResult<Criterion> {
    if input.trim().is_empty() {
        return Ok(builders::none());
    }
    finish(input, "criterion", or_expr(input))
}

/// Parse a comma separated list of `path [ASC|DESC]`.
pub fn parse_order_by(input: &str) -> SqlentResult<OrderBy> {
    if input.trim().is_empty() {
        return Ok(OrderBy::new());
    }
    let items = finish(
        input,
        "order-by",
        separated_list1(ws(char(',')), order_item)(input),
    )?;
    Ok(items
        .into_iter()
        .fold(OrderBy::new(), |order_by, (path, descending)| {
            if descending {
                order_by.desc(path)
            } else {
                order_by.asc(path)
            }
        }))
}

/// Parse a comma separated list of assignments.
pub fn parse_update(input: &str) -> SqlentResult<Update> {
    let items = finish(
        input,
        "update",
        separated_list1(ws(char(',')), assignment)(input),
    )?;
    Ok(items
        .into_iter()
        .fold(Update::new(), |update, item| match item {
            Assign::Set(path, arg) => update.set(path, arg),
            Assign::Nullify(path) => update.nullify(path),
            Assign::Add(path, arg) => update.add(path, arg),
            Assign::Subtract(path, arg) => update.subtract(path, arg),
        }))
}

/// Parse a comma separated list of `[name:] func(path)` or `[name:] path`.
///
/// A lone unnamed entry is a scalar. In a longer list an unnamed path is
/// named after itself, an unnamed function is an error, and so is any name
/// used twice.
pub fn parse_projections(input: &str) -> SqlentResult<Projections> {
    let items = finish(
        input,
        "projections",
        separated_list1(ws(char(',')), positioned(projection))(input),
    )?;
    let single = items.len() == 1;
    let mut projections = Projections::new();
    for (rest_len, (name, op, path)) in items {
        let position = input.len() - rest_len;
        let name = match name {
            Some(name) => name,
            None if single => DEFAULT_NAME,
            None if op == ProjectionOp::Property => path,
            None => {
                return Err(SqlentError::parse(
                    position,
                    format!("projection on '{}' needs a name in a list", path),
                ));
            }
        };
        if projections.names().iter().any(|n| n == name) {
            return Err(SqlentError::parse(
                position,
                format!("duplicate projection name '{}'", name),
            ));
        }
        projections = projections.push(name, op, path);
    }
    Ok(projections)
}

/// Turn a nom result into a parse error carrying the byte position.
fn finish<T>(input: &str, what: &str, result: IResult<&str, T>) -> SqlentResult<T> {
    match result {
        Ok((rest, parsed)) => {
            let rest = rest.trim_start();
            if rest.is_empty() {
                Ok(parsed)
            } else {
                Err(SqlentError::parse(
                    input.len() - rest.len(),
                    format!("unexpected '{}' in {}", near(rest), what),
                ))
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(SqlentError::parse(
            input.len() - e.input.len(),
            format!(
                "invalid {} ({}) near '{}'",
                what,
                e.code.description(),
                near(e.input)
            ),
        )),
        Err(nom::Err::Incomplete(_)) => Err(SqlentError::parse(
            input.len(),
            format!("incomplete {}", what),
        )),
    }
}

fn near(rest: &str) -> &str {
    match rest.char_indices().nth(16) {
        Some((end, _)) => &rest[..end],
        None => rest,
    }
}

// ---------------------------------------------------------------------------
// Lexical pieces
// ---------------------------------------------------------------------------

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(multispace0, inner)
}

/// Case-insensitive keyword not followed by an identifier character.
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    ws(terminated(
        tag_no_case(kw),
        not_followed_by(satisfy(is_ident_char)),
    ))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_ident_char)(input)
}

/// `name`, `#alias`, `join.name` or `join.#alias`.
fn path(input: &str) -> IResult<&str, &str> {
    let segment = || recognize(pair(opt(char('#')), identifier));
    recognize(pair(segment(), opt(pair(char('.'), segment()))))(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('\'')(input)?;
    let mut out = String::new();
    loop {
        let Some(end) = rest.find('\'') else {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)));
        };
        out.push_str(&rest[..end]);
        rest = &rest[end + 1..];
        match rest.strip_prefix('\'') {
            Some(after) => {
                out.push('\'');
                rest = after;
            }
            None => return Ok((rest, out)),
        }
    }
}

fn number(input: &str) -> IResult<&str, Value> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
        ))),
        |s: &str| {
            if s.contains('.') {
                s.parse::<f64>().map(Value::Float).map_err(|e| e.to_string())
            } else {
                s.parse::<i64>().map(Value::Int).map_err(|e| e.to_string())
            }
        },
    )(input)
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((
        map(string_literal, Value::String),
        number,
        value(Value::Bool(true), keyword("true")),
        value(Value::Bool(false), keyword("false")),
        value(Value::Null, keyword("null")),
    ))(input)
}

/// A literal, or `@path` for a column reference.
fn operand(input: &str) -> IResult<&str, Arg> {
    ws(alt((
        map(preceded(char('@'), path), |p| Arg::Ref(Reference::of(p))),
        map(literal, Arg::Value),
    )))(input)
}

// ---------------------------------------------------------------------------
// Criterion
// ---------------------------------------------------------------------------

fn or_expr(input: &str) -> IResult<&str, Criterion> {
    map(separated_list1(keyword("or"), and_expr), |items| {
        junction(JunctionOp::Or, items)
    })(input)
}

fn and_expr(input: &str) -> IResult<&str, Criterion> {
    map(separated_list1(keyword("and"), unary), |items| {
        junction(JunctionOp::And, items)
    })(input)
}

fn junction(op: JunctionOp, mut children: Vec<Criterion>) -> Criterion {
    if children.len() == 1 {
        children.remove(0)
    } else {
        Criterion::Junction(Junction { op, children })
    }
}

fn unary(input: &str) -> IResult<&str, Criterion> {
    alt((map(preceded(keyword("not"), unary), builders::not), primary))(input)
}

fn primary(input: &str) -> IResult<&str, Criterion> {
    alt((
        delimited(ws(char('(')), or_expr, ws(char(')'))),
        value(builders::true_value(), keyword("true")),
        value(builders::false_value(), keyword("false")),
        condition,
    ))(input)
}

fn condition(input: &str) -> IResult<&str, Criterion> {
    let (input, p) = ws(path)(input)?;
    alt((
        map(
            tuple((keyword("is"), keyword("not"), keyword("null"))),
            |_| builders::is_not_null(p),
        ),
        map(pair(keyword("is"), keyword("null")), |_| builders::is_null(p)),
        map(preceded(keyword("not"), |i| pattern(p, i)), builders::not),
        |i| pattern(p, i),
        map(pair(comparison, operand), |(op, arg)| {
            Criterion::Condition(Condition {
                op,
                property: p.to_string(),
                args: vec![arg],
            })
        }),
    ))(input)
}

/// LIKE, BETWEEN and IN, the forms that take a NOT prefix.
fn pattern<'a>(p: &str, input: &'a str) -> IResult<&'a str, Criterion> {
    alt((
        map(
            tuple((
                keyword("like"),
                operand,
                opt(preceded(keyword("escape"), operand)),
            )),
            |(_, pattern, escape)| match escape {
                Some(escape) => builders::like_escape(p, pattern, escape),
                None => builders::like(p, pattern),
            },
        ),
        map(
            tuple((keyword("between"), operand, keyword("and"), operand)),
            |(_, low, _, high)| builders::between(p, low, high),
        ),
        map(
            preceded(
                keyword("in"),
                delimited(
                    ws(char('(')),
                    separated_list0(ws(char(',')), operand),
                    ws(char(')')),
                ),
            ),
            |args| builders::is_in(p, args),
        ),
    ))(input)
}

fn comparison(input: &str) -> IResult<&str, ConditionOp> {
    ws(alt((
        value(ConditionOp::Ge, tag(">=")),
        value(ConditionOp::Le, tag("<=")),
        value(ConditionOp::Ne, tag("!=")),
        value(ConditionOp::Ne, tag("<>")),
        value(ConditionOp::Eq, char('=')),
        value(ConditionOp::Gt, char('>')),
        value(ConditionOp::Lt, char('<')),
    )))(input)
}

// ---------------------------------------------------------------------------
// Order-by, update, projections
// ---------------------------------------------------------------------------

fn order_item(input: &str) -> IResult<&str, (&str, bool)> {
    pair(
        ws(path),
        map(
            opt(alt((
                value(false, keyword("asc")),
                value(true, keyword("desc")),
            ))),
            |descending| descending.unwrap_or(false),
        ),
    )(input)
}

enum Assign<'a> {
    Set(&'a str, Arg),
    Nullify(&'a str),
    Add(&'a str, Arg),
    Subtract(&'a str, Arg),
}

fn assignment(input: &str) -> IResult<&str, Assign<'_>> {
    let (input, p) = ws(path)(input)?;
    alt((
        map(preceded(ws(tag("+=")), operand), move |arg| Assign::Add(p, arg)),
        map(preceded(ws(tag("-=")), operand), move |arg| {
            Assign::Subtract(p, arg)
        }),
        map(preceded(ws(char('=')), keyword("null")), move |_| {
            Assign::Nullify(p)
        }),
        map(preceded(ws(char('=')), operand), move |arg| Assign::Set(p, arg)),
    ))(input)
}

fn function(input: &str) -> IResult<&str, ProjectionOp> {
    alt((
        value(ProjectionOp::CountDistinct, keyword("count_distinct")),
        value(ProjectionOp::Distinct, keyword("distinct")),
        value(ProjectionOp::Count, keyword("count")),
        value(ProjectionOp::Max, keyword("max")),
        value(ProjectionOp::Min, keyword("min")),
        value(ProjectionOp::Sum, keyword("sum")),
        value(ProjectionOp::Avg, keyword("avg")),
    ))(input)
}

/// Run `parser` after leading whitespace, keeping the remaining length at
/// its start.
fn positioned<'a, O>(
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, (usize, O)> {
    move |input: &'a str| {
        let (input, _) = multispace0(input)?;
        let rest_len = input.len();
        let (input, out) = parser(input)?;
        Ok((input, (rest_len, out)))
    }
}

fn projection(input: &str) -> IResult<&str, (Option<&str>, ProjectionOp, &str)> {
    let (input, name) = opt(terminated(ws(identifier), ws(char(':'))))(input)?;
    let (input, (op, p)) = alt((
        map(
            tuple((function, ws(char('(')), ws(path), ws(char(')')))),
            |(op, _, p, _)| (op, p),
        ),
        map(ws(path), |p| (ProjectionOp::Property, p)),
    ))(input)?;
    Ok((input, (name, op, p)))
}
