//! A `nom`-based parser for the location-path language.

use super::ast::*;
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{map, map_res, opt, peek, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

// --- Main Public Parsers ---

pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(XPathError::XPathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(XPathError::XPathParse(input.to_string(), e.to_string())),
    }
}

/// Parses `input` and requires the result to be a single location path.
pub fn parse_path(input: &str) -> Result<LocationPath, XPathError> {
    match parse_expression(input)? {
        Expression::LocationPath(path) => Ok(path),
        _ => Err(XPathError::NotALocationPath(input.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn descendant_or_self_step() -> Step {
    Step::new(
        Axis::DescendantOrSelf,
        NodeTest::NodeType(NodeTypeTest::Node),
    )
}

// --- Operators ---

// Binary operators grouped from loosest to tightest binding. Within a group
// longer symbols come first so `<=` is never read as `<`.
const PRECEDENCE: &[&[(&str, BinaryOperator)]] = &[
    &[("or", BinaryOperator::Or)],
    &[("and", BinaryOperator::And)],
    &[("!=", BinaryOperator::NotEquals), ("=", BinaryOperator::Equals)],
    &[
        ("<=", BinaryOperator::LessThanOrEqual),
        (">=", BinaryOperator::GreaterThanOrEqual),
        ("<", BinaryOperator::LessThan),
        (">", BinaryOperator::GreaterThan),
    ],
    &[("+", BinaryOperator::Plus), ("-", BinaryOperator::Minus)],
    &[
        ("*", BinaryOperator::Multiply),
        ("div", BinaryOperator::Divide),
        ("mod", BinaryOperator::Modulo),
    ],
];

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Matches one of `ops` at the start of `input`. Word operators must not run
/// into a following name, so `order` is not `or` + `der`.
fn match_operator<'i>(
    input: &'i str,
    ops: &[(&str, BinaryOperator)],
) -> Option<(&'i str, BinaryOperator)> {
    ops.iter().find_map(|&(symbol, op)| {
        let rest = input.strip_prefix(symbol)?;
        let is_word = symbol.starts_with(|c: char| c.is_alphabetic());
        if is_word && rest.starts_with(is_name_char) {
            return None;
        }
        Some((rest, op))
    })
}

/// Left-associative binary expression at precedence `level`. Past the last
/// level the operand is a unary expression.
fn binary_expr(level: usize, input: &str) -> IResult<&str, Expression> {
    let Some(ops) = PRECEDENCE.get(level) else {
        return unary_expr(input);
    };
    let (mut rest, mut left) = binary_expr(level + 1, input)?;
    loop {
        let after_ws = rest.trim_start();
        let Some((operand, op)) = match_operator(after_ws, ops) else {
            break;
        };
        let Ok((next, right)) = binary_expr(level + 1, operand) else {
            break;
        };
        left = Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        };
        rest = next;
    }
    Ok((rest, left))
}

fn expression(input: &str) -> IResult<&str, Expression> {
    binary_expr(0, input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    let (i, negated) = opt(ws(char('-'))).parse(input)?;
    let (i, expr) = union_expr(i)?;
    let expr = match negated {
        Some(_) => Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(expr),
        },
        None => expr,
    };
    Ok((i, expr))
}

fn union_expr(input: &str) -> IResult<&str, Expression> {
    let (i, first) = path_expr(input)?;
    let (i, rest) = many0(preceded(ws(char('|')), path_expr)).parse(i)?;
    let expr = rest.into_iter().fold(first, |left, right| Expression::BinaryOp {
        left: Box::new(left),
        op: BinaryOperator::Union,
        right: Box::new(right),
    });
    Ok((i, expr))
}

/// Primary expressions are tried before location paths so that `position()` is
/// not consumed as a step named `position`.
fn path_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        primary_expr,
        map(location_path, Expression::LocationPath),
    )))
    .parse(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(number_literal, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(ws(char('(')), expression, ws(char(')'))),
    ))
    .parse(input)
}

// --- Literal Parsers ---

// Only plain decimal digits are numbers here; a general float parser would read
// element names such as `info` or `nancy` as `inf` / `nan`.
fn number_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        str::parse::<f64>,
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

// --- Name and NodeTest Parsers ---

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_name_char),
    ))
    .parse(input)
}

fn node_type_test(input: &str) -> IResult<&str, NodeTest> {
    map(
        terminated(
            alt((
                tag("text"),
                tag("node"),
                tag("comment"),
                tag("processing-instruction"),
            )),
            pair(ws(char('(')), char(')')),
        ),
        |node_type: &str| match node_type {
            "text" => NodeTest::NodeType(NodeTypeTest::Text),
            "comment" => NodeTest::NodeType(NodeTypeTest::Comment),
            "processing-instruction" => NodeTest::NodeType(NodeTypeTest::ProcessingInstruction),
            _ => NodeTest::NodeType(NodeTypeTest::Node), // "node"
        },
    )
    .parse(input)
}

pub fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        map(tag("*"), |_| NodeTest::Wildcard),
        node_type_test,
        map(nc_name, |name| NodeTest::Name(NameTest::new(name))),
    ))
    .parse(input)
}

// --- Path Parsers ---

fn axis(input: &str) -> IResult<&str, Axis> {
    map(
        terminated(
            alt((
                tag("child"),
                tag("descendant-or-self"),
                tag("descendant"),
                tag("attribute"),
                tag("parent"),
                tag("ancestor"),
                tag("self"),
                tag("following-sibling"),
                tag("preceding-sibling"),
            )),
            tag("::"),
        ),
        |axis_str| match axis_str {
            "descendant-or-self" => Axis::DescendantOrSelf,
            "descendant" => Axis::Descendant,
            "attribute" => Axis::Attribute,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            "self" => Axis::SelfAxis,
            "following-sibling" => Axis::FollowingSibling,
            "preceding-sibling" => Axis::PrecedingSibling,
            _ => Axis::Child, // child
        },
    )
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Expression> {
    delimited(ws(char('[')), expression, ws(char(']'))).parse(input)
}

fn step(input: &str) -> IResult<&str, Step> {
    let (i, (axis, node_test)) = alt((
        map(tag(".."), |_| {
            (Axis::Parent, NodeTest::NodeType(NodeTypeTest::Node))
        }),
        map(tag("."), |_| {
            (Axis::SelfAxis, NodeTest::NodeType(NodeTypeTest::Node))
        }),
        map(preceded(char('@'), node_test), |nt| (Axis::Attribute, nt)),
        map(pair(opt(axis), node_test), |(ax, nt)| {
            (ax.unwrap_or(Axis::Child), nt)
        }),
    ))
    .parse(input)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    Ok((
        i,
        Step {
            axis,
            node_test,
            predicates,
        },
    ))
}

fn location_path(input: &str) -> IResult<&str, LocationPath> {
    let (i, (is_absolute, mut steps)) = if let Ok((rem, _)) =
        tag::<&str, &str, nom::error::Error<&str>>("//")(input)
    {
        let (rem, step) = step(rem)?;
        (rem, (true, vec![descendant_or_self_step(), step]))
    } else if let Ok((rem, _)) = tag::<&str, &str, nom::error::Error<&str>>("/")(input) {
        if let Ok((rem, first_step)) = step(rem) {
            (rem, (true, vec![first_step]))
        } else {
            // A path that is just "/"
            (rem, (true, vec![]))
        }
    } else {
        let (rem, first_step) = step(input)?;
        (rem, (false, vec![first_step]))
    };

    // After the first step, subsequent steps must be preceded by / or //.
    let (i, remainder) = many0(pair(alt((tag("//"), tag("/"))), step)).parse(i)?;

    for (sep, next_step) in remainder {
        if sep == "//" {
            steps.push(descendant_or_self_step());
        }
        steps.push(next_step);
    }

    Ok((i, LocationPath { is_absolute, steps }))
}

// --- Function Call Parser ---

fn function_call(input: &str) -> IResult<&str, Expression> {
    // A function call must be a name followed by '('. The lookahead keeps a
    // plain step name (like 'foo' in 'foo/bar') from being read as a call.
    let (i, name) = nc_name(input)?;
    let (i, _) = peek(ws(char('('))).parse(i)?;

    // Node-type tests like text() are handled by the step parser.
    if matches!(name, "text" | "node" | "comment" | "processing-instruction") {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let i = i.trim_start();
    let (i, args) = delimited(
        char('('),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )
    .parse(i)?;

    Ok((
        i,
        Expression::FunctionCall {
            name: name.to_string(),
            args,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_step(axis: Axis, name: &str) -> Step {
        Step::new(axis, NodeTest::Name(NameTest::new(name)))
    }

    fn relative(steps: Vec<Step>) -> Expression {
        Expression::LocationPath(LocationPath {
            is_absolute: false,
            steps,
        })
    }

    #[test]
    fn test_parse_simple_path() {
        let result = parse_expression("chapter/title").unwrap();
        assert_eq!(
            result,
            relative(vec![
                name_step(Axis::Child, "chapter"),
                name_step(Axis::Child, "title"),
            ])
        );
    }

    #[test]
    fn test_names_that_look_like_numbers() {
        let result = parse_path("info/nancy").unwrap();
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.leading_name(), Some("info"));
    }

    #[test]
    fn test_parse_unary_minus() {
        let result = parse_expression("-5").unwrap();
        assert_eq!(
            result,
            Expression::UnaryOp {
                op: UnaryOperator::Minus,
                expr: Box::new(Expression::Number(5.0))
            }
        );
    }

    #[test]
    fn test_parse_axes() {
        let result = parse_path("following-sibling::foo").unwrap();
        assert_eq!(result.steps[0].axis, Axis::FollowingSibling);

        let result = parse_path("ancestor::*").unwrap();
        assert_eq!(result.steps[0].axis, Axis::Ancestor);
        assert_eq!(result.steps[0].node_test, NodeTest::Wildcard);
    }

    #[test]
    fn test_parse_predicate() {
        let result = parse_expression("foo[@id = 'a']").unwrap();
        assert_eq!(
            result,
            relative(vec![Step {
                axis: Axis::Child,
                node_test: NodeTest::Name("foo".into()),
                predicates: vec![Expression::BinaryOp {
                    left: Box::new(relative(vec![name_step(Axis::Attribute, "id")])),
                    op: BinaryOperator::Equals,
                    right: Box::new(Expression::Literal("a".into())),
                }]
            }])
        );
    }

    #[test]
    fn test_parse_numeric_predicate() {
        let result = parse_path("chapter[2]").unwrap();
        assert_eq!(result.steps[0].predicates, vec![Expression::Number(2.0)]);
    }

    #[test]
    fn test_parse_function_in_predicate() {
        let result = parse_path("para[position() = last()]").unwrap();
        assert_eq!(result.steps.len(), 1);
        assert!(result.steps[0].predicates[0].is_binary_op());
    }

    #[test]
    fn test_parse_text_and_parent_steps() {
        let result = parse_path("foo/text()").unwrap();
        assert_eq!(
            result.steps[1].node_test,
            NodeTest::NodeType(NodeTypeTest::Text)
        );

        let result = parse_path("../foo").unwrap();
        assert_eq!(result.steps[0].axis, Axis::Parent);
    }

    #[test]
    fn test_parse_operator_precedence() {
        let result = parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            result,
            Expression::BinaryOp {
                left: Box::new(Expression::Number(1.0)),
                op: BinaryOperator::Plus,
                right: Box::new(Expression::BinaryOp {
                    left: Box::new(Expression::Number(2.0)),
                    op: BinaryOperator::Multiply,
                    right: Box::new(Expression::Number(3.0)),
                }),
            }
        );
    }

    #[test]
    fn test_word_operators_need_a_boundary() {
        let result = parse_expression("a and android").unwrap();
        assert!(matches!(
            result,
            Expression::BinaryOp { op: BinaryOperator::And, .. }
        ));
        assert!(parse_expression("ab ordering").is_err());

        let result = parse_expression("a <= 2 or b != 'x'").unwrap();
        assert!(matches!(
            result,
            Expression::BinaryOp { op: BinaryOperator::Or, .. }
        ));
    }

    #[test]
    fn test_parse_union() {
        let result = parse_expression("a | b | c").unwrap();
        let Expression::BinaryOp { left, op, .. } = result else {
            panic!("expected a union");
        };
        assert_eq!(op, BinaryOperator::Union);
        assert!(matches!(
            *left,
            Expression::BinaryOp { op: BinaryOperator::Union, .. }
        ));
    }

    #[test]
    fn test_parse_descendant_or_self() {
        let result = parse_path("//foo").unwrap();
        assert_eq!(
            result,
            LocationPath {
                is_absolute: true,
                steps: vec![descendant_or_self_step(), name_step(Axis::Child, "foo")]
            }
        );

        let result = parse_path("a//b").unwrap();
        assert_eq!(result.steps.len(), 3);
        assert_eq!(result.steps[1], descendant_or_self_step());
    }

    #[test]
    fn test_rejects_non_paths_and_garbage() {
        assert!(matches!(
            parse_path("'literal'"),
            Err(XPathError::NotALocationPath(_))
        ));
        assert!(matches!(
            parse_path("chapter["),
            Err(XPathError::XPathParse(..))
        ));
        assert!(parse_path("").is_err());
    }
}
