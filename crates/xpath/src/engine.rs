//! The evaluation engine for executing a parsed path AST against a generic `DataSourceNode`.

use super::ast::{Axis, Expression, LocationPath, NodeTest, NodeTypeTest, Step, UnaryOperator};
use super::{axes, functions, operators};
use crate::datasource::{DataSourceNode, NodeType};
use crate::error::XPathError;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// Represents the possible result types of an expression evaluation.
#[derive(Debug, Clone)]
pub enum XPathValue<N> {
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<'a, N: DataSourceNode<'a>> XPathValue<N> {
    /// Coerces the value to a boolean as per XPath 1.0 rules.
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    /// Coerces the value to a number as per XPath 1.0 rules.
    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::String(s) => parse_number(s),
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map(|n| parse_number(&n.string_value()))
                .unwrap_or(f64::NAN),
        }
    }
}

pub(crate) fn parse_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

impl<'a, N: DataSourceNode<'a>> fmt::Display for XPathValue<N> {
    /// Coerces the value to a string as per XPath 1.0 rules.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => write!(
                f,
                "{}",
                nodes.first().map(|n| n.string_value()).unwrap_or_default()
            ),
            XPathValue::String(s) => write!(f, "{}", s),
            XPathValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                write!(f, "{}", *n as i64)
            }
            XPathValue::Number(n) => write!(f, "{}", n),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// All state needed during expression evaluation.
/// `'a` is the lifetime of the underlying data source.
pub struct EvaluationContext<'a, N: DataSourceNode<'a>> {
    pub context_node: N,
    pub root_node: N,
    pub context_position: usize, // 1-based index
    pub context_size: usize,
    _marker: PhantomData<&'a ()>,
}

impl<'a, N: DataSourceNode<'a>> EvaluationContext<'a, N> {
    pub fn new(
        context_node: N,
        root_node: N,
        context_position: usize,
        context_size: usize,
    ) -> Self {
        Self {
            context_node,
            root_node,
            context_position,
            context_size,
            _marker: PhantomData,
        }
    }

    /// A context focused on a single node, with the root found by walking up.
    pub fn for_node(node: N) -> Self {
        Self::new(node, root_of(node), 1, 1)
    }
}

fn root_of<'a, N: DataSourceNode<'a>>(node: N) -> N {
    let mut current = node;
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}

/// Evaluates `path` from every node in `context_nodes` and returns the union of
/// the results in document order, without duplicates.
pub fn select<'a, N>(path: &LocationPath, context_nodes: &[N]) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut selected = Vec::new();
    let mut seen = HashSet::new();
    for &node in context_nodes {
        let e_ctx = EvaluationContext::for_node(node);
        for found in evaluate_location_path(path, &e_ctx)? {
            if seen.insert(found) {
                selected.push(found);
            }
        }
    }
    selected.sort();
    log::trace!(
        "Path selected {} node(s) from {} context node(s)",
        selected.len(),
        context_nodes.len()
    );
    Ok(selected)
}

/// Evaluates a compiled expression and returns a concrete `XPathValue`.
pub fn evaluate<'a, N>(
    expr: &Expression,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    Ok(match expr {
        Expression::Literal(text) => XPathValue::String(text.clone()),
        Expression::Number(value) => XPathValue::Number(*value),
        Expression::LocationPath(path) => XPathValue::NodeSet(evaluate_location_path(path, e_ctx)?),
        Expression::FunctionCall { name, args } => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, e_ctx))
                .collect::<Result<Vec<_>, _>>()?;
            functions::evaluate_function(name, values, e_ctx)?
        }
        Expression::BinaryOp { left, op, right } => {
            operators::evaluate(*op, evaluate(left, e_ctx)?, evaluate(right, e_ctx)?)?
        }
        Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => XPathValue::Number(-evaluate(expr, e_ctx)?.to_number()),
    })
}

fn evaluate_location_path<'a, N>(
    path: &LocationPath,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let start = if path.is_absolute {
        e_ctx.root_node
    } else {
        e_ctx.context_node
    };
    path.steps
        .iter()
        .try_fold(vec![start], |nodes, step| evaluate_step(step, &nodes, e_ctx))
}

/// Evaluates a single step: for each context node, collect along the axis,
/// apply the node test, then the predicates (positions are relative to that
/// context node). The merged result is returned in document order.
fn evaluate_step<'a, N>(
    step: &Step,
    context_nodes: &[N],
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut merged = Vec::new();
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for &origin in context_nodes {
        candidates.clear();
        axes::collect(step.axis, origin, &mut candidates);
        let tested = filter_by_node_test(&candidates, &step.node_test, step.axis);
        let survivors = apply_predicates(tested, &step.predicates, e_ctx)?;
        merged.extend(survivors.into_iter().filter(|n| seen.insert(*n)));
    }

    merged.sort();
    Ok(merged)
}

/// Filters a set of nodes based on a `NodeTest`.
fn filter_by_node_test<'a, N>(nodes: &[N], test: &NodeTest, axis: Axis) -> Vec<N>
where
    N: DataSourceNode<'a> + 'a,
{
    let principal = if axis == Axis::Attribute {
        NodeType::Attribute
    } else {
        NodeType::Element
    };
    nodes
        .iter()
        .filter(|&node| match test {
            NodeTest::Wildcard => node.node_type() == principal,
            NodeTest::Name(name_test) => {
                node.node_type() == principal
                    && node.name().is_some_and(|q_name| {
                        q_name.local_part == name_test.local
                            && q_name.namespace == name_test.namespace.as_deref()
                    })
            }
            NodeTest::NodeType(ntt) => match ntt {
                NodeTypeTest::Text => node.node_type() == NodeType::Text,
                NodeTypeTest::Comment => node.node_type() == NodeType::Comment,
                NodeTypeTest::ProcessingInstruction => {
                    node.node_type() == NodeType::ProcessingInstruction
                }
                NodeTypeTest::Node => true,
            },
        })
        .copied()
        .collect()
}

/// Narrows `nodes` by each predicate in turn. A numeric result keeps the node
/// at that position; anything else is taken as a boolean.
fn apply_predicates<'a, N>(
    mut nodes: Vec<N>,
    predicates: &[Expression],
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    for predicate in predicates {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (index, &node) in nodes.iter().enumerate() {
            let position = index + 1;
            let focus = EvaluationContext::new(node, e_ctx.root_node, position, size);
            let matched = match evaluate(predicate, &focus)? {
                XPathValue::Number(n) => n == position as f64,
                other => other.to_bool(),
            };
            if matched {
                kept.push(node);
            }
        }
        nodes = kept;
    }
    Ok(nodes)
}
