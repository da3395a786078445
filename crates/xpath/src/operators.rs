//! Binary operator semantics, following the XPath 1.0 comparison rules.

use crate::ast::BinaryOperator;
use crate::datasource::DataSourceNode;
use crate::engine::{XPathValue, parse_number};
use crate::error::XPathError;

pub fn evaluate<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    let value = match op {
        BinaryOperator::Or => XPathValue::Boolean(left.to_bool() || right.to_bool()),
        BinaryOperator::And => XPathValue::Boolean(left.to_bool() && right.to_bool()),
        BinaryOperator::Equals
        | BinaryOperator::NotEquals
        | BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => XPathValue::Boolean(compare(op, &left, &right)),
        BinaryOperator::Plus => XPathValue::Number(left.to_number() + right.to_number()),
        BinaryOperator::Minus => XPathValue::Number(left.to_number() - right.to_number()),
        BinaryOperator::Multiply => XPathValue::Number(left.to_number() * right.to_number()),
        BinaryOperator::Divide => XPathValue::Number(left.to_number() / right.to_number()),
        BinaryOperator::Modulo => XPathValue::Number(left.to_number() % right.to_number()),
        BinaryOperator::Union => match (left, right) {
            (XPathValue::NodeSet(mut l), XPathValue::NodeSet(r)) => {
                l.extend(r);
                l.sort();
                l.dedup();
                XPathValue::NodeSet(l)
            }
            _ => {
                return Err(XPathError::TypeError(
                    "both operands of '|' must be node-sets".to_string(),
                ));
            }
        },
    };
    Ok(value)
}

/// An atomic operand: node-sets are expanded into their members' string values.
#[derive(Debug, Clone)]
enum Atom {
    Str(String),
    Num(f64),
    Bool(bool),
}

fn atoms<'a, N: DataSourceNode<'a>>(value: &XPathValue<N>) -> Vec<Atom> {
    match value {
        XPathValue::NodeSet(nodes) => nodes.iter().map(|n| Atom::Str(n.string_value())).collect(),
        XPathValue::String(s) => vec![Atom::Str(s.clone())],
        XPathValue::Number(n) => vec![Atom::Num(*n)],
        XPathValue::Boolean(b) => vec![Atom::Bool(*b)],
    }
}

fn compare<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    // A node-set compared with a boolean compares the node-set's truth value.
    match (left, right) {
        (XPathValue::NodeSet(_), XPathValue::Boolean(b)) => {
            return compare_atoms(op, &Atom::Bool(left.to_bool()), &Atom::Bool(*b));
        }
        (XPathValue::Boolean(b), XPathValue::NodeSet(_)) => {
            return compare_atoms(op, &Atom::Bool(*b), &Atom::Bool(right.to_bool()));
        }
        _ => {}
    }
    let left_atoms = atoms(left);
    let right_atoms = atoms(right);
    left_atoms
        .iter()
        .any(|l| right_atoms.iter().any(|r| compare_atoms(op, l, r)))
}

fn compare_atoms(op: BinaryOperator, left: &Atom, right: &Atom) -> bool {
    let is_equality = matches!(op, BinaryOperator::Equals | BinaryOperator::NotEquals);
    if is_equality {
        let equal = match (left, right) {
            (Atom::Bool(l), r) => *l == atom_bool(r),
            (l, Atom::Bool(r)) => atom_bool(l) == *r,
            (Atom::Num(l), r) => *l == atom_number(r),
            (l, Atom::Num(r)) => atom_number(l) == *r,
            (Atom::Str(l), Atom::Str(r)) => l == r,
        };
        return if op == BinaryOperator::Equals { equal } else { !equal };
    }

    let (l, r) = (atom_number(left), atom_number(right));
    match op {
        BinaryOperator::LessThan => l < r,
        BinaryOperator::LessThanOrEqual => l <= r,
        BinaryOperator::GreaterThan => l > r,
        BinaryOperator::GreaterThanOrEqual => l >= r,
        _ => false,
    }
}

fn atom_bool(atom: &Atom) -> bool {
    match atom {
        Atom::Str(s) => !s.is_empty(),
        Atom::Num(n) => *n != 0.0 && !n.is_nan(),
        Atom::Bool(b) => *b,
    }
}

fn atom_number(atom: &Atom) -> f64 {
    match atom {
        Atom::Str(s) => parse_number(s),
        Atom::Num(n) => *n,
        Atom::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
    }
}
