//! Defines the Abstract Syntax Tree (AST) for the location-path language.

use std::fmt;

/// The top-level expression that can be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(String),
    Number(f64),
    LocationPath(LocationPath),
    FunctionCall {
        name: String,
        args: Vec<Expression>,
    },
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expression>,
    },
}

impl Expression {
    /// Checks if the expression is a `LocationPath` variant.
    pub fn is_location_path(&self) -> bool {
        matches!(self, Expression::LocationPath(_))
    }

    /// Checks if the expression is a `BinaryOp` variant.
    pub fn is_binary_op(&self) -> bool {
        matches!(self, Expression::BinaryOp { .. })
    }

    fn bind_namespaces<F>(&mut self, resolve: &mut F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        match self {
            Expression::LocationPath(path) => path.bind_namespaces(resolve),
            Expression::FunctionCall { args, .. } => {
                for arg in args {
                    arg.bind_namespaces(resolve);
                }
            }
            Expression::BinaryOp { left, right, .. } => {
                left.bind_namespaces(resolve);
                right.bind_namespaces(resolve);
            }
            Expression::UnaryOp { expr, .. } => expr.bind_namespaces(resolve),
            Expression::Literal(_) | Expression::Number(_) => {}
        }
    }
}

/// A unary operator used in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
}

/// A binary operator used in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,
    // Equality
    Equals,
    NotEquals,
    // Relational
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    // Additive
    Plus,
    Minus,
    // Multiplicative
    Multiply,
    Divide,
    Modulo,
    // Set
    Union,
}

/// Represents a full location path, like `chapter/title`, `descendant::para[1]` or `/book`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    /// True if the path starts from the document root (e.g., `/foo`).
    pub is_absolute: bool,
    pub steps: Vec<Step>,
}

impl LocationPath {
    /// Binds every element name test (including those nested in predicates) to a
    /// namespace URI. `resolve` receives the local name and returns the namespace,
    /// or `None` for "no namespace". Attribute name tests are left unbound since
    /// unprefixed attributes never inherit a namespace.
    pub fn bind_namespaces<F>(&mut self, resolve: &mut F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        for step in &mut self.steps {
            if step.axis != Axis::Attribute
                && let NodeTest::Name(name) = &mut step.node_test
            {
                name.namespace = resolve(&name.local);
            }
            for predicate in &mut step.predicates {
                predicate.bind_namespaces(resolve);
            }
        }
    }

    /// The local name of the first name test, if the path has one.
    pub fn leading_name(&self) -> Option<&str> {
        self.steps.iter().find_map(|step| match &step.node_test {
            NodeTest::Name(name) => Some(name.local.as_str()),
            _ => None,
        })
    }

    /// True when every step addresses named elements along the child axis, so the
    /// path can only ever designate concrete elements (no wildcards, `//`, or
    /// node-type tests).
    pub fn is_named_element_path(&self) -> bool {
        !self.is_absolute
            && !self.steps.is_empty()
            && self
                .steps
                .iter()
                .all(|step| step.axis == Axis::Child && matches!(step.node_test, NodeTest::Name(_)))
    }
}

/// Represents a single step in a location path, like `child::foo[position() > 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expression>,
}

impl Step {
    pub fn new(axis: Axis, node_test: NodeTest) -> Self {
        Self {
            axis,
            node_test,
            predicates: vec![],
        }
    }
}

/// The axis of movement from the context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Attribute,
    Parent,
    Ancestor,
    SelfAxis,
    FollowingSibling,
    PrecedingSibling,
}

impl Axis {
    /// Reverse axes number their nodes in reverse document order for predicates.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::Parent | Axis::PrecedingSibling
        )
    }
}

/// An expanded name test: a local name plus the namespace it must live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTest {
    pub namespace: Option<String>,
    pub local: String,
}

impl NameTest {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    pub fn in_namespace(local: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }
}

impl fmt::Display for NameTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(&self.local),
        }
    }
}

impl From<&str> for NameTest {
    fn from(local: &str) -> Self {
        NameTest::new(local)
    }
}

/// A test to apply to nodes on a given axis to see if they should be included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// An expanded name test (e.g., `title`).
    Name(NameTest),
    /// A wildcard test (`*`).
    Wildcard,
    /// A node type test (e.g., `text()`, `node()`).
    NodeType(NodeTypeTest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTypeTest {
    Text,
    Node,
    Comment,
    ProcessingInstruction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_path;

    #[test]
    fn binds_element_steps_but_not_attributes() {
        let mut path = parse_path("chapter[@id = 'x']/title[note]").unwrap();
        path.bind_namespaces(&mut |local| Some(format!("urn:{}", local)));

        let NodeTest::Name(chapter) = &path.steps[0].node_test else {
            panic!("expected name test");
        };
        assert_eq!(chapter.namespace.as_deref(), Some("urn:chapter"));

        let Expression::BinaryOp { left, .. } = &path.steps[0].predicates[0] else {
            panic!("expected comparison");
        };
        let Expression::LocationPath(attr_path) = left.as_ref() else {
            panic!("expected attribute path");
        };
        let NodeTest::Name(id) = &attr_path.steps[0].node_test else {
            panic!("expected name test");
        };
        assert_eq!(id.namespace, None);

        let Expression::LocationPath(note) = &path.steps[1].predicates[0] else {
            panic!("expected nested path");
        };
        let NodeTest::Name(note) = &note.steps[0].node_test else {
            panic!("expected name test");
        };
        assert_eq!(note.namespace.as_deref(), Some("urn:note"));
    }

    #[test]
    fn named_element_paths() {
        assert!(parse_path("title").unwrap().is_named_element_path());
        assert!(parse_path("chapter[2]/title").unwrap().is_named_element_path());
        assert!(!parse_path("*").unwrap().is_named_element_path());
        assert!(!parse_path("chapter//title").unwrap().is_named_element_path());
        assert!(!parse_path("title/text()").unwrap().is_named_element_path());
        assert!(!parse_path("@id").unwrap().is_named_element_path());
    }

    #[test]
    fn display_uses_clark_notation() {
        assert_eq!(NameTest::in_namespace("a", "urn:x").to_string(), "{urn:x}a");
        assert_eq!(NameTest::new("a").to_string(), "a");
    }
}
