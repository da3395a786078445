//! Contains pure functions for collecting nodes along each axis.
//!
//! Every collector appends in axis order: document order for forward axes,
//! reverse document order for `ancestor`, `parent` and `preceding-sibling`.

use crate::ast::Axis;
use crate::datasource::DataSourceNode;

/// Collects the nodes reachable from `node` along `axis`.
pub fn collect<'a, N: DataSourceNode<'a>>(axis: Axis, node: N, results: &mut Vec<N>) {
    match axis {
        Axis::Child => collect_child_nodes(node, results),
        Axis::Attribute => collect_attribute_nodes(node, results),
        Axis::Descendant => collect_descendant_nodes(node, results),
        Axis::DescendantOrSelf => collect_descendant_or_self_nodes(node, results),
        Axis::Parent => collect_parent_nodes(node, results),
        Axis::Ancestor => collect_ancestor_nodes(node, results),
        Axis::SelfAxis => results.push(node),
        Axis::FollowingSibling => collect_following_sibling_nodes(node, results),
        Axis::PrecedingSibling => collect_preceding_sibling_nodes(node, results),
    }
}

pub fn collect_child_nodes<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    results.extend(node.children());
}

pub fn collect_attribute_nodes<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    results.extend(node.attributes());
}

/// Pre-order walk, so descendants come out in document order.
pub fn collect_descendant_nodes<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut stack: Vec<N> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        results.push(current);
        let first = stack.len();
        stack.extend(current.children());
        stack[first..].reverse();
    }
}

pub fn collect_descendant_or_self_nodes<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    results.push(node);
    collect_descendant_nodes(node, results);
}

pub fn collect_parent_nodes<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    results.extend(node.parent());
}

pub fn collect_ancestor_nodes<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(p) = current {
        results.push(p);
        current = p.parent();
    }
}

pub fn collect_following_sibling_nodes<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    if let Some(parent) = node.parent() {
        results.extend(parent.children().skip_while(|sibling| *sibling != node).skip(1));
    }
}

pub fn collect_preceding_sibling_nodes<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    if let Some(parent) = node.parent() {
        let start = results.len();
        results.extend(parent.children().take_while(|sibling| *sibling != node));
        results[start..].reverse();
    }
}
