//! Route tree nodes.

use crate::segment::Segment;

use super::address::{AddressNode, AddressTree};

/// One node of a route tree: a [`Segment`] plus its ordered children.
///
/// Child order mirrors declaration order and drives mount/unmount ordering,
/// but it is not part of tree equivalence. Within one sibling group at most
/// one child may bind to a given outlet name; the engine rejects trees that
/// violate this before reconciling them.
#[derive(Debug, Clone)]
pub struct RouteNode {
    segment: Segment,
    children: Vec<RouteNode>,
}

impl RouteNode {
    /// Create a leaf node.
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            children: Vec::new(),
        }
    }

    /// Create a node with children, in declaration order.
    pub fn with_children(segment: Segment, children: Vec<RouteNode>) -> Self {
        Self { segment, children }
    }

    /// The identity of this node.
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[RouteNode] {
        &self.children
    }

    /// The child bound to the given outlet, if any.
    pub fn child_for_outlet(&self, outlet: &str) -> Option<&RouteNode> {
        self.children
            .iter()
            .find(|child| child.segment.outlet() == outlet)
    }
}

/// A complete navigation state: one root [`RouteNode`].
///
/// Exactly one tree is "accepted" at a time; the engine holds it behind an
/// `Arc` and replaces it atomically on a successful commit.
#[derive(Debug, Clone)]
pub struct RouteTree {
    root: RouteNode,
}

impl RouteTree {
    /// Create a tree from its root node.
    pub fn new(root: RouteNode) -> Self {
        Self { root }
    }

    /// The root node.
    pub fn root(&self) -> &RouteNode {
        &self.root
    }

    /// Whether two trees describe the same navigation state.
    ///
    /// Nodes are matched per outlet name; sibling order is ignored. This is
    /// the relation under which reconciliation mounts and unmounts nothing.
    pub fn equivalent(&self, other: &RouteTree) -> bool {
        nodes_equivalent(&self.root, &other.root)
    }

    /// Find the first node (pre-order) whose segment equals `segment`.
    pub fn find(&self, segment: &Segment) -> Option<&RouteNode> {
        find_node(&self.root, segment)
    }

    /// Produce a new tree with the subtree rooted at `at` replaced by
    /// `edit(subtree)`. Returns `None` if no node matches `at`.
    pub fn with_subtree_replaced<F>(&self, at: &Segment, edit: F) -> Option<RouteTree>
    where
        F: FnOnce(&RouteNode) -> RouteNode,
    {
        let mut path = Vec::new();
        if !find_path(&self.root, at, &mut path) {
            return None;
        }
        Some(RouteTree::new(rebuild(&self.root, &path, edit)))
    }

    /// Project this tree down to its raw address form.
    pub fn to_address_tree(&self) -> AddressTree {
        AddressTree::new(project(&self.root))
    }

    /// First outlet name that appears twice within one sibling group, if any.
    pub(crate) fn first_duplicate_outlet(&self) -> Option<&str> {
        find_duplicate_outlet(&self.root)
    }
}

fn nodes_equivalent(a: &RouteNode, b: &RouteNode) -> bool {
    a.segment() == b.segment()
        && a.children().len() == b.children().len()
        && a.children().iter().all(|ca| {
            b.child_for_outlet(ca.segment().outlet())
                .is_some_and(|cb| nodes_equivalent(ca, cb))
        })
}

fn find_node<'a>(node: &'a RouteNode, segment: &Segment) -> Option<&'a RouteNode> {
    if node.segment() == segment {
        return Some(node);
    }
    node.children()
        .iter()
        .find_map(|child| find_node(child, segment))
}

fn find_path(node: &RouteNode, at: &Segment, path: &mut Vec<usize>) -> bool {
    if node.segment() == at {
        return true;
    }
    for (index, child) in node.children().iter().enumerate() {
        path.push(index);
        if find_path(child, at, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn rebuild<F>(node: &RouteNode, path: &[usize], edit: F) -> RouteNode
where
    F: FnOnce(&RouteNode) -> RouteNode,
{
    match path.split_first() {
        None => edit(node),
        Some((&index, rest)) => {
            let mut children = node.children().to_vec();
            children[index] = rebuild(&children[index], rest, edit);
            RouteNode::with_children(node.segment().clone(), children)
        }
    }
}

fn project(node: &RouteNode) -> AddressNode {
    AddressNode::new(
        node.segment().path_pieces().map(str::to_string).collect(),
        node.segment().outlet(),
        node.children().iter().map(project).collect(),
    )
}

fn find_duplicate_outlet(node: &RouteNode) -> Option<&str> {
    for (index, child) in node.children().iter().enumerate() {
        let outlet = child.segment().outlet();
        if node.children()[..index]
            .iter()
            .any(|earlier| earlier.segment().outlet() == outlet)
        {
            return Some(outlet);
        }
    }
    node.children().iter().find_map(find_duplicate_outlet)
}
