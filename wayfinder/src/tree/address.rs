//! Parsed address form.
//!
//! An [`AddressTree`] is what the external address parser produces from a raw
//! address string and what the recognizer consumes to build a [`RouteTree`].
//! It carries raw path pieces only; no resource kinds, no typed parameters.
//!
//! [`RouteTree`]: super::RouteTree

/// One node of a parsed address: raw path pieces bound to an outlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressNode {
    path: Vec<String>,
    outlet: String,
    children: Vec<AddressNode>,
}

impl AddressNode {
    /// Create an address node.
    pub fn new(path: Vec<String>, outlet: impl Into<String>, children: Vec<AddressNode>) -> Self {
        Self {
            path,
            outlet: outlet.into(),
            children,
        }
    }

    /// Raw path pieces, in order.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The outlet name this node targets.
    pub fn outlet(&self) -> &str {
        &self.outlet
    }

    /// Child address nodes, in order.
    pub fn children(&self) -> &[AddressNode] {
        &self.children
    }
}

/// A complete parsed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTree {
    root: AddressNode,
}

impl AddressTree {
    /// Create an address tree from its root node.
    pub fn new(root: AddressNode) -> Self {
        Self { root }
    }

    /// The root node.
    pub fn root(&self) -> &AddressNode {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::PRIMARY_OUTLET;

    #[test]
    fn test_address_node_accessors() {
        let node = AddressNode::new(
            vec!["team".to_string(), "33".to_string()],
            PRIMARY_OUTLET,
            Vec::new(),
        );
        assert_eq!(node.path(), &["team", "33"]);
        assert_eq!(node.outlet(), PRIMARY_OUTLET);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_address_tree_equality() {
        let make = || {
            AddressTree::new(AddressNode::new(
                vec!["a".to_string()],
                PRIMARY_OUTLET,
                vec![AddressNode::new(vec!["b".to_string()], "aux", Vec::new())],
            ))
        };
        assert_eq!(make(), make());
    }
}
