//! Route segment identity.
//!
//! A [`Segment`] is the immutable identity of one node in a navigation tree:
//! the address tokens it consumed, the outlet it binds to, and the kind of
//! resource it would instantiate. Segment equality (not pointer identity) is
//! what decides whether a mounted subtree can be reused during reconciliation.

use std::fmt;

/// Name of the default outlet a segment binds to when none is specified.
pub const PRIMARY_OUTLET: &str = "primary";

/// One address token consumed by a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A fixed path piece (e.g. `team` in `/team/33`).
    Static(String),
    /// A named parameter bound to a concrete value (e.g. `id = 33`).
    Param { name: String, value: String },
}

impl Token {
    /// The path piece this token contributes to an address.
    pub fn piece(&self) -> &str {
        match self {
            Token::Static(piece) => piece,
            Token::Param { value, .. } => value,
        }
    }
}

/// Immutable identity of one route tree node.
///
/// Two segments are equal iff their outlet name, resource kind and address
/// tokens are pairwise equal. Child order and mounted state are deliberately
/// not part of this identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    tokens: Vec<Token>,
    outlet: String,
    kind: String,
}

impl Segment {
    /// Create a segment for the given resource kind, bound to the primary outlet.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            tokens: Vec::new(),
            outlet: PRIMARY_OUTLET.to_string(),
            kind: kind.into(),
        }
    }

    /// Create a segment bound to a named outlet.
    pub fn for_outlet(kind: impl Into<String>, outlet: impl Into<String>) -> Self {
        Self {
            tokens: Vec::new(),
            outlet: outlet.into(),
            kind: kind.into(),
        }
    }

    /// Append a static path piece.
    pub fn with_static(mut self, piece: impl Into<String>) -> Self {
        self.tokens.push(Token::Static(piece.into()));
        self
    }

    /// Append a named parameter token.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.push(Token::Param {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// The address tokens this segment consumed, in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The outlet name this segment binds to.
    pub fn outlet(&self) -> &str {
        &self.outlet
    }

    /// The kind of resource this segment instantiates when activated.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Look up a parameter value by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.tokens.iter().find_map(|token| match token {
            Token::Param { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// The raw path pieces this segment contributes to an address.
    pub fn path_pieces(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(Token::piece)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self.path_pieces().collect();
        write!(f, "{}", path.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str) -> Segment {
        Segment::new("team-detail").with_static("team").with_param("id", id)
    }

    #[test]
    fn test_segment_equality_by_tokens() {
        assert_eq!(team("33"), team("33"));
        assert_ne!(team("33"), team("44"));
    }

    #[test]
    fn test_segment_equality_by_kind() {
        let a = Segment::new("team-detail").with_static("team");
        let b = Segment::new("team-summary").with_static("team");
        assert_ne!(a, b);
    }

    #[test]
    fn test_segment_equality_by_outlet() {
        let a = Segment::new("chat").with_static("chat");
        let b = Segment::for_outlet("chat", "aux").with_static("chat");
        assert_ne!(a, b);
    }

    #[test]
    fn test_param_lookup() {
        let segment = team("33");
        assert_eq!(segment.param("id"), Some("33"));
        assert_eq!(segment.param("missing"), None);
    }

    #[test]
    fn test_path_pieces_use_param_values() {
        let segment = team("33");
        let pieces: Vec<&str> = segment.path_pieces().collect();
        assert_eq!(pieces, vec!["team", "33"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(team("33").to_string(), "team/33");
    }

    #[test]
    fn test_default_outlet_is_primary() {
        assert_eq!(Segment::new("x").outlet(), PRIMARY_OUTLET);
    }
}
