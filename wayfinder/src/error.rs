//! Error types for navigation.
//!
//! A guard veto is not an error: `navigate` resolves `Ok(false)` for it.
//! Everything here either rejects a navigation before any mutation happened
//! (parse, recognition, structural and instantiation failures) or reports a
//! broken registry invariant. Nothing resolves successfully with partial
//! state.

use thiserror::Error;

use crate::recognize::{ParseError, RecognitionError};
use crate::resource::FactoryError;

/// Result alias for navigation operations.
pub type NavigationResult<T> = Result<T, NavigationError>;

/// Failure modes of a navigation.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The raw address string could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The parsed address matched no configured route.
    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    /// A candidate node targets an outlet its parent does not declare.
    ///
    /// This signals a mismatch between the declared outlets and the route
    /// tree; it is fatal for the navigation and detected before any mount
    /// or unmount happens.
    #[error("no outlet named '{outlet}' is declared at this level")]
    UnknownOutlet {
        /// The undeclared outlet name.
        outlet: String,
    },

    /// Two siblings in the candidate tree target the same outlet.
    #[error("duplicate outlet '{outlet}' within one sibling group")]
    DuplicateOutlet {
        /// The duplicated outlet name.
        outlet: String,
    },

    /// A replacement resource failed to instantiate during the commit pass.
    #[error(transparent)]
    Instantiation(#[from] FactoryError),

    /// A structured edit was requested before any navigation was accepted.
    #[error("no accepted route tree to edit")]
    NoAcceptedTree,

    /// A structured edit named a segment no node of the accepted tree matches.
    #[error("no node in the accepted tree matches the given segment")]
    SegmentNotFound,

    /// The outlet registry disagrees with the accepted tree.
    #[error("outlet registry out of sync with accepted tree at outlet '{outlet}'")]
    RegistryMismatch {
        /// The outlet where the mismatch was detected.
        outlet: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_outlet_display() {
        let err = NavigationError::UnknownOutlet {
            outlet: "aux".to_string(),
        };
        assert_eq!(err.to_string(), "no outlet named 'aux' is declared at this level");
    }

    #[test]
    fn test_collaborator_errors_convert() {
        let err: NavigationError = ParseError::new("/x", "bad").into();
        assert!(matches!(err, NavigationError::Parse(_)));

        let err: NavigationError = RecognitionError::new("/x").into();
        assert!(matches!(err, NavigationError::Recognition(_)));

        let err: NavigationError = FactoryError::new("kind", "boom").into();
        assert!(matches!(err, NavigationError::Instantiation(_)));
    }
}
