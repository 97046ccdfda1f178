//! External collaborator contracts: address parsing and route recognition.
//!
//! Address grammar and route-config matching are outside this engine. The
//! traits here abstract both so the reconciliation core can be driven and
//! tested without a concrete URL syntax or route configuration.

use thiserror::Error;

use crate::resource::BoxFuture;
use crate::tree::{AddressTree, RouteTree};

/// Parses raw address strings into [`AddressTree`]s and back.
///
/// Pure and synchronous.
pub trait AddressParser: Send + Sync {
    /// Parse an external address.
    fn parse(&self, address: &str) -> Result<AddressTree, ParseError>;

    /// Serialize an address tree back into its external string form.
    fn serialize(&self, address: &AddressTree) -> String;
}

/// Turns a parsed address into a fully recognized route tree.
///
/// May fail when the address matches no configured route; the engine
/// propagates that failure to the caller without touching any state.
pub trait Recognizer: Send + Sync {
    /// Recognize `address` against the configuration rooted at `root_kind`.
    fn recognize<'a>(
        &'a self,
        root_kind: &'a str,
        address: &'a AddressTree,
    ) -> BoxFuture<'a, Result<RouteTree, RecognitionError>>;
}

/// A raw address string could not be parsed.
#[derive(Debug, Error)]
#[error("malformed address '{address}': {reason}")]
pub struct ParseError {
    /// The offending address.
    pub address: String,
    /// Parser-provided failure description.
    pub reason: String,
}

impl ParseError {
    /// Create a parse error for the given address.
    pub fn new(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            reason: reason.into(),
        }
    }
}

/// A parsed address matched no configured route.
#[derive(Debug, Error)]
#[error("address matches no configured route: {address}")]
pub struct RecognitionError {
    /// Serialized form of the unmatched address.
    pub address: String,
}

impl RecognitionError {
    /// Create a recognition error for the given address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}
