//! Navigation tree model.
//!
//! Two tree shapes live here: [`RouteTree`], the recognized, fully typed
//! navigation state the reconciler diffs, and [`AddressTree`], the raw parsed
//! form of an external address. Both are immutable once constructed; the
//! engine swaps whole trees, it never edits one in place.

mod address;
mod node;

pub use address::{AddressNode, AddressTree};
pub use node::{RouteNode, RouteTree};
