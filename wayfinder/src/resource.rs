//! Mounted resources and their optional lifecycle capabilities.
//!
//! Instead of probing objects for hooks at runtime, a [`Resource`] exposes its
//! optional capabilities through explicit accessors: a resource that wants a
//! say in its own teardown returns a [`DeactivationGuard`], one that wants to
//! observe its activation returns an [`ActivationHook`]. Resources without a
//! capability simply return `None` and consent implicitly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::segment::{Segment, PRIMARY_OUTLET};
use crate::tree::RouteTree;

/// Boxed future used across the engine's trait seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A live unit mounted into an outlet.
///
/// The engine treats resources as opaque: it instantiates them through a
/// [`ResourceFactory`], keeps them registered while their segment stays in
/// the accepted tree, and drops them on teardown. Dropping the last handle
/// is the teardown signal.
pub trait Resource: Send + Sync {
    /// Outlet names this resource declares for its children.
    ///
    /// Mirrors the outlets a component's template declares. A candidate
    /// child that targets an undeclared outlet is a structural error for
    /// the whole navigation.
    fn child_slots(&self) -> Vec<String> {
        vec![PRIMARY_OUTLET.to_string()]
    }

    /// The deactivation guard, if this resource implements one.
    fn deactivation_guard(&self) -> Option<&dyn DeactivationGuard> {
        None
    }

    /// The activation hook, if this resource implements one.
    fn activation_hook(&self) -> Option<&dyn ActivationHook> {
        None
    }
}

/// Optional "may I deactivate" capability.
pub trait DeactivationGuard: Send + Sync {
    /// Whether this resource consents to its own deactivation.
    ///
    /// Called with the accepted tree the navigation is leaving and the
    /// candidate tree it is heading to. Resolving `false` vetoes the whole
    /// navigation; no mutation will have happened yet.
    fn can_deactivate<'a>(&'a self, from: &'a RouteTree, to: &'a RouteTree) -> BoxFuture<'a, bool>;
}

/// Optional activation observer capability.
pub trait ActivationHook: Send + Sync {
    /// Called once, right after the resource is mounted.
    ///
    /// `previous` is the segment the same outlet position held before this
    /// navigation, if any. `from` is absent on the very first navigation.
    fn on_activate(
        &self,
        next: &Segment,
        previous: Option<&Segment>,
        to: &RouteTree,
        from: Option<&RouteTree>,
    );
}

/// Constructs resources for segments during the commit pass.
///
/// This is the explicit replacement for ambient dependency-injection lookup:
/// all wiring a resource needs is captured by the factory the engine was
/// built with. Instantiation may be asynchronous and may fail; a failure
/// aborts the navigation before any mutation.
pub trait ResourceFactory: Send + Sync {
    /// Instantiate the resource for `segment`.
    fn create<'a>(
        &'a self,
        segment: &'a Segment,
    ) -> BoxFuture<'a, Result<Arc<dyn Resource>, FactoryError>>;
}

/// Resource instantiation failure.
#[derive(Debug, Error)]
#[error("failed to instantiate resource '{kind}': {reason}")]
pub struct FactoryError {
    /// The resource kind that failed to instantiate.
    pub kind: String,
    /// Factory-provided failure description.
    pub reason: String,
}

impl FactoryError {
    /// Create a factory error for the given resource kind.
    pub fn new(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}
