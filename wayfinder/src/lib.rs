//! Wayfinder - hierarchical navigation reconciliation engine.
//!
//! This library decides, node by node, which parts of a navigation tree can be
//! kept alive, which must be torn down, and which must be newly mounted when a
//! new candidate route tree replaces the accepted one. Teardown is gated: every
//! live resource slated for removal is asked for consent before any mutation
//! happens, and a single veto leaves the accepted state untouched.
//!
//! # High-Level API
//!
//! Most consumers only need the [`engine`] module:
//!
//! ```ignore
//! use wayfinder::engine::EngineBuilder;
//!
//! let engine = EngineBuilder::new(parser, recognizer, factory, "app").build();
//!
//! // Parse, recognize, reconcile and (if every guard consents) commit.
//! let committed = engine.navigate("/team/33/user/11").await?;
//! ```
//!
//! The reconciliation itself is split into pure, independently testable
//! stages (see [`reconcile`]): a dry-run pass that discovers every resource
//! that would be deactivated, a concurrent guard poll over those deactivation
//! paths, and a commit pass that pre-instantiates all replacement resources
//! before performing any unmount or mount.

pub mod engine;
pub mod error;
pub mod outlet;
pub mod recognize;
pub mod reconcile;
pub mod resource;
pub mod segment;
pub mod tree;

/// Version of the wayfinder library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
