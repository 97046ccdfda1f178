//! Tree reconciliation stages.
//!
//! Reconciliation is three separated stages instead of one flag-switched
//! walk:
//!
//! 1. [`plan_deactivations`], a pure dry-run over (candidate, previous,
//!    registry) that discovers every resource that would be deactivated,
//!    grouped into ordered [`DeactivationPath`]s.
//! 2. [`all_consent`], the guard protocol: every path polled concurrently,
//!    innermost resource first within each path.
//! 3. [`CommitPlan`], built by [`build`] (which pre-instantiates every
//!    replacement resource and validates every outlet, so nothing can fail
//!    later) and executed by [`apply`] (synchronous mutation: deepest-first
//!    unmounts, shallowest-first mounts).
//!
//! The engine runs the stages in order and only ever mutates the registry in
//! [`apply`]; a veto or failure in an earlier stage leaves everything as it
//! was.

mod commit;
mod guards;
mod plan;

pub use commit::{apply, build, CommitPlan};
pub use guards::all_consent;
pub use plan::{plan_deactivations, DeactivationPath};
