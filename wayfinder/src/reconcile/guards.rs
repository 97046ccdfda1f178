//! Guard protocol: cooperative consent for teardown.

use futures::future::join_all;
use tracing::debug;

use crate::tree::RouteTree;

use super::plan::DeactivationPath;

/// Poll every deactivation path for consent.
///
/// Paths are evaluated concurrently with each other. Within one path, guards
/// run sequentially from the innermost resource to the outermost; a resource
/// without the guard capability consents implicitly, and a `false` settles
/// the path without polling its remaining steps. The whole set consents only
/// if every path does.
///
/// No mutation has happened by the time this runs, and none happens unless
/// it returns `true`.
pub async fn all_consent(paths: &[DeactivationPath], from: &RouteTree, to: &RouteTree) -> bool {
    let results = join_all(paths.iter().map(|path| path_consents(path, from, to))).await;
    results.into_iter().all(|consented| consented)
}

async fn path_consents(path: &DeactivationPath, from: &RouteTree, to: &RouteTree) -> bool {
    for resource in path.resources().iter().rev() {
        if let Some(guard) = resource.deactivation_guard() {
            if !guard.can_deactivate(from, to).await {
                debug!("deactivation vetoed");
                return false;
            }
        }
    }
    true
}
