//! Dry-run pass: deactivation discovery.

use std::sync::Arc;

use crate::outlet::{Mount, OutletMap};
use crate::resource::Resource;
use crate::tree::RouteNode;

/// Ordered chain of resources that must all consent before one removed
/// subtree position may be torn down.
///
/// Resources run from the outermost ancestor to the innermost descendant;
/// guard evaluation walks the chain in reverse.
pub struct DeactivationPath {
    resources: Vec<Arc<dyn Resource>>,
}

impl DeactivationPath {
    pub(crate) fn new(resources: Vec<Arc<dyn Resource>>) -> Self {
        Self { resources }
    }

    /// Resources from outermost ancestor to innermost descendant.
    pub fn resources(&self) -> &[Arc<dyn Resource>] {
        &self.resources
    }
}

/// Walk `(candidate, previous, registry)` in lock-step and collect every
/// deactivation path a commit of `candidate` would require.
///
/// Children are matched per outlet name. A position whose previous and
/// candidate segments are equal is reused: the walk recurses into the
/// existing mount's nested registry with an extended ancestor chain. Any
/// other position with a live mount queues that whole mounted subtree:
/// one path per resource, ancestor-chain-then-node, pre-order. Previous
/// outlets with no candidate counterpart are fully removed and queued the
/// same way.
///
/// Pure with respect to the registry: nothing is mutated here.
pub fn plan_deactivations(
    candidate: &RouteNode,
    previous: Option<&RouteNode>,
    registry: &OutletMap,
) -> Vec<DeactivationPath> {
    let mut paths = Vec::new();
    let mut chain = Vec::new();
    let previous = previous.map(std::slice::from_ref).unwrap_or(&[]);
    plan_children(
        std::slice::from_ref(candidate),
        previous,
        registry,
        &mut chain,
        &mut paths,
    );
    paths
}

fn plan_children(
    candidate: &[RouteNode],
    previous: &[RouteNode],
    registry: &OutletMap,
    chain: &mut Vec<Arc<dyn Resource>>,
    out: &mut Vec<DeactivationPath>,
) {
    for node in candidate {
        let outlet = node.segment().outlet();
        let prev = previous.iter().find(|p| p.segment().outlet() == outlet);
        let mount = registry.get(outlet);
        match (prev, mount) {
            (Some(prev), Some(mount)) if prev.segment() == node.segment() => {
                chain.push(Arc::clone(mount.resource()));
                plan_children(node.children(), prev.children(), mount.outlets(), chain, out);
                chain.pop();
            }
            (Some(_), Some(mount)) => collect_subtree(mount, chain, out),
            _ => {}
        }
    }

    for prev in previous {
        let outlet = prev.segment().outlet();
        if candidate.iter().all(|c| c.segment().outlet() != outlet) {
            if let Some(mount) = registry.get(outlet) {
                collect_subtree(mount, chain, out);
            }
        }
    }
}

fn collect_subtree(
    mount: &Mount,
    chain: &mut Vec<Arc<dyn Resource>>,
    out: &mut Vec<DeactivationPath>,
) {
    chain.push(Arc::clone(mount.resource()));
    out.push(DeactivationPath::new(chain.clone()));
    for (_, child) in mount.outlets().iter() {
        collect_subtree(child, chain, out);
    }
    chain.pop();
}
