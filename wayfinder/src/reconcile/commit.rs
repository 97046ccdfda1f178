//! Commit pass: plan construction and mutation.
//!
//! The commit is split so that nothing can fail once mutation has begun:
//! [`build`] re-walks the trees, validates every candidate outlet against the
//! outlets its parent declares, and instantiates every replacement resource
//! up front; [`apply`] then mutates the registry synchronously. A factory
//! failure or a structural error therefore aborts the navigation with zero
//! state change instead of leaving a half-torn-down hierarchy behind.

use std::sync::Arc;

use tracing::trace;

use crate::error::NavigationError;
use crate::outlet::{Mount, OutletMap};
use crate::resource::{BoxFuture, Resource, ResourceFactory};
use crate::segment::Segment;
use crate::tree::{RouteNode, RouteTree};

/// A fully instantiated subtree waiting to be mounted.
struct MountPlan {
    segment: Segment,
    resource: Arc<dyn Resource>,
    children: Vec<MountPlan>,
}

/// What to do at one outlet position.
enum OutletOp {
    /// Segment unchanged: keep the existing mount, recurse into its children.
    Keep { outlet: String, ops: Vec<OutletOp> },
    /// Unmount whatever is there (if anything), mount the prepared subtree.
    Replace {
        outlet: String,
        previous: Option<Segment>,
        plan: MountPlan,
    },
    /// Unmount, nothing takes the position.
    Remove { outlet: String },
}

/// Everything [`apply`] needs, with all fallible work already done.
pub struct CommitPlan {
    ops: Vec<OutletOp>,
}

impl CommitPlan {
    /// Whether applying this plan would mount or unmount nothing.
    pub fn is_noop(&self) -> bool {
        fn all_keep(ops: &[OutletOp]) -> bool {
            ops.iter().all(|op| match op {
                OutletOp::Keep { ops, .. } => all_keep(ops),
                _ => false,
            })
        }
        all_keep(&self.ops)
    }
}

/// Build the commit plan for `candidate` against the accepted state.
///
/// Walks the trees exactly like the dry-run pass, but resolves each changed
/// position into an operation: candidate outlets are checked against the
/// declared child slots of their parent (the engine's root slots at the top
/// level, [`Resource::child_slots`] below), and every replacement subtree is
/// instantiated through `factory` before returning.
///
/// # Errors
///
/// [`NavigationError::UnknownOutlet`] if a candidate node targets an
/// undeclared outlet, or [`NavigationError::Instantiation`] if the factory
/// fails. Either way the registry has not been touched.
pub async fn build(
    candidate: &RouteNode,
    previous: Option<&RouteNode>,
    registry: &OutletMap,
    root_slots: &[String],
    factory: &dyn ResourceFactory,
) -> Result<CommitPlan, NavigationError> {
    let previous = previous.map(std::slice::from_ref).unwrap_or(&[]);
    let ops = build_ops(
        std::slice::from_ref(candidate),
        previous,
        Some(registry),
        root_slots,
        factory,
    )
    .await?;
    Ok(CommitPlan { ops })
}

fn build_ops<'a>(
    candidate: &'a [RouteNode],
    previous: &'a [RouteNode],
    registry: Option<&'a OutletMap>,
    declared: &'a [String],
    factory: &'a dyn ResourceFactory,
) -> BoxFuture<'a, Result<Vec<OutletOp>, NavigationError>> {
    Box::pin(async move {
        let mut ops = Vec::new();

        for node in candidate {
            let outlet = node.segment().outlet();
            if !declared.iter().any(|slot| slot == outlet) {
                return Err(NavigationError::UnknownOutlet {
                    outlet: outlet.to_string(),
                });
            }

            let prev = previous.iter().find(|p| p.segment().outlet() == outlet);
            let mount = registry.and_then(|r| r.get(outlet));
            match (prev, mount) {
                (Some(prev), Some(mount)) if prev.segment() == node.segment() => {
                    let slots = mount.resource().child_slots();
                    let child_ops = build_ops(
                        node.children(),
                        prev.children(),
                        Some(mount.outlets()),
                        &slots,
                        factory,
                    )
                    .await?;
                    ops.push(OutletOp::Keep {
                        outlet: outlet.to_string(),
                        ops: child_ops,
                    });
                }
                _ => {
                    let plan = build_mount(node, factory).await?;
                    ops.push(OutletOp::Replace {
                        outlet: outlet.to_string(),
                        previous: prev.map(|p| p.segment().clone()),
                        plan,
                    });
                }
            }
        }

        for prev in previous {
            let outlet = prev.segment().outlet();
            if candidate.iter().all(|c| c.segment().outlet() != outlet) {
                ops.push(OutletOp::Remove {
                    outlet: outlet.to_string(),
                });
            }
        }

        Ok(ops)
    })
}

fn build_mount<'a>(
    node: &'a RouteNode,
    factory: &'a dyn ResourceFactory,
) -> BoxFuture<'a, Result<MountPlan, NavigationError>> {
    Box::pin(async move {
        let resource = factory.create(node.segment()).await?;
        let declared = resource.child_slots();

        let mut children = Vec::with_capacity(node.children().len());
        for child in node.children() {
            let outlet = child.segment().outlet();
            if !declared.iter().any(|slot| slot == outlet) {
                return Err(NavigationError::UnknownOutlet {
                    outlet: outlet.to_string(),
                });
            }
            children.push(build_mount(child, factory).await?);
        }

        Ok(MountPlan {
            segment: node.segment().clone(),
            resource,
            children,
        })
    })
}

/// Execute a commit plan against the registry.
///
/// Synchronous and, by construction of [`build`], free of fallible work:
/// removed and replaced subtrees are unmounted deepest-first (siblings in
/// declared order), replacement subtrees are mounted shallowest-first with
/// each resource's activation hook invoked as its level mounts, and kept
/// mounts are untouched.
pub fn apply(
    plan: CommitPlan,
    registry: &mut OutletMap,
    from: Option<&RouteTree>,
    to: &RouteTree,
) -> Result<(), NavigationError> {
    apply_ops(plan.ops, registry, from, to)
}

fn apply_ops(
    ops: Vec<OutletOp>,
    registry: &mut OutletMap,
    from: Option<&RouteTree>,
    to: &RouteTree,
) -> Result<(), NavigationError> {
    for op in ops {
        match op {
            OutletOp::Keep { outlet, ops } => {
                let mount =
                    registry
                        .get_mut(&outlet)
                        .ok_or_else(|| NavigationError::RegistryMismatch {
                            outlet: outlet.clone(),
                        })?;
                apply_ops(ops, mount.outlets_mut(), from, to)?;
            }
            OutletOp::Remove { outlet } => {
                if let Some(old) = registry.remove(&outlet) {
                    unmount(old);
                }
            }
            OutletOp::Replace {
                outlet,
                previous,
                plan,
            } => {
                if let Some(old) = registry.remove(&outlet) {
                    unmount(old);
                }
                let mount = activate(plan, previous.as_ref(), from, to);
                registry.insert(outlet, mount);
            }
        }
    }
    Ok(())
}

/// Tear down a mounted subtree, deepest resources first.
fn unmount(mut mount: Mount) {
    for (_, child) in mount.outlets_mut().drain() {
        unmount(child);
    }
    trace!(segment = %mount.segment(), "unmounted");
}

/// Mount a prepared subtree, shallowest resources first.
fn activate(
    plan: MountPlan,
    previous: Option<&Segment>,
    from: Option<&RouteTree>,
    to: &RouteTree,
) -> Mount {
    let MountPlan {
        segment,
        resource,
        children,
    } = plan;

    if let Some(hook) = resource.activation_hook() {
        hook.on_activate(&segment, previous, to, from);
    }
    trace!(segment = %segment, "mounted");

    let mut mount = Mount::new(segment, resource);
    for child in children {
        let outlet = child.segment.outlet().to_string();
        let child_mount = activate(child, None, from, to);
        mount.outlets_mut().insert(outlet, child_mount);
    }
    mount
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::resource::{ActivationHook, FactoryError};
    use crate::segment::PRIMARY_OUTLET;

    type EventLog = Arc<Mutex<Vec<String>>>;

    /// Resource that logs activation and teardown.
    struct TracedResource {
        label: String,
        events: EventLog,
        slots: Vec<String>,
    }

    impl Resource for TracedResource {
        fn child_slots(&self) -> Vec<String> {
            self.slots.clone()
        }

        fn activation_hook(&self) -> Option<&dyn ActivationHook> {
            Some(self)
        }
    }

    impl ActivationHook for TracedResource {
        fn on_activate(
            &self,
            next: &Segment,
            previous: Option<&Segment>,
            _to: &RouteTree,
            _from: Option<&RouteTree>,
        ) {
            let prev = previous.map(|p| p.to_string()).unwrap_or_default();
            self.events
                .lock()
                .unwrap()
                .push(format!("activate:{} prev:{prev}", next));
        }
    }

    impl Drop for TracedResource {
        fn drop(&mut self) {
            self.events
                .lock()
                .unwrap()
                .push(format!("teardown:{}", self.label));
        }
    }

    /// Factory producing traced resources; kinds in `failing` refuse.
    struct TestFactory {
        events: EventLog,
        failing: Vec<&'static str>,
    }

    impl TestFactory {
        fn new(events: &EventLog) -> Self {
            Self {
                events: Arc::clone(events),
                failing: Vec::new(),
            }
        }
    }

    impl ResourceFactory for TestFactory {
        fn create<'a>(
            &'a self,
            segment: &'a Segment,
        ) -> BoxFuture<'a, Result<Arc<dyn Resource>, FactoryError>> {
            Box::pin(async move {
                if self.failing.contains(&segment.kind()) {
                    return Err(FactoryError::new(segment.kind(), "configured to fail"));
                }
                Ok(Arc::new(TracedResource {
                    label: segment.to_string(),
                    events: Arc::clone(&self.events),
                    slots: vec![PRIMARY_OUTLET.to_string()],
                }) as Arc<dyn Resource>)
            })
        }
    }

    fn seg(kind: &str, piece: &str) -> Segment {
        Segment::new(kind).with_static(piece)
    }

    fn chain3() -> RouteTree {
        RouteTree::new(RouteNode::with_children(
            seg("a", "a"),
            vec![RouteNode::with_children(
                seg("b", "b"),
                vec![RouteNode::new(seg("c", "c"))],
            )],
        ))
    }

    fn root_slots() -> Vec<String> {
        vec![PRIMARY_OUTLET.to_string()]
    }

    async fn mount_tree(
        tree: &RouteTree,
        registry: &mut OutletMap,
        factory: &TestFactory,
    ) {
        let plan = build(tree.root(), None, registry, &root_slots(), factory)
            .await
            .expect("build");
        apply(plan, registry, None, tree).expect("apply");
    }

    #[tokio::test]
    async fn test_first_commit_mounts_shallowest_first() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let factory = TestFactory::new(&events);
        let mut registry = OutletMap::new();
        let tree = chain3();

        mount_tree(&tree, &mut registry, &factory).await;

        let seen = events.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec!["activate:a prev:", "activate:b prev:", "activate:c prev:"]
        );
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_full_replacement_unmounts_deepest_first() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let factory = TestFactory::new(&events);
        let mut registry = OutletMap::new();
        let previous = chain3();
        mount_tree(&previous, &mut registry, &factory).await;
        events.lock().unwrap().clear();

        let candidate = RouteTree::new(RouteNode::with_children(
            seg("x", "x"),
            vec![RouteNode::new(seg("y", "y"))],
        ));
        let plan = build(
            candidate.root(),
            Some(previous.root()),
            &registry,
            &root_slots(),
            &factory,
        )
        .await
        .expect("build");
        apply(plan, &mut registry, Some(&previous), &candidate).expect("apply");

        let seen = events.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "teardown:c",
                "teardown:b",
                "teardown:a",
                "activate:x prev:a",
                "activate:y prev:",
            ]
        );
    }

    #[tokio::test]
    async fn test_reused_parent_keeps_resource_identity() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let factory = TestFactory::new(&events);
        let mut registry = OutletMap::new();
        let previous = chain3();
        mount_tree(&previous, &mut registry, &factory).await;

        let root_before = Arc::clone(registry.get(PRIMARY_OUTLET).expect("root").resource());
        events.lock().unwrap().clear();

        // Same a/b, different leaf.
        let candidate = RouteTree::new(RouteNode::with_children(
            seg("a", "a"),
            vec![RouteNode::with_children(
                seg("b", "b"),
                vec![RouteNode::new(seg("c", "other"))],
            )],
        ));
        let plan = build(
            candidate.root(),
            Some(previous.root()),
            &registry,
            &root_slots(),
            &factory,
        )
        .await
        .expect("build");
        apply(plan, &mut registry, Some(&previous), &candidate).expect("apply");

        let seen = events.lock().unwrap().clone();
        assert_eq!(seen, vec!["teardown:c", "activate:other prev:c"]);

        let root_after = registry.get(PRIMARY_OUTLET).expect("root").resource();
        assert!(Arc::ptr_eq(&root_before, root_after));
    }

    #[tokio::test]
    async fn test_noop_plan_detected() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let factory = TestFactory::new(&events);
        let mut registry = OutletMap::new();
        let tree = chain3();
        mount_tree(&tree, &mut registry, &factory).await;

        let plan = build(
            tree.root(),
            Some(tree.root()),
            &registry,
            &root_slots(),
            &factory,
        )
        .await
        .expect("build");
        assert!(plan.is_noop());
    }

    #[tokio::test]
    async fn test_undeclared_outlet_fails_before_any_mutation() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let factory = TestFactory::new(&events);
        let mut registry = OutletMap::new();
        let previous = chain3();
        mount_tree(&previous, &mut registry, &factory).await;
        events.lock().unwrap().clear();

        // Candidate replaces the root and hangs a child off an "aux" outlet
        // the new root does not declare.
        let candidate = RouteTree::new(RouteNode::with_children(
            seg("x", "x"),
            vec![RouteNode::new(
                Segment::for_outlet("side", "aux").with_static("side"),
            )],
        ));
        let result = build(
            candidate.root(),
            Some(previous.root()),
            &registry,
            &root_slots(),
            &factory,
        )
        .await;

        assert!(matches!(
            result,
            Err(NavigationError::UnknownOutlet { ref outlet }) if outlet == "aux"
        ));
        // Nothing mounted was torn down and nothing was activated; the only
        // teardown is the discarded pre-built replacement.
        let seen = events.lock().unwrap().clone();
        assert!(seen.iter().all(|e| !e.starts_with("activate")));
        for label in ["a", "b", "c"] {
            assert!(!seen.contains(&format!("teardown:{label}")));
        }
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_factory_failure_fails_before_any_mutation() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let mut factory = TestFactory::new(&events);
        let mut registry = OutletMap::new();
        let previous = chain3();
        mount_tree(&previous, &mut registry, &factory).await;
        events.lock().unwrap().clear();

        factory.failing.push("y");
        let candidate = RouteTree::new(RouteNode::with_children(
            seg("x", "x"),
            vec![RouteNode::new(seg("y", "y"))],
        ));
        let result = build(
            candidate.root(),
            Some(previous.root()),
            &registry,
            &root_slots(),
            &factory,
        )
        .await;

        assert!(matches!(result, Err(NavigationError::Instantiation(_))));
        let seen = events.lock().unwrap().clone();
        assert!(seen.iter().all(|e| !e.starts_with("activate")));
        for label in ["a", "b", "c"] {
            assert!(!seen.contains(&format!("teardown:{label}")));
        }
        assert_eq!(registry.len(), 1);
    }
}
