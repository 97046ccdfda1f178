//! Navigation engine: the orchestrating facade.
//!
//! [`NavigationEngine`] owns the accepted route tree, the outlet registry and
//! the change broadcast channel, and drives every navigation through the
//! reconciliation stages in order: recognize, dry-run, guard consent, build,
//! apply. One `tokio` mutex spans the whole sequence, so overlapping
//! navigations are serialized and each one reconciles against the state its
//! predecessor left behind.

mod builder;
mod listener;

pub use builder::EngineBuilder;
pub use listener::spawn_address_listener;

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{NavigationError, NavigationResult};
use crate::outlet::OutletMap;
use crate::recognize::{AddressParser, Recognizer};
use crate::reconcile::{all_consent, apply, build, plan_deactivations};
use crate::resource::ResourceFactory;
use crate::segment::{Segment, PRIMARY_OUTLET};
use crate::tree::{AddressTree, RouteNode, RouteTree};

/// Tunable engine parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Outlet names available at the top level of the hierarchy.
    pub root_slots: Vec<String>,
    /// Capacity of the navigation change broadcast channel.
    pub change_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_slots: vec![PRIMARY_OUTLET.to_string()],
            change_capacity: 16,
        }
    }
}

/// Broadcast on every committed navigation.
#[derive(Clone)]
pub struct NavigationChange {
    /// The newly accepted route tree.
    pub tree: Arc<RouteTree>,
    /// Its address form.
    pub address: Arc<AddressTree>,
}

/// Mutable navigation state, guarded by the engine's navigation mutex.
struct EngineState {
    tree: Option<Arc<RouteTree>>,
    address: Option<Arc<AddressTree>>,
    outlets: OutletMap,
}

/// Read-only copy of the accepted state for lock-free accessors.
#[derive(Default)]
struct Snapshot {
    tree: Option<Arc<RouteTree>>,
    address: Option<Arc<AddressTree>>,
}

struct EngineInner {
    parser: Arc<dyn AddressParser>,
    recognizer: Arc<dyn Recognizer>,
    factory: Arc<dyn ResourceFactory>,
    root_kind: String,
    config: EngineConfig,
    state: Mutex<EngineState>,
    snapshot: std::sync::RwLock<Snapshot>,
    changes_tx: broadcast::Sender<NavigationChange>,
    cancel: CancellationToken,
}

/// Hierarchical navigation engine.
///
/// Cheap to clone; all clones share one accepted state. Construct through
/// [`EngineBuilder`].
///
/// `navigate` resolves `Ok(true)` for a committed (or idempotent)
/// navigation, `Ok(false)` for a guard veto and `Err` for everything that
/// rejects the navigation outright. In all three cases the accepted state is
/// either fully advanced or fully untouched.
#[derive(Clone)]
pub struct NavigationEngine {
    inner: Arc<EngineInner>,
}

impl NavigationEngine {
    pub(crate) fn from_parts(
        parser: Arc<dyn AddressParser>,
        recognizer: Arc<dyn Recognizer>,
        factory: Arc<dyn ResourceFactory>,
        root_kind: String,
        config: EngineConfig,
    ) -> Self {
        let (changes_tx, _) = broadcast::channel(config.change_capacity.max(1));
        Self {
            inner: Arc::new(EngineInner {
                parser,
                recognizer,
                factory,
                root_kind,
                config,
                state: Mutex::new(EngineState {
                    tree: None,
                    address: None,
                    outlets: OutletMap::new(),
                }),
                snapshot: std::sync::RwLock::new(Snapshot::default()),
                changes_tx,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Navigate to an external address.
    ///
    /// Parses and recognizes `address`, then reconciles the recognized tree
    /// against the accepted state. Resolves `Ok(false)` if a deactivation
    /// guard vetoed the transition.
    pub async fn navigate(&self, address: &str) -> NavigationResult<bool> {
        let mut state = self.inner.state.lock().await;
        let parsed = self.inner.parser.parse(address)?;
        let candidate = self
            .inner
            .recognizer
            .recognize(&self.inner.root_kind, &parsed)
            .await?;
        debug!(address = %address, "address recognized");
        self.reconcile(&mut state, candidate, parsed).await
    }

    /// Navigate by editing the accepted tree in place.
    ///
    /// With `at = Some(segment)`, `edit` receives the subtree rooted at the
    /// first node matching `segment` and its return value replaces that
    /// subtree; with `at = None` it receives and replaces the whole root.
    /// The resulting tree reconciles exactly like an address navigation.
    ///
    /// # Errors
    ///
    /// [`NavigationError::NoAcceptedTree`] before the first committed
    /// navigation, [`NavigationError::SegmentNotFound`] if `at` matches no
    /// node, plus anything reconciliation itself can reject.
    pub async fn navigate_with<F>(&self, at: Option<&Segment>, edit: F) -> NavigationResult<bool>
    where
        F: FnOnce(&RouteNode) -> RouteNode,
    {
        let mut state = self.inner.state.lock().await;
        let accepted = state.tree.clone().ok_or(NavigationError::NoAcceptedTree)?;
        let candidate = match at {
            Some(segment) => accepted
                .with_subtree_replaced(segment, edit)
                .ok_or(NavigationError::SegmentNotFound)?,
            None => RouteTree::new(edit(accepted.root())),
        };
        let address = candidate.to_address_tree();
        self.reconcile(&mut state, candidate, address).await
    }

    async fn reconcile(
        &self,
        state: &mut EngineState,
        candidate: RouteTree,
        address: AddressTree,
    ) -> NavigationResult<bool> {
        if let Some(outlet) = candidate.first_duplicate_outlet() {
            return Err(NavigationError::DuplicateOutlet {
                outlet: outlet.to_string(),
            });
        }

        let previous = state.tree.clone();
        let previous_root = previous.as_deref().map(RouteTree::root);

        let paths = plan_deactivations(candidate.root(), previous_root, &state.outlets);
        debug!(paths = paths.len(), "deactivation dry run complete");

        if !paths.is_empty() {
            if let Some(from) = previous.as_deref() {
                if !all_consent(&paths, from, &candidate).await {
                    info!("navigation vetoed by deactivation guard");
                    return Ok(false);
                }
            }
        }

        let plan = build(
            candidate.root(),
            previous_root,
            &state.outlets,
            &self.inner.config.root_slots,
            self.inner.factory.as_ref(),
        )
        .await?;

        // The paths hold resource handles; release them so unmounting in
        // apply drops the last ones.
        drop(paths);

        if plan.is_noop() {
            debug!("navigation matches accepted state, nothing to commit");
            return Ok(true);
        }

        apply(plan, &mut state.outlets, previous.as_deref(), &candidate)?;

        let tree = Arc::new(candidate);
        let address = Arc::new(address);
        state.tree = Some(Arc::clone(&tree));
        state.address = Some(Arc::clone(&address));
        if let Ok(mut snapshot) = self.inner.snapshot.write() {
            snapshot.tree = Some(Arc::clone(&tree));
            snapshot.address = Some(Arc::clone(&address));
        }

        let _ = self.inner.changes_tx.send(NavigationChange {
            tree: Arc::clone(&tree),
            address,
        });
        info!(address = %self.inner.parser.serialize(&tree.to_address_tree()), "navigation committed");
        Ok(true)
    }

    /// The currently accepted route tree, if any navigation has committed.
    pub fn current_tree(&self) -> Option<Arc<RouteTree>> {
        self.inner
            .snapshot
            .read()
            .map(|snapshot| snapshot.tree.clone())
            .unwrap_or(None)
    }

    /// The address form of the accepted tree.
    pub fn current_address_tree(&self) -> Option<Arc<AddressTree>> {
        self.inner
            .snapshot
            .read()
            .map(|snapshot| snapshot.address.clone())
            .unwrap_or(None)
    }

    /// The accepted address serialized back to its external string form.
    pub fn current_address(&self) -> Option<String> {
        self.current_address_tree()
            .map(|address| self.inner.parser.serialize(&address))
    }

    /// Subscribe to committed navigation changes.
    ///
    /// Only actual commits are broadcast: vetoed, failed and idempotent
    /// navigations produce nothing.
    pub fn changes(&self) -> broadcast::Receiver<NavigationChange> {
        self.inner.changes_tx.subscribe()
    }

    /// Stop background listeners spawned for this engine.
    pub fn dispose(&self) {
        self.inner.cancel.cancel();
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }
}
