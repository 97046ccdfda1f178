//! Background listener for externally driven address changes.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::NavigationEngine;

/// Spawn a task that navigates the engine for every address received.
///
/// Models the subscription a host environment feeds with location changes.
/// The task runs until the channel closes or the engine is disposed; a veto
/// or failure on one address is logged and the listener moves on to the next.
pub fn spawn_address_listener(
    engine: NavigationEngine,
    mut addresses: mpsc::Receiver<String>,
) -> JoinHandle<()> {
    let cancel = engine.cancel_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("address listener stopping, engine disposed");
                    break;
                }
                next = addresses.recv() => {
                    let Some(address) = next else {
                        debug!("address listener stopping, channel closed");
                        break;
                    };
                    match engine.navigate(&address).await {
                        Ok(true) => {}
                        Ok(false) => {
                            info!(address = %address, "external navigation vetoed");
                        }
                        Err(error) => {
                            warn!(address = %address, error = %error, "external navigation failed");
                        }
                    }
                }
            }
        }
    })
}
