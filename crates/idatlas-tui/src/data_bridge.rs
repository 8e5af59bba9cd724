//! Data bridge; forwards [`Explorer`] snapshots into the action channel.
//!
//! Runs as a background task: subscribes to the snapshot watch channel and
//! forwards every published [`ViewSnapshot`] as an [`Action`]. Shuts down
//! cleanly on cancellation.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use idatlas_core::Explorer;

use crate::action::Action;

pub async fn run_data_bridge(
    explorer: Explorer,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut snapshots = explorer.subscribe();

    // Push the current snapshot so screens have data immediately.
    let initial = snapshots.borrow_and_update().clone();
    let _ = action_tx.send(Action::SnapshotUpdated(initial));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = snapshots.changed() => {
                if changed.is_err() {
                    // Explorer dropped; nothing more will arrive.
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if action_tx.send(Action::SnapshotUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge shut down");
}
