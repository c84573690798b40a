//! Data bridge — connects the [`RefreshController`] watch channels to TUI
//! actions.
//!
//! Runs as a background task: forwards every fetch-state transition and
//! selection change as an [`Action`] through the TUI's action channel.
//! Shuts down cleanly on cancellation.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use chainpulse_core::{RefreshController, SampleSource};

use crate::action::Action;

pub async fn run_data_bridge<S: SampleSource + 'static>(
    controller: RefreshController<S>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut state = controller.state();
    let mut selection = controller.selection();

    // Push initial values so the screen has something to draw immediately.
    let _ = action_tx.send(Action::SelectionChanged(*selection.borrow_and_update()));
    let _ = action_tx.send(Action::StateChanged(state.borrow_and_update().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = state.changed() => {
                let current = state.borrow_and_update().clone();
                let _ = action_tx.send(Action::StateChanged(current));
            }
            Ok(()) = selection.changed() => {
                let current = *selection.borrow_and_update();
                let _ = action_tx.send(Action::SelectionChanged(current));
            }
        }
    }

    debug!("data bridge shut down");
}
