//! Bridge readiness.
//!
//! A bridge starts `Unready` and moves to `Ready` exactly once, when the
//! embedded content reports that it finished loading. There is no way back:
//! a torn-down surface gets a new bridge.

use tokio::sync::watch;

/// Readiness of the embedded content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Unready,
    Ready,
}

/// One-way Unready -> Ready latch that can be awaited
#[derive(Debug)]
pub(crate) struct ReadyLatch {
    tx: watch::Sender<BridgeState>,
}

impl ReadyLatch {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(BridgeState::Unready);
        Self { tx }
    }

    pub(crate) fn state(&self) -> BridgeState {
        *self.tx.borrow()
    }

    /// Flip to `Ready`. Returns false when already ready.
    pub(crate) fn open(&self) -> bool {
        self.tx.send_if_modified(|state| match state {
            BridgeState::Unready => {
                *state = BridgeState::Ready;
                true
            }
            BridgeState::Ready => false,
        })
    }

    pub(crate) async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as self, so this cannot fail
        let _ = rx.wait_for(|state| *state == BridgeState::Ready).await;
    }
}
