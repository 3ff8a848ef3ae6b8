use std::sync::Arc;

use pc_core::panel::PanelState;
use tokio::sync::{Mutex, MutexGuard};

/// Shared panel context containing state and dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
/// - `dispatch_lock`: held for a whole transition plus its side effects.
/// - `state`: used for both reading (`get_state`) and writing (during dispatch).
#[derive(Clone)]
pub struct PanelContext {
    state: Arc<Mutex<PanelState>>,
    dispatch_lock: Arc<Mutex<()>>,
}

impl PanelContext {
    pub fn new(initial_state: PanelState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial_state)),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the current state without taking the dispatch lock.
    pub async fn get_state(&self) -> PanelState {
        self.state.lock().await.clone()
    }

    /// Waits for any in-flight dispatch to finish.
    pub async fn acquire_dispatch_lock(&self) -> MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Returns `None` while another dispatch is in flight.
    pub fn try_acquire_dispatch_lock(&self) -> Option<MutexGuard<'_, ()>> {
        self.dispatch_lock.try_lock().ok()
    }

    /// Should only be called while holding `dispatch_lock`.
    pub async fn set_state(&self, state: PanelState) {
        let mut guard = self.state.lock().await;
        *guard = state;
    }
}

impl Default for PanelContext {
    fn default() -> Self {
        Self::new(PanelState::Empty)
    }
}
