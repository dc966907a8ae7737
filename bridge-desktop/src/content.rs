//! In-Memory Hosted Content Bridge

use bridge_traits::{
    error::{BridgeError, Result},
    lifecycle::{
        BridgeContext, BridgeHandle, HostedContentBridge, LifecycleEvent, SavedState,
    },
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// A call received by [`InMemoryContentBridge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    Init { saved_state: Option<SavedState> },
    Dispatch(LifecycleEvent),
    Flush { budget: Duration },
    SaveState,
    Destroy { raw: u64 },
}

/// Hosted content bridge that keeps everything in memory.
///
/// Used by desktop hosts without a real content runtime and by tests that
/// need to observe what the shell forwards. Pending content is modelled as a
/// counter that `flush_pending` drains.
pub struct InMemoryContentBridge {
    calls: Mutex<Vec<BridgeCall>>,
    next_raw: AtomicU64,
    live: Mutex<Option<u64>>,
    pending_writes: AtomicU64,
    flush_delay: Duration,
    honor_budget: bool,
    fail_init: bool,
    state_to_save: Option<SavedState>,
}

impl InMemoryContentBridge {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_raw: AtomicU64::new(1),
            live: Mutex::new(None),
            pending_writes: AtomicU64::new(0),
            flush_delay: Duration::ZERO,
            honor_budget: true,
            fail_init: false,
            state_to_save: None,
        }
    }

    /// Make every flush take `delay`. With `honor_budget`, the flush stops
    /// once the budget passed by the host is spent.
    pub fn with_flush_delay(mut self, delay: Duration, honor_budget: bool) -> Self {
        self.flush_delay = delay;
        self.honor_budget = honor_budget;
        self
    }

    /// Make `init` fail as if native resources could not be allocated.
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Blob returned from `save_state`.
    pub fn with_state_to_save(mut self, state: SavedState) -> Self {
        self.state_to_save = Some(state);
        self
    }

    /// Queue writes that the next flush must persist.
    pub fn enqueue_writes(&self, count: u64) {
        self.pending_writes.fetch_add(count, Ordering::SeqCst);
    }

    pub fn pending_writes(&self) -> u64 {
        self.pending_writes.load(Ordering::SeqCst)
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<BridgeCall> {
        lock(&self.calls).clone()
    }

    pub fn init_count(&self) -> usize {
        self.count(|call| matches!(call, BridgeCall::Init { .. }))
    }

    pub fn destroy_count(&self) -> usize {
        self.count(|call| matches!(call, BridgeCall::Destroy { .. }))
    }

    /// Events dispatched to hosted content, in order.
    pub fn dispatched(&self) -> Vec<LifecycleEvent> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                BridgeCall::Dispatch(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    /// Raw token of the live handle, if any.
    pub fn live_handle(&self) -> Option<u64> {
        *lock(&self.live)
    }

    fn count(&self, predicate: impl Fn(&BridgeCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: BridgeCall) {
        lock(&self.calls).push(call);
    }

    fn ensure_live(&self, handle: &BridgeHandle) -> Result<()> {
        match *lock(&self.live) {
            Some(raw) if raw == handle.raw() => Ok(()),
            _ => Err(BridgeError::OperationFailed(format!(
                "handle {} is not live",
                handle.raw()
            ))),
        }
    }
}

impl Default for InMemoryContentBridge {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl HostedContentBridge for InMemoryContentBridge {
    fn init(&self, context: BridgeContext) -> Result<BridgeHandle> {
        self.record(BridgeCall::Init {
            saved_state: context.saved_state.clone(),
        });

        if self.fail_init {
            return Err(BridgeError::ResourceExhausted(
                "in-memory bridge configured to fail init".to_string(),
            ));
        }

        let mut live = lock(&self.live);
        if let Some(raw) = *live {
            return Err(BridgeError::OperationFailed(format!(
                "bridge already initialized with handle {}",
                raw
            )));
        }

        let raw = self.next_raw.fetch_add(1, Ordering::SeqCst);
        *live = Some(raw);
        debug!(raw, activation_id = %context.activation_id, "In-memory bridge initialized");
        Ok(BridgeHandle::new(raw))
    }

    fn dispatch_lifecycle(&self, handle: &BridgeHandle, event: LifecycleEvent) -> Result<()> {
        self.ensure_live(handle)?;
        self.record(BridgeCall::Dispatch(event));
        Ok(())
    }

    fn flush_pending(&self, handle: &BridgeHandle, budget: Duration) -> Result<()> {
        self.ensure_live(handle)?;
        self.record(BridgeCall::Flush { budget });

        let delay = if self.honor_budget {
            self.flush_delay.min(budget)
        } else {
            self.flush_delay
        };
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        if delay < self.flush_delay {
            warn!(
                pending = self.pending_writes(),
                "Flush cut short by budget; pending writes kept"
            );
            return Ok(());
        }

        self.pending_writes.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn save_state(&self, handle: &BridgeHandle) -> Result<Option<SavedState>> {
        self.ensure_live(handle)?;
        self.record(BridgeCall::SaveState);
        Ok(self.state_to_save.clone())
    }

    fn destroy(&self, handle: BridgeHandle) -> Result<()> {
        self.ensure_live(&handle)?;
        self.record(BridgeCall::Destroy { raw: handle.raw() });
        *lock(&self.live) = None;
        Ok(())
    }
}
