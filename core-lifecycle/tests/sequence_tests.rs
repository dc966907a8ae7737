//! Exhaustive callback-sequence tests for the lifecycle coordinator
//!
//! Drives every sequence of up to five callbacks, including the ones a
//! well-behaved OS never sends, and checks that the bridge sees a coherent
//! picture: no dispatch without a live handle, one init per activation, no
//! leaked handle after destroy.

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{
    BridgeContext, BridgeHandle, Configuration, HostedContentBridge, LifecycleEvent, SavedState,
    SystemClock,
};
use core_lifecycle::BridgeLifecycleCoordinator;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
enum Callback {
    Create,
    Resume,
    Pause,
    ConfigurationChanged,
    Destroy,
}

const CALLBACKS: [Callback; 5] = [
    Callback::Create,
    Callback::Resume,
    Callback::Pause,
    Callback::ConfigurationChanged,
    Callback::Destroy,
];

#[derive(Default)]
struct Ledger {
    live: Option<u64>,
    next_raw: u64,
    inits: usize,
    destroys: usize,
    dispatched: Vec<LifecycleEvent>,
    violations: Vec<String>,
}

/// Bridge that records contract breaches instead of failing.
#[derive(Default)]
struct StrictBridge {
    ledger: Mutex<Ledger>,
}

impl StrictBridge {
    fn check_live(ledger: &mut Ledger, handle: &BridgeHandle, operation: &str) {
        if ledger.live != Some(handle.raw()) {
            ledger
                .violations
                .push(format!("{} with dead handle {}", operation, handle.raw()));
        }
    }
}

impl HostedContentBridge for StrictBridge {
    fn init(&self, _context: BridgeContext) -> BridgeResult<BridgeHandle> {
        let mut ledger = self.ledger.lock().unwrap();
        if ledger.live.is_some() {
            ledger.violations.push("init while live".to_string());
            return Err(BridgeError::OperationFailed("already live".to_string()));
        }
        ledger.next_raw += 1;
        ledger.inits += 1;
        let raw = ledger.next_raw;
        ledger.live = Some(raw);
        Ok(BridgeHandle::new(raw))
    }

    fn dispatch_lifecycle(&self, handle: &BridgeHandle, event: LifecycleEvent) -> BridgeResult<()> {
        let mut ledger = self.ledger.lock().unwrap();
        Self::check_live(&mut ledger, handle, "dispatch");
        ledger.dispatched.push(event);
        Ok(())
    }

    fn flush_pending(&self, handle: &BridgeHandle, _budget: Duration) -> BridgeResult<()> {
        let mut ledger = self.ledger.lock().unwrap();
        Self::check_live(&mut ledger, handle, "flush");
        Ok(())
    }

    fn save_state(&self, handle: &BridgeHandle) -> BridgeResult<Option<SavedState>> {
        let mut ledger = self.ledger.lock().unwrap();
        Self::check_live(&mut ledger, handle, "save_state");
        Ok(None)
    }

    fn destroy(&self, handle: BridgeHandle) -> BridgeResult<()> {
        let mut ledger = self.ledger.lock().unwrap();
        Self::check_live(&mut ledger, &handle, "destroy");
        ledger.destroys += 1;
        ledger.live = None;
        Ok(())
    }
}

fn sequences(max_len: usize) -> Vec<Vec<Callback>> {
    let mut all = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for callback in CALLBACKS {
                let mut sequence: Vec<Callback> = prefix.clone();
                sequence.push(callback);
                next.push(sequence);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

fn run(sequence: &[Callback]) -> (Arc<StrictBridge>, BridgeLifecycleCoordinator) {
    let bridge = Arc::new(StrictBridge::default());
    let mut coordinator = BridgeLifecycleCoordinator::new(
        Arc::clone(&bridge) as Arc<dyn HostedContentBridge>,
        Arc::new(SystemClock),
        Duration::from_millis(50),
    );

    for callback in sequence {
        match callback {
            Callback::Create => {
                coordinator.on_create(None, true).unwrap();
            }
            Callback::Resume => {
                coordinator.on_resume();
            }
            Callback::Pause => {
                coordinator.on_pause();
            }
            Callback::ConfigurationChanged => {
                coordinator.on_configuration_changed(&Configuration::default());
            }
            Callback::Destroy => {
                coordinator.on_destroy();
            }
        }
    }

    (bridge, coordinator)
}

#[test]
fn test_no_bridge_call_without_live_handle() {
    for sequence in sequences(5) {
        let (bridge, _) = run(&sequence);
        let ledger = bridge.ledger.lock().unwrap();
        assert!(
            ledger.violations.is_empty(),
            "{:?}: {:?}",
            sequence,
            ledger.violations
        );
    }
}

#[test]
fn test_handle_matches_coordinator_state() {
    for sequence in sequences(5) {
        let (bridge, coordinator) = run(&sequence);
        let ledger = bridge.ledger.lock().unwrap();

        assert_eq!(
            coordinator.has_handle(),
            ledger.live.is_some(),
            "{:?}",
            sequence
        );
        assert!(ledger.destroys <= ledger.inits, "{:?}", sequence);
        assert!(ledger.inits - ledger.destroys <= 1, "{:?}", sequence);
    }
}

#[test]
fn test_resume_and_pause_alternate() {
    for sequence in sequences(5) {
        let (bridge, _) = run(&sequence);
        let ledger = bridge.ledger.lock().unwrap();

        let focus_events: Vec<&LifecycleEvent> = ledger
            .dispatched
            .iter()
            .filter(|event| matches!(event, LifecycleEvent::Resume | LifecycleEvent::Pause))
            .collect();
        for pair in focus_events.windows(2) {
            assert_ne!(pair[0], pair[1], "{:?}", sequence);
        }
    }
}

#[test]
fn test_destroy_always_releases_handle() {
    for sequence in sequences(4) {
        let mut sequence = sequence;
        sequence.push(Callback::Destroy);
        let (bridge, coordinator) = run(&sequence);
        let ledger = bridge.ledger.lock().unwrap();

        assert!(!coordinator.has_handle(), "{:?}", sequence);
        assert_eq!(ledger.live, None, "{:?}", sequence);
        assert_eq!(ledger.inits, ledger.destroys, "{:?}", sequence);
    }
}
