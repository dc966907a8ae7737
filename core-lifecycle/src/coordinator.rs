//! # Bridge Lifecycle Coordinator
//!
//! Owns the bridge handle and the native lifecycle state of one activity.
//!
//! The handle exists exactly between a successful `on_create` and the
//! matching `on_destroy`. Forwarding to hosted content requires a borrowed
//! handle, so nothing can be dispatched outside that window.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{
    BridgeContext, BridgeHandle, Clock, Configuration, HostedContentBridge, LifecycleEvent,
    LifecycleState, SavedState,
};
use core_runtime::events::{DiagnosticEvent, EventBus, ShellEvent, TransitionEvent};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{LifecycleError, ProtocolViolation, Result};

/// Result of a lifecycle callback that was not fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition happened.
    Applied,
    /// The callback was undefined for the current state and changed nothing.
    Ignored(ProtocolViolation),
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied)
    }

    /// Treat an ignored callback as an error, for hosts that want to fail
    /// loudly on out-of-order callbacks.
    pub fn into_result(self) -> Result<()> {
        match self {
            TransitionOutcome::Applied => Ok(()),
            TransitionOutcome::Ignored(violation) => {
                Err(LifecycleError::ProtocolViolation(violation))
            }
        }
    }
}

/// Drives a [`HostedContentBridge`] from native lifecycle callbacks.
pub struct BridgeLifecycleCoordinator {
    bridge: Arc<dyn HostedContentBridge>,
    clock: Arc<dyn Clock>,
    flush_budget: Duration,
    state: Option<LifecycleState>,
    handle: Option<BridgeHandle>,
    activation_id: Option<Uuid>,
    forward_configuration_changes: bool,
    events: Option<EventBus>,
}

impl BridgeLifecycleCoordinator {
    pub fn new(
        bridge: Arc<dyn HostedContentBridge>,
        clock: Arc<dyn Clock>,
        flush_budget: Duration,
    ) -> Self {
        Self {
            bridge,
            clock,
            flush_budget,
            state: None,
            handle: None,
            activation_id: None,
            forward_configuration_changes: true,
            events: None,
        }
    }

    /// Whether configuration changes reach hosted content. When off, a
    /// change during an activation is still accepted but not dispatched.
    pub fn with_configuration_forwarding(mut self, enabled: bool) -> Self {
        self.forward_configuration_changes = enabled;
        self
    }

    /// Publish transition and diagnostic events on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Current lifecycle state; `None` before the first create.
    pub fn state(&self) -> Option<LifecycleState> {
        self.state
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Identifier of the current activation, set on create.
    pub fn activation_id(&self) -> Option<Uuid> {
        self.activation_id
    }

    pub fn flush_budget(&self) -> Duration {
        self.flush_budget
    }

    /// Initializes the bridge, handing it the state persisted by the previous
    /// activation.
    ///
    /// Valid before the first create and after destroy. A create while the
    /// activity is alive is ignored; the existing handle is kept.
    ///
    /// # Errors
    ///
    /// `FatalInitFailure` when the bridge cannot be allocated. The state is
    /// left unchanged and no handle exists.
    #[instrument(skip(self, saved_state), fields(restored = saved_state.is_some()))]
    pub fn on_create(
        &mut self,
        saved_state: Option<SavedState>,
        edge_to_edge: bool,
    ) -> Result<TransitionOutcome> {
        match self.state {
            None | Some(LifecycleState::Destroyed) => {}
            Some(_) => return Ok(self.ignore("on_create")),
        }

        let activation_id = Uuid::new_v4();
        let restored = saved_state.is_some();
        let context = BridgeContext::new(activation_id)
            .with_saved_state(saved_state)
            .with_edge_to_edge(edge_to_edge);

        let handle = match self.bridge.init(context) {
            Ok(handle) => handle,
            Err(err) => {
                error!(error = %err, "Bridge initialization failed");
                self.emit(ShellEvent::Diagnostic(DiagnosticEvent::InitFailed {
                    message: err.to_string(),
                }));
                return Err(LifecycleError::FatalInitFailure(err));
            }
        };

        info!(
            %activation_id,
            session_id = %handle.session_id(),
            restored,
            "Bridge initialized"
        );
        self.emit(ShellEvent::Lifecycle(TransitionEvent::BridgeInitialized {
            activation_id: activation_id.to_string(),
            session_id: handle.session_id().to_string(),
            restored,
        }));

        self.handle = Some(handle);
        self.activation_id = Some(activation_id);
        self.state = Some(LifecycleState::Created);
        Ok(TransitionOutcome::Applied)
    }

    /// Forwards a resume to hosted content.
    ///
    /// Valid from `Created` and `Paused`. A duplicate resume is ignored, so
    /// content never sees two resumes in a row.
    #[instrument(skip(self))]
    pub fn on_resume(&mut self) -> TransitionOutcome {
        if !matches!(
            self.state,
            Some(LifecycleState::Created) | Some(LifecycleState::Paused)
        ) {
            return self.ignore("on_resume");
        }

        self.dispatch(LifecycleEvent::Resume);
        self.state = Some(LifecycleState::Resumed);
        self.emit(ShellEvent::Lifecycle(TransitionEvent::Resumed {
            activation_id: self.activation_label(),
        }));
        TransitionOutcome::Applied
    }

    /// Forwards a pause and flushes pending content within the configured
    /// budget.
    ///
    /// Returns only after the flush has returned. An overrun is reported, not
    /// retried.
    #[instrument(skip(self))]
    pub fn on_pause(&mut self) -> TransitionOutcome {
        if self.state != Some(LifecycleState::Resumed) {
            return self.ignore("on_pause");
        }

        self.pause_and_flush();
        TransitionOutcome::Applied
    }

    /// Forwards a device configuration change while the bridge is alive.
    #[instrument(skip(self, configuration))]
    pub fn on_configuration_changed(&mut self, configuration: &Configuration) -> TransitionOutcome {
        if self.handle.is_none() {
            return self.ignore("on_configuration_changed");
        }

        if !self.forward_configuration_changes {
            debug!("Configuration forwarding disabled; not dispatched");
            return TransitionOutcome::Applied;
        }

        self.dispatch(LifecycleEvent::ConfigurationChanged {
            configuration: *configuration,
        });
        self.emit(ShellEvent::Lifecycle(TransitionEvent::ConfigurationChanged {
            activation_id: self.activation_label(),
        }));
        TransitionOutcome::Applied
    }

    /// Tears the bridge down and returns the state hosted content asked to
    /// persist for the next activation.
    ///
    /// Valid from any state. A destroy that arrives while resumed runs the
    /// pause flush first. A repeated destroy does nothing.
    #[instrument(skip(self))]
    pub fn on_destroy(&mut self) -> Option<SavedState> {
        if self.state == Some(LifecycleState::Destroyed) {
            debug!("Already destroyed; nothing to tear down");
            return None;
        }

        if self.state == Some(LifecycleState::Resumed) {
            warn!("Destroy while resumed; pausing first");
            self.pause_and_flush();
        }

        let had_handle = self.handle.is_some();
        let saved_state = self.handle.take().and_then(|handle| {
            let saved = match self.bridge.save_state(&handle) {
                Ok(saved) => saved,
                Err(err) => {
                    self.report_bridge_failure("save_state", &err);
                    None
                }
            };
            if let Err(err) = self.bridge.destroy(handle) {
                self.report_bridge_failure("destroy", &err);
            }
            saved
        });

        let activation_id = self.activation_id.take();
        self.state = Some(LifecycleState::Destroyed);
        info!(
            had_handle,
            persisted = saved_state.is_some(),
            "Bridge destroyed"
        );
        self.emit(ShellEvent::Lifecycle(TransitionEvent::Destroyed {
            activation_id: activation_id.map(|id| id.to_string()),
            had_handle,
        }));
        saved_state
    }

    fn pause_and_flush(&mut self) {
        self.dispatch(LifecycleEvent::Pause);

        let started = self.clock.now();
        if let Some(handle) = &self.handle {
            if let Err(err) = self.bridge.flush_pending(handle, self.flush_budget) {
                self.report_bridge_failure("flush_pending", &err);
            }
        }
        let elapsed = self.clock.elapsed_since(started);

        self.state = Some(LifecycleState::Paused);

        let flush_ms = millis(elapsed);
        if elapsed > self.flush_budget {
            let budget_ms = millis(self.flush_budget);
            warn!(flush_ms, budget_ms, "Pause flush exceeded its budget");
            self.emit(ShellEvent::Diagnostic(DiagnosticEvent::FlushBudgetExceeded {
                elapsed_ms: flush_ms,
                budget_ms,
            }));
        } else {
            debug!(flush_ms, "Pending content flushed");
        }

        self.emit(ShellEvent::Lifecycle(TransitionEvent::Paused {
            activation_id: self.activation_label(),
            flush_ms,
        }));
    }

    /// Dispatch failures are reported and swallowed: the native transition
    /// has already happened and cannot be refused.
    fn dispatch(&self, event: LifecycleEvent) {
        let Some(handle) = &self.handle else {
            return;
        };
        let name = event.name();
        if let Err(err) = self.bridge.dispatch_lifecycle(handle, event) {
            self.report_bridge_failure(name, &err);
        }
    }

    fn ignore(&self, callback: &'static str) -> TransitionOutcome {
        let violation = ProtocolViolation {
            callback,
            state: self.state,
        };
        warn!(%violation, "Ignoring out-of-order lifecycle callback");
        self.emit(ShellEvent::Diagnostic(DiagnosticEvent::ProtocolViolation {
            callback: callback.to_string(),
            state: self.state.map(|state| state.to_string()),
        }));
        TransitionOutcome::Ignored(violation)
    }

    fn report_bridge_failure(&self, operation: &str, err: &bridge_traits::BridgeError) {
        error!(operation, error = %err, "Bridge call failed");
        self.emit(ShellEvent::Diagnostic(DiagnosticEvent::BridgeCallFailed {
            operation: operation.to_string(),
            message: err.to_string(),
        }));
    }

    fn activation_label(&self) -> String {
        self.activation_id
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    fn emit(&self, event: ShellEvent) {
        if let Some(bus) = &self.events {
            bus.emit(event).ok();
        }
    }
}

impl std::fmt::Debug for BridgeLifecycleCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeLifecycleCoordinator")
            .field("state", &self.state)
            .field("has_handle", &self.handle.is_some())
            .field("activation_id", &self.activation_id)
            .field("flush_budget", &self.flush_budget)
            .field(
                "forward_configuration_changes",
                &self.forward_configuration_changes,
            )
            .finish()
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
