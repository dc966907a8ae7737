//! # Event Bus System
//!
//! Publishes what the host shell does (lifecycle transitions, display mode
//! changes and absorbed errors) over `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! Lifecycle callbacks are synchronous and must never fail because of an
//! observer, so the shell only ever calls [`EventBus::emit`] and ignores the
//! result. Observers (host diagnostics, crash reporters, test harnesses)
//! subscribe and drain events with [`EventStream::try_recv`] or, inside an
//! async host, with [`EventStream::recv`]. Neither sending nor `try_recv`
//! needs a running Tokio runtime.
//!
//! ```text
//! ┌──────────────────┐   emit    ┌───────────┐   subscribe   ┌────────────┐
//! │ LifecycleCoord.  ├──────────>│           ├──────────────>│ Crash rep. │
//! └──────────────────┘           │ EventBus  │               └────────────┘
//! ┌──────────────────┐   emit    │ (broadcast│   subscribe   ┌────────────┐
//! │ DisplayModeCtrl  ├──────────>│  channel) ├──────────────>│ Test hook  │
//! └──────────────────┘           └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, ShellEvent, DisplayEvent};
//!
//! let bus = EventBus::new(16);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(ShellEvent::Display(DisplayEvent::Reverted { api_level: 34 })).ok();
//! assert!(stream.try_recv().is_ok());
//! ```
//!
//! ## Error Handling
//!
//! - **`Lagged(n)`**: the subscriber missed `n` events. Non-fatal.
//! - **`Closed`**: all senders were dropped; the shell is gone.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// A full activation emits a handful of events; the buffer only needs to
/// absorb bursts from rapid configuration changes.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

// ============================================================================
// Shell Event Types
// ============================================================================

/// Top-level event enum published by the host shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum ShellEvent {
    /// Lifecycle transitions applied by the coordinator
    Lifecycle(TransitionEvent),
    /// Display mode changes
    Display(DisplayEvent),
    /// Errors absorbed locally instead of reaching the OS
    Diagnostic(DiagnosticEvent),
}

impl ShellEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            ShellEvent::Lifecycle(e) => e.description(),
            ShellEvent::Display(e) => e.description(),
            ShellEvent::Diagnostic(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            ShellEvent::Diagnostic(DiagnosticEvent::InitFailed { .. }) => EventSeverity::Error,
            ShellEvent::Diagnostic(DiagnosticEvent::BridgeCallFailed { .. }) => {
                EventSeverity::Error
            }
            ShellEvent::Diagnostic(_) => EventSeverity::Warning,
            ShellEvent::Display(DisplayEvent::Unsupported { .. }) => EventSeverity::Warning,
            ShellEvent::Lifecycle(TransitionEvent::BridgeInitialized { .. }) => {
                EventSeverity::Info
            }
            ShellEvent::Lifecycle(TransitionEvent::Destroyed { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Lifecycle Events
// ============================================================================

/// Transitions applied by the lifecycle coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum TransitionEvent {
    /// Bridge allocated; the activity is Created.
    BridgeInitialized {
        activation_id: String,
        session_id: String,
        /// Whether a persisted-state blob was handed to hosted content
        restored: bool,
    },
    /// Resume forwarded to hosted content.
    Resumed { activation_id: String },
    /// Pause forwarded and pending state flushed.
    Paused {
        activation_id: String,
        /// Wall time spent in the flush, in milliseconds
        flush_ms: u64,
    },
    /// Configuration change forwarded to hosted content.
    ConfigurationChanged { activation_id: String },
    /// Activity destroyed.
    Destroyed {
        activation_id: Option<String>,
        /// Whether a bridge handle was torn down
        had_handle: bool,
    },
}

impl TransitionEvent {
    fn description(&self) -> &str {
        match self {
            TransitionEvent::BridgeInitialized { .. } => "Bridge initialized",
            TransitionEvent::Resumed { .. } => "Hosted content resumed",
            TransitionEvent::Paused { .. } => "Hosted content paused",
            TransitionEvent::ConfigurationChanged { .. } => "Configuration change forwarded",
            TransitionEvent::Destroyed { .. } => "Activity destroyed",
        }
    }
}

// ============================================================================
// Display Events
// ============================================================================

/// Display mode changes made by the display controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum DisplayEvent {
    /// Edge-to-edge applied; `changed` is false when the window already matched.
    Applied { api_level: u32, changed: bool },
    /// Prior window state restored.
    Reverted { api_level: u32 },
    /// Platform could not honour the display mode; prior behaviour kept.
    Unsupported { api_level: u32, reason: String },
}

impl DisplayEvent {
    fn description(&self) -> &str {
        match self {
            DisplayEvent::Applied { .. } => "Display mode applied",
            DisplayEvent::Reverted { .. } => "Display mode reverted",
            DisplayEvent::Unsupported { .. } => "Display mode unsupported",
        }
    }
}

// ============================================================================
// Diagnostic Events
// ============================================================================

/// Errors absorbed by the shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum DiagnosticEvent {
    /// Out-of-order lifecycle callback ignored.
    ProtocolViolation {
        callback: String,
        /// State at the time of the callback; `None` before the first create
        state: Option<String>,
    },
    /// Pause flush took longer than the configured budget.
    FlushBudgetExceeded { elapsed_ms: u64, budget_ms: u64 },
    /// A bridge call failed after initialization.
    BridgeCallFailed { operation: String, message: String },
    /// Bridge could not be initialized; the process is about to crash.
    InitFailed { message: String },
}

impl DiagnosticEvent {
    fn description(&self) -> &str {
        match self {
            DiagnosticEvent::ProtocolViolation { .. } => "Lifecycle protocol violation ignored",
            DiagnosticEvent::FlushBudgetExceeded { .. } => "Pause flush exceeded its budget",
            DiagnosticEvent::BridgeCallFailed { .. } => "Bridge call failed",
            DiagnosticEvent::InitFailed { .. } => "Bridge initialization failed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to shell events.
///
/// Cloning the bus yields another sender on the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ShellEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; `ShellConfig` validation rejects that
    /// value before a bus is built.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error when there are none. The shell ignores that error.
    pub fn emit(&self, event: ShellEvent) -> Result<usize, SendError<ShellEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber that receives events emitted from now on.
    pub fn subscribe(&self) -> Receiver<ShellEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

type EventFilter = Box<dyn Fn(&ShellEvent) -> bool + Send + Sync>;

/// Subscriber wrapper with optional filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, ShellEvent};
///
/// let bus = EventBus::new(16);
/// let diagnostics = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, ShellEvent::Diagnostic(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<ShellEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<ShellEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ShellEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn matches(&self, event: &ShellEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next matching event.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<ShellEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching events are currently queued.
    pub fn try_recv(&mut self) -> Option<Result<ShellEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every queued matching event.
    pub fn drain(&mut self) -> Vec<ShellEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn resumed(id: &str) -> ShellEvent {
        ShellEvent::Lifecycle(TransitionEvent::Resumed {
            activation_id: id.to_string(),
        })
    }

    #[test]
    fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(resumed("a")).is_err());
    }

    #[test]
    fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        assert_eq!(bus.emit(resumed("a")).unwrap(), 2);

        assert_eq!(sub1.try_recv().unwrap(), resumed("a"));
        assert_eq!(sub2.try_recv().unwrap(), resumed("a"));
    }

    #[test]
    fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, ShellEvent::Diagnostic(_)));

        bus.emit(resumed("a")).ok();
        let violation = ShellEvent::Diagnostic(DiagnosticEvent::ProtocolViolation {
            callback: "on_resume".to_string(),
            state: Some("resumed".to_string()),
        });
        bus.emit(violation.clone()).ok();

        assert_eq!(stream.try_recv().unwrap().unwrap(), violation);
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut stream = EventStream::new(bus.subscribe());

        for i in 0..5 {
            bus.emit(resumed(&i.to_string())).ok();
        }

        assert!(matches!(stream.try_recv(), Some(Err(RecvError::Lagged(_)))));
        assert_eq!(stream.drain().len(), 2);
    }

    #[test]
    fn test_event_severity() {
        let init_failed = ShellEvent::Diagnostic(DiagnosticEvent::InitFailed {
            message: "oom".to_string(),
        });
        assert_eq!(init_failed.severity(), EventSeverity::Error);

        let budget = ShellEvent::Diagnostic(DiagnosticEvent::FlushBudgetExceeded {
            elapsed_ms: 400,
            budget_ms: 250,
        });
        assert_eq!(budget.severity(), EventSeverity::Warning);

        let unsupported = ShellEvent::Display(DisplayEvent::Unsupported {
            api_level: 19,
            reason: "too old".to_string(),
        });
        assert_eq!(unsupported.severity(), EventSeverity::Warning);
        assert_eq!(resumed("a").severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        assert_eq!(resumed("a").description(), "Hosted content resumed");
        let applied = ShellEvent::Display(DisplayEvent::Applied {
            api_level: 35,
            changed: true,
        });
        assert_eq!(applied.description(), "Display mode applied");
    }

    #[test]
    fn test_event_serialization() {
        let event = ShellEvent::Lifecycle(TransitionEvent::Paused {
            activation_id: "act-1".to_string(),
            flush_ms: 12,
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Lifecycle\""));
        assert!(json.contains("\"event\":\"Paused\""));

        let back: ShellEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
