//! # Bridge Lifecycle
//!
//! Maps native lifecycle callbacks onto the hosted-content bridge.
//!
//! ## Overview
//!
//! [`BridgeLifecycleCoordinator`] owns the single [`BridgeHandle`] of an
//! activity. It initializes the bridge on create, forwards resume, pause and
//! configuration changes while the handle exists, flushes hosted content on
//! pause and tears the bridge down on destroy.
//!
//! ## State Machine
//!
//! ```text
//!            on_create              on_resume
//!  (none) ─────────────> Created ─────────────> Resumed
//!     │                    │   ┌── on_resume ──┘  │
//!     │                    │   │                  │ on_pause
//!     │                    │   │                  v
//!     │                    │   └────────────── Paused
//!     │    on_destroy      v      on_destroy      │
//!     └──────────────> Destroyed <────────────────┘
//! ```
//!
//! Every callback is total: a callback that is undefined for the current
//! state is logged as a protocol violation and ignored. Only a failed bridge
//! initialization is reported as an error.
//!
//! [`BridgeHandle`]: bridge_traits::BridgeHandle

pub mod coordinator;
pub mod error;

pub use coordinator::{BridgeLifecycleCoordinator, TransitionOutcome};
pub use error::{LifecycleError, ProtocolViolation, Result};
