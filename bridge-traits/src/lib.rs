//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the host shell core and the
//! platform-specific pieces around it. Each trait represents a capability that
//! the core requires but that must be implemented differently per platform
//! (Android, iOS, desktop).
//!
//! ## Traits
//!
//! ### Hosted Content
//! - [`HostedContentBridge`](lifecycle::HostedContentBridge) - Boot, drive, flush and tear down hosted content
//!
//! ### Window
//! - [`WindowSurface`](window::WindowSurface) - Read and write window decoration state
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Headless |
//! | Android  | TBD                 | 📋 Planned |
//! | iOS      | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Report allocation failures during `init` as `ResourceExhausted`
//! - Include error context (API level, handle ids)
//!
//! ## Threading
//!
//! Lifecycle callbacks arrive on the main thread and every trait method is
//! synchronous. The `Send + Sync` bounds only allow adapters to be shared
//! behind `Arc`.

pub mod error;
pub mod lifecycle;
pub mod time;
pub mod window;

pub use error::BridgeError;

// Re-export commonly used types
pub use lifecycle::{
    BridgeContext, BridgeHandle, Configuration, HostedContentBridge, LifecycleEvent,
    LifecycleState, NightMode, Orientation, SavedState,
};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, SystemClock};
pub use window::{
    BarStyle, CutoutMode, DisplayModeSetting, PlatformVersion, WindowState, WindowSurface,
};
