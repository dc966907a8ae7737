//! Workspace entry crate.
//!
//! Exposes feature flags that map to the individual workspace crates
//! (`core-service`, `core-display`, `core-lifecycle`). Host applications can
//! depend on `host-shell-workspace` and enable the documented features without
//! wiring each crate individually.
//!
//! - `shell`: the `HostActivityShell` façade without desktop adapters, for
//!   Android hosts that inject their own bridge and window.
//! - `desktop-shims` (default): `shell` plus the in-memory adapters and
//!   `bootstrap_desktop`.

#[cfg(feature = "shell")]
pub use core_service::{HostActivityShell, ShellConfig, ShellError};

#[cfg(feature = "desktop-shims")]
pub use core_service::bootstrap_desktop;

#[cfg(feature = "display")]
pub use core_display::DisplayModeController;

#[cfg(feature = "lifecycle")]
pub use core_lifecycle::BridgeLifecycleCoordinator;
