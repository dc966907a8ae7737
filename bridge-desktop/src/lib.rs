//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts and tests.
//!
//! ## Overview
//!
//! Desktop builds have no activity window and usually no content runtime, so
//! this crate ships headless adapters:
//! - `WindowSurface` as an in-memory decoration state (`HeadlessWindowSurface`)
//! - `HostedContentBridge` as a recording in-memory bridge (`InMemoryContentBridge`)
//!
//! Both are also what the workspace's integration tests drive the shell with.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{HeadlessWindowSurface, InMemoryContentBridge};
//! use bridge_traits::PlatformVersion;
//! use std::sync::Arc;
//!
//! let window = Arc::new(HeadlessWindowSurface::new(PlatformVersion(34)));
//! let bridge = Arc::new(InMemoryContentBridge::new());
//! // Pass both to ShellConfig::builder()
//! ```

mod content;
mod window;

pub use content::{BridgeCall, InMemoryContentBridge};
pub use window::HeadlessWindowSurface;
