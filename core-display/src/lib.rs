//! # Display Mode
//!
//! Applies and reverts edge-to-edge rendering on the host window.
//!
//! ## Overview
//!
//! [`DisplayModeController`] turns a [`DisplayModeSetting`] into a concrete
//! [`WindowState`](bridge_traits::WindowState) for the platform version the
//! window reports (see [`strategy`]) and writes it through the
//! [`WindowSurface`](bridge_traits::WindowSurface) bridge.
//!
//! Display mode is a best-effort feature: platform versions that cannot draw
//! behind the system bars, or surfaces that reject the write, keep their
//! previous look. Nothing here returns an error to the caller.

pub mod controller;
pub mod error;
pub mod strategy;

pub use bridge_traits::DisplayModeSetting;
pub use controller::DisplayModeController;
pub use error::{DisplayError, Result};
