//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the host shell core:
//! - Logging and tracing infrastructure
//! - Shell configuration
//! - Event bus for lifecycle and display diagnostics
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the display controller, the
//! lifecycle coordinator and the shell façade depend on. It establishes the
//! logging conventions and the event broadcasting used throughout the system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
