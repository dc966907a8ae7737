//! # Shell Configuration Module
//!
//! Provides configuration management for the host shell core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ShellConfig` that holds every host capability and tunable the shell
//! needs. It validates fail-fast so that a misconfigured host crashes at
//! startup with an actionable message instead of misbehaving during a
//! lifecycle callback.
//!
//! ## Required Dependencies
//!
//! - `HostedContentBridge` - the runtime that hosts the app content
//! - `WindowSurface` - the host window (desktop default: `HeadlessWindowSurface`)
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `Clock` - time source for flush budgets (default: `SystemClock`)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ShellConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = ShellConfig::builder()
//!     .content_bridge(Arc::new(MyWebViewBridge::new()))
//!     .window_surface(Arc::new(MyActivityWindow::new()))
//!     .pause_flush_budget(Duration::from_millis(150))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! A missing capability is reported as `Error::CapabilityMissing`; an out of
//! range tunable as `Error::InvalidValue`.

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{
    Clock, DisplayModeSetting, HostedContentBridge, NightMode, SystemClock, WindowSurface,
};
use std::sync::Arc;
use std::time::Duration;

/// Default time hosted content gets to flush its state on pause.
pub const DEFAULT_PAUSE_FLUSH_BUDGET: Duration = Duration::from_millis(250);

/// Upper bound for the pause flush budget. The OS watchdog kills processes
/// that hold the main thread much longer than this.
pub const MAX_PAUSE_FLUSH_BUDGET: Duration = Duration::from_secs(5);

/// Upper bound for the event bus buffer.
pub const MAX_EVENT_BUFFER_SIZE: usize = 4096;

/// Configuration for the host shell.
///
/// Use [`ShellConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ShellConfig {
    /// Hosted content runtime (required)
    pub content_bridge: Arc<dyn HostedContentBridge>,

    /// Host window whose decorations the display controller manages
    pub window_surface: Arc<dyn WindowSurface>,

    /// Time source used to measure pause flushes
    pub clock: Arc<dyn Clock>,

    /// Display mode applied on create
    pub display_mode: DisplayModeSetting,

    /// UI night mode of the device at create. Later changes arrive through
    /// configuration changes.
    pub night_mode: NightMode,

    /// Time hosted content gets to flush pending state on pause
    pub pause_flush_budget: Duration,

    /// Capacity of the shell event bus
    pub event_buffer_size: usize,

    /// Feature flags
    pub features: FeatureFlags,
}

impl std::fmt::Debug for ShellConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellConfig")
            .field("content_bridge", &"HostedContentBridge { ... }")
            .field(
                "window_surface",
                &format_args!(
                    "WindowSurface {{ {} }}",
                    self.window_surface.platform_version()
                ),
            )
            .field("clock", &"Clock { ... }")
            .field("display_mode", &self.display_mode)
            .field("night_mode", &self.night_mode)
            .field("pause_flush_budget", &self.pause_flush_budget)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("features", &self.features)
            .finish()
    }
}

/// Feature flags control optional shell behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Forward configuration changes to hosted content (default: on). The
    /// display mode is refreshed either way.
    pub forward_configuration_changes: bool,

    /// Restore the pre-shell window decorations after the bridge is
    /// destroyed (default: off; the window usually dies with the activity)
    pub revert_display_on_destroy: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            forward_configuration_changes: true,
            revert_display_on_destroy: false,
        }
    }
}

impl ShellConfig {
    /// Creates a new builder for constructing a `ShellConfig`.
    pub fn builder() -> ShellConfigBuilder {
        ShellConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Pause flush budget is non-zero and at most [`MAX_PAUSE_FLUSH_BUDGET`]
    /// - Event buffer size is non-zero and at most [`MAX_EVENT_BUFFER_SIZE`]
    pub fn validate(&self) -> Result<()> {
        if self.pause_flush_budget.is_zero() {
            return Err(Error::InvalidValue {
                field: "pause_flush_budget",
                reason: "must be greater than zero; hosted content needs time to flush"
                    .to_string(),
            });
        }

        if self.pause_flush_budget > MAX_PAUSE_FLUSH_BUDGET {
            return Err(Error::InvalidValue {
                field: "pause_flush_budget",
                reason: format!(
                    "{:?} exceeds the maximum of {:?}",
                    self.pause_flush_budget, MAX_PAUSE_FLUSH_BUDGET
                ),
            });
        }

        if self.event_buffer_size == 0 {
            return Err(Error::InvalidValue {
                field: "event_buffer_size",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::InvalidValue {
                field: "event_buffer_size",
                reason: format!(
                    "{} exceeds the maximum of {}",
                    self.event_buffer_size, MAX_EVENT_BUFFER_SIZE
                ),
            });
        }

        Ok(())
    }
}

fn content_bridge_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HostedContentBridge".to_string(),
        message: "A hosted content bridge is required to boot the app content. \
                 Android: inject the runtime's bridge adapter. \
                 Desktop/tests: use bridge_desktop::InMemoryContentBridge."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_window_surface() -> Result<Arc<dyn WindowSurface>> {
    Ok(Arc::new(bridge_desktop::HeadlessWindowSurface::default()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_window_surface() -> Result<Arc<dyn WindowSurface>> {
    Err(Error::CapabilityMissing {
        capability: "WindowSurface".to_string(),
        message: "A window surface is required to configure the display mode. \
                 Desktop: enable the 'desktop-shims' feature to use HeadlessWindowSurface. \
                 Android: inject an adapter over the activity window."
            .to_string(),
    })
}

/// Builder for [`ShellConfig`].
#[derive(Default)]
pub struct ShellConfigBuilder {
    content_bridge: Option<Arc<dyn HostedContentBridge>>,
    window_surface: Option<Arc<dyn WindowSurface>>,
    clock: Option<Arc<dyn Clock>>,
    display_mode: Option<DisplayModeSetting>,
    night_mode: NightMode,
    pause_flush_budget: Option<Duration>,
    event_buffer_size: Option<usize>,
    features: FeatureFlags,
}

impl ShellConfigBuilder {
    /// Sets the hosted content bridge (required).
    pub fn content_bridge(mut self, bridge: Arc<dyn HostedContentBridge>) -> Self {
        self.content_bridge = Some(bridge);
        self
    }

    /// Sets the window surface.
    ///
    /// If not provided, `HeadlessWindowSurface` is used when the
    /// `desktop-shims` feature is enabled.
    pub fn window_surface(mut self, surface: Arc<dyn WindowSurface>) -> Self {
        self.window_surface = Some(surface);
        self
    }

    /// Sets the time source. Default: [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the display mode applied on create. Default: edge-to-edge.
    pub fn display_mode(mut self, setting: DisplayModeSetting) -> Self {
        self.display_mode = Some(setting);
        self
    }

    /// Shorthand for `display_mode(DisplayModeSetting { edge_to_edge })`.
    pub fn edge_to_edge(self, enabled: bool) -> Self {
        self.display_mode(DisplayModeSetting {
            edge_to_edge: enabled,
        })
    }

    /// Sets the device's night mode at create. Default: light.
    pub fn night_mode(mut self, night_mode: NightMode) -> Self {
        self.night_mode = night_mode;
        self
    }

    /// Sets the pause flush budget. Default: [`DEFAULT_PAUSE_FLUSH_BUDGET`].
    pub fn pause_flush_budget(mut self, budget: Duration) -> Self {
        self.pause_flush_budget = Some(budget);
        self
    }

    /// Sets the event bus capacity. Default: [`DEFAULT_EVENT_BUFFER_SIZE`].
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Enables or disables forwarding of configuration changes.
    pub fn forward_configuration_changes(mut self, enabled: bool) -> Self {
        self.features.forward_configuration_changes = enabled;
        self
    }

    /// Enables or disables restoring window decorations on destroy.
    pub fn revert_display_on_destroy(mut self, enabled: bool) -> Self {
        self.features.revert_display_on_destroy = enabled;
        self
    }

    /// Replaces all feature flags at once.
    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds the final `ShellConfig` instance.
    ///
    /// # Errors
    ///
    /// - `CapabilityMissing` when no content bridge is set, or no window
    ///   surface is set and `desktop-shims` is disabled
    /// - `InvalidValue` when a tunable is out of range
    pub fn build(self) -> Result<ShellConfig> {
        let content_bridge = self
            .content_bridge
            .ok_or_else(content_bridge_missing_error)?;

        let window_surface = match self.window_surface {
            Some(surface) => surface,
            None => provide_default_window_surface()?,
        };

        let config = ShellConfig {
            content_bridge,
            window_surface,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            display_mode: self.display_mode.unwrap_or_default(),
            night_mode: self.night_mode,
            pause_flush_budget: self
                .pause_flush_budget
                .unwrap_or(DEFAULT_PAUSE_FLUSH_BUDGET),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}
