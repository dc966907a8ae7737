//! Host activity shell façade and bootstrap helpers.
//!
//! This crate composes the display mode controller and the bridge lifecycle
//! coordinator behind one type the native activity forwards its callbacks
//! to. Host-provided capabilities (hosted content bridge, window surface,
//! clock) arrive through a [`ShellConfig`]. Desktop hosts and tests typically
//! enable the `desktop-shims` feature, which supplies in-memory adapters from
//! `bridge-desktop`.
//!
//! ## Ordering
//!
//! - create: display mode first, then bridge init. Some platforms snapshot
//!   window flags when the base activity attaches, so the mode must be in
//!   place before content exists.
//! - configuration change: display refresh first, then forward.
//! - destroy: bridge teardown first, then (optionally) display revert.

pub mod error;

pub use core_lifecycle::TransitionOutcome;
pub use core_runtime::config::{FeatureFlags, ShellConfig, ShellConfigBuilder};
pub use error::{Result, ShellError};

use std::sync::Arc;

use bridge_traits::{Configuration, LifecycleState, SavedState, WindowSurface};
use core_display::DisplayModeController;
use core_lifecycle::BridgeLifecycleCoordinator;
use core_runtime::events::{EventBus, EventStream};
use tracing::info;

/// Primary façade exposed to the native activity.
pub struct HostActivityShell {
    window: Arc<dyn WindowSurface>,
    display: DisplayModeController,
    lifecycle: BridgeLifecycleCoordinator,
    events: EventBus,
    features: FeatureFlags,
}

impl HostActivityShell {
    /// Create a shell from a validated configuration.
    ///
    /// # Errors
    ///
    /// `Config` when the configuration fails validation. `ShellConfig`'s
    /// fields are public, so a config built by hand is checked again here.
    pub fn new(config: ShellConfig) -> Result<Self> {
        config.validate()?;

        let events = EventBus::new(config.event_buffer_size);
        let display = DisplayModeController::new(config.display_mode)
            .with_night_mode(config.night_mode)
            .with_event_bus(events.clone());
        let lifecycle = BridgeLifecycleCoordinator::new(
            config.content_bridge,
            config.clock,
            config.pause_flush_budget,
        )
        .with_configuration_forwarding(config.features.forward_configuration_changes)
        .with_event_bus(events.clone());

        info!(
            edge_to_edge = config.display_mode.edge_to_edge,
            night_mode = ?config.night_mode,
            api_level = config.window_surface.platform_version().api_level(),
            "Host activity shell ready"
        );

        Ok(Self {
            window: config.window_surface,
            display,
            lifecycle,
            events,
            features: config.features,
        })
    }

    /// Subscribe to lifecycle, display and diagnostic events.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    /// Current lifecycle state; `None` before the first create.
    pub fn state(&self) -> Option<LifecycleState> {
        self.lifecycle.state()
    }

    /// Whether the display mode is currently in effect.
    pub fn display_applied(&self) -> bool {
        self.display.is_applied()
    }

    pub fn display(&self) -> &DisplayModeController {
        &self.display
    }

    pub fn lifecycle(&self) -> &BridgeLifecycleCoordinator {
        &self.lifecycle
    }

    /// Applies the display mode, then initializes hosted content.
    ///
    /// # Errors
    ///
    /// A fatal error when the bridge cannot be allocated. The host must let
    /// the process crash; see [`ShellError::is_fatal`].
    pub fn on_create(&mut self, saved_state: Option<SavedState>) -> Result<TransitionOutcome> {
        self.display.apply(self.window.as_ref());
        let outcome = self
            .lifecycle
            .on_create(saved_state, self.display.is_applied())?;
        Ok(outcome)
    }

    pub fn on_resume(&mut self) -> TransitionOutcome {
        self.lifecycle.on_resume()
    }

    pub fn on_pause(&mut self) -> TransitionOutcome {
        self.lifecycle.on_pause()
    }

    /// Refreshes the display mode for `configuration`, then hands it to the
    /// coordinator, which forwards it to hosted content unless forwarding is
    /// disabled.
    ///
    /// The outcome reflects the lifecycle state only: a change without a
    /// live bridge is `Ignored` whether or not forwarding is enabled.
    pub fn on_configuration_changed(&mut self, configuration: &Configuration) -> TransitionOutcome {
        self.display
            .on_configuration_changed(self.window.as_ref(), configuration);
        self.lifecycle.on_configuration_changed(configuration)
    }

    /// Tears down hosted content and returns the state it asked to persist.
    pub fn on_destroy(&mut self) -> Option<SavedState> {
        let saved_state = self.lifecycle.on_destroy();
        if self.features.revert_display_on_destroy {
            self.display.revert(self.window.as_ref());
        }
        saved_state
    }
}

impl std::fmt::Debug for HostActivityShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostActivityShell")
            .field("display", &self.display)
            .field("lifecycle", &self.lifecycle)
            .field("features", &self.features)
            .finish()
    }
}

/// Convenience bootstrapper for desktop hosts without a content runtime.
///
/// Uses an in-memory content bridge and a headless window surface.
///
/// ```
/// # #[cfg(feature = "desktop-shims")]
/// # fn example() -> core_service::Result<()> {
/// let mut shell = core_service::bootstrap_desktop()?;
/// shell.on_create(None)?;
/// shell.on_resume();
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop() -> Result<HostActivityShell> {
    let config = ShellConfig::builder()
        .content_bridge(Arc::new(bridge_desktop::InMemoryContentBridge::new()))
        .build()?;
    HostActivityShell::new(config)
}
