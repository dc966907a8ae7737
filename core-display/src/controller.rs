//! # Display Mode Controller
//!
//! Owns the [`DisplayModeSetting`] for an activity and applies it to the host
//! window.
//!
//! ## Contract
//!
//! - `apply` is idempotent: it only writes when the window differs from the
//!   computed target, so a second call performs no write at all.
//! - `apply` never fails. Unsupported platform versions and surface errors
//!   are logged, published as [`DisplayEvent::Unsupported`] and otherwise
//!   ignored; the window keeps its previous look.
//! - The first successful `apply` snapshots the prior window state so that
//!   `revert` can restore it.
//!
//! `apply` may run before the window is attached to a display. Ordering
//! relative to the lifecycle is the caller's job.

use bridge_traits::{Configuration, DisplayModeSetting, NightMode, WindowState, WindowSurface};
use core_runtime::events::{DisplayEvent, EventBus, ShellEvent};
use tracing::{debug, info, warn};

use crate::error::DisplayError;
use crate::strategy::edge_to_edge_state;

/// Applies and reverts a display mode on a [`WindowSurface`].
#[derive(Debug)]
pub struct DisplayModeController {
    setting: DisplayModeSetting,
    night_mode: NightMode,
    prior: Option<WindowState>,
    applied: bool,
    events: Option<EventBus>,
}

impl DisplayModeController {
    pub fn new(setting: DisplayModeSetting) -> Self {
        Self {
            setting,
            night_mode: NightMode::default(),
            prior: None,
            applied: false,
            events: None,
        }
    }

    /// Publish display events on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Night mode used for bar icon contrast until the first configuration
    /// change arrives.
    pub fn with_night_mode(mut self, night_mode: NightMode) -> Self {
        self.night_mode = night_mode;
        self
    }

    pub fn setting(&self) -> DisplayModeSetting {
        self.setting
    }

    /// Whether the display mode is currently in effect on the window.
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Applies the configured display mode to `window`.
    pub fn apply(&mut self, window: &dyn WindowSurface) {
        if !self.setting.edge_to_edge {
            debug!("Edge-to-edge disabled; leaving window decorations alone");
            return;
        }

        let api_level = window.platform_version().api_level();
        match self.try_apply(window) {
            Ok(changed) => {
                self.applied = true;
                if changed {
                    info!(api_level, "Edge-to-edge applied");
                } else {
                    debug!(api_level, "Edge-to-edge already in effect");
                }
                self.emit(DisplayEvent::Applied { api_level, changed });
            }
            Err(err) => self.degrade(err),
        }
    }

    /// Restores the window state captured by the first successful `apply`.
    ///
    /// Does nothing if the display mode was never applied.
    pub fn revert(&mut self, window: &dyn WindowSurface) {
        let Some(prior) = self.prior else {
            debug!("Nothing to revert; display mode was never applied");
            return;
        };

        let api_level = window.platform_version().api_level();
        let restored = read_state(window).and_then(|current| {
            if current != prior {
                write_state(window, &prior)?;
            }
            Ok(())
        });
        match restored {
            Ok(()) => {
                self.prior = None;
                self.applied = false;
                info!(api_level, "Display mode reverted");
                self.emit(DisplayEvent::Reverted { api_level });
            }
            Err(err) => self.degrade(err),
        }
    }

    /// Re-applies the display mode for a new device configuration.
    ///
    /// Only the night mode affects the computed state; bar icons follow it.
    pub fn on_configuration_changed(
        &mut self,
        window: &dyn WindowSurface,
        configuration: &Configuration,
    ) {
        let night_mode_changed = self.night_mode != configuration.night_mode;
        self.night_mode = configuration.night_mode;

        if self.applied && night_mode_changed {
            debug!(night_mode = ?self.night_mode, "Refreshing bar icons for night mode");
            self.apply(window);
        }
    }

    /// Returns whether a write happened.
    fn try_apply(&mut self, window: &dyn WindowSurface) -> Result<bool, DisplayError> {
        let current = read_state(window)?;
        let target = edge_to_edge_state(window.platform_version(), self.night_mode, &current)?;

        let changed = current != target;
        if changed {
            write_state(window, &target)?;
        }

        if self.prior.is_none() {
            self.prior = Some(current);
        }
        Ok(changed)
    }

    fn degrade(&self, err: DisplayError) {
        let DisplayError::UnsupportedPlatformFeature { api_level, reason } = err;
        warn!(api_level, %reason, "Display mode unavailable; keeping previous window behaviour");
        self.emit(DisplayEvent::Unsupported { api_level, reason });
    }

    fn emit(&self, event: DisplayEvent) {
        if let Some(bus) = &self.events {
            bus.emit(ShellEvent::Display(event)).ok();
        }
    }
}

fn read_state(window: &dyn WindowSurface) -> Result<WindowState, DisplayError> {
    window
        .window_state()
        .map_err(|err| DisplayError::UnsupportedPlatformFeature {
            api_level: window.platform_version().api_level(),
            reason: format!("window state unreadable: {}", err),
        })
}

fn write_state(window: &dyn WindowSurface, state: &WindowState) -> Result<(), DisplayError> {
    window
        .apply_window_state(state)
        .map_err(|err| DisplayError::UnsupportedPlatformFeature {
            api_level: window.platform_version().api_level(),
            reason: format!("window rejected decoration change: {}", err),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::HeadlessWindowSurface;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::{CutoutMode, PlatformVersion};
    use core_runtime::events::EventStream;
    use mockall::mock;

    mock! {
        Window {}

        impl WindowSurface for Window {
            fn platform_version(&self) -> PlatformVersion;
            fn window_state(&self) -> BridgeResult<WindowState>;
            fn apply_window_state(&self, state: &WindowState) -> BridgeResult<()>;
        }
    }

    fn edge_to_edge() -> DisplayModeController {
        DisplayModeController::new(DisplayModeSetting::EDGE_TO_EDGE)
    }

    #[test]
    fn test_apply_writes_edge_to_edge_state() {
        let window = HeadlessWindowSurface::new(PlatformVersion(34));
        let mut controller = edge_to_edge();

        controller.apply(&window);

        let state = window.snapshot();
        assert!(!state.decor_fits_system_windows);
        assert_eq!(state.cutout_mode, CutoutMode::Always);
        assert!(controller.is_applied());
        assert_eq!(window.write_count(), 1);
    }

    #[test]
    fn test_apply_twice_writes_once() {
        let window = HeadlessWindowSurface::new(PlatformVersion(35));
        let mut controller = edge_to_edge();

        controller.apply(&window);
        let after_first = window.snapshot();
        controller.apply(&window);

        assert_eq!(window.snapshot(), after_first);
        assert_eq!(window.write_count(), 1);
    }

    #[test]
    fn test_disabled_setting_is_noop() {
        let window = HeadlessWindowSurface::new(PlatformVersion(35));
        let mut controller = DisplayModeController::new(DisplayModeSetting::FIT_SYSTEM_WINDOWS);

        controller.apply(&window);

        assert_eq!(window.snapshot(), WindowState::default());
        assert_eq!(window.write_count(), 0);
        assert!(!controller.is_applied());
    }

    #[test]
    fn test_unsupported_version_degrades_silently() {
        let bus = EventBus::new(8);
        let mut stream = EventStream::new(bus.subscribe());
        let window = HeadlessWindowSurface::new(PlatformVersion(19));
        let mut controller = edge_to_edge().with_event_bus(bus);

        controller.apply(&window);

        assert_eq!(window.snapshot(), WindowState::default());
        assert!(!controller.is_applied());
        assert!(matches!(
            stream.try_recv(),
            Some(Ok(ShellEvent::Display(DisplayEvent::Unsupported { api_level: 19, .. })))
        ));
    }

    #[test]
    fn test_rejected_write_degrades_silently() {
        let window = HeadlessWindowSurface::new(PlatformVersion(33));
        window.set_read_only(true);
        let mut controller = edge_to_edge();

        controller.apply(&window);

        assert_eq!(window.snapshot(), WindowState::default());
        assert!(!controller.is_applied());
    }

    #[test]
    fn test_unreadable_window_is_never_written() {
        let mut window = MockWindow::new();
        window
            .expect_platform_version()
            .return_const(PlatformVersion(30));
        window
            .expect_window_state()
            .returning(|| Err(BridgeError::NotAvailable("detached".to_string())));
        window.expect_apply_window_state().times(0);

        let mut controller = edge_to_edge();
        controller.apply(&window);

        assert!(!controller.is_applied());
    }

    #[test]
    fn test_revert_restores_prior_state() {
        let prior = WindowState {
            cutout_mode: CutoutMode::Never,
            ..Default::default()
        };
        let window = HeadlessWindowSurface::with_state(PlatformVersion(31), prior);
        let mut controller = edge_to_edge();

        controller.apply(&window);
        controller.apply(&window);
        controller.revert(&window);

        assert_eq!(window.snapshot(), prior);
        assert!(!controller.is_applied());
    }

    #[test]
    fn test_revert_without_apply_is_noop() {
        let window = HeadlessWindowSurface::new(PlatformVersion(31));
        let mut controller = edge_to_edge();

        controller.revert(&window);

        assert_eq!(window.write_count(), 0);
    }

    #[test]
    fn test_night_mode_change_refreshes_icons() {
        let window = HeadlessWindowSurface::new(PlatformVersion(35));
        let mut controller = edge_to_edge();
        controller.apply(&window);

        let dark = Configuration {
            night_mode: NightMode::Dark,
            ..Default::default()
        };
        controller.on_configuration_changed(&window, &dark);

        assert_eq!(
            window.snapshot().status_bar,
            bridge_traits::BarStyle::Transparent { dark_icons: false }
        );
        assert_eq!(window.write_count(), 2);

        // Same configuration again: nothing to do.
        controller.on_configuration_changed(&window, &dark);
        assert_eq!(window.write_count(), 2);
    }

    #[test]
    fn test_configuration_change_before_apply_only_records_night_mode() {
        let window = HeadlessWindowSurface::new(PlatformVersion(35));
        let mut controller = edge_to_edge();

        controller.on_configuration_changed(
            &window,
            &Configuration {
                night_mode: NightMode::Dark,
                ..Default::default()
            },
        );
        assert_eq!(window.write_count(), 0);

        controller.apply(&window);
        assert_eq!(
            window.snapshot().status_bar,
            bridge_traits::BarStyle::Transparent { dark_icons: false }
        );
    }

    #[test]
    fn test_initial_night_mode_drives_first_apply() {
        let window = HeadlessWindowSurface::new(PlatformVersion(30));
        let mut controller = edge_to_edge().with_night_mode(NightMode::Dark);

        controller.apply(&window);

        let state = window.snapshot();
        assert_eq!(
            state.status_bar,
            bridge_traits::BarStyle::Transparent { dark_icons: false }
        );
        assert_eq!(
            state.navigation_bar,
            bridge_traits::BarStyle::Transparent { dark_icons: false }
        );
    }
}
