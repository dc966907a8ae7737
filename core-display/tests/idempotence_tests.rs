//! Integration tests for display mode idempotence
//!
//! Applying the same setting twice must leave the window exactly as a single
//! application does, on every platform version, including the ones where
//! edge-to-edge is unavailable.

use bridge_desktop::HeadlessWindowSurface;
use bridge_traits::{CutoutMode, NightMode, PlatformVersion, WindowState};
use core_display::{DisplayModeController, DisplayModeSetting};
use core_runtime::events::{DisplayEvent, EventBus, EventStream, ShellEvent};

fn initial_states() -> Vec<WindowState> {
    vec![
        WindowState::default(),
        WindowState {
            cutout_mode: CutoutMode::Never,
            navigation_bar_contrast_enforced: false,
            ..Default::default()
        },
    ]
}

#[test]
fn test_apply_twice_equals_apply_once_on_every_version() {
    for level in 16..=36 {
        for initial in initial_states() {
            for night_mode in [NightMode::Light, NightMode::Dark] {
                let once_window = HeadlessWindowSurface::with_state(PlatformVersion(level), initial);
                let twice_window =
                    HeadlessWindowSurface::with_state(PlatformVersion(level), initial);

                let mut once = DisplayModeController::new(DisplayModeSetting::EDGE_TO_EDGE)
                    .with_night_mode(night_mode);
                once.apply(&once_window);

                let mut twice = DisplayModeController::new(DisplayModeSetting::EDGE_TO_EDGE)
                    .with_night_mode(night_mode);
                twice.apply(&twice_window);
                twice.apply(&twice_window);

                assert_eq!(
                    once_window.snapshot(),
                    twice_window.snapshot(),
                    "API {} / {:?} / {:?}",
                    level,
                    night_mode,
                    initial
                );
                assert_eq!(once_window.write_count(), twice_window.write_count());
            }
        }
    }
}

#[test]
fn test_second_apply_reports_no_change() {
    let bus = EventBus::new(8);
    let mut stream = EventStream::new(bus.subscribe());
    let window = HeadlessWindowSurface::new(PlatformVersion::VANILLA_ICE_CREAM);
    let mut controller =
        DisplayModeController::new(DisplayModeSetting::EDGE_TO_EDGE).with_event_bus(bus);

    controller.apply(&window);
    controller.apply(&window);

    let events = stream.drain();
    assert_eq!(
        events,
        vec![
            ShellEvent::Display(DisplayEvent::Applied {
                api_level: 35,
                changed: true
            }),
            ShellEvent::Display(DisplayEvent::Applied {
                api_level: 35,
                changed: false
            }),
        ]
    );
}

#[test]
fn test_revert_after_refresh_restores_original_window() {
    let original = WindowState::default();
    let window = HeadlessWindowSurface::with_state(PlatformVersion(29), original);
    let mut controller = DisplayModeController::new(DisplayModeSetting::EDGE_TO_EDGE);

    controller.apply(&window);
    controller.on_configuration_changed(
        &window,
        &bridge_traits::Configuration {
            night_mode: NightMode::Dark,
            ..Default::default()
        },
    );
    controller.revert(&window);

    assert_eq!(window.snapshot(), original);
}

#[test]
fn test_unsupported_versions_never_touch_window() {
    for level in [14, 19, 20] {
        let window = HeadlessWindowSurface::new(PlatformVersion(level));
        let mut controller = DisplayModeController::new(DisplayModeSetting::EDGE_TO_EDGE);

        controller.apply(&window);
        controller.apply(&window);

        assert_eq!(window.write_count(), 0);
        assert_eq!(window.snapshot(), WindowState::default());
    }
}
