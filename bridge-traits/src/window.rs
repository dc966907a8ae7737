//! Window Surface Abstraction
//!
//! Provides read/write access to the decoration state of the host window.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// OS API level of the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformVersion(pub u32);

impl PlatformVersion {
    /// Lollipop: first level that can draw behind system bars.
    pub const LOLLIPOP: PlatformVersion = PlatformVersion(21);
    /// Oreo: light navigation bar icons.
    pub const OREO: PlatformVersion = PlatformVersion(26);
    /// Pie: display cutout modes.
    pub const PIE: PlatformVersion = PlatformVersion(28);
    /// Android 10: navigation bar contrast enforcement.
    pub const Q: PlatformVersion = PlatformVersion(29);
    /// Android 11: `ALWAYS` cutout mode.
    pub const R: PlatformVersion = PlatformVersion(30);
    /// Android 15: edge-to-edge enforced by the OS.
    pub const VANILLA_ICE_CREAM: PlatformVersion = PlatformVersion(35);

    pub fn api_level(&self) -> u32 {
        self.0
    }

    pub fn at_least(&self, other: PlatformVersion) -> bool {
        *self >= other
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API {}", self.0)
    }
}

/// Appearance of a system bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarStyle {
    /// Platform default opaque bar
    Opaque,
    /// Fully transparent bar
    Transparent {
        /// Use dark icons (light theme)
        dark_icons: bool,
    },
    /// Translucent scrim over content
    Scrim {
        /// Use dark icons (light theme)
        dark_icons: bool,
    },
}

/// How content is laid out around display cutouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutoutMode {
    /// Platform default
    Default,
    /// Extend into short-edge cutouts only
    ShortEdges,
    /// Always extend into cutouts
    Always,
    /// Never extend into cutouts
    Never,
}

/// Decoration state of the host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    /// Whether the framework pads content to avoid system bars
    pub decor_fits_system_windows: bool,
    pub status_bar: BarStyle,
    pub navigation_bar: BarStyle,
    pub cutout_mode: CutoutMode,
    /// Whether the OS forces a contrasting scrim behind the navigation bar
    pub navigation_bar_contrast_enforced: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            decor_fits_system_windows: true,
            status_bar: BarStyle::Opaque,
            navigation_bar: BarStyle::Opaque,
            cutout_mode: CutoutMode::Default,
            navigation_bar_contrast_enforced: true,
        }
    }
}

/// Requested display mode. Immutable once handed to the display controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayModeSetting {
    pub edge_to_edge: bool,
}

impl DisplayModeSetting {
    pub const EDGE_TO_EDGE: DisplayModeSetting = DisplayModeSetting { edge_to_edge: true };
    pub const FIT_SYSTEM_WINDOWS: DisplayModeSetting = DisplayModeSetting {
        edge_to_edge: false,
    };
}

impl Default for DisplayModeSetting {
    fn default() -> Self {
        Self::EDGE_TO_EDGE
    }
}

/// Window surface trait
///
/// Abstracts the platform window decoration APIs:
/// - **Android**: `Window` flags, `WindowInsetsController`, cutout attributes
/// - **iOS**: safe-area and status bar appearance on the root view controller
/// - **Desktop**: headless surface for tests
///
/// Implementations must tolerate calls made before the window is attached
/// to a display; they may buffer the state and apply it on attach.
pub trait WindowSurface: Send + Sync {
    /// Platform version the surface runs on.
    fn platform_version(&self) -> PlatformVersion;

    /// Read the current decoration state.
    fn window_state(&self) -> Result<WindowState>;

    /// Write a full decoration state.
    fn apply_window_state(&self, state: &WindowState) -> Result<()>;
}
