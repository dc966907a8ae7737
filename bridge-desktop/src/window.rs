//! Headless Window Surface

use bridge_traits::{
    error::{BridgeError, Result},
    window::{PlatformVersion, WindowState, WindowSurface},
};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// In-memory window surface for desktop hosts and tests.
///
/// Holds a [`WindowState`] and counts writes, so idempotence of the display
/// controller can be observed. A surface can be marked read-only to emulate
/// a platform that rejects decoration changes.
#[derive(Debug)]
pub struct HeadlessWindowSurface {
    version: PlatformVersion,
    inner: Mutex<SurfaceState>,
}

#[derive(Debug)]
struct SurfaceState {
    window: WindowState,
    writes: usize,
    read_only: bool,
}

impl HeadlessWindowSurface {
    /// Create a surface reporting the given platform version.
    pub fn new(version: PlatformVersion) -> Self {
        Self::with_state(version, WindowState::default())
    }

    /// Create a surface with an initial decoration state.
    pub fn with_state(version: PlatformVersion, window: WindowState) -> Self {
        Self {
            version,
            inner: Mutex::new(SurfaceState {
                window,
                writes: 0,
                read_only: false,
            }),
        }
    }

    /// Reject every subsequent write with `NotAvailable`.
    pub fn set_read_only(&self, read_only: bool) {
        self.lock().read_only = read_only;
    }

    /// Current decoration state.
    pub fn snapshot(&self) -> WindowState {
        self.lock().window
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for HeadlessWindowSurface {
    fn default() -> Self {
        Self::new(PlatformVersion::VANILLA_ICE_CREAM)
    }
}

impl WindowSurface for HeadlessWindowSurface {
    fn platform_version(&self) -> PlatformVersion {
        self.version
    }

    fn window_state(&self) -> Result<WindowState> {
        Ok(self.lock().window)
    }

    fn apply_window_state(&self, state: &WindowState) -> Result<()> {
        let mut inner = self.lock();
        if inner.read_only {
            return Err(BridgeError::NotAvailable(format!(
                "window decorations are read-only on {}",
                self.version
            )));
        }

        inner.window = *state;
        inner.writes += 1;
        debug!(writes = inner.writes, "Applied headless window state");
        Ok(())
    }
}
