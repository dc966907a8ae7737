//! Edge-to-edge strategy per platform version.
//!
//! | API level | Status bar | Navigation bar | Cutout | Nav contrast |
//! |-----------|-----------|----------------|--------|--------------|
//! | < 21      | unsupported | | | |
//! | 21–22     | transparent, light icons | scrim, light icons | kept | kept |
//! | 23–25     | transparent, themed icons | scrim, light icons | kept | kept |
//! | 26–27     | transparent, themed icons | scrim, themed icons | kept | kept |
//! | 28        | transparent, themed icons | scrim, themed icons | short edges | kept |
//! | 29        | transparent, themed icons | transparent, themed icons | short edges | enforced |
//! | ≥ 30      | transparent, themed icons | transparent, themed icons | always | enforced |
//!
//! In every supported row the decor stops fitting system windows, so content
//! is laid out under the bars. "Kept" fields take the value of the current
//! window state, which makes the computed state a fixed point: computing it
//! again from its own output yields the same state.

use bridge_traits::{BarStyle, CutoutMode, NightMode, PlatformVersion, WindowState};

use crate::error::{DisplayError, Result};

/// First level with light (dark-icon) status bars.
const MARSHMALLOW: PlatformVersion = PlatformVersion(23);

/// Computes the edge-to-edge window state for `version`.
///
/// # Errors
///
/// `UnsupportedPlatformFeature` below API 21.
pub fn edge_to_edge_state(
    version: PlatformVersion,
    night_mode: NightMode,
    current: &WindowState,
) -> Result<WindowState> {
    if !version.at_least(PlatformVersion::LOLLIPOP) {
        return Err(DisplayError::UnsupportedPlatformFeature {
            api_level: version.api_level(),
            reason: "drawing behind system bars requires API 21".to_string(),
        });
    }

    let themed_icons = night_mode == NightMode::Light;

    let status_icons = version.at_least(MARSHMALLOW) && themed_icons;
    let nav_icons = version.at_least(PlatformVersion::OREO) && themed_icons;

    let navigation_bar = if version.at_least(PlatformVersion::Q) {
        BarStyle::Transparent {
            dark_icons: nav_icons,
        }
    } else {
        BarStyle::Scrim {
            dark_icons: nav_icons,
        }
    };

    let cutout_mode = if version.at_least(PlatformVersion::R) {
        CutoutMode::Always
    } else if version.at_least(PlatformVersion::PIE) {
        CutoutMode::ShortEdges
    } else {
        current.cutout_mode
    };

    let navigation_bar_contrast_enforced = if version.at_least(PlatformVersion::Q) {
        true
    } else {
        current.navigation_bar_contrast_enforced
    };

    Ok(WindowState {
        decor_fits_system_windows: false,
        status_bar: BarStyle::Transparent {
            dark_icons: status_icons,
        },
        navigation_bar,
        cutout_mode,
        navigation_bar_contrast_enforced,
    })
}
