//! Hosted Content Bridge and Lifecycle Types
//!
//! Defines the contract between the native host activity and the hosted
//! content runtime (web view, embedded UI engine, etc.).

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::error::Result;

/// Lifecycle state of a host activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Activity created and bridge initialized
    Created,
    /// Activity in the foreground and receiving input
    Resumed,
    /// Activity partially or fully obscured
    Paused,
    /// Activity torn down
    Destroyed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Resumed => "resumed",
            LifecycleState::Paused => "paused",
            LifecycleState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Screen orientation reported with a configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
    Undefined,
}

/// UI night mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NightMode {
    #[default]
    Light,
    Dark,
}

/// Snapshot of the device configuration delivered on a configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub orientation: Orientation,
    pub night_mode: NightMode,
    /// Screen width in density-independent pixels
    pub screen_width_dp: u32,
    /// Screen height in density-independent pixels
    pub screen_height_dp: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            night_mode: NightMode::Light,
            screen_width_dp: 0,
            screen_height_dp: 0,
        }
    }
}

/// Lifecycle event forwarded to hosted content.
///
/// Creation is not forwarded as an event: it is expressed by
/// [`HostedContentBridge::init`] returning a handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LifecycleEvent {
    Resume,
    Pause,
    ConfigurationChanged { configuration: Configuration },
}

impl LifecycleEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Resume => "resume",
            LifecycleEvent::Pause => "pause",
            LifecycleEvent::ConfigurationChanged { .. } => "configuration_changed",
        }
    }
}

/// Opaque persisted-state blob handed to create and produced on destroy.
///
/// The host core never inspects the contents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState(Bytes);

impl SavedState {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SavedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedState")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Opaque handle to an initialized hosted-content bridge.
///
/// Deliberately neither `Clone` nor `Copy`: exactly one owner holds it
/// between `init` and `destroy`, and `destroy` consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct BridgeHandle {
    session_id: Uuid,
    raw: u64,
}

impl BridgeHandle {
    /// Wrap a bridge-specific token (pointer, JNI global ref id, ...).
    pub fn new(raw: u64) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            raw,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }
}

/// Context passed to [`HostedContentBridge::init`].
#[derive(Debug, Clone)]
pub struct BridgeContext {
    /// Identifier of the create→destroy span this bridge belongs to
    pub activation_id: Uuid,
    /// State persisted by a previous activation, passed through unmodified
    pub saved_state: Option<SavedState>,
    /// Whether hosted content is laid out edge-to-edge
    pub edge_to_edge: bool,
}

impl BridgeContext {
    pub fn new(activation_id: Uuid) -> Self {
        Self {
            activation_id,
            saved_state: None,
            edge_to_edge: false,
        }
    }

    pub fn with_saved_state(mut self, saved_state: Option<SavedState>) -> Self {
        self.saved_state = saved_state;
        self
    }

    pub fn with_edge_to_edge(mut self, edge_to_edge: bool) -> Self {
        self.edge_to_edge = edge_to_edge;
        self
    }
}

/// Hosted content bridge trait
///
/// The capability set the host activity consumes from the cross-platform
/// runtime. Implementations wrap the runtime's native entry points:
/// - **Android**: bridge object created from the activity's JNI env
/// - **iOS**: bridge view controller
/// - **Desktop**: embedded web view or headless test bridge
///
/// All calls arrive on the main thread and must return promptly. Long-running
/// work belongs on a worker the hosted content schedules itself.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::lifecycle::{BridgeContext, BridgeHandle, HostedContentBridge, LifecycleEvent};
///
/// fn boot(bridge: &dyn HostedContentBridge) -> Result<BridgeHandle> {
///     let handle = bridge.init(BridgeContext::new(Uuid::new_v4()))?;
///     bridge.dispatch_lifecycle(&handle, LifecycleEvent::Resume)?;
///     Ok(handle)
/// }
/// ```
pub trait HostedContentBridge: Send + Sync {
    /// Allocate the bridge and boot hosted content.
    ///
    /// An error here means the runtime could not allocate its native
    /// resources and is unrecoverable for the process.
    fn init(&self, context: BridgeContext) -> Result<BridgeHandle>;

    /// Forward a lifecycle event to hosted content.
    fn dispatch_lifecycle(&self, handle: &BridgeHandle, event: LifecycleEvent) -> Result<()>;

    /// Synchronously flush pending hosted-content state.
    ///
    /// Called on pause; the OS may terminate the process as soon as this
    /// returns. Implementations should stop work once `budget` is spent.
    fn flush_pending(&self, handle: &BridgeHandle, budget: Duration) -> Result<()>;

    /// Produce state to persist across process death.
    fn save_state(&self, _handle: &BridgeHandle) -> Result<Option<SavedState>> {
        Ok(None)
    }

    /// Tear down the bridge, consuming its handle.
    fn destroy(&self, handle: BridgeHandle) -> Result<()>;
}
