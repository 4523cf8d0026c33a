//! Platform capability contract.
//!
//! The catalog, launcher and relay never talk to the OS directly; everything
//! goes through [`AppRegistry`], so the same logic runs against a real
//! desktop backend or a test double.

use crate::error::RegistryError;
use crate::icon::IconResource;
use std::fmt;

/// Well-known raw lifecycle actions. Anything else normalizes to
/// [`ChangeKind::Unknown`](crate::ChangeKind::Unknown).
pub mod actions {
    pub const PACKAGE_ADDED: &str = "package-added";
    pub const PACKAGE_REMOVED: &str = "package-removed";
    pub const PACKAGE_CHANGED: &str = "package-changed";
}

/// An application the platform reports as launchable.
pub struct LaunchableApp {
    /// Stable identifier (package name, desktop-file id, ...).
    pub identifier: String,
    /// Localized display label, if the platform has one.
    pub label: Option<String>,
    /// Icon resource, if the platform has one.
    pub icon: Option<IconResource>,
}

/// A raw, platform-shaped lifecycle broadcast before normalization.
#[derive(Clone, Debug)]
pub struct RawLifecycleEvent {
    /// Platform action string, ideally one of [`actions`].
    pub action: String,
    /// Scheme-qualified identifier payload, e.g. `pkg:org.example.app`.
    pub data: Option<String>,
}

/// A resolved, ready-to-invoke launch directive.
pub trait LaunchAction: Send {
    /// Start the application. `new_task` requests a fresh top-level task
    /// context; its exact meaning is backend-defined.
    fn start(self: Box<Self>, new_task: bool) -> Result<(), RegistryError>;
}

/// Opaque token for an active lifecycle registration.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Invoked by the platform for every lifecycle broadcast. May run on any
/// thread.
pub type LifecycleCallback = Box<dyn Fn(RawLifecycleEvent) + Send + Sync>;

/// Which settings surface to open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsPane {
    Home,
    System,
}

impl fmt::Display for SettingsPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsPane::Home => write!(f, "home"),
            SettingsPane::System => write!(f, "system"),
        }
    }
}

/// Host application-registry capability.
pub trait AppRegistry: Send + Sync {
    /// All applications satisfying the platform's launcher criteria.
    fn query_launchable_apps(&self) -> Result<Vec<LaunchableApp>, RegistryError>;

    /// Resolve an identifier to a launch action. `None` when the identifier
    /// is unknown or the application declares no launcher entry point.
    fn resolve_launch_action(&self, identifier: &str) -> Option<Box<dyn LaunchAction>>;

    /// Register for install/remove/change broadcasts. The handle stays valid
    /// until passed back to [`unregister_lifecycle_listener`].
    ///
    /// [`unregister_lifecycle_listener`]: AppRegistry::unregister_lifecycle_listener
    fn register_lifecycle_listener(
        &self,
        callback: LifecycleCallback,
    ) -> Result<ListenerHandle, RegistryError>;

    /// Stop an active registration.
    fn unregister_lifecycle_listener(&self, handle: ListenerHandle) -> Result<(), RegistryError>;

    /// Open a system settings surface.
    fn open_settings(&self, pane: SettingsPane) -> Result<(), RegistryError>;
}
