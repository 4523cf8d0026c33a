//! appdex: application directory and live-update service.
//!
//! Serves launcher frontends that need:
//! - a sorted catalog of installed, launchable applications with
//!   transport-ready PNG icons
//! - launch-by-identifier
//! - a live stream of install/remove/change events for one subscriber
//!
//! The OS integration is injected through [`AppRegistry`]; the `freedesktop`
//! feature (default) ships a backend for XDG desktops. All request/response
//! operations are synchronous; nothing is cached between calls.

pub mod catalog;
pub mod directory;
pub mod error;
pub mod icon;
pub mod launch;
pub mod registry;
pub mod relay;
pub mod types;

#[cfg(feature = "freedesktop")]
pub mod freedesktop;

pub use directory::AppDirectory;
pub use error::{IconError, LaunchError, RegistryError, SettingsError};
pub use icon::{DrawableIcon, IconResource};
pub use registry::{
    AppRegistry, LaunchAction, LaunchableApp, LifecycleCallback, ListenerHandle,
    RawLifecycleEvent, SettingsPane,
};
pub use relay::{ChangeRelay, ChangeStream};
pub use types::{AppEntry, ChangeEvent, ChangeKind};

#[cfg(feature = "freedesktop")]
pub use freedesktop::{FreedesktopRegistry, RegistryConfig};
