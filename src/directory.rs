//! Service facade over one injected registry.

use crate::catalog;
use crate::error::{LaunchError, RegistryError, SettingsError};
use crate::launch;
use crate::registry::{AppRegistry, SettingsPane};
use crate::relay::{ChangeRelay, ChangeStream};
use crate::types::AppEntry;
use std::sync::Arc;

/// The application directory service.
///
/// Request/response operations are synchronous and potentially blocking
/// (icon rendering in particular); schedule them off latency-sensitive
/// threads. Change delivery is push-based and independent of this call
/// surface.
pub struct AppDirectory {
    registry: Arc<dyn AppRegistry>,
    relay: Arc<ChangeRelay>,
}

impl AppDirectory {
    pub fn new(registry: Arc<dyn AppRegistry>) -> Self {
        let relay = ChangeRelay::new(registry.clone());
        Self { registry, relay }
    }

    /// Directory over the host desktop's application registry.
    #[cfg(feature = "freedesktop")]
    pub fn freedesktop() -> Self {
        Self::new(Arc::new(crate::freedesktop::FreedesktopRegistry::new()))
    }

    /// The current catalog, sorted by display name.
    pub fn list_apps(&self) -> Result<Vec<AppEntry>, RegistryError> {
        catalog::list_apps(self.registry.as_ref())
    }

    /// Start an application in the foreground.
    pub fn launch_app(&self, identifier: Option<&str>) -> Result<(), LaunchError> {
        launch::launch_app(self.registry.as_ref(), identifier)
    }

    pub fn open_home_settings(&self) -> Result<(), SettingsError> {
        self.open_settings(SettingsPane::Home)
    }

    pub fn open_system_settings(&self) -> Result<(), SettingsError> {
        self.open_settings(SettingsPane::System)
    }

    fn open_settings(&self, pane: SettingsPane) -> Result<(), SettingsError> {
        self.registry
            .open_settings(pane)
            .map_err(|err| SettingsError::Open {
                pane,
                reason: err.to_string(),
            })
    }

    /// Open the live change stream, displacing any active subscriber.
    pub fn subscribe_changes(&self) -> Result<ChangeStream, RegistryError> {
        self.relay.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{
        LaunchAction, LaunchableApp, LifecycleCallback, ListenerHandle, RawLifecycleEvent,
        actions,
    };
    use crate::types::ChangeKind;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeRegistry {
        callback: Mutex<Option<LifecycleCallback>>,
        settings_fail: bool,
    }

    impl AppRegistry for FakeRegistry {
        fn query_launchable_apps(&self) -> Result<Vec<LaunchableApp>, RegistryError> {
            Ok(vec![
                LaunchableApp {
                    identifier: "b.desktop".to_string(),
                    label: Some("Beta".to_string()),
                    icon: None,
                },
                LaunchableApp {
                    identifier: "a.desktop".to_string(),
                    label: Some("Alpha".to_string()),
                    icon: None,
                },
            ])
        }

        fn resolve_launch_action(&self, _identifier: &str) -> Option<Box<dyn LaunchAction>> {
            None
        }

        fn register_lifecycle_listener(
            &self,
            callback: LifecycleCallback,
        ) -> Result<ListenerHandle, RegistryError> {
            *self.callback.lock().unwrap() = Some(callback);
            Ok(ListenerHandle(1))
        }

        fn unregister_lifecycle_listener(
            &self,
            _handle: ListenerHandle,
        ) -> Result<(), RegistryError> {
            *self.callback.lock().unwrap() = None;
            Ok(())
        }

        fn open_settings(&self, _pane: SettingsPane) -> Result<(), RegistryError> {
            if self.settings_fail {
                return Err(RegistryError::Unsupported("no settings surface".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn operations_run_against_the_injected_registry() {
        let directory = AppDirectory::new(Arc::new(FakeRegistry::default()));

        let catalog = directory.list_apps().unwrap();
        assert_eq!(catalog[0].name, "Alpha");
        assert_eq!(catalog[1].name, "Beta");

        assert!(matches!(
            directory.launch_app(None),
            Err(LaunchError::MissingIdentifier)
        ));
        assert!(matches!(
            directory.launch_app(Some("does.not.exist")),
            Err(LaunchError::Failed { .. })
        ));

        directory.open_home_settings().unwrap();
        directory.open_system_settings().unwrap();
    }

    #[test]
    fn settings_failure_carries_the_pane() {
        let directory = AppDirectory::new(Arc::new(FakeRegistry {
            settings_fail: true,
            ..FakeRegistry::default()
        }));

        match directory.open_home_settings() {
            Err(SettingsError::Open { pane, reason }) => {
                assert_eq!(pane, SettingsPane::Home);
                assert!(reason.contains("no settings surface"));
            }
            other => panic!("expected open failure, got {other:?}"),
        }
    }

    #[test]
    fn change_stream_flows_end_to_end() {
        let registry = Arc::new(FakeRegistry::default());
        let directory = AppDirectory::new(registry.clone());

        let stream = directory.subscribe_changes().unwrap();
        {
            let guard = registry.callback.lock().unwrap();
            guard.as_ref().unwrap()(RawLifecycleEvent {
                action: actions::PACKAGE_ADDED.to_string(),
                data: Some("pkg:com.example.foo".to_string()),
            });
        }

        let event = stream.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(event.kind, ChangeKind::Installed);
        assert_eq!(event.package.as_deref(), Some("com.example.foo"));
    }
}
