//! Launch dispatch.

use crate::error::LaunchError;
use crate::registry::AppRegistry;
use log::info;

/// Start the application identified by `identifier` in the foreground.
///
/// The action is invoked with a fresh top-level task context requested. On
/// success a new application instance is running; there is no rollback.
pub fn launch_app(
    registry: &dyn AppRegistry,
    identifier: Option<&str>,
) -> Result<(), LaunchError> {
    let identifier = identifier
        .filter(|id| !id.is_empty())
        .ok_or(LaunchError::MissingIdentifier)?;

    let action = registry
        .resolve_launch_action(identifier)
        .ok_or_else(|| LaunchError::Failed {
            identifier: identifier.to_string(),
            reason: "no launchable entry point".to_string(),
        })?;

    action.start(true).map_err(|err| LaunchError::Failed {
        identifier: identifier.to_string(),
        reason: err.to_string(),
    })?;

    info!("launched {identifier}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::registry::{
        LaunchAction, LaunchableApp, LifecycleCallback, ListenerHandle, SettingsPane,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct RecordedAction {
        new_task: Arc<AtomicBool>,
        fail: bool,
    }

    impl LaunchAction for RecordedAction {
        fn start(self: Box<Self>, new_task: bool) -> Result<(), RegistryError> {
            self.new_task.store(new_task, Ordering::SeqCst);
            if self.fail {
                return Err(RegistryError::Action("spawn refused".to_string()));
            }
            Ok(())
        }
    }

    struct FakeRegistry {
        known: &'static str,
        action_fails: bool,
        new_task: Arc<AtomicBool>,
        resolve_forbidden: bool,
    }

    impl FakeRegistry {
        fn with_app(known: &'static str) -> Self {
            Self {
                known,
                action_fails: false,
                new_task: Arc::new(AtomicBool::new(false)),
                resolve_forbidden: false,
            }
        }

        fn forbidding_platform_calls() -> Self {
            Self {
                known: "",
                action_fails: false,
                new_task: Arc::new(AtomicBool::new(false)),
                resolve_forbidden: true,
            }
        }
    }

    impl AppRegistry for FakeRegistry {
        fn query_launchable_apps(&self) -> Result<Vec<LaunchableApp>, RegistryError> {
            Ok(Vec::new())
        }

        fn resolve_launch_action(&self, identifier: &str) -> Option<Box<dyn LaunchAction>> {
            assert!(
                !self.resolve_forbidden,
                "platform was called for an invalid request"
            );
            (identifier == self.known).then(|| {
                Box::new(RecordedAction {
                    new_task: self.new_task.clone(),
                    fail: self.action_fails,
                }) as Box<dyn LaunchAction>
            })
        }

        fn register_lifecycle_listener(
            &self,
            _callback: LifecycleCallback,
        ) -> Result<ListenerHandle, RegistryError> {
            unreachable!("launching must not register listeners")
        }

        fn unregister_lifecycle_listener(
            &self,
            _handle: ListenerHandle,
        ) -> Result<(), RegistryError> {
            unreachable!("launching must not unregister listeners")
        }

        fn open_settings(&self, _pane: SettingsPane) -> Result<(), RegistryError> {
            unreachable!("launching must not open settings")
        }
    }

    #[test]
    fn missing_identifier_rejected_before_any_platform_call() {
        let registry = FakeRegistry::forbidding_platform_calls();
        assert!(matches!(
            launch_app(&registry, None),
            Err(LaunchError::MissingIdentifier)
        ));
        assert!(matches!(
            launch_app(&registry, Some("")),
            Err(LaunchError::MissingIdentifier)
        ));
    }

    #[test]
    fn unknown_identifier_is_a_launch_failure() {
        let registry = FakeRegistry::with_app("org.example.editor");
        match launch_app(&registry, Some("does.not.exist")) {
            Err(LaunchError::Failed { identifier, .. }) => {
                assert_eq!(identifier, "does.not.exist");
            }
            other => panic!("expected launch failure, got {other:?}"),
        }
    }

    #[test]
    fn action_error_becomes_launch_failure() {
        let mut registry = FakeRegistry::with_app("org.example.editor");
        registry.action_fails = true;

        match launch_app(&registry, Some("org.example.editor")) {
            Err(LaunchError::Failed { identifier, reason }) => {
                assert_eq!(identifier, "org.example.editor");
                assert!(reason.contains("spawn refused"));
            }
            other => panic!("expected launch failure, got {other:?}"),
        }
    }

    #[test]
    fn success_requests_a_new_task() {
        let registry = FakeRegistry::with_app("org.example.editor");
        launch_app(&registry, Some("org.example.editor")).unwrap();
        assert!(registry.new_task.load(Ordering::SeqCst));
    }
}
