use crate::container::Container;
use crate::errors::CoreError;

/// Lifecycle phase of a [`LifecycleDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Driver created, nothing started yet
    Idle,
    /// Managed beans are being started
    Starting,
    /// All managed beans started
    Running,
    /// Managed beans are being stopped
    Stopping,
    /// All managed beans stopped
    Stopped,
}

/// Drives the start/stop lifecycle of a container's managed beans.
///
/// The container itself only records which beans it owns; this driver
/// queries `is_managed` and the bean snapshot to discover them and invokes
/// their [`crate::foundation::Lifecycle`] capability. The container lock is
/// never held across a lifecycle call, since the driver iterates a snapshot.
///
/// The driver is shallow: a managed nested container that wants its own
/// subtree driven implements the lifecycle capability itself.
pub struct LifecycleDriver {
    state: DriverState,
}

impl LifecycleDriver {
    /// Create a new driver
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
        }
    }

    /// Start every managed bean exposing the lifecycle capability, in
    /// registration order. Fails fast on the first start error.
    pub async fn start(&mut self, container: &dyn Container) -> Result<(), CoreError> {
        if self.state == DriverState::Running {
            return Ok(());
        }
        self.state = DriverState::Starting;

        for bean in container.beans() {
            if !container.is_managed(bean.as_ref()) {
                continue;
            }
            if let Some(lifecycle) = bean.as_lifecycle() {
                tracing::info!("Starting managed bean: {}", bean.type_name());
                lifecycle
                    .start()
                    .await
                    .map_err(|e| CoreError::LifecycleError {
                        component: bean.type_name().to_string(),
                        operation: "start".to_string(),
                        source: Box::new(e),
                    })?;
            }
        }

        self.state = DriverState::Running;
        Ok(())
    }

    /// Start with a timeout applied to the whole start sequence
    pub async fn start_with_timeout(
        &mut self,
        container: &dyn Container,
        timeout: std::time::Duration,
    ) -> Result<(), CoreError> {
        match tokio::time::timeout(timeout, self.start(container)).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::LifecycleError {
                component: "lifecycle_driver".to_string(),
                operation: "start".to_string(),
                source: Box::new(CoreError::component(format!(
                    "start timed out after {:?}",
                    timeout
                ))),
            }),
        }
    }

    /// Stop every managed bean in reverse registration order.
    ///
    /// A failing stop is logged and the remaining beans are still stopped.
    pub async fn stop(&mut self, container: &dyn Container) -> Result<(), CoreError> {
        if matches!(self.state, DriverState::Stopping | DriverState::Stopped) {
            return Ok(());
        }
        self.state = DriverState::Stopping;

        for bean in container.beans().into_iter().rev() {
            if !container.is_managed(bean.as_ref()) {
                continue;
            }
            if let Some(lifecycle) = bean.as_lifecycle() {
                tracing::info!("Stopping managed bean: {}", bean.type_name());
                if let Err(e) = lifecycle.stop().await {
                    tracing::warn!("Error stopping bean {}: {}", bean.type_name(), e);
                }
            }
        }

        self.state = DriverState::Stopped;
        Ok(())
    }

    /// Get the current driver state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Check if all managed beans have been started
    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }
}

impl Default for LifecycleDriver {
    fn default() -> Self {
        Self::new()
    }
}
