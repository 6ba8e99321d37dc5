use async_trait::async_trait;

use crate::errors::CoreError;

/// Trait for components with a start/stop lifecycle.
///
/// The container itself never calls these; an external driver (see
/// `container::lifecycle`) discovers managed beans exposing this capability
/// and drives them.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Start the component
    async fn start(&self) -> Result<(), CoreError>;

    /// Stop the component
    async fn stop(&self) -> Result<(), CoreError>;

    /// Check if the component is currently running
    fn is_running(&self) -> bool;
}
