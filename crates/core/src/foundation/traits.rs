use std::any::Any;
use std::sync::Arc;

use crate::container::{Container, ContainerListener};
use crate::foundation::lifecycle::Lifecycle;

/// Core trait for objects that can be registered into a container as beans.
///
/// Capabilities beyond plain membership are opted into by overriding the
/// accessor methods: a bean that returns `Some` from [`Bean::as_container`]
/// is a nested container, one that returns `Some` from [`Bean::as_listener`]
/// observes membership changes, and one that returns `Some` from
/// [`Bean::as_lifecycle`] can be started and stopped by a lifecycle driver.
pub trait Bean: Any + Send + Sync {
    /// Get the type name of this bean
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Upcast to [`Any`] for typed lookup by downcast
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Container capability: a bean that is itself an aggregate of beans
    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    /// Listener capability: a bean that observes membership changes
    fn as_listener(self: Arc<Self>) -> Option<Arc<dyn ContainerListener>> {
        None
    }

    /// Lifecycle capability: a bean whose start/stop the container may own
    fn as_lifecycle(&self) -> Option<&dyn Lifecycle> {
        None
    }
}

impl std::fmt::Debug for dyn Bean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bean")
            .field("type_name", &self.type_name())
            .finish()
    }
}
