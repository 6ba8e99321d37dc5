use thiserror::Error;

/// Core error type for the corral container
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Bean not registered: {bean_type}")]
    BeanNotRegistered { bean_type: String },

    #[error("Lock error on resource: {resource}")]
    LockError { resource: String },

    #[error("Lifecycle error in component '{component}' during '{operation}': {source}")]
    LifecycleError {
        component: String,
        operation: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Component error: {message}")]
    Component { message: String },
}

impl CoreError {
    /// Create a new bean-not-registered error
    pub fn bean_not_registered(bean_type: impl Into<String>) -> Self {
        Self::BeanNotRegistered {
            bean_type: bean_type.into(),
        }
    }

    /// Create a new component error
    pub fn component(message: impl Into<String>) -> Self {
        Self::Component {
            message: message.into(),
        }
    }

    /// Check if the error is a precondition violation
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::BeanNotRegistered { .. })
    }
}
