pub mod container;
pub mod errors;
pub mod foundation;

// Re-export key types for convenience
pub use container::{
    describe, dump_tree, BeanDescriptor, BeanRegistry, Container, ContainerExt,
    ContainerListener, DriverState, LifecycleDriver,
};
pub use errors::CoreError;
pub use foundation::{Bean, Lifecycle};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
