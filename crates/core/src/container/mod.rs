#[allow(clippy::module_inception)]
pub mod container;
pub mod descriptor;
pub mod lifecycle;
pub mod listener;
pub mod registry;

pub use container::{Container, ContainerExt};
pub use descriptor::{describe, dump_tree, BeanDescriptor};
pub use lifecycle::{DriverState, LifecycleDriver};
pub use listener::ContainerListener;
pub use registry::BeanRegistry;
