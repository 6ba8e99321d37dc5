use std::sync::Arc;

use crate::container::Container;
use crate::foundation::Bean;

/// Observer of container membership changes.
///
/// Listeners are identity-unique within a container, like beans. A listener
/// whose [`ContainerListener::is_inherited`] returns `true` is additionally
/// installed into every container transitively reachable through
/// containment, so it observes membership changes anywhere in the subtree.
pub trait ContainerListener: Send + Sync {
    /// Called after `bean` has been added to `parent`
    fn bean_added(&self, parent: &dyn Container, bean: &Arc<dyn Bean>);

    /// Called after `bean` has been removed from `parent`
    fn bean_removed(&self, parent: &dyn Container, bean: &Arc<dyn Bean>);

    /// Whether this listener propagates into nested containers
    fn is_inherited(&self) -> bool {
        false
    }
}
