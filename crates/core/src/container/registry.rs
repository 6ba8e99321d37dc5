use std::any::Any;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use crate::container::container::{bean_identity, listener_identity};
use crate::container::{Container, ContainerListener};
use crate::errors::CoreError;
use crate::foundation::Bean;

/// One registered bean together with its ownership flag.
struct BeanEntry {
    bean: Arc<dyn Bean>,
    managed: bool,
}

/// Shared interior state: bean entries and listeners are guarded together so
/// every operation observes a consistent point-in-time view.
struct Inner {
    beans: Vec<BeanEntry>,
    listeners: Vec<Arc<dyn ContainerListener>>,
}

/// The concrete managed component aggregate.
///
/// Beans are identity-unique and kept in insertion order. Mutations are
/// serialized through a single lock per registry instance; listener
/// callbacks, inherited-listener installs into nested containers, and
/// anything else that may re-enter a container run after the lock has been
/// released. Notifications for one mutation go to the listeners registered
/// at the moment of that mutation and complete before the call returns.
pub struct BeanRegistry {
    inner: RwLock<Inner>,
}

impl BeanRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                beans: Vec::new(),
                listeners: Vec::new(),
            }),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.listeners.len())
            .unwrap_or(0)
    }

    fn write_inner(&self) -> Result<RwLockWriteGuard<'_, Inner>, CoreError> {
        self.inner.write().map_err(|_| CoreError::LockError {
            resource: "bean_registry".to_string(),
        })
    }

    fn set_managed(&self, bean: &dyn Bean, managed: bool) -> Result<(), CoreError> {
        let key = bean_identity(bean);
        let mut inner = self.write_inner()?;
        match inner
            .beans
            .iter_mut()
            .find(|entry| bean_identity(entry.bean.as_ref()) == key)
        {
            Some(entry) => {
                entry.managed = managed;
                Ok(())
            }
            None => Err(CoreError::bean_not_registered(bean.type_name())),
        }
    }
}

impl Container for BeanRegistry {
    fn add_bean_managed(&self, bean: Arc<dyn Bean>, managed: bool) -> Result<bool, CoreError> {
        let key = bean_identity(bean.as_ref());
        let (to_fire, inherit_into_bean, inherited_walk) = {
            let mut inner = self.write_inner()?;
            if inner
                .beans
                .iter()
                .any(|entry| bean_identity(entry.bean.as_ref()) == key)
            {
                return Ok(false);
            }
            inner.beans.push(BeanEntry {
                bean: bean.clone(),
                managed,
            });

            // A bean that is also a listener observes this container from
            // now on, including its own addition below.
            let mut inherited_walk = None;
            if let Some(listener) = bean.clone().as_listener() {
                let listener_key = listener_identity(listener.as_ref());
                if !inner
                    .listeners
                    .iter()
                    .any(|l| listener_identity(l.as_ref()) == listener_key)
                {
                    inner.listeners.push(listener.clone());
                }
                if listener.is_inherited() {
                    inherited_walk = Some((listener, container_beans(&inner)));
                }
            }

            // A new nested container retroactively receives every inherited
            // listener already registered here.
            let inherit_into_bean: Vec<Arc<dyn ContainerListener>> =
                if bean.as_container().is_some() {
                    inner
                        .listeners
                        .iter()
                        .filter(|l| l.is_inherited())
                        .cloned()
                        .collect()
                } else {
                    Vec::new()
                };

            (inner.listeners.clone(), inherit_into_bean, inherited_walk)
        };

        tracing::debug!("Added bean: {} (managed: {})", bean.type_name(), managed);

        // Lock released: installs below may recurse through the tree, and
        // listener callbacks may re-enter this container.
        if let Some(child) = bean.as_container() {
            for listener in &inherit_into_bean {
                child.add_event_listener(listener.clone())?;
            }
        }
        if let Some((listener, candidates)) = inherited_walk {
            for candidate in candidates {
                if let Some(child) = candidate.as_container() {
                    child.add_event_listener(listener.clone())?;
                }
            }
        }
        for listener in &to_fire {
            listener.bean_added(self, &bean);
        }
        Ok(true)
    }

    fn remove_bean(&self, bean: &dyn Bean) -> Result<bool, CoreError> {
        let key = bean_identity(bean);
        let (removed, to_fire, uninstall_from_bean, inherited_walk) = {
            let mut inner = self.write_inner()?;
            let index = match inner
                .beans
                .iter()
                .position(|entry| bean_identity(entry.bean.as_ref()) == key)
            {
                Some(index) => index,
                None => return Ok(false),
            };
            let entry = inner.beans.remove(index);

            let removed_listener = inner
                .listeners
                .iter()
                .position(|l| listener_identity(l.as_ref()) == key)
                .map(|pos| inner.listeners.remove(pos));

            let uninstall_from_bean: Vec<Arc<dyn ContainerListener>> =
                if entry.bean.as_container().is_some() {
                    inner
                        .listeners
                        .iter()
                        .filter(|l| l.is_inherited())
                        .cloned()
                        .collect()
                } else {
                    Vec::new()
                };

            let inherited_walk = match removed_listener {
                Some(listener) if listener.is_inherited() => {
                    Some((listener, container_beans(&inner)))
                }
                _ => None,
            };

            (
                entry.bean,
                inner.listeners.clone(),
                uninstall_from_bean,
                inherited_walk,
            )
        };

        tracing::debug!("Removed bean: {}", removed.type_name());

        if let Some(child) = removed.as_container() {
            for listener in &uninstall_from_bean {
                child.remove_event_listener(listener.as_ref())?;
            }
        }
        if let Some((listener, candidates)) = inherited_walk {
            for candidate in candidates {
                if let Some(child) = candidate.as_container() {
                    child.remove_event_listener(listener.as_ref())?;
                }
            }
        }
        // The removed bean no longer appears in the listener set, so it does
        // not observe its own removal.
        for listener in &to_fire {
            listener.bean_removed(self, &removed);
        }
        Ok(true)
    }

    fn beans(&self) -> Vec<Arc<dyn Bean>> {
        self.inner
            .read()
            .map(|inner| inner.beans.iter().map(|entry| entry.bean.clone()).collect())
            .unwrap_or_default()
    }

    fn contains(&self, bean: &dyn Bean) -> bool {
        let key = bean_identity(bean);
        self.inner
            .read()
            .map(|inner| {
                inner
                    .beans
                    .iter()
                    .any(|entry| bean_identity(entry.bean.as_ref()) == key)
            })
            .unwrap_or(false)
    }

    fn bean_count(&self) -> usize {
        self.inner.read().map(|inner| inner.beans.len()).unwrap_or(0)
    }

    fn manage(&self, bean: &dyn Bean) -> Result<(), CoreError> {
        self.set_managed(bean, true)
    }

    fn unmanage(&self, bean: &dyn Bean) -> Result<(), CoreError> {
        self.set_managed(bean, false)
    }

    fn is_managed(&self, bean: &dyn Bean) -> bool {
        let key = bean_identity(bean);
        self.inner
            .read()
            .map(|inner| {
                inner
                    .beans
                    .iter()
                    .any(|entry| bean_identity(entry.bean.as_ref()) == key && entry.managed)
            })
            .unwrap_or(false)
    }

    fn add_event_listener(&self, listener: Arc<dyn ContainerListener>) -> Result<bool, CoreError> {
        let key = listener_identity(listener.as_ref());
        let walk = {
            let mut inner = self.write_inner()?;
            if inner
                .listeners
                .iter()
                .any(|l| listener_identity(l.as_ref()) == key)
            {
                // Identity no-op; also terminates the recursive install on
                // cyclic containment graphs.
                return Ok(false);
            }
            inner.listeners.push(listener.clone());
            if listener.is_inherited() {
                container_beans(&inner)
            } else {
                Vec::new()
            }
        };

        for candidate in walk {
            if let Some(child) = candidate.as_container() {
                child.add_event_listener(listener.clone())?;
            }
        }
        Ok(true)
    }

    fn remove_event_listener(&self, listener: &dyn ContainerListener) -> Result<bool, CoreError> {
        let key = listener_identity(listener);
        let (removed, walk) = {
            let mut inner = self.write_inner()?;
            let position = match inner
                .listeners
                .iter()
                .position(|l| listener_identity(l.as_ref()) == key)
            {
                Some(position) => position,
                None => return Ok(false),
            };
            let removed = inner.listeners.remove(position);
            let walk = if removed.is_inherited() {
                container_beans(&inner)
            } else {
                Vec::new()
            };
            (removed, walk)
        };

        for candidate in walk {
            if let Some(child) = candidate.as_container() {
                child.remove_event_listener(removed.as_ref())?;
            }
        }
        Ok(true)
    }
}

fn container_beans(inner: &Inner) -> Vec<Arc<dyn Bean>> {
    inner
        .beans
        .iter()
        .filter(|entry| entry.bean.as_container().is_some())
        .map(|entry| entry.bean.clone())
        .collect()
}

impl Bean for BeanRegistry {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }
}

impl Default for BeanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanRegistry")
            .field("bean_count", &self.bean_count())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}
