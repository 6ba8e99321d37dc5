use std::any::Any;
use std::sync::{Arc, Mutex};

use corral_core::errors::CoreError;
use corral_core::{
    dump_tree, Bean, BeanRegistry, Container, ContainerExt, ContainerListener, Lifecycle,
    LifecycleDriver,
};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

fn container_ident(container: &dyn Container) -> usize {
    (container as *const dyn Container).cast::<()>() as usize
}

fn bean_ident(bean: &dyn Bean) -> usize {
    (bean as *const dyn Bean).cast::<()>() as usize
}

#[derive(Debug)]
struct Payload {
    #[allow(dead_code)]
    id: u32,
}

impl Bean for Payload {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

type EventLog = Arc<Mutex<Vec<(&'static str, usize, usize)>>>;

struct Recorder {
    log: EventLog,
    inherited: bool,
}

impl Recorder {
    fn inherited(log: EventLog) -> Self {
        Self {
            log,
            inherited: true,
        }
    }
}

impl ContainerListener for Recorder {
    fn bean_added(&self, parent: &dyn Container, bean: &Arc<dyn Bean>) {
        self.log.lock().unwrap().push((
            "added",
            container_ident(parent),
            bean_ident(bean.as_ref()),
        ));
    }

    fn bean_removed(&self, parent: &dyn Container, bean: &Arc<dyn Bean>) {
        self.log.lock().unwrap().push((
            "removed",
            container_ident(parent),
            bean_ident(bean.as_ref()),
        ));
    }

    fn is_inherited(&self) -> bool {
        self.inherited
    }
}

#[test]
fn inherited_listener_observes_nested_membership_until_detached() {
    let c1 = Arc::new(BeanRegistry::new());
    let c2 = Arc::new(BeanRegistry::new());
    c1.add_bean(c2.clone()).unwrap();

    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let listener = Arc::new(Recorder::inherited(log.clone()));
    c1.add_event_listener(listener).unwrap();

    // The listener was registered on c1 but observes c2's membership.
    let x = Arc::new(Payload { id: 1 });
    c2.add_bean(x.clone()).unwrap();
    {
        let events = log.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            (
                "added",
                container_ident(c2.as_ref()),
                bean_ident(x.as_ref())
            )
        );
    }

    // Detaching c2 reverses the installation: c1 reports the removal, and
    // later changes inside c2 go unobserved.
    c1.remove_bean(c2.as_ref() as &dyn Bean).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);

    let y = Arc::new(Payload { id: 2 });
    c2.add_bean(y).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn inherited_listener_is_retroactively_installed_into_new_subtrees() {
    let root = Arc::new(BeanRegistry::new());
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let listener = Arc::new(Recorder::inherited(log.clone()));
    root.add_event_listener(listener).unwrap();

    // A two-level subtree assembled before attachment.
    let mid = Arc::new(BeanRegistry::new());
    let leaf = Arc::new(BeanRegistry::new());
    mid.add_bean(leaf.clone()).unwrap();

    root.add_bean(mid.clone()).unwrap();
    assert_eq!(mid.listener_count(), 1);
    assert_eq!(leaf.listener_count(), 1);

    let deep = Arc::new(Payload { id: 1 });
    leaf.add_bean(deep.clone()).unwrap();
    let events = log.lock().unwrap();
    // One event for attaching mid to root, one for the deep addition.
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        (
            "added",
            container_ident(leaf.as_ref()),
            bean_ident(deep.as_ref())
        )
    );
}

struct InheritedBeanListener {
    log: EventLog,
}

impl Bean for InheritedBeanListener {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn as_listener(self: Arc<Self>) -> Option<Arc<dyn ContainerListener>> {
        Some(self)
    }
}

impl ContainerListener for InheritedBeanListener {
    fn bean_added(&self, parent: &dyn Container, bean: &Arc<dyn Bean>) {
        self.log.lock().unwrap().push((
            "added",
            container_ident(parent),
            bean_ident(bean.as_ref()),
        ));
    }

    fn bean_removed(&self, parent: &dyn Container, bean: &Arc<dyn Bean>) {
        self.log.lock().unwrap().push((
            "removed",
            container_ident(parent),
            bean_ident(bean.as_ref()),
        ));
    }

    fn is_inherited(&self) -> bool {
        true
    }
}

#[test]
fn inherited_listener_beans_propagate_and_detach_with_their_registration() {
    let c1 = Arc::new(BeanRegistry::new());
    let c2 = Arc::new(BeanRegistry::new());
    c1.add_bean(c2.clone()).unwrap();

    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let watcher = Arc::new(InheritedBeanListener { log: log.clone() });
    c1.add_bean(watcher.clone()).unwrap();
    assert_eq!(c2.listener_count(), 1);

    c2.add_bean(Arc::new(Payload { id: 1 })).unwrap();
    // Own addition to c1, then the nested addition in c2.
    assert_eq!(log.lock().unwrap().len(), 2);

    // Removing the watcher bean tears down the nested installation too.
    c1.remove_bean(watcher.as_ref() as &dyn Bean).unwrap();
    assert_eq!(c2.listener_count(), 0);

    c2.add_bean(Arc::new(Payload { id: 2 })).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn contained_beans_are_collected_across_the_whole_subtree() {
    let c1 = Arc::new(BeanRegistry::new());
    let c2 = Arc::new(BeanRegistry::new());
    let c3 = Arc::new(BeanRegistry::new());

    let a1 = Arc::new(Payload { id: 1 });
    let a2 = Arc::new(Payload { id: 2 });
    let a3 = Arc::new(Payload { id: 3 });

    c1.add_bean(a1.clone()).unwrap();
    c1.add_bean(c2.clone()).unwrap();
    c2.add_bean(a2.clone()).unwrap();
    c2.add_bean(c3.clone()).unwrap();
    c3.add_bean(a3.clone()).unwrap();

    // Depth-first, insertion order at every level.
    let found = c1.get_contained_beans::<Payload>();
    assert_eq!(found.len(), 3);
    assert!(Arc::ptr_eq(&found[0], &a1));
    assert!(Arc::ptr_eq(&found[1], &a2));
    assert!(Arc::ptr_eq(&found[2], &a3));

    // Local lookups stay local.
    assert_eq!(c1.get_beans::<Payload>().len(), 1);
}

#[test]
fn cyclic_containment_terminates() {
    let c1 = Arc::new(BeanRegistry::new());
    let c2 = Arc::new(BeanRegistry::new());
    c1.add_bean(c2.clone()).unwrap();
    c2.add_bean(c1.clone()).unwrap();
    c1.add_bean(Arc::new(Payload { id: 1 })).unwrap();

    let found = c1.get_contained_beans::<Payload>();
    assert_eq!(found.len(), 1);

    let tree = dump_tree(c1.as_ref());
    assert!(tree.contains("(repeated)"));
}

struct Connector {
    running: AtomicBool,
}

impl Bean for Connector {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn as_lifecycle(&self) -> Option<&dyn Lifecycle> {
        Some(self)
    }
}

#[async_trait]
impl Lifecycle for Connector {
    async fn start(&self) -> Result<(), CoreError> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), CoreError> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn driver_starts_and_stops_a_wired_aggregate() {
    let server = Arc::new(BeanRegistry::new());
    let connector = Arc::new(Connector {
        running: AtomicBool::new(false),
    });
    let shared = Arc::new(Connector {
        running: AtomicBool::new(false),
    });

    server.add_bean(connector.clone()).unwrap();
    // Shared component: referenced, not owned.
    server.add_bean_managed(shared.clone(), false).unwrap();

    let mut driver = LifecycleDriver::new();
    driver.start(server.as_ref()).await.unwrap();
    assert!(connector.is_running());
    assert!(!shared.is_running());

    driver.stop(server.as_ref()).await.unwrap();
    assert!(!connector.is_running());
}
