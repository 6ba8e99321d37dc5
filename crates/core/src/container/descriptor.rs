use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

use crate::container::container::container_identity;
use crate::container::Container;
use crate::foundation::Bean;

/// Introspection snapshot of one registered bean
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeanDescriptor {
    pub type_name: String,
    pub managed: bool,
    pub container: bool,
    pub listener: bool,
}

impl BeanDescriptor {
    /// Create a descriptor for a bean registered in `container`
    pub fn from_bean(container: &dyn Container, bean: &Arc<dyn Bean>) -> Self {
        Self {
            type_name: bean.type_name().to_string(),
            managed: container.is_managed(bean.as_ref()),
            container: bean.as_container().is_some(),
            listener: bean.clone().as_listener().is_some(),
        }
    }
}

/// Collect descriptors for every bean in the container, in insertion order
pub fn describe(container: &dyn Container) -> Vec<BeanDescriptor> {
    container
        .beans()
        .iter()
        .map(|bean| BeanDescriptor::from_bean(container, bean))
        .collect()
}

/// Render the reachable bean tree as an indented diagnostic dump.
///
/// Managed beans are prefixed `+=`, unmanaged beans `+-`. A container that
/// already appeared elsewhere in the tree is marked `(repeated)` and not
/// descended into again, so cyclic containment terminates.
pub fn dump_tree(container: &dyn Container) -> String {
    let mut out = String::new();
    let mut visited = HashSet::new();
    visited.insert(container_identity(container));
    dump_level(container, 0, &mut out, &mut visited);
    out
}

fn dump_level(
    container: &dyn Container,
    depth: usize,
    out: &mut String,
    visited: &mut HashSet<usize>,
) {
    for bean in container.beans() {
        let marker = if container.is_managed(bean.as_ref()) {
            "+="
        } else {
            "+-"
        };
        let indent = "    ".repeat(depth);
        match bean.as_container() {
            Some(child) if visited.insert(container_identity(child)) => {
                let _ = writeln!(out, "{}{} {}", indent, marker, bean.type_name());
                dump_level(child, depth + 1, out, visited);
            }
            Some(_) => {
                let _ = writeln!(out, "{}{} {} (repeated)", indent, marker, bean.type_name());
            }
            None => {
                let _ = writeln!(out, "{}{} {}", indent, marker, bean.type_name());
            }
        }
    }
}
