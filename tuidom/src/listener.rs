//! Event listener bookkeeping.
//!
//! Listeners are plain records: the element that owns a listener receives the
//! event through [`CustomElement::handle_event`](crate::CustomElement::handle_event)
//! together with the handler name it registered. Removal goes through the
//! [`ListenerId`] returned by [`ListenerRegistry::add`], so a listener is
//! always removed with the exact handle that added it.

use std::fmt;

use crate::document::NodeId;
use crate::event::EventKind;

/// Unique handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// Sees every event of its kind, after node listeners on the path.
    Document,
    /// Sees events whose path includes this node.
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub id: ListenerId,
    pub target: ListenerTarget,
    pub kind: EventKind,
    /// Custom element instance that receives the event.
    pub owner: NodeId,
    pub handler: &'static str,
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Every call yields a fresh id.
    pub fn add(
        &mut self,
        target: ListenerTarget,
        kind: EventKind,
        owner: NodeId,
        handler: &'static str,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "[listeners] add {} target={:?} kind={:?} owner={} handler={}",
            id,
            target,
            kind,
            owner,
            handler
        );
        self.listeners.push(Listener {
            id,
            target,
            kind,
            owner,
            handler,
        });
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        let removed = self.listeners.len() != before;
        if removed {
            log::debug!("[listeners] remove {}", id);
        } else {
            log::warn!("[listeners] remove {} ignored: not registered", id);
        }
        removed
    }

    pub fn is_live(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    /// Listeners that should see an event of `kind` travelling along `path`
    /// (target first). Node listeners come in path order, each node's
    /// listeners in registration order, followed by document listeners.
    pub fn matching(&self, path: &[NodeId], kind: EventKind) -> Vec<Listener> {
        let mut matched = Vec::new();
        for node in path {
            matched.extend(
                self.listeners
                    .iter()
                    .filter(|l| l.kind == kind && l.target == ListenerTarget::Node(*node))
                    .cloned(),
            );
        }
        matched.extend(
            self.listeners
                .iter()
                .filter(|l| l.kind == kind && l.target == ListenerTarget::Document)
                .cloned(),
        );
        matched
    }

    /// Number of live listeners attached to `target` for `kind`.
    pub fn count(&self, target: ListenerTarget, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }

    /// Number of live listeners owned by an element instance.
    pub fn count_owned_by(&self, owner: NodeId) -> usize {
        self.listeners.iter().filter(|l| l.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
