use tuidom::{Document, EventKind, ListenerId, ListenerTarget, NodeId};

/// A listener registration owned by exactly one holder.
///
/// The handle is neither `Clone` nor `Copy`, and [`release`](Self::release)
/// consumes it, so the listener is removed with the same id that added it
/// and cannot be removed twice.
#[must_use = "the listener stays registered until the subscription is released"]
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: ListenerId,
}

impl Subscription {
    pub fn acquire(
        doc: &mut Document,
        target: ListenerTarget,
        kind: EventKind,
        owner: NodeId,
        handler: &'static str,
    ) -> Self {
        Self {
            id: doc.add_event_listener(target, kind, owner, handler),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the listener. Returns false if the document no longer had it.
    pub fn release(self, doc: &mut Document) -> bool {
        doc.remove_event_listener(self.id)
    }
}
