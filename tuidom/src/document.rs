//! Live element tree.
//!
//! A [`Document`] is an arena of [`Node`]s addressed by [`NodeId`]. It keeps
//! the parent/child links, shadow roots, attributes and the listener registry,
//! and records lifecycle [`Reaction`]s for custom elements as the tree mutates.
//! Reactions are delivered by the [`Page`](crate::Page) that owns the document.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::element::{Content, Element, SLOT_TAG};
use crate::error::DomError;
use crate::event::EventKind;
use crate::listener::{ListenerId, ListenerRegistry, ListenerTarget};
use crate::types::Style;

const BODY_TAG: &str = "body";
const SHADOW_ROOT_TAG: &str = "#shadow-root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub text: String,
    pub style: Style,
    pub indent: u16,
    pub focusable: bool,
    pub clickable: bool,
    pub hidden: bool,
    pub disabled: bool,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    shadow_root: Option<NodeId>,
    /// Set on shadow root nodes only.
    host: Option<NodeId>,
    connected: bool,
    custom: bool,
}

impl Node {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            text: String::new(),
            style: Style::default(),
            indent: 0,
            focusable: false,
            clickable: false,
            hidden: false,
            disabled: false,
            attributes: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            shadow_root: None,
            host: None,
            connected: false,
            custom: false,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn shadow_root(&self) -> Option<NodeId> {
        self.shadow_root
    }

    pub fn is_shadow_root(&self) -> bool {
        self.host.is_some()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }
}

/// Lifecycle callback waiting to be delivered to a custom element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    Connected(NodeId),
    Disconnected(NodeId),
    AttributeChanged {
        node: NodeId,
        name: String,
        old: Option<String>,
        new: Option<String>,
    },
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    listeners: ListenerRegistry,
    reactions: VecDeque<Reaction>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut body = Node::new(BODY_TAG);
        body.connected = true;
        Self {
            nodes: vec![body],
            body: NodeId(0),
            listeners: ListenerRegistry::new(),
            reactions: VecDeque::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn get(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    // ------------------------------------------------------------------
    // Tree construction
    // ------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(tag));
        id
    }

    /// Clone a builder tree into the document and append it to `parent`.
    /// Returns the id of the new subtree root.
    pub fn instantiate(&mut self, element: &Element, parent: NodeId) -> Result<NodeId, DomError> {
        let root = self.build(element);
        self.append_child(parent, root)?;
        Ok(root)
    }

    fn build(&mut self, element: &Element) -> NodeId {
        let id = self.create_element(element.tag.clone());
        {
            let node = &mut self.nodes[id.0];
            node.id = element.id.clone();
            node.attributes = element.attributes.clone();
            node.style = element.style;
            node.indent = element.indent;
            node.focusable = element.focusable;
            node.clickable = element.clickable;
            node.hidden = element.hidden;
            node.disabled = element.disabled;
        }
        match &element.content {
            Content::None => {}
            Content::Text(text) => self.nodes[id.0].text = text.clone(),
            Content::Children(children) => {
                for child in children {
                    let child_id = self.build(child);
                    self.nodes[child_id.0].parent = Some(id);
                    self.nodes[id.0].children.push(child_id);
                }
            }
        }
        id
    }

    /// Append `child` to `parent`, moving it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.get(parent)?;
        self.get(child)?;
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old_parent) = self.nodes[child.0].parent {
            self.remove_child(old_parent, child)?;
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);

        if self.nodes[parent.0].connected {
            self.set_connected(child, true);
        }
        Ok(())
    }

    /// Detach `child` from `parent`. The node stays in the arena and can be
    /// appended again. Nodes are never freed and ids are never reused.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let position = self
            .get(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(DomError::NotAChild { parent, child })?;

        self.nodes[parent.0].children.remove(position);
        self.nodes[child.0].parent = None;

        if self.nodes[child.0].connected {
            self.set_connected(child, false);
        }
        Ok(())
    }

    /// Attach an (initially empty) shadow root to `host`.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        if self.get(host)?.shadow_root.is_some() {
            return Err(DomError::ShadowRootExists(host));
        }
        let root = self.create_element(SHADOW_ROOT_TAG);
        self.nodes[root.0].host = Some(host);
        self.nodes[root.0].connected = self.nodes[host.0].connected;
        self.nodes[host.0].shadow_root = Some(root);
        Ok(root)
    }

    /// Update the connected flag for a subtree (shadow trees included),
    /// queueing reactions for custom elements whose state changed.
    fn set_connected(&mut self, root: NodeId, connected: bool) {
        for id in self.shadow_including_descendants(root) {
            let node = &mut self.nodes[id.0];
            if node.connected == connected {
                continue;
            }
            node.connected = connected;
            if node.custom {
                self.reactions.push_back(if connected {
                    Reaction::Connected(id)
                } else {
                    Reaction::Disconnected(id)
                });
            }
        }
    }

    /// `root` and everything below it in tree order, descending into shadow
    /// roots before light children.
    pub fn shadow_including_descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            out.push(id);
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
            if let Some(shadow) = node.shadow_root {
                stack.push(shadow);
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Find `scope` or a descendant of it by id. Shadow roots below `scope`
    /// are not searched.
    pub fn get_element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        let node = self.node(scope)?;
        if node.id.as_deref() == Some(id) {
            return Some(scope);
        }
        node.children
            .iter()
            .find_map(|child| self.get_element_by_id(*child, id))
    }

    /// Shadow-including parent: a shadow root's parent is its host.
    pub fn composed_parent(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        node.parent.or(node.host)
    }

    /// Whether `node` is `ancestor` or lies below it, crossing shadow
    /// boundaries upwards.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.composed_parent(id);
        }
        false
    }

    /// Dispatch path for an event targeted at `target`: the target followed by
    /// its shadow-including ancestors.
    pub fn event_path(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            path.push(id);
            current = self.composed_parent(id);
        }
        path
    }

    /// Children in the flat tree: a shadow host shows its shadow tree, a slot
    /// shows its host's light children.
    pub fn flat_children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        if let Some(shadow) = node.shadow_root {
            return self.flat_children(shadow);
        }
        let mut out = Vec::new();
        for child in &node.children {
            let Some(child_node) = self.node(*child) else {
                continue;
            };
            if child_node.tag == SLOT_TAG {
                if let Some(host) = self.slot_host(*child) {
                    out.extend(self.nodes[host.0].children.iter().copied());
                }
            } else {
                out.push(*child);
            }
        }
        out
    }

    /// Host of the shadow tree a slot lives in.
    fn slot_host(&self, slot: NodeId) -> Option<NodeId> {
        let mut current = self.node(slot)?.parent;
        while let Some(id) = current {
            let node = self.node(id)?;
            if let Some(host) = node.host {
                return Some(host);
            }
            current = node.parent;
        }
        None
    }

    /// Parent in the flat tree. Light children of a shadow host hang under
    /// the host's slot; without a slot they are not rendered at all.
    pub fn flat_parent(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        if let Some(host) = node.host {
            return Some(host);
        }
        let parent = node.parent?;
        match self.node(parent)?.shadow_root {
            Some(shadow) => self.find_slot(shadow),
            None => Some(parent),
        }
    }

    fn find_slot(&self, scope: NodeId) -> Option<NodeId> {
        let node = self.node(scope)?;
        node.children.iter().find_map(|child| {
            if self.node(*child)?.tag == SLOT_TAG {
                Some(*child)
            } else {
                self.find_slot(*child)
            }
        })
    }

    /// Connected and not hidden anywhere up the flat tree.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if !node.connected {
            return false;
        }
        let mut current = Some(id);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            let Some(node) = self.node(id) else {
                return false;
            };
            if node.hidden {
                return false;
            }
            current = self.flat_parent(id);
        }
        false
    }

    // ------------------------------------------------------------------
    // Attributes and state
    // ------------------------------------------------------------------

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attribute(name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let value = value.into();
        let target = self.get_mut(node)?;
        let old = target.attributes.insert(name.to_string(), value.clone());
        if old.as_deref() == Some(value.as_str()) {
            return Ok(());
        }
        if target.custom {
            self.reactions.push_back(Reaction::AttributeChanged {
                node,
                name: name.to_string(),
                old,
                new: Some(value),
            });
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        let target = self.get_mut(node)?;
        let Some(old) = target.attributes.remove(name) else {
            return Ok(());
        };
        if target.custom {
            self.reactions.push_back(Reaction::AttributeChanged {
                node,
                name: name.to_string(),
                old: Some(old),
                new: None,
            });
        }
        Ok(())
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        self.get_mut(node)?.text = text.into();
        Ok(())
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<(), DomError> {
        self.get_mut(node)?.hidden = hidden;
        Ok(())
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) -> Result<(), DomError> {
        self.get_mut(node)?.disabled = disabled;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn add_event_listener(
        &mut self,
        target: ListenerTarget,
        kind: EventKind,
        owner: NodeId,
        handler: &'static str,
    ) -> ListenerId {
        self.listeners.add(target, kind, owner, handler)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ------------------------------------------------------------------
    // Reactions
    // ------------------------------------------------------------------

    /// Flag a node as a custom element so its lifecycle produces reactions.
    pub(crate) fn mark_custom(&mut self, node: NodeId) -> Result<(), DomError> {
        self.get_mut(node)?.custom = true;
        Ok(())
    }

    pub(crate) fn queue_reaction(&mut self, reaction: Reaction) {
        self.reactions.push_back(reaction);
    }

    pub(crate) fn next_reaction(&mut self) -> Option<Reaction> {
        self.reactions.pop_front()
    }

    pub fn pending_reactions(&self) -> usize {
        self.reactions.len()
    }
}
