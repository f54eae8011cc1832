#![forbid(unsafe_code)]

//! Retained element tree with input focus.
//!
//! The [`Document`] is the host's model of "what is on screen": a tree of
//! elements rooted at a [`Tag::Root`] node, plus the element that currently
//! holds input focus. Widgets attach their elements here so that focus order
//! and pointer targets can be computed by walking the tree.
//!
//! # Architecture
//!
//! `Document` is a cheap-to-clone handle over `Rc<RefCell<Tree>>`. Nodes live
//! in a slot arena; a [`NodeId`] is an index plus a generation, so an id kept
//! after its node was removed never resolves again (it acts as a weak
//! reference).
//!
//! # Invariants
//!
//! 1. Every live node except the root has exactly one parent or is detached.
//! 2. Child order is document order; traversal is pre-order.
//! 3. The focused node, if any, is live, connected, and focusable.
//! 4. Removing a node frees its entire subtree and bumps slot generations.
//! 5. No `RefCell` borrow is held when control returns to the caller, so
//!    click handlers may freely call back into the document.
//!
//! # Failure Modes
//!
//! | Operation | Condition | Result |
//! |-----------|-----------|--------|
//! | any mutation | stale `NodeId` | `DomError::StaleNode` |
//! | `append_child` | child is an ancestor of parent | `DomError::HierarchyRequest` |
//! | `remove` | root node | `DomError::RootRemoval` |
//! | `focus` | node not focusable / detached | returns `false` |

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifier of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot index (reused after removal).
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Pack into a `u64`, e.g. for hit grid payloads.
    #[inline]
    pub const fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    /// Inverse of [`NodeId::to_bits`].
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

/// Element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Root,
    Div,
    Heading,
    Paragraph,
    Button,
    /// Link; interactive only with an `href`.
    Anchor,
    Input,
    TextArea,
    Select,
}

impl Tag {
    /// Controls that take focus without an explicit tab index.
    #[inline]
    pub const fn is_form_control(self) -> bool {
        matches!(self, Tag::Button | Tag::Input | Tag::TextArea | Tag::Select)
    }
}

/// Click delivered to a handler while bubbling from `target` to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// The element that was clicked.
    pub target: NodeId,
    /// The element whose handler is running.
    pub current_target: NodeId,
}

/// Click handler attached to an element.
pub type ClickHandler = Rc<dyn Fn(&ClickEvent)>;

/// Declarative element description, instantiated with [`Document::create`].
#[derive(Clone)]
pub struct Element {
    tag: Tag,
    text: Option<String>,
    href: Option<String>,
    tab_index: Option<i32>,
    disabled: bool,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    on_click: Option<ClickHandler>,
    children: Vec<Element>,
}

/// Caller-supplied content: a sequence of sibling elements.
pub type Fragment = Vec<Element>;

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("text", &self.text)
            .field("href", &self.href)
            .field("tab_index", &self.tab_index)
            .field("disabled", &self.disabled)
            .field("classes", &self.classes)
            .field("attributes", &self.attributes)
            .field("on_click", &self.on_click.is_some())
            .field("children", &self.children)
            .finish()
    }
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            text: None,
            href: None,
            tab_index: None,
            disabled: false,
            classes: Vec::new(),
            attributes: Vec::new(),
            on_click: None,
            children: Vec::new(),
        }
    }

    pub fn div() -> Self {
        Self::new(Tag::Div)
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(Tag::Heading).text(text)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(Tag::Paragraph).text(text)
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::new(Tag::Button).text(label)
    }

    pub fn anchor(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(Tag::Anchor).text(label).href(href)
    }

    /// Text input; `label` is shown as its placeholder.
    pub fn input(label: impl Into<String>) -> Self {
        Self::new(Tag::Input).text(label)
    }

    pub fn text_area(label: impl Into<String>) -> Self {
        Self::new(Tag::TextArea).text(label)
    }

    pub fn select(label: impl Into<String>) -> Self {
        Self::new(Tag::Select).text(label)
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    #[must_use]
    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Append a class to the class list. Whitespace-separated input adds
    /// several classes; empty input adds none.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes
            .extend(class.split_whitespace().map(str::to_string));
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn on_click(mut self, handler: impl Fn(&ClickEvent) + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    /// Use an already shared handler.
    #[must_use]
    pub fn on_click_shared(mut self, handler: ClickHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    #[inline]
    pub fn tag_name(&self) -> Tag {
        self.tag
    }
}

/// Errors from document mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomError {
    /// The node was removed (or never belonged to this document).
    StaleNode(NodeId),
    /// The insertion would create a cycle or move the root.
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// The root node cannot be removed.
    RootRemoval,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleNode(id) => write!(f, "stale node {}", id.to_bits()),
            Self::HierarchyRequest { parent, child } => write!(
                f,
                "cannot append node {} under node {}",
                child.to_bits(),
                parent.to_bits()
            ),
            Self::RootRemoval => write!(f, "the root node cannot be removed"),
        }
    }
}

impl std::error::Error for DomError {}

struct Node {
    tag: Tag,
    text: Option<String>,
    href: Option<String>,
    tab_index: Option<i32>,
    disabled: bool,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    on_click: Option<ClickHandler>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn from_element(element: &Element) -> Self {
        Self {
            tag: element.tag,
            text: element.text.clone(),
            href: element.href.clone(),
            tab_index: element.tab_index,
            disabled: element.disabled,
            classes: element.classes.clone(),
            attributes: element.attributes.clone(),
            on_click: element.on_click.clone(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Focusability ignoring connectivity.
    fn focusable(&self) -> bool {
        if self.disabled || self.tag == Tag::Root {
            return false;
        }
        self.tab_index.is_some()
            || self.tag.is_form_control()
            || (self.tag == Tag::Anchor && self.href.is_some())
    }

    fn tabbable(&self) -> bool {
        self.focusable() && self.tab_index.is_none_or(|i| i >= 0)
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    focused: Option<NodeId>,
}

impl Tree {
    fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            focused: None,
        };
        tree.root = tree.alloc(Node::from_element(&Element::new(Tag::Root)));
        tree
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn live(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::StaleNode(id))
    }

    fn live_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.get_mut(id).ok_or(DomError::StaleNode(id))
    }

    fn instantiate(&mut self, element: &Element) -> NodeId {
        let top = self.alloc(Node::from_element(element));
        let mut pending = vec![(top, element)];
        while let Some((id, element)) = pending.pop() {
            for child in &element.children {
                let child_id = self.alloc(Node::from_element(child));
                if let Some(node) = self.get_mut(child_id) {
                    node.parent = Some(id);
                }
                if let Some(node) = self.get_mut(id) {
                    node.children.push(child_id);
                }
                pending.push((child_id, child));
            }
        }
        top
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn is_connected(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.is_inclusive_ancestor(self.root, id)
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.get(id).and_then(|n| n.parent);
        if let Some(parent) = parent
            && let Some(p) = self.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            pending.extend(node.children);
        }
    }

    /// Pre-order walk of the subtree below `id` (excluding `id`).
    fn descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let mut pending: Vec<NodeId> = self
            .get(id)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = pending.pop() {
            out.push(next);
            if let Some(node) = self.get(next) {
                pending.extend(node.children.iter().rev().copied());
            }
        }
    }

    fn focusable(&self, id: NodeId) -> bool {
        self.is_connected(id) && self.get(id).is_some_and(Node::focusable)
    }
}

/// Shared handle to a document tree.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<Tree>>,
}

/// Non-owning handle to a [`Document`].
#[derive(Clone)]
pub struct WeakDocument {
    inner: Weak<RefCell<Tree>>,
}

impl WeakDocument {
    /// Upgrade if the document is still alive.
    pub fn upgrade(&self) -> Option<Document> {
        self.inner.upgrade().map(|inner| Document { inner })
    }
}

impl fmt::Debug for WeakDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakDocument")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.inner.borrow();
        f.debug_struct("Document")
            .field("nodes", &(tree.slots.len() - tree.free.len()))
            .field("focused", &tree.focused)
            .finish()
    }
}

impl Document {
    /// Create a document containing only the root.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Tree::new())),
        }
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.inner.borrow().root
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        let tree = self.inner.borrow();
        tree.slots.len() - tree.free.len()
    }

    // --- Tree mutation ---

    /// Instantiate an element subtree, detached from the tree.
    pub fn create(&self, element: &Element) -> NodeId {
        self.inner.borrow_mut().instantiate(element)
    }

    /// Move `child` (and its subtree) to the end of `parent`'s children.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut tree = self.inner.borrow_mut();
        tree.live(parent)?;
        tree.live(child)?;
        if child == tree.root || tree.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        tree.detach(child);
        tree.live_mut(child)?.parent = Some(parent);
        tree.live_mut(parent)?.children.push(child);
        if let Some(focused) = tree.focused
            && !tree.focusable(focused)
        {
            tracing::trace!(node = focused.to_bits(), "focus dropped by move");
            tree.focused = None;
        }
        Ok(())
    }

    /// Instantiate `element` and append it under `parent`.
    pub fn append(&self, parent: NodeId, element: &Element) -> Result<NodeId, DomError> {
        self.inner.borrow().live(parent)?;
        let id = self.create(element);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Remove a node and its subtree. Focus inside the subtree is dropped.
    pub fn remove(&self, id: NodeId) -> Result<(), DomError> {
        let mut tree = self.inner.borrow_mut();
        tree.live(id)?;
        if id == tree.root {
            return Err(DomError::RootRemoval);
        }
        if let Some(focused) = tree.focused
            && tree.is_inclusive_ancestor(id, focused)
        {
            tree.focused = None;
        }
        tree.detach(id);
        tree.free_subtree(id);
        Ok(())
    }

    // --- Queries ---

    /// Whether the node is live (it may still be detached).
    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.borrow().get(id).is_some()
    }

    /// Whether the node is live and attached under the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.inner.borrow().is_connected(id)
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let tree = self.inner.borrow();
        tree.get(ancestor).is_some() && tree.is_inclusive_ancestor(ancestor, node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.inner.borrow().get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .get(id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Pre-order descendants, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.inner.borrow().descendants(id, &mut out);
        out
    }

    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.inner.borrow().get(id).map(|n| n.tag)
    }

    pub fn text(&self, id: NodeId) -> Option<String> {
        self.inner.borrow().get(id).and_then(|n| n.text.clone())
    }

    pub fn set_text(&self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        self.inner.borrow_mut().live_mut(id)?.text = Some(text.into());
        Ok(())
    }

    pub fn href(&self, id: NodeId) -> Option<String> {
        self.inner.borrow().get(id).and_then(|n| n.href.clone())
    }

    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.inner.borrow().get(id).and_then(|n| n.tab_index)
    }

    pub fn set_disabled(&self, id: NodeId, disabled: bool) -> Result<(), DomError> {
        let mut tree = self.inner.borrow_mut();
        tree.live_mut(id)?.disabled = disabled;
        if disabled && tree.focused == Some(id) {
            tree.focused = None;
        }
        Ok(())
    }

    pub fn classes(&self, id: NodeId) -> Vec<String> {
        self.inner
            .borrow()
            .get(id)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    /// The class list joined by single spaces.
    pub fn class_attr(&self, id: NodeId) -> Option<String> {
        self.inner.borrow().get(id).map(|n| n.classes.join(" "))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.inner
            .borrow()
            .get(id)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn add_class(&self, id: NodeId, class: &str) -> Result<(), DomError> {
        let mut tree = self.inner.borrow_mut();
        let node = tree.live_mut(id)?;
        for class in class.split_whitespace() {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
        Ok(())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.inner.borrow().get(id).and_then(|n| {
            n.attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
    }

    pub fn set_attribute(
        &self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let mut tree = self.inner.borrow_mut();
        let node = tree.live_mut(id)?;
        let name = name.into();
        let value = value.into();
        match node.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => node.attributes.push((name, value)),
        }
        Ok(())
    }

    /// Clone of the node's click handler, if any.
    pub fn click_handler(&self, id: NodeId) -> Option<ClickHandler> {
        self.inner.borrow().get(id).and_then(|n| n.on_click.clone())
    }

    // --- Focus ---

    /// Whether the node can receive focus right now.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.inner.borrow().focusable(id)
    }

    /// Whether the node takes part in sequential (Tab) navigation.
    pub fn is_tabbable(&self, id: NodeId) -> bool {
        let tree = self.inner.borrow();
        tree.is_connected(id) && tree.get(id).is_some_and(Node::tabbable)
    }

    /// The element holding focus, if any.
    pub fn active_element(&self) -> Option<NodeId> {
        self.inner.borrow().focused
    }

    /// Move focus to `id`. Returns `false` (and leaves focus unchanged) when
    /// the node is stale, detached, or not focusable.
    pub fn focus(&self, id: NodeId) -> bool {
        let mut tree = self.inner.borrow_mut();
        if !tree.focusable(id) {
            tracing::trace!(node = id.to_bits(), "focus refused");
            return false;
        }
        let previous = tree.focused.replace(id);
        if previous != Some(id) {
            tracing::trace!(
                from = previous.map(NodeId::to_bits),
                to = id.to_bits(),
                "focus moved"
            );
        }
        true
    }

    /// Drop focus.
    pub fn blur(&self) {
        self.inner.borrow_mut().focused = None;
    }

    /// Tabbable descendants of `container` in document order (container
    /// itself excluded). Evaluated against the live tree on every call.
    pub fn tabbable_within(&self, container: NodeId) -> Vec<NodeId> {
        let tree = self.inner.borrow();
        if !tree.is_connected(container) {
            return Vec::new();
        }
        let mut all = Vec::new();
        tree.descendants(container, &mut all);
        all.into_iter()
            .filter(|&id| tree.get(id).is_some_and(Node::tabbable))
            .collect()
    }

    /// Whole-document tab order: positive tab indices ascending (ties in
    /// document order), then the remaining tabbables in document order.
    pub fn tab_order(&self) -> Vec<NodeId> {
        let tree = self.inner.borrow();
        let mut all = Vec::new();
        tree.descendants(tree.root, &mut all);
        let mut positive: Vec<(i32, NodeId)> = Vec::new();
        let mut rest = Vec::new();
        for id in all {
            let Some(node) = tree.get(id) else { continue };
            if !node.tabbable() {
                continue;
            }
            match node.tab_index {
                Some(i) if i > 0 => positive.push((i, id)),
                _ => rest.push(id),
            }
        }
        positive.sort_by_key(|(i, _)| *i);
        positive.into_iter().map(|(_, id)| id).chain(rest).collect()
    }

    /// Target of the host's default Tab handling from the active element.
    ///
    /// From an element in the tab order, move one step (wrapping at the
    /// ends). From elsewhere, move to the nearest tabbable after (or before)
    /// the active element in document order, wrapping when there is none.
    pub fn next_in_tab_order(&self, forward: bool) -> Option<NodeId> {
        let order = self.tab_order();
        let first = *order.first()?;
        let last = *order.last()?;
        let Some(active) = self.active_element() else {
            return Some(if forward { first } else { last });
        };

        if let Some(pos) = order.iter().position(|&id| id == active) {
            let next = if forward {
                order.get(pos + 1).copied().unwrap_or(first)
            } else if pos == 0 {
                last
            } else {
                order[pos - 1]
            };
            return Some(next);
        }

        let tree = self.inner.borrow();
        let mut preorder = Vec::new();
        tree.descendants(tree.root, &mut preorder);
        let rank = |id: NodeId| preorder.iter().position(|&n| n == id);
        let Some(active_rank) = rank(active) else {
            return Some(if forward { first } else { last });
        };
        let candidate = if forward {
            order
                .iter()
                .copied()
                .find(|&id| rank(id).is_some_and(|r| r > active_rank))
        } else {
            order
                .iter()
                .rev()
                .copied()
                .find(|&id| rank(id).is_some_and(|r| r < active_rank))
        };
        Some(candidate.unwrap_or(if forward { first } else { last }))
    }
}
