#![forbid(unsafe_code)]

//! Tab wrap-around inside a container.
//!
//! A [`FocusScope`] is a snapshot of a container's subtree: its descendants in
//! document order and the tabbable ones among them (the ring). Given the
//! active element and the Tab direction, [`FocusScope::resolve`] decides
//! whether the host's default navigation can proceed or focus must be moved
//! explicitly to stay inside the container:
//!
//! | Active element | Tab | Shift+Tab |
//! |----------------|-----|-----------|
//! | last ring member | first member | default |
//! | first ring member | default | last member |
//! | other ring member | default | default |
//! | non-tabbable descendant | next member (wrapping) | previous member (wrapping) |
//! | container, outside, or none | first member | last member |
//!
//! An empty ring never intercepts.
//!
//! When `resolve` passes a key through, [`FocusScope::confine`] checks where
//! the host's default navigation would land. Positive tab indices order the
//! whole document, so that target can lie outside the container; focus then
//! moves to the neighbouring ring member instead, wrapping at the ends.
//!
//! Scopes are cheap to build and are meant to be rebuilt on every key press,
//! so content added or removed while the container is shown is accounted for.

use popup_runtime::{Document, NodeId};

/// What the trap does with a Tab press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapAction {
    /// Leave the key to the host's default navigation.
    PassThrough,
    /// Suppress the default and focus this node.
    MoveTo(NodeId),
}

/// Snapshot of a container's focus ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusScope {
    container: NodeId,
    descendants: Vec<NodeId>,
    ring: Vec<NodeId>,
}

impl FocusScope {
    /// Snapshot the live subtree of `container`.
    pub fn collect(document: &Document, container: NodeId) -> Self {
        Self {
            container,
            descendants: document.descendants(container),
            ring: document.tabbable_within(container),
        }
    }

    #[inline]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Tabbable descendants in document order.
    #[inline]
    pub fn ring(&self) -> &[NodeId] {
        &self.ring
    }

    pub fn first(&self) -> Option<NodeId> {
        self.ring.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.ring.last().copied()
    }

    /// Whether `node` is a strict descendant of the container.
    pub fn contains(&self, node: NodeId) -> bool {
        self.descendants.contains(&node)
    }

    /// Decide how a Tab (or Shift+Tab when `backward`) press is handled.
    pub fn resolve(&self, active: Option<NodeId>, backward: bool) -> TrapAction {
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return TrapAction::PassThrough;
        };
        let edge = if backward { last } else { first };

        let Some(active) = active else {
            return TrapAction::MoveTo(edge);
        };

        if let Some(pos) = self.ring.iter().position(|&id| id == active) {
            return match (backward, pos) {
                (false, p) if p + 1 == self.ring.len() => TrapAction::MoveTo(first),
                (true, 0) => TrapAction::MoveTo(last),
                _ => TrapAction::PassThrough,
            };
        }

        let Some(rank) = self.rank(active) else {
            return TrapAction::MoveTo(edge);
        };
        let neighbour = if backward {
            self.ring
                .iter()
                .rev()
                .copied()
                .find(|&id| self.rank(id).is_some_and(|r| r < rank))
        } else {
            self.ring
                .iter()
                .copied()
                .find(|&id| self.rank(id).is_some_and(|r| r > rank))
        };
        TrapAction::MoveTo(neighbour.unwrap_or(edge))
    }

    /// Keep a passed-through Tab inside the container. `host_target` is
    /// where the host's default navigation would move focus.
    pub fn confine(
        &self,
        active: Option<NodeId>,
        host_target: Option<NodeId>,
        backward: bool,
    ) -> TrapAction {
        if host_target.is_none_or(|target| self.ring.contains(&target)) {
            return TrapAction::PassThrough;
        }
        let Some(pos) = active.and_then(|a| self.ring.iter().position(|&id| id == a)) else {
            return TrapAction::PassThrough;
        };
        let len = self.ring.len();
        let next = if backward { (pos + len - 1) % len } else { (pos + 1) % len };
        TrapAction::MoveTo(self.ring[next])
    }

    fn rank(&self, node: NodeId) -> Option<usize> {
        self.descendants.iter().position(|&id| id == node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popup_runtime::Element;
    use proptest::prelude::*;

    fn setup(children: Vec<Element>) -> (Document, NodeId, Vec<NodeId>) {
        let doc = Document::new();
        let container = doc
            .append(doc.root(), &Element::div().tab_index(-1).children(children))
            .unwrap();
        let kids = doc.children(container);
        (doc, container, kids)
    }

    #[test]
    fn empty_ring_never_intercepts() {
        let (doc, container, _) = setup(vec![Element::paragraph("text")]);
        let scope = FocusScope::collect(&doc, container);
        assert_eq!(scope.resolve(None, false), TrapAction::PassThrough);
        assert_eq!(scope.resolve(Some(container), true), TrapAction::PassThrough);
    }

    #[test]
    fn wraps_only_at_the_edges() {
        let (doc, container, kids) =
            setup(vec![Element::button("a"), Element::button("b"), Element::button("c")]);
        let (a, b, c) = (kids[0], kids[1], kids[2]);
        let scope = FocusScope::collect(&doc, container);

        assert_eq!(scope.resolve(Some(c), false), TrapAction::MoveTo(a));
        assert_eq!(scope.resolve(Some(a), true), TrapAction::MoveTo(c));
        assert_eq!(scope.resolve(Some(a), false), TrapAction::PassThrough);
        assert_eq!(scope.resolve(Some(b), false), TrapAction::PassThrough);
        assert_eq!(scope.resolve(Some(b), true), TrapAction::PassThrough);
        assert_eq!(scope.resolve(Some(c), true), TrapAction::PassThrough);
    }

    #[test]
    fn single_member_wraps_to_itself() {
        let (doc, container, kids) = setup(vec![Element::button("only")]);
        let scope = FocusScope::collect(&doc, container);
        assert_eq!(scope.resolve(Some(kids[0]), false), TrapAction::MoveTo(kids[0]));
        assert_eq!(scope.resolve(Some(kids[0]), true), TrapAction::MoveTo(kids[0]));
    }

    #[test]
    fn container_or_outside_focus_enters_at_the_edge() {
        let (doc, container, kids) = setup(vec![Element::button("a"), Element::button("b")]);
        let outside = doc.append(doc.root(), &Element::button("outside")).unwrap();
        let scope = FocusScope::collect(&doc, container);

        assert_eq!(scope.resolve(Some(container), false), TrapAction::MoveTo(kids[0]));
        assert_eq!(scope.resolve(Some(container), true), TrapAction::MoveTo(kids[1]));
        assert_eq!(scope.resolve(Some(outside), false), TrapAction::MoveTo(kids[0]));
        assert_eq!(scope.resolve(None, true), TrapAction::MoveTo(kids[1]));
        assert!(!scope.contains(outside));
    }

    #[test]
    fn non_tabbable_descendant_moves_to_neighbour() {
        let (doc, container, kids) = setup(vec![
            Element::button("a"),
            Element::div().tab_index(-1),
            Element::button("b"),
        ]);
        let scope = FocusScope::collect(&doc, container);
        assert_eq!(scope.resolve(Some(kids[1]), false), TrapAction::MoveTo(kids[2]));
        assert_eq!(scope.resolve(Some(kids[1]), true), TrapAction::MoveTo(kids[0]));
    }

    #[test]
    fn host_target_outside_is_redirected_along_the_ring() {
        let (doc, container, kids) = setup(vec![
            Element::button("a"),
            Element::button("p").tab_index(1),
            Element::button("c"),
        ]);
        let outside = doc.append(doc.root(), &Element::button("outside")).unwrap();
        let scope = FocusScope::collect(&doc, container);
        let (a, p, c) = (kids[0], kids[1], kids[2]);

        assert_eq!(scope.confine(Some(p), Some(outside), false), TrapAction::MoveTo(c));
        assert_eq!(scope.confine(Some(p), Some(outside), true), TrapAction::MoveTo(a));
        assert_eq!(scope.confine(Some(c), Some(outside), false), TrapAction::MoveTo(a));
        assert_eq!(scope.confine(Some(a), Some(outside), true), TrapAction::MoveTo(c));
        assert_eq!(scope.confine(Some(a), Some(c), false), TrapAction::PassThrough);
        assert_eq!(scope.confine(Some(a), None, false), TrapAction::PassThrough);
    }

    #[test]
    fn disabled_and_negative_index_are_skipped() {
        let (doc, container, kids) = setup(vec![
            Element::button("a"),
            Element::button("off").disabled(true),
            Element::button("hidden").tab_index(-1),
            Element::anchor("link", "/x"),
        ]);
        let scope = FocusScope::collect(&doc, container);
        assert_eq!(scope.ring(), &[kids[0], kids[3]]);
    }

    proptest! {
        #[test]
        fn tab_never_leaves_the_container(n in 1usize..8, start in 0usize..8, presses in proptest::collection::vec(any::<bool>(), 1..24)) {
            let children = (0..n).map(|i| Element::button(i.to_string())).collect();
            let (doc, container, kids) = setup(children);
            doc.focus(kids[start % n]);
            for backward in presses {
                let scope = FocusScope::collect(&doc, container);
                let active = doc.active_element();
                let target = match scope.resolve(active, backward) {
                    TrapAction::MoveTo(target) => target,
                    TrapAction::PassThrough => {
                        let pos = kids.iter().position(|&k| Some(k) == active).unwrap();
                        if backward { kids[pos - 1] } else { kids[pos + 1] }
                    }
                };
                prop_assert!(doc.focus(target));
                prop_assert!(scope.contains(target));
            }
        }
    }
}
