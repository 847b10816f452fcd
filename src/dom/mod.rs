//! Rendered (live) tree.
//!
//! `RenderedNode` is the persistent tree the reconciler mutates in place.
//! It plays the part of a browser document: elements carry a tag, settable
//! props and an ordered child list; text nodes carry content and report the
//! tag `#text`.
//!
//! Every node receives a process-unique [`NodeId`] on creation. Ids are never
//! reused, so comparing ids across passes tells whether a node was kept or
//! rebuilt.

mod query;

pub use query::NodeIterator;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::CompactString;

use crate::attr::{PropValue, Props, PropsExt};

/// Tag reported by text nodes.
pub const TEXT_TAG: &str = "#text";

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// NodeId
// =============================================================================

/// Identity of a rendered node, assigned at creation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// RenderedNode
// =============================================================================

/// Type alias for rendered children collection.
pub type RenderedChildren = Vec<RenderedNode>;

/// Live node of the rendered tree
#[derive(Debug)]
pub struct RenderedNode {
    id: NodeId,
    tag: CompactString,
    props: Props,
    text: CompactString,
    children: RenderedChildren,
    key: Option<CompactString>,
}

impl RenderedNode {
    /// Create an empty element node
    pub fn element(tag: impl Into<CompactString>) -> Self {
        Self {
            id: NodeId::next(),
            tag: tag.into(),
            props: Vec::new(),
            text: CompactString::default(),
            children: RenderedChildren::new(),
            key: None,
        }
    }

    /// Create a text node
    pub fn text_node(content: impl Into<CompactString>) -> Self {
        Self {
            id: NodeId::next(),
            tag: TEXT_TAG.into(),
            props: Vec::new(),
            text: content.into(),
            children: RenderedChildren::new(),
            key: None,
        }
    }

    /// Create a mount point: an element with an `id` prop
    pub fn mount_point(tag: impl Into<CompactString>, id: impl Into<CompactString>) -> Self {
        let mut node = Self::element(tag);
        node.set_prop("id", PropValue::Str(id.into()));
        node
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    /// Node identity
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Tag name, `#text` for text nodes
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Check whether `tag` names the same element kind (ASCII case-insensitive)
    #[inline]
    pub fn tag_matches(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Identity key stamped by the last sync, for debugging only
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Stamp an identity key
    pub fn set_key(&mut self, key: impl Into<CompactString>) {
        self.key = Some(key.into());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Props and text
    // ─────────────────────────────────────────────────────────────────────────

    /// All props, in insertion order
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Get prop value by name
    pub fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get_prop(name)
    }

    /// Set prop value (update if exists, add if not)
    pub fn set_prop(&mut self, name: impl Into<CompactString>, value: impl Into<PropValue>) {
        self.props.set_prop(name, value);
    }

    /// Remove prop by name, returning the old value if it existed
    pub fn remove_prop(&mut self, name: &str) -> Option<PropValue> {
        self.props.remove_prop(name)
    }

    /// Get the `id` prop
    pub fn dom_id(&self) -> Option<&str> {
        self.props.get_str("id")
    }

    /// Get the `class` prop
    pub fn class(&self) -> Option<&str> {
        self.props.get_str("class")
    }

    /// Own text of a text node (empty for elements)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Overwrite own text
    pub fn set_text(&mut self, content: impl Into<CompactString>) {
        self.text = content.into();
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        buf.push_str(&self.text);
        for child in &self.children {
            child.collect_text(buf);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    /// Ordered children
    pub fn children(&self) -> &[RenderedNode] {
        &self.children
    }

    /// Child at position
    pub fn child(&self, index: usize) -> Option<&RenderedNode> {
        self.children.get(index)
    }

    /// Mutable child at position
    pub fn child_mut(&mut self, index: usize) -> Option<&mut RenderedNode> {
        self.children.get_mut(index)
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Append a child at the end
    pub fn append_child(&mut self, child: RenderedNode) {
        self.children.push(child);
    }

    /// Replace the child at `index`, returning the old one
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_child(&mut self, index: usize, child: RenderedNode) -> RenderedNode {
        std::mem::replace(&mut self.children[index], child)
    }

    /// Remove the child at `index`, returning it
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_child(&mut self, index: usize) -> RenderedNode {
        self.children.remove(index)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Invoke the `on<event>` handler of this node.
    ///
    /// Disabled nodes ignore events. Returns whether a handler ran.
    pub fn dispatch(&self, event: &str) -> bool {
        if self.props.get_flag("disabled") {
            return false;
        }
        let name = format!("on{event}");
        match self.props.get_handler(&name) {
            Some(handler) => {
                handler.call();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::attr::Callback;

    #[test]
    fn test_node_ids_unique() {
        let a = RenderedNode::element("div");
        let b = RenderedNode::element("div");
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_child_mutations() {
        let mut root = RenderedNode::element("ul");
        root.append_child(RenderedNode::element("li"));
        root.append_child(RenderedNode::text_node("tail"));
        assert_eq!(root.child_count(), 2);
        assert!(root.child(1).unwrap().is_text());
        assert_eq!(root.child(1).unwrap().tag(), TEXT_TAG);

        let old = root.replace_child(0, RenderedNode::element("p"));
        assert_eq!(old.tag(), "li");
        assert_eq!(root.child(0).unwrap().tag(), "p");

        let removed = root.remove_child(1);
        assert_eq!(removed.text(), "tail");
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_children_nest_by_value() {
        let mut node = RenderedNode::text_node("leaf");
        for _ in 0..200 {
            let mut parent = RenderedNode::element("div");
            parent.append_child(node);
            node = parent;
        }

        let mut depth = 0;
        let mut cursor = &node;
        while let Some(child) = cursor.child(0) {
            cursor = child;
            depth += 1;
        }
        assert_eq!(depth, 200);
        assert_eq!(cursor.text(), "leaf");
        assert!(std::mem::size_of::<RenderedNode>() < 256);
    }

    #[test]
    fn test_tag_matches_case_insensitive() {
        let node = RenderedNode::element("DIV");
        assert!(node.tag_matches("div"));
        assert!(!node.tag_matches("span"));
    }

    #[test]
    fn test_mount_point_and_text() {
        let mut root = RenderedNode::mount_point("div", "root");
        assert_eq!(root.dom_id(), Some("root"));
        root.append_child(RenderedNode::text_node("a"));
        let mut p = RenderedNode::element("p");
        p.append_child(RenderedNode::text_node("b"));
        root.append_child(p);
        assert_eq!(root.text_content(), "ab");
    }

    #[test]
    fn test_dispatch_event() {
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);

        let mut button = RenderedNode::element("button");
        button.set_prop(
            "onclick",
            Callback::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(button.dispatch("click"));
        assert!(!button.dispatch("hover"));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);

        button.set_prop("disabled", true);
        assert!(!button.dispatch("click"));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }
}
