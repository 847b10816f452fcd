//! Query and traversal API for rendered trees

use super::{NodeId, RenderedNode};

impl RenderedNode {
    /// Find first node matching predicate (depth-first, self included)
    pub fn find<F>(&self, predicate: F) -> Option<&RenderedNode>
    where
        F: Fn(&RenderedNode) -> bool,
    {
        self.iter().find(|node| predicate(node))
    }

    /// Find all nodes matching predicate, in document order
    pub fn find_all<F>(&self, predicate: F) -> Vec<&RenderedNode>
    where
        F: Fn(&RenderedNode) -> bool,
    {
        self.iter().filter(|node| predicate(node)).collect()
    }

    /// Find the node with the given identity
    pub fn find_by_node_id(&self, id: NodeId) -> Option<&RenderedNode> {
        self.find(|node| node.id() == id)
    }

    /// Find all elements with the given tag (case-insensitive)
    pub fn find_by_tag(&self, tag: &str) -> Vec<&RenderedNode> {
        self.find_all(|node| !node.is_text() && node.tag_matches(tag))
    }

    /// Find first node matching predicate (mutable)
    pub fn find_mut<F>(&mut self, predicate: F) -> Option<&mut RenderedNode>
    where
        F: Fn(&RenderedNode) -> bool + Copy,
    {
        if predicate(self) {
            return Some(self);
        }
        for child in self.children.iter_mut() {
            if let Some(found) = child.find_mut(predicate) {
                return Some(found);
            }
        }
        None
    }

    /// Count nodes in the subtree (self included)
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Collect node ids in document order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.iter().map(RenderedNode::id).collect()
    }

    /// Iterate over all nodes (depth-first, self first)
    pub fn iter(&self) -> NodeIterator<'_> {
        NodeIterator::new(self)
    }
}

// =============================================================================
// NodeIterator - depth-first traversal
// =============================================================================

/// Depth-first iterator over rendered nodes
pub struct NodeIterator<'a> {
    stack: Vec<&'a RenderedNode>,
}

impl<'a> NodeIterator<'a> {
    fn new(root: &'a RenderedNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for NodeIterator<'a> {
    type Item = &'a RenderedNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
