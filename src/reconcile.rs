//! Reconciliation of rendered trees
//!
//! Mutates a [`RenderedNode`] in place until it matches a [`PlainNode`].
//!
//! # Algorithm
//!
//! At every level:
//!
//! 1. **Props**: every prop of the plain node overwrites the rendered value
//!    when it differs. Props missing from the plain node are left alone.
//! 2. **Key**: a plain key is stamped onto the rendered node. Keys are not
//!    used for matching.
//! 3. **Text**: a plain text value overwrites differing text content.
//! 4. **Children**, matched purely by position:
//!    - plain child, no rendered child: create and append
//!    - rendered child, no plain child: remove
//!    - both, same tag (ASCII case-insensitive): recurse
//!    - both, different tags: build a new node and replace in place
//!
//! # Known limitations
//!
//! - Stale props survive: removing a prop from the virtual tree does not
//!   remove it from the rendered node.
//! - Reordering children rebuilds every position whose tag changed, even
//!   when the same keyed node merely moved.
//!
//! # Root adaptation
//!
//! [`render_into`] wraps the evaluated tree in a synthetic root with the
//! mount point's tag and `id`, so the top-level comparison always matches
//! and only the mount's single child subtree is diffed.

use crate::attr::{PropsExt, is_reserved};
use crate::dom::RenderedNode;
use crate::error::{VdomError, VdomResult};
use crate::eval::{EvalConfig, evaluate_with_config};
use crate::node::{PlainElement, PlainNode, TextValue, VNode};

/// Default maximum depth of the rendered tree walked by `sync`.
const DEFAULT_MAX_DEPTH: usize = 512;

// =============================================================================
// Public Types
// =============================================================================

/// Configuration for reconciliation limits.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileConfig {
    /// Maximum tree depth before `sync` gives up.
    /// Default: 512
    pub max_depth: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ReconcileConfig {
    /// Create config with a custom depth limit.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

/// Statistics from a sync pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SyncStats {
    /// Number of plain/rendered pairs compared
    pub nodes_compared: usize,
    /// Number of props written
    pub props_set: usize,
    /// Number of text contents written
    pub texts_set: usize,
    /// Number of keys stamped
    pub keys_stamped: usize,
    /// Number of nodes built during the pass.
    ///
    /// Every node of a freshly built subtree counts, descendants included:
    /// appending `<h1>Lots</h1>` creates two nodes (the element and its
    /// text). A replaced position counts once in `nodes_replaced` while the
    /// descendants of its replacement count here.
    pub nodes_created: usize,
    /// Number of children replaced because their tag changed
    pub nodes_replaced: usize,
    /// Number of children removed
    pub nodes_removed: usize,
}

impl SyncStats {
    /// Total number of writes applied to the rendered tree
    pub fn mutation_count(&self) -> usize {
        self.props_set
            + self.texts_set
            + self.keys_stamped
            + self.nodes_created
            + self.nodes_replaced
            + self.nodes_removed
    }

    /// Check if the pass changed anything
    pub fn has_mutations(&self) -> bool {
        self.mutation_count() > 0
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Synchronize `rendered` with `plain` using default limits.
pub fn sync(plain: &PlainNode, rendered: &mut RenderedNode) -> VdomResult<SyncStats> {
    sync_with_config(plain, rendered, &ReconcileConfig::default())
}

/// Synchronize `rendered` with `plain`.
///
/// The roots must share a tag (text roots match text roots). A root
/// mismatch is rejected before anything is written; on a depth error the
/// tree is left partially synced.
pub fn sync_with_config(
    plain: &PlainNode,
    rendered: &mut RenderedNode,
    config: &ReconcileConfig,
) -> VdomResult<SyncStats> {
    if !rendered.tag_matches(plain.tag()) {
        return Err(VdomError::root_mismatch(plain.tag(), rendered.tag()));
    }
    let mut ctx = SyncContext::new(config.max_depth);
    ctx.sync_node(plain, rendered)?;
    Ok(ctx.stats)
}

/// Build a new rendered subtree for `plain`.
pub fn create(plain: &PlainNode) -> VdomResult<RenderedNode> {
    let mut ctx = SyncContext::new(DEFAULT_MAX_DEPTH);
    ctx.create_node(plain)
}

/// Evaluate `vnode` and render it as the single child of `mount`.
pub fn render_into(vnode: &VNode, mount: &mut RenderedNode) -> VdomResult<SyncStats> {
    render_into_with_config(vnode, mount, &EvalConfig::default(), &ReconcileConfig::default())
}

/// Evaluate `vnode` and render it into `mount` with custom limits.
pub fn render_into_with_config(
    vnode: &VNode,
    mount: &mut RenderedNode,
    eval_config: &EvalConfig,
    config: &ReconcileConfig,
) -> VdomResult<SyncStats> {
    let plain = evaluate_with_config(vnode, eval_config)?;
    let root = adapt_root(plain, mount);
    let stats = sync_with_config(&root, mount, config)?;
    log::debug!(
        "render into <{}>: {} compared, {} mutations ({} created, {} replaced, {} removed)",
        mount.tag(),
        stats.nodes_compared,
        stats.mutation_count(),
        stats.nodes_created,
        stats.nodes_replaced,
        stats.nodes_removed,
    );
    Ok(stats)
}

/// Wrap `plain` in a root that mirrors the mount point's tag and `id`.
fn adapt_root(plain: PlainNode, mount: &RenderedNode) -> PlainNode {
    let mut root = PlainElement::new(mount.tag()).child(plain);
    if let Some(id) = mount.dom_id() {
        root.props.set_prop("id", id);
    }
    root.into()
}

// =============================================================================
// Internal Context
// =============================================================================

struct SyncContext {
    depth: usize,
    limit: usize,
    stats: SyncStats,
}

impl SyncContext {
    fn new(limit: usize) -> Self {
        Self {
            depth: 0,
            limit,
            stats: SyncStats::default(),
        }
    }

    fn sync_node(&mut self, plain: &PlainNode, rendered: &mut RenderedNode) -> VdomResult<()> {
        if self.depth > self.limit {
            return Err(VdomError::depth(self.limit));
        }
        self.stats.nodes_compared += 1;

        match plain {
            PlainNode::Text(text) => self.sync_text(text, rendered),
            PlainNode::Element(elem) => {
                self.sync_props(elem, rendered);
                self.sync_key(elem, rendered);
                self.depth += 1;
                let result = self.sync_children(elem, rendered);
                self.depth -= 1;
                result?;
            }
        }
        Ok(())
    }

    fn sync_props(&mut self, elem: &PlainElement, rendered: &mut RenderedNode) {
        for (name, value) in &elem.props {
            if is_reserved(name) {
                continue;
            }
            if rendered.get_prop(name) != Some(value) {
                rendered.set_prop(name.clone(), value.clone());
                self.stats.props_set += 1;
            }
        }
    }

    fn sync_key(&mut self, elem: &PlainElement, rendered: &mut RenderedNode) {
        if let Some(key) = &elem.key
            && rendered.key() != Some(key.as_str())
        {
            rendered.set_key(key.clone());
            self.stats.keys_stamped += 1;
        }
    }

    fn sync_text(&mut self, text: &TextValue, rendered: &mut RenderedNode) {
        let content = text.to_content();
        if rendered.text() != content.as_str() {
            rendered.set_text(content);
            self.stats.texts_set += 1;
        }
    }

    fn sync_children(&mut self, elem: &PlainElement, rendered: &mut RenderedNode) -> VdomResult<()> {
        let virtual_len = elem.children.len();
        let common = virtual_len.min(rendered.child_count());

        for (index, child) in elem.children.iter().take(common).enumerate() {
            let Some(real) = rendered.child_mut(index) else {
                break;
            };
            if real.tag_matches(child.tag()) {
                self.sync_node(child, real)?;
            } else {
                let fresh = self.create_node(child)?;
                let old = rendered.replace_child(index, fresh);
                log::trace!("replace <{}> with <{}> at {}", old.tag(), child.tag(), index);
                self.stats.nodes_replaced += 1;
            }
        }

        for child in elem.children.iter().skip(common) {
            let fresh = self.create_node(child)?;
            log::trace!("append <{}>", child.tag());
            rendered.append_child(fresh);
            self.stats.nodes_created += 1;
        }

        // Highest index first so remaining positions stay valid
        while rendered.child_count() > virtual_len {
            let removed = rendered.remove_child(rendered.child_count() - 1);
            log::trace!("remove <{}>", removed.tag());
            self.stats.nodes_removed += 1;
        }

        Ok(())
    }

    fn create_node(&mut self, plain: &PlainNode) -> VdomResult<RenderedNode> {
        let mut node = match plain {
            PlainNode::Text(_) => RenderedNode::text_node(""),
            PlainNode::Element(elem) => RenderedNode::element(elem.tag.clone()),
        };
        self.sync_node(plain, &mut node)?;
        Ok(node)
    }
}
