//! Prelude module for common imports.
//!
//! ```ignore
//! use auction_vdom::prelude::*;
//! ```

// Node types
pub use crate::node::{
    Children, Component, ComponentRef, PlainChildren, PlainElement, PlainNode, TextValue, VElement, VNode,
};

// Attributes
pub use crate::attr::{Callback, PropValue, Props, PropsExt};

// Evaluation
pub use crate::eval::{EvalConfig, evaluate, evaluate_with_config};

// Rendered tree
pub use crate::dom::{NodeId, RenderedNode};

// Reconciliation
pub use crate::reconcile::{
    ReconcileConfig, SyncStats, create, render_into, render_into_with_config, sync, sync_with_config,
};

// Render
pub use crate::render::{RenderConfig, plain_to_html, to_html, to_html_with_config};

// Store
pub use crate::store::{Store, SubscriptionId};

// Error
pub use crate::error::{VdomError, VdomResult};
