//! Virtual node evaluation
//!
//! Resolves every component reference in a virtual tree, producing a
//! [`PlainNode`] tree the reconciler can walk.
//!
//! # Rules
//!
//! - Text is returned unchanged.
//! - A component is called with its props and the result is evaluated
//!   again, so components may return other components.
//! - An element keeps its tag, props and key; every child is evaluated.
//!
//! Evaluation is pure: it never touches the rendered tree. Component chains
//! and element nesting share one depth budget, so a component that returns
//! itself fails with [`VdomError::DepthExceeded`] instead of overflowing the
//! stack.

use crate::attr::is_reserved;
use crate::error::{VdomError, VdomResult};
use crate::node::{PlainChildren, PlainElement, PlainNode, VElement, VNode};

/// Default depth budget for evaluation.
const DEFAULT_MAX_DEPTH: usize = 256;

// =============================================================================
// EvalConfig
// =============================================================================

/// Configuration for evaluation limits.
#[derive(Debug, Clone, Copy)]
pub struct EvalConfig {
    /// Maximum combined depth of element nesting and component resolution.
    /// Default: 256
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvalConfig {
    /// Create config with a custom depth limit.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Evaluate a virtual tree with the default configuration.
pub fn evaluate(node: &VNode) -> VdomResult<PlainNode> {
    evaluate_with_config(node, &EvalConfig::default())
}

/// Evaluate a virtual tree with custom limits.
pub fn evaluate_with_config(node: &VNode, config: &EvalConfig) -> VdomResult<PlainNode> {
    Evaluator { limit: config.max_depth }.eval(node, 0)
}

/// Check that a tag name is non-empty and looks like a tag.
///
/// Accepts an ASCII letter followed by letters, digits, `-`, `_` or `:`
/// (custom elements such as `ion-icon` included).
pub fn validate_tag(tag: &str) -> VdomResult<()> {
    let mut chars = tag.chars();
    match chars.next() {
        None => Err(VdomError::EmptyTag),
        Some(first) if !first.is_ascii_alphabetic() => Err(VdomError::invalid_tag(tag)),
        Some(_) => {
            if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')) {
                Ok(())
            } else {
                Err(VdomError::invalid_tag(tag))
            }
        }
    }
}

// =============================================================================
// Internal
// =============================================================================

struct Evaluator {
    limit: usize,
}

impl Evaluator {
    fn eval(&self, node: &VNode, depth: usize) -> VdomResult<PlainNode> {
        if depth > self.limit {
            return Err(VdomError::depth(self.limit));
        }

        match node {
            VNode::Text(text) => Ok(PlainNode::Text(text.clone())),
            VNode::Component(component) => {
                log::trace!("resolve component {}", component.component.name());
                let mut rendered = component.resolve();
                // The reference's key carries over unless the output sets its own
                if let (Some(key), VNode::Element(elem)) = (&component.key, &mut rendered)
                    && elem.key.is_none()
                {
                    elem.key = Some(key.clone());
                }
                self.eval(&rendered, depth + 1)
            }
            VNode::Element(elem) => self.eval_element(elem, depth).map(PlainNode::from),
        }
    }

    fn eval_element(&self, elem: &VElement, depth: usize) -> VdomResult<PlainElement> {
        validate_tag(&elem.tag)?;
        if let Some((name, _)) = elem.props.iter().find(|(name, _)| is_reserved(name)) {
            return Err(VdomError::ReservedProp(name.to_string()));
        }

        let children = elem
            .children
            .iter()
            .map(|child| self.eval(child, depth + 1))
            .collect::<VdomResult<PlainChildren>>()?;

        Ok(PlainElement {
            tag: elem.tag.clone(),
            props: elem.props.clone(),
            children,
            key: elem.key.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Props, PropsExt};
    use crate::node::{Component, TextValue};

    #[test]
    fn test_text_unchanged() {
        let plain = evaluate(&VNode::from(5_i64)).unwrap();
        assert_eq!(plain, PlainNode::Text(TextValue::Num(5.0)));

        let plain = evaluate(&VNode::from("Apple")).unwrap();
        assert_eq!(plain, PlainNode::Text(TextValue::from("Apple")));
    }

    #[test]
    fn test_component_chain_resolves() {
        let leaf = Component::new("Leaf", |props: &Props| {
            VElement::new("span")
                .text(props.get_str("label").unwrap_or_default().to_string())
                .into()
        });
        let middle = Component::new("Middle", move |props: &Props| {
            let label = props.get_str("label").unwrap_or_default().to_string();
            leaf.el().prop("label", label).into()
        });
        let outer = Component::new("Outer", move |_: &Props| middle.el().prop("label", "deep").into());

        let plain = evaluate(&outer.el().into()).unwrap();
        let span = plain.as_element().unwrap();
        assert_eq!(span.tag, "span");
        assert_eq!(plain.text_content(), "deep");
    }

    #[test]
    fn test_nested_components_in_children() {
        let item = Component::new("Item", |props: &Props| {
            VElement::new("li").text(props.get_num("n").unwrap_or(0.0)).into()
        });
        let tree: VNode = VElement::new("ul")
            .children((1..=3).map(|n| item.el().prop("n", n as f64).with_key(n.to_string())))
            .into();

        let plain = evaluate(&tree).unwrap();
        let ul = plain.as_element().unwrap();
        assert_eq!(ul.children.len(), 3);
        assert!(ul.children.iter().all(|c| c.tag() == "li"));
        assert_eq!(plain.text_content(), "123");
    }

    #[test]
    fn test_component_key_carried_over() {
        let item = Component::new("Item", |_| VElement::new("li").into());
        let plain = evaluate(&item.el().with_key("7").into()).unwrap();
        assert_eq!(plain.key(), Some("7"));

        let keyed = Component::new("Keyed", |_| VElement::new("li").with_key("own").into());
        let plain = evaluate(&keyed.el().with_key("7").into()).unwrap();
        assert_eq!(plain.key(), Some("own"));
    }

    #[test]
    fn test_single_child_normalized() {
        let tree: VNode = VElement::new("div").child("only").into();
        let plain = evaluate(&tree).unwrap();
        assert_eq!(plain.as_element().unwrap().children.len(), 1);
    }

    #[test]
    fn test_self_recursive_component_errors() {
        fn looping(_: &Props) -> VNode {
            Component::new("Loop", looping).el().into()
        }
        let tree: VNode = Component::new("Loop", looping).el().into();

        let err = evaluate_with_config(&tree, &EvalConfig::new(32)).unwrap_err();
        assert_eq!(err, VdomError::DepthExceeded { limit: 32 });
    }

    #[test]
    fn test_deep_nesting_errors() {
        let mut tree = VElement::new("div");
        for _ in 0..10 {
            tree = VElement::new("div").child(tree);
        }
        let tree: VNode = tree.into();

        assert!(evaluate_with_config(&tree, &EvalConfig::new(20)).is_ok());
        assert!(matches!(
            evaluate_with_config(&tree, &EvalConfig::new(5)),
            Err(VdomError::DepthExceeded { limit: 5 })
        ));
    }

    #[test]
    fn test_malformed_elements_rejected() {
        let empty: VNode = VElement::new("").into();
        assert_eq!(evaluate(&empty).unwrap_err(), VdomError::EmptyTag);

        let bad: VNode = VElement::new("div").child(VElement::new("1x")).into();
        assert_eq!(evaluate(&bad).unwrap_err(), VdomError::invalid_tag("1x"));

        let spaced: VNode = VElement::new("my tag").into();
        assert!(matches!(evaluate(&spaced), Err(VdomError::InvalidTag(_))));

        let mut reserved = VElement::new("div");
        reserved.props.set_prop("key", "1");
        assert_eq!(
            evaluate(&reserved.into()).unwrap_err(),
            VdomError::ReservedProp("key".to_string())
        );
    }

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("div").is_ok());
        assert!(validate_tag("ion-icon").is_ok());
        assert!(validate_tag("svg:path").is_ok());
        assert!(validate_tag("h1").is_ok());
        assert!(validate_tag("-x").is_err());
    }
}
