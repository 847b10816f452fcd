//! HTML Rendering
//!
//! Serializes rendered trees (and evaluated trees) to HTML strings, for
//! debugging output and assertions.

use crate::attr::Props;
use crate::dom::RenderedNode;
use crate::node::PlainNode;

// =============================================================================
// RenderConfig
// =============================================================================

/// Default attribute name for node ids.
pub const DEFAULT_NODE_ID_ATTR: &str = "data-node-id";

/// Attribute name for stamped keys.
pub const KEY_ATTR: &str = "data-key";

/// Configuration for HTML rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to emit node id attributes.
    pub emit_node_ids: bool,
    /// Whether to emit stamped keys.
    pub emit_keys: bool,
    /// Attribute name for node ids (default: "data-node-id").
    pub id_attr_name: String,
}

impl RenderConfig {
    /// Debug config (node ids and keys).
    pub const DEBUG: Self = Self {
        emit_node_ids: true,
        emit_keys: true,
        id_attr_name: String::new(), // Will use DEFAULT_NODE_ID_ATTR
    };

    /// Plain markup, no debug attributes.
    pub const PLAIN: Self = Self {
        emit_node_ids: false,
        emit_keys: false,
        id_attr_name: String::new(),
    };

    /// Create a new config.
    pub fn new(emit_node_ids: bool, emit_keys: bool) -> Self {
        Self {
            emit_node_ids,
            emit_keys,
            id_attr_name: DEFAULT_NODE_ID_ATTR.to_string(),
        }
    }

    /// Set custom attribute name for node ids.
    pub fn with_id_attr(mut self, attr_name: impl Into<String>) -> Self {
        self.id_attr_name = attr_name.into();
        self
    }

    /// Get the attribute name for node ids.
    pub fn id_attr(&self) -> &str {
        if self.id_attr_name.is_empty() {
            DEFAULT_NODE_ID_ATTR
        } else {
            &self.id_attr_name
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::PLAIN
    }
}

// =============================================================================
// Rendered tree
// =============================================================================

/// Render a live node and its subtree to HTML.
pub fn to_html(node: &RenderedNode) -> String {
    to_html_with_config(node, &RenderConfig::default())
}

/// Render a live node to HTML with debug options.
pub fn to_html_with_config(node: &RenderedNode, config: &RenderConfig) -> String {
    let mut output = String::new();
    render_rendered(node, config, &mut output);
    output
}

fn render_rendered(node: &RenderedNode, config: &RenderConfig, output: &mut String) {
    if node.is_text() {
        output.push_str(&escape_html(node.text()));
        return;
    }

    output.push('<');
    output.push_str(node.tag());
    render_attrs(node.props(), output);

    if config.emit_node_ids {
        push_attr(output, config.id_attr(), &node.id().to_string());
    }
    if config.emit_keys
        && let Some(key) = node.key()
    {
        push_attr(output, KEY_ATTR, key);
    }

    if is_void_element(node.tag()) {
        output.push_str(" />");
        return;
    }
    output.push('>');

    for child in node.children() {
        render_rendered(child, config, output);
    }

    output.push_str("</");
    output.push_str(node.tag());
    output.push('>');
}

// =============================================================================
// Evaluated tree
// =============================================================================

/// Render an evaluated tree to HTML without reconciling it.
pub fn plain_to_html(node: &PlainNode) -> String {
    let mut output = String::new();
    render_plain(node, &mut output);
    output
}

fn render_plain(node: &PlainNode, output: &mut String) {
    match node {
        PlainNode::Text(text) => output.push_str(&escape_html(&text.to_content())),
        PlainNode::Element(elem) => {
            output.push('<');
            output.push_str(&elem.tag);
            render_attrs(&elem.props, output);
            if is_void_element(&elem.tag) {
                output.push_str(" />");
                return;
            }
            output.push('>');
            for child in &elem.children {
                render_plain(child, output);
            }
            output.push_str("</");
            output.push_str(&elem.tag);
            output.push('>');
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Render props as attributes. Handlers and `false` flags are skipped;
/// `true` flags render as bare attributes.
fn render_attrs(props: &Props, output: &mut String) {
    for (name, value) in props.iter() {
        match value.to_attr_value() {
            Some(v) if v.is_empty() && value.as_bool() == Some(true) => {
                output.push(' ');
                output.push_str(name);
            }
            Some(v) => push_attr(output, name, &v),
            None => {}
        }
    }
}

fn push_attr(output: &mut String, name: &str, value: &str) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    output.push_str(&escape_attr(value));
    output.push('"');
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Check if element is a void element (self-closing).
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Callback;
    use crate::node::{PlainElement, TextValue};
    use crate::reconcile::create;

    fn sample() -> PlainNode {
        PlainElement::new("article")
            .prop("class", "lot favorite")
            .prop("onclick", Callback::new(|| {}))
            .child(PlainElement::new("div").prop("class", "price").text(15_i64))
            .child(PlainElement::new("img").prop("src", "logo.jpg").prop("alt", ""))
            .child(PlainElement::new("button").prop("disabled", true).prop("hidden", false).text("Fav & co"))
            .with_key("1")
            .into()
    }

    #[test]
    fn test_render_plain_tree() {
        let html = plain_to_html(&sample());
        assert_eq!(
            html,
            "<article class=\"lot favorite\"><div class=\"price\">15</div>\
             <img src=\"logo.jpg\" alt=\"\" /><button disabled>Fav &amp; co</button></article>"
        );
    }

    #[test]
    fn test_render_rendered_matches_plain() {
        let plain = sample();
        let node = create(&plain).unwrap();
        assert_eq!(to_html(&node), plain_to_html(&plain));
    }

    #[test]
    fn test_render_debug_attrs() {
        let node = create(&sample()).unwrap();
        let html = to_html_with_config(&node, &RenderConfig::DEBUG);
        assert!(html.contains(&format!("data-node-id=\"{}\"", node.id())));
        assert!(html.contains("data-key=\"1\""));

        let custom = RenderConfig::new(true, false).with_id_attr("data-x");
        let html = to_html_with_config(&node, &custom);
        assert!(html.contains("data-x="));
        assert!(!html.contains("data-key"));
    }

    #[test]
    fn test_render_text_root() {
        let node = create(&PlainNode::Text(TextValue::from("<b>"))).unwrap();
        assert_eq!(to_html(&node), "&lt;b&gt;");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_attr("a \"b\""), "a &quot;b&quot;");
    }
}
