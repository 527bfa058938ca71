use std::ops::Deref;

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};
use tracing::trace;

/// Kind of a top-level node in a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        /// Whitespace-normalized text content of the whole subtree.
        text: String,
    },
    Text(String),
    Comment(String),
}

/// One top-level sibling node together with its serialized markup.
///
/// Nested structure is kept inside `html` and never split further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentNode {
    pub kind: NodeKind,
    pub html: String,
}

impl FragmentNode {
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Visible text of the node, whitespace-normalized.
    pub fn text(&self) -> String {
        match &self.kind {
            NodeKind::Element { text, .. } => text.clone(),
            NodeKind::Text(text) => normalize_whitespace(text),
            NodeKind::Comment(_) => String::new(),
        }
    }

    /// Text or comment nodes that render nothing.
    pub fn is_blank(&self) -> bool {
        match &self.kind {
            NodeKind::Element { .. } => false,
            NodeKind::Text(text) => text.trim().is_empty(),
            NodeKind::Comment(_) => true,
        }
    }

    /// Parsed `style` attribute as ordered (property, value) pairs.
    pub fn inline_style(&self) -> Vec<(String, String)> {
        self.attr("style").map(parse_inline_style).unwrap_or_default()
    }
}

/// An HTML fragment split into its top-level sibling nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub nodes: Vec<FragmentNode>,
}

impl Fragment {
    /// Parse markup leniently; malformed input is recovered by the HTML parser
    /// and never fails.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_fragment(html);
        let root = document.root_element();
        let nodes: Vec<FragmentNode> = root.children().filter_map(convert_node).collect();
        trace!(count = nodes.len(), "parsed fragment");
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize the nodes back into markup.
    pub fn to_html(&self) -> String {
        join_html(&self.nodes)
    }
}

/// Concatenate the markup of a run of nodes.
pub fn join_html(nodes: &[FragmentNode]) -> String {
    nodes.iter().map(|node| node.html.as_str()).collect()
}

fn convert_node(node: NodeRef<'_, Node>) -> Option<FragmentNode> {
    match node.value() {
        Node::Element(element) => {
            let element_ref = ElementRef::wrap(node)?;
            let attributes = element
                .attrs()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();
            Some(FragmentNode {
                kind: NodeKind::Element {
                    tag: element.name().to_ascii_lowercase(),
                    attributes,
                    text: normalize_whitespace(&collect_text(&node)),
                },
                html: element_ref.html(),
            })
        }
        Node::Text(text) => {
            let raw = text.deref().to_string();
            Some(FragmentNode {
                html: escape_text(&raw),
                kind: NodeKind::Text(raw),
            })
        }
        Node::Comment(comment) => {
            let raw = comment.deref().to_string();
            Some(FragmentNode {
                html: format!("<!--{}-->", raw),
                kind: NodeKind::Comment(raw),
            })
        }
        _ => None,
    }
}

/// Split a `style` attribute into (property, value) pairs, lowercasing property names.
pub fn parse_inline_style(source: &str) -> Vec<(String, String)> {
    source
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

fn collect_text(node: &NodeRef<Node>) -> String {
    match node.value() {
        Node::Text(text) => text.deref().to_string(),
        _ => {
            let mut content = String::new();
            for child in node.children() {
                content.push_str(&collect_text(&child));
            }
            content
        }
    }
}

fn normalize_whitespace(input: &str) -> String {
    let mut result = String::new();
    let mut prev_was_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                if !result.is_empty() {
                    result.push(' ');
                }
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result.trim().to_string()
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_top_level_siblings_only() {
        let fragment = Fragment::parse("<h1>Title</h1><div><p>a</p><p>b</p></div><p>tail</p>");
        let tags: Vec<_> = fragment.nodes.iter().filter_map(|n| n.tag()).collect();
        assert_eq!(tags, vec!["h1", "div", "p"]);
        assert_eq!(fragment.nodes[1].text(), "a b");
    }

    #[test]
    fn keeps_text_and_comment_nodes() {
        let fragment = Fragment::parse("lead <b>bold</b><!-- note --> trail");
        assert_eq!(fragment.len(), 4);
        assert!(matches!(fragment.nodes[0].kind, NodeKind::Text(_)));
        assert!(matches!(fragment.nodes[2].kind, NodeKind::Comment(_)));
        assert!(fragment.nodes[2].is_blank());
        assert_eq!(fragment.nodes[3].text(), "trail");
    }

    #[test]
    fn text_is_escaped_on_serialization() {
        let fragment = Fragment::parse("a &lt; b &amp; c");
        assert_eq!(fragment.to_html(), "a &lt; b &amp; c");
    }

    #[test]
    fn reparsing_serialized_markup_is_stable() {
        let source = "<section id=\"s\"><p>one</p></section>\n<p class=\"x\">two</p>";
        let first = Fragment::parse(source);
        let second = Fragment::parse(&first.to_html());
        assert_eq!(first, second);
    }

    #[test]
    fn parses_inline_style_declarations() {
        let style = parse_inline_style("Height: 120px; margin-top:4px;;bogus; color: red");
        assert_eq!(
            style,
            vec![
                ("height".to_string(), "120px".to_string()),
                ("margin-top".to_string(), "4px".to_string()),
                ("color".to_string(), "red".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        let fragment = Fragment::parse("<div><p>unclosed <span>deep</div></td><p>after");
        assert!(!fragment.is_empty());
        assert!(fragment.to_html().contains("after"));
    }
}
