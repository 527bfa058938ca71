//! Offscreen measurement of markup.

use paper_ir::{FragmentNode, NodeKind};
use unicode_linebreak::{BreakOpportunity, linebreaks};
use unicode_segmentation::UnicodeSegmentation;

use crate::surface::parse_px;

/// Measures the rendered height of top-level nodes stacked in a container of
/// a given width, the way an offscreen hidden container would.
pub trait LayoutProbe {
    fn measure(&mut self, nodes: &[FragmentNode], width: f64) -> f64;
}

impl<F> LayoutProbe for F
where
    F: FnMut(&[FragmentNode], f64) -> f64,
{
    fn measure(&mut self, nodes: &[FragmentNode], width: f64) -> f64 {
        self(nodes, width)
    }
}

/// Deterministic block-flow estimator.
///
/// Each element is a block. An explicit inline `height` wins; otherwise its
/// text is wrapped at UAX-14 break opportunities using a fixed glyph advance.
/// Inline margins and paddings are added on top. Blank text and comments take
/// no space.
#[derive(Debug, Clone, Copy)]
pub struct TextFlowProbe {
    pub line_height: f64,
    pub glyph_width: f64,
}

impl Default for TextFlowProbe {
    fn default() -> Self {
        Self {
            line_height: 24.0,
            glyph_width: 8.0,
        }
    }
}

impl TextFlowProbe {
    pub fn new(line_height: f64, glyph_width: f64) -> Self {
        Self {
            line_height,
            glyph_width,
        }
    }

    pub fn node_height(&self, node: &FragmentNode, width: f64) -> f64 {
        if node.is_blank() {
            return 0.0;
        }
        match &node.kind {
            NodeKind::Text(text) => self.count_lines(text.trim(), width) as f64 * self.line_height,
            NodeKind::Comment(_) => 0.0,
            NodeKind::Element { tag, .. } => {
                let style = node.inline_style();
                let px = |name: &str| {
                    style
                        .iter()
                        .rev()
                        .find(|(key, _)| key == name)
                        .and_then(|(_, value)| parse_px(value))
                };
                let edge = |name: &str| {
                    px(&format!("{name}-top")).or_else(|| px(name)).unwrap_or(0.0)
                        + px(&format!("{name}-bottom")).or_else(|| px(name)).unwrap_or(0.0)
                };
                let content = px("height")
                    .or_else(|| node.attr("height").and_then(parse_px))
                    .unwrap_or_else(|| match tag.as_str() {
                        "br" | "hr" => self.line_height,
                        _ => {
                            let inner = (width - edge("padding")).max(self.glyph_width);
                            self.count_lines(&node.text(), inner) as f64
                                * self.line_height
                                * heading_scale(tag)
                        }
                    });
                content + edge("margin") + edge("padding")
            }
        }
    }

    /// Number of lines `text` wraps to in `width` pixels.
    pub fn count_lines(&self, text: &str, width: f64) -> usize {
        if text.is_empty() {
            return 0;
        }
        let columns = ((width / self.glyph_width).floor() as usize).max(1);
        let mut lines = 1;
        let mut column = 0;
        let mut start = 0;

        for (offset, opportunity) in linebreaks(text) {
            let segment = &text[start..offset];
            start = offset;
            let visible = segment.trim_end().graphemes(true).count();
            let total = segment.graphemes(true).count();

            if column > 0 && column + visible > columns {
                lines += 1;
                column = 0;
            }
            if visible > columns {
                // a word longer than the line breaks anywhere
                let extra = (visible - 1) / columns;
                lines += extra;
                column = visible - extra * columns + (total - visible);
            } else {
                column += total;
            }

            if opportunity == BreakOpportunity::Mandatory && offset < text.len() {
                lines += 1;
                column = 0;
            }
        }
        lines
    }
}

fn heading_scale(tag: &str) -> f64 {
    match tag {
        "h1" => 2.0,
        "h2" => 1.5,
        "h3" => 1.25,
        _ => 1.0,
    }
}

impl LayoutProbe for TextFlowProbe {
    fn measure(&mut self, nodes: &[FragmentNode], width: f64) -> f64 {
        nodes.iter().map(|node| self.node_height(node, width)).sum()
    }
}
