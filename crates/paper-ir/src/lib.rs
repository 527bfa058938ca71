//! Markup model for paper content.
//!
//! Page content is opaque HTML; the only structure the viewer relies on is the
//! ordered list of top-level sibling nodes, which is what pagination slices.

pub mod html;

pub use html::{Fragment, FragmentNode, NodeKind, join_html, parse_inline_style};
