//! Events from the host's section navigation.

use serde::{Deserialize, Serialize};

use crate::toolbar::ButtonName;

/// A section tab became active.
///
/// Identifiers may be given as link targets (`#paper-report`) or bare ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabShown {
    pub target: String,
    /// The tab that was active before, if any.
    pub related: Option<String>,
}

impl TabShown {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            related: None,
        }
    }

    pub fn with_related(mut self, related: impl Into<String>) -> Self {
        self.related = Some(related.into());
        self
    }

    pub fn target_id(&self) -> &str {
        strip_anchor(&self.target)
    }

    pub fn related_id(&self) -> Option<&str> {
        self.related.as_deref().map(strip_anchor)
    }
}

fn strip_anchor(id: &str) -> &str {
    let id = id.trim();
    id.strip_prefix('#').unwrap_or(id)
}

/// Which bottom navigation control was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomNavSide {
    Previous,
    Next,
}

impl BottomNavSide {
    /// The toolbar button the control stands in for.
    pub fn button(self) -> ButtonName {
        match self {
            Self::Previous => ButtonName::Previous,
            Self::Next => ButtonName::Next,
        }
    }
}
