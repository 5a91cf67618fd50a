use serde_json::{Map, Value as Json};

use crate::preview::fingerprint::{FrameFingerprint, fingerprint_tree};

/// One resolved frame: host elements with JSON props, and text leaves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "Map::is_empty")]
        props: Map<String, Json>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<RenderNode>,
    },
    Text {
        text: String,
    },
}

impl RenderNode {
    pub fn element(tag: impl Into<String>, props: Map<String, Json>, children: Vec<RenderNode>) -> Self {
        Self::Element {
            tag: tag.into(),
            props,
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Element tag; `None` for text.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Text { .. } => None,
        }
    }

    pub fn props(&self) -> Option<&Map<String, Json>> {
        match self {
            Self::Element { props, .. } => Some(props),
            Self::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text { .. } => &[],
        }
    }

    /// All text in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { text } => out.push_str(text),
            Self::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// First element with `tag`, depth first.
    pub fn find_tag(&self, tag: &str) -> Option<&RenderNode> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_tag(tag))
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(RenderNode::node_count).sum::<usize>()
    }

    pub fn fingerprint(&self) -> FrameFingerprint {
        fingerprint_tree(self)
    }
}
