use serde_json::Value as Json;
use xxhash_rust::xxh3::Xxh3;

use crate::preview::node::RenderNode;

const XXH3_SEED: u64 = 0x5f3c_91a2_d8e4_b071;

/// 128-bit digest of a resolved frame, used to compare revisited frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FrameFingerprint {
    pub hi: u64,
    pub lo: u64,
}

pub(crate) fn fingerprint_tree(node: &RenderNode) -> FrameFingerprint {
    let mut h = StableHasher::new();
    write_node(&mut h, node);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_node(h: &mut StableHasher, node: &RenderNode) {
    match node {
        RenderNode::Text { text } => {
            h.write_u8(0);
            h.write_str(text);
        }
        RenderNode::Element {
            tag,
            props,
            children,
        } => {
            h.write_u8(1);
            h.write_str(tag);
            h.write_u64(props.len() as u64);
            for (k, v) in props {
                h.write_str(k);
                write_json(h, v);
            }
            h.write_u64(children.len() as u64);
            for child in children {
                write_node(h, child);
            }
        }
    }
}

fn write_json(h: &mut StableHasher, v: &Json) {
    match v {
        Json::Null => h.write_u8(0),
        Json::Bool(b) => {
            h.write_u8(1);
            h.write_u8(u8::from(*b));
        }
        Json::Number(n) => {
            h.write_u8(2);
            h.write_str(&n.to_string());
        }
        Json::String(s) => {
            h.write_u8(3);
            h.write_str(s);
        }
        Json::Array(items) => {
            h.write_u8(4);
            h.write_u64(items.len() as u64);
            for item in items {
                write_json(h, item);
            }
        }
        Json::Object(map) => {
            h.write_u8(5);
            h.write_u64(map.len() as u64);
            for (k, v) in map {
                h.write_str(k);
                write_json(h, v);
            }
        }
    }
}
