//! Preview host: per-frame invocation of a synthesized component and the resolved frame tree.
//!
//! Host primitives resolve as follows:
//! - `AbsoluteFill` becomes a full-frame flex column `div`; user styles override the defaults.
//! - `Sequence` shifts the frame its subtree sees by `from` and renders it only inside
//!   `[from, from + durationInFrames)`.
//! - `Img` becomes `img`.
//!
//! Function-valued props are dropped; a frame tree is plain JSON.

pub mod fingerprint;
pub mod host;
pub mod node;
pub(crate) mod resolve;

pub use fingerprint::FrameFingerprint;
pub use host::{PreviewHost, PreviewStats};
pub use node::RenderNode;
