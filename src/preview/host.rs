use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::config::CompositionConfig;
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::preview::fingerprint::FrameFingerprint;
use crate::preview::node::RenderNode;
use crate::synth::SynthesizedUnit;

/// Drives a [`SynthesizedUnit`] over the composition timeline.
///
/// Playback state (`play`, `pause`, `seek`, `step`, `tick`) only moves the playhead; frames are
/// produced by [`PreviewHost::render_frame`] / [`PreviewHost::render_current`].
#[derive(Debug)]
pub struct PreviewHost {
    unit: SynthesizedUnit,
    config: CompositionConfig,
    playhead: FrameIndex,
    playing: bool,
    looping: bool,
    cache: Option<HashMap<FrameIndex, RenderNode>>,
}

/// Outcome of [`PreviewHost::sweep`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PreviewStats {
    pub frames_rendered: u64,
    /// Number of distinct trees across the range.
    pub distinct_frames: u64,
    /// Frames rendered a second time to check stability.
    pub revisits: u64,
    /// Frames that rendered differently when revisited.
    pub unstable_frames: Vec<FrameIndex>,
    /// Largest tree seen, in nodes.
    pub max_nodes: usize,
    pub elapsed_ms: u64,
}

impl PreviewStats {
    pub fn is_stable(&self) -> bool {
        self.unstable_frames.is_empty()
    }
}

impl PreviewHost {
    pub fn new(unit: SynthesizedUnit, config: CompositionConfig) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self {
            unit,
            config,
            playhead: FrameIndex(0),
            playing: false,
            looping: true,
            cache: None,
        })
    }

    /// Keep rendered frames in memory so revisits skip evaluation.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(HashMap::new);
        self
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn unit(&self) -> &SynthesizedUnit {
        &self.unit
    }

    pub fn current_frame(&self) -> FrameIndex {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn last_frame(&self) -> u64 {
        self.config.duration_in_frames.saturating_sub(1)
    }

    /// Move the playhead, clamped to the timeline.
    pub fn seek(&mut self, frame: FrameIndex) -> FrameIndex {
        self.playhead = FrameIndex(frame.0.min(self.last_frame()));
        self.playhead
    }

    /// Move the playhead by `delta` frames; wraps when looping, clamps otherwise.
    pub fn step(&mut self, delta: i64) -> FrameIndex {
        let len = i128::from(self.config.duration_in_frames);
        let target = i128::from(self.playhead.0) + i128::from(delta);
        let next = if self.looping {
            target.rem_euclid(len)
        } else {
            target.clamp(0, len - 1)
        };
        self.playhead = FrameIndex(next as u64);
        self.playhead
    }

    /// Advance one frame if playing. At the end of the timeline playback wraps to frame 0 when
    /// looping and pauses on the last frame otherwise.
    pub fn tick(&mut self) -> FrameIndex {
        if !self.playing {
            return self.playhead;
        }
        if self.playhead.0 >= self.last_frame() {
            if self.looping {
                self.playhead = FrameIndex(0);
            } else {
                self.playing = false;
            }
        } else {
            self.playhead = FrameIndex(self.playhead.0 + 1);
        }
        self.playhead
    }

    /// Render `frame`, serving it from the cache when enabled.
    pub fn render_frame(&mut self, frame: FrameIndex) -> ReelResult<RenderNode> {
        if frame.0 >= self.config.duration_in_frames {
            return Err(ReelError::validation(format!(
                "frame {} is outside the {}-frame timeline",
                frame.0, self.config.duration_in_frames
            )));
        }
        if let Some(node) = self.cache.as_ref().and_then(|c| c.get(&frame)) {
            return Ok(node.clone());
        }
        let node = self.unit.render(frame, &self.config)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(frame, node.clone());
        }
        Ok(node)
    }

    pub fn render_current(&mut self) -> ReelResult<RenderNode> {
        self.render_frame(self.playhead)
    }

    /// Render every frame of `range`, then revisit them in reverse order and compare
    /// fingerprints. The cache is bypassed.
    #[tracing::instrument(level = "info", skip(self), fields(start = range.start.0, end = range.end.0))]
    pub fn sweep(&mut self, range: FrameRange) -> ReelResult<PreviewStats> {
        if range.end.0 > self.config.duration_in_frames {
            return Err(ReelError::validation(format!(
                "sweep range ends at {} but the timeline has {} frames",
                range.end.0, self.config.duration_in_frames
            )));
        }
        let started = Instant::now();
        let mut stats = PreviewStats::default();
        let mut seen: Vec<(FrameIndex, FrameFingerprint)> = Vec::new();

        for frame in range.iter() {
            let node = self.unit.render(frame, &self.config)?;
            stats.frames_rendered += 1;
            stats.max_nodes = stats.max_nodes.max(node.node_count());
            seen.push((frame, node.fingerprint()));
        }
        for &(frame, expected) in seen.iter().rev() {
            let again = self.unit.render(frame, &self.config)?;
            stats.revisits += 1;
            if again.fingerprint() != expected {
                tracing::warn!(frame = frame.0, "frame rendered differently when revisited");
                stats.unstable_frames.push(frame);
            }
        }
        stats.unstable_frames.sort();
        stats.distinct_frames = seen
            .iter()
            .map(|(_, fp)| *fp)
            .collect::<HashSet<_>>()
            .len() as u64;
        stats.elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            frames = stats.frames_rendered,
            distinct = stats.distinct_frames,
            unstable = stats.unstable_frames.len(),
            "preview sweep finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/host.rs"]
mod tests;
