//! Prompt assembly: fixed ruleset + the user's request.

use crate::capabilities::CAPABILITY_NAMES;
use crate::config::CompositionConfig;

/// Build the full instruction string sent to the generation process.
///
/// Deterministic and infallible: the ruleset is rendered from `config` so the model is told the
/// same duration, frame rate and resolution that preview and export will use.
pub fn assemble_prompt(description: &str, config: &CompositionConfig) -> String {
    let secs = format_secs(config.duration_secs());
    let mut out = ruleset(config);
    out.push_str("\n\nCreate a ");
    out.push_str(&secs);
    out.push_str("-second marketing video component for: ");
    out.push_str(description);
    out
}

fn ruleset(config: &CompositionConfig) -> String {
    let secs = format_secs(config.duration_secs());
    let frames = config.duration_in_frames;
    let fps = config.fps.to_literal();
    let (w, h) = (config.width, config.height);
    let capabilities = CAPABILITY_NAMES.join(", ");

    format!(
        "You are a Remotion video component generator. Given a description of a marketing video, \
generate a single React component that uses Remotion primitives to create the described animation.

Rules:
- Export a default React.FC component
- Use these imports (they will be injected, do NOT include import statements):
  {capabilities}
- The video is {w}x{h} at {fps}fps, {frames} frames total ({secs} seconds)
- Use spring() for bounce/entrance animations
- Use interpolate() with {{ extrapolateRight: \"clamp\" }} for smooth transitions
- Use <Sequence from={{X}} durationInFrames={{Y}}> for scene transitions
- Use <AbsoluteFill> for full-screen positioning
- Keep it to 3-4 scenes max for a {secs}-second video ({frames} frames)
- Use inline styles (no CSS imports)
- Make it visually polished: dark backgrounds (#0b1215, #1a1a2e), clean typography (system fonts), smooth animations
- Do NOT use any external dependencies beyond Remotion primitives
- Do NOT use Img or any image loading
- Return ONLY the raw component code
- Do NOT wrap the code in markdown code fences or backticks
- Do NOT include any explanation or commentary
- The component must be a function expression assigned to a variable or a named function declaration, then exported as default
- Example structure:
  const MyVideo: React.FC = () => {{ ... }};
  export default MyVideo;"
    )
}

fn format_secs(secs: f64) -> String {
    if secs.fract() == 0.0 {
        format!("{}", secs as u64)
    } else {
        format!("{secs:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Fps;

    #[test]
    fn prompt_ends_with_user_text_and_carries_constants() {
        let p = assemble_prompt("Say hello", &CompositionConfig::default());
        assert!(p.ends_with("Create a 10-second marketing video component for: Say hello"));
        assert!(p.contains("1920x1080 at 30fps, 300 frames total (10 seconds)"));
        assert!(p.contains(
            "React, AbsoluteFill, useCurrentFrame, useVideoConfig, spring, interpolate, Sequence, Img"
        ));
        assert!(p.contains("Do NOT wrap the code in markdown code fences"));
    }

    #[test]
    fn prompt_follows_the_composition_config() {
        let cfg = CompositionConfig {
            duration_in_frames: 150,
            fps: Fps::whole(60),
            width: 1080,
            height: 1920,
            ..CompositionConfig::default()
        };
        let p = assemble_prompt("x", &cfg);
        assert!(p.contains("1080x1920 at 60fps, 150 frames total (2.5 seconds)"));
        assert!(p.contains("Create a 2.5-second marketing video"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let cfg = CompositionConfig::default();
        assert_eq!(assemble_prompt("a", &cfg), assemble_prompt("a", &cfg));
    }
}
