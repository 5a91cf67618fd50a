use super::*;
use crate::synth::synthesize;

const TICKER: &str = r#"
export default function Ticker() {
  const frame = useCurrentFrame();
  return <AbsoluteFill><p>{Math.floor(frame / 10)}</p></AbsoluteFill>;
}
"#;

fn short_config() -> CompositionConfig {
    CompositionConfig {
        duration_in_frames: 30,
        ..CompositionConfig::default()
    }
}

fn host(src: &str) -> PreviewHost {
    let config = short_config();
    let unit = synthesize(src, &config).expect("component");
    PreviewHost::new(unit, config).unwrap()
}

#[test]
fn seek_and_step() {
    let mut h = host(TICKER);
    assert_eq!(h.current_frame(), FrameIndex(0));
    assert_eq!(h.seek(FrameIndex(100)), FrameIndex(29));
    assert_eq!(h.step(1), FrameIndex(0));
    assert_eq!(h.step(-2), FrameIndex(28));

    h.set_looping(false);
    assert_eq!(h.step(5), FrameIndex(29));
    h.seek(FrameIndex(1));
    assert_eq!(h.step(-5), FrameIndex(0));
}

#[test]
fn tick_loops_or_stops() {
    let mut h = host(TICKER);
    assert_eq!(h.tick(), FrameIndex(0), "paused hosts do not advance");
    h.play();
    h.seek(FrameIndex(28));
    assert_eq!(h.tick(), FrameIndex(29));
    assert_eq!(h.tick(), FrameIndex(0));
    assert!(h.is_playing());

    h.set_looping(false);
    h.seek(FrameIndex(29));
    assert_eq!(h.tick(), FrameIndex(29));
    assert!(!h.is_playing());
}

#[test]
fn render_frame_bounds_and_cache() {
    let mut h = host(TICKER).with_cache(true);
    assert!(h.render_frame(FrameIndex(30)).is_err());
    let a = h.render_frame(FrameIndex(12)).unwrap();
    let b = h.render_frame(FrameIndex(12)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.text_content(), "1");
    h.seek(FrameIndex(25));
    assert_eq!(h.render_current().unwrap().text_content(), "2");
}

#[test]
fn sweep_counts_distinct_frames() {
    let mut h = host(TICKER);
    let range = h.config().frame_range();
    let stats = h.sweep(range).unwrap();
    assert_eq!(stats.frames_rendered, 30);
    assert_eq!(stats.revisits, 30);
    assert_eq!(stats.distinct_frames, 3);
    assert!(stats.is_stable());
    assert_eq!(stats.max_nodes, 4);
}

#[test]
fn sweep_flags_frames_that_depend_on_history() {
    let src = r#"
        let renders = 0;
        export default () => { renders += 1; return <p>{renders}</p>; };
    "#;
    let mut h = host(src);
    let range = FrameRange::new(FrameIndex(0), FrameIndex(3)).unwrap();
    let stats = h.sweep(range).unwrap();
    assert_eq!(stats.unstable_frames, vec![FrameIndex(0), FrameIndex(1), FrameIndex(2)]);
    assert!(!stats.is_stable());
}

#[test]
fn sweep_range_must_fit() {
    let mut h = host(TICKER);
    let range = FrameRange::new(FrameIndex(0), FrameIndex(31)).unwrap();
    assert!(h.sweep(range).is_err());
}
