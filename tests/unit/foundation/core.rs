use super::*;

#[test]
fn frame_range_validation_and_contains() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(4)).is_err());

    let r = FrameRange::new(FrameIndex(10), FrameIndex(20)).unwrap();
    assert_eq!(r.len_frames(), 10);
    assert!(r.contains(FrameIndex(10)));
    assert!(r.contains(FrameIndex(19)));
    assert!(!r.contains(FrameIndex(20)));
    assert_eq!(r.clamp(FrameIndex(99)), FrameIndex(19));
    assert_eq!(r.clamp(FrameIndex(0)), FrameIndex(10));
    assert_eq!(r.iter().count(), 10);
}

#[test]
fn empty_range_clamps_to_start() {
    let r = FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap();
    assert!(r.is_empty());
    assert_eq!(r.clamp(FrameIndex(8)), FrameIndex(3));
}

#[test]
fn fps_conversions() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());

    let fps = Fps::whole(30);
    assert_eq!(fps.frames_to_secs(300), 10.0);
    assert_eq!(fps.secs_to_frames_floor(1.5), 45);
    assert_eq!(fps.to_literal(), "30");

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.to_literal(), "29.97");
}
