use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(30, 1).is_ok());
}

#[test]
fn millis_to_frames_rounds_half_up() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.millis_to_frames_round(1000), 30);
    assert_eq!(fps.millis_to_frames_round(2016), 60);
    // 1.05s * 30 = 31.5 -> 32
    assert_eq!(fps.millis_to_frames_round(1050), 32);
    assert_eq!(fps.millis_to_frames_round(0), 0);
}

#[test]
fn millis_to_frames_handles_rational_rates() {
    let fps = Fps::new(30_000, 1001).unwrap();
    // 10s at 29.97 fps = 299.7 frames
    assert_eq!(fps.millis_to_frames_round(10_000), 300);
}

#[test]
fn solid_frame_fills_every_pixel() {
    let canvas = Canvas {
        width: 3,
        height: 2,
    };
    let f = FrameRGBA::solid(canvas, [1, 2, 3, 255]);
    assert_eq!(f.data.len(), canvas.rgba_len());
    assert_eq!(f.pixel(2, 1), [1, 2, 3, 255]);
    assert_eq!(f.canvas(), canvas);
}
