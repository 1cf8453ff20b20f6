use super::*;

fn bgr_frame() -> FrameBuffer {
    // one pixel: blue=10, green=20, red=30
    FrameBuffer::from_raw(1, 1, vec![10, 20, 30], ColorLayout::Bgr).unwrap()
}

#[test]
fn from_raw_checks_length() {
    let err = FrameBuffer::from_raw(2, 2, vec![0; 5], ColorLayout::Rgb).unwrap_err();
    assert_eq!(err, FrameSizeError { width: 2, height: 2, len: 5 });
}

#[test]
fn blank_has_requested_size() {
    let f = FrameBuffer::blank(Resolution::new(8, 6), ColorLayout::Bgr);
    assert_eq!(f.size(), Resolution::new(8, 6));
    assert_eq!(f.rgb_at(7, 5), Some([0, 0, 0]));
    assert_eq!(f.rgb_at(8, 5), None);
}

#[test]
fn rgb_at_reorders_bgr() {
    assert_eq!(bgr_frame().rgb_at(0, 0), Some([30, 20, 10]));
}

#[test]
fn put_rgb_respects_layout() {
    let mut f = FrameBuffer::blank(Resolution::new(2, 2), ColorLayout::Bgr);
    f.put_rgb(1, 0, [255, 0, 0]);
    assert_eq!(f.image().get_pixel(1, 0).0, [0, 0, 255]);
    assert_eq!(f.rgb_at(1, 0), Some([255, 0, 0]));
}

#[test]
fn put_rgb_clips_outside_frame() {
    let mut f = FrameBuffer::blank(Resolution::new(2, 2), ColorLayout::Rgb);
    f.put_rgb(-1, 0, [1, 2, 3]);
    f.put_rgb(0, 2, [1, 2, 3]);
    assert!(f.image().pixels().all(|p| p.0 == [0, 0, 0]));
}

#[test]
fn rgb_conversion_swaps_channels() {
    assert_eq!(bgr_frame().to_rgb_image().get_pixel(0, 0).0, [30, 20, 10]);
}

#[test]
fn rgba_conversion_is_opaque() {
    assert_eq!(bgr_frame().to_rgba_image().get_pixel(0, 0).0, [30, 20, 10, 255]);
}
