use super::*;
use crate::frame::ColorLayout;
use crate::viewport::Resolution;

fn blank() -> FrameBuffer {
    FrameBuffer::blank(Resolution::new(100, 80), ColorLayout::Bgr)
}

#[test]
fn center_cross_is_red_in_the_middle() {
    let mut f = blank();
    draw_center_cross(&mut f);
    assert_eq!(f.rgb_at(50, 40), Some(RED));
    assert_eq!(f.rgb_at(60, 40), Some(RED));
    assert_eq!(f.rgb_at(50, 30), Some(RED));
    assert_eq!(f.rgb_at(61, 40), Some([0, 0, 0]));
    assert_eq!(f.rgb_at(0, 0), Some([0, 0, 0]));
}

#[test]
fn anchor_crosshair_defaults_to_centre() {
    let f = AnchorCrosshair.process(blank(), None);
    assert_eq!(f.rgb_at(50, 40), Some(GREEN));
    assert_eq!(f.rgb_at(70, 40), Some(GREEN));
}

#[test]
fn anchor_crosshair_follows_anchor() {
    let f = AnchorCrosshair.process(blank(), Some(Anchor::new(0.25, 0.5)));
    assert_eq!(f.rgb_at(25, 40), Some(GREEN));
    assert_eq!(f.rgb_at(50, 40), Some([0, 0, 0]));
}

#[test]
fn cross_near_edge_is_clipped() {
    let mut f = blank();
    draw_cross(&mut f, (0, 0), 20, RED);
    assert_eq!(f.rgb_at(0, 0), Some(RED));
    assert_eq!(f.rgb_at(20, 0), Some(RED));
}

#[test]
fn closures_are_processors() {
    let mut invert = |mut frame: FrameBuffer, _anchor: Option<Anchor>| {
        frame.put_rgb(0, 0, [9, 9, 9]);
        frame
    };
    let f = invert.process(blank(), None);
    assert_eq!(f.rgb_at(0, 0), Some([9, 9, 9]));
}
