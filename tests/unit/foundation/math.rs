use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}

#[test]
fn blend_endpoints() {
    assert_eq!(blend_channel_over(200, 10, 255), 200);
    assert_eq!(blend_channel_over(200, 10, 0), 10);
    let mid = blend_channel_over(255, 0, 128);
    assert!((127..=129).contains(&mid));
}
