use super::*;
use crate::foundation::core::Canvas;

fn gradient(width: u32, height: u32, base: u8) -> FrameRGBA {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[base, x as u8, 0, 255]);
        }
    }
    FrameRGBA {
        width,
        height,
        data,
    }
}

#[test]
fn offset_zero_is_current_and_full_width_is_next() {
    let cur = gradient(8, 3, 10);
    let next = gradient(8, 3, 200);
    let mut out = FrameRGBA::solid(Canvas { width: 8, height: 3 }, [0, 0, 0, 255]);

    wipe_frame(&cur, &next, 0, &mut out).unwrap();
    assert_eq!(out, cur);

    wipe_frame(&cur, &next, 8, &mut out).unwrap();
    assert_eq!(out, next);

    wipe_frame(&cur, &next, 100, &mut out).unwrap();
    assert_eq!(out, next);
}

#[test]
fn columns_shift_left_and_next_enters_from_right() {
    let cur = gradient(8, 2, 10);
    let next = gradient(8, 2, 200);
    let mut out = FrameRGBA::solid(Canvas { width: 8, height: 2 }, [0, 0, 0, 255]);

    wipe_frame(&cur, &next, 3, &mut out).unwrap();
    for y in 0..2 {
        for x in 0..8u32 {
            let expected = if x + 3 < 8 {
                cur.pixel(x + 3, y)
            } else {
                next.pixel(x + 3 - 8, y)
            };
            assert_eq!(out.pixel(x, y), expected, "x={x} y={y}");
        }
    }
}

#[test]
fn size_mismatch_is_rejected() {
    let cur = gradient(8, 2, 10);
    let next = gradient(6, 2, 200);
    let mut out = gradient(8, 2, 0);
    let err = wipe_frame(&cur, &next, 1, &mut out).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn offsets_are_rounded_and_increasing() {
    assert_eq!(wipe_offset(0, 30, 1024), 0);
    assert_eq!(wipe_offset(1, 30, 1024), 34);
    assert_eq!(wipe_offset(15, 30, 1024), 512);
    assert_eq!(wipe_offset(29, 30, 1024), 990);
    assert_eq!(wipe_offset(3, 0, 1024), 0);

    let offsets: Vec<u32> = (0..30).map(|k| wipe_offset(k, 30, 1024)).collect();
    assert!(offsets.windows(2).all(|w| w[0] < w[1]));
}
