use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn nominal_slide_follows_multiplier() {
    assert_eq!(slide_frames_for(fps30(), 1.0), 30);
    assert_eq!(slide_frames_for(fps30(), 2.0), 15);
    assert_eq!(slide_frames_for(fps30(), 4.0), 8);
}

#[test]
fn two_scenes_at_thirty_fps() {
    let plans = plan_scene_frames(&[3000, 2000], fps30(), 1.0);
    assert_eq!(
        plans,
        vec![
            SceneFramePlan {
                total: 90,
                static_frames: 60,
                slide_frames: 30,
                clamped: false,
            },
            SceneFramePlan {
                total: 60,
                static_frames: 60,
                slide_frames: 0,
                clamped: false,
            },
        ]
    );
}

#[test]
fn short_scene_clamps_its_transition() {
    let plans = plan_scene_frames(&[500, 2000], fps30(), 1.0);
    assert_eq!(plans[0].total, 15);
    assert_eq!(plans[0].slide_frames, 14);
    assert_eq!(plans[0].static_frames, 1);
    assert!(plans[0].clamped);
    assert!(!plans[1].clamped);
}

#[test]
fn single_scene_has_no_transition() {
    let plans = plan_scene_frames(&[1000], fps30(), 1.0);
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].slide_frames, 0);
    assert_eq!(plans[0].static_frames, 30);
}

#[test]
fn totals_track_the_narration_timeline() {
    let durations = [1234u64, 2717, 999, 4001, 1500, 333];
    let fps = fps30();
    let plans = plan_scene_frames(&durations, fps, 1.0);

    let sum_millis: u64 = durations.iter().sum();
    let sum_frames: u64 = plans.iter().map(|p| p.total).sum();
    let exact = sum_millis as f64 * 30.0 / 1000.0;
    assert!((sum_frames as f64 - exact).abs() <= 0.5);

    for (d, p) in durations.iter().zip(&plans) {
        let per_scene = *d as f64 * 30.0 / 1000.0;
        assert!((p.total as f64 - per_scene).abs() <= 1.0);
        assert_eq!(p.static_frames + p.slide_frames, p.total);
    }
}

#[test]
fn scene_totals_may_differ_by_one_from_their_own_rounding() {
    // 50ms at 30fps is 1.5 frames; rounded alone every scene would get 2.
    let durations = [50u64, 50, 50, 50];
    let fps = fps30();
    let plans = plan_scene_frames(&durations, fps, 1.0);

    let totals: Vec<u64> = plans.iter().map(|p| p.total).collect();
    assert_eq!(totals, vec![2, 1, 2, 1]);
    for (d, p) in durations.iter().zip(&plans) {
        let alone = fps.millis_to_frames_round(*d);
        assert!(p.total.abs_diff(alone) <= 1);
    }
    let sum: u64 = totals.iter().sum();
    assert_eq!(sum, fps.millis_to_frames_round(durations.iter().sum()));
}
