use crate::foundation::core::Fps;

/// Frame budget of one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneFramePlan {
    /// Frames covering this scene's narration.
    ///
    /// Cut on the cumulative timeline, so this may differ by one from `round(duration * fps)`
    /// for the scene alone. The sum over all scenes is exact to the nearest frame.
    pub total: u64,
    /// Frames holding the scene image unchanged.
    pub static_frames: u64,
    /// Wipe frames into the next scene (0 for the last scene).
    pub slide_frames: u64,
    /// The transition had to be shortened to leave a static frame.
    pub clamped: bool,
}

/// Nominal transition length: `round(fps / slide_speed_multiplier)` frames.
pub fn slide_frames_for(fps: Fps, slide_speed_multiplier: f64) -> u64 {
    let frames = (fps.as_f64() / slide_speed_multiplier).round();
    if frames.is_finite() && frames > 0.0 {
        frames as u64
    } else {
        0
    }
}

/// Split every scene's narration duration into static and transition frames.
///
/// Scene boundaries are rounded on the cumulative timeline, so each scene receives
/// `round(duration * fps)` frames give or take one and the stream as a whole never drifts more
/// than half a frame from the concatenated narration.
pub fn plan_scene_frames(
    durations_millis: &[u64],
    fps: Fps,
    slide_speed_multiplier: f64,
) -> Vec<SceneFramePlan> {
    let nominal_slide = slide_frames_for(fps, slide_speed_multiplier);
    let last = durations_millis.len().saturating_sub(1);

    let mut cum_millis = 0u64;
    let mut cum_frames = 0u64;
    durations_millis
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            cum_millis += d;
            let end_frames = fps.millis_to_frames_round(cum_millis);
            let total = end_frames - cum_frames;
            cum_frames = end_frames;

            let (slide_frames, clamped) = if i == last {
                (0, false)
            } else if nominal_slide >= total {
                (total.saturating_sub(1), true)
            } else {
                (nominal_slide, false)
            };

            SceneFramePlan {
                total,
                static_frames: total - slide_frames,
                slide_frames,
                clamped,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
