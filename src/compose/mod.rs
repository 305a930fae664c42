//! Frame compositor.
//!
//! Scene images are normalized to the output canvas, held for their narration and wiped into
//! the next scene. Frames are streamed to a [`crate::encode::FrameSink`] one at a time.

pub mod branding;
pub mod canvas;
pub mod compositor;
pub mod plan;
pub mod wipe;

pub use branding::Logo;
pub use canvas::{decode_to_canvas, fit_to_canvas, load_scene_image};
pub use compositor::{CompositorOptions, CompositorStats, composite_job, composite_scenes};
pub use plan::{SceneFramePlan, plan_scene_frames, slide_frames_for};
pub use wipe::{wipe_frame, wipe_offset};
