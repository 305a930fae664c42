use crate::foundation::core::{Canvas, FrameIndex, FrameRGBA, Fps};
use crate::foundation::error::ReelResult;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    /// Sink configuration for `canvas` at `fps`.
    pub fn new(canvas: Canvas, fps: Fps) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            fps,
        }
    }
}

/// Consumer of composited frames in stream order.
///
/// Ordering contract: `push_frame` is called with strictly increasing, gap-free `FrameIndex`
/// values starting at 0. Frames are borrowed; a sink must not expect them to outlive the call.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in stream order.
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that only counts frames; used to dry-run a compositor pass.
#[derive(Debug, Default)]
pub struct CountingSink {
    /// Frames received.
    pub count: u64,
    /// Configuration captured in `begin`.
    pub cfg: Option<SinkConfig>,
}

impl FrameSink for CountingSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.count = 0;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> ReelResult<()> {
        self.count += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        Ok(())
    }
}
