//! Job orchestration.
//!
//! Stages run strictly in sequence on one job directory: script, narration, images, durations,
//! frames, mux, captions, finalize, cleanup. Batches run jobs one at a time.

pub mod batch;
pub mod context;
pub mod orchestrator;

pub use batch::{BatchItem, JobOutcome, job_id, run_batch};
pub use context::{Generators, JobContext};
pub use orchestrator::{
    AssemblyReport, assemble_existing, assemble_job, generate_job, load_job_script,
    load_upload_metadata, publish_job,
};
