use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};
use crate::job::JobArtifactSet;
use crate::pipeline::context::JobContext;
use crate::pipeline::orchestrator::{AssemblyReport, generate_job};

/// One queued job: a name (used in the job id) and its source material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem {
    pub name: String,
    pub source_material: String,
}

/// Result of one batch entry; failures are recorded as their error message.
#[derive(Debug)]
pub struct JobOutcome {
    pub name: String,
    pub job_root: Option<PathBuf>,
    pub result: Result<AssemblyReport, String>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Job directory name: `<unix seconds>_<name>`, with the name reduced to `[A-Za-z0-9_-]`.
pub fn job_id(name: &str, unix_secs: u64) -> String {
    let clean: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if clean.is_empty() {
        unix_secs.to_string()
    } else {
        format!("{unix_secs}_{clean}")
    }
}

fn now_unix_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Highest `_N` suffix tried before giving up on a taken job id.
const MAX_ID_SUFFIX: u32 = 1000;

/// Create a fresh job directory for `id`, appending `_2`, `_3`, ... while the id is taken.
fn create_job_dir(
    shorts_root: &Path,
    id: &str,
    output_filename: &str,
) -> ReelResult<JobArtifactSet> {
    let mut candidate = id.to_string();
    let mut n = 1;
    loop {
        match JobArtifactSet::create(shorts_root, &candidate, output_filename) {
            Err(ReelError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::AlreadyExists && n < MAX_ID_SUFFIX =>
            {
                n += 1;
                candidate = format!("{id}_{n}");
            }
            other => return other,
        }
    }
}

/// Run jobs one after another. A failed job is logged and recorded; the next one still runs.
pub fn run_batch(
    ctx: &mut JobContext,
    shorts_root: &Path,
    items: &[BatchItem],
    output_filename: &str,
) -> Vec<JobOutcome> {
    let mut outcomes = Vec::with_capacity(items.len());
    for item in items {
        let id = job_id(&item.name, now_unix_secs());
        let span = tracing::info_span!("job", name = %item.name, id = %id);
        let _enter = span.enter();

        let job = match create_job_dir(shorts_root, &id, output_filename) {
            Ok(job) => job,
            Err(e) => {
                tracing::error!(error = %e, "could not create job directory");
                outcomes.push(JobOutcome {
                    name: item.name.clone(),
                    job_root: None,
                    result: Err(e.to_string()),
                });
                continue;
            }
        };

        let result = generate_job(ctx, &job, &item.source_material);
        match &result {
            Ok(report) => tracing::info!(final_path = %report.final_path.display(), "job finished"),
            Err(e) => tracing::error!(error = %e, "job failed"),
        }
        outcomes.push(JobOutcome {
            name: item.name.clone(),
            job_root: Some(job.root().to_path_buf()),
            result: result.map_err(|e| e.to_string()),
        });
    }
    outcomes
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
