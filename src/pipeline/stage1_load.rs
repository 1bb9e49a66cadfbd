use crate::cohort::{CohortError, ScoreRepository};
use crate::config::CohortManifest;

pub fn run_stage1(manifest: &CohortManifest) -> Result<ScoreRepository, CohortError> {
    for subject in manifest.sources.keys() {
        if !manifest.cohort.contains(subject) {
            tracing::warn!(subject = %subject, "manifest lists sources for a subject outside the cohort; ignoring");
        }
    }
    let source = manifest.file_source();
    ScoreRepository::from_source(&manifest.cohort, &manifest.contrasts, &source)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_load.rs"]
mod tests;
