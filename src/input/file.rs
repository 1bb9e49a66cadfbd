use std::path::{Path, PathBuf};

use crate::input::{InputError, ScoreRecord, ScoreSource, SourceTable, read_score_file};

/// Reads score files from an explicit, already-resolved path table.
#[derive(Debug, Clone)]
pub struct FileSource {
    table: SourceTable,
}

impl FileSource {
    pub fn new(table: SourceTable) -> Self {
        Self { table }
    }

    pub fn path_for(&self, subject: &str, contrast: &str) -> Option<&Path> {
        self.table
            .get(subject)
            .and_then(|by_contrast| by_contrast.get(contrast))
            .map(PathBuf::as_path)
    }
}

impl ScoreSource for FileSource {
    fn fetch(&self, subject: &str, contrast: &str) -> Result<ScoreRecord, InputError> {
        let path = self
            .path_for(subject, contrast)
            .ok_or_else(|| InputError::NotFound {
                subject: subject.to_string(),
                contrast: contrast.to_string(),
            })?;
        if !path.exists() {
            return Err(InputError::NotFound {
                subject: subject.to_string(),
                contrast: contrast.to_string(),
            });
        }
        tracing::debug!(subject, contrast, path = %path.display(), "reading score file");
        read_score_file(path)
    }
}
