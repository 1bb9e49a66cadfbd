use std::collections::BTreeMap;

use crate::input::{InputError, ScoreRecord, ScoreSource};

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: BTreeMap<(String, String), ScoreRecord>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, subject: &str, contrast: &str, record: ScoreRecord) {
        self.records
            .insert((subject.to_string(), contrast.to_string()), record);
    }

    pub fn with(mut self, subject: &str, contrast: &str, record: ScoreRecord) -> Self {
        self.insert(subject, contrast, record);
        self
    }
}

impl ScoreSource for MemorySource {
    fn fetch(&self, subject: &str, contrast: &str) -> Result<ScoreRecord, InputError> {
        self.records
            .get(&(subject.to_string(), contrast.to_string()))
            .cloned()
            .ok_or_else(|| InputError::NotFound {
                subject: subject.to_string(),
                contrast: contrast.to_string(),
            })
    }
}
