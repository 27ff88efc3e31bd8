//! Progress persistence keyed by question identifier.
//!
//! The save file holds a bincode-encoded list of [`SavedRecord`]s. Loading
//! reconciles each record against the in-memory questions by identifier;
//! records without a matching question are kept aside as orphans and written
//! back unchanged on the next save, so a topic filter never drops history.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::Question;

/// Upper bound on the attempts a totals-only record may claim.
pub const MAX_LEGACY_ATTEMPTS: u64 = 100_000;

/// One persisted entry. Both shapes are accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedRecord {
    /// Full ordered attempt history.
    History { identifier: u32, history: Vec<bool> },
    /// Older shape that only kept the totals.
    Counts {
        identifier: u32,
        correct: u32,
        incorrect: u32,
    },
}

impl SavedRecord {
    pub fn identifier(&self) -> u32 {
        match self {
            SavedRecord::History { identifier, .. } | SavedRecord::Counts { identifier, .. } => {
                *identifier
            }
        }
    }

    /// Number of attempts the record stands for.
    pub fn attempt_count(&self) -> u64 {
        match self {
            SavedRecord::History { history, .. } => history.len() as u64,
            SavedRecord::Counts {
                correct, incorrect, ..
            } => u64::from(*correct) + u64::from(*incorrect),
        }
    }

    /// The attempt history this record stands for.
    ///
    /// Totals are expanded into all correct attempts followed by all
    /// incorrect ones; the real order is not recoverable.
    pub fn to_history(&self) -> Vec<bool> {
        match self {
            SavedRecord::History { history, .. } => history.clone(),
            SavedRecord::Counts {
                correct, incorrect, ..
            } => {
                let mut history = vec![true; *correct as usize];
                history.extend(std::iter::repeat(false).take(*incorrect as usize));
                history
            }
        }
    }

    fn from_question(question: &Question) -> Self {
        SavedRecord::History {
            identifier: question.identifier,
            history: question.history.clone(),
        }
    }
}

/// Outcome of reconciling a save file with the current questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Records assigned to an in-memory question.
    pub matched: usize,
    /// Matched records that were in the totals-only shape.
    pub upgraded: usize,
    /// Records whose question is not in the current set.
    pub orphans: Vec<SavedRecord>,
}

/// Durable per-question history storage at a fixed path.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode records in the on-disk format.
pub fn encode_records(records: &[SavedRecord]) -> Result<Vec<u8>, bincode::Error> {
    codec().serialize(records)
}

/// Decode records from the on-disk format.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<SavedRecord>, bincode::Error> {
    codec().deserialize(bytes)
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw records. A missing file yields no records.
    pub fn read_records(&self) -> Result<Vec<SavedRecord>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no progress file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let records = decode_records(&bytes).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        // Totals are expanded into a full history on load.
        if let Some(record) = records.iter().find(|r| {
            matches!(r, SavedRecord::Counts { .. }) && r.attempt_count() > MAX_LEGACY_ATTEMPTS
        }) {
            return Err(StoreError::Corrupt {
                path: self.path.clone(),
                reason: format!(
                    "record for question {} claims {} attempts",
                    record.identifier(),
                    record.attempt_count()
                ),
            });
        }
        Ok(records)
    }

    /// Load histories into `questions`, matching records by identifier.
    pub fn load(&self, questions: &mut [Question]) -> Result<Reconciliation, StoreError> {
        let records = self.read_records()?;
        let reconciliation = reconcile(records, questions);
        tracing::info!(
            matched = reconciliation.matched,
            upgraded = reconciliation.upgraded,
            orphans = reconciliation.orphans.len(),
            "loaded progress from {}",
            self.path.display()
        );
        Ok(reconciliation)
    }

    /// Write every question's history followed by the orphans, replacing
    /// the save file as a whole.
    pub fn save(&self, questions: &[Question], orphans: &[SavedRecord]) -> Result<(), StoreError> {
        let records: Vec<SavedRecord> = questions
            .iter()
            .map(SavedRecord::from_question)
            .chain(orphans.iter().cloned())
            .collect();

        let bytes = encode_records(&records).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
        })?;
        self.write_atomically(&bytes)?;

        tracing::info!(
            questions = questions.len(),
            orphans = orphans.len(),
            "saved progress to {}",
            self.path.display()
        );
        Ok(())
    }

    fn write_atomically(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

/// Assign each record's history to the question with the same identifier.
///
/// Unmatched records are returned as orphans in their original order and
/// shape. When a save file repeats an identifier, the later record wins.
pub fn reconcile(records: Vec<SavedRecord>, questions: &mut [Question]) -> Reconciliation {
    let index: HashMap<u32, usize> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.identifier, i))
        .collect();

    let mut result = Reconciliation::default();
    for record in records {
        let Some(&i) = index.get(&record.identifier()) else {
            result.orphans.push(record);
            continue;
        };
        if !questions[i].history.is_empty() {
            tracing::warn!(
                identifier = record.identifier(),
                "progress file repeats a question, keeping the later record"
            );
        }
        if matches!(record, SavedRecord::Counts { .. }) {
            result.upgraded += 1;
        }
        questions[i].history = record.to_history();
        result.matched += 1;
    }
    result
}
