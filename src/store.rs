//! Bug history storage
//!
//! Keeps every debugging session as a record in a single JSON array on disk.
//! The whole file is rewritten after each mutation.

use chrono::Local;
use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error category stamped on summary records
pub const MIXED_ERROR_TYPE: &str = "Mixed/Multiple";

/// Placeholder for fields a freeform analysis does not break out
const SEE_ANALYSIS: &str = "See full analysis";

/// Longest explanation kept before truncating
const MAX_EXPLANATION_CHARS: usize = 500;

/// One debugging session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugRecord {
    pub date: String,
    pub language: String,
    pub error_type: String,
    pub mistake: String,
    pub wrong_code: String,
    pub correct_code: String,
    pub explanation: String,
}

impl BugRecord {
    /// Summary record for a freeform analysis, dated today
    pub fn from_analysis(language: &str, analysis: &str) -> Self {
        Self {
            date: today(),
            language: language.to_string(),
            error_type: MIXED_ERROR_TYPE.to_string(),
            mistake: SEE_ANALYSIS.to_string(),
            wrong_code: SEE_ANALYSIS.to_string(),
            correct_code: SEE_ANALYSIS.to_string(),
            explanation: truncate_explanation(analysis),
        }
    }
}

/// Counts over the stored records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub total: usize,
    pub by_language: IndexMap<String, usize>,
    pub by_error_type: IndexMap<String, usize>,
}

/// JSON-backed record store
pub struct BugStore {
    path: PathBuf,
    records: Vec<BugRecord>,
}

impl BugStore {
    /// Open the store at `path`, loading whatever is already there
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            records: Vec::new(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reload from disk. Unreadable content leaves the store empty.
    pub fn load(&mut self) {
        self.records.clear();

        if !self.path.exists() {
            log::debug!("No bug history at {}, starting empty", self.path.display());
            return;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read bug history {}: {}", self.path.display(), e);
                return;
            }
        };

        match serde_json::from_str::<Vec<BugRecord>>(&content) {
            Ok(records) => {
                log::info!("Loaded {} bug records from {}", records.len(), self.path.display());
                self.records = records;
            }
            Err(e) => {
                log::warn!(
                    "Discarding unreadable bug history {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create bug history directory")?;
        }

        let json = serde_json::to_string_pretty(&self.records).context("Failed to serialize bug history")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write bug history to {}", self.path.display()))?;

        log::debug!("Saved {} bug records to {}", self.records.len(), self.path.display());
        Ok(())
    }

    /// Append a record and persist
    pub fn add(&mut self, record: BugRecord) -> Result<()> {
        self.records.push(record);
        self.save()
    }

    /// Store a whole analysis as one summary record
    pub fn add_from_freeform_text(&mut self, language: &str, text: &str) -> Result<()> {
        self.add(BugRecord::from_analysis(language, text))
    }

    /// All records, oldest first
    pub fn all(&self) -> &[BugRecord] {
        &self.records
    }

    pub fn by_language(&self, language: &str) -> Vec<&BugRecord> {
        let wanted = language.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.language.to_lowercase() == wanted)
            .collect()
    }

    pub fn by_error_type(&self, error_type: &str) -> Vec<&BugRecord> {
        let needle = error_type.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.error_type.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn summary(&self) -> StoreSummary {
        let mut summary = StoreSummary {
            total: self.records.len(),
            ..Default::default()
        };
        for record in &self.records {
            *summary.by_language.entry(record.language.clone()).or_insert(0) += 1;
            *summary.by_error_type.entry(record.error_type.clone()).or_insert(0) += 1;
        }
        summary
    }

    /// Drop every record and persist the empty list
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.save()
    }
}

fn today() -> String {
    Local::now().format("%d-%m-%Y").to_string()
}

fn truncate_explanation(text: &str) -> String {
    if text.chars().count() > MAX_EXPLANATION_CHARS {
        let head: String = text.chars().take(MAX_EXPLANATION_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
