//! Interaction Log
//!
//! The immutable store of interaction records, loaded from JSON Lines.
//!
//! Each non-blank line is a JSON object carrying at least a subject field,
//! an object field and a time field (names configurable through
//! [`LoadOptions`]). Extra fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::interaction::{Interaction, InteractionTime};
use crate::participant::ParticipantId;

/// Errors that can occur while loading an interaction log.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Source file could not be opened
    #[error("could not read interaction log {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading a line failed
    #[error("line {line}: read error: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    /// Line is not valid JSON
    #[error("line {line}: invalid JSON: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    /// Line is valid JSON but not an object
    #[error("line {line}: expected a JSON object")]
    NotAnObject { line: usize },
    /// Required fields are absent
    #[error("line {line}: missing required fields {missing:?}, found fields {found:?}")]
    MissingFields {
        line: usize,
        missing: Vec<String>,
        found: Vec<String>,
    },
    /// Identity field is null, empty or not a scalar
    #[error("line {line}: field '{field}' does not hold a participant identity")]
    InvalidIdentity { line: usize, field: String },
    /// Time field could not be parsed
    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTime { line: usize, value: String },
}

/// How rows are read from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Field holding the acting participant
    pub subject_field: String,
    /// Field holding the participant acted upon
    pub object_field: String,
    /// Field holding the interaction timestamp
    pub time_field: String,
    /// Skip rows whose identity is missing or empty instead of failing
    pub skip_invalid_rows: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            subject_field: "attacker".to_string(),
            object_field: "victim".to_string(),
            time_field: "time".to_string(),
            skip_invalid_rows: true,
        }
    }
}

impl LoadOptions {
    fn required_fields(&self) -> [&str; 3] {
        [
            self.subject_field.as_str(),
            self.object_field.as_str(),
            self.time_field.as_str(),
        ]
    }
}

/// Ordered, immutable sequence of interactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionLog {
    interactions: Vec<Interaction>,
    skipped_rows: usize,
}

impl InteractionLog {
    /// Creates a log from already-normalized interactions.
    pub fn new(interactions: Vec<Interaction>) -> Self {
        Self {
            interactions,
            skipped_rows: 0,
        }
    }

    /// Loads a log from a JSONL file.
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let log = Self::from_reader(BufReader::new(file), options)?;
        tracing::info!(
            path = %path.display(),
            interactions = log.len(),
            skipped = log.skipped_rows,
            "loaded interaction log"
        );
        Ok(log)
    }

    /// Parses a log from JSONL text.
    pub fn from_jsonl_str(content: &str, options: &LoadOptions) -> Result<Self, LoadError> {
        Self::from_reader(content.as_bytes(), options)
    }

    /// Parses a log from any buffered reader of JSONL.
    pub fn from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<Self, LoadError> {
        let mut log = Self::default();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|source| LoadError::Read {
                line: line_no,
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(&line).map_err(|source| LoadError::Parse {
                line: line_no,
                source,
            })?;
            let Value::Object(row) = value else {
                return Err(LoadError::NotAnObject { line: line_no });
            };

            match parse_row(&row, line_no, options) {
                Ok(interaction) => log.interactions.push(interaction),
                Err(LoadError::InvalidIdentity { line, field }) if options.skip_invalid_rows => {
                    tracing::warn!(line, field = %field, "skipping row without participant identity");
                    log.skipped_rows += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(log)
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interaction> {
        self.interactions.iter()
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Number of rows dropped for lacking a usable identity.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Every participant appearing as subject or object, sorted.
    pub fn participants(&self) -> BTreeSet<&ParticipantId> {
        self.interactions
            .iter()
            .flat_map(|i| [&i.subject, &i.object])
            .collect()
    }

    /// Earliest and latest interaction times, if any.
    pub fn time_span(&self) -> Option<(InteractionTime, InteractionTime)> {
        let first = self.interactions.iter().map(|i| i.time).min()?;
        let last = self.interactions.iter().map(|i| i.time).max()?;
        Some((first, last))
    }
}

impl<'a> IntoIterator for &'a InteractionLog {
    type Item = &'a Interaction;
    type IntoIter = std::slice::Iter<'a, Interaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.interactions.iter()
    }
}

fn parse_row(
    row: &Map<String, Value>,
    line: usize,
    options: &LoadOptions,
) -> Result<Interaction, LoadError> {
    let missing: BTreeSet<String> = options
        .required_fields()
        .into_iter()
        .filter(|field| !row.contains_key(*field))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingFields {
            line,
            missing: missing.into_iter().collect(),
            found: row.keys().cloned().collect(),
        });
    }

    let subject = identity(row, &options.subject_field, line)?;
    let object = identity(row, &options.object_field, line)?;

    let raw_time = &row[options.time_field.as_str()];
    let time = raw_time
        .as_str()
        .and_then(|s| s.parse::<InteractionTime>().ok())
        .ok_or_else(|| LoadError::InvalidTime {
            line,
            value: match raw_time {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })?;

    Ok(Interaction::new(subject, object, time))
}

fn identity(row: &Map<String, Value>, field: &str, line: usize) -> Result<ParticipantId, LoadError> {
    let parsed = match &row[field] {
        Value::String(s) => ParticipantId::parse(s),
        Value::Number(n) => ParticipantId::parse(&n.to_string()),
        _ => None,
    };
    parsed.ok_or_else(|| LoadError::InvalidIdentity {
        line,
        field: field.to_string(),
    })
}
