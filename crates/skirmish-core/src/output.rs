//! Report Output
//!
//! Writes the activity report as a pretty JSON document or as JSONL records,
//! with faction display names substituted for the internal tags.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use skirmish_events::{FactionNames, InteractionTime, ParticipantId};

use crate::report::{ActivityReport, FactionSummary, ParticipantRecord};

/// Errors that can occur while writing output.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Destination could not be written
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Report could not be serialized
    #[error("JSON serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct NamedRecord<'a> {
    id: &'a ParticipantId,
    outgoing: usize,
    incoming: usize,
    faction: &'a str,
    highlighted: bool,
}

impl<'a> NamedRecord<'a> {
    fn new(record: &'a ParticipantRecord, names: &'a FactionNames) -> Self {
        Self {
            id: &record.id,
            outgoing: record.outgoing,
            incoming: record.incoming,
            faction: names.name(record.faction),
            highlighted: record.highlighted,
        }
    }
}

#[derive(Serialize)]
struct NamedSummary<'a> {
    faction: &'a str,
    #[serde(flatten)]
    summary: &'a FactionSummary,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    interactions: usize,
    skipped_rows: usize,
    first_interaction: Option<InteractionTime>,
    last_interaction: Option<InteractionTime>,
    factions: Vec<NamedSummary<'a>>,
    records: Vec<NamedRecord<'a>>,
    unresolved: &'a [ParticipantId],
}

/// Renders the report as pretty JSON.
pub fn render_report(report: &ActivityReport, names: &FactionNames) -> Result<String, OutputError> {
    let document = ReportDocument {
        interactions: report.interactions,
        skipped_rows: report.skipped_rows,
        first_interaction: report.first_interaction,
        last_interaction: report.last_interaction,
        factions: report
            .factions
            .iter()
            .map(|(faction, summary)| NamedSummary {
                faction: names.name(*faction),
                summary,
            })
            .collect(),
        records: report
            .records
            .iter()
            .map(|r| NamedRecord::new(r, names))
            .collect(),
        unresolved: &report.unresolved,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Writes the report as a pretty JSON file.
pub fn write_report(
    report: &ActivityReport,
    names: &FactionNames,
    path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let json = render_report(report, names)?;
    std::fs::write(path, json).map_err(|source| io_error(path, source))?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}

/// Writes one JSON object per resolved participant.
pub fn write_records_jsonl(
    report: &ActivityReport,
    names: &FactionNames,
    path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut writer = BufWriter::new(file);

    for record in &report.records {
        let json = serde_json::to_string(&NamedRecord::new(record, names))?;
        writeln!(writer, "{}", json).map_err(|source| io_error(path, source))?;
    }
    writer.flush().map_err(|source| io_error(path, source))?;

    tracing::info!(path = %path.display(), records = report.records.len(), "wrote records");
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}
