use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::events;
use crate::matrix::TransitionMatrix;
use crate::transitions;

pub const MATRIX_FILE_SUFFIX: &str = "_matrix.csv";

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub matches: usize,
    pub matrices_written: usize,
    pub transitions_total: usize,
    /// Matches whose event log produced no usable transition at all.
    pub empty_matches: Vec<String>,
}

/// Builds and persists one transition matrix per `.json` event log under
/// `input_dir`, written as `<base>_matrix.csv` into `output_dir`.
/// Matches are independent, so they are mapped on the rayon pool; an
/// unreadable or malformed file aborts the whole run.
pub fn process_matches(input_dir: &Path, output_dir: &Path) -> Result<BatchSummary> {
    let files = list_event_files(input_dir)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    let per_match: Vec<MatchOutcome> = files
        .par_iter()
        .map(|path| process_single_match(path, output_dir))
        .collect::<Result<Vec<_>>>()?;

    let mut summary = BatchSummary {
        matches: per_match.len(),
        matrices_written: per_match.len(),
        ..Default::default()
    };
    for outcome in per_match {
        summary.transitions_total += outcome.transitions;
        if outcome.empty {
            summary.empty_matches.push(outcome.base_name);
        }
    }
    Ok(summary)
}

/// Alternate corpus mode: every event log concatenated into one stream
/// (in file-name order), one matrix written to `output_path`.
pub fn process_combined(input_dir: &Path, output_path: &Path) -> Result<BatchSummary> {
    let files = list_event_files(input_dir)?;

    let mut all_events = Vec::new();
    for path in &files {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read event log {}", path.display()))?;
        let events = events::parse_match_events_json(&raw)
            .with_context(|| format!("parse event log {}", path.display()))?;
        all_events.extend(events);
    }

    let transitions = transitions::extract_transitions(&all_events);
    let matrix = TransitionMatrix::from_transitions(&transitions);
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    fs::write(output_path, matrix.to_csv())
        .with_context(|| format!("write combined matrix {}", output_path.display()))?;

    let mut summary = BatchSummary {
        matches: files.len(),
        matrices_written: 1,
        transitions_total: transitions.len(),
        ..Default::default()
    };
    if matrix.is_empty() {
        summary
            .empty_matches
            .push(output_path.display().to_string());
    }
    Ok(summary)
}

struct MatchOutcome {
    base_name: String,
    transitions: usize,
    empty: bool,
}

fn process_single_match(path: &Path, output_dir: &Path) -> Result<MatchOutcome> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read event log {}", path.display()))?;
    let events = events::parse_match_events_json(&raw)
        .with_context(|| format!("parse event log {}", path.display()))?;
    let transitions = transitions::extract_transitions(&events);
    let matrix = TransitionMatrix::from_transitions(&transitions);

    let base_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out_path = output_dir.join(format!("{base_name}{MATRIX_FILE_SUFFIX}"));
    fs::write(&out_path, matrix.to_csv())
        .with_context(|| format!("write matrix {}", out_path.display()))?;

    Ok(MatchOutcome {
        base_name,
        transitions: transitions.len(),
        empty: matrix.is_empty(),
    })
}

fn list_event_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read input directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}
