use anyhow::{Context, Result};
use serde::Deserialize;

/// One observed action in a match event log. Events are read-only once
/// parsed; the classifier and extractor never mutate them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub type_name: Option<String>,
    pub possession_team_id: Option<u64>,
    pub pass_length: Option<f64>,
    pub shot_outcome: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type", default)]
    type_ref: Option<NameRef>,
    #[serde(default)]
    possession_team: Option<IdRef>,
    #[serde(default)]
    pass: Option<PassDetail>,
    #[serde(default)]
    shot: Option<ShotDetail>,
}

#[derive(Debug, Deserialize)]
struct NameRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdRef {
    #[serde(default)]
    id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PassDetail {
    #[serde(default)]
    length: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ShotDetail {
    #[serde(default)]
    outcome: Option<NameRef>,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        Event {
            type_name: raw.type_ref.and_then(|t| t.name),
            possession_team_id: raw.possession_team.and_then(|t| t.id),
            pass_length: raw.pass.and_then(|p| p.length),
            shot_outcome: raw.shot.and_then(|s| s.outcome).and_then(|o| o.name),
        }
    }
}

pub fn parse_match_events_json(raw: &str) -> Result<Vec<Event>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<RawEvent> =
        serde_json::from_str(trimmed).context("invalid match events json")?;
    Ok(rows.into_iter().map(Event::from).collect())
}
