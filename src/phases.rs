use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::events::Event;

/// Pass length (pitch units) at or above which a pass counts as long.
pub const LONG_PASS_MIN_LENGTH: f64 = 25.0;

/// Coarse tactical category for an event. `Goal` and `ChangeOfPossession`
/// are transition artifacts only; `classify` never returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    LongPass,
    ShortPass,
    Possession,
    DefensiveAction,
    Duel,
    ShootAttempt,
    SetPieceRestart,
    Foul,
    Goal,
    ChangeOfPossession,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::LongPass => "Long Pass",
            Phase::ShortPass => "Short Pass",
            Phase::Possession => "Possession",
            Phase::DefensiveAction => "Defensive Action",
            Phase::Duel => "Duel",
            Phase::ShootAttempt => "Shoot Attempt",
            Phase::SetPieceRestart => "Set Piece / Restart",
            Phase::Foul => "Foul",
            Phase::Goal => "Goal",
            Phase::ChangeOfPossession => "Change of Possession",
        }
    }
}

const PHASE_GROUP_ENTRIES: &[(&str, Phase)] = &[
    ("Ball Receipt", Phase::Possession),
    ("Carry", Phase::Possession),
    ("Dispossessed", Phase::Possession),
    ("Dribble", Phase::Possession),
    ("Dribbled Past", Phase::Possession),
    ("Error", Phase::Possession),
    ("Foul Won", Phase::Possession),
    ("Miscontrol", Phase::Possession),
    ("Block", Phase::DefensiveAction),
    ("Clearance", Phase::DefensiveAction),
    ("Interception", Phase::DefensiveAction),
    ("50/50", Phase::Duel),
    ("Ball Recovery", Phase::Duel),
    ("Duel", Phase::Duel),
    ("Shield", Phase::Duel),
    ("Shot", Phase::ShootAttempt),
    ("Own Goal For", Phase::ShootAttempt),
    ("Own Goal Against", Phase::ShootAttempt),
    ("Goal Keeper", Phase::SetPieceRestart),
    ("Half End", Phase::SetPieceRestart),
    ("Half Start", Phase::SetPieceRestart),
    ("Injury Stoppage", Phase::SetPieceRestart),
    ("Player Off", Phase::SetPieceRestart),
    ("Player On", Phase::SetPieceRestart),
    ("Referee Ball-Drop", Phase::SetPieceRestart),
    ("Starting XI", Phase::SetPieceRestart),
    ("Substitution", Phase::SetPieceRestart),
    ("Tactical Shift", Phase::SetPieceRestart),
    ("Bad Behaviour", Phase::Foul),
    ("Foul Committed", Phase::Foul),
    ("Offside", Phase::Foul),
];

static PHASE_GROUPS: OnceCell<HashMap<&'static str, Phase>> = OnceCell::new();

fn phase_groups() -> &'static HashMap<&'static str, Phase> {
    PHASE_GROUPS.get_or_init(|| PHASE_GROUP_ENTRIES.iter().copied().collect())
}

/// Maps an event to its phase. Passes with a known length are split at
/// [`LONG_PASS_MIN_LENGTH`] before the group lookup; a type absent from
/// the group table yields `None` and drops any transition touching it.
pub fn classify(event: &Event) -> Option<Phase> {
    let type_name = event.type_name.as_deref()?;
    if type_name == "Pass"
        && let Some(length) = event.pass_length
    {
        if length >= LONG_PASS_MIN_LENGTH {
            return Some(Phase::LongPass);
        }
        return Some(Phase::ShortPass);
    }
    phase_groups().get(type_name).copied()
}

/// Whether the event itself produced a goal. Own goals count regardless
/// of outcome; shots count only when the recorded outcome is "Goal".
/// The flag changes how the outgoing transition is recorded, not the
/// event's own phase.
pub fn is_goal(event: &Event) -> bool {
    match event.type_name.as_deref() {
        Some("Own Goal For" | "Own Goal Against") => true,
        Some("Shot") => event.shot_outcome.as_deref() == Some("Goal"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(length: Option<f64>) -> Event {
        Event {
            type_name: Some("Pass".to_string()),
            possession_team_id: Some(1),
            pass_length: length,
            shot_outcome: None,
        }
    }

    #[test]
    fn pass_length_boundary_splits_at_25() {
        assert_eq!(classify(&pass(Some(25.0))), Some(Phase::LongPass));
        assert_eq!(classify(&pass(Some(24.999))), Some(Phase::ShortPass));
        assert_eq!(classify(&pass(Some(60.0))), Some(Phase::LongPass));
    }

    #[test]
    fn pass_without_length_is_unclassifiable() {
        assert_eq!(classify(&pass(None)), None);
    }

    #[test]
    fn unknown_type_is_unclassifiable() {
        let event = Event {
            type_name: Some("Camera On".to_string()),
            possession_team_id: Some(1),
            ..Default::default()
        };
        assert_eq!(classify(&event), None);
        assert_eq!(classify(&Event::default()), None);
    }

    #[test]
    fn group_table_covers_all_groups() {
        let lookup = |name: &str| {
            classify(&Event {
                type_name: Some(name.to_string()),
                ..Default::default()
            })
        };
        assert_eq!(lookup("Carry"), Some(Phase::Possession));
        assert_eq!(lookup("Interception"), Some(Phase::DefensiveAction));
        assert_eq!(lookup("50/50"), Some(Phase::Duel));
        assert_eq!(lookup("Shot"), Some(Phase::ShootAttempt));
        assert_eq!(lookup("Goal Keeper"), Some(Phase::SetPieceRestart));
        assert_eq!(lookup("Offside"), Some(Phase::Foul));
    }

    #[test]
    fn goal_flag_rules() {
        let own_goal = Event {
            type_name: Some("Own Goal Against".to_string()),
            ..Default::default()
        };
        assert!(is_goal(&own_goal));

        let scored = Event {
            type_name: Some("Shot".to_string()),
            shot_outcome: Some("Goal".to_string()),
            ..Default::default()
        };
        assert!(is_goal(&scored));

        let saved = Event {
            type_name: Some("Shot".to_string()),
            shot_outcome: Some("Saved".to_string()),
            ..Default::default()
        };
        assert!(!is_goal(&saved));
        assert!(!is_goal(&pass(Some(30.0))));
    }

    #[test]
    fn goal_flag_does_not_change_classification() {
        let scored = Event {
            type_name: Some("Shot".to_string()),
            possession_team_id: Some(1),
            shot_outcome: Some("Goal".to_string()),
            ..Default::default()
        };
        assert_eq!(classify(&scored), Some(Phase::ShootAttempt));
    }
}
