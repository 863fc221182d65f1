use crate::events::Event;
use crate::phases::{self, Phase};

/// One step of play: (source phase, destination phase).
pub type Transition = (Phase, Phase);

/// How an adjacent event pair is routed. The goal check takes priority
/// over the possession-owner comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairRouting {
    Goal,
    PossessionChange,
    Continuity,
}

fn route_pair(goal: bool, cur_team: u64, nxt_team: u64) -> PairRouting {
    if goal {
        PairRouting::Goal
    } else if cur_team != nxt_team {
        PairRouting::PossessionChange
    } else {
        PairRouting::Continuity
    }
}

/// Walks a time-ordered event sequence and emits phase transitions for
/// each adjacent pair. A pair is skipped whole when either side lacks a
/// type or possession owner, or fails to classify. A goal inserts a
/// restart between the scoring phase and the next event; a turnover
/// inserts "Change of Possession". Output length is 0..=3*(N-1).
pub fn extract_transitions(events: &[Event]) -> Vec<Transition> {
    let mut out = Vec::new();

    for pair in events.windows(2) {
        let cur = &pair[0];
        let nxt = &pair[1];

        if cur.type_name.is_none() || nxt.type_name.is_none() {
            continue;
        }
        let (Some(cur_team), Some(nxt_team)) = (cur.possession_team_id, nxt.possession_team_id)
        else {
            continue;
        };
        let Some(cur_phase) = phases::classify(cur) else {
            continue;
        };
        let Some(nxt_phase) = phases::classify(nxt) else {
            continue;
        };

        match route_pair(phases::is_goal(cur), cur_team, nxt_team) {
            PairRouting::Goal => {
                out.push((cur_phase, Phase::Goal));
                out.push((Phase::Goal, Phase::SetPieceRestart));
                out.push((Phase::SetPieceRestart, nxt_phase));
            }
            PairRouting::PossessionChange => {
                out.push((cur_phase, Phase::ChangeOfPossession));
                out.push((Phase::ChangeOfPossession, nxt_phase));
            }
            PairRouting::Continuity => out.push((cur_phase, nxt_phase)),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(type_name: &str, team: u64) -> Event {
        Event {
            type_name: Some(type_name.to_string()),
            possession_team_id: Some(team),
            ..Default::default()
        }
    }

    fn pass(length: f64, team: u64) -> Event {
        Event {
            type_name: Some("Pass".to_string()),
            possession_team_id: Some(team),
            pass_length: Some(length),
            ..Default::default()
        }
    }

    fn shot(outcome: &str, team: u64) -> Event {
        Event {
            type_name: Some("Shot".to_string()),
            possession_team_id: Some(team),
            shot_outcome: Some(outcome.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn goal_check_outranks_possession_check() {
        assert_eq!(route_pair(true, 1, 2), PairRouting::Goal);
        assert_eq!(route_pair(true, 1, 1), PairRouting::Goal);
        assert_eq!(route_pair(false, 1, 2), PairRouting::PossessionChange);
        assert_eq!(route_pair(false, 1, 1), PairRouting::Continuity);
    }

    #[test]
    fn continuity_emits_single_direct_transition() {
        let events = vec![pass(10.0, 1), event("Carry", 1)];
        let transitions = extract_transitions(&events);
        assert_eq!(transitions, vec![(Phase::ShortPass, Phase::Possession)]);
    }

    #[test]
    fn goal_emits_exactly_the_restart_triple() {
        let events = vec![shot("Goal", 1), pass(5.0, 2)];
        let transitions = extract_transitions(&events);
        assert_eq!(
            transitions,
            vec![
                (Phase::ShootAttempt, Phase::Goal),
                (Phase::Goal, Phase::SetPieceRestart),
                (Phase::SetPieceRestart, Phase::ShortPass),
            ]
        );
        assert!(!transitions.contains(&(Phase::ShootAttempt, Phase::ShortPass)));
    }

    #[test]
    fn goal_triple_even_when_possession_is_kept() {
        let events = vec![event("Own Goal For", 1), event("Carry", 1)];
        let transitions = extract_transitions(&events);
        assert_eq!(
            transitions,
            vec![
                (Phase::ShootAttempt, Phase::Goal),
                (Phase::Goal, Phase::SetPieceRestart),
                (Phase::SetPieceRestart, Phase::Possession),
            ]
        );
    }

    #[test]
    fn turnover_routes_through_change_of_possession() {
        let events = vec![event("Duel", 1), event("Interception", 2)];
        let transitions = extract_transitions(&events);
        assert_eq!(
            transitions,
            vec![
                (Phase::Duel, Phase::ChangeOfPossession),
                (Phase::ChangeOfPossession, Phase::DefensiveAction),
            ]
        );
        assert!(!transitions.contains(&(Phase::Duel, Phase::DefensiveAction)));
    }

    #[test]
    fn malformed_and_unclassifiable_pairs_are_dropped() {
        let no_team = Event {
            type_name: Some("Carry".to_string()),
            ..Default::default()
        };
        let unknown = event("Camera On", 1);
        let events = vec![event("Carry", 1), no_team, unknown, event("Carry", 1)];
        assert!(extract_transitions(&events).is_empty());
    }

    #[test]
    fn next_side_pass_is_relabelled_too() {
        let events = vec![event("Carry", 1), pass(40.0, 1)];
        let transitions = extract_transitions(&events);
        assert_eq!(transitions, vec![(Phase::Possession, Phase::LongPass)]);
    }

    #[test]
    fn final_event_has_no_outgoing_transition() {
        let events = vec![pass(10.0, 1)];
        assert!(extract_transitions(&events).is_empty());
        assert!(extract_transitions(&[]).is_empty());
    }

    #[test]
    fn spec_walkthrough_sequence() {
        let events = vec![
            pass(30.0, 1),
            pass(10.0, 1),
            shot("Goal", 1),
            pass(5.0, 2),
        ];
        let transitions = extract_transitions(&events);
        assert_eq!(
            transitions,
            vec![
                (Phase::LongPass, Phase::ShortPass),
                (Phase::ShortPass, Phase::ShootAttempt),
                (Phase::ShootAttempt, Phase::Goal),
                (Phase::Goal, Phase::SetPieceRestart),
                (Phase::SetPieceRestart, Phase::ShortPass),
            ]
        );
    }
}
