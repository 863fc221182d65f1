use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

/// Generates a plausible match event log in the input wire format:
/// possession chains of passes and carries, duels and defensive actions
/// that can flip possession, and occasional shots. Pass lengths straddle
/// the long-pass boundary. Seeded, so runs are reproducible.
pub fn synthetic_match_events(seed: u64, count: usize, home_id: u64, away_id: u64) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut team = home_id;
    let mut events = Vec::with_capacity(count);
    let mut restart_pending = false;

    for _ in 0..count {
        if restart_pending {
            events.push(event_value("Goal Keeper", team, &mut rng));
            restart_pending = false;
            continue;
        }

        let roll = rng.gen_range(0..100);
        let type_name = match roll {
            0..=44 => "Pass",
            45..=59 => "Carry",
            60..=69 => "Ball Receipt",
            70..=77 => "Duel",
            78..=82 => "Interception",
            83..=89 => "Shot",
            90..=94 => "Clearance",
            _ => "Foul Committed",
        };

        match type_name {
            "Duel" | "Interception" | "Clearance" => {
                events.push(event_value(type_name, team, &mut rng));
                if rng.gen_bool(0.5) {
                    team = other(team, home_id, away_id);
                }
            }
            "Foul Committed" => {
                events.push(event_value(type_name, team, &mut rng));
                team = other(team, home_id, away_id);
            }
            "Shot" => {
                let scored = rng.gen_bool(0.12);
                let outcome = if scored {
                    "Goal"
                } else if rng.gen_bool(0.5) {
                    "Saved"
                } else {
                    "Off T"
                };
                events.push(json!({
                    "type": {"name": "Shot"},
                    "possession_team": {"id": team},
                    "shot": {"outcome": {"name": outcome}},
                }));
                team = other(team, home_id, away_id);
                restart_pending = scored;
            }
            _ => events.push(event_value(type_name, team, &mut rng)),
        }
    }

    events
}

pub fn synthetic_match_json(seed: u64, count: usize, home_id: u64, away_id: u64) -> String {
    let events = synthetic_match_events(seed, count, home_id, away_id);
    serde_json::to_string_pretty(&Value::Array(events)).expect("event values serialize")
}

fn event_value(type_name: &str, team: u64, rng: &mut StdRng) -> Value {
    if type_name == "Pass" {
        // Lengths spread across both sides of the 25-unit boundary.
        let length = (rng.gen_range(40..450) as f64) / 10.0;
        return json!({
            "type": {"name": "Pass"},
            "possession_team": {"id": team},
            "pass": {"length": length},
        });
    }
    json!({
        "type": {"name": type_name},
        "possession_team": {"id": team},
    })
}

fn other(team: u64, home_id: u64, away_id: u64) -> u64 {
    if team == home_id { away_id } else { home_id }
}
