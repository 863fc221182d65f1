use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use matchflow::fake_events;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let out_dir = parse_path_arg("--out")
        .or_else(|| path_from_env("MATCHFLOW_DATA_DIR"))
        .unwrap_or_else(|| PathBuf::from("data"));
    let matches = parse_usize_arg("--matches").unwrap_or(20);
    let events_per_match = parse_usize_arg("--events").unwrap_or(1200);
    let seed = parse_usize_arg("--seed").unwrap_or(1) as u64;

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;

    for idx in 0..matches {
        let raw = fake_events::synthetic_match_json(
            seed.wrapping_add(idx as u64),
            events_per_match,
            100 + (2 * idx as u64),
            101 + (2 * idx as u64),
        );
        let path = out_dir.join(format!("match_{:04}.json", idx + 1));
        fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    }

    println!("Synthetic event logs written");
    println!("Output: {}", out_dir.display());
    println!("Matches: {matches} events_per_match={events_per_match} seed={seed}");
    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            if !value.trim().is_empty() {
                return Some(PathBuf::from(value));
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}

fn parse_usize_arg(flag: &str) -> Option<usize> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix)
            && let Ok(parsed) = value.trim().parse::<usize>()
        {
            return Some(parsed);
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && let Ok(parsed) = next.trim().parse::<usize>()
        {
            return Some(parsed);
        }
    }
    None
}

fn path_from_env(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(raw))
}
