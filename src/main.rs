use std::path::PathBuf;

use anyhow::Result;

use matchflow::batch;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let input_dir = parse_path_arg("--input")
        .or_else(|| path_from_env("MATCHFLOW_DATA_DIR"))
        .unwrap_or_else(|| PathBuf::from("data"));

    if has_flag("--combined") {
        let output_path = parse_path_arg("--out")
            .or_else(|| path_from_env("MATCHFLOW_COMBINED_OUT"))
            .unwrap_or_else(|| PathBuf::from("transition_matrix.csv"));
        let summary = batch::process_combined(&input_dir, &output_path)?;
        println!("Combined matrix complete");
        println!("Input: {}", input_dir.display());
        println!("Output: {}", output_path.display());
        println!("Matches concatenated: {}", summary.matches);
        println!("Transitions: {}", summary.transitions_total);
        if !summary.empty_matches.is_empty() {
            println!("[WARN] Corpus produced no transitions");
        }
        return Ok(());
    }

    let output_dir = parse_path_arg("--out-dir")
        .or_else(|| path_from_env("MATCHFLOW_MATRIX_DIR"))
        .unwrap_or_else(|| PathBuf::from("per_match_matrices"));

    let summary = batch::process_matches(&input_dir, &output_dir)?;
    println!("Per-match matrices complete");
    println!("Input: {}", input_dir.display());
    println!("Output: {}", output_dir.display());
    println!(
        "Matches: {} matrices={} transitions={}",
        summary.matches, summary.matrices_written, summary.transitions_total
    );
    for base in &summary.empty_matches {
        println!("[WARN] {base}: no usable transitions");
    }
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

fn path_from_env(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(raw))
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}
