use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use matchflow::features::{self, LASSO_PREDICTOR_NAMES, TARGET_NAME};
use matchflow::lasso;
use matchflow::regression::ScoringModelArtifact;

const ARTIFACT_VERSION: u32 = 1;
const CV_FOLDS: usize = 5;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let matrix_dir = parse_path_arg("--matrices")
        .or_else(|| path_from_env("MATCHFLOW_MATRIX_DIR"))
        .unwrap_or_else(|| PathBuf::from("per_match_matrices"));
    let out_path =
        parse_path_arg("--out").unwrap_or_else(|| PathBuf::from("scoring_model_lasso.json"));

    let corpus = features::load_feature_corpus(&matrix_dir)?;
    for skip in &corpus.skipped {
        println!("[WARN] Skipping {}: {}", skip.file, skip.reason);
    }
    if corpus.rows.is_empty() {
        return Err(anyhow!(
            "no usable matrices under {} ({} skipped)",
            matrix_dir.display(),
            corpus.skipped.len()
        ));
    }

    let rows = corpus.lasso_rows();
    let targets = corpus.targets();
    let fit = lasso::fit_lasso_cv(&rows, &targets, CV_FOLDS)?;

    println!(
        "LASSO fit: {} matches retained, {} skipped, {}-fold cv",
        fit.samples,
        corpus.skipped.len(),
        fit.cv_folds
    );
    println!("Target: {TARGET_NAME}");
    println!("Coefficients (standardized scale):");
    for (name, coeff) in LASSO_PREDICTOR_NAMES.iter().zip(&fit.coeffs) {
        println!("  {name:28} coeff={coeff:+.6}");
    }
    println!("r_squared={:.6}", fit.r_squared);
    println!("best alpha={:.6}", fit.alpha);

    let artifact = ScoringModelArtifact {
        version: ARTIFACT_VERSION,
        generated_at: chrono::Utc::now().to_rfc3339(),
        matrix_dir: matrix_dir.display().to_string(),
        target: TARGET_NAME.to_string(),
        feature_names: LASSO_PREDICTOR_NAMES
            .iter()
            .map(|s| s.to_string())
            .collect(),
        intercept: fit.intercept,
        coeffs: fit.coeffs.clone(),
        r_squared: fit.r_squared,
        alpha: Some(fit.alpha),
        samples: fit.samples,
        skipped_matches: corpus.skipped.len(),
    };
    let raw = serde_json::to_string_pretty(&artifact).context("serialize artifact")?;
    fs::write(&out_path, raw).with_context(|| format!("write {}", out_path.display()))?;
    println!("artifact written: {}", out_path.display());
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
