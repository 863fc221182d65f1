use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::matrix::TransitionMatrix;

/// Engineered metric the fitted models predict.
pub const TARGET_NAME: &str = "P_goal_given_shoot";

/// Predictor set for the ordinary-least-squares fit.
pub const OLS_PREDICTOR_NAMES: [&str; 8] = [
    "retention_long_pass",
    "retention_short_pass",
    "P_shoot_given_poss",
    "P_cop_given_defense",
    "P_shortpass_given_poss",
    "P_poss_given_poss",
    "P_defense_non_foul",
    "P_shortpass_given_shortpass",
];

/// Reduced predictor set for the L1-regularized fit.
pub const LASSO_PREDICTOR_NAMES: [&str; 6] = [
    "retention_long_pass",
    "retention_short_pass",
    "P_shoot_given_poss",
    "P_cop_given_defense",
    "P_poss_given_poss",
    "P_shortpass_given_shortpass",
];

/// One match's engineered metrics, read off its transition matrix.
/// Retention metrics are 1 - P(turnover | action).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchFeatures {
    pub p_goal_given_shoot: f64,
    pub retention_long_pass: f64,
    pub retention_short_pass: f64,
    pub p_shoot_given_poss: f64,
    pub p_cop_given_defense: f64,
    pub p_shortpass_given_poss: f64,
    pub p_poss_given_poss: f64,
    pub p_defense_non_foul: f64,
    pub p_shortpass_given_shortpass: f64,
}

impl MatchFeatures {
    pub fn ols_predictors(&self) -> [f64; 8] {
        [
            self.retention_long_pass,
            self.retention_short_pass,
            self.p_shoot_given_poss,
            self.p_cop_given_defense,
            self.p_shortpass_given_poss,
            self.p_poss_given_poss,
            self.p_defense_non_foul,
            self.p_shortpass_given_shortpass,
        ]
    }

    pub fn lasso_predictors(&self) -> [f64; 6] {
        [
            self.retention_long_pass,
            self.retention_short_pass,
            self.p_shoot_given_poss,
            self.p_cop_given_defense,
            self.p_poss_given_poss,
            self.p_shortpass_given_shortpass,
        ]
    }
}

/// Reads the fixed lookup list off one matrix. Any missing row or column
/// label fails the whole match; the error names the failed lookup so the
/// caller can report it.
pub fn extract_match_features(matrix: &TransitionMatrix) -> Result<MatchFeatures> {
    let p_goal_given_shoot = lookup(matrix, "Shoot Attempt", "Goal")?;
    let p_cop_given_longpass = lookup(matrix, "Long Pass", "Change of Possession")?;
    let p_cop_given_shortpass = lookup(matrix, "Short Pass", "Change of Possession")?;
    let p_shoot_given_poss = lookup(matrix, "Possession", "Shoot Attempt")?;
    let p_cop_given_defense = lookup(matrix, "Defensive Action", "Change of Possession")?;
    let p_shortpass_given_poss = lookup(matrix, "Possession", "Short Pass")?;
    let p_poss_given_poss = lookup(matrix, "Possession", "Possession")?;
    let p_foul_given_defense = lookup(matrix, "Defensive Action", "Foul")?;
    let p_shortpass_given_shortpass = lookup(matrix, "Short Pass", "Short Pass")?;

    Ok(MatchFeatures {
        p_goal_given_shoot,
        retention_long_pass: 1.0 - p_cop_given_longpass,
        retention_short_pass: 1.0 - p_cop_given_shortpass,
        p_shoot_given_poss,
        p_cop_given_defense,
        p_shortpass_given_poss,
        p_poss_given_poss,
        p_defense_non_foul: 1.0 - p_foul_given_defense,
        p_shortpass_given_shortpass,
    })
}

fn lookup(matrix: &TransitionMatrix, from: &str, to: &str) -> Result<f64> {
    matrix
        .prob(from, to)
        .ok_or_else(|| anyhow!("missing {from:?} -> {to:?}"))
}

#[derive(Debug, Clone)]
pub struct SkippedMatch {
    pub file: String,
    pub reason: String,
}

/// Feature rows for every matrix in a corpus directory that carries the
/// full label set, plus skip notes for the ones that do not.
#[derive(Debug, Clone, Default)]
pub struct FeatureCorpus {
    pub files: Vec<String>,
    pub rows: Vec<MatchFeatures>,
    pub skipped: Vec<SkippedMatch>,
}

impl FeatureCorpus {
    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.p_goal_given_shoot).collect()
    }

    pub fn ols_rows(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.ols_predictors().to_vec()).collect()
    }

    pub fn lasso_rows(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|r| r.lasso_predictors().to_vec())
            .collect()
    }
}

/// Loads every persisted matrix (`*.csv`, sorted by name) under `dir`.
/// Unreadable or malformed files abort; matrices missing a required
/// label only exclude their match.
pub fn load_feature_corpus(dir: &Path) -> Result<FeatureCorpus> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read matrix directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();

    let mut corpus = FeatureCorpus::default();
    for path in paths {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("read matrix {}", path.display()))?;
        let matrix = TransitionMatrix::from_csv(&raw)
            .with_context(|| format!("parse matrix {}", path.display()))?;
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match extract_match_features(&matrix) {
            Ok(row) => {
                corpus.files.push(file);
                corpus.rows.push(row);
            }
            Err(err) => corpus.skipped.push(SkippedMatch {
                file,
                reason: err.to_string(),
            }),
        }
    }
    Ok(corpus)
}
