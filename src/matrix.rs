use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};

use crate::transitions::Transition;

/// Row-stochastic phase-transition matrix for one match (or one combined
/// corpus). Rows and columns share the same lexicographically sorted set
/// of observed phase labels, so two matches can disagree on shape; all
/// reads go through label-keyed lookups that signal misses explicitly.
/// A phase never observed as a source keeps an all-zero row.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    labels: Vec<String>,
    probs: Vec<Vec<f64>>,
    // Raw counts are only known at build time; matrices reloaded from
    // disk carry probabilities alone.
    counts: Option<Vec<Vec<u64>>>,
}

impl TransitionMatrix {
    pub fn from_transitions(transitions: &[Transition]) -> Self {
        let mut labels: Vec<String> = transitions
            .iter()
            .flat_map(|(src, dst)| [src.label().to_string(), dst.label().to_string()])
            .collect();
        labels.sort();
        labels.dedup();

        let n = labels.len();
        let index: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.as_str(), idx))
            .collect();
        let mut counts = vec![vec![0u64; n]; n];
        for (src, dst) in transitions {
            let i = index[src.label()];
            let j = index[dst.label()];
            counts[i][j] += 1;
        }

        let mut probs = vec![vec![0.0f64; n]; n];
        for (i, row) in counts.iter().enumerate() {
            let total: u64 = row.iter().sum();
            if total == 0 {
                continue;
            }
            for (j, count) in row.iter().enumerate() {
                probs[i][j] = *count as f64 / total as f64;
            }
        }

        Self {
            labels,
            probs,
            counts: Some(counts),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    /// P(next = `to` | current = `from`); `None` when either label was
    /// not observed in this match.
    pub fn prob(&self, from: &str, to: &str) -> Option<f64> {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        Some(self.probs[i][j])
    }

    pub fn count(&self, from: &str, to: &str) -> Option<u64> {
        let counts = self.counts.as_ref()?;
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        Some(counts[i][j])
    }

    pub fn row_count_total(&self, from: &str) -> Option<u64> {
        let counts = self.counts.as_ref()?;
        let i = self.index_of(from)?;
        Some(counts[i].iter().sum())
    }

    pub fn row_prob_sum(&self, from: &str) -> Option<f64> {
        let i = self.index_of(from)?;
        Some(self.probs[i].iter().sum())
    }

    /// Renders the matrix in the persisted wire shape: a header row of
    /// column labels behind a leading empty cell, then one labelled row
    /// per phase. Labels are a closed comma-free set, so fields are
    /// written bare.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for label in &self.labels {
            out.push(',');
            out.push_str(label);
        }
        out.push('\n');
        for (i, label) in self.labels.iter().enumerate() {
            out.push_str(label);
            for value in &self.probs[i] {
                out.push(',');
                out.push_str(&value.to_string());
            }
            out.push('\n');
        }
        out
    }

    pub fn from_csv(raw: &str) -> Result<Self> {
        let mut lines = raw.lines();
        let header = lines.next().ok_or_else(|| anyhow!("empty matrix file"))?;
        let header_fields: Vec<&str> = header.split(',').collect();
        if !header_fields[0].is_empty() {
            return Err(anyhow!("matrix header must start with an empty cell"));
        }
        let labels: Vec<String> = header_fields[1..]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if !labels.is_sorted() {
            return Err(anyhow!("matrix labels are not sorted"));
        }

        let mut row_labels = Vec::with_capacity(labels.len());
        let mut probs = Vec::with_capacity(labels.len());
        for line in lines {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != labels.len() + 1 {
                return Err(anyhow!(
                    "matrix row has {} fields, expected {}",
                    fields.len(),
                    labels.len() + 1
                ));
            }
            row_labels.push(fields[0].to_string());
            let row: Vec<f64> = fields[1..]
                .iter()
                .map(|field| {
                    field
                        .parse::<f64>()
                        .with_context(|| format!("invalid matrix cell {field:?}"))
                })
                .collect::<Result<_>>()?;
            probs.push(row);
        }
        if row_labels != labels {
            return Err(anyhow!("matrix row labels do not match column labels"));
        }

        Ok(Self {
            labels,
            probs,
            counts: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::Phase;

    fn sample_transitions() -> Vec<Transition> {
        vec![
            (Phase::LongPass, Phase::ShortPass),
            (Phase::ShortPass, Phase::ShootAttempt),
            (Phase::ShootAttempt, Phase::Goal),
            (Phase::Goal, Phase::SetPieceRestart),
            (Phase::SetPieceRestart, Phase::ShortPass),
            (Phase::ShortPass, Phase::Possession),
        ]
    }

    #[test]
    fn labels_are_sorted_and_deduplicated() {
        let matrix = TransitionMatrix::from_transitions(&sample_transitions());
        let labels: Vec<&str> = matrix.labels().iter().map(|s| s.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Goal",
                "Long Pass",
                "Possession",
                "Set Piece / Restart",
                "Shoot Attempt",
                "Short Pass",
            ]
        );
    }

    #[test]
    fn rows_sum_to_one_or_are_all_zero() {
        let matrix = TransitionMatrix::from_transitions(&sample_transitions());
        for label in matrix.labels() {
            let sum = matrix.row_prob_sum(label).expect("known label");
            let outgoing = matrix.row_count_total(label).expect("counts available");
            if outgoing == 0 {
                assert_eq!(sum, 0.0, "unobserved source {label} must stay zero");
            } else {
                assert!((sum - 1.0).abs() < 1e-12, "row {label} sums to {sum}");
            }
        }
        // "Possession" appears only as a destination here.
        assert_eq!(matrix.row_count_total("Possession"), Some(0));
    }

    #[test]
    fn counts_and_probabilities_agree() {
        let matrix = TransitionMatrix::from_transitions(&sample_transitions());
        assert_eq!(matrix.count("Short Pass", "Shoot Attempt"), Some(1));
        assert_eq!(matrix.count("Short Pass", "Possession"), Some(1));
        assert_eq!(matrix.row_count_total("Short Pass"), Some(2));
        assert_eq!(matrix.prob("Short Pass", "Shoot Attempt"), Some(0.5));
        assert_eq!(matrix.prob("Shoot Attempt", "Goal"), Some(1.0));
    }

    #[test]
    fn lookup_miss_is_explicit() {
        let matrix = TransitionMatrix::from_transitions(&sample_transitions());
        assert_eq!(matrix.prob("Foul", "Goal"), None);
        assert_eq!(matrix.prob("Goal", "Foul"), None);
        assert_eq!(matrix.row_prob_sum("Duel"), None);
    }

    #[test]
    fn output_is_independent_of_transition_order() {
        let forward = sample_transitions();
        let mut reversed = sample_transitions();
        reversed.reverse();
        assert_eq!(
            TransitionMatrix::from_transitions(&forward),
            TransitionMatrix::from_transitions(&reversed)
        );
    }

    #[test]
    fn csv_reload_preserves_probabilities() {
        let built = TransitionMatrix::from_transitions(&sample_transitions());
        let reloaded = TransitionMatrix::from_csv(&built.to_csv()).expect("own csv parses");
        assert_eq!(reloaded.labels(), built.labels());
        for from in built.labels() {
            for to in built.labels() {
                assert_eq!(reloaded.prob(from, to), built.prob(from, to));
            }
        }
        // Counts do not survive persistence.
        assert_eq!(reloaded.count("Goal", "Set Piece / Restart"), None);
    }

    #[test]
    fn empty_transition_list_builds_an_empty_matrix() {
        let matrix = TransitionMatrix::from_transitions(&[]);
        assert!(matrix.is_empty());
        let reloaded = TransitionMatrix::from_csv(&matrix.to_csv()).expect("empty csv parses");
        assert!(reloaded.is_empty());
    }

    #[test]
    fn from_csv_rejects_ragged_rows() {
        let raw = ",Goal,Short Pass\nGoal,0.5\n";
        assert!(TransitionMatrix::from_csv(raw).is_err());
    }

    #[test]
    fn from_csv_rejects_mismatched_row_labels() {
        let raw = ",Goal,Short Pass\nGoal,0.0,1.0\nDuel,0.0,0.0\n";
        assert!(TransitionMatrix::from_csv(raw).is_err());
    }
}
