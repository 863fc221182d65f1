use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::features::{FeatureCorpus, OLS_PREDICTOR_NAMES, TARGET_NAME};

/// Writes the retained-match feature table to a workbook: header row,
/// then one row per match in corpus order. Returns the data row count.
pub fn export_feature_table(path: &Path, corpus: &FeatureCorpus) -> Result<usize> {
    let mut rows = vec![header_row()];
    for (file, features) in corpus.files.iter().zip(&corpus.rows) {
        let mut row = vec![file.clone(), features.p_goal_given_shoot.to_string()];
        row.extend(
            features
                .ols_predictors()
                .iter()
                .map(|value| value.to_string()),
        );
        rows.push(row);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Features")?;
        write_rows(sheet, &rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(rows.len().saturating_sub(1))
}

fn header_row() -> Vec<String> {
    let mut header = vec!["Match".to_string(), TARGET_NAME.to_string()];
    header.extend(OLS_PREDICTOR_NAMES.iter().map(|name| name.to_string()));
    header
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
