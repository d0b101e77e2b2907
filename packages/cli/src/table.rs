use std::path::Path;

use anyhow::Context;
use common::validate::{can_submit_table, is_row_active, row_problems};
use common::{PlatformRow, PlatformTable};
use serde::Deserialize;

/// Platform table file: one `[[platform]]` entry per row.
#[derive(Debug, Default, Deserialize)]
pub struct TableFile {
    #[serde(default, rename = "platform")]
    pub platforms: Vec<PlatformRow>,
}

pub fn load_rows(path: &Path) -> anyhow::Result<Vec<PlatformRow>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: TableFile =
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(file.platforms)
}

/// A row that failed validation, with the labels of its bad fields.
#[derive(Debug, PartialEq, Eq)]
pub struct RowReport {
    /// 1-based position in the file.
    pub position: usize,
    pub platform_id: String,
    pub fields: Vec<&'static str>,
}

/// Validate every row. `Ok` holds the table to submit, without blank rows.
pub fn check_rows(rows: Vec<PlatformRow>) -> Result<PlatformTable, Vec<RowReport>> {
    if !can_submit_table(&rows) {
        let reports = rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let problems = row_problems(row);
                (!problems.is_empty()).then(|| RowReport {
                    position: i + 1,
                    platform_id: row.platform_id.trim().to_owned(),
                    fields: problems.iter().map(|f| f.label()).collect(),
                })
            })
            .collect();
        return Err(reports);
    }

    Ok(rows.into_iter().filter(is_row_active).collect())
}
