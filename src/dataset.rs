use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};

/// Cell values pandas reads back as missing.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// A headered CSV held in memory as strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV at {}", path.display()))?;

        Self::from_csv(reader).with_context(|| format!("Failed to read CSV at {}", path.display()))
    }

    pub fn from_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers: Vec<String> = reader
            .headers()
            .context("Missing CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() {
            bail!("CSV header row is empty");
        }

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("CSV parse error at row {idx}"))?;
            if record.len() > headers.len() {
                bail!(
                    "Row {idx} has {} fields but the header has {}",
                    record.len(),
                    headers.len()
                );
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| {
                anyhow!(
                    "Column '{name}' not found (available: {})",
                    self.headers.join(", ")
                )
            })
    }

    /// Index of `name`, appending an empty column when it does not exist.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Ok(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    pub fn get(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = value.into();
        }
    }

    /// A row is done once its score cell holds something other than a
    /// missing marker.
    pub fn is_completed(&self, row: usize, score_column: usize) -> bool {
        !is_missing(self.get(row, score_column))
    }

    /// Writes next to `path` first and renames over it, so an interrupted
    /// save leaves the previous file intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = temp_sibling(path);
        {
            let mut writer = csv::Writer::from_path(&tmp)
                .with_context(|| format!("Failed to create {}", tmp.display()))?;
            writer
                .write_record(&self.headers)
                .context("Failed to write CSV header")?;
            for row in &self.rows {
                writer.write_record(row).context("Failed to write CSV row")?;
            }
            writer.flush().context("Failed to flush CSV writer")?;
        }

        fs::rename(&tmp, path).with_context(|| {
            format!("Failed to move {} over {}", tmp.display(), path.display())
        })?;
        Ok(())
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset.csv".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
