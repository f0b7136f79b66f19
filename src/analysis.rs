//! Frequency report over one categorical column of a node table, such as the
//! `modularity_class` attribute exported by a community-detection tool.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::info;

use crate::error::{Result, WordGraphError};

pub const MODULARITY_COLUMN: &str = "modularity_class";
pub const NUM_CLASSES: usize = 5;

/// Occurrence counts in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    counts: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut table = FrequencyTable::new();
        for value in values {
            table.add(value.as_ref());
        }
        table
    }

    pub fn add(&mut self, value: &str) {
        match self.positions.get(value) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.positions.insert(value.to_string(), self.counts.len());
                self.counts.push((value.to_string(), 1));
            }
        }
    }

    pub fn count(&self, value: &str) -> usize {
        self.positions.get(value).map_or(0, |&i| self.counts[i].1)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// The `n` most frequent values, highest count first. Equal counts keep
    /// first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(value, count)| (value.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Count the values of `column` in CSV data with a header row.
pub fn count_column<R: Read>(reader: R, column: &str, source: &Path) -> Result<FrequencyTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let position = rdr
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| WordGraphError::MissingColumn {
            column: column.to_string(),
            path: source.to_path_buf(),
        })?;

    let mut table = FrequencyTable::new();
    for record in rdr.records() {
        let record = record?;
        table.add(record.get(position).unwrap_or_default());
    }
    Ok(table)
}

/// Load `path` and return the `top` most frequent values of `column`.
pub fn top_values<P: AsRef<Path>>(path: P, column: &str, top: usize) -> Result<Vec<(String, usize)>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| WordGraphError::file(path, e))?;
    let table = count_column(file, column, path)?;
    info!(
        rows = table.total(),
        distinct = table.len(),
        column,
        "counted column values"
    );
    Ok(table
        .most_common(top)
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect())
}
