//! Reference dataset of labeled repositories
//!
//! Loaded once from a CSV table with one identifier column, one label column
//! and any number of feature indicator columns. Feature columns keep the
//! order they have in the file; that order becomes the [`FeatureSchema`].

use crate::{Error, FeatureSchema, FeatureVector, Result};
use ahash::AHashMap;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_ID_COLUMN: &str = "repository";
pub const DEFAULT_LABEL_COLUMN: &str = "deployment";

/// Column naming for dataset loading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetOptions {
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_label_column")]
    pub label_column: String,
}

fn default_id_column() -> String {
    DEFAULT_ID_COLUMN.to_string()
}

fn default_label_column() -> String {
    DEFAULT_LABEL_COLUMN.to_string()
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            label_column: default_label_column(),
        }
    }
}

/// One historical repository record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceRow {
    pub repository_id: String,
    pub label: String,
    pub features: Vec<i64>,
}

impl ReferenceRow {
    pub fn new(repository_id: impl Into<String>, label: impl Into<String>, features: Vec<i64>) -> Self {
        Self {
            repository_id: repository_id.into(),
            label: label.into(),
            features,
        }
    }

    /// Raw (unstandardized) feature vector
    pub fn vector(&self) -> FeatureVector {
        FeatureVector::from_indicators(&self.features)
    }
}

/// Immutable table of reference rows sharing one schema
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    schema: FeatureSchema,
    rows: Vec<ReferenceRow>,
    index: AHashMap<String, usize>,
}

impl ReferenceDataset {
    /// Build a dataset from rows already in schema order
    pub fn from_rows(schema: FeatureSchema, rows: Vec<ReferenceRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::Schema("dataset has no rows".to_string()));
        }

        let mut index = AHashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            schema.check_dimension(row.features.len())?;
            if index.insert(row.repository_id.clone(), i).is_some() {
                return Err(Error::DuplicateRepository(row.repository_id.clone()));
            }
        }

        Ok(Self { schema, rows, index })
    }

    /// Load a dataset from a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P, options: &DatasetOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading reference dataset from {:?}", path);
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, options)
    }

    /// Load a dataset from any CSV source
    ///
    /// The header is validated before any data row is read, so a missing
    /// label or identifier column fails without touching the rest.
    pub fn from_reader<R: Read>(reader: R, options: &DatasetOptions) -> Result<Self> {
        let mut table = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = table.headers()?.clone();
        let layout = ColumnLayout::resolve(&headers, options)?;
        let schema = FeatureSchema::new(
            layout
                .feature_columns
                .iter()
                .map(|&c| headers[c].to_string())
                .collect(),
        )?;
        debug!("Feature schema: {:?}", schema.names());

        let mut rows = Vec::new();
        for (i, record) in table.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 2);
            rows.push(layout.parse_row(&record, &headers, line)?);
        }

        let dataset = Self::from_rows(schema, rows)?;
        info!(
            "Loaded {} reference repositories with {} features",
            dataset.len(),
            dataset.schema.len()
        );
        Ok(dataset)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&ReferenceRow> {
        self.rows.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row index of a repository
    pub fn position(&self, repository_id: &str) -> Option<usize> {
        self.index.get(repository_id).copied()
    }

    pub fn get(&self, repository_id: &str) -> Option<&ReferenceRow> {
        self.position(repository_id).map(|i| &self.rows[i])
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.label.as_str())
    }

    /// Raw feature matrix, one vector per row
    pub fn feature_matrix(&self) -> Vec<FeatureVector> {
        self.rows.iter().map(ReferenceRow::vector).collect()
    }
}

/// Column positions resolved from a CSV header
struct ColumnLayout {
    id_column: usize,
    label_column: usize,
    feature_columns: Vec<usize>,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord, options: &DatasetOptions) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let label_column = find(&options.label_column).ok_or_else(|| {
            Error::Schema(format!("label column '{}' not found", options.label_column))
        })?;
        let id_column = find(&options.id_column).ok_or_else(|| {
            Error::Schema(format!("identifier column '{}' not found", options.id_column))
        })?;

        let feature_columns = (0..headers.len())
            .filter(|&c| c != id_column && c != label_column)
            .collect();

        Ok(Self {
            id_column,
            label_column,
            feature_columns,
        })
    }

    /// Ragged rows are checked here rather than in the reader, so a missing
    /// cell reports the column it belongs to
    fn parse_row(&self, record: &StringRecord, headers: &StringRecord, line: usize) -> Result<ReferenceRow> {
        if let Some(extra) = record.get(headers.len()) {
            return Err(Error::DataFormat {
                row: line,
                column: format!("#{}", headers.len() + 1),
                value: extra.to_string(),
            });
        }

        let field = |c: usize| {
            record.get(c).ok_or_else(|| Error::DataFormat {
                row: line,
                column: headers[c].to_string(),
                value: String::new(),
            })
        };

        let features = self
            .feature_columns
            .iter()
            .map(|&c| {
                let raw = field(c)?;
                parse_indicator(raw).ok_or_else(|| Error::DataFormat {
                    row: line,
                    column: headers[c].to_string(),
                    value: raw.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ReferenceRow::new(field(self.id_column)?, field(self.label_column)?, features))
    }
}

/// Coerce a cell to an integer indicator
///
/// `Yes`/`No` and `true`/`false` (any case) map to 1/0; anything else must
/// parse as an integer.
pub fn parse_indicator(raw: &str) -> Option<i64> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true") {
        return Some(1);
    }
    if value.eq_ignore_ascii_case("no") || value.eq_ignore_ascii_case("false") {
        return Some(0);
    }
    value.parse::<i64>().ok()
}
