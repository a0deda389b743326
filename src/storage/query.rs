//! Query definitions understood by every record store.

use std::fmt;

use super::DataError;
use crate::models::{ball_columns, match_columns, Field, Record};

/// Logical tables in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    BallEvents,
    MatchRecords,
}

impl TableName {
    pub const ALL: [TableName; 2] = [TableName::BallEvents, TableName::MatchRecords];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::BallEvents => "ball_events",
            TableName::MatchRecords => "match_records",
        }
    }

    /// Column names of this table.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableName::BallEvents => ball_columns::ALL,
            TableName::MatchRecords => match_columns::ALL,
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Filename of the Parquet copy.
    pub fn parquet_filename(&self) -> String {
        format!("{}.parquet", self.as_str())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column equals a literal after coercion to the literal's type
    Equals { column: String, value: Field },
    /// Column is present and not blank
    NotNull { column: String },
}

impl Filter {
    pub fn equals(column: &str, value: impl Into<Field>) -> Self {
        Filter::Equals {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn not_null(column: &str) -> Self {
        Filter::NotNull {
            column: column.to_string(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Equals { column, .. } | Filter::NotNull { column } => column,
        }
    }

    /// Evaluate against a record.
    ///
    /// Numeric literals compare numerically, boolean literals compare as
    /// flags, text compares exactly after trimming. A field that cannot be
    /// coerced to the literal's type does not match.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::NotNull { column } => Field::get(record, column).to_key().is_some(),
            Filter::Equals { column, value } => {
                let field = Field::get(record, column);
                match value {
                    Field::Null => field.to_key().is_none(),
                    Field::Bool(b) => field.to_flag() == Some(*b),
                    Field::Int(_) | Field::Float(_) => {
                        matches!((field.to_float(), value.to_float()), (Some(a), Some(b)) if a == b)
                    }
                    Field::Text(_) => field.to_key().is_some() && field.to_key() == value.to_key(),
                }
            }
        }
    }
}

/// A fully specified fetch request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: TableName,
    /// Columns to keep; `None` keeps every column
    pub columns: Option<Vec<String>>,
    pub filters: Vec<Filter>,
}

impl Query {
    /// Select every row and column of a table.
    pub fn table(table: TableName) -> Self {
        Self {
            table,
            columns: None,
            filters: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Check every referenced column exists in the table.
    pub fn validate(&self) -> Result<(), DataError> {
        let projected = self.columns.iter().flatten().map(String::as_str);
        let filtered = self.filters.iter().map(Filter::column);

        for column in projected.chain(filtered) {
            if !self.table.has_column(column) {
                return Err(DataError::Query(format!(
                    "unknown column '{}' in table {}",
                    column, self.table
                )));
            }
        }
        if matches!(&self.columns, Some(c) if c.is_empty()) {
            return Err(DataError::Query(format!(
                "empty projection on table {}",
                self.table
            )));
        }
        Ok(())
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Keep only the projected columns. Projected columns missing from the
    /// record come back as null.
    pub fn project(&self, mut record: Record) -> Record {
        match &self.columns {
            None => record,
            Some(columns) => columns
                .iter()
                .map(|c| {
                    let value = record.remove(c).unwrap_or_default();
                    (c.clone(), value)
                })
                .collect(),
        }
    }

    /// Validate, filter and project a scan of the query's table, keeping
    /// input order.
    pub fn apply<I>(&self, rows: I) -> Result<Vec<Record>, DataError>
    where
        I: IntoIterator<Item = Record>,
    {
        self.validate()?;
        Ok(rows
            .into_iter()
            .filter(|r| self.matches(r))
            .map(|r| self.project(r))
            .collect())
    }
}
