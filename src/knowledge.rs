//! CSV-backed question/answer store
//!
//! Loads `(subject, question, answer)` rows once and answers exact-match
//! lookups against them. The full table, extra columns included, is kept
//! for display and for the free-text prompt.

use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Answer returned when no record matches a question
pub const NO_ANSWER_FOUND: &str = "Sorry, no answer found for that question.";

const SUBJECT_COLUMN: &str = "subject";
const QUESTION_COLUMN: &str = "question";
const ANSWER_COLUMN: &str = "answer";

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Data file not found: {0}")]
    MissingResource(String),
    #[error("Required column missing from header: {column}")]
    Schema { column: &'static str },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// One row of the data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaRecord {
    pub subject: String,
    pub question: String,
    pub answer: String,
}

impl QaRecord {
    pub fn new(
        subject: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Column positions of the required fields within a header row
struct ColumnMap {
    subject: usize,
    question: usize,
    answer: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> KnowledgeResult<Self> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or(KnowledgeError::Schema { column })
        };

        Ok(Self {
            subject: find(SUBJECT_COLUMN)?,
            question: find(QUESTION_COLUMN)?,
            answer: find(ANSWER_COLUMN)?,
        })
    }

    fn extract(&self, row: &csv::StringRecord) -> QaRecord {
        let field = |idx: usize| row.get(idx).unwrap_or_default().to_string();
        QaRecord {
            subject: field(self.subject),
            question: field(self.question),
            answer: field(self.answer),
        }
    }
}

/// Immutable set of records with a first-match question index
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    records: Vec<QaRecord>,
    /// Trimmed header names in file order
    columns: Vec<String>,
    /// Every row padded to `columns.len()`, parallel to `records`
    rows: Vec<Vec<String>>,
    /// question text -> index of the first record carrying it
    first_match: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Load records from a CSV file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> KnowledgeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KnowledgeError::MissingResource(path.display().to_string()));
        }

        let file = File::open(path)?;
        let kb = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            records = kb.len(),
            "Loaded knowledge base"
        );
        Ok(kb)
    }

    /// Parse records from any CSV source. Any malformed row fails the whole load.
    pub fn from_reader<R: Read>(reader: R) -> KnowledgeResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            return Err(KnowledgeError::Schema {
                column: SUBJECT_COLUMN,
            });
        }
        let map = ColumnMap::from_headers(&headers)?;
        let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

        let mut records = Vec::new();
        let mut rows = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            records.push(map.extract(&row));
            rows.push(
                (0..columns.len())
                    .map(|idx| row.get(idx).unwrap_or_default().to_string())
                    .collect(),
            );
        }

        Ok(Self::with_table(records, columns, rows))
    }

    /// Build from bare records; the table holds only the three required columns
    pub fn from_records(records: Vec<QaRecord>) -> Self {
        let columns = [SUBJECT_COLUMN, QUESTION_COLUMN, ANSWER_COLUMN]
            .map(String::from)
            .to_vec();
        let rows = records
            .iter()
            .map(|r| vec![r.subject.clone(), r.question.clone(), r.answer.clone()])
            .collect();
        Self::with_table(records, columns, rows)
    }

    fn with_table(records: Vec<QaRecord>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut first_match = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            first_match.entry(record.question.clone()).or_insert(idx);
        }
        Self {
            records,
            columns,
            rows,
            first_match,
        }
    }

    /// Records in file order
    pub fn records(&self) -> &[QaRecord] {
        &self.records
    }

    /// Header names of the data file
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw rows in file order, one value per column
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Answer of the first record whose question equals `question` exactly.
    ///
    /// Misses are an ordinary outcome and yield [`NO_ANSWER_FOUND`].
    pub fn lookup_answer(&self, question: &str) -> &str {
        self.first_match
            .get(question)
            .and_then(|&idx| self.records.get(idx))
            .map_or(NO_ANSWER_FOUND, |r| r.answer.as_str())
    }

    /// Flatten every row into one line of `column: value` pairs, all columns included
    pub fn prompt_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            let pairs: Vec<String> = self
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| format!("{column}: {value}"))
                .collect();
            text.push_str(&pairs.join(", "));
            text.push('\n');
        }
        text
    }
}
