//! Submission spreadsheet rows.
//!
//! Fields are read by fixed position; the sheet layout is owned by the
//! submission form and never changes mid-event.

use csv::StringRecord;
use thiserror::Error;

/// Column C: sender name
pub const NAME_COLUMN: usize = 2;
/// Column D: sender title
pub const TITLE_COLUMN: usize = 3;
/// Column E: message body
pub const MESSAGE_COLUMN: usize = 4;
/// Column J: media link
pub const MEDIA_LINK_COLUMN: usize = 9;
/// Column K: exclusion flag
pub const EXCLUDE_COLUMN: usize = 10;

/// Minimum number of fields a row must carry
pub const MIN_FIELDS: usize = EXCLUDE_COLUMN + 1;

/// Errors that can occur while reading a row
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("Row has {actual} fields, expected at least {}", MIN_FIELDS)]
    TooShort { actual: usize },
}

/// One row of the submission spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRow {
    pub sender_name: String,
    pub sender_title: String,
    pub message: String,
    /// Raw media link, empty when none was submitted
    pub media_link: String,
    /// Any non-empty value excludes the row
    pub exclude_flag: String,
}

impl SubmissionRow {
    /// Build a row from positional fields
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, RowError> {
        if fields.len() < MIN_FIELDS {
            return Err(RowError::TooShort {
                actual: fields.len(),
            });
        }

        let field = |i: usize| fields[i].as_ref().to_string();
        Ok(Self {
            sender_name: field(NAME_COLUMN),
            sender_title: field(TITLE_COLUMN),
            message: field(MESSAGE_COLUMN),
            media_link: field(MEDIA_LINK_COLUMN),
            exclude_flag: field(EXCLUDE_COLUMN),
        })
    }

    /// Build a row from a CSV record
    pub fn from_record(record: &StringRecord) -> Result<Self, RowError> {
        let fields: Vec<&str> = record.iter().collect();
        Self::from_fields(&fields)
    }

    /// Whether the row has been flagged out of the wall
    pub fn is_excluded(&self) -> bool {
        !self.exclude_flag.is_empty()
    }

    /// All free-text fields, in the order they are accumulated
    pub fn text_fields(&self) -> [&str; 3] {
        [&self.sender_name, &self.sender_title, &self.message]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, link: &str, exclude: &str) -> Vec<String> {
        let mut row = vec![String::new(); MIN_FIELDS];
        row[NAME_COLUMN] = name.to_string();
        row[TITLE_COLUMN] = "Title".to_string();
        row[MESSAGE_COLUMN] = "Hello".to_string();
        row[MEDIA_LINK_COLUMN] = link.to_string();
        row[EXCLUDE_COLUMN] = exclude.to_string();
        row
    }

    #[test]
    fn test_from_fields_reads_positions() {
        let row = SubmissionRow::from_fields(&fields("Alice", "https://youtu.be/x", "")).unwrap();

        assert_eq!(row.sender_name, "Alice");
        assert_eq!(row.sender_title, "Title");
        assert_eq!(row.message, "Hello");
        assert_eq!(row.media_link, "https://youtu.be/x");
        assert!(!row.is_excluded());
    }

    #[test]
    fn test_short_row_is_rejected() {
        let short = vec!["a"; 10];
        assert_eq!(
            SubmissionRow::from_fields(&short),
            Err(RowError::TooShort { actual: 10 })
        );
    }

    #[test]
    fn test_any_flag_value_excludes() {
        let row = SubmissionRow::from_fields(&fields("Bob", "", "no")).unwrap();
        assert!(row.is_excluded());

        let row = SubmissionRow::from_fields(&fields("Bob", "", " ")).unwrap();
        assert!(row.is_excluded());
    }

    #[test]
    fn test_from_record() {
        let record = StringRecord::from(fields("Carol", "", ""));
        let row = SubmissionRow::from_record(&record).unwrap();
        assert_eq!(row.sender_name, "Carol");
        assert_eq!(row.text_fields(), ["Carol", "Title", "Hello"]);
    }
}
