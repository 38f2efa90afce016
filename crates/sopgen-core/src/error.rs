//! Error types for SOP document generation.
//!
//! Every fallible operation in the workspace reports a [`SopError`]. Template
//! structure problems are fatal to a build: the assembler never hands back a
//! half-populated document.

use crate::document::TableRole;
use thiserror::Error;

/// Error types that can occur while loading inputs, assembling a document or
/// writing it out.
///
/// # Examples
///
/// ```
/// use sopgen_core::{SopError, TableRole};
///
/// let err = SopError::MissingTable(TableRole::ProcessSteps);
/// assert!(err.is_structural());
/// assert_eq!(err.to_string(), "Template has no process-steps table");
/// ```
#[derive(Error, Debug)]
pub enum SopError {
    /// The template does not contain a table the build needs.
    #[error("Template has no {0} table")]
    MissingTable(TableRole),

    /// A template table is narrower than the rows written into it.
    #[error("Template {role} table has {found} columns, expected at least {expected}")]
    ColumnCount {
        /// Table that failed the check
        role: TableRole,
        /// Columns the section needs
        expected: usize,
        /// Columns the template provides
        found: usize,
    },

    /// A merge range or cell lookup pointed past the rendered data rows.
    #[error("Row {row} is out of range for the {role} table ({rows} data rows)")]
    RowOutOfRange {
        /// Table that was addressed
        role: TableRole,
        /// Requested data row
        row: usize,
        /// Data rows present
        rows: usize,
    },

    /// Template layout is inconsistent (duplicate roles, oversized header rows).
    #[error("Invalid template layout: {0}")]
    InvalidLayout(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Build input or plan output JSON error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Layout or configuration TOML could not be parsed.
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Layout could not be rendered as TOML.
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// The DOCX package could not be written.
    #[error("DOCX write error: {0}")]
    DocxError(String),
}

impl SopError {
    /// Whether this error comes from the template's table structure.
    ///
    /// Structural errors abort the build; the caller should discard any
    /// document it was holding.
    #[inline]
    #[must_use = "classifies the error"]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingTable(_) | Self::ColumnCount { .. } | Self::RowOutOfRange { .. }
        )
    }
}

/// Type alias for [`Result<T, SopError>`].
pub type Result<T> = std::result::Result<T, SopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_display() {
        let error = SopError::MissingTable(TableRole::GeneralPolicies);
        assert_eq!(format!("{error}"), "Template has no general-policies table");
        assert!(error.is_structural());
    }

    #[test]
    fn test_column_count_display() {
        let error = SopError::ColumnCount {
            role: TableRole::ProcessSteps,
            expected: 7,
            found: 5,
        };
        let display = format!("{error}");
        assert_eq!(
            display,
            "Template process-steps table has 5 columns, expected at least 7"
        );
        assert!(error.is_structural());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "steps.json");
        let sop_err: SopError = io_err.into();

        match sop_err {
            SopError::IoError(ref e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected IoError variant"),
        }
        assert!(!sop_err.is_structural());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ steps: ").unwrap_err();
        let sop_err: SopError = json_err.into();
        assert!(matches!(sop_err, SopError::JsonError(_)));
        assert!(!sop_err.is_structural());
    }

    #[test]
    fn test_docx_error_display() {
        let error = SopError::DocxError("zip writer closed".to_string());
        assert_eq!(format!("{error}"), "DOCX write error: zip writer closed");
    }
}
