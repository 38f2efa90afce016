//! Template layouts
//!
//! A layout describes the table skeletons of a procedure template: which
//! tables exist, in what order, how many columns each has, and the text of
//! their header rows. Layouts are plain TOML:
//!
//! ```toml
//! name = "master"
//!
//! [style]
//! sla_fill = "F2F2F2"
//!
//! [[tables]]
//! role = "process-steps"
//! columns = 7
//! header = [["Ref", "Process Description", "R", "A", "C", "I", "SLA"]]
//! ```
//!
//! Every build instantiates a fresh [`SopDocument`] from the layout; the
//! layout itself is never mutated and can be shared freely.

use crate::document::{Row, SopDocument, Table, TableRole};
use crate::error::{Result, SopError};
use crate::style::StyleSheet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Name of the built-in layout
pub const MASTER_LAYOUT: &str = "master";

/// Skeleton of one template table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSkeleton {
    /// Role of the table
    pub role: TableRole,
    /// Column count
    pub columns: usize,
    /// Header rows, top to bottom; short rows are padded with empty cells
    #[serde(default)]
    pub header: Vec<Vec<String>>,
}

impl TableSkeleton {
    fn new(role: TableRole, columns: usize, header: &[&[&str]]) -> Self {
        Self {
            role,
            columns,
            header: header
                .iter()
                .map(|row| row.iter().map(|s| (*s).to_string()).collect())
                .collect(),
        }
    }
}

/// A template layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayout {
    /// Layout name
    pub name: String,
    /// Styling applied by the renderers
    #[serde(default)]
    pub style: StyleSheet,
    /// Table skeletons in document order
    pub tables: Vec<TableSkeleton>,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self::master()
    }
}

impl TemplateLayout {
    /// The built-in master template
    #[must_use = "returns the master layout"]
    pub fn master() -> Self {
        Self {
            name: MASTER_LAYOUT.to_string(),
            style: StyleSheet::default(),
            tables: vec![
                TableSkeleton::new(
                    TableRole::ProcessInfo,
                    2,
                    &[
                        &["Process Name", ""],
                        &["Process Code", ""],
                        &["Process Owner", ""],
                        &["Revision", ""],
                    ],
                ),
                TableSkeleton::new(TableRole::Purpose, 1, &[&["Purpose"]]),
                TableSkeleton::new(TableRole::Scope, 1, &[&["Scope"]]),
                TableSkeleton::new(
                    TableRole::Abbreviations,
                    2,
                    &[&["Abbreviations and Definitions"], &["Term", "Definition"]],
                ),
                TableSkeleton::new(
                    TableRole::References,
                    2,
                    &[
                        &["Referenced Documents and Approvals"],
                        &["Document ID", "Document Title"],
                    ],
                ),
                TableSkeleton::new(
                    TableRole::KeyInputsOutputs,
                    2,
                    &[&["Key Process Inputs", "Key Process Outputs"]],
                ),
                TableSkeleton::new(
                    TableRole::ProcessSteps,
                    7,
                    &[&["Ref", "Process Description", "R", "A", "C", "I", "SLA"]],
                ),
                TableSkeleton::new(
                    TableRole::GeneralPolicies,
                    2,
                    &[&["Ref", "General Policies"]],
                ),
            ],
        }
    }

    /// Parse and validate a layout from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`SopError::TomlError`] for malformed TOML and
    /// [`SopError::InvalidLayout`] if the layout is inconsistent.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let layout: Self = toml::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read and validate a layout file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise as
    /// [`TemplateLayout::from_toml_str`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading template layout from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Render the layout as TOML
    ///
    /// # Errors
    ///
    /// Returns [`SopError::TomlSerError`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check table roles are unique and header rows fit their tables
    ///
    /// # Errors
    ///
    /// Returns [`SopError::InvalidLayout`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for skeleton in &self.tables {
            if !seen.insert(skeleton.role) {
                return Err(SopError::InvalidLayout(format!(
                    "table role '{}' appears more than once",
                    skeleton.role
                )));
            }
            if skeleton.columns == 0 {
                return Err(SopError::InvalidLayout(format!(
                    "{} table has no columns",
                    skeleton.role
                )));
            }
            if let Some(row) = skeleton.header.iter().find(|r| r.len() > skeleton.columns) {
                return Err(SopError::InvalidLayout(format!(
                    "{} table: header row has {} cells but the table has {} columns",
                    skeleton.role,
                    row.len(),
                    skeleton.columns
                )));
            }
        }
        Ok(())
    }

    /// Create a fresh document with header rows only
    ///
    /// # Errors
    ///
    /// Returns [`SopError::InvalidLayout`] if a header row does not fit its
    /// table.
    pub fn instantiate(&self) -> Result<SopDocument> {
        let mut doc = SopDocument::new(self.name.clone(), self.style.clone());
        for skeleton in &self.tables {
            let mut table = Table::new(skeleton.role, skeleton.columns);
            for header in &skeleton.header {
                table.push_header_row(Row::from_texts(header))?;
            }
            doc.push_table(table);
        }
        Ok(doc)
    }
}
