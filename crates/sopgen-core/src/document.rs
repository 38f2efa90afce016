//! In-memory SOP document model
//!
//! A [`SopDocument`] is an ordered list of [`Table`]s, each tagged with the
//! [`TableRole`] it plays in the procedure. Tables hold header rows (part of the
//! template) followed by data rows (written by a build). Cells carry styled
//! paragraphs plus the two table-level properties the engine needs: background
//! shading and vertical merge state.
//!
//! The model mirrors WordprocessingML (`w:tbl` / `w:tr` /
//! `w:tc` / `w:p` / `w:r`) so the DOCX writer is a straight walk.

use crate::error::{Result, SopError};
use crate::style::StyleSheet;
use serde::{Deserialize, Serialize};

/// Paragraph alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Alignment {
    /// Left aligned (default)
    #[default]
    Left,
    /// Centered
    Center,
    /// Justified on both margins
    Justify,
}

impl Alignment {
    /// Parse an alignment name, case-insensitively.
    ///
    /// Unknown names fall back to [`Alignment::Left`].
    #[must_use = "parses alignment name"]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "LEFT" => Self::Left,
            "CENTER" | "CENTRE" => Self::Center,
            "JUSTIFY" | "BOTH" => Self::Justify,
            other => {
                log::warn!("Unknown paragraph alignment '{other}', using LEFT");
                Self::Left
            }
        }
    }
}

impl From<String> for Alignment {
    #[inline]
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// A run of text with uniform formatting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Run text
    pub text: String,
    /// Font family (None = inherit from style)
    pub font: Option<String>,
    /// Font size in points (None = inherit from style)
    pub size: Option<f32>,
    /// Bold weight
    pub bold: bool,
    /// Text color as `RRGGBB` hex (None = automatic)
    pub color: Option<String>,
}

impl TextRun {
    /// Create an unformatted run
    #[inline]
    #[must_use = "creates a text run"]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the font family
    #[inline]
    #[must_use = "returns the updated run"]
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Set the font size in points
    #[inline]
    #[must_use = "returns the updated run"]
    pub const fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set bold weight
    #[inline]
    #[must_use = "returns the updated run"]
    pub const fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the text color
    #[inline]
    #[must_use = "returns the updated run"]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A paragraph inside a table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph alignment
    pub alignment: Alignment,
    /// Text runs, in order
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Create an empty paragraph with the given alignment
    #[inline]
    #[must_use = "creates a paragraph"]
    pub const fn new(alignment: Alignment) -> Self {
        Self {
            alignment,
            runs: Vec::new(),
        }
    }

    /// Append a run
    #[inline]
    pub fn push_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Concatenated run text
    #[must_use = "returns paragraph text"]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Vertical merge state of a cell (`w:vMerge`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalMerge {
    /// First cell of a merged span; holds the content
    Restart,
    /// Continuation of the span above; content is ignored when rendered
    Continue,
}

/// A table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Paragraphs, in order (may be empty; writers emit a blank paragraph)
    pub paragraphs: Vec<Paragraph>,
    /// Background fill as `RRGGBB` hex
    pub shading: Option<String>,
    /// Vertical merge state
    pub v_merge: Option<VerticalMerge>,
}

impl Cell {
    /// Create a cell holding a single unformatted paragraph
    #[must_use = "creates a cell"]
    pub fn with_text(text: &str) -> Self {
        let mut paragraph = Paragraph::default();
        if !text.is_empty() {
            paragraph.push_run(TextRun::new(text));
        }
        Self {
            paragraphs: vec![paragraph],
            ..Self::default()
        }
    }

    /// Remove all paragraphs
    #[inline]
    pub fn clear(&mut self) {
        self.paragraphs.clear();
    }

    /// Append a paragraph and return it for further editing
    pub fn add_paragraph(&mut self, alignment: Alignment) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::new(alignment));
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    /// Set the background fill, replacing any previous fill
    #[inline]
    pub fn set_shading(&mut self, fill: impl Into<String>) {
        self.shading = Some(fill.into());
    }

    /// Cell text, paragraphs joined with newlines
    #[must_use = "returns cell text"]
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Iterate over every run in the cell
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut TextRun> {
        self.paragraphs.iter_mut().flat_map(|p| p.runs.iter_mut())
    }
}

/// A table row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cells, left to right
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a row of `columns` empty cells
    #[must_use = "creates a row"]
    pub fn empty(columns: usize) -> Self {
        Self {
            cells: vec![Cell::default(); columns],
        }
    }

    /// Create a row of unformatted text cells
    #[must_use = "creates a row"]
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        Self {
            cells: texts.iter().map(|t| Cell::with_text(t.as_ref())).collect(),
        }
    }

    /// Cell texts, left to right
    #[must_use = "returns cell texts"]
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(Cell::text).collect()
    }
}

/// The part a table plays in the procedure document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableRole {
    /// Process name, code, owner, revision
    ProcessInfo,
    /// Purpose statement
    Purpose,
    /// Scope statement
    Scope,
    /// Abbreviations and definitions
    Abbreviations,
    /// Referenced documents and approvals
    References,
    /// Key process inputs and outputs
    KeyInputsOutputs,
    /// Step-by-step process description
    ProcessSteps,
    /// General policies
    GeneralPolicies,
}

impl TableRole {
    /// All roles in master-template order
    pub const ALL: [Self; 8] = [
        Self::ProcessInfo,
        Self::Purpose,
        Self::Scope,
        Self::Abbreviations,
        Self::References,
        Self::KeyInputsOutputs,
        Self::ProcessSteps,
        Self::GeneralPolicies,
    ];

    /// Stable kebab-case name
    #[inline]
    #[must_use = "returns role name"]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProcessInfo => "process-info",
            Self::Purpose => "purpose",
            Self::Scope => "scope",
            Self::Abbreviations => "abbreviations",
            Self::References => "references",
            Self::KeyInputsOutputs => "key-inputs-outputs",
            Self::ProcessSteps => "process-steps",
            Self::GeneralPolicies => "general-policies",
        }
    }

    /// Front-matter tables get uniform font normalization
    #[inline]
    #[must_use = "classifies the role"]
    pub const fn is_front_matter(&self) -> bool {
        !matches!(self, Self::ProcessSteps | Self::GeneralPolicies)
    }
}

impl std::fmt::Display for TableRole {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A table: header rows from the template, then data rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    role: TableRole,
    columns: usize,
    header_rows: usize,
    rows: Vec<Row>,
}

impl Table {
    /// Create a table with no rows
    #[must_use = "creates a table"]
    pub const fn new(role: TableRole, columns: usize) -> Self {
        Self {
            role,
            columns,
            header_rows: 0,
            rows: Vec::new(),
        }
    }

    /// Role of this table
    #[inline]
    #[must_use = "returns table role"]
    pub const fn role(&self) -> TableRole {
        self.role
    }

    /// Column count
    #[inline]
    #[must_use = "returns column count"]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of header rows
    #[inline]
    #[must_use = "returns header row count"]
    pub const fn header_rows(&self) -> usize {
        self.header_rows
    }

    /// Add a header row. Header rows always precede data rows.
    ///
    /// # Errors
    ///
    /// Returns [`SopError::InvalidLayout`] if data rows were already appended
    /// or the row is wider than the table.
    pub fn push_header_row(&mut self, mut row: Row) -> Result<()> {
        if self.rows.len() != self.header_rows {
            return Err(SopError::InvalidLayout(format!(
                "{} table: header row added after data rows",
                self.role
            )));
        }
        if row.cells.len() > self.columns {
            return Err(SopError::InvalidLayout(format!(
                "{} table: header row has {} cells but the table has {} columns",
                self.role,
                row.cells.len(),
                self.columns
            )));
        }
        row.cells.resize_with(self.columns, Cell::default);
        self.rows.push(row);
        self.header_rows += 1;
        Ok(())
    }

    /// All rows, header rows first
    #[inline]
    #[must_use = "returns all rows"]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to all rows
    #[inline]
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Data rows only
    #[inline]
    #[must_use = "returns data rows"]
    pub fn data_rows(&self) -> &[Row] {
        &self.rows[self.header_rows..]
    }

    /// Mutable data rows
    #[inline]
    pub fn data_rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows[self.header_rows..]
    }

    /// Number of data rows
    #[inline]
    #[must_use = "returns data row count"]
    pub fn data_row_count(&self) -> usize {
        self.rows.len() - self.header_rows
    }

    /// Drop every data row, keeping the header rows
    #[inline]
    pub fn clear_data_rows(&mut self) {
        self.rows.truncate(self.header_rows);
    }

    /// Append an empty data row and return its data-row index
    pub fn append_row(&mut self) -> usize {
        self.rows.push(Row::empty(self.columns));
        self.data_row_count() - 1
    }

    /// Data row by index
    #[inline]
    #[must_use = "returns the data row"]
    pub fn data_row(&self, row: usize) -> Option<&Row> {
        self.data_rows().get(row)
    }

    /// Mutable data row by index
    #[inline]
    pub fn data_row_mut(&mut self, row: usize) -> Option<&mut Row> {
        self.data_rows_mut().get_mut(row)
    }
}

/// A procedure document built from a template layout
///
/// A document accumulates rows while it is being built, so every build must
/// own its own instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SopDocument {
    template: String,
    style: StyleSheet,
    tables: Vec<Table>,
}

impl SopDocument {
    /// Create an empty document
    #[must_use = "creates a document"]
    pub fn new(template: impl Into<String>, style: StyleSheet) -> Self {
        Self {
            template: template.into(),
            style,
            tables: Vec::new(),
        }
    }

    /// Name of the layout this document was instantiated from
    #[inline]
    #[must_use = "returns template name"]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Styling applied by the renderers
    #[inline]
    #[must_use = "returns the style sheet"]
    pub const fn style(&self) -> &StyleSheet {
        &self.style
    }

    /// Append a table at the end of the document
    #[inline]
    pub fn push_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// All tables in document order
    #[inline]
    #[must_use = "returns tables"]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Table by role
    #[must_use = "returns the table"]
    pub fn table(&self, role: TableRole) -> Option<&Table> {
        self.tables.iter().find(|t| t.role() == role)
    }

    /// Mutable table by role
    ///
    /// # Errors
    ///
    /// Returns [`SopError::MissingTable`] if the template has no such table.
    pub fn table_mut(&mut self, role: TableRole) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.role() == role)
            .ok_or(SopError::MissingTable(role))
    }

    /// Mutable iteration over tables, for document-wide passes
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.tables.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_from_name() {
        assert_eq!(Alignment::from_name("CENTER"), Alignment::Center);
        assert_eq!(Alignment::from_name("justify"), Alignment::Justify);
        assert_eq!(Alignment::from_name(" Left "), Alignment::Left);
        assert_eq!(Alignment::from_name("DIAGONAL"), Alignment::Left);
        assert_eq!(Alignment::from_name(""), Alignment::Left);
    }

    #[test]
    fn test_alignment_deserialize_unknown() {
        let a: Alignment = serde_json::from_str("\"RIGHT\"").unwrap();
        assert_eq!(a, Alignment::Left);
        let a: Alignment = serde_json::from_str("\"JUSTIFY\"").unwrap();
        assert_eq!(a, Alignment::Justify);
    }

    #[test]
    fn test_header_rows_are_padded() {
        let mut table = Table::new(TableRole::Abbreviations, 2);
        table
            .push_header_row(Row::from_texts(&["Abbreviations and Definitions"]))
            .unwrap();
        table
            .push_header_row(Row::from_texts(&["Term", "Definition"]))
            .unwrap();
        assert_eq!(table.header_rows(), 2);
        assert_eq!(table.rows()[0].cells.len(), 2);
        assert_eq!(table.data_row_count(), 0);
    }

    #[test]
    fn test_header_row_too_wide() {
        let mut table = Table::new(TableRole::Scope, 1);
        let err = table
            .push_header_row(Row::from_texts(&["a", "b"]))
            .unwrap_err();
        assert!(matches!(err, SopError::InvalidLayout(_)));
    }

    #[test]
    fn test_header_row_after_data_rejected() {
        let mut table = Table::new(TableRole::Scope, 1);
        table.append_row();
        assert!(table.push_header_row(Row::from_texts(&["Scope"])).is_err());
    }

    #[test]
    fn test_append_and_clear_data_rows() {
        let mut table = Table::new(TableRole::ProcessSteps, 7);
        table.push_header_row(Row::from_texts(&["Ref"])).unwrap();
        assert_eq!(table.append_row(), 0);
        assert_eq!(table.append_row(), 1);
        assert_eq!(table.data_row_count(), 2);
        assert_eq!(table.data_row(1).unwrap().cells.len(), 7);

        table.clear_data_rows();
        assert_eq!(table.data_row_count(), 0);
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn test_cell_text_joins_paragraphs() {
        let mut cell = Cell::default();
        cell.add_paragraph(Alignment::Left)
            .push_run(TextRun::new("Review"));
        cell.add_paragraph(Alignment::Left);
        cell.add_paragraph(Alignment::Center)
            .push_run(TextRun::new("Approve"));
        assert_eq!(cell.text(), "Review\n\nApprove");
    }

    #[test]
    fn test_missing_table() {
        let mut doc = SopDocument::new("test", StyleSheet::default());
        doc.push_table(Table::new(TableRole::Purpose, 1));
        assert!(doc.table(TableRole::Purpose).is_some());
        let err = doc.table_mut(TableRole::ProcessSteps).unwrap_err();
        assert!(matches!(err, SopError::MissingTable(TableRole::ProcessSteps)));
    }

    #[test]
    fn test_role_names() {
        for role in TableRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
        assert!(TableRole::References.is_front_matter());
        assert!(!TableRole::ProcessSteps.is_front_matter());
    }
}
