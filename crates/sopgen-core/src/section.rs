//! Typed table sections
//!
//! A [`Section`] binds a table of a [`SopDocument`] to a column enum, so the
//! renderers address cells as `StepColumn::Sla` rather than "column 6 of
//! table 6". Binding checks the table exists and is wide enough; after that,
//! typed cell access on appended rows cannot go out of bounds.

use crate::document::{Cell, Row, SopDocument, Table, TableRole};
use crate::error::{Result, SopError};
use std::marker::PhantomData;

/// Column set of one kind of table
pub trait Column: Copy {
    /// Table these columns belong to
    const ROLE: TableRole;
    /// Number of columns the section writes
    const COUNT: usize;

    /// Zero-based column index
    fn index(self) -> usize;
}

/// Columns of the process-steps table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepColumn {
    /// Reference number
    Ref,
    /// Multi-paragraph description
    Description,
    /// RACI: responsible
    Responsible,
    /// RACI: accountable
    Accountable,
    /// RACI: consulted
    Consulted,
    /// RACI: informed
    Informed,
    /// Service-level target
    Sla,
}

impl StepColumn {
    /// Every column except SLA, which has its own shading rules
    pub const SHADED_BY_GATEWAY: [Self; 6] = [
        Self::Ref,
        Self::Description,
        Self::Responsible,
        Self::Accountable,
        Self::Consulted,
        Self::Informed,
    ];
}

impl Column for StepColumn {
    const ROLE: TableRole = TableRole::ProcessSteps;
    const COUNT: usize = 7;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Columns of the abbreviations table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbbreviationColumn {
    /// Abbreviated term
    Term,
    /// Definition
    Definition,
}

impl Column for AbbreviationColumn {
    const ROLE: TableRole = TableRole::Abbreviations;
    const COUNT: usize = 2;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Columns of the referenced-documents table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceColumn {
    /// Document identifier
    DocumentId,
    /// Document title
    Title,
}

impl Column for ReferenceColumn {
    const ROLE: TableRole = TableRole::References;
    const COUNT: usize = 2;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Columns of the general-policies table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyColumn {
    /// Running policy number
    Ref,
    /// Policy statement
    Policy,
}

impl Column for PolicyColumn {
    const ROLE: TableRole = TableRole::GeneralPolicies;
    const COUNT: usize = 2;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Typed handle on one table of a document
#[derive(Debug)]
pub struct Section<'a, C: Column> {
    table: &'a mut Table,
    _columns: PhantomData<C>,
}

impl<'a, C: Column> Section<'a, C> {
    /// Bind the table for `C::ROLE`
    ///
    /// # Errors
    ///
    /// Returns [`SopError::MissingTable`] if the document has no such table, or
    /// [`SopError::ColumnCount`] if it has fewer than `C::COUNT` columns.
    pub fn bind(doc: &'a mut SopDocument) -> Result<Self> {
        let table = doc.table_mut(C::ROLE)?;
        if table.columns() < C::COUNT {
            return Err(SopError::ColumnCount {
                role: C::ROLE,
                expected: C::COUNT,
                found: table.columns(),
            });
        }
        Ok(Self {
            table,
            _columns: PhantomData,
        })
    }

    /// Drop all data rows, keeping the template's header rows
    #[inline]
    pub fn clear_data_rows(&mut self) {
        self.table.clear_data_rows();
    }

    /// Append an empty data row
    pub fn append_row(&mut self) -> RowMut<'_, C> {
        let index = self.table.append_row();
        let row = &mut self.table.data_rows_mut()[index];
        RowMut {
            index,
            row,
            _columns: PhantomData,
        }
    }

    /// Cell of an existing data row
    pub fn cell_at(&mut self, row: usize, column: C) -> Option<&mut Cell> {
        self.table
            .data_row_mut(row)
            .and_then(|r| r.cells.get_mut(column.index()))
    }

    /// Cell of an existing data row, as a structural error when absent
    ///
    /// # Errors
    ///
    /// Returns [`SopError::RowOutOfRange`] if `row` is not a data row.
    pub fn require_cell(&mut self, row: usize, column: C) -> Result<&mut Cell> {
        let rows = self.table.data_row_count();
        self.cell_at(row, column).ok_or(SopError::RowOutOfRange {
            role: C::ROLE,
            row,
            rows,
        })
    }

    /// Number of data rows
    #[inline]
    #[must_use = "returns data row count"]
    pub fn len(&self) -> usize {
        self.table.data_row_count()
    }

    /// Whether the section has no data rows
    #[inline]
    #[must_use = "checks for data rows"]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A freshly appended data row
#[derive(Debug)]
pub struct RowMut<'a, C: Column> {
    index: usize,
    row: &'a mut Row,
    _columns: PhantomData<C>,
}

impl<C: Column> RowMut<'_, C> {
    /// Data-row index of this row
    #[inline]
    #[must_use = "returns row index"]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Cell in a typed column
    #[inline]
    pub fn cell(&mut self, column: C) -> &mut Cell {
        &mut self.row.cells[column.index()]
    }

    /// Every cell of the row, including columns past `C::COUNT`
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.row.cells.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Alignment, TextRun};
    use crate::style::StyleSheet;

    fn doc_with(role: TableRole, columns: usize) -> SopDocument {
        let mut doc = SopDocument::new("test", StyleSheet::default());
        let mut table = Table::new(role, columns);
        table
            .push_header_row(crate::document::Row::from_texts(&["Ref"]))
            .unwrap();
        doc.push_table(table);
        doc
    }

    #[test]
    fn test_bind_checks_columns() {
        let mut doc = doc_with(TableRole::ProcessSteps, 5);
        let err = Section::<StepColumn>::bind(&mut doc).unwrap_err();
        assert!(matches!(
            err,
            SopError::ColumnCount {
                expected: 7,
                found: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_bind_missing_table() {
        let mut doc = doc_with(TableRole::ProcessSteps, 7);
        let err = Section::<PolicyColumn>::bind(&mut doc).unwrap_err();
        assert!(matches!(
            err,
            SopError::MissingTable(TableRole::GeneralPolicies)
        ));
    }

    #[test]
    fn test_append_and_address_cells() {
        let mut doc = doc_with(TableRole::ProcessSteps, 7);
        let mut section = Section::<StepColumn>::bind(&mut doc).unwrap();
        {
            let mut row = section.append_row();
            assert_eq!(row.index(), 0);
            row.cell(StepColumn::Sla)
                .add_paragraph(Alignment::Center)
                .push_run(TextRun::new("2h"));
        }
        assert_eq!(section.len(), 1);
        assert_eq!(section.cell_at(0, StepColumn::Sla).unwrap().text(), "2h");
        assert!(section.cell_at(1, StepColumn::Sla).is_none());
        assert!(matches!(
            section.require_cell(3, StepColumn::Ref),
            Err(SopError::RowOutOfRange { row: 3, rows: 1, .. })
        ));

        section.clear_data_rows();
        assert!(section.is_empty());
        assert_eq!(doc.table(TableRole::ProcessSteps).unwrap().rows().len(), 1);
    }

    #[test]
    fn test_cells_mut_covers_wide_tables() {
        let mut doc = doc_with(TableRole::Abbreviations, 4);
        let mut section = Section::<AbbreviationColumn>::bind(&mut doc).unwrap();
        let mut row = section.append_row();
        assert_eq!(row.cells_mut().count(), 4);
    }

    #[test]
    fn test_column_indices() {
        assert_eq!(StepColumn::Ref.index(), 0);
        assert_eq!(StepColumn::Sla.index(), 6);
        assert_eq!(StepColumn::SHADED_BY_GATEWAY.len(), StepColumn::COUNT - 1);
        assert_eq!(PolicyColumn::Policy.index(), 1);
    }
}
