//! DOCX (Microsoft Word) writer
//!
//! # Architecture
//!
//! The in-memory model maps one-to-one onto WordprocessingML, so writing is a
//! straight walk through `docx-rs` builders:
//!
//! - [`SopDocument`] tables → `w:tbl`, separated by empty paragraphs so Word
//!   does not join adjacent tables
//! - [`Row`](sopgen_core::Row) → `w:tr`
//! - [`Cell`] → `w:tc` with `w:shd` (fill) and `w:vMerge` (restart/continue)
//! - [`Paragraph`] → `w:p` with `w:jc`
//! - [`TextRun`] → `w:r` with `w:rFonts`, `w:sz` (half-points), `w:b`, `w:color`
//!
//! Cells without paragraphs get one empty paragraph; a `w:tc` must contain at
//! least one block element.

// Font sizes are small positive point values; rounding to half-points is exact
// enough and can never overflow usize.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use docx_rs::{
    AlignmentType, Docx, RunFonts, Shading, ShdType, TableCell, TableRow, VMergeType,
};
use sopgen_core::{
    Alignment, Cell, Paragraph, Result, SopDocument, SopError, Table, TextRun, VerticalMerge,
};
use std::io::{Cursor, Seek, Write};
use std::path::Path;

/// Usable page width in twips (A4 with 2 cm margins)
const PAGE_WIDTH_TWIPS: usize = 9638;

/// Writes [`SopDocument`]s as `.docx` packages
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxWriter;

impl DocxWriter {
    /// Build the `docx-rs` document tree
    #[must_use = "returns the docx document tree"]
    pub fn to_docx(doc: &SopDocument) -> Docx {
        let mut docx = Docx::new();
        for (index, table) in doc.tables().iter().enumerate() {
            if index > 0 {
                docx = docx.add_paragraph(docx_rs::Paragraph::new());
            }
            docx = docx.add_table(convert_table(table));
        }
        docx
    }

    /// Write the package to any seekable writer
    ///
    /// # Errors
    ///
    /// Returns [`SopError::DocxError`] if the ZIP package cannot be written.
    pub fn write<W: Write + Seek>(doc: &SopDocument, writer: W) -> Result<()> {
        Self::to_docx(doc)
            .build()
            .pack(writer)
            .map_err(|e| SopError::DocxError(e.to_string()))
    }

    /// Serialize to an in-memory byte buffer
    ///
    /// # Errors
    ///
    /// Returns [`SopError::DocxError`] if the ZIP package cannot be written.
    pub fn to_bytes(doc: &SopDocument) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::write(doc, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Serialize to a file, replacing it if it exists
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written, or
    /// [`SopError::DocxError`] if packaging fails.
    pub fn write_file<P: AsRef<Path>>(doc: &SopDocument, path: P) -> Result<()> {
        let bytes = Self::to_bytes(doc)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn convert_table(table: &Table) -> docx_rs::Table {
    let rows = table
        .rows()
        .iter()
        .map(|row| TableRow::new(row.cells.iter().map(convert_cell).collect()))
        .collect();
    let column_width = PAGE_WIDTH_TWIPS / table.columns().max(1);
    docx_rs::Table::new(rows).set_grid(vec![column_width; table.columns()])
}

fn convert_cell(cell: &Cell) -> TableCell {
    let mut tc = TableCell::new();
    if cell.paragraphs.is_empty() {
        tc = tc.add_paragraph(docx_rs::Paragraph::new());
    }
    for paragraph in &cell.paragraphs {
        tc = tc.add_paragraph(convert_paragraph(paragraph));
    }
    if let Some(fill) = &cell.shading {
        tc = tc.shading(
            Shading::new()
                .shd_type(ShdType::Clear)
                .color("auto")
                .fill(fill.as_str()),
        );
    }
    match cell.v_merge {
        Some(VerticalMerge::Restart) => tc.vertical_merge(VMergeType::Restart),
        Some(VerticalMerge::Continue) => tc.vertical_merge(VMergeType::Continue),
        None => tc,
    }
}

fn convert_paragraph(paragraph: &Paragraph) -> docx_rs::Paragraph {
    let alignment = match paragraph.alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Justify => AlignmentType::Both,
    };
    paragraph
        .runs
        .iter()
        .fold(docx_rs::Paragraph::new().align(alignment), |p, run| {
            p.add_run(convert_run(run))
        })
}

fn convert_run(run: &TextRun) -> docx_rs::Run {
    let mut r = docx_rs::Run::new().add_text(run.text.as_str());
    if let Some(font) = &run.font {
        r = r.fonts(
            RunFonts::new()
                .ascii(font.as_str())
                .hi_ansi(font.as_str())
                .cs(font.as_str()),
        );
    }
    if let Some(size) = run.size {
        match half_points(size) {
            Some(sz) => r = r.size(sz),
            None => log::warn!("Invalid font size {size} on run, using style default"),
        }
    }
    if run.bold {
        r = r.bold();
    }
    if let Some(color) = &run.color {
        r = r.color(color.as_str());
    }
    r
}

/// Points to the half-point units of `w:sz`, `None` unless at least one unit
#[inline]
fn half_points(points: f32) -> Option<usize> {
    let units = (points * 2.0).round();
    (units.is_finite() && units >= 1.0).then_some(units as usize)
}
