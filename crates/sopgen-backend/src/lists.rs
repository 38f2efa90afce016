//! Sibling list tables: abbreviations, referenced documents, general policies
//!
//! Each table is cleared back to its header rows and gets one row per record.
//! An empty list yields a single placeholder row instead of an empty table.

use crate::renderer::write_ref;
use sopgen_core::{
    Abbreviation, AbbreviationColumn, Alignment, Cell, Column, Policy, PolicyColumn, Reference,
    ReferenceColumn, Result, Section, SopDocument, StyleSheet, TextRun,
};

/// Write one left-aligned run at list size
fn write_list_text(cell: &mut Cell, text: &str, bold: bool, style: &StyleSheet) {
    cell.clear();
    cell.add_paragraph(Alignment::Left).push_run(
        TextRun::new(text)
            .font(style.font_family.as_str())
            .size(style.list_size)
            .bold(bold),
    );
}

/// Fill a two-column table whose first column is bold
fn fill_key_value<C: Column>(
    doc: &mut SopDocument,
    columns: [C; 2],
    records: &[(&str, &str)],
) -> Result<()> {
    let style = doc.style().clone();
    let mut section = Section::<C>::bind(doc)?;
    section.clear_data_rows();

    if records.is_empty() {
        let mut row = section.append_row();
        for cell in row.cells_mut() {
            write_list_text(cell, &style.placeholder, false, &style);
        }
        return Ok(());
    }

    let [key, value] = columns;
    for (key_text, value_text) in records {
        let mut row = section.append_row();
        write_list_text(row.cell(key), key_text, true, &style);
        write_list_text(row.cell(value), value_text, false, &style);
    }
    Ok(())
}

/// Populate the abbreviations table
///
/// # Errors
///
/// Returns a structural error if the template has no usable abbreviations
/// table.
pub fn populate_abbreviations(doc: &mut SopDocument, items: &[Abbreviation]) -> Result<()> {
    let records: Vec<(&str, &str)> = items
        .iter()
        .map(|a| (a.term.as_str(), a.definition.as_str()))
        .collect();
    log::debug!("Writing {} abbreviation rows", records.len());
    fill_key_value(
        doc,
        [AbbreviationColumn::Term, AbbreviationColumn::Definition],
        &records,
    )
}

/// Populate the referenced-documents table
///
/// # Errors
///
/// Returns a structural error if the template has no usable references table.
pub fn populate_references(doc: &mut SopDocument, items: &[Reference]) -> Result<()> {
    let records: Vec<(&str, &str)> = items
        .iter()
        .map(|r| (r.id.as_str(), r.title.as_str()))
        .collect();
    log::debug!("Writing {} reference rows", records.len());
    fill_key_value(
        doc,
        [ReferenceColumn::DocumentId, ReferenceColumn::Title],
        &records,
    )
}

/// Populate the general-policies table
///
/// Policies are numbered from 1 in a reference column styled like step
/// reference numbers.
///
/// # Errors
///
/// Returns a structural error if the template has no usable policies table.
pub fn populate_policies(doc: &mut SopDocument, items: &[Policy]) -> Result<()> {
    log::debug!("Writing {} policy rows", items.len());
    let style = doc.style().clone();
    let mut section = Section::<PolicyColumn>::bind(doc)?;
    section.clear_data_rows();

    if items.is_empty() {
        let mut row = section.append_row();
        for cell in row.cells_mut() {
            write_list_text(cell, &style.placeholder, true, &style);
        }
        write_ref(row.cell(PolicyColumn::Ref), &style.placeholder, &style);
        return Ok(());
    }

    for (number, item) in (1..).zip(items) {
        let mut row = section.append_row();
        write_ref(row.cell(PolicyColumn::Ref), &number.to_string(), &style);
        write_list_text(row.cell(PolicyColumn::Policy), &item.policy, true, &style);
    }
    Ok(())
}
