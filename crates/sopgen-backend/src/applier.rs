//! Applies planned SLA merge ranges to rendered step rows
//!
//! Only the SLA column is touched. Every cell inside a range is shaded; ranges
//! longer than one row become a vertical merge anchored on their first row,
//! and only that anchor carries the SLA text.

use crate::planner::MergeRange;
use sopgen_core::{
    Alignment, Cell, Result, Section, StepColumn, StyleSheet, TextRun, VerticalMerge,
};

/// Apply `ranges` to the SLA column of `section`
///
/// Data row `i` of the section must hold step `i`.
///
/// # Errors
///
/// Returns [`sopgen_core::SopError::RowOutOfRange`] if a range extends past
/// the rendered rows.
pub fn apply_merge_ranges(
    section: &mut Section<'_, StepColumn>,
    ranges: &[MergeRange],
    style: &StyleSheet,
) -> Result<()> {
    for range in ranges {
        for row in range.start..=range.end {
            let cell = section.require_cell(row, StepColumn::Sla)?;
            cell.set_shading(style.sla_fill.as_str());

            if range.is_merged() {
                cell.v_merge = Some(if row == range.start {
                    VerticalMerge::Restart
                } else {
                    VerticalMerge::Continue
                });
            }

            if row == range.start {
                write_value(cell, &range.value, style);
            }
        }
    }
    Ok(())
}

/// Put `value` into the cell's first run, creating paragraph and run if the
/// cell was not rendered with one
fn write_value(cell: &mut Cell, value: &str, style: &StyleSheet) {
    if cell.paragraphs.is_empty() {
        cell.add_paragraph(Alignment::Center);
    }
    let paragraph = &mut cell.paragraphs[0];
    match paragraph.runs.first_mut() {
        Some(run) => run.text = value.to_string(),
        None => paragraph.push_run(
            TextRun::new(value)
                .font(style.font_family.as_str())
                .size(style.raci_size),
        ),
    }
}
