//! Step row rendering
//!
//! Turns one [`Step`] into one styled row of the process-steps table. Each
//! row depends only on its own step; cross-row concerns (the SLA column) are
//! left to the merge applier.

use sopgen_core::{Alignment, Cell, RaciRole, RowMut, Step, StepColumn, StyleSheet, TextRun};

/// RACI role for each RACI column, in column order
const RACI_COLUMNS: [(StepColumn, RaciRole); 4] = [
    (StepColumn::Responsible, RaciRole::Responsible),
    (StepColumn::Accountable, RaciRole::Accountable),
    (StepColumn::Consulted, RaciRole::Consulted),
    (StepColumn::Informed, RaciRole::Informed),
];

/// Renders steps into rows using a style sheet
#[derive(Debug, Clone, Copy)]
pub struct RowRenderer<'s> {
    style: &'s StyleSheet,
}

impl<'s> RowRenderer<'s> {
    /// Create a renderer for the given style
    #[inline]
    #[must_use = "creates a renderer"]
    pub const fn new(style: &'s StyleSheet) -> Self {
        Self { style }
    }

    /// Fill a freshly appended row from `step`
    pub fn render(&self, step: &Step, row: &mut RowMut<'_, StepColumn>) {
        write_ref(row.cell(StepColumn::Ref), &step.reference, self.style);
        self.write_description(row.cell(StepColumn::Description), step);

        for (column, role) in RACI_COLUMNS {
            let value = step.raci.get(role).unwrap_or(self.style.placeholder.as_str());
            self.write_small(row.cell(column), value);
        }
        // Blank until the merge applier assigns a value
        self.write_small(row.cell(StepColumn::Sla), "");

        if step.is_gateway {
            for column in StepColumn::SHADED_BY_GATEWAY {
                row.cell(column).set_shading(self.style.gateway_fill.as_str());
            }
        }
    }

    fn write_description(&self, cell: &mut Cell, step: &Step) {
        cell.clear();
        for spec in &step.paragraphs {
            let paragraph = cell.add_paragraph(spec.alignment);
            if spec.text.is_empty() {
                continue;
            }
            paragraph.push_run(
                TextRun::new(spec.text.as_str())
                    .font(self.style.font_family.as_str())
                    .size(self.paragraph_size(spec.font_size))
                    .bold(spec.bold)
                    .color(self.style.description_color.as_str()),
            );
        }
    }

    /// Requested size, or the style default when absent or not a positive number
    fn paragraph_size(&self, requested: Option<f32>) -> f32 {
        match requested {
            Some(size) if size.is_finite() && size > 0.0 => size,
            Some(size) => {
                log::warn!(
                    "Invalid paragraph font size {size}, using {}",
                    self.style.default_paragraph_size
                );
                self.style.default_paragraph_size
            }
            None => self.style.default_paragraph_size,
        }
    }

    fn write_small(&self, cell: &mut Cell, text: &str) {
        cell.clear();
        cell.add_paragraph(Alignment::Center).push_run(
            TextRun::new(text)
                .font(self.style.font_family.as_str())
                .size(self.style.raci_size),
        );
    }
}

/// Write a centered, emphasized reference number; empty text leaves the
/// paragraph without a run
pub(crate) fn write_ref(cell: &mut Cell, text: &str, style: &StyleSheet) {
    cell.clear();
    let paragraph = cell.add_paragraph(Alignment::Center);
    if !text.is_empty() {
        paragraph.push_run(
            TextRun::new(text)
                .font(style.font_family.as_str())
                .size(style.ref_size)
                .bold(true)
                .color(style.ref_color.as_str()),
        );
    }
}
