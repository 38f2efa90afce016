//! Document assembly
//!
//! Orchestrates one build: template in, finished document out. The template
//! document is taken by value and returned only on success, so a failed build
//! never leaves a half-populated document with the caller.

use crate::applier::apply_merge_ranges;
use crate::lists::{populate_abbreviations, populate_policies, populate_references};
use crate::planner::plan_merge_ranges;
use crate::renderer::RowRenderer;
use sopgen_core::{
    AbbreviationColumn, BuildInput, PolicyColumn, ReferenceColumn, Result, Section, SopDocument,
    StepColumn, TemplateLayout,
};

/// Options for document assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Apply the document font and front-matter size to every run of the
    /// front-matter tables
    pub normalize_front_matter: bool,
}

impl Default for AssemblyOptions {
    #[inline]
    fn default() -> Self {
        Self {
            normalize_front_matter: true,
        }
    }
}

/// Builds procedure documents from step sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentAssembler {
    options: AssemblyOptions,
}

impl DocumentAssembler {
    /// Assembler with default options
    #[inline]
    #[must_use = "creates an assembler"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembler with explicit options
    #[inline]
    #[must_use = "creates an assembler"]
    pub const fn with_options(options: AssemblyOptions) -> Self {
        Self { options }
    }

    /// Populate `doc` from `input`
    ///
    /// # Errors
    ///
    /// Returns a structural error if a required table is missing or too
    /// narrow. The partially built document is dropped.
    pub fn assemble(&self, mut doc: SopDocument, input: &BuildInput) -> Result<SopDocument> {
        check_structure(&mut doc)?;

        if self.options.normalize_front_matter {
            normalize_front_matter(&mut doc);
        }

        populate_abbreviations(&mut doc, &input.abbreviations)?;
        populate_references(&mut doc, &input.references)?;
        populate_steps(&mut doc, input)?;
        populate_policies(&mut doc, &input.policies)?;

        log::info!(
            "Assembled '{}' document: {} steps, {} abbreviations, {} references, {} policies",
            doc.template(),
            input.steps.len(),
            input.abbreviations.len(),
            input.references.len(),
            input.policies.len()
        );
        Ok(doc)
    }

    /// Instantiate `layout` and assemble a document from it
    ///
    /// # Errors
    ///
    /// As [`TemplateLayout::instantiate`] and [`DocumentAssembler::assemble`].
    pub fn build(&self, layout: &TemplateLayout, input: &BuildInput) -> Result<SopDocument> {
        let doc = layout.instantiate()?;
        self.assemble(doc, input)
    }
}

/// Fail before touching any table if a required one is missing
fn check_structure(doc: &mut SopDocument) -> Result<()> {
    Section::<StepColumn>::bind(doc)?;
    Section::<AbbreviationColumn>::bind(doc)?;
    Section::<ReferenceColumn>::bind(doc)?;
    Section::<PolicyColumn>::bind(doc)?;
    Ok(())
}

/// Apply the document font and front-matter size to every front-matter run
fn normalize_front_matter(doc: &mut SopDocument) {
    let font = doc.style().font_family.clone();
    let size = doc.style().front_matter_size;
    for table in doc.tables_mut().filter(|t| t.role().is_front_matter()) {
        for row in table.rows_mut() {
            for cell in &mut row.cells {
                for run in cell.runs_mut() {
                    run.font = Some(font.clone());
                    run.size = Some(size);
                }
            }
        }
    }
}

/// Render one row per step, then merge the SLA column
fn populate_steps(doc: &mut SopDocument, input: &BuildInput) -> Result<()> {
    let style = doc.style().clone();
    let mut section = Section::<StepColumn>::bind(doc)?;
    section.clear_data_rows();

    let renderer = RowRenderer::new(&style);
    for step in &input.steps {
        let mut row = section.append_row();
        renderer.render(step, &mut row);
    }

    let ranges = plan_merge_ranges(&input.steps);
    log::debug!(
        "Rendered {} step rows, {} SLA merge ranges",
        section.len(),
        ranges.len()
    );
    apply_merge_ranges(&mut section, &ranges, &style)
}
