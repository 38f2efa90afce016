//! # sopgen-backend - Step table engine and DOCX output
//!
//! Compiles a sequence of process steps into the tables of a standard
//! operating procedure document:
//!
//! - [`renderer`]: one step → one styled row (reference number, multi-paragraph
//!   description, RACI columns, gateway shading)
//! - [`planner`]: one pass over the steps → SLA merge ranges, absorbing
//!   branch-outcome rows into their owner's range
//! - [`applier`]: ranges → shaded, vertically merged SLA cells
//! - [`lists`]: abbreviations, references and general policies tables
//! - [`assembler`]: orchestrates a full build on an owned template document
//! - [`docx`]: writes the finished document as a `.docx` package
//!
//! ## Quick Start
//!
//! ```
//! use sopgen_backend::{generate_docx, DocumentAssembler};
//! use sopgen_core::{BuildInput, Step, TemplateLayout};
//!
//! let input = BuildInput::from_steps(vec![
//!     Step::task("1").with_sla("4h"),
//!     Step::gateway(),
//! ]);
//! let layout = TemplateLayout::master();
//!
//! let doc = DocumentAssembler::new().build(&layout, &input)?;
//! assert_eq!(doc.tables().len(), 8);
//!
//! let bytes = generate_docx(&layout, &input)?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), sopgen_core::SopError>(())
//! ```
//!
//! Builds are synchronous and share nothing: each one instantiates its own
//! template document, so independent builds may run on separate threads.

pub mod applier;
pub mod assembler;
pub mod docx;
pub mod lists;
pub mod planner;
pub mod renderer;

pub use applier::apply_merge_ranges;
pub use assembler::{AssemblyOptions, DocumentAssembler};
pub use docx::DocxWriter;
pub use planner::{plan_merge_ranges, MergePlanner, MergeRange};
pub use renderer::RowRenderer;

use sopgen_core::{BuildInput, Result, TemplateLayout};

/// Build a document from `layout` and `input` and serialize it as `.docx`
///
/// # Errors
///
/// Returns a structural error if the layout lacks a required table, or
/// [`sopgen_core::SopError::DocxError`] if packaging fails.
pub fn generate_docx(layout: &TemplateLayout, input: &BuildInput) -> Result<Vec<u8>> {
    let doc = DocumentAssembler::new().build(layout, input)?;
    DocxWriter::to_bytes(&doc)
}
