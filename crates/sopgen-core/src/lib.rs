//! # sopgen-core - Procedure document model
//!
//! Types shared by the sopgen workspace:
//!
//! - [`Step`]: one row-worthy unit of a process (task or branch outcome), as
//!   produced by the diagram parser
//! - [`BuildInput`]: steps plus abbreviation, reference and policy lists
//! - [`SopDocument`]: the in-memory document (tables, rows, styled cells)
//! - [`Section`]: typed, role-bound handle on one table
//! - [`TemplateLayout`]: TOML description of a template's table skeletons
//! - [`SopError`]: the error type for every fallible operation
//!
//! ## Example
//!
//! ```
//! use sopgen_core::{Section, StepColumn, TemplateLayout};
//!
//! let mut doc = TemplateLayout::master().instantiate()?;
//! let mut steps = Section::<StepColumn>::bind(&mut doc)?;
//! steps.append_row();
//! assert_eq!(steps.len(), 1);
//! # Ok::<(), sopgen_core::SopError>(())
//! ```
//!
//! Rendering, SLA merge planning and DOCX output live in `sopgen-backend`.

pub mod document;
pub mod error;
pub mod input;
pub mod layout;
pub mod section;
pub mod step;
pub mod style;

pub use document::{
    Alignment, Cell, Paragraph, Row, SopDocument, Table, TableRole, TextRun, VerticalMerge,
};
pub use error::{Result, SopError};
pub use input::{Abbreviation, BuildInput, Policy, Reference};
pub use layout::{TableSkeleton, TemplateLayout, MASTER_LAYOUT};
pub use section::{
    AbbreviationColumn, Column, PolicyColumn, ReferenceColumn, RowMut, Section, StepColumn,
};
pub use step::{ParagraphSpec, Raci, RaciRole, Step};
pub use style::{StyleSheet, DEFAULT_FONT, PLACEHOLDER};
