//! Process step records
//!
//! Steps arrive from the diagram parser already ordered. The engine never
//! mutates them; everything it needs (RACI strings, SLA ownership, branch
//! flags) is read through the accessors below, which also normalize the
//! "present but empty" cases to absent.

use crate::document::Alignment;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Alignment names parse leniently; `null` and non-string values mean LEFT
fn lenient_alignment<'de, D>(deserializer: D) -> std::result::Result<Alignment, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(name) => Alignment::from_name(&name),
        serde_json::Value::Null => Alignment::Left,
        other => {
            log::warn!("Non-string paragraph alignment {other}, using LEFT");
            Alignment::Left
        }
    })
}

/// One paragraph of a step description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphSpec {
    /// Paragraph text (empty = blank line)
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Paragraph alignment
    #[serde(deserialize_with = "lenient_alignment")]
    pub alignment: Alignment,
    /// Font size in points (None = style default)
    pub font_size: Option<f32>,
    /// Bold weight
    #[serde(deserialize_with = "null_as_default")]
    pub bold: bool,
}

impl ParagraphSpec {
    /// Create a left-aligned regular paragraph
    #[must_use = "creates a paragraph spec"]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set alignment
    #[must_use = "returns the updated spec"]
    pub const fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set font size
    #[must_use = "returns the updated spec"]
    pub const fn sized(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Make bold
    #[must_use = "returns the updated spec"]
    pub const fn bolded(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// RACI role column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaciRole {
    /// Does the work
    Responsible,
    /// Owns the outcome
    Accountable,
    /// Gives input
    Consulted,
    /// Kept up to date
    Informed,
}

impl RaciRole {
    /// Roles in column order
    pub const ALL: [Self; 4] = [
        Self::Responsible,
        Self::Accountable,
        Self::Consulted,
        Self::Informed,
    ];
}

/// RACI assignment of a step
///
/// Keys other than the four roles are ignored on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Raci {
    /// Responsible party
    pub responsible: Option<String>,
    /// Accountable party
    pub accountable: Option<String>,
    /// Consulted parties
    pub consulted: Option<String>,
    /// Informed parties
    pub informed: Option<String>,
}

impl Raci {
    /// Assigned party for a role, `None` when absent or blank
    #[must_use = "returns the assigned party"]
    pub fn get(&self, role: RaciRole) -> Option<&str> {
        let value = match role {
            RaciRole::Responsible => &self.responsible,
            RaciRole::Accountable => &self.accountable,
            RaciRole::Consulted => &self.consulted,
            RaciRole::Informed => &self.informed,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

/// A process step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    /// Reference number (may be empty)
    #[serde(rename = "ref", deserialize_with = "null_as_default")]
    pub reference: String,
    /// Description paragraphs
    #[serde(deserialize_with = "null_as_default")]
    pub paragraphs: Vec<ParagraphSpec>,
    /// RACI assignment
    #[serde(deserialize_with = "null_as_default")]
    pub raci: Raci,
    /// Conditional-branch outcome rather than a task
    #[serde(deserialize_with = "null_as_default")]
    pub is_gateway: bool,
    /// Service-level target owned by this step
    pub sla: Option<String>,
    /// Group key sharing `sla` across adjacent steps
    pub sla_group: Option<String>,
}

impl Step {
    /// Create a task step with a reference number
    #[must_use = "creates a step"]
    pub fn task(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Self::default()
        }
    }

    /// Create a gateway (branch outcome) step
    #[must_use = "creates a step"]
    pub fn gateway() -> Self {
        Self {
            is_gateway: true,
            ..Self::default()
        }
    }

    /// Attach a service-level target
    #[must_use = "returns the updated step"]
    pub fn with_sla(mut self, sla: impl Into<String>) -> Self {
        self.sla = Some(sla.into());
        self
    }

    /// Attach an SLA group key
    #[must_use = "returns the updated step"]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.sla_group = Some(group.into());
        self
    }

    /// Append a description paragraph
    #[must_use = "returns the updated step"]
    pub fn with_paragraph(mut self, paragraph: ParagraphSpec) -> Self {
        self.paragraphs.push(paragraph);
        self
    }

    /// Set the RACI assignment
    #[must_use = "returns the updated step"]
    pub fn with_raci(mut self, raci: Raci) -> Self {
        self.raci = raci;
        self
    }

    /// SLA value, `None` when absent or empty
    #[inline]
    #[must_use = "returns the SLA value"]
    pub fn sla_value(&self) -> Option<&str> {
        self.sla.as_deref().filter(|s| !s.is_empty())
    }

    /// SLA group key, `None` when absent or empty
    #[inline]
    #[must_use = "returns the group key"]
    pub fn group_key(&self) -> Option<&str> {
        self.sla_group.as_deref().filter(|g| !g.is_empty())
    }
}
