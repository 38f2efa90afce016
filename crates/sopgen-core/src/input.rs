//! Build input: steps plus the auxiliary lists for the sibling tables

use crate::error::Result;
use crate::step::{null_as_default, Step};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Abbreviation or definition entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Abbreviation {
    /// Abbreviated term
    pub term: String,
    /// Definition
    pub definition: String,
}

/// Referenced document entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    /// Document identifier
    pub id: String,
    /// Document title
    pub title: String,
}

/// General policy entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Policy statement
    pub policy: String,
}

/// Everything a single document build consumes
///
/// Field names follow the diagram parser's context keys; the shorter names are
/// accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildInput {
    /// Ordered process steps
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
    /// Abbreviations and definitions
    #[serde(
        rename = "abbreviations_list",
        alias = "abbreviations",
        deserialize_with = "null_as_default"
    )]
    pub abbreviations: Vec<Abbreviation>,
    /// Referenced documents
    #[serde(
        rename = "references_list",
        alias = "references",
        deserialize_with = "null_as_default"
    )]
    pub references: Vec<Reference>,
    /// General policies
    #[serde(
        rename = "general_policies_list",
        alias = "policies",
        deserialize_with = "null_as_default"
    )]
    pub policies: Vec<Policy>,
}

impl BuildInput {
    /// Build input with steps only
    #[must_use = "creates a build input"]
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Parse a build input from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`crate::SopError::JsonError`] if the JSON is malformed or has
    /// the wrong shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a build input from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a JSON error if it
    /// cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parser_context_keys() {
        let json = r#"{
            "process_name": "Purchase approval",
            "steps": [{"ref": "1"}, {"is_gateway": true}],
            "abbreviations_list": [{"term": "PO", "definition": "Purchase order"}],
            "references_list": [{"id": "FIN-01", "title": "Finance policy"}],
            "general_policies_list": [{"policy": "All POs above 10k need CFO sign-off"}]
        }"#;
        let input = BuildInput::from_json_str(json).unwrap();
        assert_eq!(input.steps.len(), 2);
        assert!(input.steps[1].is_gateway);
        assert_eq!(input.abbreviations[0].term, "PO");
        assert_eq!(input.references[0].id, "FIN-01");
        assert_eq!(input.policies.len(), 1);
    }

    #[test]
    fn test_short_aliases_and_missing_lists() {
        let input =
            BuildInput::from_json_str(r#"{"policies": [{"policy": "Be kind"}]}"#).unwrap();
        assert!(input.steps.is_empty());
        assert!(input.abbreviations.is_empty());
        assert_eq!(input.policies[0].policy, "Be kind");
    }

    #[test]
    fn test_null_lists_are_empty() {
        let input = BuildInput::from_json_str(
            r#"{"steps": [{"ref": "1"}], "abbreviations_list": null, "references_list": null, "general_policies_list": null}"#,
        )
        .unwrap();
        assert_eq!(input.steps.len(), 1);
        assert!(input.abbreviations.is_empty());
        assert!(input.references.is_empty());
        assert!(input.policies.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"steps": [{{"ref": "7", "sla": "1d"}}]}}"#).unwrap();
        let input = BuildInput::from_file(file.path()).unwrap();
        assert_eq!(input.steps[0].sla_value(), Some("1d"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = BuildInput::from_file("/nonexistent/steps.json").unwrap_err();
        assert!(matches!(err, crate::SopError::IoError(_)));
    }
}
