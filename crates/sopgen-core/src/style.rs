//! Styling constants for generated procedure tables
//!
//! Defaults reproduce the house style of the master template. Layout files may
//! override any field through their `[style]` table.

use serde::{Deserialize, Serialize};

/// Default document font
pub const DEFAULT_FONT: &str = "Avenir LT Std 45 Book";

/// Placeholder written for missing RACI roles and empty lists
pub const PLACEHOLDER: &str = "N/A";

/// Font, size, color and fill settings used by the renderers
///
/// Sizes are in points, colors and fills in `RRGGBB` hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    /// Font family applied to every generated run
    pub font_family: String,
    /// Step and policy reference numbers
    pub ref_size: f32,
    /// Reference number color
    pub ref_color: String,
    /// Description run color
    pub description_color: String,
    /// RACI and SLA cells
    pub raci_size: f32,
    /// Abbreviation, reference and policy rows
    pub list_size: f32,
    /// Every run in front-matter tables
    pub front_matter_size: f32,
    /// Fallback description paragraph size when the input omits one
    pub default_paragraph_size: f32,
    /// Background of gateway (branch outcome) rows
    pub gateway_fill: String,
    /// Background of SLA cells inside a merge range
    pub sla_fill: String,
    /// Placeholder text
    pub placeholder: String,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT.to_string(),
            ref_size: 14.0,
            ref_color: "FF0000".to_string(),
            description_color: "000000".to_string(),
            raci_size: 9.0,
            list_size: 12.0,
            front_matter_size: 12.0,
            default_paragraph_size: 11.0,
            gateway_fill: "D9D9D9".to_string(),
            sla_fill: "F2F2F2".to_string(),
            placeholder: PLACEHOLDER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let style: StyleSheet = toml::from_str("sla_fill = \"EEEEEE\"\nraci_size = 8.0").unwrap();
        assert_eq!(style.sla_fill, "EEEEEE");
        assert!((style.raci_size - 8.0).abs() < f32::EPSILON);
        assert_eq!(style.gateway_fill, "D9D9D9");
        assert_eq!(style.font_family, DEFAULT_FONT);
    }
}
