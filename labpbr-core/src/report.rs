//! Batch conversion report.
//!
//! Wraps the final [`ConversionStats`] with context for CLI output or a
//! JSON file next to the converted pack.

use crate::metal::METAL_DEFINITIONS;
use crate::stats::ConversionStats;
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Capabilities of this converter, listed in every report
pub const SUPPORTED_FEATURES: &[&str] = &[
    "labpbr_specular_conversion",
    "labpbr_normal_conversion",
    "mer_generation",
    "texture_set_json_creation",
    "metal_id_support",
    "emission_conversion",
    "roughness_conversion",
];

#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub pbr_conversion_stats: ConversionStats,
    pub metal_definitions_available: usize,
    pub supported_features: Vec<&'static str>,
}

impl ConversionReport {
    pub fn new(stats: ConversionStats) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            input: None,
            output: None,
            pbr_conversion_stats: stats,
            metal_definitions_available: METAL_DEFINITIONS.len(),
            supported_features: SUPPORTED_FEATURES.to_vec(),
        }
    }

    pub fn with_paths(mut self, input: &Path, output: &Path) -> Self {
        self.input = Some(input.to_path_buf());
        self.output = Some(output.to_path_buf());
        self
    }

    /// Format as human-readable text
    pub fn to_text(&self) -> String {
        let stats = &self.pbr_conversion_stats;
        let mut lines = Vec::new();

        lines.push("PBR conversion".to_string());
        if let Some(input) = &self.input {
            lines.push(format!("  Input: {}", input.display()));
        }
        if let Some(output) = &self.output {
            lines.push(format!("  Output: {}", output.display()));
        }
        lines.push(format!("  Specular maps converted: {}", stats.specular_converted));
        lines.push(format!("  Normal maps converted: {}", stats.normal_converted));
        lines.push(format!("  MER maps generated: {}", stats.mer_generated));
        lines.push(format!("  Texture set JSONs created: {}", stats.texture_sets_created));
        lines.push(format!("  Errors: {}", stats.errors));
        lines.push(String::new());
        lines.push(format!(
            "Result: {}",
            if stats.has_errors() {
                "COMPLETED WITH ERRORS"
            } else {
                "OK"
            }
        ));

        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON form to `path`
    pub fn write_json(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_stats_and_features() {
        let stats = ConversionStats {
            specular_converted: 2,
            mer_generated: 2,
            errors: 1,
            ..Default::default()
        };
        let report = ConversionReport::new(stats).with_paths(Path::new("in"), Path::new("out"));
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["pbr_conversion_stats"]["mer_generated"], 2);
        assert_eq!(value["pbr_conversion_stats"]["errors"], 1);
        assert_eq!(value["metal_definitions_available"], 8);
        assert_eq!(value["supported_features"].as_array().unwrap().len(), 7);
        assert!(chrono::DateTime::parse_from_rfc3339(value["generated_at"].as_str().unwrap()).is_ok());

        let text = report.to_text();
        assert!(text.contains("MER maps generated: 2"));
        assert!(text.contains("COMPLETED WITH ERRORS"));
    }
}
