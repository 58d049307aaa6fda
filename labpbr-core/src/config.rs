//! Converter configuration (TOML).
//!
//! Every field has a default, so an empty file or a partial one is valid:
//!
//! ```toml
//! namespace = "minecraft"
//! format_version = "1.16.100"
//! output_extension = "png"
//! blocks_dir = "blocks"
//! parallel = true
//! ```

use crate::descriptor::{BLOCKS_DIR, DEFAULT_FORMAT_VERSION, DEFAULT_NAMESPACE};
use crate::image_loading::SUPPORTED_EXTENSIONS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Prefix of the `<namespace>:texture_set` descriptor key
    pub namespace: String,
    pub format_version: String,
    /// Extension (and so encoding) of derived maps
    pub output_extension: String,
    /// Subdirectory of the output root receiving derived maps
    pub blocks_dir: String,
    /// Explicit descriptor directory; overrides the default placement rule
    pub descriptor_dir: Option<PathBuf>,
    /// Convert texture sets on the rayon thread pool
    pub parallel: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            format_version: DEFAULT_FORMAT_VERSION.to_string(),
            output_extension: "png".to_string(),
            blocks_dir: BLOCKS_DIR.to_string(),
            descriptor_dir: None,
            parallel: true,
        }
    }
}

impl ConverterConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut config: ConverterConfig = toml::from_str(s)?;
        config.output_extension = config.output_extension.trim_start_matches('.').to_lowercase();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_EXTENSIONS.contains(&self.output_extension.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "Unsupported output extension: {}. Use png, jpg, or tga.",
                self.output_extension
            )));
        }
        if self.namespace.trim().is_empty() {
            return Err(Error::InvalidConfig("namespace must not be empty".into()));
        }
        if self.blocks_dir.trim().is_empty() {
            return Err(Error::InvalidConfig("blocks_dir must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ConverterConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConverterConfig::default());
        assert_eq!(config.namespace, "minecraft");
        assert_eq!(config.format_version, "1.16.100");
        assert_eq!(config.output_extension, "png");
        assert!(config.parallel);
    }

    #[test]
    fn partial_file_overrides() {
        let config = ConverterConfig::from_toml_str(
            r#"
            namespace = "mypack"
            output_extension = ".TGA"
            parallel = false
            descriptor_dir = "out/meta"
            "#,
        )
        .unwrap();
        assert_eq!(config.namespace, "mypack");
        assert_eq!(config.output_extension, "tga");
        assert!(!config.parallel);
        assert_eq!(config.descriptor_dir, Some(PathBuf::from("out/meta")));
        assert_eq!(config.blocks_dir, "blocks");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ConverterConfig::from_toml_str("output_extension = \"bmp\""),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ConverterConfig::from_toml_str("namespace = \"\""),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ConverterConfig::from_toml_str("unknown_key = 1"),
            Err(Error::Config(_))
        ));
    }
}
