//! Java to Bedrock texture name lookup.
//!
//! Reads mapping files shaped either as
//! `{"category": "blocks", "mappings": {"grass_block_top.png": "grass_top.png"}}`
//! or as a flat object of the same pairs.

use crate::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingFile {
    Categorized {
        #[serde(default)]
        category: Option<String>,
        mappings: HashMap<String, String>,
    },
    Flat(HashMap<String, String>),
}

/// Read-only lookup from Java texture file names to Bedrock ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureMappings {
    entries: HashMap<String, String>,
}

impl TextureMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let entries = match serde_json::from_str::<MappingFile>(s)? {
            MappingFile::Categorized { category, mappings } => {
                debug!(
                    category = category.as_deref().unwrap_or("uncategorized"),
                    count = mappings.len(),
                    "loaded texture mappings"
                );
                mappings
            }
            MappingFile::Flat(mappings) => mappings,
        };
        Ok(Self { entries })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    pub fn insert(&mut self, java: impl Into<String>, bedrock: impl Into<String>) {
        self.entries.insert(java.into(), bedrock.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Output base name for a discovered texture set.
    ///
    /// Looks up `<base>.png`; a hit is returned without its `.png` / `.tga`
    /// extension, a miss returns `base` unchanged.
    pub fn output_base_name(&self, base: &str) -> String {
        match self.entries.get(&format!("{}.png", base)) {
            Some(mapped) => mapped
                .strip_suffix(".png")
                .or_else(|| mapped.strip_suffix(".tga"))
                .unwrap_or(mapped)
                .to_string(),
            None => base.to_string(),
        }
    }
}

impl FromIterator<(String, String)> for TextureMappings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
