//! Bedrock `*.texture_set.json` descriptors.
//!
//! A descriptor ties a colour texture to the MER and normal maps derived
//! for it:
//!
//! ```json
//! {
//!   "format_version": "1.16.100",
//!   "minecraft:texture_set": {
//!     "color": "stone",
//!     "metalness_emissive_roughness": "stone_mer",
//!     "normal": "stone_normal"
//!   }
//! }
//! ```

use crate::Result;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};

pub const DEFAULT_FORMAT_VERSION: &str = "1.16.100";
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Name of the directory descriptors live in under the default placement rule
pub const BLOCKS_DIR: &str = "blocks";

/// Body of the `<namespace>:texture_set` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSetEntry {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness_emissive_roughness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSetDescriptor {
    pub format_version: String,
    pub namespace: String,
    pub texture_set: TextureSetEntry,
}

impl TextureSetDescriptor {
    /// Describe `base` and whichever derived maps were produced for it.
    /// Returns `None` when neither map exists; no descriptor is written then.
    pub fn for_maps(base: &str, has_mer: bool, has_normal: bool) -> Option<Self> {
        if !has_mer && !has_normal {
            return None;
        }
        Some(Self {
            format_version: DEFAULT_FORMAT_VERSION.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            texture_set: TextureSetEntry {
                color: base.to_string(),
                metalness_emissive_roughness: has_mer.then(|| format!("{}_mer", base)),
                normal: has_normal.then(|| format!("{}_normal", base)),
            },
        })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_format_version(mut self, version: impl Into<String>) -> Self {
        self.format_version = version.into();
        self
    }

    /// Top-level key holding the texture set, e.g. `minecraft:texture_set`
    pub fn key(&self) -> String {
        format!("{}:texture_set", self.namespace)
    }

    pub fn file_name(&self) -> String {
        format!("{}.texture_set.json", self.texture_set.color)
    }

    /// Serialize with two-space indentation
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for TextureSetDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("format_version", &self.format_version)?;
        map.serialize_entry(&self.key(), &self.texture_set)?;
        map.end()
    }
}

/// Where descriptors go when the caller gives no explicit directory.
///
/// Derived maps written into a `blocks` directory get their descriptor
/// beside them; anything else resolves to `<dir>/../../blocks`.
pub fn default_descriptor_dir(derived_dir: &Path) -> PathBuf {
    if derived_dir.file_name().is_some_and(|n| n == BLOCKS_DIR) {
        return derived_dir.to_path_buf();
    }
    derived_dir
        .ancestors()
        .nth(2)
        .unwrap_or_else(|| Path::new(""))
        .join(BLOCKS_DIR)
}

/// Write `descriptor` into `dir` as `<color>.texture_set.json`.
pub fn write_descriptor(descriptor: &TextureSetDescriptor, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(descriptor.file_name());
    std::fs::write(&path, descriptor.to_json()?)?;
    Ok(path)
}
