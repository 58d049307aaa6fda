//! Texture-set discovery.
//!
//! Groups the images of a LabPBR pack by base name using the filename
//! suffix convention (`stone.png`, `stone_s.png`, `stone_n.png`).

use crate::image_loading::is_supported_image;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Stem suffixes of maps this converter never reads (already-derived or
/// single-channel maps).
const IGNORED_SUFFIXES: &[&str] = &["_e", "_r", "_m", "_mer", "_normal"];

/// Role of a source image within a texture set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureRole {
    Diffuse,
    Specular,
    Normal,
}

impl TextureRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureRole::Diffuse => "diffuse",
            TextureRole::Specular => "specular",
            TextureRole::Normal => "normal",
        }
    }

    /// Classify a file stem into its role and base name.
    /// Returns `None` for stems carrying one of the ignored suffixes.
    pub fn classify(stem: &str) -> Option<(TextureRole, &str)> {
        if let Some(base) = stem.strip_suffix("_s") {
            return Some((TextureRole::Specular, base));
        }
        if let Some(base) = stem.strip_suffix("_n") {
            return Some((TextureRole::Normal, base));
        }
        if IGNORED_SUFFIXES.iter().any(|s| stem.ends_with(s)) {
            return None;
        }
        Some((TextureRole::Diffuse, stem))
    }
}

impl std::fmt::Display for TextureRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source images sharing one base texture name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSet {
    pub name: String,
    pub sources: BTreeMap<TextureRole, PathBuf>,
}

impl TextureSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, role: TextureRole, path: PathBuf) {
        self.sources.insert(role, path);
    }

    pub fn get(&self, role: TextureRole) -> Option<&Path> {
        self.sources.get(&role).map(PathBuf::as_path)
    }

    pub fn has(&self, role: TextureRole) -> bool {
        self.sources.contains_key(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = TextureRole> + '_ {
        self.sources.keys().copied()
    }

    /// A set is worth transcoding only if it has a specular or normal map.
    pub fn is_transcodable(&self) -> bool {
        self.has(TextureRole::Specular) || self.has(TextureRole::Normal)
    }
}

/// Recursively discover texture sets under `dir`, keyed by base name.
///
/// Directory entries are visited in file-name order, so when two files claim
/// the same role for a base name the later one in that order wins. A missing
/// directory yields an empty map.
pub fn discover_texture_sets<P: AsRef<Path>>(dir: P) -> BTreeMap<String, TextureSet> {
    let dir = dir.as_ref();
    let mut sets: BTreeMap<String, TextureSet> = BTreeMap::new();

    if !dir.is_dir() {
        warn!(dir = %dir.display(), "texture directory not found, no PBR sets to convert");
        return sets;
    }

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_supported_image(path) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((role, base)) = TextureRole::classify(stem) else {
            continue;
        };

        sets.entry(base.to_string())
            .or_insert_with(|| TextureSet::new(base))
            .insert(role, path.to_path_buf());
    }

    sets.retain(|_, set| set.is_transcodable());

    info!("Detected {} PBR texture sets", sets.len());
    for (name, set) in &sets {
        let roles: Vec<&str> = set.roles().map(|r| r.as_str()).collect();
        debug!("  {}: {:?}", name, roles);
    }

    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn classify_suffixes() {
        assert_eq!(TextureRole::classify("stone_s"), Some((TextureRole::Specular, "stone")));
        assert_eq!(TextureRole::classify("stone_n"), Some((TextureRole::Normal, "stone")));
        assert_eq!(TextureRole::classify("stone"), Some((TextureRole::Diffuse, "stone")));
        assert_eq!(
            TextureRole::classify("oak_planks"),
            Some((TextureRole::Diffuse, "oak_planks"))
        );
        for stem in ["stone_e", "stone_r", "stone_m", "stone_mer", "stone_normal"] {
            assert_eq!(TextureRole::classify(stem), None, "{}", stem);
        }
    }

    #[test]
    fn groups_by_base_name_and_drops_diffuse_only() {
        let tmp = tempfile::tempdir().unwrap();
        let blocks = tmp.path().join("block");
        touch(&blocks.join("stone.png"));
        touch(&blocks.join("stone_s.png"));
        touch(&blocks.join("stone_n.png"));
        touch(&blocks.join("dirt.png"));
        touch(&blocks.join("nested").join("glass_n.tga"));
        touch(&blocks.join("iron_block_mer.png"));
        touch(&blocks.join("notes.txt"));

        let sets = discover_texture_sets(tmp.path());
        let names: Vec<&str> = sets.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["glass", "stone"]);

        let stone = &sets["stone"];
        assert_eq!(
            stone.roles().collect::<Vec<_>>(),
            vec![TextureRole::Diffuse, TextureRole::Specular, TextureRole::Normal]
        );
        assert_eq!(stone.get(TextureRole::Specular), Some(blocks.join("stone_s.png").as_path()));

        let glass = &sets["glass"];
        assert!(glass.has(TextureRole::Normal));
        assert!(!glass.has(TextureRole::Diffuse));
    }

    #[test]
    fn discovery_is_repeatable() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b_s.png", "a_n.jpg", "a.png", "c_s.jpeg", "c_n.png"] {
            touch(&tmp.path().join(name));
        }
        assert_eq!(discover_texture_sets(tmp.path()), discover_texture_sets(tmp.path()));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn missing_directory_is_empty_and_warns() {
        let tmp = tempfile::tempdir().unwrap();
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let sets = tracing::subscriber::with_default(subscriber, || {
            discover_texture_sets(tmp.path().join("does_not_exist"))
        });
        assert!(sets.is_empty());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(
            output.contains("WARN") && output.contains("texture directory not found"),
            "unexpected log output: {}",
            output
        );
    }
}
