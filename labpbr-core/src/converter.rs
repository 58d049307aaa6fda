//! Batch conversion of a LabPBR texture tree.
//!
//! Discovery, per-set transcoding, and descriptor emission. A failure in
//! one image is logged and counted; it never stops the rest of the batch.

use crate::config::ConverterConfig;
use crate::descriptor::{default_descriptor_dir, write_descriptor, TextureSetDescriptor};
use crate::mapping::TextureMappings;
use crate::stats::ConversionStats;
use crate::texture_set::{discover_texture_sets, TextureRole, TextureSet};
use crate::transcode::{convert_normal_file, convert_specular_file};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct PbrConverter {
    config: ConverterConfig,
}

impl PbrConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Directory derived maps are written to for a given output root
    pub fn derived_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.config.blocks_dir)
    }

    fn descriptor_dir(&self, derived_dir: &Path) -> PathBuf {
        self.config
            .descriptor_dir
            .clone()
            .unwrap_or_else(|| default_descriptor_dir(derived_dir))
    }

    /// Convert every PBR texture set found under `input_dir`.
    ///
    /// Derived maps land in `<output_root>/<blocks_dir>/`; `mappings`
    /// renames base names on the way out.
    pub fn convert_pack(
        &self,
        input_dir: &Path,
        output_root: &Path,
        mappings: Option<&TextureMappings>,
    ) -> ConversionStats {
        info!("Starting PBR texture conversion...");

        let sets = discover_texture_sets(input_dir);
        if sets.is_empty() {
            info!("No PBR textures detected");
            return ConversionStats::default();
        }

        info!("Converting {} PBR texture sets...", sets.len());
        let derived_dir = self.derived_dir(output_root);
        let jobs = resolve_output_names(&sets, mappings);

        let stats: ConversionStats = if self.config.parallel {
            jobs.par_iter()
                .map(|(set, base)| self.convert_set(set, base, &derived_dir))
                .sum()
        } else {
            jobs.iter()
                .map(|(set, base)| self.convert_set(set, base, &derived_dir))
                .sum()
        };

        info!("PBR conversion completed:");
        info!("  Specular maps converted: {}", stats.specular_converted);
        info!("  Normal maps converted: {}", stats.normal_converted);
        info!("  MER maps generated: {}", stats.mer_generated);
        info!("  Texture set JSONs created: {}", stats.texture_sets_created);
        info!("  Errors: {}", stats.errors);

        stats
    }

    /// Convert one texture set, writing its maps as `base`, and return the
    /// counters it contributed.
    pub fn convert_set(&self, set: &TextureSet, base: &str, derived_dir: &Path) -> ConversionStats {
        debug!("Processing PBR set: {} -> {}", set.name, base);

        let ext = &self.config.output_extension;
        let mut stats = ConversionStats::default();

        let mut has_mer = false;
        if let Some(specular) = set.get(TextureRole::Specular) {
            let destination = derived_dir.join(format!("{}_mer.{}", base, ext));
            match convert_specular_file(specular, &destination) {
                Ok(()) => {
                    stats.specular_converted += 1;
                    stats.mer_generated += 1;
                    has_mer = true;
                }
                Err(e) => {
                    error!("Failed to convert specular map {}: {}", specular.display(), e);
                    stats.errors += 1;
                }
            }
        }

        let mut has_normal = false;
        if let Some(normal) = set.get(TextureRole::Normal) {
            let destination = derived_dir.join(format!("{}_normal.{}", base, ext));
            match convert_normal_file(normal, &destination) {
                Ok(()) => {
                    stats.normal_converted += 1;
                    has_normal = true;
                }
                Err(e) => {
                    error!("Failed to convert normal map {}: {}", normal.display(), e);
                    stats.errors += 1;
                }
            }
        }

        let Some(descriptor) = TextureSetDescriptor::for_maps(base, has_mer, has_normal) else {
            return stats;
        };
        let descriptor = descriptor
            .with_namespace(&self.config.namespace)
            .with_format_version(&self.config.format_version);

        match write_descriptor(&descriptor, &self.descriptor_dir(derived_dir)) {
            Ok(path) => {
                stats.texture_sets_created += 1;
                debug!("Created texture set JSON: {}", path.display());
            }
            Err(e) => {
                error!("Failed to create texture set JSON for {}: {}", base, e);
                stats.errors += 1;
            }
        }

        stats
    }
}

/// Pair each set with its output base name.
///
/// Output names must be unique or two sets would write the same files; when
/// the mapping folds several sets onto one name, the first set in name order
/// keeps it and the rest are skipped.
fn resolve_output_names<'a>(
    sets: &'a BTreeMap<String, TextureSet>,
    mappings: Option<&TextureMappings>,
) -> Vec<(&'a TextureSet, String)> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    let mut jobs = Vec::with_capacity(sets.len());

    for set in sets.values() {
        let base = match mappings {
            Some(m) => m.output_base_name(&set.name),
            None => set.name.clone(),
        };
        if let Some(owner) = claimed.get(&base) {
            warn!(
                "Skipping PBR set {}: output name {} already used by {}",
                set.name, base, owner
            );
            continue;
        }
        claimed.insert(base.clone(), &set.name);
        jobs.push((set, base));
    }

    jobs
}
