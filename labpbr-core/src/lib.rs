//! # LabPBR Core
//!
//! Converts Java-edition LabPBR texture sets into Bedrock RTX texture sets.
//! Designed for use by the CLI and by larger resource-pack converters.
//!
//! ## Architecture
//!
//! - [`texture_set`] - Discovery of texture sets by filename suffix
//! - [`transcode`] - Specular to MER and normal map channel transcoding
//! - [`descriptor`] - `*.texture_set.json` generation
//! - [`converter`] - Batch driver with per-image error isolation
//! - [`image_loading`] - Raster buffers and image file I/O
//! - [`stats`] / [`report`] - Counters and the conversion report

pub mod config;
pub mod converter;
pub mod descriptor;
pub mod image_loading;
pub mod mapping;
pub mod metal;
pub mod report;
pub mod stats;
pub mod texture_set;
pub mod transcode;

pub use config::ConverterConfig;
pub use converter::PbrConverter;
pub use descriptor::{
    default_descriptor_dir, write_descriptor, TextureSetDescriptor, TextureSetEntry,
    DEFAULT_FORMAT_VERSION, DEFAULT_NAMESPACE,
};
pub use image_loading::{load_raster, save_raster, Channels, RasterImage, SUPPORTED_EXTENSIONS};
pub use mapping::TextureMappings;
pub use metal::{metal_for, MetalDefinition, METAL_DEFINITIONS};
pub use report::ConversionReport;
pub use stats::ConversionStats;
pub use texture_set::{discover_texture_sets, TextureRole, TextureSet};
pub use transcode::{
    convert_normal_file, convert_specular_file, normal_to_bedrock, pack_mer, pack_mer_files,
    specular_to_mer,
};

use std::path::PathBuf;

/// Common result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Library-wide error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("{0}")]
    Other(String),
}
