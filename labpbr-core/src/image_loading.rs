//! Raster buffers and image file I/O.
//!
//! Decodes PNG, JPG, and TGA files into flat 8-bit RGB or RGBA buffers and
//! encodes them back, picking the output format from the file extension.

use crate::{Error, Result};
use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File extensions accepted for loading and saving (lowercase, no dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tga"];

/// Channel layout of a [`RasterImage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channels {
    Rgb,
    Rgba,
}

impl Channels {
    /// Bytes per pixel
    pub fn count(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }
}

/// An 8-bit raster image stored row-major with interleaved channels.
///
/// Dimensions are always nonzero and `data.len() == width * height * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl RasterImage {
    /// Build an image from raw interleaved bytes, checking the buffer invariants.
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImage(format!(
                "image dimensions must be nonzero, got {}x{}",
                width, height
            )));
        }
        let expected = (width as usize) * (height as usize) * channels.count();
        if data.len() != expected {
            return Err(Error::InvalidImage(format!(
                "expected {} bytes for {}x{} {:?}, got {}",
                expected,
                width,
                height,
                channels,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Internal constructor for buffers the caller sized itself.
    pub(crate) fn from_parts(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * channels.count()
        );
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Convert a decoded image. Anything carrying alpha becomes RGBA, the rest RGB.
    /// Higher bit depths are narrowed to 8 bits per channel.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        if image.color().has_alpha() {
            Self::new(width, height, Channels::Rgba, image.to_rgba8().into_raw())
        } else {
            Self::new(width, height, Channels::Rgb, image.to_rgb8().into_raw())
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Channel values of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.channels.count();
        let i = (y as usize * self.width as usize + x as usize) * stride;
        self.data.get(i..i + stride)
    }

    /// RGBA copy of this image; RGB inputs get an opaque 255 alpha appended.
    pub fn to_rgba(&self) -> RasterImage {
        match self.channels {
            Channels::Rgba => self.clone(),
            Channels::Rgb => {
                let mut data = Vec::with_capacity(self.pixel_count() * 4);
                for px in self.data.chunks_exact(3) {
                    data.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
                RasterImage::from_parts(self.width, self.height, Channels::Rgba, data)
            }
        }
    }

    /// Wrap the buffer in an [`image::DynamicImage`] for encoding.
    pub fn into_dynamic(self) -> Result<DynamicImage> {
        let (width, height) = (self.width, self.height);
        let image = match self.channels {
            Channels::Rgb => RgbImage::from_raw(width, height, self.data).map(DynamicImage::ImageRgb8),
            Channels::Rgba => {
                RgbaImage::from_raw(width, height, self.data).map(DynamicImage::ImageRgba8)
            }
        };
        image.ok_or_else(|| Error::InvalidImage("buffer does not match dimensions".into()))
    }
}

/// Lowercased extension of `path`, if any
pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
}

/// Whether `path` carries one of [`SUPPORTED_EXTENSIONS`]
pub fn is_supported_image(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Open and decode an image file.
///
/// Every failure (missing file, unknown format, corrupt data) is reported as
/// [`Error::Decode`] carrying the offending path.
pub fn load_raster<P: AsRef<Path>>(path: P) -> Result<RasterImage> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    RasterImage::from_dynamic(decoded)
}

/// Encode `raster` to `path`, creating parent directories as needed.
/// Format is inferred from the extension (PNG, JPG, TGA).
pub fn save_raster<P: AsRef<Path>>(raster: &RasterImage, path: P) -> Result<()> {
    let path = path.as_ref();
    if !is_supported_image(path) {
        return Err(Error::Other(format!(
            "Unsupported output format: {}. Use .png, .jpg, or .tga.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    raster
        .clone()
        .into_dynamic()?
        .save(path)
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
}
