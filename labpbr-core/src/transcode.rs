//! LabPBR to Bedrock channel transcoding.
//!
//! Source layouts:
//!
//! - **Specular** (`_s`): R = perceptual smoothness, G = F0 or metal ID,
//!   B = porosity / subsurface, A = emission (255 means none)
//! - **Normal** (`_n`): R/G = tangent-space X/Y, B = ambient occlusion, A = height
//!
//! Target layouts:
//!
//! - **MER** (`_mer`): R = metalness, G = emissive, B = roughness
//! - **Normal** (`_normal`): R/G/B = X/Y/Z, Z reconstructed from X and Y
//!
//! Three-channel sources are read as if their alpha were 255. Outputs are
//! always three-channel and keep the source dimensions.

use crate::image_loading::{load_raster, save_raster, Channels, RasterImage};
use crate::metal::is_metal_id;
use crate::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use std::path::Path;
use tracing::debug;

/// Reflectance values at or below this count as non-metallic
pub const METALNESS_THRESHOLD: u8 = 10;

/// Specular alpha value meaning "no emission"
pub const NO_EMISSION: u8 = 255;

/// Perceptual smoothness to linear roughness: `(1 - s)^2`, scaled back to a byte.
pub fn roughness_from_smoothness(smoothness: u8) -> u8 {
    let s = f64::from(smoothness) / 255.0;
    let roughness = (1.0 - s).powi(2);
    (roughness * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Metal IDs saturate to 255; other reflectance values above the threshold
/// pass through as a metalness magnitude.
pub fn metalness_from_reflectance(reflectance: u8) -> u8 {
    if is_metal_id(reflectance) {
        255
    } else if reflectance > METALNESS_THRESHOLD {
        reflectance
    } else {
        0
    }
}

pub fn emissive_from_alpha(alpha: u8) -> u8 {
    if alpha == NO_EMISSION {
        0
    } else {
        alpha
    }
}

/// Rebuild the Z byte of a unit tangent-space normal from its X and Y bytes.
/// A negative radicand from out-of-range X/Y clamps to zero.
pub fn reconstruct_normal_z(x: u8, y: u8) -> u8 {
    let nx = (f64::from(x) / 255.0) * 2.0 - 1.0;
    let ny = (f64::from(y) / 255.0) * 2.0 - 1.0;
    let nz = (1.0 - nx * nx - ny * ny).max(0.0).sqrt();
    (((nz + 1.0) / 2.0) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Transcode a specular map into a MER map.
pub fn specular_to_mer(specular: &RasterImage) -> RasterImage {
    let roughness: [u8; 256] = std::array::from_fn(|v| roughness_from_smoothness(v as u8));
    let stride = specular.channels().count();
    let mut data = vec![0u8; specular.pixel_count() * 3];

    for (src, dst) in specular
        .data()
        .chunks_exact(stride)
        .zip(data.chunks_exact_mut(3))
    {
        let emission = src.get(3).copied().unwrap_or(NO_EMISSION);
        dst[0] = metalness_from_reflectance(src[1]);
        dst[1] = emissive_from_alpha(emission);
        dst[2] = roughness[usize::from(src[0])];
    }

    RasterImage::from_parts(specular.width(), specular.height(), Channels::Rgb, data)
}

/// Transcode a LabPBR normal map into a Bedrock normal map.
/// AO (blue) and height (alpha) have no slot in the target and are dropped.
pub fn normal_to_bedrock(normal: &RasterImage) -> RasterImage {
    let stride = normal.channels().count();
    let mut data = vec![0u8; normal.pixel_count() * 3];

    for (src, dst) in normal.data().chunks_exact(stride).zip(data.chunks_exact_mut(3)) {
        let (x, y) = (src[0], src[1]);
        dst[0] = x;
        dst[1] = y;
        dst[2] = reconstruct_normal_z(x, y);
    }

    RasterImage::from_parts(normal.width(), normal.height(), Channels::Rgb, data)
}

/// Decode `source`, transcode it to MER, and write the result to `destination`.
pub fn convert_specular_file(source: &Path, destination: &Path) -> Result<()> {
    let specular = load_raster(source)?;
    let mer = specular_to_mer(&specular);
    save_raster(&mer, destination)?;
    debug!(
        source = %source.display(),
        destination = %destination.display(),
        "converted specular to MER"
    );
    Ok(())
}

/// Decode `source`, transcode the normal map, and write it to `destination`.
pub fn convert_normal_file(source: &Path, destination: &Path) -> Result<()> {
    let normal = load_raster(source)?;
    let converted = normal_to_bedrock(&normal);
    save_raster(&converted, destination)?;
    debug!(
        source = %source.display(),
        destination = %destination.display(),
        "converted normal map"
    );
    Ok(())
}

fn luma_at_size(image: &DynamicImage, width: u32, height: u32) -> GrayImage {
    let luma = image.to_luma8();
    if luma.width() == width && luma.height() == height {
        luma
    } else {
        image::imageops::resize(&luma, width, height, FilterType::Lanczos3)
    }
}

/// Packs separate metalness, emissive, and roughness maps into one MER image.
///
/// - **R channel** = Metalness
/// - **G channel** = Emissive
/// - **B channel** = Roughness
///
/// Each input is reduced to 8-bit luma. The first map present (in M, E, R
/// order) sets the output size; the others are resized with Lanczos3 when
/// they differ. A missing map leaves its channel at 0.
pub fn pack_mer(
    metallic: Option<&DynamicImage>,
    emissive: Option<&DynamicImage>,
    roughness: Option<&DynamicImage>,
) -> Result<RasterImage> {
    let reference = metallic
        .or(emissive)
        .or(roughness)
        .ok_or_else(|| Error::InvalidImage("no source maps given for MER packing".into()))?;
    let (width, height) = (reference.width(), reference.height());
    if width == 0 || height == 0 {
        return Err(Error::InvalidImage("reference map has zero size".into()));
    }

    let mut data = vec![0u8; (width as usize) * (height as usize) * 3];
    for (channel, source) in [metallic, emissive, roughness].into_iter().enumerate() {
        let Some(source) = source else {
            continue;
        };
        let luma = luma_at_size(source, width, height);
        for (dst, value) in data.chunks_exact_mut(3).zip(luma.as_raw()) {
            dst[channel] = *value;
        }
    }

    Ok(RasterImage::from_parts(width, height, Channels::Rgb, data))
}

/// File-level [`pack_mer`]: opens the given maps and writes the packed result.
pub fn pack_mer_files(
    metallic: Option<&Path>,
    emissive: Option<&Path>,
    roughness: Option<&Path>,
    output: &Path,
) -> Result<RasterImage> {
    let open = |path: Option<&Path>| -> Result<Option<DynamicImage>> {
        path.map(|p| {
            image::open(p).map_err(|source| Error::Decode {
                path: p.to_path_buf(),
                source,
            })
        })
        .transpose()
    };

    let metallic = open(metallic)?;
    let emissive = open(emissive)?;
    let roughness = open(roughness)?;

    let mer = pack_mer(metallic.as_ref(), emissive.as_ref(), roughness.as_ref())?;
    save_raster(&mer, output)?;
    debug!(output = %output.display(), "packed MER from individual maps");
    Ok(mer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbaImage};

    fn rgba(pixels: &[[u8; 4]]) -> RasterImage {
        let data = pixels.iter().flatten().copied().collect();
        RasterImage::new(pixels.len() as u32, 1, Channels::Rgba, data).unwrap()
    }

    #[test]
    fn roughness_endpoints_and_monotonicity() {
        assert_eq!(roughness_from_smoothness(255), 0);
        assert_eq!(roughness_from_smoothness(0), 255);
        // (1 - 128/255)^2 * 255 = 63.25
        assert_eq!(roughness_from_smoothness(128), 63);

        let mut previous = roughness_from_smoothness(0);
        for s in 1..=255u8 {
            let r = roughness_from_smoothness(s);
            assert!(r <= previous, "roughness rose at smoothness {}", s);
            previous = r;
        }
    }

    #[test]
    fn metal_ids_saturate() {
        for g in 230..=255u8 {
            assert_eq!(metalness_from_reflectance(g), 255);
        }
        assert_eq!(metalness_from_reflectance(229), 229);
        assert_eq!(metalness_from_reflectance(11), 11);
        for g in 0..=10u8 {
            assert_eq!(metalness_from_reflectance(g), 0);
        }
    }

    #[test]
    fn emission_sentinel() {
        assert_eq!(emissive_from_alpha(255), 0);
        assert_eq!(emissive_from_alpha(0), 0);
        assert_eq!(emissive_from_alpha(200), 200);
        assert_eq!(emissive_from_alpha(254), 254);
    }

    #[test]
    fn specular_pixel_layout() {
        let mer = specular_to_mer(&rgba(&[[255, 240, 0, 255], [0, 5, 99, 200], [128, 100, 7, 0]]));
        assert_eq!(mer.channels(), Channels::Rgb);
        assert_eq!(mer.data(), &[255, 0, 0, 0, 200, 255, 100, 0, 63]);
    }

    #[test]
    fn specular_rgb_source_has_no_emission() {
        let rgb = RasterImage::new(2, 1, Channels::Rgb, vec![255, 50, 0, 0, 231, 0]).unwrap();
        let mer = specular_to_mer(&rgb);
        assert_eq!(mer.data(), &[50, 0, 0, 255, 0, 255]);
        assert_eq!(mer, specular_to_mer(&rgb.to_rgba()));
    }

    #[test]
    fn outputs_keep_dimensions() {
        let rgba = RasterImage::new(5, 3, Channels::Rgba, vec![77; 5 * 3 * 4]).unwrap();
        let rgb = RasterImage::new(5, 3, Channels::Rgb, vec![77; 5 * 3 * 3]).unwrap();
        for out in [
            specular_to_mer(&rgba),
            specular_to_mer(&rgb),
            normal_to_bedrock(&rgba),
            normal_to_bedrock(&rgb),
        ] {
            assert_eq!((out.width(), out.height()), (5, 3));
            assert_eq!(out.channels(), Channels::Rgb);
            assert_eq!(out.data().len(), 5 * 3 * 3);
        }
    }

    #[test]
    fn normal_z_reconstruction() {
        assert_eq!(reconstruct_normal_z(128, 128), 255);
        assert_eq!(reconstruct_normal_z(255, 128), 128);
        assert_eq!(reconstruct_normal_z(255, 255), 128);
        assert_eq!(reconstruct_normal_z(0, 0), 128);
    }

    #[test]
    fn normal_ignores_ao_and_height() {
        let a = normal_to_bedrock(&rgba(&[[128, 128, 0, 0], [200, 40, 0, 0]]));
        let b = normal_to_bedrock(&rgba(&[[128, 128, 255, 17], [200, 40, 90, 255]]));
        assert_eq!(a, b);
        assert_eq!(a.pixel(0, 0), Some(&[128u8, 128, 255][..]));
        assert_eq!(a.pixel(1, 0).map(|p| &p[..2]), Some(&[200u8, 40][..]));
    }

    #[test]
    fn pack_mer_places_channels_and_resizes() {
        let metallic = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, image::Luma([10])));
        let roughness = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, image::Luma([90])));

        let mer = pack_mer(Some(&metallic), None, Some(&roughness)).unwrap();
        assert_eq!((mer.width(), mer.height()), (4, 4));
        for (x, y) in [(0, 0), (3, 3), (1, 2)] {
            let px = mer.pixel(x, y).unwrap();
            assert_eq!(px[0], 10);
            assert_eq!(px[1], 0);
            assert!(px[2].abs_diff(90) <= 1, "roughness {} at ({}, {})", px[2], x, y);
        }
    }

    #[test]
    fn pack_mer_needs_a_source() {
        assert!(matches!(pack_mer(None, None, None), Err(Error::InvalidImage(_))));
    }

    #[test]
    fn convert_files_roundtrip_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("stone_s.png");
        RgbaImage::from_raw(2, 1, vec![255, 240, 0, 255, 0, 0, 0, 120])
            .unwrap()
            .save(&src)
            .unwrap();

        let dst = tmp.path().join("out").join("stone_mer.png");
        convert_specular_file(&src, &dst).unwrap();

        let mer = load_raster(&dst).unwrap();
        assert_eq!(mer.channels(), Channels::Rgb);
        assert_eq!(mer.data(), &[255, 0, 0, 0, 120, 255]);
    }
}
