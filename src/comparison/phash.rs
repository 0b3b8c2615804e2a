//! Perceptual hash comparison
//!
//! The hash is the sign pattern of the 8x8 lowest DCT frequencies of a 32x32
//! grayscale thumbnail relative to their median. Transparent pixels are
//! blacked out before hashing, so large masks make most hashes alike; this
//! method is not meant for heavily masked split images.

use std::f64::consts::PI;

use image::{DynamicImage, GrayImage, Luma, RgbaImage};
use imageproc::map::{map_colors, map_colors2};

use super::preprocess::SourceImage;

const HASH_SIZE: usize = 8;
const HIGHFREQ_FACTOR: usize = 4;
const IMG_SIZE: usize = HASH_SIZE * HIGHFREQ_FACTOR;
const HASH_BITS: f64 = (HASH_SIZE * HASH_SIZE) as f64;

/// Scores by the Hamming distance between 64-bit perceptual hashes
#[derive(Debug, Clone, PartialEq)]
pub struct PHashComparison {
    source: SourceImage,
    source_hash: u64,
}

impl PHashComparison {
    pub fn new(source: SourceImage) -> Self {
        let source_hash = perceptual_hash(&masked_grayscale(source.pixels(), source.mask()));
        Self {
            source,
            source_hash,
        }
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub(crate) fn into_source(self) -> SourceImage {
        self.source
    }

    /// Similarity from 0 to 1 as the share of matching hash bits
    pub fn compare(&self, capture: &DynamicImage) -> f64 {
        let capture = self.source.resize_capture(capture);
        let capture_hash = perceptual_hash(&masked_grayscale(&capture, self.source.mask()));
        let hash_diff = (self.source_hash ^ capture_hash).count_ones();
        1.0 - hash_diff as f64 / HASH_BITS
    }
}

/// Grayscale with the fixed-point BT.601 weights, transparent pixels set to black
fn masked_grayscale(image: &RgbaImage, mask: Option<&GrayImage>) -> GrayImage {
    match mask {
        Some(mask) => map_colors2(image, mask, |p, m| {
            Luma([if m[0] == 0 { 0 } else { gray(p.0) }])
        }),
        None => map_colors(image, |p| Luma([gray(p.0)])),
    }
}

fn gray([r, g, b, _]: [u8; 4]) -> u8 {
    ((r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13)) >> 14) as u8
}

/// 64-bit hash of a grayscale image, bit `v * 8 + u` set when DCT coefficient
/// (u, v) is above the median of the low-frequency block
pub(crate) fn perceptual_hash(gray: &GrayImage) -> u64 {
    let thumbnail = resize_area(gray, IMG_SIZE);
    let low_frequency = dct_low_frequency(&thumbnail);

    let mut sorted = low_frequency;
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    let median = (sorted[mid - 1] + sorted[mid]) / 2.0;

    low_frequency
        .iter()
        .enumerate()
        .filter(|&(_, &coeff)| coeff > median)
        .fold(0u64, |hash, (i, _)| hash | (1u64 << i))
}

/// Area-weighted resize to a `size` x `size` grid, rounded like an 8-bit image
fn resize_area(image: &GrayImage, size: usize) -> Vec<f64> {
    let x_weights = area_weights(image.width() as usize, size);
    let y_weights = area_weights(image.height() as usize, size);

    let mut out = Vec::with_capacity(size * size);
    for row in &y_weights {
        for col in &x_weights {
            let mut sum = 0.0;
            for &(sy, wy) in row {
                for &(sx, wx) in col {
                    sum += image.get_pixel(sx as u32, sy as u32)[0] as f64 * wx * wy;
                }
            }
            out.push(sum.round().clamp(0.0, 255.0));
        }
    }
    out
}

/// Source indices and weights covering each destination cell
fn area_weights(src: usize, dst: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            let start = d as f64 * scale;
            let end = start + scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (overlap > 0.0).then_some((s, overlap / scale))
                })
                .collect()
        })
        .collect()
}

/// Unnormalized 2-D DCT-II of an `IMG_SIZE` square, keeping the top-left 8x8 block row-major
fn dct_low_frequency(input: &[f64]) -> [f64; HASH_SIZE * HASH_SIZE] {
    let basis: Vec<[f64; IMG_SIZE]> = (0..HASH_SIZE)
        .map(|k| {
            let mut row = [0.0; IMG_SIZE];
            for (n, value) in row.iter_mut().enumerate() {
                *value = (PI / IMG_SIZE as f64 * (n as f64 + 0.5) * k as f64).cos();
            }
            row
        })
        .collect();

    // rows[y][u]: transform along x first
    let mut rows = vec![[0.0f64; HASH_SIZE]; IMG_SIZE];
    for (y, row) in rows.iter_mut().enumerate() {
        for (u, value) in row.iter_mut().enumerate() {
            *value = (0..IMG_SIZE)
                .map(|x| input[y * IMG_SIZE + x] * basis[u][x])
                .sum();
        }
    }

    let mut output = [0.0f64; HASH_SIZE * HASH_SIZE];
    for v in 0..HASH_SIZE {
        for u in 0..HASH_SIZE {
            output[v * HASH_SIZE + u] = (0..IMG_SIZE).map(|y| rows[y][u] * basis[v][y]).sum();
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Deterministic texture with even values so halving is exact
    fn texture(x: u32, y: u32) -> u8 {
        (((x * 37 + y * 91 + (x * y) % 53) % 120) * 2) as u8
    }

    #[test]
    fn test_identical_is_one() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(640, 480, |x, y| {
            let v = texture(x / 20, y / 20);
            Rgba([v, 255 - v, v / 2, 255])
        }));
        let method = PHashComparison::new(SourceImage::new(&image));
        assert_eq!(method.compare(&image), 1.0);
    }

    #[test]
    fn test_inverted_image_scores_low() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(320, 240, |x, y| {
            let v = texture(x / 10, y / 10);
            Rgba([v, v, v, 255])
        }));
        let mut inverted = image.clone();
        inverted.invert();
        let method = PHashComparison::new(SourceImage::new(&image));
        assert!(method.compare(&inverted) < 0.5);
    }

    #[test]
    fn test_hash_invariant_to_uniform_scaling() {
        let bright = GrayImage::from_fn(32, 32, |x, y| Luma([texture(x, y)]));
        let dim = GrayImage::from_fn(32, 32, |x, y| Luma([texture(x, y) / 2]));
        assert_eq!(perceptual_hash(&bright), perceptual_hash(&dim));
    }

    #[test]
    fn test_gray_weights() {
        assert_eq!(gray([0, 0, 0, 255]), 0);
        assert_eq!(gray([255, 255, 255, 255]), 255);
        assert_eq!(gray([77, 77, 77, 0]), 77);
        assert_eq!(gray([255, 0, 0, 255]), 76);
    }

    #[test]
    fn test_area_weights_sum_to_one() {
        for (src, dst) in [(240, 32), (320, 32), (20, 32), (32, 32)] {
            for cell in area_weights(src, dst) {
                let total: f64 = cell.iter().map(|(_, w)| w).sum();
                assert!((total - 1.0).abs() < 1e-9, "{} -> {}", src, dst);
            }
        }
    }

    #[test]
    fn test_resize_area_averages_blocks() {
        let image = GrayImage::from_fn(64, 64, |x, _| Luma([if x % 2 == 0 { 0 } else { 100 }]));
        let thumbnail = resize_area(&image, 32);
        assert!(thumbnail.iter().all(|&v| v == 50.0));
    }
}
