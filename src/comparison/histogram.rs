//! Color histogram comparison

use image::{DynamicImage, GrayImage, RgbaImage};

use super::preprocess::SourceImage;

/// Bins per color channel
const HISTOGRAM_BINS: usize = 8;
const BIN_WIDTH: usize = 256 / HISTOGRAM_BINS;

/// Scores by the Bhattacharyya distance between 8x8x8 RGB histograms
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramComparison {
    source: SourceImage,
    source_hist: Vec<f64>,
}

impl HistogramComparison {
    pub fn new(source: SourceImage) -> Self {
        let source_hist = normalized_histogram(source.pixels(), source.mask());
        Self {
            source,
            source_hist,
        }
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub(crate) fn into_source(self) -> SourceImage {
        self.source
    }

    /// Similarity from 0 to 1. Spatial layout is ignored.
    pub fn compare(&self, capture: &DynamicImage) -> f64 {
        let capture = self.source.resize_capture(capture);
        let capture_hist = normalized_histogram(&capture, self.source.mask());
        1.0 - bhattacharyya_distance(&self.source_hist, &capture_hist)
    }
}

/// 3-D RGB histogram over the masked pixels, scaled to unit L2 norm
fn normalized_histogram(image: &RgbaImage, mask: Option<&GrayImage>) -> Vec<f64> {
    let mut hist = vec![0.0f64; HISTOGRAM_BINS * HISTOGRAM_BINS * HISTOGRAM_BINS];

    for (x, y, pixel) in image.enumerate_pixels() {
        if mask.is_some_and(|m| m.get_pixel(x, y)[0] == 0) {
            continue;
        }
        let [r, g, b, _] = pixel.0;
        let bin = (r as usize / BIN_WIDTH) * HISTOGRAM_BINS * HISTOGRAM_BINS
            + (g as usize / BIN_WIDTH) * HISTOGRAM_BINS
            + b as usize / BIN_WIDTH;
        hist[bin] += 1.0;
    }

    let norm = hist.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        hist.iter_mut().for_each(|v| *v /= norm);
    }
    hist
}

/// Bhattacharyya distance, 0 for identical distributions and 1 for disjoint ones
fn bhattacharyya_distance(h1: &[f64], h2: &[f64]) -> f64 {
    let overlap: f64 = h1.iter().zip(h2).map(|(a, b)| (a * b).sqrt()).sum();
    let total = h1.iter().sum::<f64>() * h2.iter().sum::<f64>();
    let scale = if total.abs() > f64::EPSILON {
        1.0 / total.sqrt()
    } else {
        1.0
    };
    (1.0 - overlap * scale).max(0.0).sqrt()
}
