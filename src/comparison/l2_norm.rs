//! L2 norm (Euclidean pixel distance) comparison

use image::DynamicImage;

use super::preprocess::{SourceImage, MAXBYTE};

/// Color channels counted in the maximum error of a masked comparison
const MASK_SIZE_MULTIPLIER: f64 = 3.0 * MAXBYTE as f64 * MAXBYTE as f64;

/// Scores by the L2 error between source and capture over the comparable pixels
#[derive(Debug, Clone, PartialEq)]
pub struct L2NormComparison {
    source: SourceImage,
    max_error: f64,
}

impl L2NormComparison {
    pub fn new(source: SourceImage) -> Self {
        let max_error = match source.opaque_count() {
            Some(opaque) => (opaque as f64 * MASK_SIZE_MULTIPLIER).sqrt(),
            None => (source.pixels().as_raw().len() as f64).sqrt() * MAXBYTE as f64,
        };
        Self { source, max_error }
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub(crate) fn into_source(self) -> SourceImage {
        self.source
    }

    /// Similarity from 0 to 1, where 1 means no error at all
    pub fn compare(&self, capture: &DynamicImage) -> f64 {
        if self.max_error == 0.0 {
            return 0.0;
        }

        let capture = self.source.resize_capture(capture);
        let source = self.source.pixels();

        let squared_error: u64 = match self.source.mask() {
            Some(mask) => source
                .pixels()
                .zip(capture.pixels())
                .zip(mask.pixels())
                .filter(|(_, m)| m[0] != 0)
                .map(|((s, c), _)| squared_difference(&s.0, &c.0))
                .sum(),
            None => source
                .pixels()
                .zip(capture.pixels())
                .map(|(s, c)| squared_difference(&s.0, &c.0))
                .sum(),
        };

        let error = (squared_error as f64).sqrt();
        (1.0 - error / self.max_error).clamp(0.0, 1.0)
    }
}

pub(crate) fn squared_difference(a: &[u8; 4], b: &[u8; 4]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as i64 - y as i64;
            (d * d) as u64
        })
        .sum()
}
