//! Comparison methods scoring a capture against a split image
//!
//! Every method produces a similarity from 0 to 1, where 1 means identical by
//! that method's definition. Image-based methods share the same
//! [`SourceImage`] preparation; OCR compares recognized text instead.
//!
//! # Example
//!
//! ```ignore
//! use nyacore_split_compare::comparison::ComparisonStrategy;
//!
//! let split = image::open("splits/01_boss.png")?;
//! let strategy = ComparisonStrategy::from_image(Some(2), &split);
//! let similarity = strategy.compare(Some(&capture));
//! ```

pub mod histogram;
pub mod l2_norm;
pub mod ocr;
pub mod phash;
pub mod preprocess;
pub mod template;

pub use histogram::HistogramComparison;
pub use l2_norm::L2NormComparison;
pub use ocr::{ocr_method_by_index, OcrComparison, OcrMatchFn};
pub use phash::PHashComparison;
pub use preprocess::{
    SourceImage, COMPARISON_RESIZE_AREA, COMPARISON_RESIZE_HEIGHT, COMPARISON_RESIZE_WIDTH,
};
pub use template::TemplateComparison;

use image::DynamicImage;

use crate::capture::is_valid_capture;

/// Image comparison methods selectable by index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonMethod {
    L2Norm = 0,
    Histogram = 1,
    PerceptualHash = 2,
    Template = 3,
}

impl ComparisonMethod {
    /// Method for a configured index; `None` for anything unmapped
    pub fn from_index(index: Option<i64>) -> Option<Self> {
        match index? {
            0 => Some(Self::L2Norm),
            1 => Some(Self::Histogram),
            2 => Some(Self::PerceptualHash),
            3 => Some(Self::Template),
            _ => None,
        }
    }

    pub fn index(self) -> i64 {
        self as i64
    }
}

impl std::fmt::Display for ComparisonMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonMethod::L2Norm => write!(f, "L2 norm"),
            ComparisonMethod::Histogram => write!(f, "histograms"),
            ComparisonMethod::PerceptualHash => write!(f, "perceptual hash"),
            ComparisonMethod::Template => write!(f, "template matching"),
        }
    }
}

/// The comparison a split image currently uses, with its prepared data
#[derive(Debug, Clone, Default)]
pub enum ComparisonStrategy {
    /// Nothing usable was loaded; never matches
    #[default]
    Passthrough,
    /// A prepared image without a valid method index; never matches, but keeps
    /// the source so a later default method can take over
    Unscored(SourceImage),
    L2Norm(L2NormComparison),
    Histogram(HistogramComparison),
    PerceptualHash(PHashComparison),
    Template(TemplateComparison),
    Ocr(OcrComparison),
}

impl ComparisonStrategy {
    /// Prepare a decoded split image for the method at `index`
    pub fn from_image(index: Option<i64>, image: &DynamicImage) -> Self {
        Self::from_source(index, SourceImage::new(image))
    }

    /// Wrap an already prepared source in the method at `index`.
    /// Unmapped indices, negative ones included, never match.
    pub fn from_source(index: Option<i64>, source: SourceImage) -> Self {
        match ComparisonMethod::from_index(index) {
            Some(ComparisonMethod::L2Norm) => Self::L2Norm(L2NormComparison::new(source)),
            Some(ComparisonMethod::Histogram) => Self::Histogram(HistogramComparison::new(source)),
            Some(ComparisonMethod::PerceptualHash) => {
                Self::PerceptualHash(PHashComparison::new(source))
            }
            Some(ComparisonMethod::Template) => Self::Template(TemplateComparison::new(source)),
            None => Self::Unscored(source),
        }
    }

    /// The image method in use, if any
    pub fn method(&self) -> Option<ComparisonMethod> {
        match self {
            Self::L2Norm(_) => Some(ComparisonMethod::L2Norm),
            Self::Histogram(_) => Some(ComparisonMethod::Histogram),
            Self::PerceptualHash(_) => Some(ComparisonMethod::PerceptualHash),
            Self::Template(_) => Some(ComparisonMethod::Template),
            Self::Passthrough | Self::Unscored(_) | Self::Ocr(_) => None,
        }
    }

    /// The prepared split image, for image-based strategies
    pub fn source(&self) -> Option<&SourceImage> {
        match self {
            Self::Unscored(source) => Some(source),
            Self::L2Norm(m) => Some(m.source()),
            Self::Histogram(m) => Some(m.source()),
            Self::PerceptualHash(m) => Some(m.source()),
            Self::Template(m) => Some(m.source()),
            Self::Passthrough | Self::Ocr(_) => None,
        }
    }

    pub fn is_image(&self) -> bool {
        self.source().is_some()
    }

    pub fn is_ocr(&self) -> bool {
        matches!(self, Self::Ocr(_))
    }

    /// Switch an image-based strategy to the method at `index`, reusing its
    /// prepared source. Returns whether anything changed; OCR and passthrough
    /// strategies are left alone.
    pub fn switch_method(&mut self, index: Option<i64>) -> bool {
        if !self.is_image() || self.method() == ComparisonMethod::from_index(index) {
            return false;
        }

        match std::mem::take(self).into_source() {
            Some(source) => {
                *self = Self::from_source(index, source);
                true
            }
            None => false,
        }
    }

    fn into_source(self) -> Option<SourceImage> {
        match self {
            Self::Unscored(source) => Some(source),
            Self::L2Norm(m) => Some(m.into_source()),
            Self::Histogram(m) => Some(m.into_source()),
            Self::PerceptualHash(m) => Some(m.into_source()),
            Self::Template(m) => Some(m.into_source()),
            Self::Passthrough | Self::Ocr(_) => None,
        }
    }

    /// Similarity from 0 to 1. Invalid captures score 0 without any work.
    pub fn compare(&self, capture: Option<&DynamicImage>) -> f64 {
        let Some(capture) = capture.filter(|c| is_valid_capture(Some(*c))) else {
            return 0.0;
        };

        match self {
            Self::Passthrough | Self::Unscored(_) => 0.0,
            Self::L2Norm(m) => m.compare(capture),
            Self::Histogram(m) => m.compare(capture),
            Self::PerceptualHash(m) => m.compare(capture),
            Self::Template(m) => m.compare(capture),
            Self::Ocr(m) => m.compare(capture),
        }
    }
}
