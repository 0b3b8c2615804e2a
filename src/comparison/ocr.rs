//! Text comparison through optical character recognition

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};

use crate::error::Result;
use crate::recognizer::TextRecognizer;

/// Best possible similarity; finding it ends the search early
const MAX_VALUE: f64 = 1.0;

/// Scores an expected text against the text recognized in the capture
pub type OcrMatchFn = fn(&str, &str) -> f64;

/// Scores the best match between expected texts and the recognized text
#[derive(Clone)]
pub struct OcrComparison {
    texts: Vec<String>,
    methods: Vec<OcrMatchFn>,
    recognizer: Arc<dyn TextRecognizer>,
}

impl OcrComparison {
    /// Build from configured texts and method indices.
    /// Texts are lowercased and trimmed; see [`ocr_method_by_index`] for the indices.
    pub fn new(texts: &[String], methods: &[i64], recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self::with_matchers(
            texts,
            methods.iter().map(|&index| ocr_method_by_index(index)).collect(),
            recognizer,
        )
    }

    /// Build with explicit match functions
    pub fn with_matchers(
        texts: &[String],
        methods: Vec<OcrMatchFn>,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            texts: texts.iter().map(|t| t.trim().to_lowercase()).collect(),
            methods,
            recognizer,
        }
    }

    /// The normalized expected texts
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Similarity from 0 to 1 of the best (text, method) pair.
    ///
    /// Recognition runs an external engine and is by far the slowest
    /// comparison. Failures are logged and score 0.
    pub fn compare(&self, capture: &DynamicImage) -> f64 {
        let recognized = match self.recognize(capture) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Text recognition failed: {}", e);
                return 0.0;
            }
        };
        self.best_match(&recognized)
    }

    /// Highest score over every expected text and method, stopping at a perfect match
    pub fn best_match(&self, recognized: &str) -> f64 {
        let mut ratio = 0.0f64;
        for text in &self.texts {
            for method in &self.methods {
                ratio = ratio.max(method(text, recognized));
                if ratio == MAX_VALUE {
                    return ratio;
                }
            }
        }
        ratio
    }

    /// Stylised fonts make OCR mix up letter case, so recognized text is lowercased
    fn recognize(&self, capture: &DynamicImage) -> Result<String> {
        let mut png = Vec::new();
        capture.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        let text = self.recognizer.recognize(&png)?;
        Ok(text.trim().to_lowercase())
    }
}

impl fmt::Debug for OcrComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrComparison")
            .field("texts", &self.texts)
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// Match function for a configured index: 0 is the Levenshtein ratio, 1 is
/// substring containment, anything else never matches
pub fn ocr_method_by_index(index: i64) -> OcrMatchFn {
    match index {
        0 => levenshtein_ratio,
        1 => compare_submatch,
        _ => compare_dummy,
    }
}

/// 1 if the expected text appears in the recognized text
pub fn compare_submatch(expected: &str, recognized: &str) -> f64 {
    if recognized.contains(expected) {
        1.0
    } else {
        0.0
    }
}

pub fn compare_dummy(_: &str, _: &str) -> f64 {
    0.0
}

/// Normalized similarity `1 - indel / (len_a + len_b)`, where indel is the
/// edit distance counting only insertions and deletions
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let indel = total - 2 * longest_common_subsequence(&a, &b);
    1.0 - indel as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
