//! NYA Core Split Compare
//!
//! The image comparison engine of a video autosplitter. Live captured frames
//! are scored against split images to decide when a split, reset or start
//! happens in a speedrun.
//!
//! A split image is loaded once into a [`ComparisonImage`], which picks a
//! comparison strategy (L2 norm, histograms, perceptual hash, template
//! matching or OCR) and resolves its settings from filename overrides,
//! caller defaults and [`Settings`].
//!
//! ```ignore
//! use nyacore_split_compare::{ComparisonImage, Settings};
//!
//! let settings = Settings::load(Path::new("settings.toml"))?;
//! let mut split = ComparisonImage::load("splits/01_boss_(0.9).png");
//! let similarity = split.compare_with_capture(None, &settings, Some(&frame));
//! if similarity >= split.similarity_threshold(None, &settings) {
//!     // split
//! }
//! ```

pub mod capture;
pub mod comparison;
pub mod error;
pub mod recognizer;
pub mod settings;
pub mod split_image;
pub mod split_parser;

// Re-export commonly used types
pub use capture::{is_valid_capture, CapturedFrame};
pub use comparison::{ComparisonMethod, ComparisonStrategy, SourceImage};
pub use error::{CompareError, Result};
pub use recognizer::{TesseractRecognizer, TextRecognizer};
pub use settings::{resolve, Settings};
pub use split_image::{ComparisonImage, ImageType, OcrSettings, Rectangle};
pub use split_parser::{SplitOverrides, BELOW_FLAG, DUMMY_FLAG, PAUSE_FLAG};
