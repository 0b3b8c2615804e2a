//! Split images: a comparison strategy plus the per-image settings around it
//!
//! A split image is either a picture compared against captures, or a TOML
//! text file describing text to look for in a region of the capture:
//!
//! ```toml
//! texts = ["enemy felled", "great enemy felled"]
//! left = 640
//! right = 1280
//! top = 400
//! bottom = 480
//! methods = [0, 1]   # optional, defaults to [0]
//! fps_limit = 5      # optional, 0 uses the global limit
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::capture::{is_valid_capture, CapturedFrame};
use crate::comparison::{ComparisonMethod, ComparisonStrategy, OcrComparison, SourceImage};
use crate::error::{CompareError, Result};
use crate::recognizer::{TesseractRecognizer, TextRecognizer};
use crate::settings::{resolve, Settings};
use crate::split_parser::SplitOverrides;

/// Filename keyword marking the image that starts the timer
pub const START_KEYWORD: &str = "start_auto_splitter";
/// Filename keyword marking the image that resets the run
pub const RESET_KEYWORD: &str = "reset";

/// What a match on this image does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    Split,
    Reset,
    Start,
}

impl ImageType {
    /// Classify by keyword in the filename, case-insensitively. Start wins over reset.
    pub fn from_filename(filename: &str) -> Self {
        let filename = filename.to_lowercase();
        if filename.contains(START_KEYWORD) {
            ImageType::Start
        } else if filename.contains(RESET_KEYWORD) {
            ImageType::Reset
        } else {
            ImageType::Split
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageType::Split => write!(f, "split"),
            ImageType::Reset => write!(f, "reset"),
            ImageType::Start => write!(f, "start"),
        }
    }
}

/// Capture region read by OCR, in capture pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
}

impl Rectangle {
    /// A rectangle, or `None` if it would be invalid
    pub fn new(left: i64, right: i64, top: i64, bottom: i64) -> Option<Self> {
        let rect = Self {
            left,
            right,
            top,
            bottom,
        };
        rect.is_valid().then_some(rect)
    }

    /// Non-negative origin and a non-empty extent on both axes
    pub fn is_valid(&self) -> bool {
        self.right > self.left && self.left >= 0 && self.bottom > self.top && self.top >= 0
    }

    /// The part of the capture inside this rectangle, clipped to the capture.
    /// `None` if nothing of the capture is inside.
    pub fn crop(&self, capture: &DynamicImage) -> Option<DynamicImage> {
        if !self.is_valid() {
            return None;
        }
        let clip = |value: i64, max: u32| value.clamp(0, max as i64) as u32;
        let (left, right) = (clip(self.left, capture.width()), clip(self.right, capture.width()));
        let (top, bottom) = (clip(self.top, capture.height()), clip(self.bottom, capture.height()));
        if right <= left || bottom <= top {
            return None;
        }
        Some(capture.crop_imm(left, top, right - left, bottom - top))
    }
}

fn default_methods() -> Vec<i64> {
    vec![0]
}

/// Contents of an OCR text file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrSettings {
    pub texts: Vec<String>,
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
    #[serde(default = "default_methods")]
    pub methods: Vec<i64>,
    #[serde(default)]
    pub fps_limit: i64,
}

impl OcrSettings {
    /// Parse OCR settings from a TOML string
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load OCR settings from a TOML text file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CompareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| CompareError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn rectangle(&self) -> Rectangle {
        Rectangle {
            left: self.left,
            right: self.right,
            top: self.top,
            bottom: self.bottom,
        }
    }

    /// Reject an invalid rectangle, negative methods or fps limit, and an empty text list
    pub fn validate(&self, path: &Path) -> Result<()> {
        if !self.rectangle().is_valid() {
            return Err(CompareError::invalid_ocr_values(
                path,
                format!("invalid rectangle {:?}", self.rectangle()),
            ));
        }
        if let Some(negative) = self.methods.iter().chain([&self.fps_limit]).find(|v| **v < 0) {
            return Err(CompareError::invalid_ocr_values(
                path,
                format!("negative value {}", negative),
            ));
        }
        if self.texts.is_empty() {
            return Err(CompareError::invalid_ocr_values(path, "no texts to look for"));
        }
        Ok(())
    }
}

/// A split image loaded from disk, ready to be compared against captures
#[derive(Debug)]
pub struct ComparisonImage {
    path: PathBuf,
    filename: String,
    image_type: ImageType,
    overrides: SplitOverrides,
    strategy: ComparisonStrategy,
    rect: Option<Rectangle>,
    /// 0 means no per-image limit
    fps_limit: u32,
    load_error: Option<CompareError>,
}

impl ComparisonImage {
    /// Load a split image, looking for Tesseract if it is an OCR text file.
    ///
    /// Loading never fails: problems are logged, kept in [`Self::load_error`],
    /// and the image falls back to a strategy that never matches.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load_with_recognizer(path, recognizer_for(path, TesseractRecognizer::locate))
    }

    /// Load a split image using the given text recognizer for OCR files.
    /// `None` means no recognition engine is available.
    pub fn load_with_recognizer(
        path: impl AsRef<Path>,
        recognizer: Option<Arc<dyn TextRecognizer>>,
    ) -> Self {
        let mut image = Self::empty(path.as_ref());

        let result = if is_text_file(&image.path) {
            image.load_text_file(recognizer)
        } else {
            image.load_image_file()
        };
        image.finish_load(result);
        image
    }

    /// Build from an already decoded image; `path` provides the name and overrides
    pub fn from_image(path: impl AsRef<Path>, decoded: &DynamicImage) -> Self {
        let mut image = Self::empty(path.as_ref());
        let result = image.set_image(decoded);
        image.finish_load(result);
        image
    }

    /// Build from already parsed OCR settings
    pub fn from_ocr_settings(
        path: impl AsRef<Path>,
        settings: &OcrSettings,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        let mut image = Self::empty(path.as_ref());
        let result = image.set_ocr(settings, recognizer);
        image.finish_load(result);
        image
    }

    fn empty(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            image_type: ImageType::from_filename(&filename),
            overrides: SplitOverrides::from_filename(&filename),
            filename,
            strategy: ComparisonStrategy::Passthrough,
            rect: None,
            fps_limit: 0,
            load_error: None,
        }
    }

    fn finish_load(&mut self, result: Result<()>) {
        match result {
            Ok(()) => log::debug!(
                "Loaded {} image '{}' ({})",
                self.image_type,
                self.filename,
                if self.is_ocr() { "ocr" } else { "image" }
            ),
            Err(e) => {
                log::warn!("{}", e);
                self.strategy = ComparisonStrategy::Passthrough;
                self.rect = None;
                self.fps_limit = 0;
                self.load_error = Some(e);
            }
        }
    }

    fn load_text_file(&mut self, recognizer: Option<Arc<dyn TextRecognizer>>) -> Result<()> {
        let Some(recognizer) = recognizer else {
            return Err(CompareError::TesseractMissing {
                path: self.path.clone(),
            });
        };
        let settings = OcrSettings::load(&self.path)?;
        self.set_ocr(&settings, recognizer)
    }

    fn load_image_file(&mut self) -> Result<()> {
        let decoded =
            image::open(&self.path).map_err(|e| CompareError::image_type(&self.path, e))?;
        self.set_image(&decoded)
    }

    fn set_image(&mut self, decoded: &DynamicImage) -> Result<()> {
        if !is_valid_capture(Some(decoded)) {
            return Err(CompareError::image_type(&self.path, "image has no pixels"));
        }
        self.strategy = ComparisonStrategy::from_image(self.overrides.comparison_method, decoded);
        Ok(())
    }

    fn set_ocr(
        &mut self,
        settings: &OcrSettings,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Result<()> {
        settings.validate(&self.path)?;
        let fps_limit = u32::try_from(settings.fps_limit).map_err(|_| {
            CompareError::invalid_ocr_values(&self.path, "fps_limit is too large")
        })?;

        self.strategy = ComparisonStrategy::Ocr(OcrComparison::new(
            &settings.texts,
            &settings.methods,
            recognizer,
        ));
        self.rect = Some(settings.rectangle());
        self.fps_limit = fps_limit;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercased filename
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// Why loading fell back to a never-matching strategy, if it did
    pub fn load_error(&self) -> Option<&CompareError> {
        self.load_error.as_ref()
    }

    /// Whether this split image reads text instead of comparing pixels
    pub fn is_ocr(&self) -> bool {
        self.strategy.is_ocr()
    }

    /// Expected texts of an OCR split image, empty otherwise
    pub fn texts(&self) -> &[String] {
        match &self.strategy {
            ComparisonStrategy::Ocr(ocr) => ocr.texts(),
            _ => &[],
        }
    }

    /// The prepared image of an image-based split image
    pub fn source_image(&self) -> Option<&SourceImage> {
        self.strategy.source()
    }

    /// Capture region read by OCR
    pub fn rectangle(&self) -> Option<Rectangle> {
        self.rect
    }

    /// Image method currently in use
    pub fn comparison_method(&self) -> Option<ComparisonMethod> {
        self.strategy.method()
    }

    pub fn strategy(&self) -> &ComparisonStrategy {
        &self.strategy
    }

    pub fn overrides(&self) -> &SplitOverrides {
        &self.overrides
    }

    /// Delay before splitting, in milliseconds
    pub fn delay_time(&self, default: Option<u64>, settings: &Settings) -> u64 {
        resolve(self.overrides.delay_time, default, settings.default_delay_time)
    }

    pub fn comparison_method_index(&self, default: Option<i64>, settings: &Settings) -> i64 {
        resolve(
            self.overrides.comparison_method,
            default,
            settings.default_comparison_method,
        )
    }

    /// Pause after splitting, in seconds
    pub fn pause_time(&self, default: Option<f64>, settings: &Settings) -> f64 {
        resolve(self.overrides.pause_time, default, settings.default_pause_time)
    }

    pub fn similarity_threshold(&self, default: Option<f64>, settings: &Settings) -> f64 {
        resolve(
            self.overrides.similarity_threshold,
            default,
            settings.default_similarity_threshold,
        )
    }

    /// Per-image fps limit. Zero is the "not set" value, so a limit of zero
    /// always defers to the settings.
    pub fn fps_limit(&self, settings: &Settings) -> u32 {
        if self.fps_limit != 0 {
            self.fps_limit
        } else {
            settings.fps_limit
        }
    }

    /// Number of times this split repeats
    pub fn loops(&self) -> u32 {
        self.overrides.loops.unwrap_or(1)
    }

    /// Whether every bit of `flag` is set
    pub fn check_flag(&self, flag: u32) -> bool {
        self.overrides.flags & flag == flag
    }

    /// Compare a capture with this image, from 0 to 1.
    ///
    /// Images that don't pin a method in their filename follow the current
    /// default method, switching strategy when it changes. OCR images only
    /// read their rectangle of the capture. Invalid captures score 0.
    pub fn compare_with_capture(
        &mut self,
        default: Option<i64>,
        settings: &Settings,
        capture: Option<&DynamicImage>,
    ) -> f64 {
        let Some(capture) = capture.filter(|c| is_valid_capture(Some(*c))) else {
            return 0.0;
        };

        if self.overrides.comparison_method.is_none() && self.strategy.is_image() {
            let index = self.comparison_method_index(default, settings);
            if self.strategy.switch_method(Some(index)) {
                log::debug!(
                    "'{}' now compares with method {} ({:?})",
                    self.filename,
                    index,
                    self.strategy.method()
                );
            }
        }

        match self.rect {
            Some(rect) => match rect.crop(capture) {
                Some(region) => self.strategy.compare(Some(&region)),
                None => 0.0,
            },
            None => self.strategy.compare(Some(capture)),
        }
    }

    /// [`Self::compare_with_capture`] on a raw frame from a capture backend.
    /// A frame whose buffer doesn't match its size scores 0.
    pub fn compare_with_frame(
        &mut self,
        default: Option<i64>,
        settings: &Settings,
        frame: CapturedFrame,
    ) -> f64 {
        let capture = frame.into_image();
        self.compare_with_capture(default, settings, capture.as_ref())
    }
}

/// The recognizer an OCR text file needs; `locate` only runs for text files
fn recognizer_for(
    path: &Path,
    locate: impl FnOnce() -> Option<TesseractRecognizer>,
) -> Option<Arc<dyn TextRecognizer>> {
    if !is_text_file(path) {
        return None;
    }
    locate().map(|tesseract| Arc::new(tesseract) as Arc<dyn TextRecognizer>)
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    struct SizeReporter;

    impl TextRecognizer for SizeReporter {
        fn recognize(&self, png: &[u8]) -> Result<String> {
            let image = image::load_from_memory(png)?;
            Ok(format!("{}x{}", image.width(), image.height()))
        }
    }

    fn scene() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(320, 240, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }))
    }

    fn ocr_settings(texts: &[&str]) -> OcrSettings {
        OcrSettings {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            left: 10,
            right: 30,
            top: 5,
            bottom: 15,
            methods: vec![0],
            fps_limit: 0,
        }
    }

    #[test]
    fn test_rectangle_validity() {
        assert!(Rectangle::new(0, 10, 0, 10).is_some());
        assert!(Rectangle::new(10, 10, 0, 10).is_none());
        assert!(Rectangle::new(-1, 10, 0, 10).is_none());
        assert!(Rectangle::new(0, 10, 10, 5).is_none());
        assert!(Rectangle::new(0, 10, -2, 5).is_none());
    }

    #[test]
    fn test_rectangle_crop_clips_to_capture() {
        let capture = DynamicImage::new_rgb8(100, 50);
        let rect = Rectangle::new(90, 200, 40, 60).unwrap();
        let region = rect.crop(&capture).unwrap();
        assert_eq!((region.width(), region.height()), (10, 10));

        let outside = Rectangle::new(150, 200, 0, 10).unwrap();
        assert!(outside.crop(&capture).is_none());
    }

    #[test]
    fn test_image_type_from_filename() {
        assert_eq!(ImageType::from_filename("00_START_AUTO_SPLITTER.png"), ImageType::Start);
        assert_eq!(ImageType::from_filename("Reset.png"), ImageType::Reset);
        assert_eq!(ImageType::from_filename("03_boss.png"), ImageType::Split);
        assert_eq!(
            ImageType::from_filename("start_auto_splitter_reset.png"),
            ImageType::Start
        );
    }

    #[test]
    fn test_accessor_fallbacks() {
        let settings = Settings::default();
        let plain = ComparisonImage::from_image("00.png", &scene());
        assert_eq!(plain.delay_time(None, &settings), 0);
        assert_eq!(plain.delay_time(Some(300), &settings), 300);
        assert_eq!(plain.pause_time(None, &settings), 10.0);
        assert_eq!(plain.similarity_threshold(Some(0.8), &settings), 0.8);
        assert_eq!(plain.comparison_method_index(None, &settings), 0);
        assert_eq!(plain.fps_limit(&settings), 60);
        assert_eq!(plain.loops(), 1);

        let pinned = ComparisonImage::from_image("00_#50#_[2]_(0.7)_^1^_@3@.png", &scene());
        assert_eq!(pinned.delay_time(Some(300), &settings), 50);
        assert_eq!(pinned.pause_time(Some(1.0), &settings), 2.0);
        assert_eq!(pinned.similarity_threshold(Some(0.8), &settings), 0.7);
        assert_eq!(pinned.comparison_method_index(Some(2), &settings), 1);
        assert_eq!(pinned.loops(), 3);
    }

    #[test]
    fn test_comparison_method_index_from_filename() {
        let settings = Settings::default();
        let image = ComparisonImage::from_image("00.png", &scene());
        for default in 0..3 {
            assert_eq!(image.comparison_method_index(Some(default), &settings), default);
        }

        let image = ComparisonImage::from_image("00_^1^.png", &scene());
        for default in 0..3 {
            assert_eq!(image.comparison_method_index(Some(default), &settings), 1);
        }
    }

    #[test]
    fn test_unpinned_image_follows_default_method() {
        let settings = Settings::default();
        let capture = scene();
        let mut image = ComparisonImage::from_image("00.png", &capture);
        assert_eq!(image.comparison_method(), None);

        image.compare_with_capture(Some(1), &settings, Some(&capture));
        assert_eq!(image.comparison_method(), Some(ComparisonMethod::Histogram));

        image.compare_with_capture(None, &settings, Some(&capture));
        assert_eq!(image.comparison_method(), Some(ComparisonMethod::L2Norm));

        assert_eq!(image.compare_with_capture(Some(7), &settings, Some(&capture)), 0.0);
        assert!(image.source_image().is_some());
        let score = image.compare_with_capture(Some(2), &settings, Some(&capture));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_pinned_image_keeps_its_method() {
        let settings = Settings::default();
        let capture = scene();
        let mut image = ComparisonImage::from_image("00_^3^.png", &capture);
        assert_eq!(image.comparison_method(), Some(ComparisonMethod::Template));

        image.compare_with_capture(Some(0), &settings, Some(&capture));
        assert_eq!(image.comparison_method(), Some(ComparisonMethod::Template));

        let mut broken = ComparisonImage::from_image("00_^9^.png", &capture);
        assert_eq!(broken.compare_with_capture(Some(0), &settings, Some(&capture)), 0.0);
        assert_eq!(broken.comparison_method(), None);
    }

    #[test]
    fn test_invalid_capture_scores_zero() {
        let settings = Settings::default();
        let mut image = ComparisonImage::from_image("00.png", &scene());
        assert_eq!(image.compare_with_capture(Some(0), &settings, None), 0.0);
        let empty = DynamicImage::new_rgba8(0, 0);
        assert_eq!(image.compare_with_capture(Some(0), &settings, Some(&empty)), 0.0);
        // rejected before the strategy could switch
        assert_eq!(image.comparison_method(), None);
    }

    #[test]
    fn test_empty_decoded_image_is_an_image_type_error() {
        let image = ComparisonImage::from_image("00.png", &DynamicImage::new_rgb8(0, 0));
        assert!(matches!(image.load_error(), Some(CompareError::ImageType { .. })));
        assert!(matches!(image.strategy(), ComparisonStrategy::Passthrough));
    }

    #[test]
    fn test_ocr_reads_only_its_rectangle() {
        let settings = Settings::default();
        let mut image = ComparisonImage::from_ocr_settings(
            "boss.txt",
            &ocr_settings(&["20x10"]),
            Arc::new(SizeReporter),
        );

        assert!(image.is_ocr());
        assert_eq!(image.texts(), &["20x10".to_string()]);
        assert_eq!(image.rectangle(), Rectangle::new(10, 30, 5, 15));
        assert!(image.source_image().is_none());

        let capture = scene();
        assert_eq!(image.compare_with_capture(Some(0), &settings, Some(&capture)), 1.0);

        // A capture too small to contain the rectangle never matches
        let tiny = DynamicImage::new_rgb8(5, 5);
        assert_eq!(image.compare_with_capture(Some(0), &settings, Some(&tiny)), 0.0);
    }

    #[test]
    fn test_ocr_fps_limit_sentinel() {
        let settings = Settings::default();
        let mut values = ocr_settings(&["a"]);
        values.fps_limit = 5;
        let limited = ComparisonImage::from_ocr_settings("a.txt", &values, Arc::new(SizeReporter));
        assert_eq!(limited.fps_limit(&settings), 5);

        values.fps_limit = 0;
        let unlimited =
            ComparisonImage::from_ocr_settings("a.txt", &values, Arc::new(SizeReporter));
        assert_eq!(unlimited.fps_limit(&settings), settings.fps_limit);
    }

    #[test]
    fn test_invalid_ocr_settings_fall_back() {
        let mut values = ocr_settings(&["a"]);
        values.left = 40;
        let image = ComparisonImage::from_ocr_settings("a.txt", &values, Arc::new(SizeReporter));
        assert!(matches!(image.load_error(), Some(CompareError::InvalidOcrValues { .. })));
        assert!(!image.is_ocr());
        assert!(image.rectangle().is_none());

        let mut values = ocr_settings(&["a"]);
        values.methods = vec![0, -1];
        let image = ComparisonImage::from_ocr_settings("a.txt", &values, Arc::new(SizeReporter));
        assert!(image.load_error().is_some());

        let mut values = ocr_settings(&["a"]);
        values.fps_limit = -5;
        let image = ComparisonImage::from_ocr_settings("a.txt", &values, Arc::new(SizeReporter));
        assert!(image.load_error().is_some());

        let image =
            ComparisonImage::from_ocr_settings("a.txt", &ocr_settings(&[]), Arc::new(SizeReporter));
        assert!(image.texts().is_empty());
        assert!(image.load_error().is_some());
    }

    #[test]
    fn test_ocr_settings_defaults() {
        let settings = OcrSettings::from_toml(
            r#"
            texts = ["Great Enemy Felled"]
            left = 0
            right = 100
            top = 0
            bottom = 20
        "#,
        )
        .unwrap();

        assert_eq!(settings.methods, vec![0]);
        assert_eq!(settings.fps_limit, 0);
        assert!(settings.validate(Path::new("a.txt")).is_ok());
        assert!(OcrSettings::from_toml("texts = [\"a\"]\nleft = 0").is_err());
    }

    #[test]
    fn test_flags() {
        use crate::split_parser::{BELOW_FLAG, DUMMY_FLAG, PAUSE_FLAG};

        let image = ComparisonImage::from_image("01_{db}.png", &scene());
        assert!(image.check_flag(DUMMY_FLAG));
        assert!(image.check_flag(BELOW_FLAG));
        assert!(image.check_flag(DUMMY_FLAG | BELOW_FLAG));
        assert!(!image.check_flag(PAUSE_FLAG));
    }

    #[test]
    fn test_recognizer_only_looked_up_for_text_files() {
        let image = recognizer_for(Path::new("splits/01_boss.png"), || {
            panic!("looked for tesseract for an image file")
        });
        assert!(image.is_none());

        let text = recognizer_for(Path::new("splits/ocr.txt"), || {
            Some(TesseractRecognizer::new("/opt/tesseract"))
        });
        assert!(text.is_some());
        assert!(recognizer_for(Path::new("splits/ocr.txt"), || None).is_none());
    }

    #[test]
    fn test_compare_with_frame() {
        let settings = Settings::default();
        let scene = scene();
        let mut image = ComparisonImage::from_image("00_^0^.png", &scene);

        let frame = CapturedFrame::new(320, 240, scene.to_rgba8().into_raw());
        assert_eq!(image.compare_with_frame(None, &settings, frame), 1.0);

        let truncated = CapturedFrame::new(320, 240, vec![0; 100]);
        assert_eq!(image.compare_with_frame(None, &settings, truncated), 0.0);
    }

    #[test]
    fn test_is_text_file() {
        assert!(is_text_file(Path::new("splits/ocr.TXT")));
        assert!(is_text_file(Path::new("splits/ocr.toml")));
        assert!(!is_text_file(Path::new("splits/boss.png")));
        assert!(!is_text_file(Path::new("splits/txt")));
    }
}
