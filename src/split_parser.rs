//! Per-image overrides encoded in split image filenames
//!
//! A split image can pin its own settings with markers in its filename, for
//! example `03_boss_(0.9)_[5]_#250#_^1^_@2@_{b}.png`:
//!
//! | Marker    | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `(0.9)`   | similarity threshold, 0 to 1              |
//! | `[5]`     | pause time in seconds                     |
//! | `#250#`   | delay time in milliseconds                |
//! | `^1^`     | comparison method index                   |
//! | `@2@`     | loop count                                |
//! | `{dbp}`   | flags (dummy, below threshold, pause)     |
//!
//! Markers that are missing or don't parse mean "no override".

/// Dummy split: the image is compared but the split is not triggered
pub const DUMMY_FLAG: u32 = 1 << 0;
/// Split when similarity goes below the threshold after having matched
pub const BELOW_FLAG: u32 = 1 << 1;
/// Pause the timer instead of splitting
pub const PAUSE_FLAG: u32 = 1 << 2;

/// Overrides read from a split image filename
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitOverrides {
    pub similarity_threshold: Option<f64>,
    pub pause_time: Option<f64>,
    pub delay_time: Option<u64>,
    pub comparison_method: Option<i64>,
    pub loops: Option<u32>,
    pub flags: u32,
}

impl SplitOverrides {
    /// Parse every supported marker from a filename
    pub fn from_filename(filename: &str) -> Self {
        Self {
            similarity_threshold: threshold_from_filename(filename),
            pause_time: pause_from_filename(filename),
            delay_time: delay_time_from_filename(filename),
            comparison_method: comparison_method_from_filename(filename),
            loops: loop_from_filename(filename),
            flags: flags_from_filename(filename),
        }
    }
}

/// Text between the first `open` and the following `close`
fn between(filename: &str, open: char, close: char) -> Option<&str> {
    let start = filename.find(open)? + open.len_utf8();
    let len = filename[start..].find(close)?;
    Some(&filename[start..start + len])
}

/// Similarity threshold between parentheses, only if within [0, 1]
pub fn threshold_from_filename(filename: &str) -> Option<f64> {
    let value: f64 = between(filename, '(', ')')?.trim().parse().ok()?;
    (0.0..=1.0).contains(&value).then_some(value)
}

/// Pause time in seconds between square brackets
pub fn pause_from_filename(filename: &str) -> Option<f64> {
    let value: f64 = between(filename, '[', ']')?.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Delay time in milliseconds between hashes
pub fn delay_time_from_filename(filename: &str) -> Option<u64> {
    between(filename, '#', '#')?.trim().parse().ok()
}

/// Comparison method index between carets
pub fn comparison_method_from_filename(filename: &str) -> Option<i64> {
    between(filename, '^', '^')?.trim().parse().ok()
}

/// Loop count between at signs, must be positive
pub fn loop_from_filename(filename: &str) -> Option<u32> {
    let value: u32 = between(filename, '@', '@')?.trim().parse().ok()?;
    (value > 0).then_some(value)
}

/// Flag bits from the letters between curly braces
pub fn flags_from_filename(filename: &str) -> u32 {
    let Some(letters) = between(filename, '{', '}') else {
        return 0;
    };

    letters
        .chars()
        .fold(0, |flags, c| match c.to_ascii_lowercase() {
            'd' => flags | DUMMY_FLAG,
            'b' => flags | BELOW_FLAG,
            'p' => flags | PAUSE_FLAG,
            other => {
                log::warn!("Unknown flag '{}' in split image filename '{}'", other, filename);
                flags
            }
        })
}
