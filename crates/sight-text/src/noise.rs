//! Noise filter for OCR output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters OCR engines commonly emit for speckles, rules and scan borders.
pub const DEFAULT_NOISE_CHARS: &str = "~^`|#\\";

/// A line survives only if its share of letters is strictly above this.
pub const DEFAULT_MIN_ALPHA_RATIO: f64 = 0.3;

/// Accented letters counted as alphabetic, in addition to ASCII letters.
const EXTENDED_LETTERS: &str = "áàâãéêíóôõúüçÁÀÂÃÉÊÍÓÔÕÚÜÇ";

static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Removes recognition artifacts and lines that are mostly symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseFilter {
    pub noise_chars: String,
    pub min_alpha_ratio: f64,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self {
            noise_chars: DEFAULT_NOISE_CHARS.to_string(),
            min_alpha_ratio: DEFAULT_MIN_ALPHA_RATIO,
        }
    }
}

impl NoiseFilter {
    pub fn new(noise_chars: impl Into<String>, min_alpha_ratio: f64) -> Self {
        Self {
            noise_chars: noise_chars.into(),
            min_alpha_ratio,
        }
    }

    /// Clean one page of recognized text.
    ///
    /// Steps, in order: strip noise characters, collapse space runs, drop
    /// low-signal lines, rejoin with `\n`, then delete every `-\n` pair.
    /// The de-hyphenation leaves both word fragments adjacent with no space.
    pub fn apply(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let stripped: String = text
            .chars()
            .filter(|c| !self.noise_chars.contains(*c))
            .collect();
        let collapsed = SPACE_RUN.replace_all(&stripped, " ");

        let kept: Vec<&str> = collapsed
            .split('\n')
            .filter(|line| self.keeps_line(line))
            .collect();
        let dropped = collapsed.split('\n').count() - kept.len();
        if dropped > 0 {
            log::debug!("Noise filter dropped {} line(s)", dropped);
        }

        let mut joined = kept.join("\n");
        // "a--\n\nb" only exposes its second pair after the first is removed.
        while joined.contains("-\n") {
            joined = joined.replace("-\n", "");
        }

        // A join of "ab -" with " cd" leaves a double space behind.
        SPACE_RUN.replace_all(&joined, " ").into_owned()
    }

    /// Empty lines are kept so paragraph breaks survive.
    fn keeps_line(&self, line: &str) -> bool {
        let total = line.chars().count();
        if total == 0 {
            return true;
        }
        alpha_ratio(line, total) > self.min_alpha_ratio
    }
}

fn alpha_ratio(line: &str, total: usize) -> f64 {
    let alpha = line.chars().filter(|c| is_letter(*c)).count();
    alpha as f64 / total as f64
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || EXTENDED_LETTERS.contains(c)
}
