//! Emerging-theme detection settings.

use std::collections::HashSet;

use serde::Deserialize;

/// Default minimum number of distinct signals an n-gram must appear in
/// before it can seed an emerging theme.
pub const DEFAULT_MIN_FREQUENCY: usize = 3;

/// Built-in English stop words. Tokens of length two or less are dropped by
/// the tokenizer itself, so nothing shorter appears here.
const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "has", "had", "was", "our",
    "out", "get", "how", "new", "now", "see", "way", "who", "its", "did", "that", "this", "with",
    "from", "they", "will", "have", "been", "were", "each", "which", "their", "would", "there",
    "what", "when", "than", "then", "them", "these", "those", "some", "into", "only", "also",
    "very", "just", "like", "your", "about", "could", "should", "after", "before", "because",
    "where", "does", "doing", "being", "other", "more", "most", "such", "over", "still", "while",
    "please", "thanks", "hello", "redacted",
];

/// Resolved settings for the emerging-theme detector.
#[derive(Debug, Clone)]
pub struct DetectionSettings {
    /// Lower-cased stop words excluded from n-gram extraction.
    pub stop_words: HashSet<String>,
    /// Minimum distinct-signal count for an n-gram to be reported.
    pub min_frequency: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
            min_frequency: DEFAULT_MIN_FREQUENCY,
        }
    }
}

/// Optional `detection:` section of the themes file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionOverrides {
    /// Extra stop words merged into the built-in list (lower-cased).
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
    /// Overrides [`DEFAULT_MIN_FREQUENCY`] when present.
    pub min_frequency: Option<usize>,
}

impl DetectionSettings {
    /// Build settings from the defaults plus file-level overrides.
    ///
    /// `min_frequency == 0` is rejected at the load boundary by theme-file
    /// validation, so this resolution step does not re-check it.
    #[must_use]
    pub fn with_overrides(overrides: &DetectionOverrides) -> Self {
        let mut settings = Self::default();
        for word in &overrides.extra_stop_words {
            settings.stop_words.insert(word.to_lowercase());
        }
        if let Some(min_frequency) = overrides.min_frequency {
            settings.min_frequency = min_frequency;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_carry_builtin_stop_words() {
        let settings = DetectionSettings::default();
        assert!(settings.stop_words.contains("the"));
        assert_eq!(settings.min_frequency, DEFAULT_MIN_FREQUENCY);
    }

    #[test]
    fn overrides_merge_extra_stop_words_lowercased() {
        let overrides = DetectionOverrides {
            extra_stop_words: vec!["Widget".to_string()],
            min_frequency: None,
        };
        let settings = DetectionSettings::with_overrides(&overrides);
        assert!(settings.stop_words.contains("widget"));
        assert!(settings.stop_words.contains("the"), "built-ins are kept");
    }

    #[test]
    fn overrides_replace_min_frequency() {
        let overrides = DetectionOverrides {
            extra_stop_words: vec![],
            min_frequency: Some(5),
        };
        let settings = DetectionSettings::with_overrides(&overrides);
        assert_eq!(settings.min_frequency, 5);
    }
}
