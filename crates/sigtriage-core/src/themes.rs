use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detection::DetectionOverrides;
use crate::ConfigError;

/// One configured theme: a labelled bucket of keywords that signals are
/// matched against.
///
/// Single-token keywords match as whole words; keywords containing a space
/// match as substrings. Matching itself lives in the analysis crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub id: String,
    pub label: String,
    pub category: String,
    pub keywords: Vec<String>,
}

/// The on-disk themes document: the theme taxonomy plus an optional
/// `detection:` section overriding emerging-theme settings.
#[derive(Debug, Deserialize)]
pub struct ThemesFile {
    pub themes: Vec<ThemeDefinition>,
    #[serde(default)]
    pub detection: Option<DetectionOverrides>,
}

/// Load and validate the themes configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation. A malformed theme must fail here rather than silently never
/// matching downstream.
pub fn load_themes(path: &Path) -> Result<ThemesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ThemesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let themes_file: ThemesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ThemesFileParse)?;

    validate_themes(&themes_file)?;

    Ok(themes_file)
}

fn validate_themes(themes_file: &ThemesFile) -> Result<(), ConfigError> {
    if themes_file.themes.is_empty() {
        return Err(ConfigError::Validation(
            "themes file must define at least one theme".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();

    for theme in &themes_file.themes {
        if theme.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "theme id must be non-empty".to_string(),
            ));
        }

        if theme.label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "theme '{}' has an empty label",
                theme.id
            )));
        }

        if !seen_ids.insert(theme.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate theme id: '{}'",
                theme.id
            )));
        }

        if theme.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "theme '{}' has no keywords; it would never match",
                theme.id
            )));
        }

        for keyword in &theme.keywords {
            if keyword.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "theme '{}' has a blank keyword",
                    theme.id
                )));
            }
        }
    }

    if let Some(detection) = &themes_file.detection {
        if detection.min_frequency == Some(0) {
            return Err(ConfigError::Validation(
                "detection.min_frequency must be at least 1".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(id: &str, keywords: &[&str]) -> ThemeDefinition {
        ThemeDefinition {
            id: id.to_string(),
            label: format!("{id} label"),
            category: "product".to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_file() {
        let file = ThemesFile {
            themes: vec![theme("billing", &["invoice", "payment failed"])],
            detection: None,
        };
        assert!(validate_themes(&file).is_ok());
    }

    #[test]
    fn validate_rejects_empty_theme_list() {
        let file = ThemesFile {
            themes: vec![],
            detection: None,
        };
        let err = validate_themes(&file).unwrap_err();
        assert!(err.to_string().contains("at least one theme"));
    }

    #[test]
    fn validate_rejects_duplicate_ids_case_insensitively() {
        let file = ThemesFile {
            themes: vec![theme("billing", &["invoice"]), theme("Billing", &["pay"])],
            detection: None,
        };
        let err = validate_themes(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate theme id"));
    }

    #[test]
    fn validate_rejects_theme_without_keywords() {
        let file = ThemesFile {
            themes: vec![theme("billing", &[])],
            detection: None,
        };
        let err = validate_themes(&file).unwrap_err();
        assert!(err.to_string().contains("no keywords"));
    }

    #[test]
    fn validate_rejects_blank_keyword() {
        let file = ThemesFile {
            themes: vec![theme("billing", &["invoice", "  "])],
            detection: None,
        };
        let err = validate_themes(&file).unwrap_err();
        assert!(err.to_string().contains("blank keyword"));
    }

    #[test]
    fn validate_rejects_zero_min_frequency() {
        let file = ThemesFile {
            themes: vec![theme("billing", &["invoice"])],
            detection: Some(DetectionOverrides {
                extra_stop_words: vec![],
                min_frequency: Some(0),
            }),
        };
        let err = validate_themes(&file).unwrap_err();
        assert!(err.to_string().contains("min_frequency"));
    }

    #[test]
    fn yaml_shape_errors_surface_as_parse_errors() {
        // keywords must be a list of strings, not a scalar
        let raw = "themes:\n  - id: billing\n    label: Billing\n    category: product\n    keywords: 42\n";
        let parsed: Result<ThemesFile, _> = serde_yaml::from_str(raw);
        assert!(parsed.is_err(), "scalar keywords should not parse");
    }

    #[test]
    fn yaml_round_trip_preserves_keyword_order() {
        let raw = concat!(
            "themes:\n",
            "  - id: calendar\n",
            "    label: Calendar\n",
            "    category: scheduling\n",
            "    keywords: [calendar, \"booking calendar\", sync]\n",
        );
        let parsed: ThemesFile = serde_yaml::from_str(raw).unwrap();
        assert_eq!(
            parsed.themes[0].keywords,
            vec!["calendar", "booking calendar", "sync"]
        );
    }
}
