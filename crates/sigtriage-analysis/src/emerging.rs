//! Emerging-theme discovery over unmatched signals.
//!
//! Surfaces recurring bigrams and trigrams in signals that matched no
//! configured theme, so an operator can spot gaps in the taxonomy.
//! Claiming is greedy and non-overlapping: claimed signal sets partition
//! a subset of the unmatched signals, with higher-frequency phrases
//! taking priority.

use std::collections::{BTreeSet, HashMap, HashSet};

use sigtriage_core::DetectionSettings;

use crate::types::{EmergingTheme, Signal, SignalRef};

/// Detect emerging themes among the given unmatched signals.
#[must_use]
pub fn detect_emerging(unmatched: &[&Signal], settings: &DetectionSettings) -> Vec<EmergingTheme> {
    // n-gram -> indices of signals containing it, each counted once.
    let mut phrase_signals: HashMap<String, BTreeSet<usize>> = HashMap::new();

    for (idx, signal) in unmatched.iter().enumerate() {
        let tokens = tokenize(&signal.text, &settings.stop_words);
        let mut seen_in_signal: HashSet<String> = HashSet::new();
        for n in [2_usize, 3] {
            if tokens.len() < n {
                continue;
            }
            for window in tokens.windows(n) {
                let phrase = window.join(" ");
                if seen_in_signal.insert(phrase.clone()) {
                    phrase_signals.entry(phrase).or_default().insert(idx);
                }
            }
        }
    }

    let mut candidates: Vec<(String, BTreeSet<usize>)> = phrase_signals
        .into_iter()
        .filter(|(_, indices)| indices.len() >= settings.min_frequency)
        .collect();

    // Descending initial frequency; phrase order breaks ties so output
    // never depends on hash-map iteration order.
    candidates.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut themes = Vec::new();

    for (phrase, indices) in candidates {
        let free: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|idx| !claimed.contains(idx))
            .collect();
        if free.len() < settings.min_frequency {
            continue;
        }
        claimed.extend(free.iter().copied());
        themes.push(EmergingTheme {
            phrase,
            frequency: free.len(),
            signals: free.iter().map(|&idx| SignalRef::from(unmatched[idx])).collect(),
        });
    }

    themes
}

/// Split text into candidate tokens: lower-cased, non-alphanumeric runs
/// treated as separators, short tokens and stop words dropped.
fn tokenize(text: &str, stop_words: &HashSet<String>) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| token.chars().count() > 2 && !stop_words.contains(*token))
        .map(ToString::to_string)
        .collect()
}
