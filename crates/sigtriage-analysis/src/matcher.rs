//! Theme matching and multi-factor priority scoring.
//!
//! Each signal is matched against every configured theme by keyword; a
//! signal may land in any number of themes. Matched themes get a
//! four-factor score: normalized match frequency, reactive severity,
//! proactive vote momentum, and a 2x convergence boost when both
//! provenances corroborate the theme.

use chrono::{DateTime, Utc};
use sigtriage_core::ThemeDefinition;

use crate::types::{Provenance, Signal, SignalRef, ThemeResult};

/// Tag boosts for reactive severity. Only the single highest-value
/// matching tag contributes per signal.
const TAG_BOOSTS: &[(&str, f64)] = &[
    ("escalation", 30.0),
    ("urgent", 25.0),
    ("critical", 25.0),
    ("bug", 20.0),
];

const FREQUENCY_WEIGHT: f64 = 0.35;
const SEVERITY_WEIGHT: f64 = 0.35;
const VOTE_MOMENTUM_WEIGHT: f64 = 0.30;
const CONVERGENCE_MULTIPLIER: f64 = 2.0;
/// Recency decay half-life driver: e^(-age_days / 7).
const SEVERITY_DECAY_DAYS: f64 = 7.0;
const VOTE_WEIGHT: f64 = 0.8;
const COMMENT_WEIGHT: f64 = 0.2;

/// Output of one matching-and-scoring pass.
#[derive(Debug, Clone)]
pub struct ScoredThemes {
    /// Themes with at least one match, sorted by descending priority.
    /// Ties keep theme-definition order.
    pub themes: Vec<ThemeResult>,
    /// Indices into the input slice of signals matched by zero themes.
    pub unmatched: Vec<usize>,
}

/// Does `keyword` match the (lower-cased) signal text?
///
/// A keyword containing whitespace matches as a substring; a single
/// token matches whole words only, so "cal" does not hit "calendar".
/// Stateless: no scan position is carried between calls.
#[must_use]
pub fn keyword_matches(text: &str, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return false;
    }
    if keyword.contains(char::is_whitespace) {
        text.contains(&keyword)
    } else {
        contains_word(text, &keyword)
    }
}

/// Whole-word containment: an occurrence counts only when neither
/// neighbor is alphanumeric.
fn contains_word(text: &str, word: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = text[start..].find(word) {
        let begin = start + pos;
        let end = begin + word.len();
        let left_ok = text[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let right_ok = text[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());
        if left_ok && right_ok {
            return true;
        }
        start = begin + word.chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Match every signal against every theme and score the matched themes.
///
/// Deterministic given identical inputs: the only time dependence is the
/// injected `now` used by recency decay. Themes with zero matches are
/// dropped before normalization and never appear in the output.
#[must_use]
pub fn score_themes(
    signals: &[Signal],
    themes: &[ThemeDefinition],
    now: DateTime<Utc>,
) -> ScoredThemes {
    let mut matched_any = vec![false; signals.len()];

    // (theme, matched signal indices), theme-definition order, zero-match
    // themes dropped.
    let matched: Vec<(&ThemeDefinition, Vec<usize>)> = themes
        .iter()
        .map(|theme| {
            let indices: Vec<usize> = signals
                .iter()
                .enumerate()
                .filter(|(_, signal)| {
                    theme
                        .keywords
                        .iter()
                        .any(|keyword| keyword_matches(&signal.text, keyword))
                })
                .map(|(i, _)| i)
                .collect();
            for &i in &indices {
                matched_any[i] = true;
            }
            (theme, indices)
        })
        .filter(|(_, indices)| !indices.is_empty())
        .collect();

    let unmatched: Vec<usize> = matched_any
        .iter()
        .enumerate()
        .filter(|(_, hit)| !**hit)
        .map(|(i, _)| i)
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let max_frequency = matched
        .iter()
        .map(|(_, indices)| indices.len())
        .max()
        .unwrap_or(0) as f64;

    let max_momentum = matched
        .iter()
        .map(|(_, indices)| raw_momentum(signals, indices))
        .fold(0.0_f64, f64::max);

    let mut results: Vec<ThemeResult> = matched
        .iter()
        .map(|(theme, indices)| {
            let members: Vec<&Signal> = indices.iter().map(|&i| &signals[i]).collect();
            let reactive_count = members
                .iter()
                .filter(|s| s.provenance == Provenance::Reactive)
                .count();
            let proactive_count = members.len() - reactive_count;
            let convergent = reactive_count > 0 && proactive_count > 0;

            #[allow(clippy::cast_precision_loss)]
            let frequency_score = (indices.len() as f64 / max_frequency) * 100.0;

            let severity_score = severity(&members, now);

            let momentum = raw_momentum(signals, indices);
            let vote_momentum_score = if max_momentum > 0.0 {
                (momentum / max_momentum) * 100.0
            } else {
                0.0
            };

            let convergence_boost = if convergent {
                CONVERGENCE_MULTIPLIER
            } else {
                1.0
            };

            let priority_score = round2(
                (frequency_score * FREQUENCY_WEIGHT
                    + severity_score * SEVERITY_WEIGHT
                    + vote_momentum_score * VOTE_MOMENTUM_WEIGHT)
                    * convergence_boost,
            );

            ThemeResult {
                theme_id: theme.id.clone(),
                label: theme.label.clone(),
                category: theme.category.clone(),
                reactive_count,
                proactive_count,
                convergent,
                frequency_score: round2(frequency_score),
                severity_score: round2(severity_score),
                vote_momentum_score: round2(vote_momentum_score),
                convergence_boost,
                priority_score,
                signals: members.iter().copied().map(SignalRef::from).collect(),
            }
        })
        .collect();

    // Stable sort keeps theme-definition order for equal scores.
    results.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ScoredThemes {
        themes: results,
        unmatched,
    }
}

/// Mean per-signal severity over the reactive members, capped at 100.
/// Zero when the theme has no reactive members.
fn severity(members: &[&Signal], now: DateTime<Utc>) -> f64 {
    let mut count = 0_u32;
    let mut sum = 0.0_f64;
    for signal in members
        .iter()
        .filter(|s| s.provenance == Provenance::Reactive)
    {
        sum += signal_severity(signal, now);
        count += 1;
    }
    if count == 0 {
        return 0.0;
    }
    (sum / f64::from(count)).min(100.0)
}

fn signal_severity(signal: &Signal, now: DateTime<Utc>) -> f64 {
    let thread_pressure = (f64::from(signal.thread_count) * 10.0).min(50.0);

    #[allow(clippy::cast_precision_loss)]
    let age_days = ((now - signal.created_at).num_seconds() as f64 / 86_400.0).max(0.0);
    let recency = 30.0 * (-age_days / SEVERITY_DECAY_DAYS).exp();

    let tag_boost = TAG_BOOSTS
        .iter()
        .filter(|(tag, _)| signal.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
        .map(|(_, boost)| *boost)
        .fold(0.0_f64, f64::max);

    thread_pressure + recency + tag_boost
}

/// Raw vote momentum over the proactive members of a theme.
#[allow(clippy::cast_precision_loss)]
fn raw_momentum(signals: &[Signal], indices: &[usize]) -> f64 {
    indices
        .iter()
        .map(|&i| &signals[i])
        .filter(|s| s.provenance == Provenance::Proactive)
        .map(|s| f64::from(s.votes) * VOTE_WEIGHT + s.comment_count as f64 * COMMENT_WEIGHT)
        .sum()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
