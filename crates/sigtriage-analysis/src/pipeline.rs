//! Analysis pipeline orchestration.
//!
//! One synchronous, pure-computation pass: normalize (redacting) the raw
//! record batches into signals, match and score them against the theme
//! taxonomy, then mine the leftovers for emerging themes. No I/O, no
//! shared state across invocations; concurrent calls need no
//! coordination.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sigtriage_core::{DetectionSettings, ThemeDefinition};

use crate::emerging::detect_emerging;
use crate::matcher::{score_themes, ScoredThemes};
use crate::normalize::{post_signal, ticket_signal};
use crate::types::{AnalysisReport, FeaturePost, Signal, SignalTotals, TicketRecord};

/// Run the full analysis over one batch of raw records.
///
/// `now` drives recency decay and is injected for determinism: identical
/// inputs and `now` produce identical reports.
#[must_use]
pub fn analyze(
    tickets: &[TicketRecord],
    posts: &[FeaturePost],
    themes: &[ThemeDefinition],
    settings: &DetectionSettings,
    now: DateTime<Utc>,
) -> AnalysisReport {
    let mut signals: Vec<Signal> = Vec::with_capacity(tickets.len() + posts.len());
    let mut pii_categories = BTreeSet::new();

    for ticket in tickets {
        let (signal, categories) = ticket_signal(ticket);
        pii_categories.extend(categories);
        signals.push(signal);
    }
    for post in posts {
        let (signal, categories) = post_signal(post);
        pii_categories.extend(categories);
        signals.push(signal);
    }

    tracing::debug!(
        reactive = tickets.len(),
        proactive = posts.len(),
        pii_categories = pii_categories.len(),
        "normalized signal batch"
    );

    let ScoredThemes {
        themes: theme_results,
        unmatched,
    } = score_themes(&signals, themes, now);

    let unmatched_signals: Vec<&Signal> = unmatched.iter().map(|&i| &signals[i]).collect();
    let emerging = detect_emerging(&unmatched_signals, settings);

    tracing::info!(
        signals = signals.len(),
        matched_themes = theme_results.len(),
        unmatched = unmatched.len(),
        emerging = emerging.len(),
        "analysis complete"
    );

    AnalysisReport {
        themes: theme_results,
        emerging,
        totals: SignalTotals {
            total: signals.len(),
            reactive: tickets.len(),
            proactive: posts.len(),
            unmatched: unmatched.len(),
        },
        pii_categories,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use sigtriage_core::DetectionSettings;

    use super::*;
    use crate::redact::PiiCategory;
    use crate::types::{PostComment, Provenance};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn theme(id: &str, keywords: &[&str]) -> ThemeDefinition {
        ThemeDefinition {
            id: id.to_string(),
            label: format!("{id} label"),
            category: "product".to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    fn ticket(id: &str, subject: &str, body: &str, tags: &[&str]) -> TicketRecord {
        TicketRecord {
            id: id.to_string(),
            subject: Some(subject.to_string()),
            preview: None,
            body: Some(body.to_string()),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            thread_count: Some(2),
            customer_email: Some(format!("user-{id}@example.com")),
            created_at: now(),
        }
    }

    fn post(id: &str, title: &str, description: &str, votes: u32) -> FeaturePost {
        FeaturePost {
            id: id.to_string(),
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            votes: Some(votes),
            comments: vec![PostComment {
                author_role: Some("customer".to_string()),
                text: Some("agreed".to_string()),
                created_at: None,
            }],
            portal: Some("main".to_string()),
            created_at: now() - Duration::days(5),
            updated_at: None,
        }
    }

    #[test]
    fn booking_calendar_scenario_yields_one_convergent_theme() {
        let tickets = vec![
            ticket("1", "Booking calendar down", "the booking calendar fails", &["escalation"]),
            ticket("2", "Calendar issue", "booking calendar shows nothing", &["escalation"]),
            ticket("3", "Broken calendar", "our booking calendar is empty", &["escalation"]),
        ];
        let posts = vec![
            post("10", "Calendar sync", "please support calendar sync", 40),
            post("11", "Two-way calendar sync", "calendar sync with external tools", 10),
        ];
        let themes = vec![theme("calendar", &["calendar"])];
        let settings = DetectionSettings::default();

        let report = analyze(&tickets, &posts, &themes, &settings, now());

        assert_eq!(report.themes.len(), 1);
        let result = &report.themes[0];
        assert_eq!(result.reactive_count, 3);
        assert_eq!(result.proactive_count, 2);
        assert!(result.convergent);
        assert_eq!(report.totals.total, 5);
        assert_eq!(report.totals.reactive, 3);
        assert_eq!(report.totals.proactive, 2);
        assert_eq!(report.totals.unmatched, 0);

        // Convergence must strictly beat the same data with a single
        // provenance (boost forced off by construction).
        let reactive_only: Vec<TicketRecord> = tickets.clone();
        let lone_report = analyze(&reactive_only, &[], &themes, &settings, now());
        assert!(!lone_report.themes[0].convergent);
        assert!(
            result.priority_score > lone_report.themes[0].priority_score,
            "convergent {} should beat non-convergent {}",
            result.priority_score,
            lone_report.themes[0].priority_score
        );
    }

    #[test]
    fn unmatched_dark_mode_signals_become_one_emerging_theme() {
        let tickets = vec![
            ticket("1", "Request", "footer dark mode toggle", &[]),
            ticket("2", "Request", "dark mode option needed", &[]),
            ticket("3", "Request", "night dark mode theme", &[]),
            ticket("4", "Request", "dashboard dark mode", &[]),
            ticket("5", "Request", "dark mode everywhere", &[]),
        ];
        let themes = vec![theme("calendar", &["calendar"])];
        let settings = DetectionSettings::default();

        let report = analyze(&tickets, &[], &themes, &settings, now());

        assert!(report.themes.is_empty());
        assert_eq!(report.totals.unmatched, 5);
        assert_eq!(report.emerging.len(), 1);
        assert_eq!(report.emerging[0].phrase, "dark mode");
        assert_eq!(report.emerging[0].frequency, 5);
    }

    #[test]
    fn report_aggregates_pii_categories_without_substrings() {
        let tickets = vec![ticket(
            "1",
            "Card on file",
            "my card 4111111111111111, ssn 123-45-6789, reply to user-1@example.com",
            &[],
        )];
        let report = analyze(&tickets, &[], &[], &DetectionSettings::default(), now());

        assert!(report.pii_categories.contains(&PiiCategory::CreditCard));
        assert!(report.pii_categories.contains(&PiiCategory::Ssn));
        // Customer email is always scrubbed, so the email category fires too.
        assert!(report.pii_categories.contains(&PiiCategory::Email));

        let rendered = serde_json::to_string(&report).unwrap();
        assert!(!rendered.contains("4111111111111111"));
        assert!(!rendered.contains("123-45-6789"));
        assert!(!rendered.contains("@example.com"));
    }

    #[test]
    fn theme_results_reference_signals_without_text_blobs() {
        let tickets = vec![ticket("1", "Calendar bug", "calendar is broken today", &[])];
        let themes = vec![theme("calendar", &["calendar"])];
        let report = analyze(&tickets, &[], &themes, &DetectionSettings::default(), now());

        let reference = &report.themes[0].signals[0];
        assert_eq!(reference.id, "reactive-1");
        assert_eq!(reference.provenance, Provenance::Reactive);
        assert_eq!(reference.title, "Calendar bug");
    }

    #[test]
    fn empty_batches_produce_an_empty_report() {
        let report = analyze(&[], &[], &[], &DetectionSettings::default(), now());
        assert!(report.themes.is_empty());
        assert!(report.emerging.is_empty());
        assert_eq!(report.totals.total, 0);
        assert!(report.pii_categories.is_empty());
    }
}
