//! Record normalization.
//!
//! Converts raw ticket and feature-post records into the canonical
//! [`Signal`] shape. Every free-text field is redacted here, before the
//! signal is assembled, so no signal ever holds unredacted text. Total:
//! missing optional fields degrade to empty/zero, never fail.

use std::collections::BTreeSet;

use crate::redact::{redact, redact_with_customer_email, PiiCategory};
use crate::types::{FeaturePost, Provenance, Signal, TicketRecord};

/// Normalize a support ticket into a reactive signal.
///
/// Returns the signal plus the PII categories redacted from its fields.
#[must_use]
pub fn ticket_signal(ticket: &TicketRecord) -> (Signal, BTreeSet<PiiCategory>) {
    let customer_email = ticket.customer_email.as_deref();
    let mut categories = BTreeSet::new();

    let mut scrub = |field: Option<&str>| -> String {
        let redacted = redact_with_customer_email(field.unwrap_or_default(), customer_email);
        categories.extend(redacted.categories.iter().copied());
        redacted.text
    };

    let subject = scrub(ticket.subject.as_deref());
    let preview = scrub(ticket.preview.as_deref());
    let body = scrub(ticket.body.as_deref());

    let text = join_lowercased(&[&subject, &preview, &body]);

    let signal = Signal {
        id: format!("{}{}", Provenance::Reactive.id_prefix(), ticket.id),
        provenance: Provenance::Reactive,
        title: subject,
        text,
        created_at: ticket.created_at,
        tags: ticket.tags.clone(),
        thread_count: ticket.thread_count.unwrap_or(0),
        votes: 0,
        comment_count: 0,
        portal: None,
    };

    (signal, categories)
}

/// Normalize a feature-board post into a proactive signal.
///
/// Comment text contributes to the searchable blob; comment authorship
/// does not.
#[must_use]
pub fn post_signal(post: &FeaturePost) -> (Signal, BTreeSet<PiiCategory>) {
    let mut categories = BTreeSet::new();

    let mut scrub = |field: Option<&str>| -> String {
        let redacted = redact(field.unwrap_or_default());
        categories.extend(redacted.categories.iter().copied());
        redacted.text
    };

    let title = scrub(post.title.as_deref());
    let description = scrub(post.description.as_deref());
    let comment_texts: Vec<String> = post
        .comments
        .iter()
        .map(|comment| scrub(comment.text.as_deref()))
        .collect();

    let mut parts: Vec<&str> = vec![&title, &description];
    parts.extend(comment_texts.iter().map(String::as_str));
    let text = join_lowercased(&parts);

    let signal = Signal {
        id: format!("{}{}", Provenance::Proactive.id_prefix(), post.id),
        provenance: Provenance::Proactive,
        title,
        text,
        created_at: post.created_at,
        tags: Vec::new(),
        thread_count: 0,
        votes: post.votes.unwrap_or(0),
        comment_count: post.comments.len(),
        portal: post.portal.clone(),
    };

    (signal, categories)
}

/// Space-join the non-empty parts and lower-case the result. Each
/// configured field is included exactly once.
fn join_lowercased(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
