//! Pattern-based PII redaction.
//!
//! Four detectors run in fixed order: SSN, credit card, email, phone.
//! Matched spans are replaced with category placeholders rather than
//! removed, so sentence structure survives for keyword matching. The
//! pass is idempotent: no placeholder matches any detector, so redacting
//! already-redacted text is a no-op.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

const SSN_PLACEHOLDER: &str = "[SSN REDACTED]";
const CARD_PLACEHOLDER: &str = "[CARD REDACTED]";
const EMAIL_PLACEHOLDER: &str = "[EMAIL REDACTED]";
const PHONE_PLACEHOLDER: &str = "[PHONE REDACTED]";

static SSN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}[- ]\d{2}[- ]\d{4}\b").expect("valid regex"));

// Candidate spans only; the Luhn gate decides whether they are redacted.
static CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{13,19}|\d{4}[- ]\d{4}[- ]\d{4}[- ]\d{1,7})\b").expect("valid regex")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]\d{4}\b").expect("valid regex")
});

/// One of the four regulated PII pattern classes.
///
/// Ordered so audit sets render deterministically. `Display` gives the
/// audit name surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    Ssn,
    CreditCard,
    Email,
    Phone,
}

impl std::fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PiiCategory::Ssn => write!(f, "ssn"),
            PiiCategory::CreditCard => write!(f, "credit_card"),
            PiiCategory::Email => write!(f, "email"),
            PiiCategory::Phone => write!(f, "phone"),
        }
    }
}

/// Redaction output: the cleaned text and the categories that fired.
/// The matched substrings themselves are never returned or logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redacted {
    pub text: String,
    pub categories: BTreeSet<PiiCategory>,
}

/// Run the four pattern detectors over `text` in fixed order.
#[must_use]
pub fn redact(text: &str) -> Redacted {
    let mut categories = BTreeSet::new();

    let text = SSN_RE.replace_all(text, |_: &Captures<'_>| {
        categories.insert(PiiCategory::Ssn);
        SSN_PLACEHOLDER.to_string()
    });

    let text = CARD_RE.replace_all(&text, |caps: &Captures<'_>| {
        let span = &caps[0];
        let digits: String = span.chars().filter(char::is_ascii_digit).collect();
        if (13..=19).contains(&digits.len()) && luhn_valid(&digits) {
            categories.insert(PiiCategory::CreditCard);
            CARD_PLACEHOLDER.to_string()
        } else {
            // Not a valid card number; leave the span for later detectors.
            span.to_string()
        }
    });

    let text = EMAIL_RE.replace_all(&text, |_: &Captures<'_>| {
        categories.insert(PiiCategory::Email);
        EMAIL_PLACEHOLDER.to_string()
    });

    let text = PHONE_RE.replace_all(&text, |_: &Captures<'_>| {
        categories.insert(PiiCategory::Phone);
        PHONE_PLACEHOLDER.to_string()
    });

    Redacted {
        text: text.into_owned(),
        categories,
    }
}

/// Redact `text`, first replacing every literal occurrence of the
/// out-of-band customer identity address.
///
/// The literal replacement is unconditional: it happens even when the
/// email pattern would not fire on that exact string, which makes it a
/// stronger guarantee than pattern detection.
#[must_use]
pub fn redact_with_customer_email(text: &str, customer_email: Option<&str>) -> Redacted {
    match customer_email {
        Some(email) if !email.trim().is_empty() && text.contains(email) => {
            let replaced = text.replace(email, EMAIL_PLACEHOLDER);
            let mut redacted = redact(&replaced);
            redacted.categories.insert(PiiCategory::Email);
            redacted
        }
        _ => redact(text),
    }
}

fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut double = false;
    for c in digits.chars().rev() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        let d = if double {
            let doubled = d * 2;
            if doubled > 9 {
                doubled - 9
            } else {
                doubled
            }
        } else {
            d
        };
        sum += d;
        double = !double;
    }
    sum % 10 == 0
}
