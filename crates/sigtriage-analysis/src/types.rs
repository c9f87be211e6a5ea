use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::redact::PiiCategory;

/// Which channel a signal came from.
///
/// Reactive signals are support tickets (a customer hit a problem);
/// proactive signals are feature-board posts (a customer asked for
/// something). The id prefixes keep the two id spaces from colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Reactive,
    Proactive,
}

impl Provenance {
    pub(crate) fn id_prefix(self) -> &'static str {
        match self {
            Provenance::Reactive => "reactive-",
            Provenance::Proactive => "proactive-",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Reactive => write!(f, "reactive"),
            Provenance::Proactive => write!(f, "proactive"),
        }
    }
}

/// A support ticket as supplied by the ticket-source client.
///
/// All free-text fields are optional; absent fields degrade to empty
/// strings during normalization rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thread_count: Option<u32>,
    /// Structured "from" address. Always redacted from every text field,
    /// independent of pattern detection.
    #[serde(default)]
    pub customer_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A feature-request post as supplied by the feature-board client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePost {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub votes: Option<u32>,
    #[serde(default)]
    pub comments: Vec<PostComment>,
    #[serde(default)]
    pub portal: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostComment {
    #[serde(default)]
    pub author_role: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One normalized, redacted unit of customer feedback.
///
/// `text` is the lower-cased concatenation of every redacted free-text
/// field of the originating record and is used only for matching.
/// Attribute fields not applicable to the signal's provenance stay at
/// zero/empty.
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub id: String,
    pub provenance: Provenance,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub thread_count: u32,
    pub votes: u32,
    pub comment_count: usize,
    pub portal: Option<String>,
}

/// Bounded reference to a contributing signal. Never carries the text
/// blob, to keep result payloads small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalRef {
    pub id: String,
    pub provenance: Provenance,
    pub title: String,
}

impl From<&Signal> for SignalRef {
    fn from(signal: &Signal) -> Self {
        Self {
            id: signal.id.clone(),
            provenance: signal.provenance,
            title: signal.title.clone(),
        }
    }
}

/// Scored result for one configured theme with at least one matching
/// signal.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeResult {
    pub theme_id: String,
    pub label: String,
    pub category: String,
    pub reactive_count: usize,
    pub proactive_count: usize,
    /// Both provenances present in the matched set.
    pub convergent: bool,
    pub frequency_score: f64,
    pub severity_score: f64,
    pub vote_momentum_score: f64,
    pub convergence_boost: f64,
    pub priority_score: f64,
    pub signals: Vec<SignalRef>,
}

/// A recurring phrase found in signals that matched no configured theme.
#[derive(Debug, Clone, Serialize)]
pub struct EmergingTheme {
    pub phrase: String,
    /// Number of signals this phrase claimed.
    pub frequency: usize,
    pub signals: Vec<SignalRef>,
}

/// Aggregate counts for one analysis invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalTotals {
    pub total: usize,
    pub reactive: usize,
    pub proactive: usize,
    /// Signals matched by zero configured themes.
    pub unmatched: usize,
}

/// Full output of one analysis invocation. Request-scoped: built fresh
/// per call and discarded after the response is produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub themes: Vec<ThemeResult>,
    pub emerging: Vec<EmergingTheme>,
    pub totals: SignalTotals,
    /// Union of PII categories redacted across the batch, for the
    /// caller's audit trail. Never contains matched substrings.
    pub pii_categories: BTreeSet<PiiCategory>,
}
