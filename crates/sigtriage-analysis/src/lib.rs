//! Analytical core for sigtriage.
//!
//! Ingests heterogeneous customer-signal records (support tickets and
//! feature-board posts), redacts PII, normalizes both shapes into one
//! canonical signal, scores them against a configured theme taxonomy
//! with a convergence boost, and mines unmatched signals for emerging
//! themes. Pure computation throughout: no I/O, no shared state, and a
//! caller-injected clock.

pub mod emerging;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod redact;
pub mod types;

pub use emerging::detect_emerging;
pub use matcher::{keyword_matches, score_themes, ScoredThemes};
pub use normalize::{post_signal, ticket_signal};
pub use pipeline::analyze;
pub use redact::{redact, redact_with_customer_email, PiiCategory, Redacted};
pub use types::{
    AnalysisReport, EmergingTheme, FeaturePost, PostComment, Provenance, Signal, SignalRef,
    SignalTotals, ThemeResult, TicketRecord,
};
