//! Recommendation output and the rationale log threaded through rule
//! evaluation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Literal summary returned when no decision rule produced a pathway.
pub const FALLBACK_SUMMARY: &str = "No specific recommendation generated; please review clinical \
details and consult full NCCN guidelines and MDT discussion.";

/// Rationale emitted alongside the fallback summary so that `details` is
/// never empty.
const FALLBACK_DETAIL: &str = "No staging, imaging, fitness, or biomarker finding in the \
supplied record triggered a decision rule.";

/// The engine's output: an ordered, de-duplicated pathway summary and the
/// accumulated rationale narrative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationResult {
    /// Pathway labels joined with `"; "` in first-append order, or the
    /// literal fallback when no rule matched.
    #[schema(example = "Neoadjuvant chemoradiation → esophagectomy")]
    pub summary: String,
    /// Rationale sentences joined with newlines, in evaluation order.
    pub details: String,
}

/// Ordered log of pathway labels and rationale sentences.
///
/// Rule groups are additive: several groups may each contribute a pathway
/// label, so the log de-duplicates labels by first occurrence while
/// preserving append order. Both orderings are part of the observable
/// contract.
#[derive(Debug, Default)]
pub(crate) struct PlanLog {
    pathways: Vec<String>,
    details: Vec<String>,
}

impl PlanLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends one rationale sentence.
    pub(crate) fn note(&mut self, sentence: impl Into<String>) {
        self.details.push(sentence.into());
    }

    /// Appends a pathway label, keeping only the first occurrence.
    pub(crate) fn pathway(&mut self, label: &str) {
        if !self.pathways.iter().any(|p| p == label) {
            self.pathways.push(label.to_string());
        }
    }

    /// True when any appended label contains `token` (case-insensitive).
    pub(crate) fn has_pathway_containing(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.pathways.iter().any(|p| p.to_lowercase().contains(&token))
    }

    pub(crate) fn finish(self) -> RecommendationResult {
        let summary = if self.pathways.is_empty() {
            FALLBACK_SUMMARY.to_string()
        } else {
            self.pathways.join("; ")
        };
        let details = if self.details.is_empty() {
            FALLBACK_DETAIL.to_string()
        } else {
            self.details.join("\n")
        };
        RecommendationResult { summary, details }
    }
}
