//! # Esoplan Core
//!
//! Core recommendation engine for esophageal and gastroesophageal-junction
//! (EGJ) cancer treatment planning, following NCCN-style guideline logic.
//!
//! This crate contains the pure decision logic:
//! - Input normalization (TNM parsing, coded-vocabulary validation,
//!   imaging-to-stage reconciliation)
//! - Ordered rule evaluation (resectability, surgical fitness, pathway
//!   selection)
//! - Biomarker-driven systemic-therapy selection for metastatic disease
//!
//! **No presentation concerns**: HTTP endpoints, CLI rendering, and the
//! static trial-reference table belong in `api-rest` and `esoplan-cli`.
//! The engine is a pure function of its input: no I/O, no shared state,
//! no randomness. Identical records always yield identical results.

pub mod engine;
pub mod normalize;
pub mod patient;
pub mod report;
pub mod staging;
pub mod vocab;

pub use engine::evaluate;
pub use normalize::{normalize, Biomarkers, CanonicalRecord};
pub use patient::{BiomarkerValue, NumericField, PatientRecord};
pub use report::{RecommendationResult, FALLBACK_SUMMARY};
pub use staging::{parse_stage, TnmM, TnmN, TnmT};

/// Errors produced while evaluating a patient record.
///
/// Only genuinely unparseable numeric text is an error; every other
/// irregularity (missing fields, unknown codes, contradictory staging vs.
/// imaging) degrades to a documented default so that partially completed
/// intake forms still produce a usable recommendation.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;

/// Produces a treatment-pathway recommendation for a patient record.
///
/// This is the single entry point of the engine: it normalizes the raw
/// record into a canonical form and then runs the ordered rule evaluation.
///
/// # Arguments
///
/// * `patient` - The raw patient record as assembled by a presentation layer.
///
/// # Returns
///
/// A [`RecommendationResult`] holding the summary pathway label(s) and the
/// accumulated rationale narrative. An empty or all-default record yields
/// the literal fallback summary rather than an error.
///
/// # Errors
///
/// Returns [`PlanError::InvalidInput`] only when a numeric field (age,
/// tumour size, PD-L1 CPS) was supplied as non-numeric text.
pub fn recommend(patient: &PatientRecord) -> PlanResult<RecommendationResult> {
    let canonical = normalize::normalize(patient)?;
    Ok(engine::evaluate(&canonical))
}
