//! Ordered rule evaluation over a canonical record.
//!
//! Evaluation is additive, never short-circuiting: each rule group may
//! append a pathway label and rationale sentences, and the summary keeps
//! first-append order with stable de-duplication. The evaluation order is
//! the precedence contract — resectability and fitness flags are settled
//! first and gate every pathway group that follows.

pub mod systemic;

use crate::normalize::CanonicalRecord;
use crate::report::{PlanLog, RecommendationResult};
use crate::staging::{TnmN, TnmT};

/// Flags settled before any pathway is chosen. Never reset once set.
struct OperabilityFlags {
    unresectable: bool,
    high_risk_surgery: bool,
}

/// Runs the full rule evaluation for one canonical record.
///
/// Pure and deterministic: the result is fully determined by the record,
/// with no hidden state and no side effects.
pub fn evaluate(record: &CanonicalRecord) -> RecommendationResult {
    let mut log = PlanLog::new();

    if record.m_overridden {
        log.note(format!(
            "Imaging demonstrates distant metastatic disease ({}), so the disease is \
             functionally metastatic even if TNM lists M0.",
            record.met_sites_report.join(", ")
        ));
    }

    let flags = assess_operability(record, &mut log);
    select_pathways(record, &flags, &mut log);

    log.finish()
}

/// Resectability and surgical-fitness rules, in fixed order.
fn assess_operability(record: &CanonicalRecord, log: &mut PlanLog) -> OperabilityFlags {
    let mut unresectable = false;
    let mut high_risk_surgery = false;

    // 1. T4b by the TNM string itself.
    if record.t == TnmT::T4b {
        unresectable = true;
        log.note(
            "Tumour is staged as T4b by TNM, generally unresectable and treated with \
             definitive chemoradiation or systemic therapy.",
        );
    }

    // 2. T4b-equivalent invasion on imaging, even when the TNM string is
    //    absent or inconsistent. The sentence is skipped when rule 1
    //    already explained unresectability.
    if record.has_t4b_equivalent_invasion() {
        if !unresectable {
            log.note(
                "Imaging shows invasion of critical adjacent structures (e.g., airway, aorta, \
                 vertebral body, pericardium, pleura), which is consistent with T4b and renders \
                 the tumour unresectable; definitive chemoradiation or systemic therapy is \
                 preferred.",
            );
        }
        unresectable = true;
    }

    // 3. Cervical primaries: definitive chemoradiation preferred over
    //    surgery regardless of anatomic resectability.
    if record.tumour_location.is_cervical() && !unresectable && !record.is_metastatic {
        log.note(
            "Primary tumour is in the cervical esophagus, where NCCN recommends definitive \
             chemoradiation rather than esophagectomy.",
        );
        unresectable = true;
    }

    // 4. Metastatic disease rules out curative esophagectomy.
    if record.is_metastatic {
        unresectable = true;
        log.note(format!(
            "Because the disease is metastatic ({}), curative esophagectomy is not \
             appropriate; management is systemic/palliative.",
            record.m_label
        ));
    }

    // 5. Major comorbidities.
    if record
        .comorbidities
        .iter()
        .any(|c| c.raises_operative_risk())
    {
        high_risk_surgery = true;
        log.note(
            "Significant comorbidities (e.g., severe cardiopulmonary disease, frailty, CKD, \
             or liver disease) increase operative risk and may limit tolerance of \
             esophagectomy.",
        );
    }

    // 6. Explicit not-a-surgical-candidate assessment.
    if !record.surgical_candidate {
        high_risk_surgery = true;
        log.note(
            "The patient has been assessed as not a surgical candidate; definitive \
             chemoradiation or systemic therapy is preferred over esophagectomy.",
        );
    }

    OperabilityFlags {
        unresectable,
        high_risk_surgery,
    }
}

/// Pathway rule groups, evaluated in fixed order without short-circuiting.
fn select_pathways(record: &CanonicalRecord, flags: &OperabilityFlags, log: &mut PlanLog) {
    let operable = !flags.unresectable && !flags.high_risk_surgery;

    // Early mucosal disease: Tis / T1a.
    if operable && matches!(record.t, TnmT::Tis | TnmT::T1a) {
        log.note(format!(
            "Stage {} disease is confined to the mucosa. Endoscopic therapy (EMR/ESD) is \
             preferred for high-grade dysplasia and T1a lesions when the lesion is small and \
             without high-risk features.",
            record.t
        ));
        log.pathway("Endoscopic resection (EMR/ESD)");
        log.note(
            "If the lesion is extensive or not amenable to endoscopic removal, esophagectomy \
             is recommended.",
        );
    }

    // T1b/T2 node-negative: primary surgery vs neoadjuvant therapy.
    if operable
        && matches!(record.t, TnmT::T1b | TnmT::T2)
        && matches!(record.n, TnmN::Unknown | TnmN::N0)
    {
        let mut low_risk = true;
        if record.tumour_size_cm.is_some_and(|size| size >= 3.0) {
            low_risk = false;
        }
        if record
            .grade
            .as_deref()
            .is_some_and(|g| g.starts_with("poor"))
        {
            low_risk = false;
        }
        if record.lymphovascular_invasion {
            low_risk = false;
        }

        if low_risk {
            log.note(format!(
                "For a small (<3 cm), well-differentiated {} tumour without lymphovascular \
                 invasion (pT1b–pT2,N0), esophagectomy alone is an NCCN-accepted option.",
                record.histology.as_text()
            ));
            log.pathway("Primary esophagectomy");
        } else {
            log.note(
                "Because the tumour has high-risk features (size ≥3 cm, poor differentiation \
                 and/or lymphovascular invasion), neoadjuvant chemoradiation followed by \
                 esophagectomy is preferred.",
            );
            log.pathway("Neoadjuvant chemoradiation → esophagectomy");
        }
    }

    // Locally advanced resectable disease: T3/T4a or node-positive.
    if operable && (matches!(record.t, TnmT::T3 | TnmT::T4a) || record.n.is_node_positive()) {
        log.note(format!(
            "Locally advanced stage {} is typically managed with neoadjuvant therapy followed \
             by esophagectomy. Approaches include chemoradiation (CROSS-type) or \
             peri-operative chemotherapy (e.g., FLOT) depending on histology and location.",
            record.stage_text
        ));
        if record.tumour_location.is_gej() && record.histology.is_adenocarcinoma() {
            log.pathway("Peri-operative chemotherapy (FLOT) → esophagectomy");
        } else {
            log.pathway("Neoadjuvant chemoradiation → esophagectomy");
        }
    }

    // Adjuvant guidance after any surgical pathway; informational only.
    if operable && log.has_pathway_containing("esophagectomy") {
        log.note(
            "After surgery, pathologic staging determines the need for adjuvant therapy. \
             Residual disease (ypT+ and/or ypN+) after neoadjuvant chemoradiation and R0 \
             resection should receive adjuvant nivolumab for one year (CheckMate 577).",
        );
        log.note(
            "If margins are positive (R1/R2), options include additional chemoradiation if \
             not previously delivered or palliative systemic therapy, depending on prior \
             treatment.",
        );
    }

    // Unresectable or medically inoperable, non-metastatic: definitive
    // chemoradiation, sub-branched by cause (exclusive chain).
    if (flags.unresectable || flags.high_risk_surgery) && !record.is_metastatic {
        if record.tumour_location.is_cervical() {
            log.pathway("Definitive chemoradiation (cervical esophagus)");
            log.note(
                "For cervical esophageal tumours, definitive chemoradiation is preferred over \
                 esophagectomy.",
            );
        } else if record.has_t4b_equivalent_invasion() {
            log.pathway("Definitive chemoradiation (T4b/unresectable)");
            log.note(
                "Because the tumour is T4b/unresectable by local invasion, definitive \
                 chemoradiation is recommended.",
            );
        } else if flags.high_risk_surgery && !flags.unresectable {
            log.pathway("Definitive chemoradiation (medically inoperable)");
            log.note(
                "Although anatomically resectable, the patient is not a suitable surgical \
                 candidate; definitive chemoradiation is recommended.",
            );
        }
    }

    // Metastatic disease: systemic therapy, regimen chosen by biomarkers.
    if record.is_metastatic {
        let options = systemic::systemic_therapy_options(&record.biomarkers, &record.histology);
        log.note(format!(
            "For metastatic disease, first-line systemic therapy is chosen based on histology \
             and biomarkers. Options include: {}. Subsequent lines may incorporate agents such \
             as ramucirumab + paclitaxel, irinotecan, or additional immunotherapy depending on \
             prior exposure and tolerance.",
            options.join("; ")
        ));
        log.pathway("Systemic therapy");
    }
}
