//! Input normalization: raw patient record to canonical record.
//!
//! This is a pure transformation. The only failure mode is a numeric field
//! (age, tumour size, PD-L1 CPS) supplied as non-numeric text; everything
//! else — missing fields, unknown codes, a stage string contradicting
//! imaging — degrades to a documented default, because clinical intake
//! forms frequently carry partial data.

use crate::patient::{BiomarkerValue, NumericField, PatientRecord};
use crate::staging::{parse_stage, TnmM, TnmN, TnmT};
use crate::vocab::{
    Comorbidity, DistantMetSite, Histology, InvasionFeature, NodalRegion, TumourLocation,
};
use crate::{PlanError, PlanResult};

/// Canonical biomarker panel. `None` means the marker was not tested,
/// which the rules treat differently from an explicit negative.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Biomarkers {
    pub her2: Option<bool>,
    pub msi: Option<bool>,
    pub cldn18_2: Option<bool>,
    pub pd_l1_cps: Option<f64>,
}

impl Biomarkers {
    pub fn her2_positive(&self) -> bool {
        self.her2 == Some(true)
    }

    pub fn msi_positive(&self) -> bool {
        self.msi == Some(true)
    }

    pub fn cldn18_2_positive(&self) -> bool {
        self.cldn18_2 == Some(true)
    }
}

/// The canonical, rule-ready view of one patient record.
///
/// Exists only for the duration of a single evaluation call.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalRecord {
    pub age: u32,
    /// Raw stage text, retained verbatim for rationale display.
    pub stage_text: String,
    pub t: TnmT,
    pub n: TnmN,
    pub m: TnmM,
    /// Display label for the M category, e.g. `"M1B"` from the stage
    /// string or `"M1"` after an imaging override.
    pub m_label: String,
    pub histology: Histology,
    pub tumour_size_cm: Option<f64>,
    /// Lower-cased grade text; only the "poor" prefix is rule-relevant.
    pub grade: Option<String>,
    pub lymphovascular_invasion: bool,
    pub biomarkers: Biomarkers,
    pub comorbidities: Vec<Comorbidity>,
    pub comorbidities_other: String,
    pub tumour_location: TumourLocation,
    pub invasion_features: Vec<InvasionFeature>,
    pub nodal_regions: Vec<NodalRegion>,
    pub distant_met_sites: Vec<DistantMetSite>,
    pub imaging_findings: String,
    pub surgical_candidate: bool,
    /// Resolved metastatic status after imaging reconciliation.
    pub is_metastatic: bool,
    /// True when imaging forced a parsed M0/unknown up to M1.
    pub m_overridden: bool,
    /// Ordered site names backing the override rationale sentence.
    pub met_sites_report: Vec<String>,
}

impl CanonicalRecord {
    /// Any invasion feature that is T4b-equivalent by NCCN definition.
    pub fn has_t4b_equivalent_invasion(&self) -> bool {
        self.invasion_features
            .iter()
            .any(|f| f.is_t4b_equivalent())
    }
}

fn parse_age(field: &Option<NumericField>) -> PlanResult<u32> {
    match field {
        None => Ok(0),
        Some(NumericField::Number(n)) => {
            if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 {
                Ok(*n as u32)
            } else {
                Err(PlanError::InvalidInput(format!(
                    "age must be a non-negative integer, got {n}"
                )))
            }
        }
        Some(NumericField::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed.parse::<u32>().map_err(|_| {
                PlanError::InvalidInput(format!("age is not a non-negative integer: {trimmed:?}"))
            })
        }
    }
}

fn parse_size(field: &Option<NumericField>) -> PlanResult<Option<f64>> {
    match field {
        None => Ok(None),
        Some(NumericField::Number(n)) => {
            if n.is_finite() {
                Ok(Some(*n))
            } else {
                Err(PlanError::InvalidInput(
                    "tumour_size_cm must be a finite number".to_string(),
                ))
            }
        }
        Some(NumericField::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map(Some).map_err(|_| {
                PlanError::InvalidInput(format!("tumour_size_cm is not a number: {trimmed:?}"))
            })
        }
    }
}

/// Interprets a presence-marker value (HER2, MSI, CLDN18.2).
///
/// Booleans pass through; numbers follow zero/non-zero; a handful of
/// common positive/negative words are accepted from free text, anything
/// else degrades to "not tested".
fn presence_marker(name: &str, value: &BiomarkerValue) -> Option<bool> {
    match value {
        BiomarkerValue::Flag(b) => Some(*b),
        BiomarkerValue::Score(n) => Some(*n != 0.0),
        BiomarkerValue::Text(text) => match text.trim().to_lowercase().as_str() {
            "positive" | "true" | "yes" => Some(true),
            "negative" | "false" | "no" => Some(false),
            "" => None,
            other => {
                tracing::debug!("unrecognized {name} value {other:?}, treating as not tested");
                None
            }
        },
    }
}

fn cps_score(value: &BiomarkerValue) -> PlanResult<Option<f64>> {
    match value {
        BiomarkerValue::Score(n) => Ok(Some(*n)),
        BiomarkerValue::Flag(_) => {
            tracing::debug!("boolean PD_L1_CPS value, treating as not tested");
            Ok(None)
        }
        BiomarkerValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map(Some).map_err(|_| {
                PlanError::InvalidInput(format!("PD_L1_CPS is not a number: {trimmed:?}"))
            })
        }
    }
}

fn normalize_biomarkers(patient: &PatientRecord) -> PlanResult<Biomarkers> {
    let mut biomarkers = Biomarkers::default();
    for (key, value) in &patient.biomarkers {
        let Some(value) = value else {
            continue; // explicit null = not tested
        };
        match key.trim().to_uppercase().as_str() {
            "HER2" => biomarkers.her2 = presence_marker("HER2", value),
            "MSI" => biomarkers.msi = presence_marker("MSI", value),
            "CLDN18.2" => biomarkers.cldn18_2 = presence_marker("CLDN18.2", value),
            "PD_L1_CPS" => biomarkers.pd_l1_cps = cps_score(value)?,
            other => {
                tracing::debug!("ignoring unknown biomarker key {other:?}");
            }
        }
    }
    Ok(biomarkers)
}

fn lowered(codes: &[String]) -> impl Iterator<Item = String> + '_ {
    codes.iter().map(|c| c.trim().to_lowercase())
}

/// Converts a raw patient record into the canonical representation.
///
/// Performs, in order: numeric parsing, coded-set validation, TNM stage
/// parsing, and imaging-to-stage reconciliation. Imaging findings take
/// precedence over a stale or incomplete TNM string: any coded distant
/// met site, or pleural/peritoneal carcinomatosis, resolves the record as
/// metastatic and upgrades a parsed M0/unknown to M1, recording the sites
/// for the rationale.
///
/// # Errors
///
/// Returns [`PlanError::InvalidInput`] only for numeric fields supplied
/// as non-numeric text.
pub fn normalize(patient: &PatientRecord) -> PlanResult<CanonicalRecord> {
    let age = parse_age(&patient.age)?;
    let tumour_size_cm = parse_size(&patient.tumour_size_cm)?;
    let biomarkers = normalize_biomarkers(patient)?;

    let histology = Histology::from_text(patient.histology.as_deref().unwrap_or(""));
    let grade = patient
        .grade
        .as_deref()
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty());

    let tumour_location = patient
        .tumour_location
        .as_deref()
        .map(|c| c.trim().to_lowercase())
        .and_then(|c| {
            let location = TumourLocation::from_code(&c);
            if location.is_none() && !c.is_empty() {
                tracing::debug!("unknown tumour_location code {c:?}");
            }
            location
        })
        .unwrap_or(TumourLocation::Unknown);

    let mut comorbidities = Vec::new();
    for code in lowered(&patient.comorbidities) {
        match Comorbidity::from_code(&code) {
            Some(c) => comorbidities.push(c),
            None => tracing::debug!("dropping unknown comorbidity code {code:?}"),
        }
    }

    let mut invasion_features = Vec::new();
    for code in lowered(&patient.invasion_features) {
        match InvasionFeature::from_code(&code) {
            Some(f) => invasion_features.push(f),
            None => tracing::debug!("dropping unknown invasion_features code {code:?}"),
        }
    }

    let mut nodal_regions = Vec::new();
    for code in lowered(&patient.nodal_regions) {
        match NodalRegion::from_code(&code) {
            Some(r) => nodal_regions.push(r),
            None => tracing::debug!("dropping unknown nodal_regions code {code:?}"),
        }
    }

    // Unrecognized met-site codes degrade to `other` rather than being
    // dropped: their presence still means imaging found distant disease.
    let mut distant_met_sites = Vec::new();
    for code in lowered(&patient.distant_met_sites) {
        if code.is_empty() {
            continue;
        }
        match DistantMetSite::from_code(&code) {
            Some(s) => distant_met_sites.push(s),
            None => {
                tracing::debug!("degrading unknown distant_met_sites code {code:?} to \"other\"");
                distant_met_sites.push(DistantMetSite::Other);
            }
        }
    }

    let stage_text = patient.stage.clone().unwrap_or_default();
    let (t, n, parsed_m, m_raw) = parse_stage(&stage_text);

    // Imaging-to-stage reconciliation.
    let mut met_sites_report: Vec<String> = distant_met_sites
        .iter()
        .map(|s| s.as_code().to_string())
        .collect();
    let mut imaging_metastasis = !distant_met_sites.is_empty();
    for feature in &invasion_features {
        if feature.is_carcinomatosis() {
            imaging_metastasis = true;
            if let Some(site) = feature.met_site_name() {
                if !met_sites_report.iter().any(|r| r == site) {
                    met_sites_report.push(site.to_string());
                }
            }
        }
    }

    let mut m = parsed_m;
    let mut m_overridden = false;
    if imaging_metastasis && matches!(m, TnmM::Unknown | TnmM::M0) {
        m = TnmM::M1;
        m_overridden = true;
    }
    let m_label = if m_overridden {
        "M1".to_string()
    } else {
        m_raw.unwrap_or_default()
    };

    Ok(CanonicalRecord {
        age,
        stage_text,
        t,
        n,
        m,
        m_label,
        histology,
        tumour_size_cm,
        grade,
        lymphovascular_invasion: patient.lymphovascular_invasion.unwrap_or(false),
        biomarkers,
        comorbidities,
        comorbidities_other: patient.comorbidities_other.trim().to_string(),
        tumour_location,
        invasion_features,
        nodal_regions,
        distant_met_sites,
        imaging_findings: patient.imaging_findings.trim().to_string(),
        surgical_candidate: patient.surgical_candidate.unwrap_or(true),
        is_metastatic: m == TnmM::M1,
        m_overridden,
        met_sites_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> PatientRecord {
        serde_json::from_value(json).expect("valid record json")
    }

    #[test]
    fn empty_record_normalizes_to_defaults() {
        let canonical = normalize(&PatientRecord::default()).expect("normalize");
        assert_eq!(canonical.age, 0);
        assert_eq!(canonical.t, TnmT::Unknown);
        assert_eq!(canonical.n, TnmN::Unknown);
        assert_eq!(canonical.m, TnmM::Unknown);
        assert_eq!(canonical.tumour_location, TumourLocation::Unknown);
        assert!(canonical.surgical_candidate);
        assert!(!canonical.is_metastatic);
    }

    #[test]
    fn imaging_met_sites_override_m0() {
        let canonical = normalize(&record(serde_json::json!({
            "stage": "T3N1M0",
            "distant_met_sites": ["liver"]
        })))
        .expect("normalize");
        assert_eq!(canonical.m, TnmM::M1);
        assert!(canonical.is_metastatic);
        assert!(canonical.m_overridden);
        assert_eq!(canonical.met_sites_report, vec!["liver"]);
        assert_eq!(canonical.m_label, "M1");
    }

    #[test]
    fn carcinomatosis_counts_as_metastatic() {
        let canonical = normalize(&record(serde_json::json!({
            "stage": "T3N0M0",
            "invasion_features": ["pleural_carcinomatosis"]
        })))
        .expect("normalize");
        assert!(canonical.is_metastatic);
        assert_eq!(canonical.met_sites_report, vec!["pleura"]);
    }

    #[test]
    fn peritoneal_site_not_duplicated_in_report() {
        let canonical = normalize(&record(serde_json::json!({
            "distant_met_sites": ["peritoneal"],
            "invasion_features": ["peritoneal_carcinomatosis"]
        })))
        .expect("normalize");
        assert_eq!(canonical.met_sites_report, vec!["peritoneal"]);
    }

    #[test]
    fn tnm_m1_needs_no_override() {
        let canonical = normalize(&record(serde_json::json!({
            "stage": "T3N1M1B",
            "distant_met_sites": ["bone"]
        })))
        .expect("normalize");
        assert!(canonical.is_metastatic);
        assert!(!canonical.m_overridden);
        assert_eq!(canonical.m_label, "M1B");
    }

    #[test]
    fn non_numeric_age_is_invalid_input() {
        let err = normalize(&record(serde_json::json!({"age": "unknown"})))
            .expect_err("must reject non-numeric age");
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }

    #[test]
    fn blank_numeric_text_degrades_to_unknown() {
        let canonical = normalize(&record(serde_json::json!({
            "age": "  ",
            "tumour_size_cm": "",
            "biomarkers": {"PD_L1_CPS": " "}
        })))
        .expect("normalize");
        assert_eq!(canonical.age, 0);
        assert_eq!(canonical.tumour_size_cm, None);
        assert_eq!(canonical.biomarkers.pd_l1_cps, None);
    }

    #[test]
    fn non_numeric_cps_is_invalid_input() {
        let err = normalize(&record(serde_json::json!({
            "biomarkers": {"PD_L1_CPS": "high"}
        })))
        .expect_err("must reject non-numeric CPS");
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }

    #[test]
    fn unknown_codes_degrade_without_error() {
        let canonical = normalize(&record(serde_json::json!({
            "comorbidities": ["severe_pulm", "not_a_code"],
            "invasion_features": ["warp_drive"],
            "nodal_regions": ["orbital"],
            "tumour_location": "elsewhere"
        })))
        .expect("normalize");
        assert_eq!(canonical.comorbidities, vec![Comorbidity::SeverePulm]);
        assert!(canonical.invasion_features.is_empty());
        assert!(canonical.nodal_regions.is_empty());
        assert_eq!(canonical.tumour_location, TumourLocation::Unknown);
    }

    #[test]
    fn unknown_met_site_still_means_metastatic() {
        let canonical = normalize(&record(serde_json::json!({
            "stage": "T2N0M0",
            "distant_met_sites": ["adrenal"]
        })))
        .expect("normalize");
        assert!(canonical.is_metastatic);
        assert_eq!(canonical.distant_met_sites, vec![DistantMetSite::Other]);
    }

    #[test]
    fn biomarker_keys_match_case_insensitively() {
        let canonical = normalize(&record(serde_json::json!({
            "biomarkers": {"her2": true, "msi": "negative", "cldn18.2": false, "pd_l1_cps": 7.5}
        })))
        .expect("normalize");
        assert_eq!(canonical.biomarkers.her2, Some(true));
        assert_eq!(canonical.biomarkers.msi, Some(false));
        assert_eq!(canonical.biomarkers.cldn18_2, Some(false));
        assert_eq!(canonical.biomarkers.pd_l1_cps, Some(7.5));
    }
}
