//! Raw patient record wire model.
//!
//! This is the shape assembled by a presentation layer (web form, CLI,
//! API caller) before normalization. Intake data is routinely partial, so
//! every field is optional and numeric fields accept either a JSON number
//! or the text a form submitted; the normalizer decides what is genuinely
//! unparseable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A numeric form field: either an actual number or the raw text entered.
///
/// Intake forms submit text; API callers usually send numbers. Both are
/// accepted on the wire and parsed during normalization, where non-numeric
/// non-empty text becomes an `InvalidInput` error.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

/// A biomarker value on the wire.
///
/// Presence markers (`HER2`, `MSI`, `CLDN18.2`) are booleans; `PD_L1_CPS`
/// is a number. Text is accepted for both so that form submissions pass
/// through unchanged.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BiomarkerValue {
    Flag(bool),
    Score(f64),
    Text(String),
}

/// A raw patient record as received from a presentation layer.
///
/// Coded fields carry the form's code strings verbatim; validation against
/// the closed vocabularies in [`crate::vocab`] happens in the normalizer,
/// where unknown codes degrade rather than error. An absent biomarker key
/// means "not tested", which is distinct from an explicitly negative value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct PatientRecord {
    /// Age in years; non-negative integer, unknown treated as 0.
    #[schema(value_type = Option<String>, example = "68")]
    pub age: Option<NumericField>,
    /// Free-form stage text with embedded T/N/M codes, e.g. `"T3N1M0"`.
    #[schema(example = "T3N1M0")]
    pub stage: Option<String>,
    /// Histology text; canonically adenocarcinoma, squamous or
    /// neuroendocrine, anything else preserved verbatim.
    #[schema(example = "adenocarcinoma")]
    pub histology: Option<String>,
    /// Largest tumour dimension in centimetres.
    #[schema(value_type = Option<String>, example = "3.5")]
    pub tumour_size_cm: Option<NumericField>,
    /// Differentiation grade; only the "poor" prefix is rule-relevant.
    #[schema(example = "poorly differentiated")]
    pub grade: Option<String>,
    pub lymphovascular_invasion: Option<bool>,
    /// Marker name (`HER2`, `PD_L1_CPS`, `MSI`, `CLDN18.2`) to value.
    /// Absent key = not tested; `null` is treated the same way.
    #[schema(value_type = Object)]
    pub biomarkers: BTreeMap<String, Option<BiomarkerValue>>,
    /// Coded comorbidity strings, e.g. `severe_pulm`, `frailty`.
    pub comorbidities: Vec<String>,
    /// Free-text comorbidity overflow; display-only, never used by rules.
    pub comorbidities_other: String,
    /// Coded location, e.g. `cervical`, `distal_thoracic`, `gej_siewert2`.
    #[schema(example = "distal_thoracic")]
    pub tumour_location: Option<String>,
    /// Coded local-invasion findings, e.g. `airway_invasion`.
    pub invasion_features: Vec<String>,
    /// Coded nodal regions, e.g. `mediastinal`, `celiac`.
    pub nodal_regions: Vec<String>,
    /// Coded distant metastatic sites, e.g. `liver`, `peritoneal`.
    pub distant_met_sites: Vec<String>,
    /// Free-text imaging narrative; display-only.
    pub imaging_findings: String,
    /// False when the patient has been assessed as not a surgical
    /// candidate. Defaults to true.
    pub surgical_candidate: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_form_submission() {
        let record: PatientRecord = serde_json::from_value(serde_json::json!({
            "age": "72",
            "stage": "T3N1M0",
            "histology": "adenocarcinoma",
            "tumour_size_cm": 4.2,
            "grade": "poorly differentiated",
            "lymphovascular_invasion": true,
            "biomarkers": {"HER2": false, "PD_L1_CPS": "6", "MSI": false},
            "comorbidities": ["diabetes"],
            "tumour_location": "gej_siewert2",
            "invasion_features": ["adventitial_involvement"],
            "nodal_regions": ["celiac"],
            "distant_met_sites": [],
            "surgical_candidate": true
        }))
        .expect("deserialize");

        assert_eq!(record.age, Some(NumericField::Text("72".to_string())));
        assert_eq!(record.tumour_size_cm, Some(NumericField::Number(4.2)));
        assert_eq!(
            record.biomarkers.get("PD_L1_CPS"),
            Some(&Some(BiomarkerValue::Text("6".to_string())))
        );
        assert_eq!(
            record.biomarkers.get("HER2"),
            Some(&Some(BiomarkerValue::Flag(false)))
        );
    }

    #[test]
    fn all_fields_default_for_empty_object() {
        let record: PatientRecord = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(record, PatientRecord::default());
        assert_eq!(record.surgical_candidate, None);
    }

    #[test]
    fn null_biomarker_means_not_tested() {
        let record: PatientRecord = serde_json::from_value(serde_json::json!({
            "biomarkers": {"PD_L1_CPS": null}
        }))
        .expect("deserialize");
        assert_eq!(record.biomarkers.get("PD_L1_CPS"), Some(&None));
    }
}
