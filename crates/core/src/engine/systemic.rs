//! Biomarker-driven systemic-therapy selection for metastatic disease.
//!
//! Returns the ordered, never-empty list of first-line regimen options
//! embedded in the metastatic rationale sentence. MSI-H/dMMR is exclusive
//! and considered first; the remaining groups are additive. The CPS
//! thresholds (≥5 adenocarcinoma, ≥10 squamous) are load-bearing clinical
//! contracts and are inclusive comparisons.

use crate::normalize::Biomarkers;
use crate::vocab::Histology;

/// CPS threshold for adding immunotherapy in adenocarcinoma.
const ADENO_CPS_THRESHOLD: f64 = 5.0;
/// CPS threshold for the squamous chemo-immunotherapy combination.
const SQUAMOUS_CPS_THRESHOLD: f64 = 10.0;

/// Builds the ordered regimen option list for metastatic disease.
pub fn systemic_therapy_options(biomarkers: &Biomarkers, histology: &Histology) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();

    // MSI-H/dMMR: checkpoint-inhibitor monotherapy supersedes every other
    // biomarker-directed option in first line.
    if biomarkers.msi_positive() {
        options.push(
            "immune checkpoint inhibitor monotherapy (e.g., pembrolizumab or dostarlimab) \
             for MSI-H/dMMR disease"
                .to_string(),
        );
        return options;
    }

    let cps = biomarkers.pd_l1_cps;

    // HER2-positive: chemotherapy + trastuzumab, with immunotherapy added
    // for PD-L1 CPS >= 5 adenocarcinoma.
    if biomarkers.her2_positive() {
        let mut option = String::from("fluoropyrimidine + platinum chemotherapy + trastuzumab");
        if histology.is_adenocarcinoma() && cps.is_some_and(|c| c >= ADENO_CPS_THRESHOLD) {
            option.push_str(" ± nivolumab or pembrolizumab");
        }
        options.push(option);
    }

    // CLDN18.2-positive only when HER2-negative: zolbetuximab combination.
    if biomarkers.cldn18_2_positive() && !biomarkers.her2_positive() {
        options.push("FOLFOX or CAPOX + zolbetuximab for CLDN18.2-positive disease".to_string());
    }

    // Squamous histology with a known CPS.
    if histology.is_squamous() {
        if let Some(cps) = cps {
            if cps >= SQUAMOUS_CPS_THRESHOLD {
                options.push(
                    "platinum-based chemotherapy + nivolumab, or nivolumab/ipilimumab in \
                     selected patients"
                        .to_string(),
                );
            } else {
                options.push(
                    "platinum-based chemotherapy ± nivolumab, depending on PD-L1 expression \
                     and prior therapy"
                        .to_string(),
                );
            }
        }
    }

    // Adenocarcinoma with a known CPS, when no targeted agent applies.
    if histology.is_adenocarcinoma()
        && !biomarkers.her2_positive()
        && !biomarkers.cldn18_2_positive()
    {
        if let Some(cps) = cps {
            if cps >= ADENO_CPS_THRESHOLD {
                options.push(
                    "fluoropyrimidine + platinum chemotherapy + nivolumab or pembrolizumab"
                        .to_string(),
                );
            } else {
                options.push(
                    "fluoropyrimidine + platinum chemotherapy with optional immunotherapy \
                     depending on local practice"
                        .to_string(),
                );
            }
        }
    }

    // No biomarker-driven option: standard chemotherapy backbone.
    if options.is_empty() {
        options.push(
            "fluoropyrimidine + platinum chemotherapy (e.g., FOLFOX or CAPOX) with or \
             without immunotherapy based on PD-L1 and histology"
                .to_string(),
        );
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biomarkers(
        her2: Option<bool>,
        msi: Option<bool>,
        cldn18_2: Option<bool>,
        pd_l1_cps: Option<f64>,
    ) -> Biomarkers {
        Biomarkers {
            her2,
            msi,
            cldn18_2,
            pd_l1_cps,
        }
    }

    #[test]
    fn msi_positive_is_exclusive() {
        let options = systemic_therapy_options(
            &biomarkers(Some(true), Some(true), Some(true), Some(90.0)),
            &Histology::Adenocarcinoma,
        );
        assert_eq!(options.len(), 1);
        assert!(options[0].contains("MSI-H/dMMR"));
        assert!(!options[0].contains("trastuzumab"));
    }

    #[test]
    fn her2_positive_adds_trastuzumab() {
        let options = systemic_therapy_options(
            &biomarkers(Some(true), None, None, None),
            &Histology::Adenocarcinoma,
        );
        assert_eq!(
            options,
            vec!["fluoropyrimidine + platinum chemotherapy + trastuzumab".to_string()]
        );
    }

    #[test]
    fn her2_with_high_cps_adenocarcinoma_adds_immunotherapy() {
        let options = systemic_therapy_options(
            &biomarkers(Some(true), None, None, Some(5.0)),
            &Histology::Adenocarcinoma,
        );
        assert_eq!(options.len(), 1);
        assert!(options[0].ends_with("± nivolumab or pembrolizumab"));
    }

    #[test]
    fn cldn_option_requires_her2_negative() {
        let with_her2 = systemic_therapy_options(
            &biomarkers(Some(true), None, Some(true), None),
            &Histology::Adenocarcinoma,
        );
        assert!(!with_her2.iter().any(|o| o.contains("zolbetuximab")));

        let without_her2 = systemic_therapy_options(
            &biomarkers(Some(false), None, Some(true), None),
            &Histology::Adenocarcinoma,
        );
        assert!(without_her2.iter().any(|o| o.contains("zolbetuximab")));
    }

    #[test]
    fn adenocarcinoma_cps_threshold_is_inclusive_at_five() {
        let at_threshold = systemic_therapy_options(
            &biomarkers(Some(false), Some(false), Some(false), Some(5.0)),
            &Histology::Adenocarcinoma,
        );
        assert_eq!(at_threshold.len(), 1);
        assert!(at_threshold[0].contains("+ nivolumab or pembrolizumab"));

        let below_threshold = systemic_therapy_options(
            &biomarkers(Some(false), Some(false), Some(false), Some(4.999)),
            &Histology::Adenocarcinoma,
        );
        assert_eq!(below_threshold.len(), 1);
        assert!(below_threshold[0].contains("optional immunotherapy"));
    }

    #[test]
    fn squamous_cps_threshold_is_inclusive_at_ten() {
        let at_threshold = systemic_therapy_options(
            &biomarkers(None, None, None, Some(10.0)),
            &Histology::Squamous,
        );
        assert!(at_threshold[0].contains("nivolumab/ipilimumab"));

        let below_threshold = systemic_therapy_options(
            &biomarkers(None, None, None, Some(9.9)),
            &Histology::Squamous,
        );
        assert!(below_threshold[0].contains("± nivolumab"));
    }

    #[test]
    fn untested_cps_falls_back_to_default_backbone() {
        let options = systemic_therapy_options(
            &biomarkers(Some(false), Some(false), Some(false), None),
            &Histology::Adenocarcinoma,
        );
        assert_eq!(options.len(), 1);
        assert!(options[0].contains("FOLFOX or CAPOX"));
        assert!(options[0].contains("with or without immunotherapy"));
    }

    #[test]
    fn unrecognized_histology_uses_default_backbone() {
        let options =
            systemic_therapy_options(&biomarkers(None, None, None, Some(50.0)), &Histology::Other(
                "small cell".to_string(),
            ));
        assert_eq!(options.len(), 1);
        assert!(options[0].contains("FOLFOX or CAPOX"));
    }

    #[test]
    fn her2_and_squamous_options_are_additive() {
        let options = systemic_therapy_options(
            &biomarkers(Some(true), None, None, Some(12.0)),
            &Histology::Squamous,
        );
        assert_eq!(options.len(), 2);
        assert!(options[0].contains("trastuzumab"));
        assert!(options[1].contains("nivolumab/ipilimumab"));
    }
}
