//! Static trial-citation reference table.
//!
//! Grouped landmark-trial citations rendered below recommendation results.
//! This table is owned entirely by the presentation layer: the engine in
//! `esoplan-core` never consults it.

use serde::Serialize;
use utoipa::ToSchema;

/// One cited trial or guideline document.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct TrialReference {
    #[schema(example = "CROSS")]
    pub name: String,
    #[schema(example = "https://pubmed.ncbi.nlm.nih.gov/22646630/")]
    pub url: String,
}

/// A display grouping of related citations.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ReferenceGroup {
    pub heading: String,
    pub trials: Vec<TrialReference>,
}

const GROUPS: &[(&str, &[(&str, &str)])] = &[
    (
        "Definitive / Neoadjuvant Chemoradiation",
        &[
            ("RTOG 85-01", "https://pubmed.ncbi.nlm.nih.gov/10235156/"),
            ("CROSS", "https://pubmed.ncbi.nlm.nih.gov/22646630/"),
            (
                "PRODIGE5/ACCORD17",
                "https://pubmed.ncbi.nlm.nih.gov/24556041/",
            ),
        ],
    ),
    (
        "Peri-operative Chemotherapy (Resectable Adenocarcinoma)",
        &[
            ("MAGIC", "https://pubmed.ncbi.nlm.nih.gov/16822992/"),
            (
                "FNCLCC ACCORD 07",
                "https://pubmed.ncbi.nlm.nih.gov/21444866/",
            ),
            ("FLOT4", "https://pubmed.ncbi.nlm.nih.gov/30982686/"),
            ("NEO-AEGIS", "https://pubmed.ncbi.nlm.nih.gov/37318943/"),
            ("ESOPEC", "https://pubmed.ncbi.nlm.nih.gov/38764613/"),
            ("MATTERHORN", "https://pubmed.ncbi.nlm.nih.gov/39827347/"),
        ],
    ),
    (
        "Adjuvant / Immunotherapy",
        &[
            (
                "CheckMate-577 (adjuvant nivolumab)",
                "https://pubmed.ncbi.nlm.nih.gov/33843945/",
            ),
            ("CheckMate-649", "https://pubmed.ncbi.nlm.nih.gov/34102137/"),
            ("KEYNOTE-811", "https://pubmed.ncbi.nlm.nih.gov/34912120/"),
        ],
    ),
    (
        "Guidelines",
        &[(
            "NCCN Guidelines v4.2025 (login required)",
            "https://www.nccn.org/guidelines/category_1",
        )],
    ),
];

/// Builds the grouped citation table.
pub fn reference_groups() -> Vec<ReferenceGroup> {
    GROUPS
        .iter()
        .map(|(heading, trials)| ReferenceGroup {
            heading: (*heading).to_string(),
            trials: trials
                .iter()
                .map(|(name, url)| TrialReference {
                    name: (*name).to_string(),
                    url: (*url).to_string(),
                })
                .collect(),
        })
        .collect()
}
