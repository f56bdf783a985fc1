//! Coded clinical vocabularies used by the rule engine.
//!
//! Each vocabulary is a closed enum with `from_code`/`as_code` string
//! mapping, mirroring the codes emitted by the intake form. Unknown codes
//! are handled by the normalizer (dropped or degraded, never an error),
//! so these types only model the recognized vocabulary.

/// Tumour histology. The canonical set is small and open-ended: anything
/// unrecognized is preserved verbatim and falls through default pathways.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Histology {
    Adenocarcinoma,
    Squamous,
    Neuroendocrine,
    /// Unrecognized histology text, preserved verbatim (lower-cased).
    Other(String),
}

impl Histology {
    /// Parse free histology text into the canonical set.
    pub fn from_text(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        match lower.as_str() {
            "adenocarcinoma" => Histology::Adenocarcinoma,
            "squamous" => Histology::Squamous,
            "neuroendocrine" => Histology::Neuroendocrine,
            _ => Histology::Other(lower),
        }
    }

    /// Display text, used verbatim inside rationale sentences.
    pub fn as_text(&self) -> &str {
        match self {
            Histology::Adenocarcinoma => "adenocarcinoma",
            Histology::Squamous => "squamous",
            Histology::Neuroendocrine => "neuroendocrine",
            Histology::Other(text) => text,
        }
    }

    pub fn is_adenocarcinoma(&self) -> bool {
        matches!(self, Histology::Adenocarcinoma)
    }

    pub fn is_squamous(&self) -> bool {
        matches!(self, Histology::Squamous)
    }
}

/// Primary tumour location relative to the esophagus and the
/// gastroesophageal junction (GEJ, Siewert I-III).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TumourLocation {
    Cervical,
    UpperThoracic,
    MidThoracic,
    DistalThoracic,
    GejSiewert1,
    GejSiewert2,
    GejSiewert3,
    Unknown,
}

impl TumourLocation {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "cervical" => Some(TumourLocation::Cervical),
            "upper_thoracic" => Some(TumourLocation::UpperThoracic),
            "mid_thoracic" => Some(TumourLocation::MidThoracic),
            "distal_thoracic" => Some(TumourLocation::DistalThoracic),
            "gej_siewert1" => Some(TumourLocation::GejSiewert1),
            "gej_siewert2" => Some(TumourLocation::GejSiewert2),
            "gej_siewert3" => Some(TumourLocation::GejSiewert3),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            TumourLocation::Cervical => "cervical",
            TumourLocation::UpperThoracic => "upper_thoracic",
            TumourLocation::MidThoracic => "mid_thoracic",
            TumourLocation::DistalThoracic => "distal_thoracic",
            TumourLocation::GejSiewert1 => "gej_siewert1",
            TumourLocation::GejSiewert2 => "gej_siewert2",
            TumourLocation::GejSiewert3 => "gej_siewert3",
            TumourLocation::Unknown => "unknown",
        }
    }

    /// Cervical primaries are managed with definitive chemoradiation
    /// rather than esophagectomy.
    pub fn is_cervical(self) -> bool {
        matches!(self, TumourLocation::Cervical)
    }

    /// Any Siewert-type GEJ location.
    pub fn is_gej(self) -> bool {
        matches!(
            self,
            TumourLocation::GejSiewert1 | TumourLocation::GejSiewert2 | TumourLocation::GejSiewert3
        )
    }
}

/// Local invasion findings from imaging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvasionFeature {
    NoneBeyondWall,
    AdventitialInvolvement,
    AirwayInvasion,
    AorticEncasement,
    VertebralBodyInvolvement,
    DiaphragmInvolvement,
    PericardialInvolvement,
    PleuralCarcinomatosis,
    PeritonealCarcinomatosis,
}

impl InvasionFeature {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "none_beyond_wall" => Some(InvasionFeature::NoneBeyondWall),
            "adventitial_involvement" => Some(InvasionFeature::AdventitialInvolvement),
            "airway_invasion" => Some(InvasionFeature::AirwayInvasion),
            "aortic_encasement" => Some(InvasionFeature::AorticEncasement),
            "vertebral_body_involvement" => Some(InvasionFeature::VertebralBodyInvolvement),
            "diaphragm_involvement" => Some(InvasionFeature::DiaphragmInvolvement),
            "pericardial_involvement" => Some(InvasionFeature::PericardialInvolvement),
            "pleural_carcinomatosis" => Some(InvasionFeature::PleuralCarcinomatosis),
            "peritoneal_carcinomatosis" => Some(InvasionFeature::PeritonealCarcinomatosis),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            InvasionFeature::NoneBeyondWall => "none_beyond_wall",
            InvasionFeature::AdventitialInvolvement => "adventitial_involvement",
            InvasionFeature::AirwayInvasion => "airway_invasion",
            InvasionFeature::AorticEncasement => "aortic_encasement",
            InvasionFeature::VertebralBodyInvolvement => "vertebral_body_involvement",
            InvasionFeature::DiaphragmInvolvement => "diaphragm_involvement",
            InvasionFeature::PericardialInvolvement => "pericardial_involvement",
            InvasionFeature::PleuralCarcinomatosis => "pleural_carcinomatosis",
            InvasionFeature::PeritonealCarcinomatosis => "peritoneal_carcinomatosis",
        }
    }

    /// Invasion of the airway, aorta, or a vertebral body is T4b by NCCN
    /// definition and renders the tumour unresectable. Pericardial
    /// involvement alone is T4a and potentially resectable.
    pub fn is_t4b_equivalent(self) -> bool {
        matches!(
            self,
            InvasionFeature::AirwayInvasion
                | InvasionFeature::AorticEncasement
                | InvasionFeature::VertebralBodyInvolvement
        )
    }

    /// Pleural or peritoneal carcinomatosis counts as distant metastasis
    /// (M1), not local invasion.
    pub fn is_carcinomatosis(self) -> bool {
        matches!(
            self,
            InvasionFeature::PleuralCarcinomatosis | InvasionFeature::PeritonealCarcinomatosis
        )
    }

    /// Metastatic site name reported for carcinomatosis findings.
    pub fn met_site_name(self) -> Option<&'static str> {
        match self {
            InvasionFeature::PleuralCarcinomatosis => Some("pleura"),
            InvasionFeature::PeritonealCarcinomatosis => Some("peritoneal"),
            _ => None,
        }
    }
}

/// Coded comorbidities from the intake form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comorbidity {
    SeverePulm,
    SevereCard,
    Frailty,
    Ckd,
    Liver,
    PriorRt,
    Autoimmune,
    Diabetes,
    Malnutrition,
}

impl Comorbidity {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "severe_pulm" => Some(Comorbidity::SeverePulm),
            "severe_card" => Some(Comorbidity::SevereCard),
            "frailty" => Some(Comorbidity::Frailty),
            "ckd" => Some(Comorbidity::Ckd),
            "liver" => Some(Comorbidity::Liver),
            "prior_rt" => Some(Comorbidity::PriorRt),
            "autoimmune" => Some(Comorbidity::Autoimmune),
            "diabetes" => Some(Comorbidity::Diabetes),
            "malnutrition" => Some(Comorbidity::Malnutrition),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Comorbidity::SeverePulm => "severe_pulm",
            Comorbidity::SevereCard => "severe_card",
            Comorbidity::Frailty => "frailty",
            Comorbidity::Ckd => "ckd",
            Comorbidity::Liver => "liver",
            Comorbidity::PriorRt => "prior_rt",
            Comorbidity::Autoimmune => "autoimmune",
            Comorbidity::Diabetes => "diabetes",
            Comorbidity::Malnutrition => "malnutrition",
        }
    }

    /// Comorbidities that mark esophagectomy as high risk.
    pub fn raises_operative_risk(self) -> bool {
        matches!(
            self,
            Comorbidity::SeverePulm
                | Comorbidity::SevereCard
                | Comorbidity::Frailty
                | Comorbidity::Ckd
                | Comorbidity::Liver
        )
    }
}

/// Regional nodal stations reported on imaging. Carried through the
/// canonical record for display; nodal positivity for rule purposes comes
/// from the parsed N category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodalRegion {
    Mediastinal,
    Celiac,
    Supraclavicular,
    Retroperitoneal,
}

impl NodalRegion {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mediastinal" => Some(NodalRegion::Mediastinal),
            "celiac" => Some(NodalRegion::Celiac),
            "supraclavicular" => Some(NodalRegion::Supraclavicular),
            "retroperitoneal" => Some(NodalRegion::Retroperitoneal),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            NodalRegion::Mediastinal => "mediastinal",
            NodalRegion::Celiac => "celiac",
            NodalRegion::Supraclavicular => "supraclavicular",
            NodalRegion::Retroperitoneal => "retroperitoneal",
        }
    }
}

/// Distant metastatic sites reported on imaging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistantMetSite {
    Liver,
    Lung,
    Bone,
    Brain,
    Peritoneal,
    DistantNodes,
    Other,
}

impl DistantMetSite {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "liver" => Some(DistantMetSite::Liver),
            "lung" => Some(DistantMetSite::Lung),
            "bone" => Some(DistantMetSite::Bone),
            "brain" => Some(DistantMetSite::Brain),
            "peritoneal" => Some(DistantMetSite::Peritoneal),
            "distant_nodes" => Some(DistantMetSite::DistantNodes),
            "other" => Some(DistantMetSite::Other),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            DistantMetSite::Liver => "liver",
            DistantMetSite::Lung => "lung",
            DistantMetSite::Bone => "bone",
            DistantMetSite::Brain => "brain",
            DistantMetSite::Peritoneal => "peritoneal",
            DistantMetSite::DistantNodes => "distant_nodes",
            DistantMetSite::Other => "other",
        }
    }
}
