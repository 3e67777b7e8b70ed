//! Cohorts, visit kinds, and the small value enums written into cohort sheets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two patient populations tracked by the hub.
///
/// Each cohort owns one sheet in the workbook and its own field template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    /// Axial spondyloarthritis.
    Espa,
    /// Psoriatic arthritis.
    Aps,
}

impl Cohort {
    /// Both cohorts in generation order.
    pub const ALL: [Cohort; 2] = [Cohort::Espa, Cohort::Aps];

    /// Prefix used in patient identifiers (`ESP-2024-001`).
    pub fn id_code(self) -> &'static str {
        match self {
            Cohort::Espa => "ESP",
            Cohort::Aps => "APS",
        }
    }

    /// Name of the workbook sheet holding this cohort's visits.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Cohort::Espa => "ESPA",
            Cohort::Aps => "APS",
        }
    }

    /// Value written to `Diagnostico_Primario`.
    pub fn diagnosis(self) -> &'static str {
        self.sheet_name()
    }

    /// Default upper bound on the swollen-joint count for one visit.
    pub fn default_max_swollen(self) -> usize {
        match self {
            Cohort::Espa => 12,
            Cohort::Aps => 10,
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Whether a row records the baseline consultation or a later review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitKind {
    FirstVisit,
    FollowUp,
}

impl VisitKind {
    /// Value written to `Tipo_Visita`.
    pub fn label(self) -> &'static str {
        match self {
            VisitKind::FirstVisit => "Primera Visita",
            VisitKind::FollowUp => "Seguimiento",
        }
    }

    /// Parse a `Tipo_Visita` cell back into a kind.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Primera Visita" => Some(VisitKind::FirstVisit),
            "Seguimiento" => Some(VisitKind::FollowUp),
            _ => None,
        }
    }
}

/// The affirmative/negative flag used by every yes-no column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    Si,
    No,
}

impl Flag {
    pub const YES: &'static str = "SI";
    pub const NO: &'static str = "NO";

    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Si => Self::YES,
            Flag::No => Self::NO,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Flag::Si
    }

    /// True when `value` is one of the two flag spellings.
    pub fn is_flag_text(value: &str) -> bool {
        value == Self::YES || value == Self::NO
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value {
            Flag::Si
        } else {
            Flag::No
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Hombre",
            Sex::Female => "Mujer",
        }
    }
}

/// Result of a serology test such as HLA-B27.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Serology {
    Positive,
    Negative,
}

impl Serology {
    pub fn label(self) -> &'static str {
        match self {
            Serology::Positive => "Positivo",
            Serology::Negative => "Negativo",
        }
    }
}

impl From<bool> for Serology {
    fn from(positive: bool) -> Self {
        if positive {
            Serology::Positive
        } else {
            Serology::Negative
        }
    }
}
