//! The canonical role table.
//!
//! ## Summary
//! Every role string that enters the system is parsed here. Three exact
//! spellings are recognized for each role: the canonical key
//! (`hospital_staff`), the display label (`Hospital Staff`) and the variant
//! name (`HospitalStaff`). Anything else is rejected.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A staff role. Closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "Hospital Staff", alias = "HospitalStaff")]
    HospitalStaff,
    #[serde(alias = "Medical Staff", alias = "MedicalStaff")]
    MedicalStaff,
    #[serde(alias = "Insurance Staff", alias = "InsuranceStaff")]
    InsuranceStaff,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::HospitalStaff, Self::MedicalStaff, Self::InsuranceStaff];

    /// Canonical key, used for storage, policies and wire formats.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HospitalStaff => "hospital_staff",
            Self::MedicalStaff => "medical_staff",
            Self::InsuranceStaff => "insurance_staff",
        }
    }

    /// Human-readable label. Also the default display name of an identity.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HospitalStaff => "Hospital Staff",
            Self::MedicalStaff => "Medical Staff",
            Self::InsuranceStaff => "Insurance Staff",
        }
    }

    #[must_use]
    pub const fn variant_name(self) -> &'static str {
        match self {
            Self::HospitalStaff => "HospitalStaff",
            Self::MedicalStaff => "MedicalStaff",
            Self::InsuranceStaff => "InsuranceStaff",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s || role.label() == s || role.variant_name() == s)
            .ok_or_else(|| CoreError::InvalidRole(s.to_string()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
