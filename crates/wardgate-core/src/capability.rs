//! Per-role capability descriptors.
//!
//! ## Summary
//! One table maps each [`Role`] to what its dashboard shows and which actions
//! it offers. Screens dispatch on this table instead of branching on role
//! strings; the capability policy is generated from it too.

use serde::Serialize;

use crate::constants::{BILLING_PATH, INSURANCE_CLAIMS_PATH, PATIENT_RECORDS_PATH};
use crate::role::Role;

/// A dashboard statistic card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    TotalPatients,
    PendingBills,
    PendingClaims,
    VerifiedClaims,
    TotalRevenue,
}

/// A kind of entry in the recent-activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    NewPatient,
    BillGenerated,
    ClaimVerified,
}

/// A dashboard action. Each action leads to one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ManagePatientRecords,
    ViewPatientRecords,
    ManageBilling,
    GenerateBills,
    ViewBills,
    ManageInsuranceClaims,
    ProcessClaims,
}

impl Action {
    pub const ALL: [Self; 7] = [
        Self::ManagePatientRecords,
        Self::ViewPatientRecords,
        Self::ManageBilling,
        Self::GenerateBills,
        Self::ViewBills,
        Self::ManageInsuranceClaims,
        Self::ProcessClaims,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManagePatientRecords => "manage_patient_records",
            Self::ViewPatientRecords => "view_patient_records",
            Self::ManageBilling => "manage_billing",
            Self::GenerateBills => "generate_bills",
            Self::ViewBills => "view_bills",
            Self::ManageInsuranceClaims => "manage_insurance_claims",
            Self::ProcessClaims => "process_claims",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ManagePatientRecords => "Manage Patient Records",
            Self::ViewPatientRecords => "View Patient Records",
            Self::ManageBilling => "Manage Billing",
            Self::GenerateBills => "Generate Bills",
            Self::ViewBills => "View Bills",
            Self::ManageInsuranceClaims => "Manage Insurance Claims",
            Self::ProcessClaims => "Process Claims",
        }
    }

    #[must_use]
    pub const fn destination(self) -> &'static str {
        match self {
            Self::ManagePatientRecords | Self::ViewPatientRecords => PATIENT_RECORDS_PATH,
            Self::ManageBilling | Self::GenerateBills | Self::ViewBills => BILLING_PATH,
            Self::ManageInsuranceClaims | Self::ProcessClaims => INSURANCE_CLAIMS_PATH,
        }
    }

    /// Parse a canonical action key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == key)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a role's dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub title: &'static str,
    pub widgets: &'static [Widget],
    pub actions: &'static [Action],
    pub activity: &'static [ActivityKind],
}

const HOSPITAL_STAFF: Capabilities = Capabilities {
    title: "Hospital Staff Dashboard",
    widgets: &[
        Widget::TotalPatients,
        Widget::PendingBills,
        Widget::VerifiedClaims,
        Widget::TotalRevenue,
    ],
    actions: &[
        Action::ManagePatientRecords,
        Action::ManageBilling,
        Action::ManageInsuranceClaims,
    ],
    activity: &[
        ActivityKind::NewPatient,
        ActivityKind::BillGenerated,
        ActivityKind::ClaimVerified,
    ],
};

const MEDICAL_STAFF: Capabilities = Capabilities {
    title: "Medical Staff Dashboard",
    widgets: &[Widget::TotalPatients, Widget::PendingBills],
    actions: &[Action::ViewPatientRecords, Action::GenerateBills],
    activity: &[ActivityKind::NewPatient, ActivityKind::BillGenerated],
};

const INSURANCE_STAFF: Capabilities = Capabilities {
    title: "Insurance Staff Dashboard",
    widgets: &[Widget::PendingClaims, Widget::VerifiedClaims],
    actions: &[Action::ProcessClaims, Action::ViewBills],
    activity: &[ActivityKind::ClaimVerified],
};

impl Role {
    #[must_use]
    pub const fn capabilities(self) -> &'static Capabilities {
        match self {
            Self::HospitalStaff => &HOSPITAL_STAFF,
            Self::MedicalStaff => &MEDICAL_STAFF,
            Self::InsuranceStaff => &INSURANCE_STAFF,
        }
    }

    #[must_use]
    pub fn can(self, action: Action) -> bool {
        self.capabilities().actions.contains(&action)
    }
}
