//! The route table: which view lives at which path, and who may see it.

use serde::Serialize;

use wardgate_core::constants::{
    BILLING_PATH, DASHBOARD_PATH, INSURANCE_CLAIMS_PATH, LOGIN_PATH, PATIENT_RECORDS_PATH,
    ROOT_PATH, UNAUTHORIZED_PATH,
};
use wardgate_core::{PermissionRequirement, Role};

/// A screen the host can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Unauthorized,
    Dashboard,
    PatientRecords,
    Billing,
    InsuranceClaims,
}

impl View {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Unauthorized => "Access denied",
            Self::Dashboard => "Dashboard",
            Self::PatientRecords => "Patient Records",
            Self::Billing => "Billing",
            Self::InsuranceClaims => "Insurance Claims",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Rendered without looking at the session.
    Public,
    Guarded(PermissionRequirement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub view: View,
    pub access: RouteAccess,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a public route.
    #[must_use]
    pub fn public(mut self, path: impl Into<String>, view: View) -> Self {
        self.entries.push(RouteEntry {
            path: path.into(),
            view,
            access: RouteAccess::Public,
        });
        self
    }

    /// Add a guarded route.
    #[must_use]
    pub fn guarded(
        mut self,
        path: impl Into<String>,
        view: View,
        requirement: PermissionRequirement,
    ) -> Self {
        self.entries.push(RouteEntry {
            path: path.into(),
            view,
            access: RouteAccess::Guarded(requirement),
        });
        self
    }

    /// The hospital admin routes.
    #[must_use]
    pub fn hospital_default() -> Self {
        Self::new()
            .public(LOGIN_PATH, View::Login)
            .public(UNAUTHORIZED_PATH, View::Unauthorized)
            .guarded(
                ROOT_PATH,
                View::Dashboard,
                PermissionRequirement::any_authenticated(),
            )
            .guarded(
                DASHBOARD_PATH,
                View::Dashboard,
                PermissionRequirement::any_authenticated(),
            )
            .guarded(
                PATIENT_RECORDS_PATH,
                View::PatientRecords,
                PermissionRequirement::roles([Role::HospitalStaff, Role::MedicalStaff]),
            )
            .guarded(
                BILLING_PATH,
                View::Billing,
                PermissionRequirement::roles(Role::ALL),
            )
            .guarded(
                INSURANCE_CLAIMS_PATH,
                View::InsuranceClaims,
                PermissionRequirement::roles([Role::HospitalStaff, Role::InsuranceStaff]),
            )
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Exact match after dropping a trailing slash.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        let path = normalize(path);
        self.entries.iter().find(|entry| entry.path == path)
    }

    /// Requirement of a guarded path. `None` for public or unknown paths.
    #[must_use]
    pub fn requirement_for(&self, path: &str) -> Option<&PermissionRequirement> {
        match &self.lookup(path)?.access {
            RouteAccess::Public => None,
            RouteAccess::Guarded(requirement) => Some(requirement),
        }
    }
}

fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}
