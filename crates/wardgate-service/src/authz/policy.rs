//! Casbin-backed capability policy.
//!
//! The policy lines are generated from the role capability table, so the
//! dashboard and the enforcer cannot disagree about what a role may do.

use std::fmt::Write as _;

use casbin::{CoreApi, MgmtApi};

use crate::error::ServiceResult;
use wardgate_core::Role;
use wardgate_core::capability::Action;

pub struct CapabilityPolicy {
    enforcer: casbin::Enforcer,
}

impl CapabilityPolicy {
    /// ## Summary
    /// Build an enforcer from the embedded model and the capability table.
    ///
    /// ## Errors
    /// Returns an error if the model or the generated policy fails to load.
    #[tracing::instrument]
    pub async fn from_table() -> ServiceResult<Self> {
        let model = casbin::DefaultModel::from_str(include_str!("casbin_model.conf")).await?;
        tracing::debug!("Casbin model loaded");

        let adapter = string_adapter::StringAdapter::new(policy_lines());
        let enforcer = casbin::Enforcer::new(model, adapter).await?;

        tracing::info!(
            policy_count = enforcer.get_policy().len(),
            "Capability policy initialized"
        );
        Ok(Self { enforcer })
    }

    /// ## Summary
    /// Whether `role` may perform `action`.
    ///
    /// ## Errors
    /// Returns an error if enforcement fails.
    pub fn allows(&self, role: Role, action: Action) -> ServiceResult<bool> {
        let allowed = self.enforcer.enforce((role.as_str(), action.as_str()))?;
        tracing::trace!(%role, %action, allowed, "Capability checked");
        Ok(allowed)
    }
}

/// One `p, role, action` line per granted action.
fn policy_lines() -> String {
    let mut lines = String::new();
    for role in Role::ALL {
        for action in role.capabilities().actions {
            // Writing to a String cannot fail.
            let _ = writeln!(lines, "p, {}, {}", role.as_str(), action.as_str());
        }
    }
    lines
}
