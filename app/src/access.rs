//! Capability checks for report actions
//!
//! Every screen that starts a report asks the same question: may this
//! actor use this capability? [`authorize`] is the single place that
//! answers it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capability required to generate and export reports
pub const GENERATE_REPORTS: &str = "reports.generate";

/// Access tiers in order of increasing access
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Only explicitly granted capabilities
    #[default]
    Restricted,
    /// Granted capabilities, plus everything under `reports.`
    Staff,
    /// Every capability
    Admin,
}

/// The user a request is made on behalf of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    #[serde(default)]
    pub access_type: AccessType,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{actor} is not allowed to use {capability}")]
pub struct AccessDenied {
    pub actor: String,
    pub capability: String,
}

/// Check that `actor` holds `capability`
pub fn authorize(actor: &Actor, capability: &str) -> Result<(), AccessDenied> {
    let granted = match actor.access_type {
        AccessType::Admin => true,
        AccessType::Staff => capability.starts_with("reports.") || holds(actor, capability),
        AccessType::Restricted => holds(actor, capability),
    };
    if granted {
        tracing::debug!(actor = %actor.id, capability, "access granted");
        Ok(())
    } else {
        Err(AccessDenied {
            actor: actor.id.clone(),
            capability: capability.to_string(),
        })
    }
}

fn holds(actor: &Actor, capability: &str) -> bool {
    actor.permissions.iter().any(|p| p == capability)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(access_type: AccessType, permissions: &[&str]) -> Actor {
        Actor {
            id: "u-17".to_string(),
            access_type,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_admin_has_everything() {
        assert!(authorize(&actor(AccessType::Admin, &[]), GENERATE_REPORTS).is_ok());
        assert!(authorize(&actor(AccessType::Admin, &[]), "sites.delete").is_ok());
    }

    #[test]
    fn test_staff_report_capabilities() {
        let staff = actor(AccessType::Staff, &[]);
        assert!(authorize(&staff, GENERATE_REPORTS).is_ok());
        assert!(authorize(&staff, "sites.delete").is_err());
    }

    #[test]
    fn test_restricted_needs_grant() {
        let denied = authorize(&actor(AccessType::Restricted, &["sites.view"]), GENERATE_REPORTS).unwrap_err();
        assert_eq!(denied.capability, GENERATE_REPORTS);
        assert_eq!(denied.to_string(), "u-17 is not allowed to use reports.generate");

        let granted = actor(AccessType::Restricted, &[GENERATE_REPORTS]);
        assert!(authorize(&granted, GENERATE_REPORTS).is_ok());
    }

    #[test]
    fn test_actor_defaults_to_restricted() {
        let actor: Actor = serde_json::from_str(r#"{"id":"u-1"}"#).unwrap();
        assert_eq!(actor.access_type, AccessType::Restricted);
        assert!(actor.permissions.is_empty());
    }
}
