use aaprov_core::TenantName;
use serde::{Deserialize, Serialize};

/// Subscription seed data handed to discovery. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription identifier.
    #[serde(rename = "subid")]
    pub id: String,
    /// Subscription display name.
    #[serde(rename = "subname")]
    pub name: String,
    /// Creation timestamp as provided by the seed source.
    #[serde(rename = "createdtime", default)]
    pub created_time: String,
}

/// Credential scope with its ordered subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant name, also the credential lookup key.
    #[serde(rename = "tenantName")]
    pub name: TenantName,
    /// Subscriptions processed in this order during discovery.
    #[serde(rename = "data", default)]
    pub subscriptions: Vec<Subscription>,
}

impl Tenant {
    /// Creates a tenant seed.
    #[must_use]
    pub fn new(name: TenantName, subscriptions: Vec<Subscription>) -> Self {
        Self {
            name,
            subscriptions,
        }
    }
}
