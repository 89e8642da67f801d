//! System-constant resolution.
//!
//! Constants are read through on every call; nothing is cached between lookups or runs.
//! Resolution never fails: an absent row, an absent value or a failed lookup all resolve to
//! [`NOT_SUPPLIED`].

use crate::constants::{
    INTELLECTUAL_RIGHTS, NOT_SUPPLIED, ORGANIZATION_NAME_FULL, ORGANIZATION_URL, PROVIDER_URL,
    SECURITY_PROVIDER_URL, TAXONOMIC_PROVIDER_URL,
};
use crate::repository::EmlRepository;

/// The six constants an EML record is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemConstants {
    pub provider_url: String,
    pub security_provider_url: String,
    pub organization_name_full: String,
    pub organization_url: String,
    pub intellectual_rights: String,
    pub taxonomic_provider_url: String,
}

impl SystemConstants {
    /// Name/value pairs in resolution order.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            (PROVIDER_URL, self.provider_url.as_str()),
            (SECURITY_PROVIDER_URL, self.security_provider_url.as_str()),
            (ORGANIZATION_NAME_FULL, self.organization_name_full.as_str()),
            (ORGANIZATION_URL, self.organization_url.as_str()),
            (INTELLECTUAL_RIGHTS, self.intellectual_rights.as_str()),
            (TAXONOMIC_PROVIDER_URL, self.taxonomic_provider_url.as_str()),
        ]
    }
}

/// Read-through resolver over an injected repository.
#[derive(Clone, Copy)]
pub struct ConstantResolver<'a> {
    repository: &'a dyn EmlRepository,
}

impl<'a> ConstantResolver<'a> {
    pub fn new(repository: &'a dyn EmlRepository) -> Self {
        Self { repository }
    }

    /// Resolves a named constant, substituting [`NOT_SUPPLIED`] when it is unavailable.
    pub async fn resolve(&self, name: &str) -> String {
        match self.repository.system_constant(name).await {
            Ok(Some(value)) => value,
            Ok(None) => NOT_SUPPLIED.to_string(),
            Err(e) => {
                tracing::warn!(constant = name, error = %e, "system constant lookup failed");
                NOT_SUPPLIED.to_string()
            }
        }
    }

    /// Resolves all six constants concurrently.
    pub async fn resolve_all(&self) -> SystemConstants {
        let (
            provider_url,
            security_provider_url,
            organization_name_full,
            organization_url,
            intellectual_rights,
            taxonomic_provider_url,
        ) = tokio::join!(
            self.resolve(PROVIDER_URL),
            self.resolve(SECURITY_PROVIDER_URL),
            self.resolve(ORGANIZATION_NAME_FULL),
            self.resolve(ORGANIZATION_URL),
            self.resolve(INTELLECTUAL_RIGHTS),
            self.resolve(TAXONOMIC_PROVIDER_URL),
        );

        SystemConstants {
            provider_url,
            security_provider_url,
            organization_name_full,
            organization_url,
            intellectual_rights,
            taxonomic_provider_url,
        }
    }
}
