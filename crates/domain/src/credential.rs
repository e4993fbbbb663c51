use std::fmt::{Debug, Formatter};

use aaprov_core::{AppError, AppResult};

/// Service principal credential for one tenant.
#[derive(Clone, PartialEq, Eq)]
pub struct TenantCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl TenantCredential {
    /// Creates a credential from its parts.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> AppResult<Self> {
        let credential = Self {
            tenant_id: tenant_id.into().trim().to_owned(),
            client_id: client_id.into().trim().to_owned(),
            client_secret: client_secret.into().trim().to_owned(),
        };

        for (field, value) in [
            ("tenantId", credential.tenant_id.as_str()),
            ("clientId", credential.client_id.as_str()),
            ("clientSecret", credential.client_secret.as_str()),
        ] {
            if value.is_empty() {
                return Err(AppError::Credential(format!(
                    "credential field '{field}' must not be empty"
                )));
            }
        }

        Ok(credential)
    }

    /// Parses the `tenantId:<id>,clientId:<id>,clientSecret:<secret>` form.
    ///
    /// Keys may appear in any order; unknown keys are ignored. Only the first
    /// `:` of each pair separates key from value.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::Credential("credential value is empty".to_owned()));
        }

        let mut tenant_id = None;
        let mut client_id = None;
        let mut client_secret = None;

        for pair in raw.split(',') {
            let Some((key, value)) = pair.split_once(':') else {
                return Err(AppError::Credential(format!(
                    "credential entry '{}' is not a key:value pair",
                    pair.trim()
                )));
            };

            match key.trim() {
                "tenantId" => tenant_id = Some(value),
                "clientId" => client_id = Some(value),
                "clientSecret" => client_secret = Some(value),
                _ => {}
            }
        }

        let missing = |field: &str| AppError::Credential(format!("credential is missing '{field}'"));

        Self::new(
            tenant_id.ok_or_else(|| missing("tenantId"))?,
            client_id.ok_or_else(|| missing("clientId"))?,
            client_secret.ok_or_else(|| missing("clientSecret"))?,
        )
    }

    /// Returns the directory tenant identifier.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        self.tenant_id.as_str()
    }

    /// Returns the application client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// Returns the client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        self.client_secret.as_str()
    }
}

impl Debug for TenantCredential {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TenantCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use aaprov_core::AppError;

    use super::TenantCredential;

    #[test]
    fn parses_comma_separated_pairs() {
        let credential =
            TenantCredential::parse("tenantId:t-1, clientId:c-1 ,clientSecret:s:with:colons");
        assert!(credential.is_ok());

        let credential = credential.unwrap_or_else(|_| unreachable!());
        assert_eq!(credential.tenant_id(), "t-1");
        assert_eq!(credential.client_id(), "c-1");
        assert_eq!(credential.client_secret(), "s:with:colons");
    }

    #[test]
    fn missing_key_is_a_credential_error() {
        let credential = TenantCredential::parse("tenantId:t-1,clientId:c-1");
        assert!(matches!(credential, Err(AppError::Credential(_))));
    }

    #[test]
    fn pair_without_separator_is_rejected() {
        let credential = TenantCredential::parse("tenantId:t-1,clientId,clientSecret:s");
        assert!(matches!(credential, Err(AppError::Credential(_))));
    }

    #[test]
    fn empty_value_is_rejected() {
        assert!(TenantCredential::parse("   ").is_err());
        assert!(TenantCredential::parse("tenantId:,clientId:c,clientSecret:s").is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let credential = TenantCredential::new("t", "c", "super-secret")
            .unwrap_or_else(|_| unreachable!());
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
