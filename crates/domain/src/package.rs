use aaprov_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Script package installed into every automation account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Download URI of the package archive.
    pub content_uri: String,
}

impl PackageSpec {
    /// Creates a validated package spec.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        content_uri: impl Into<String>,
    ) -> AppResult<Self> {
        let package = Self {
            name: name.into().trim().to_owned(),
            version: version.into().trim().to_owned(),
            content_uri: content_uri.into().trim().to_owned(),
        };

        if package.name.is_empty() {
            return Err(AppError::Validation(
                "package name must not be empty".to_owned(),
            ));
        }

        if !package.content_uri.starts_with("https://") {
            return Err(AppError::Validation(format!(
                "package '{}' content uri must be an https url",
                package.name
            )));
        }

        Ok(package)
    }
}
