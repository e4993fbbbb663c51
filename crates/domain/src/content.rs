use aaprov_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hash algorithm label the automation service expects in content links.
pub const CONTENT_HASH_ALGORITHM: &str = "SHA256";

/// Version tag attached to every published content link.
pub const CONTENT_LINK_VERSION: &str = "v1";

/// Blob coordinates of one runbook script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunbookSpec {
    runbook_name: NonEmptyString,
    storage_account: NonEmptyString,
    container: NonEmptyString,
    blob_name: NonEmptyString,
    sas_token: String,
}

impl RunbookSpec {
    /// Creates a validated runbook spec.
    pub fn new(
        runbook_name: impl Into<String>,
        storage_account: impl Into<String>,
        container: impl Into<String>,
        blob_name: impl Into<String>,
        sas_token: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            runbook_name: NonEmptyString::new(runbook_name)?,
            storage_account: NonEmptyString::new(storage_account)?,
            container: NonEmptyString::new(container)?,
            blob_name: NonEmptyString::new(blob_name)?,
            sas_token: normalize_sas_token(sas_token.into().trim()),
        })
    }

    /// Returns the runbook name used when publishing.
    #[must_use]
    pub fn runbook_name(&self) -> &str {
        self.runbook_name.as_str()
    }

    /// Returns the storage account holding the script.
    #[must_use]
    pub fn storage_account(&self) -> &str {
        self.storage_account.as_str()
    }

    /// Returns the blob container.
    #[must_use]
    pub fn container(&self) -> &str {
        self.container.as_str()
    }

    /// Returns the blob name.
    #[must_use]
    pub fn blob_name(&self) -> &str {
        self.blob_name.as_str()
    }

    /// Returns the SAS token appended to the blob URL, including its leading `?`.
    #[must_use]
    pub fn sas_token(&self) -> &str {
        self.sas_token.as_str()
    }
}

fn normalize_sas_token(token: &str) -> String {
    if token.is_empty() || token.starts_with('?') {
        token.to_owned()
    } else {
        format!("?{token}")
    }
}

/// Content-integrity hash of a fetched script body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHash {
    /// Hash algorithm label.
    pub algorithm: String,
    /// Lower-case hex digest.
    pub value: String,
}

impl ContentHash {
    /// Computes the SHA-256 digest of the UTF-8 encoded script body.
    #[must_use]
    pub fn sha256(body: &str) -> Self {
        let digest = Sha256::digest(body.as_bytes());

        Self {
            algorithm: CONTENT_HASH_ALGORITHM.to_owned(),
            value: hex::encode(digest),
        }
    }
}

/// Content reference used to publish one runbook. Shared read-only across targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLink {
    runbook_name: String,
    uri: String,
    content_hash: ContentHash,
    version: String,
}

impl ContentLink {
    /// Builds the content link for a fetched script.
    ///
    /// `blob_url` is the plain blob URL; the runbook SAS token is appended to it.
    pub fn for_script(spec: &RunbookSpec, blob_url: &str, body: &str) -> AppResult<Self> {
        if blob_url.trim().is_empty() {
            return Err(AppError::ContentFetch(format!(
                "blob url for runbook '{}' is empty",
                spec.runbook_name()
            )));
        }

        Ok(Self {
            runbook_name: spec.runbook_name().to_owned(),
            uri: format!("{blob_url}{}", spec.sas_token()),
            content_hash: ContentHash::sha256(body),
            version: CONTENT_LINK_VERSION.to_owned(),
        })
    }

    /// Returns the runbook name.
    #[must_use]
    pub fn runbook_name(&self) -> &str {
        self.runbook_name.as_str()
    }

    /// Returns the script URI (blob URL plus SAS token).
    #[must_use]
    pub fn uri(&self) -> &str {
        self.uri.as_str()
    }

    /// Returns the script hash.
    #[must_use]
    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    /// Returns the version tag.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::{CONTENT_HASH_ALGORITHM, ContentHash, ContentLink, RunbookSpec};

    fn spec() -> RunbookSpec {
        RunbookSpec::new(
            "afs_backuprunbook",
            "scripts",
            "runbooks",
            "backup.py",
            "?sv=2024&sig=abc",
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn sha256_of_known_body() {
        let hash = ContentHash::sha256("abc");
        assert_eq!(hash.algorithm, CONTENT_HASH_ALGORITHM);
        assert_eq!(
            hash.value,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hashing_is_deterministic() {
        let body = "print('backup')\n";
        assert_eq!(ContentHash::sha256(body), ContentHash::sha256(body));
    }

    #[test]
    fn changing_one_byte_changes_digest() {
        assert_ne!(
            ContentHash::sha256("print('backup')").value,
            ContentHash::sha256("print('backuq')").value
        );
    }

    #[test]
    fn content_link_appends_sas_token() {
        let link = ContentLink::for_script(
            &spec(),
            "https://scripts.blob.core.windows.net/runbooks/backup.py",
            "body",
        );
        assert!(link.is_ok());

        let link = link.unwrap_or_else(|_| unreachable!());
        assert_eq!(link.runbook_name(), "afs_backuprunbook");
        assert_eq!(
            link.uri(),
            "https://scripts.blob.core.windows.net/runbooks/backup.py?sv=2024&sig=abc"
        );
        assert_eq!(link.version(), "v1");
        assert_eq!(link.content_hash(), &ContentHash::sha256("body"));
    }

    #[test]
    fn sas_token_gains_leading_question_mark() {
        let spec = RunbookSpec::new("rb", "acct", "container", "blob.py", "sv=1&sig=x")
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(spec.sas_token(), "?sv=1&sig=x");

        let spec = RunbookSpec::new("rb", "acct", "container", "blob.py", "  ")
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(spec.sas_token(), "");
    }

    #[test]
    fn runbook_spec_requires_blob_name() {
        assert!(RunbookSpec::new("rb", "acct", "container", " ", "").is_err());
    }
}
