use std::fmt::{Display, Formatter};

use aaprov_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Literal prefix of every derived automation account name.
pub const ACCOUNT_NAME_PREFIX: &str = "aa";

/// Literal suffix of every derived automation account name.
pub const ACCOUNT_NAME_SUFFIX: &str = "backup0001";

/// Automation account name derived from a resource-group name.
///
/// Only [`derive_account_name`] constructs values, so a name always satisfies
/// the naming convention and never changes once a target holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutomationAccountName(String);

impl AutomationAccountName {
    /// Returns the account name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for AutomationAccountName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Derives the automation account name for a resource group.
///
/// The first two `-`separated segments are lower-cased and concatenated
/// between [`ACCOUNT_NAME_PREFIX`] and [`ACCOUNT_NAME_SUFFIX`]:
/// `HEC-SAP-PRD` becomes `aahecsapbackup0001`.
pub fn derive_account_name(resource_group_name: &str) -> AppResult<AutomationAccountName> {
    let mut segments = resource_group_name.split('-');
    let first = segments.next().unwrap_or_default();
    let Some(second) = segments.next() else {
        return Err(AppError::Validation(format!(
            "resource group '{resource_group_name}' needs at least two '-' separated segments"
        )));
    };

    if first.trim().is_empty() || second.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "resource group '{resource_group_name}' has an empty leading name segment"
        )));
    }

    Ok(AutomationAccountName(format!(
        "{ACCOUNT_NAME_PREFIX}{}{}{ACCOUNT_NAME_SUFFIX}",
        first.to_lowercase(),
        second.to_lowercase()
    )))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{ACCOUNT_NAME_PREFIX, ACCOUNT_NAME_SUFFIX, derive_account_name};

    #[test]
    fn three_segment_group_uses_first_two_segments() {
        let name = derive_account_name("HEC-SAP-PRD");
        assert!(name.is_ok());
        assert_eq!(
            name.unwrap_or_else(|_| unreachable!()).as_str(),
            "aahecsapbackup0001"
        );
    }

    #[test]
    fn two_segment_group_is_accepted() {
        let name = derive_account_name("HEC-A");
        assert_eq!(
            name.map(|value| value.to_string()).ok().as_deref(),
            Some("aahecabackup0001")
        );
    }

    #[test]
    fn single_segment_group_is_rejected() {
        assert!(derive_account_name("HECSAP").is_err());
        assert!(derive_account_name("").is_err());
    }

    #[test]
    fn empty_leading_segment_is_rejected() {
        assert!(derive_account_name("-SAP").is_err());
        assert!(derive_account_name("HEC-").is_err());
        assert!(derive_account_name("HEC--PRD").is_err());
    }

    proptest! {
        #[test]
        fn derivation_is_deterministic(
            name in "[A-Za-z0-9]{1,8}(-[A-Za-z0-9]{1,8}){1,4}"
        ) {
            let first = derive_account_name(name.as_str());
            let second = derive_account_name(name.as_str());
            prop_assert!(first.is_ok());
            prop_assert_eq!(first.ok(), second.ok());
        }

        #[test]
        fn derived_name_is_lowercase_and_framed(
            name in "[A-Za-z0-9]{1,8}(-[A-Za-z0-9]{1,8}){1,4}"
        ) {
            let derived = derive_account_name(name.as_str())
                .map(|value| value.to_string())
                .unwrap_or_default();
            prop_assert!(derived.starts_with(ACCOUNT_NAME_PREFIX));
            prop_assert!(derived.ends_with(ACCOUNT_NAME_SUFFIX));
            prop_assert_eq!(derived.to_lowercase(), derived);
        }
    }
}
