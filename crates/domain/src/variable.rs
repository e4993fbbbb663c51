use serde::{Deserialize, Serialize};

/// Configuration variable injected into each automation account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunbookVariable {
    /// Share names excluded from backup.
    ExcludeAfs,
    /// Storage account picked as the backup source.
    ObjectStorage,
    /// Resource group of the target.
    ResourceGroup,
    /// Snapshot retention in days.
    RetentionDays,
    /// Subscription of the target.
    SubscriptionId,
}

impl RunbookVariable {
    /// All recognised variables in onboarding order.
    pub const ALL: [Self; 5] = [
        Self::ExcludeAfs,
        Self::ObjectStorage,
        Self::ResourceGroup,
        Self::RetentionDays,
        Self::SubscriptionId,
    ];

    /// Returns the variable name as stored in the automation account.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExcludeAfs => "EXCLUDE_AFS",
            Self::ObjectStorage => "OBJECT_STORAGE",
            Self::ResourceGroup => "RESOURCE_GROUP",
            Self::RetentionDays => "RetentionDays",
            Self::SubscriptionId => "SUBSCRIPTION_ID",
        }
    }

    /// Looks up a variable by its stored name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variable| variable.as_str() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::RunbookVariable;

    #[test]
    fn names_round_trip() {
        for variable in RunbookVariable::ALL {
            assert_eq!(RunbookVariable::parse(variable.as_str()), Some(variable));
        }
    }

    #[test]
    fn unknown_and_case_mismatched_names_are_ignored() {
        assert_eq!(RunbookVariable::parse("UNKNOWN"), None);
        assert_eq!(RunbookVariable::parse("retentiondays"), None);
    }
}
