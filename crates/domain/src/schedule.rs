use aaprov_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AutomationAccountName;

/// Namespace for deterministic job-schedule identifiers.
const JOB_SCHEDULE_NAMESPACE: Uuid = Uuid::from_u128(0x5c0e_7a51_3b2d_4d6e_9f10_a4b8_c2d6_e801);

/// Recurrence unit of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleFrequency {
    /// Runs once at the start time.
    OneTime,
    /// Every `interval` minutes.
    Minute,
    /// Every `interval` hours.
    Hour,
    /// Every `interval` days.
    Day,
    /// Every `interval` weeks.
    Week,
    /// Every `interval` months.
    Month,
}

impl ScheduleFrequency {
    /// Returns the wire value used by the automation service.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "OneTime",
            Self::Minute => "Minute",
            Self::Hour => "Hour",
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }
}

/// Monthly occurrence rule, e.g. the second Tuesday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOccurrence {
    /// Occurrence within the month, 1..=5 or -1 for the last one.
    pub occurrence: i8,
    /// Day of week name.
    pub day: String,
}

/// Optional advanced recurrence rule for weekly and monthly schedules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSchedule {
    /// Days of week for weekly schedules.
    #[serde(default)]
    pub week_days: Vec<String>,
    /// Days of month for monthly schedules.
    #[serde(default)]
    pub month_days: Vec<u8>,
    /// Occurrence rules for monthly schedules.
    #[serde(default)]
    pub monthly_occurrences: Vec<MonthlyOccurrence>,
}

/// Static schedule definition created under every automation account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    name: NonEmptyString,
    start_time: DateTime<Utc>,
    expiry_time: Option<DateTime<Utc>>,
    frequency: ScheduleFrequency,
    interval: u32,
    time_zone: String,
    description: Option<String>,
    advanced_schedule: Option<AdvancedSchedule>,
}

/// Input payload used to construct a validated schedule spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSpecInput {
    /// Schedule name.
    pub name: String,
    /// First run.
    pub start_time: DateTime<Utc>,
    /// Optional end of the recurrence.
    pub expiry_time: Option<DateTime<Utc>>,
    /// Recurrence unit.
    pub frequency: ScheduleFrequency,
    /// Recurrence interval.
    pub interval: u32,
    /// IANA or Windows time zone id.
    pub time_zone: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional advanced recurrence rule.
    pub advanced_schedule: Option<AdvancedSchedule>,
}

impl ScheduleSpec {
    /// Creates a validated schedule spec.
    pub fn new(input: ScheduleSpecInput) -> AppResult<Self> {
        let ScheduleSpecInput {
            name,
            start_time,
            expiry_time,
            frequency,
            interval,
            time_zone,
            description,
            advanced_schedule,
        } = input;

        if interval == 0 && frequency != ScheduleFrequency::OneTime {
            return Err(AppError::Validation(
                "schedule interval must be greater than zero".to_owned(),
            ));
        }

        if let Some(expiry_time) = expiry_time
            && expiry_time <= start_time
        {
            return Err(AppError::Validation(format!(
                "schedule '{name}' expires before it starts"
            )));
        }

        let time_zone = time_zone.trim().to_owned();
        if time_zone.is_empty() {
            return Err(AppError::Validation(
                "schedule time zone must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            name: NonEmptyString::new(name)?,
            start_time,
            expiry_time,
            frequency,
            interval,
            time_zone,
            description,
            advanced_schedule,
        })
    }

    /// Returns the schedule name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the first run time.
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns the optional expiry time.
    #[must_use]
    pub fn expiry_time(&self) -> Option<DateTime<Utc>> {
        self.expiry_time
    }

    /// Returns the recurrence unit.
    #[must_use]
    pub fn frequency(&self) -> ScheduleFrequency {
        self.frequency
    }

    /// Returns the recurrence interval.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Returns the time zone.
    #[must_use]
    pub fn time_zone(&self) -> &str {
        self.time_zone.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the optional advanced recurrence rule.
    #[must_use]
    pub fn advanced_schedule(&self) -> Option<&AdvancedSchedule> {
        self.advanced_schedule.as_ref()
    }
}

/// Association between a runbook and a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunbookScheduleLink {
    /// Runbook to run.
    pub runbook_name: String,
    /// Schedule that triggers it.
    pub schedule_name: String,
}

impl RunbookScheduleLink {
    /// Creates a link.
    #[must_use]
    pub fn new(runbook_name: impl Into<String>, schedule_name: impl Into<String>) -> Self {
        Self {
            runbook_name: runbook_name.into(),
            schedule_name: schedule_name.into(),
        }
    }

    /// Returns the job-schedule identifier for this link under one account.
    ///
    /// The identifier is a UUID v5 over `(account, runbook, schedule)`, so a
    /// rerun addresses the existing association instead of adding a duplicate.
    #[must_use]
    pub fn job_schedule_id(&self, account_name: &AutomationAccountName) -> Uuid {
        let key = format!(
            "{}/{}/{}",
            account_name.as_str(),
            self.runbook_name,
            self.schedule_name
        );
        Uuid::new_v5(&JOB_SCHEDULE_NAMESPACE, key.as_bytes())
    }
}
