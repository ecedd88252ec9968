use std::collections::HashSet;
use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult, PenaltyCode};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// HoldScan decides which loans get the hold permit test. Both modes give the
// same verdicts, Eligible only skips the permit test for loans already blocked.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum HoldScan {
    Eligible,
    All,
}

// longest due-date window a run may look ahead
pub const MAX_DUE_WINDOW_DAYS: i64 = 366;

// RenewalConfiguration abstracts config options for the renewal engine
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RenewalConfiguration {
    pub blocking_penalties: Vec<PenaltyCode>,
    pub due_window_days: Option<i64>,
    pub hold_scan: HoldScan,
    pub page_size: usize,
}

impl RenewalConfiguration {
    pub fn new() -> Self {
        RenewalConfiguration {
            blocking_penalties: PenaltyCode::default_blocking(),
            due_window_days: Some(3),
            hold_scan: HoldScan::Eligible,
            page_size: 100,
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.blocking_penalties.is_empty() {
            return Err(LibraryError::configuration("no blocking penalty codes configured"));
        }
        match self.due_window_days {
            None => Err(LibraryError::configuration("no due-date window configured")),
            Some(days) if days < 0 => Err(LibraryError::configuration(
                format!("due-date window cannot be negative {}", days).as_str())),
            Some(days) if days > MAX_DUE_WINDOW_DAYS => Err(LibraryError::configuration(
                format!("due-date window {} exceeds {} days", days, MAX_DUE_WINDOW_DAYS).as_str())),
            Some(_) if self.page_size == 0 => Err(LibraryError::configuration("page size must be positive")),
            Some(_) => Ok(()),
        }
    }

    pub fn blocking_set(&self) -> HashSet<PenaltyCode> {
        self.blocking_penalties.iter().copied().collect()
    }

    // scope builds the evaluation scope for the given org units as of the instant
    pub fn scope(&self, org_units: &[String], as_of: NaiveDateTime) -> LibraryResult<EvaluationScope> {
        self.validate()?;
        let days = self.due_window_days.unwrap_or_default();
        Ok(EvaluationScope {
            org_units: org_units.to_vec(),
            window: DueWindow::new(as_of.date(), days)?,
            as_of,
        })
    }
}

impl Default for RenewalConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

// DueWindow is the inclusive range of calendar days [start, end]
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct DueWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DueWindow {
    pub fn new(start: NaiveDate, days: i64) -> LibraryResult<Self> {
        let end = u64::try_from(days).ok()
            .and_then(|days| start.checked_add_days(Days::new(days)))
            .ok_or_else(|| LibraryError::configuration(
                format!("due-date window of {} days from {} is out of range", days, start).as_str()))?;
        Ok(DueWindow { start, end })
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, due_at: NaiveDateTime) -> bool {
        let day = due_at.date();
        day >= self.start && day <= self.end
    }

    // first and last instant covered by the window, both inclusive
    pub fn bounds(&self) -> LibraryResult<(NaiveDateTime, NaiveDateTime)> {
        let from = self.start.and_time(NaiveTime::MIN);
        let to = self.end.succ_opt()
            .map(|next| next.and_time(NaiveTime::MIN) - Duration::microseconds(1))
            .ok_or_else(|| LibraryError::configuration(
                format!("due-date window ending {} is out of range", self.end).as_str()))?;
        Ok((from, to))
    }
}

// EvaluationScope is one engine run: org units, due window and the evaluation instant
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct EvaluationScope {
    pub org_units: Vec<String>,
    pub window: DueWindow,
    pub as_of: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use crate::core::domain::{DueWindow, HoldScan, MAX_DUE_WINDOW_DAYS, RenewalConfiguration};
    use crate::core::library::LibraryError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn test_should_build_config() {
        let config = RenewalConfiguration::new();
        assert_eq!(4, config.blocking_penalties.len());
        assert_eq!(Some(3), config.due_window_days);
        assert_eq!(HoldScan::Eligible, config.hold_scan);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_should_reject_missing_penalties() {
        let mut config = RenewalConfiguration::new();
        config.blocking_penalties.clear();
        assert!(matches!(config.validate(), Err(LibraryError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_missing_window() {
        let mut config = RenewalConfiguration::new();
        config.due_window_days = None;
        let as_of = day(18).and_time(NaiveTime::MIN);
        assert!(matches!(config.scope(&["BR1".to_string()], as_of), Err(LibraryError::Configuration { .. })));
        config.due_window_days = Some(-1);
        assert!(matches!(config.validate(), Err(LibraryError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_oversized_window() {
        let mut config = RenewalConfiguration::new();
        let as_of = day(18).and_time(NaiveTime::MIN);
        config.due_window_days = Some(i64::MAX / 1000);
        assert!(matches!(config.validate(), Err(LibraryError::Configuration { .. })));
        assert!(matches!(config.scope(&["BR1".to_string()], as_of), Err(LibraryError::Configuration { .. })));
        config.due_window_days = Some(MAX_DUE_WINDOW_DAYS);
        assert!(config.scope(&["BR1".to_string()], as_of).is_ok());
    }

    #[tokio::test]
    async fn test_should_fail_window_past_calendar_end() {
        assert!(matches!(DueWindow::new(day(18), i64::MAX), Err(LibraryError::Configuration { .. })));
        assert!(matches!(DueWindow::new(day(18), -1), Err(LibraryError::Configuration { .. })));
        let last = DueWindow::new(NaiveDate::MAX, 0).expect("should build window");
        assert!(matches!(last.bounds(), Err(LibraryError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_should_contain_inclusive_days() {
        let window = DueWindow::new(day(18), 3).expect("should build window");
        assert!(window.contains(day(18).and_hms_opt(0, 0, 0).unwrap()));
        assert!(window.contains(day(21).and_hms_opt(23, 59, 59).unwrap()));
        assert!(!window.contains(day(22).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!window.contains(day(17).and_hms_opt(23, 59, 59).unwrap()));
        let (from, to) = window.bounds().expect("should bound window");
        assert!(window.contains(from));
        assert!(window.contains(to));
    }

    #[tokio::test]
    async fn test_should_build_scope_from_instant() {
        let config = RenewalConfiguration::new();
        let as_of = day(18).and_hms_opt(9, 30, 0).unwrap();
        let scope = config.scope(&["BR1".to_string()], as_of).expect("should build scope");
        assert_eq!(day(18), scope.window.start);
        assert_eq!(day(21), scope.window.last_day());
        assert_eq!(as_of, scope.as_of);
    }
}
