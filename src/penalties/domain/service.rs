use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::core::domain::RenewalConfiguration;
use crate::core::library::{LibraryResult, PenaltyCode};
use crate::penalties::domain::StandingPenaltyChecker;
use crate::penalties::repository::StandingPenaltyRepository;

pub(crate) struct StandingPenaltyCheckerImpl {
    blocking_penalties: HashSet<PenaltyCode>,
    penalty_repository: Box<dyn StandingPenaltyRepository>,
}

impl StandingPenaltyCheckerImpl {
    pub(crate) fn new(config: &RenewalConfiguration, penalty_repository: Box<dyn StandingPenaltyRepository>) -> Self {
        Self {
            blocking_penalties: config.blocking_set(),
            penalty_repository,
        }
    }
}

#[async_trait]
impl StandingPenaltyChecker for StandingPenaltyCheckerImpl {
    async fn has_blocking_penalty(&self, patron_id: &str, now: NaiveDateTime) -> LibraryResult<bool> {
        let penalties = self.penalty_repository.find_by_patron(patron_id).await?;
        Ok(penalties.iter()
            .any(|p| self.blocking_penalties.contains(&p.penalty) && p.is_active(now)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use crate::core::domain::RenewalConfiguration;
    use crate::core::library::PenaltyCode;
    use crate::penalties::domain::StandingPenaltyChecker;
    use crate::penalties::domain::model::StandingPenaltyEntity;
    use crate::penalties::domain::service::StandingPenaltyCheckerImpl;
    use crate::snapshot::{CirculationSnapshot, SnapshotData};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn checker(penalties: Vec<StandingPenaltyEntity>) -> StandingPenaltyCheckerImpl {
        let mut data = SnapshotData::default();
        for p in penalties {
            data.add_penalty(p);
        }
        StandingPenaltyCheckerImpl::new(&RenewalConfiguration::new(), Box::new(CirculationSnapshot::new(data)))
    }

    #[tokio::test]
    async fn test_should_block_on_open_penalty() {
        let sut = checker(vec![StandingPenaltyEntity::new("P1", PenaltyCode::ExceedsOverdueCount)]);
        assert!(sut.has_blocking_penalty("P1", now()).await.expect("should check"));
        assert!(!sut.has_blocking_penalty("P2", now()).await.expect("should check"));
    }

    #[tokio::test]
    async fn test_should_ignore_non_blocking_codes() {
        let sut = checker(vec![
            StandingPenaltyEntity::new("P1", PenaltyCode::ExceedsFines),
            StandingPenaltyEntity::new("P1", PenaltyCode::Unknown),
        ]);
        assert!(!sut.has_blocking_penalty("P1", now()).await.expect("should check"));
    }

    #[tokio::test]
    async fn test_should_not_block_on_penalty_stopping_now() {
        let mut stopping = StandingPenaltyEntity::new("P1", PenaltyCode::ExceedsCheckoutCount);
        stopping.stop_at = Some(now());
        let sut = checker(vec![stopping]);
        assert!(!sut.has_blocking_penalty("P1", now()).await.expect("should check"));
    }

    #[tokio::test]
    async fn test_should_block_on_future_stop_date() {
        let mut future = StandingPenaltyEntity::new("P1", PenaltyCode::ExceedsLongOverdueCount);
        future.stop_at = Some(now() + Duration::days(2));
        let sut = checker(vec![future]);
        assert!(sut.has_blocking_penalty("P1", now()).await.expect("should check"));
    }

    #[tokio::test]
    async fn test_should_honor_configured_codes() {
        let mut config = RenewalConfiguration::new();
        config.blocking_penalties = vec![PenaltyCode::ExceedsFines];
        let mut data = SnapshotData::default();
        data.add_penalty(StandingPenaltyEntity::new("P1", PenaltyCode::ExceedsFines));
        let sut = StandingPenaltyCheckerImpl::new(&config, Box::new(CirculationSnapshot::new(data)));
        assert!(sut.has_blocking_penalty("P1", now()).await.expect("should check"));
    }
}
