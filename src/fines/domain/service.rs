use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core::library::{LibraryResult, PenaltyCode};
use crate::fines::domain::FineThresholdResolver;
use crate::fines::repository::{BalanceRepository, ThresholdRepository};

pub(crate) struct FineThresholdResolverImpl {
    threshold_repository: Box<dyn ThresholdRepository>,
    balance_repository: Box<dyn BalanceRepository>,
}

impl FineThresholdResolverImpl {
    pub(crate) fn new(threshold_repository: Box<dyn ThresholdRepository>,
                      balance_repository: Box<dyn BalanceRepository>) -> Self {
        Self {
            threshold_repository,
            balance_repository,
        }
    }
}

#[async_trait]
impl FineThresholdResolver for FineThresholdResolverImpl {
    async fn threshold(&self, org_unit_id: &str) -> LibraryResult<Option<Decimal>> {
        let rows = self.threshold_repository.find_thresholds(org_unit_id, PenaltyCode::ExceedsFines).await?;
        Ok(rows.iter()
            .filter(|row| row.penalty == PenaltyCode::ExceedsFines)
            .map(|row| row.threshold)
            .max())
    }

    async fn total_fines(&self, patron_id: &str) -> LibraryResult<Decimal> {
        let balances = self.balance_repository.find_balances(patron_id).await?;
        Ok(balances.iter()
            .map(|b| b.balance_owed.max(Decimal::ZERO))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use crate::core::library::PenaltyCode;
    use crate::fines::domain::{fines_over_threshold, FineThresholdResolver};
    use crate::fines::domain::model::{BalanceEntity, PenaltyThresholdEntity};
    use crate::fines::domain::service::FineThresholdResolverImpl;
    use crate::snapshot::{CirculationSnapshot, SnapshotData};

    fn resolver(data: SnapshotData) -> FineThresholdResolverImpl {
        let snapshot = CirculationSnapshot::new(data);
        FineThresholdResolverImpl::new(Box::new(snapshot.clone()), Box::new(snapshot))
    }

    #[tokio::test]
    async fn test_should_take_largest_threshold() {
        let mut data = SnapshotData::default();
        data.add_threshold(PenaltyThresholdEntity::new("BR1", "Patron", Decimal::new(10, 0)));
        data.add_threshold(PenaltyThresholdEntity::new("BR1", "Staff", Decimal::new(30, 0)));
        data.add_threshold(PenaltyThresholdEntity::new("BR2", "Patron", Decimal::new(99, 0)));
        let mut overdue = PenaltyThresholdEntity::new("BR1", "Patron", Decimal::new(500, 0));
        overdue.penalty = PenaltyCode::ExceedsOverdueCount;
        data.add_threshold(overdue);

        let threshold = resolver(data).threshold("BR1").await.expect("should resolve");
        assert_eq!(Some(Decimal::new(30, 0)), threshold);
    }

    #[tokio::test]
    async fn test_should_report_missing_threshold() {
        let threshold = resolver(SnapshotData::default()).threshold("BR1").await.expect("should resolve");
        assert_eq!(None, threshold);
    }

    #[tokio::test]
    async fn test_should_sum_positive_balances_only() {
        let mut data = SnapshotData::default();
        data.add_balance(BalanceEntity::new("P1", Decimal::new(1250, 2)));
        data.add_balance(BalanceEntity::new("P1", Decimal::new(750, 2)));
        data.add_balance(BalanceEntity::new("P1", Decimal::new(-2000, 2)));
        data.add_balance(BalanceEntity::new("P2", Decimal::new(4000, 2)));

        let total = resolver(data).total_fines("P1").await.expect("should resolve");
        assert_eq!(Decimal::new(20, 0), total);
    }

    #[tokio::test]
    async fn test_should_compute_amount_over_threshold() {
        assert_eq!(Decimal::new(20, 0), fines_over_threshold(Decimal::new(50, 0), Some(Decimal::new(30, 0))));
        assert_eq!(Decimal::ZERO, fines_over_threshold(Decimal::new(30, 0), Some(Decimal::new(30, 0))));
        assert_eq!(Decimal::ZERO, fines_over_threshold(Decimal::new(5, 0), Some(Decimal::new(30, 0))));
    }

    #[tokio::test]
    async fn test_should_not_block_without_threshold() {
        assert_eq!(Decimal::ZERO, fines_over_threshold(Decimal::new(500, 0), None));
    }

    #[tokio::test]
    async fn test_should_block_any_fine_at_zero_threshold() {
        assert_eq!(Decimal::new(1, 2), fines_over_threshold(Decimal::new(1, 2), Some(Decimal::ZERO)));
    }
}
