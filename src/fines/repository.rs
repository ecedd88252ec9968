pub mod ddb_fines_repository;

use async_trait::async_trait;
use crate::core::library::{LibraryResult, PenaltyCode};
use crate::fines::domain::model::{BalanceEntity, PenaltyThresholdEntity};

#[async_trait]
pub trait ThresholdRepository: Sync + Send {
    async fn find_thresholds(&self, org_unit_id: &str, penalty: PenaltyCode) -> LibraryResult<Vec<PenaltyThresholdEntity>>;
}

#[async_trait]
pub trait BalanceRepository: Sync + Send {
    async fn find_balances(&self, patron_id: &str) -> LibraryResult<Vec<BalanceEntity>>;
}
