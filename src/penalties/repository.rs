pub mod ddb_penalty_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::penalties::domain::model::StandingPenaltyEntity;

#[async_trait]
pub trait StandingPenaltyRepository: Sync + Send {
    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<StandingPenaltyEntity>>;
}
