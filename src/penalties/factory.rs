use crate::core::domain::RenewalConfiguration;
use crate::core::repository::RepositoryStore;
use crate::penalties::domain::StandingPenaltyChecker;
use crate::penalties::domain::service::StandingPenaltyCheckerImpl;
use crate::penalties::repository::ddb_penalty_repository::DDBStandingPenaltyRepository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_penalty_checker(config: &RenewalConfiguration, store: RepositoryStore) -> Box<dyn StandingPenaltyChecker> {
    let client = build_db_client(store).await;
    if store == RepositoryStore::LocalDynamoDB {
        let _ = create_table(&client, "standing_penalties", "penalty_id", "patron_id", "penalty").await;
    }
    let repository = DDBStandingPenaltyRepository::new(client, "standing_penalties", "standing_penalties_ndx");
    Box::new(StandingPenaltyCheckerImpl::new(config, Box::new(repository)))
}
