use crate::core::repository::RepositoryStore;
use crate::fines::domain::FineThresholdResolver;
use crate::fines::domain::service::FineThresholdResolverImpl;
use crate::fines::repository::ddb_fines_repository::{DDBBalanceRepository, DDBThresholdRepository};
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_fine_resolver(store: RepositoryStore) -> Box<dyn FineThresholdResolver> {
    let client = build_db_client(store).await;
    if store == RepositoryStore::LocalDynamoDB {
        let _ = create_table(&client, "penalty_thresholds", "threshold_id", "org_unit_id", "penalty").await;
        let _ = create_table(&client, "balances", "xact_id", "patron_id", "xact_id").await;
    }
    Box::new(FineThresholdResolverImpl::new(
        Box::new(DDBThresholdRepository::new(client.clone(), "penalty_thresholds", "penalty_thresholds_ndx")),
        Box::new(DDBBalanceRepository::new(client, "balances", "balances_ndx"))))
}
