use crate::core::repository::RepositoryStore;
use crate::hold::domain::HoldConflictResolver;
use crate::hold::domain::service::HoldConflictResolverImpl;
use crate::hold::repository::ddb_hold_repository::DDBHoldRepository;
use crate::hold::repository::HoldRepository;
use crate::policy::factory::create_hold_permit;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_hold_repository(store: RepositoryStore) -> Box<dyn HoldRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBHoldRepository::new(client, "holds", "holds_ndx", "hold_copy_map", "hold_copy_map_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "holds", "hold_id", "current_copy", "hold_id").await;
            let _ = create_table(&client, "hold_copy_map", "map_id", "item_id", "hold_id").await;
            Box::new(DDBHoldRepository::new(client, "holds", "holds_ndx", "hold_copy_map", "hold_copy_map_ndx"))
        }
    }
}

pub(crate) async fn create_hold_resolver(store: RepositoryStore) -> Box<dyn HoldConflictResolver> {
    let hold_repository = create_hold_repository(store).await;
    let hold_permit = create_hold_permit(store).await;
    Box::new(HoldConflictResolverImpl::new(hold_repository, hold_permit))
}
