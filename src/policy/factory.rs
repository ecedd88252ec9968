use crate::core::repository::RepositoryStore;
use crate::policy::{HoldPermit, RenewalPolicy};
use crate::policy::ddb_policy::{DDBHoldPermit, DDBRenewalPolicy};
use crate::utils::ddb::{build_db_client, create_table_with_sort_key};

pub(crate) async fn create_renewal_policy(store: RepositoryStore) -> Box<dyn RenewalPolicy> {
    let client = build_db_client(store).await;
    if store == RepositoryStore::LocalDynamoDB {
        let _ = create_table_with_sort_key(&client, "renewal_policy", "policy_key", Some("outcome_id"),
                                           "org_unit_id", "item_id").await;
    }
    Box::new(DDBRenewalPolicy::new(client, "renewal_policy"))
}

pub(crate) async fn create_hold_permit(store: RepositoryStore) -> Box<dyn HoldPermit> {
    let client = build_db_client(store).await;
    if store == RepositoryStore::LocalDynamoDB {
        let _ = create_table_with_sort_key(&client, "hold_permits", "permit_key", Some("outcome_id"),
                                           "item_id", "patron_id").await;
    }
    Box::new(DDBHoldPermit::new(client, "hold_permits"))
}
