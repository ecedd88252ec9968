use crate::core::repository::RepositoryStore;
use crate::patrons::repository::ddb_patron_repository::DDBPatronRepository;
use crate::patrons::repository::PatronRepository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_patron_repository(store: RepositoryStore) -> Box<dyn PatronRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBPatronRepository::new(client, "patrons"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "patrons", "patron_id", "home_org_unit_id", "patron_id").await;
            Box::new(DDBPatronRepository::new(client, "patrons"))
        }
    }
}
