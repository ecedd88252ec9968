use crate::core::domain::RenewalConfiguration;
use crate::core::repository::RepositoryStore;
use crate::loans::domain::CandidateLoader;
use crate::loans::domain::service::CandidateLoaderImpl;
use crate::loans::repository::ddb_loan_repository::DDBLoanRepository;
use crate::loans::repository::LoanRepository;
use crate::patrons::factory::create_patron_repository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_loan_repository(store: RepositoryStore) -> Box<dyn LoanRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBLoanRepository::new(client, "loans", "loans_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "loans", "loan_id", "org_unit_id", "due_at").await;
            Box::new(DDBLoanRepository::new(client, "loans", "loans_ndx"))
        }
    }
}

pub(crate) async fn create_candidate_loader(config: &RenewalConfiguration, store: RepositoryStore) -> Box<dyn CandidateLoader> {
    let loan_repository = create_loan_repository(store).await;
    let patron_repository = create_patron_repository(store).await;
    Box::new(CandidateLoaderImpl::new(config, loan_repository, patron_repository))
}
