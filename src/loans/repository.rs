pub mod ddb_loan_repository;

use async_trait::async_trait;
use crate::core::domain::DueWindow;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::loans::domain::model::LoanEntity;

#[async_trait]
pub trait LoanRepository: Sync + Send {
    // loans circulated by the org unit whose due date falls in the window
    async fn query_due(&self, org_unit_id: &str, window: &DueWindow,
                       page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>>;
}
