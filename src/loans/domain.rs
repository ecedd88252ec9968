use async_trait::async_trait;
use crate::core::domain::DueWindow;
use crate::core::library::LibraryResult;
use crate::loans::domain::model::LoanEntity;

pub mod model;
pub mod service;

// CandidateLoader returns the open loans of SMS-eligible patrons due in the window
#[async_trait]
pub trait CandidateLoader: Sync + Send {
    async fn load(&self, org_unit_id: &str, window: &DueWindow) -> LibraryResult<Vec<LoanEntity>>;
}
