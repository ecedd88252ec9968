use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::domain::EvaluationScope;
use crate::core::library::LibraryResult;
use crate::loans::domain::model::LoanEntity;
use crate::renewal::dto::DecisionDto;

pub mod gates;
pub mod service;

#[async_trait]
pub trait RenewalService: Sync + Send {
    // loads the candidates of every org unit in scope and decides each of them,
    // one result per loan ordered by loan id
    async fn evaluate(&self, scope: &EvaluationScope) -> LibraryResult<Vec<DecisionDto>>;

    // decides loans the caller already selected
    async fn evaluate_loans(&self, loans: &[LoanEntity], now: NaiveDateTime) -> LibraryResult<Vec<DecisionDto>>;
}
