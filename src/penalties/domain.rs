use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;

pub mod model;
pub mod service;

#[async_trait]
pub trait StandingPenaltyChecker: Sync + Send {
    // true when the patron carries a blocking penalty that has not stopped by `now`
    async fn has_blocking_penalty(&self, patron_id: &str, now: NaiveDateTime) -> LibraryResult<bool>;
}
