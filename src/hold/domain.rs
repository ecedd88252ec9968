use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::hold::domain::model::HoldEntity;

pub mod model;
pub mod service;

#[async_trait]
pub trait HoldConflictResolver: Sync + Send {
    // live holds that reference the item through either path, each hold once
    async fn candidate_holds(&self, item_id: &str, now: NaiveDateTime) -> LibraryResult<Vec<HoldEntity>>;

    // number of distinct candidate holds the permit test allows to target the item
    async fn blocking_hold_count(&self, item_id: &str, now: NaiveDateTime) -> LibraryResult<i64>;
}
