pub mod ddb_hold_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::hold::domain::model::HoldEntity;

#[async_trait]
pub trait HoldRepository: Repository<HoldEntity> {
    // holds whose current copy points at the item
    async fn find_by_current_copy(&self, item_id: &str) -> LibraryResult<Vec<HoldEntity>>;

    // holds linked to the item through the hold-copy map
    async fn find_by_copy_map(&self, item_id: &str) -> LibraryResult<Vec<HoldEntity>>;
}
