use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::debug;

use crate::core::library::LibraryResult;
use crate::hold::domain::HoldConflictResolver;
use crate::hold::domain::model::HoldEntity;
use crate::hold::repository::HoldRepository;
use crate::policy::HoldPermit;

pub(crate) struct HoldConflictResolverImpl {
    hold_repository: Box<dyn HoldRepository>,
    hold_permit: Box<dyn HoldPermit>,
}

impl HoldConflictResolverImpl {
    pub(crate) fn new(hold_repository: Box<dyn HoldRepository>, hold_permit: Box<dyn HoldPermit>) -> Self {
        Self {
            hold_repository,
            hold_permit,
        }
    }
}

#[async_trait]
impl HoldConflictResolver for HoldConflictResolverImpl {
    async fn candidate_holds(&self, item_id: &str, now: NaiveDateTime) -> LibraryResult<Vec<HoldEntity>> {
        // either relation may be the one linking a hold to the item right now
        let by_copy = self.hold_repository.find_by_current_copy(item_id).await?;
        let by_map = self.hold_repository.find_by_copy_map(item_id).await?;
        let mut distinct: BTreeMap<String, HoldEntity> = BTreeMap::new();
        for hold in by_copy.into_iter().chain(by_map) {
            if hold.is_candidate(now) {
                distinct.entry(hold.hold_id.to_string()).or_insert(hold);
            }
        }
        Ok(distinct.into_values().collect())
    }

    async fn blocking_hold_count(&self, item_id: &str, now: NaiveDateTime) -> LibraryResult<i64> {
        let candidates = self.candidate_holds(item_id, now).await?;
        let mut permitted = 0;
        for hold in &candidates {
            if self.hold_permit.permitted(&hold.permit_request(item_id)).await? {
                permitted += 1;
            }
        }
        debug!(item_id, candidates = candidates.len(), permitted, "resolved blocking holds");
        Ok(permitted)
    }
}
