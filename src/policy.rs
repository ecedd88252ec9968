//! Capabilities the engine borrows from the circulation system.
//!
//! Both predicates are opaque: the renewal policy test and the hold permit
//! test belong to the integrated library system and are only invoked here,
//! never reimplemented.

pub mod ddb_policy;
pub mod factory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;

/// One row produced by the renewal policy test.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PolicyOutcome {
    pub success: bool,
    pub fail_part: Option<String>,
}

impl PolicyOutcome {
    pub fn success() -> Self {
        PolicyOutcome { success: true, fail_part: None }
    }

    pub fn failure(fail_part: &str) -> Self {
        PolicyOutcome { success: false, fail_part: Some(fail_part.to_string()) }
    }
}

/// Basic renewal policy test for a lending org unit, item and patron.
#[async_trait]
pub trait RenewalPolicy: Sync + Send {
    async fn test(&self, org_unit_id: &str, item_id: &str, patron_id: &str) -> LibraryResult<Vec<PolicyOutcome>>;
}

/// Reduces the test output to one verdict: no rows, or any failing row, fails.
pub fn policy_success(outcomes: &[PolicyOutcome]) -> bool {
    !outcomes.is_empty() && outcomes.iter().all(|o| o.success)
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct HoldPermitRequest {
    pub pickup_org_unit_id: String,
    pub request_org_unit_id: String,
    pub item_id: String,
    pub patron_id: String,
    pub requestor_id: String,
}

/// Decides whether a hold may be retargeted to the item. Assumed expensive.
#[async_trait]
pub trait HoldPermit: Sync + Send {
    async fn permitted(&self, request: &HoldPermitRequest) -> LibraryResult<bool>;
}
