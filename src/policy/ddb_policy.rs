use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::core::library::LibraryResult;
use crate::policy::{HoldPermit, HoldPermitRequest, PolicyOutcome, RenewalPolicy};
use crate::utils::ddb::{parse_bool_attribute, parse_string_attribute, query_all};

// Policy and permit decisions exported by the circulation system. Rows are
// partitioned by a key built from the test inputs and sorted by `outcome_id`,
// so one test keeps every outcome it produced. A missing row is a test that
// produced no result.

pub(crate) fn policy_key(org_unit_id: &str, item_id: &str, patron_id: &str) -> String {
    format!("{}#{}#{}", org_unit_id, item_id, patron_id)
}

pub(crate) fn permit_key(request: &HoldPermitRequest) -> String {
    format!("{}#{}#{}#{}#{}", request.pickup_org_unit_id, request.request_org_unit_id,
            request.item_id, request.patron_id, request.requestor_id)
}

#[derive(Debug)]
pub struct DDBRenewalPolicy {
    client: Client,
    table_name: String,
}

impl DDBRenewalPolicy {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl RenewalPolicy for DDBRenewalPolicy {
    async fn test(&self, org_unit_id: &str, item_id: &str, patron_id: &str) -> LibraryResult<Vec<PolicyOutcome>> {
        let key = policy_key(org_unit_id, item_id, patron_id);
        let items = query_all(&self.client, self.table_name.as_str(), None, "policy_key", key.as_str()).await?;
        Ok(items.iter().map(PolicyOutcome::from).collect())
    }
}

#[derive(Debug)]
pub struct DDBHoldPermit {
    client: Client,
    table_name: String,
}

impl DDBHoldPermit {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl HoldPermit for DDBHoldPermit {
    async fn permitted(&self, request: &HoldPermitRequest) -> LibraryResult<bool> {
        let key = permit_key(request);
        let items = query_all(&self.client, self.table_name.as_str(), None, "permit_key", key.as_str()).await?;
        Ok(all_permitted(&items))
    }
}

// every stored outcome must permit the hold; no outcome means no permit
pub(crate) fn all_permitted(items: &[HashMap<String, AttributeValue>]) -> bool {
    !items.is_empty() && items.iter().all(|item| parse_bool_attribute("permitted", item))
}

impl From<&HashMap<String, AttributeValue>> for PolicyOutcome {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        PolicyOutcome {
            success: parse_bool_attribute("success", map),
            fail_part: parse_string_attribute("fail_part", map),
        }
    }
}
