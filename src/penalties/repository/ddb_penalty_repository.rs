use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::core::library::{LibraryResult, PenaltyCode};
use crate::penalties::domain::model::StandingPenaltyEntity;
use crate::penalties::repository::StandingPenaltyRepository;
use crate::utils::ddb::{parse_date_attribute, parse_string_attribute, query_all};

#[derive(Debug)]
pub struct DDBStandingPenaltyRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBStandingPenaltyRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl StandingPenaltyRepository for DDBStandingPenaltyRepository {
    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<StandingPenaltyEntity>> {
        let items = query_all(&self.client, self.table_name.as_str(), Some(self.index_name.as_str()),
                              "patron_id", patron_id).await?;
        Ok(items.iter().map(StandingPenaltyEntity::from).collect())
    }
}

impl From<&HashMap<String, AttributeValue>> for StandingPenaltyEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        StandingPenaltyEntity {
            penalty_id: parse_string_attribute("penalty_id", map).unwrap_or(String::from("")),
            patron_id: parse_string_attribute("patron_id", map).unwrap_or(String::from("")),
            org_unit_id: parse_string_attribute("org_unit_id", map).unwrap_or(String::from("")),
            penalty: PenaltyCode::from(parse_string_attribute("penalty", map).unwrap_or(String::from(""))),
            set_at: parse_date_attribute("set_at", map).unwrap_or(Utc::now().naive_utc()),
            stop_at: parse_date_attribute("stop_at", map),
        }
    }
}
