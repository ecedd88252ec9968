use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::hold::domain::model::{HoldCopyMapEntity, HoldEntity};
use crate::hold::repository::HoldRepository;
use crate::utils::ddb::{parse_bool_attribute, parse_date_attribute, parse_number_attribute, parse_string_attribute, query_all};

#[derive(Debug)]
pub struct DDBHoldRepository {
    client: Client,
    table_name: String,
    index_name: String,
    map_table_name: String,
    map_index_name: String,
}

impl DDBHoldRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str,
                      map_table_name: &str, map_index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
            map_table_name: map_table_name.to_string(),
            map_index_name: map_index_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<HoldEntity> for DDBHoldRepository {
    async fn get(&self, id: &str) -> LibraryResult<HoldEntity> {
        let items = query_all(&self.client, self.table_name.as_str(), None, "hold_id", id).await?;
        if items.len() > 1 {
            return Err(LibraryError::data_source(format!("too many holds for {}", id).as_str(), None, false));
        }
        items.first()
            .map(HoldEntity::from)
            .ok_or_else(|| LibraryError::not_found(format!("hold not found for {}", id).as_str()))
    }
}

#[async_trait]
impl HoldRepository for DDBHoldRepository {
    async fn find_by_current_copy(&self, item_id: &str) -> LibraryResult<Vec<HoldEntity>> {
        let items = query_all(&self.client, self.table_name.as_str(), Some(self.index_name.as_str()),
                              "current_copy", item_id).await?;
        Ok(items.iter().map(HoldEntity::from).collect())
    }

    async fn find_by_copy_map(&self, item_id: &str) -> LibraryResult<Vec<HoldEntity>> {
        let items = query_all(&self.client, self.map_table_name.as_str(), Some(self.map_index_name.as_str()),
                              "item_id", item_id).await?;
        let mut holds = vec![];
        for map in items.iter().map(HoldCopyMapEntity::from) {
            match self.get(map.hold_id.as_str()).await {
                Ok(hold) => holds.push(hold),
                // a map row can outlive its hold until the targeter cleans it up
                Err(LibraryError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(holds)
    }
}

impl From<&HashMap<String, AttributeValue>> for HoldEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        HoldEntity {
            hold_id: parse_string_attribute("hold_id", map).unwrap_or(String::from("")),
            version: parse_number_attribute("version", map),
            pickup_org_unit_id: parse_string_attribute("pickup_org_unit_id", map).unwrap_or(String::from("")),
            request_org_unit_id: parse_string_attribute("request_org_unit_id", map).unwrap_or(String::from("")),
            patron_id: parse_string_attribute("patron_id", map).unwrap_or(String::from("")),
            requestor_id: parse_string_attribute("requestor_id", map).unwrap_or(String::from("")),
            current_copy: parse_string_attribute("current_copy", map),
            hold_at: parse_date_attribute("hold_at", map).unwrap_or(Utc::now().naive_utc()),
            cancelled_at: parse_date_attribute("cancelled_at", map),
            fulfilled_at: parse_date_attribute("fulfilled_at", map),
            frozen: parse_bool_attribute("frozen", map),
            thaw_at: parse_date_attribute("thaw_at", map),
            expires_at: parse_date_attribute("expires_at", map),
        }
    }
}

impl From<&HashMap<String, AttributeValue>> for HoldCopyMapEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        HoldCopyMapEntity {
            map_id: parse_string_attribute("map_id", map).unwrap_or(String::from("")),
            hold_id: parse_string_attribute("hold_id", map).unwrap_or(String::from("")),
            item_id: parse_string_attribute("item_id", map).unwrap_or(String::from("")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use aws_sdk_dynamodb::types::AttributeValue;
    use chrono::NaiveDate;
    use crate::hold::domain::model::{HoldCopyMapEntity, HoldEntity};
    use crate::utils::ddb::string_date;

    #[tokio::test]
    async fn test_should_parse_hold_item() {
        let thaw = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let now = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let map = HashMap::from([
            ("hold_id".to_string(), AttributeValue::S("H1".to_string())),
            ("pickup_org_unit_id".to_string(), AttributeValue::S("BR1".to_string())),
            ("request_org_unit_id".to_string(), AttributeValue::S("BR2".to_string())),
            ("patron_id".to_string(), AttributeValue::S("P1".to_string())),
            ("requestor_id".to_string(), AttributeValue::S("P1".to_string())),
            ("current_copy".to_string(), AttributeValue::S("I1".to_string())),
            ("frozen".to_string(), AttributeValue::Bool(true)),
            ("thaw_at".to_string(), string_date(thaw)),
            ("cancelled_at".to_string(), AttributeValue::S("".to_string())),
        ]);
        let hold = HoldEntity::from(&map);
        assert_eq!(Some("I1".to_string()), hold.current_copy);
        assert_eq!(None, hold.cancelled_at);
        assert_eq!(None, hold.expires_at);
        assert!(hold.is_candidate(now));
    }

    #[tokio::test]
    async fn test_should_parse_copy_map_item() {
        let map = HashMap::from([
            ("map_id".to_string(), AttributeValue::S("M1".to_string())),
            ("hold_id".to_string(), AttributeValue::S("H1".to_string())),
            ("item_id".to_string(), AttributeValue::S("I1".to_string())),
        ]);
        let row = HoldCopyMapEntity::from(&map);
        assert_eq!("H1", row.hold_id.as_str());
        assert_eq!("I1", row.item_id.as_str());
    }
}
