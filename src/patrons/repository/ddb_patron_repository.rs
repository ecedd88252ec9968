use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;
use crate::utils::ddb::{parse_bool_attribute, parse_number_attribute, parse_string_attribute, query_all};

#[derive(Debug)]
pub struct DDBPatronRepository {
    client: Client,
    table_name: String,
}

impl DDBPatronRepository {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<PatronEntity> for DDBPatronRepository {
    async fn get(&self, id: &str) -> LibraryResult<PatronEntity> {
        let items = query_all(&self.client, self.table_name.as_str(), None, "patron_id", id).await?;
        if items.len() > 1 {
            return Err(LibraryError::data_source(format!("too many patrons for {}", id).as_str(), None, false));
        }
        items.first()
            .map(PatronEntity::from)
            .ok_or_else(|| LibraryError::not_found(format!("patron not found for {}", id).as_str()))
    }
}

impl PatronRepository for DDBPatronRepository {}

impl From<&HashMap<String, AttributeValue>> for PatronEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        PatronEntity {
            patron_id: parse_string_attribute("patron_id", map).unwrap_or(String::from("")),
            version: parse_number_attribute("version", map),
            home_org_unit_id: parse_string_attribute("home_org_unit_id", map).unwrap_or(String::from("")),
            deleted: parse_bool_attribute("deleted", map),
            sms_opt_in: parse_bool_attribute("sms_opt_in", map),
            notify_channels: parse_string_attribute("notify_channels", map).unwrap_or(String::from("")),
            sms_number: parse_string_attribute("sms_number", map),
        }
    }
}
