use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::warn;

use crate::core::library::{LibraryResult, PenaltyCode};
use crate::fines::domain::model::{BalanceEntity, PenaltyThresholdEntity};
use crate::fines::repository::{BalanceRepository, ThresholdRepository};
use crate::utils::ddb::{parse_decimal_attribute, parse_string_attribute, query_all};

#[derive(Debug)]
pub struct DDBThresholdRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBThresholdRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl ThresholdRepository for DDBThresholdRepository {
    async fn find_thresholds(&self, org_unit_id: &str, penalty: PenaltyCode) -> LibraryResult<Vec<PenaltyThresholdEntity>> {
        let items = query_all(&self.client, self.table_name.as_str(), Some(self.index_name.as_str()),
                              "org_unit_id", org_unit_id).await?;
        Ok(items.iter()
            .filter_map(PenaltyThresholdEntity::from_item)
            .filter(|row| row.penalty == penalty)
            .collect())
    }
}

#[derive(Debug)]
pub struct DDBBalanceRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBBalanceRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl BalanceRepository for DDBBalanceRepository {
    async fn find_balances(&self, patron_id: &str) -> LibraryResult<Vec<BalanceEntity>> {
        let items = query_all(&self.client, self.table_name.as_str(), Some(self.index_name.as_str()),
                              "patron_id", patron_id).await?;
        Ok(items.iter().filter_map(BalanceEntity::from_item).collect())
    }
}

impl PenaltyThresholdEntity {
    // rows without a numeric threshold carry no limit and are skipped
    fn from_item(map: &HashMap<String, AttributeValue>) -> Option<PenaltyThresholdEntity> {
        let threshold = parse_decimal_attribute("threshold", map)?;
        Some(PenaltyThresholdEntity {
            threshold_id: parse_string_attribute("threshold_id", map).unwrap_or(String::from("")),
            org_unit_id: parse_string_attribute("org_unit_id", map).unwrap_or(String::from("")),
            penalty: PenaltyCode::from(parse_string_attribute("penalty", map).unwrap_or(String::from(""))),
            grant_group: parse_string_attribute("grant_group", map).unwrap_or(String::from("")),
            threshold,
        })
    }
}

impl BalanceEntity {
    // an unreadable balance is logged and skipped rather than counted as zero
    fn from_item(map: &HashMap<String, AttributeValue>) -> Option<BalanceEntity> {
        let xact_id = parse_string_attribute("xact_id", map).unwrap_or(String::from(""));
        let Some(balance_owed) = parse_decimal_attribute("balance_owed", map) else {
            warn!(xact_id = xact_id.as_str(), "skipping balance row without a readable balance_owed");
            return None;
        };
        Some(BalanceEntity {
            xact_id,
            patron_id: parse_string_attribute("patron_id", map).unwrap_or(String::from("")),
            balance_owed,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use aws_sdk_dynamodb::types::AttributeValue;
    use rust_decimal::Decimal;
    use crate::core::library::PenaltyCode;
    use crate::fines::domain::model::{BalanceEntity, PenaltyThresholdEntity};

    #[tokio::test]
    async fn test_should_parse_threshold_item() {
        let map = HashMap::from([
            ("threshold_id".to_string(), AttributeValue::S("T1".to_string())),
            ("org_unit_id".to_string(), AttributeValue::S("BR1".to_string())),
            ("penalty".to_string(), AttributeValue::S("PATRON_EXCEEDS_FINES".to_string())),
            ("grant_group".to_string(), AttributeValue::S("Patron".to_string())),
            ("threshold".to_string(), AttributeValue::N("10.00".to_string())),
        ]);
        let row = PenaltyThresholdEntity::from_item(&map).expect("should parse threshold");
        assert_eq!(PenaltyCode::ExceedsFines, row.penalty);
        assert_eq!(Decimal::new(10, 0), row.threshold);
    }

    #[tokio::test]
    async fn test_should_skip_threshold_without_value() {
        let map = HashMap::from([
            ("org_unit_id".to_string(), AttributeValue::S("BR1".to_string())),
            ("penalty".to_string(), AttributeValue::S("PATRON_EXCEEDS_FINES".to_string())),
        ]);
        assert!(PenaltyThresholdEntity::from_item(&map).is_none());
    }

    #[tokio::test]
    async fn test_should_parse_balance_item() {
        let map = HashMap::from([
            ("xact_id".to_string(), AttributeValue::S("X1".to_string())),
            ("patron_id".to_string(), AttributeValue::S("P1".to_string())),
            ("balance_owed".to_string(), AttributeValue::N("-2.25".to_string())),
        ]);
        let balance = BalanceEntity::from_item(&map).expect("should parse balance");
        assert_eq!(Decimal::new(-225, 2), balance.balance_owed);
    }

    #[tokio::test]
    async fn test_should_skip_unreadable_balance() {
        let garbled = HashMap::from([
            ("xact_id".to_string(), AttributeValue::S("X2".to_string())),
            ("patron_id".to_string(), AttributeValue::S("P1".to_string())),
            ("balance_owed".to_string(), AttributeValue::N("twelve".to_string())),
        ]);
        assert!(BalanceEntity::from_item(&garbled).is_none());
        let missing = HashMap::from([
            ("xact_id".to_string(), AttributeValue::S("X3".to_string())),
            ("patron_id".to_string(), AttributeValue::S("P1".to_string())),
        ]);
        assert!(BalanceEntity::from_item(&missing).is_none());
    }
}
