use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::warn;

use crate::core::domain::DueWindow;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::utils::ddb::{from_ddb, parse_date_attribute, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub struct DDBLoanRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBLoanRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl LoanRepository for DDBLoanRepository {
    // the index is keyed by (org_unit_id, due_at) so the window is a single range read
    async fn query_due(&self, org_unit_id: &str, window: &DueWindow,
                       page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let predicate = HashMap::from([("org_unit_id".to_string(), org_unit_id.to_string())]);
        let exclusive_start_key = to_ddb_page(page, &predicate);
        let (from, to) = window.bounds()?;
        self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .key_condition_expression("org_unit_id = :org_unit_id AND due_at BETWEEN :from AND :to")
            .expression_attribute_values(":org_unit_id", AttributeValue::S(org_unit_id.to_string()))
            .expression_attribute_values(":from", string_date(from))
            .expression_attribute_values(":to", string_date(to))
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .filter_map(LoanEntity::from_item).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

impl LoanEntity {
    // a row without a readable due date cannot be placed in any window and is skipped
    fn from_item(map: &HashMap<String, AttributeValue>) -> Option<LoanEntity> {
        let loan_id = parse_string_attribute("loan_id", map).unwrap_or(String::from(""));
        let Some(due_at) = parse_date_attribute("due_at", map) else {
            warn!(loan_id = loan_id.as_str(), "skipping loan row without a readable due_at");
            return None;
        };
        Some(LoanEntity {
            loan_id,
            version: parse_number_attribute("version", map),
            patron_id: parse_string_attribute("patron_id", map).unwrap_or(String::from("")),
            org_unit_id: parse_string_attribute("org_unit_id", map).unwrap_or(String::from("")),
            item_id: parse_string_attribute("item_id", map).unwrap_or(String::from("")),
            due_at,
            renewals_remaining: parse_number_attribute("renewals_remaining", map),
            returned_at: parse_date_attribute("returned_at", map),
            closed_at: parse_date_attribute("closed_at", map),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use aws_sdk_dynamodb::types::AttributeValue;
    use chrono::NaiveDate;
    use crate::loans::domain::model::LoanEntity;
    use crate::utils::ddb::string_date;

    #[tokio::test]
    async fn test_should_parse_open_loan_item() {
        let due = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap().and_hms_opt(23, 59, 59).unwrap();
        let map = HashMap::from([
            ("loan_id".to_string(), AttributeValue::S("L1".to_string())),
            ("patron_id".to_string(), AttributeValue::S("P1".to_string())),
            ("org_unit_id".to_string(), AttributeValue::S("BR1".to_string())),
            ("item_id".to_string(), AttributeValue::S("I1".to_string())),
            ("due_at".to_string(), string_date(due)),
            ("renewals_remaining".to_string(), AttributeValue::N("2".to_string())),
            ("returned_at".to_string(), AttributeValue::S("".to_string())),
        ]);
        let loan = LoanEntity::from_item(&map).expect("should parse loan");
        assert_eq!("L1", loan.loan_id.as_str());
        assert_eq!(due, loan.due_at);
        assert_eq!(2, loan.renewals_remaining);
        assert!(loan.is_open());
    }

    #[tokio::test]
    async fn test_should_parse_closed_loan_item() {
        let closed = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let map = HashMap::from([
            ("loan_id".to_string(), AttributeValue::S("L2".to_string())),
            ("due_at".to_string(), string_date(closed)),
            ("closed_at".to_string(), string_date(closed)),
        ]);
        let loan = LoanEntity::from_item(&map).expect("should parse loan");
        assert_eq!(Some(closed), loan.closed_at);
        assert!(!loan.is_open());
    }

    #[tokio::test]
    async fn test_should_skip_loan_without_due_date() {
        let missing = HashMap::from([
            ("loan_id".to_string(), AttributeValue::S("L3".to_string())),
            ("org_unit_id".to_string(), AttributeValue::S("BR1".to_string())),
        ]);
        assert!(LoanEntity::from_item(&missing).is_none());
        let garbled = HashMap::from([
            ("loan_id".to_string(), AttributeValue::S("L4".to_string())),
            ("due_at".to_string(), AttributeValue::S("next tuesday".to_string())),
        ]);
        assert!(LoanEntity::from_item(&garbled).is_none());
    }
}
