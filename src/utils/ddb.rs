use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection, ProjectionType, ProvisionedThroughput, ScalarAttributeType, TableStatus};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::RepositoryStore;
use crate::utils::date::{format_date, parse_date};

pub(crate) async fn create_table(client: &Client,
                                 table_name: &str, pk: &str,
                                 gsi_pk: &str, gsi_sk: &str) -> LibraryResult<()> {
    create_table_with_sort_key(client, table_name, pk, None, gsi_pk, gsi_sk).await
}

// tables holding several rows per partition (e.g. one per policy outcome) add a sort key
pub(crate) async fn create_table_with_sort_key(client: &Client,
                                               table_name: &str, pk: &str, sk: Option<&str>,
                                               gsi_pk: &str, gsi_sk: &str) -> LibraryResult<()> {
    let gsi = GlobalSecondaryIndex::builder()
        .index_name(format!("{}_ndx", table_name))
        .key_schema(KeySchemaElement::builder()
            .attribute_name(gsi_pk)
            .key_type(KeyType::Hash).build())
        .key_schema(KeySchemaElement::builder()
            .attribute_name(gsi_sk)
            .key_type(KeyType::Range).build())
        .projection(Projection::builder().projection_type(ProjectionType::All).build())
        .provisioned_throughput(
            ProvisionedThroughput::builder().read_capacity_units(10).write_capacity_units(10).build())
        .build();

    let mut request = client
        .create_table()
        .table_name(table_name)
        .global_secondary_indexes(gsi)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(pk)
                .key_type(KeyType::Hash)
                .build(),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(10)
                .write_capacity_units(10)
                .build(),
        );
    if let Some(sk) = sk {
        request = request.key_schema(
            KeySchemaElement::builder()
                .attribute_name(sk)
                .key_type(KeyType::Range)
                .build(),
        );
    }
    for attr in key_attributes(pk, sk, gsi_pk, gsi_sk) {
        request = request.attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(attr)
                .attribute_type(ScalarAttributeType::S)
                .build(),
        );
    }

    match request.send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Creating).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::data_source_or_unavailable(format!("failed to create {} table due to {}",
                                                                 table_name, err).as_str(), None, false))
        }
    }
}

// the primary key may double as the index sort key (e.g. hold_id)
fn key_attributes<'a>(pk: &'a str, sk: Option<&'a str>, gsi_pk: &'a str, gsi_sk: &'a str) -> Vec<&'a str> {
    let mut defined: Vec<&str> = vec![];
    for attr in [Some(pk), sk, Some(gsi_pk), Some(gsi_sk)].into_iter().flatten() {
        if !defined.contains(&attr) {
            defined.push(attr);
        }
    }
    defined
}

async fn wait_until_table_status_is_not(client: &Client, table_name: &str, other_status: TableStatus) {
    for _i in 0..30 {
        if let Ok(status) = describe_table(client, table_name).await {
            if status != other_status {
                return;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn describe_table(client: &Client, table_name: &str) -> LibraryResult<TableStatus> {
    match client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
    {
        Ok(out) => {
            if let Some(table) = out.table() {
                if let Some(status) = table.table_status() {
                    return Ok(status.clone());
                }
            }
            Err(LibraryError::runtime(format!("failed to describe {} table",
                                              table_name).as_str(), None))
        }
        Err(err) => {
            Err(LibraryError::data_source_or_unavailable(format!("failed to describe {} table due to {}",
                                                                 table_name, err).as_str(), None, false))
        }
    }
}

// query_all reads every item matching `key_name = key_value`, following
// LastEvaluatedKey until the table reports no further page.
pub(crate) async fn query_all(client: &Client, table_name: &str, index_name: Option<&str>,
                              key_name: &str, key_value: &str) -> LibraryResult<Vec<HashMap<String, AttributeValue>>> {
    let mut items = vec![];
    let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
    loop {
        let res = client
            .query()
            .table_name(table_name)
            .set_index_name(index_name.map(str::to_string))
            .consistent_read(index_name.is_none())
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", key_name)
            .expression_attribute_values(":pk", AttributeValue::S(key_value.to_string()))
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await.map_err(LibraryError::from)?;
        exclusive_start_key = res.last_evaluated_key().cloned();
        items.extend(res.items.unwrap_or_default());
        if exclusive_start_key.is_none() {
            break;
        }
    }
    Ok(items)
}

pub(crate) fn parse_string_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<String> {
    if let Some(AttributeValue::S(str)) = map.get(name) {
        if !str.is_empty() {
            return Some(str.clone());
        }
    }
    None
}

pub(crate) fn parse_bool_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> bool {
    if let Some(AttributeValue::Bool(b)) = map.get(name) {
        return *b;
    }
    false
}

pub(crate) fn parse_date_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<NaiveDateTime> {
    if let Some(AttributeValue::S(str)) = map.get(name) {
        // e.g. 2022-09-24T04:40:35.726029
        return parse_date(str);
    }
    None
}

pub(crate) fn string_date(date: NaiveDateTime) -> AttributeValue {
    AttributeValue::S(format_date(date))
}

pub(crate) fn parse_number_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> i64 {
    if let Some(AttributeValue::N(str)) = map.get(name) {
        if let Ok(n) = str.parse::<i64>() {
            return n;
        }
    }
    0
}

// money is stored as a number or a string, e.g. "12.50"
pub(crate) fn parse_decimal_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<Decimal> {
    match map.get(name) {
        Some(AttributeValue::N(str)) | Some(AttributeValue::S(str)) => Decimal::from_str(str).ok(),
        _ => None,
    }
}

pub(crate) fn to_ddb_page(page: Option<&str>,
                          predicate: &HashMap<String, String>) -> Option<HashMap<String, AttributeValue>> {
    if let Some(page) = page {
        if let Ok(str_map) = serde_json::from_str::<HashMap<String, String>>(page) {
            let mut attr_map = HashMap::new();
            for (k, v) in str_map {
                attr_map.insert(k, AttributeValue::S(v));
            }
            for (k, v) in predicate {
                attr_map.insert(k.to_string(), AttributeValue::S(v.to_string()));
            }
            return Some(attr_map);
        }
    }
    None
}

pub(crate) fn from_ddb<T>(page: Option<&str>, page_size: usize,
                          last_evaluated_key: Option<&HashMap<String, AttributeValue>>,
                          records: Vec<T>) -> PaginatedResult<T> {
    let mut next_page: Option<String> = None;
    if let Some(attr_map) = last_evaluated_key {
        let mut str_map = HashMap::new();
        for (k, v) in attr_map {
            if let AttributeValue::S(val) = v {
                str_map.insert(k.clone(), val.to_string());
            }
        }
        if let Ok(j) = serde_json::to_string(&str_map) {
            next_page = Some(j);
        }
    }
    PaginatedResult::new(page, page_size, next_page, records)
}

// helper method to build db-client with tracing enabled
pub async fn build_db_client(store: RepositoryStore) -> Client {
    match store {
        RepositoryStore::DynamoDB => {
            //Get config from environment.
            let config = aws_config::load_from_env().await;
            //Create the DynamoDB client.
            Client::new(&config)
        }
        RepositoryStore::LocalDynamoDB => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let dynamodb_local_config = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(
                    Credentials::new("AKIDLOCALSTACK", "localstacksecret", None, None, "faked"))
                .endpoint_url("http://localhost:8000")
                .build();
            Client::from_conf(dynamodb_local_config)
        }
    }
}

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .json()
        .init();
}

impl From<SdkError<QueryError>> for LibraryError {
    fn from(err: SdkError<QueryError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::data_source_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => { (false, Some("ConstructionFailure".to_string())) }
        SdkError::TimeoutError(_) => { (true, Some("TimeoutError".to_string())) }
        SdkError::DispatchFailure(_) => { (true, Some("DispatchFailure".to_string())) }
        SdkError::ResponseError { .. } => { (true, Some("ResponseError".to_string())) }
        SdkError::ServiceError(ctx) => {
            (ctx.raw().http().status().is_server_error() || has_exceeded_limit(ctx.raw().http().body().bytes()), Some(ctx.raw().http().status().to_string()))
        }
        _ => { (true, Some("Unknown".to_string())) }
    }
}

// throughput and request limit errors carry "...Exceeded..." in the body
fn has_exceeded_limit(opts: Option<&[u8]>) -> bool {
    if let Some(b) = opts {
        return b.windows(6).any(|w| w == b"ceeded");
    }
    false
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::str::FromStr;
    use aws_sdk_dynamodb::types::AttributeValue;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use crate::utils::ddb::{from_ddb, has_exceeded_limit, key_attributes, parse_bool_attribute, parse_date_attribute, parse_decimal_attribute, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

    #[tokio::test]
    async fn test_should_parse_attributes() {
        let due = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap().and_hms_opt(17, 0, 0).unwrap();
        let map = HashMap::from([
            ("loan_id".to_string(), AttributeValue::S("L1".to_string())),
            ("returned_at".to_string(), AttributeValue::S("".to_string())),
            ("due_at".to_string(), string_date(due)),
            ("renewals_remaining".to_string(), AttributeValue::N("2".to_string())),
            ("balance_owed".to_string(), AttributeValue::N("12.50".to_string())),
            ("deleted".to_string(), AttributeValue::Bool(true)),
        ]);
        assert_eq!(Some("L1".to_string()), parse_string_attribute("loan_id", &map));
        assert_eq!(None, parse_string_attribute("returned_at", &map));
        assert_eq!(None, parse_date_attribute("returned_at", &map));
        assert_eq!(Some(due), parse_date_attribute("due_at", &map));
        assert_eq!(2, parse_number_attribute("renewals_remaining", &map));
        assert_eq!(0, parse_number_attribute("missing", &map));
        assert_eq!(Some(Decimal::from_str("12.50").unwrap()), parse_decimal_attribute("balance_owed", &map));
        assert!(parse_bool_attribute("deleted", &map));
        assert!(!parse_bool_attribute("missing", &map));
    }

    #[tokio::test]
    async fn test_should_round_trip_page_token() {
        let key = HashMap::from([("loan_id".to_string(), AttributeValue::S("L9".to_string()))]);
        let page = from_ddb(None, 10, Some(&key), Vec::<String>::new());
        let token = page.next_page.expect("should have next page");
        let predicate = HashMap::from([("org_unit_id".to_string(), "BR1".to_string())]);
        let start = to_ddb_page(Some(token.as_str()), &predicate).expect("should parse token");
        assert_eq!(Some(&AttributeValue::S("L9".to_string())), start.get("loan_id"));
        assert_eq!(Some(&AttributeValue::S("BR1".to_string())), start.get("org_unit_id"));
        assert!(from_ddb(None, 10, None, Vec::<String>::new()).next_page.is_none());
    }

    #[tokio::test]
    async fn test_should_detect_exceeded_limit() {
        assert!(has_exceeded_limit(Some(b"ProvisionedThroughputExceededException")));
        assert!(!has_exceeded_limit(Some(b"short")));
        assert!(!has_exceeded_limit(None));
    }

    #[tokio::test]
    async fn test_should_define_each_key_attribute_once() {
        assert_eq!(vec!["hold_id", "item_id"], key_attributes("hold_id", None, "item_id", "hold_id"));
        assert_eq!(vec!["policy_key", "outcome_id", "org_unit_id", "item_id"],
                   key_attributes("policy_key", Some("outcome_id"), "org_unit_id", "item_id"));
    }
}
