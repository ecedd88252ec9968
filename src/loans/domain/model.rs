use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::{opt_serializer, serializer};

// LoanEntity abstracts one circulation transaction, an item lent to a patron
// by an org unit.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanEntity {
    pub loan_id: String,
    pub version: i64,
    pub patron_id: String,
    pub org_unit_id: String,
    pub item_id: String,
    #[serde(with = "serializer")]
    pub due_at: NaiveDateTime,
    pub renewals_remaining: i64,
    #[serde(with = "opt_serializer", default)]
    pub returned_at: Option<NaiveDateTime>,
    #[serde(with = "opt_serializer", default)]
    pub closed_at: Option<NaiveDateTime>,
}

impl LoanEntity {
    pub fn new(org_unit_id: &str, item_id: &str, patron_id: &str) -> Self {
        Self {
            loan_id: Uuid::new_v4().to_string(),
            version: 0,
            patron_id: patron_id.to_string(),
            org_unit_id: org_unit_id.to_string(),
            item_id: item_id.to_string(),
            due_at: Utc::now().naive_utc() + Duration::days(1),
            renewals_remaining: 2,
            returned_at: None,
            closed_at: None,
        }
    }

    // a loan is open until it is either returned or closed out
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none() && self.closed_at.is_none()
    }
}

impl Identifiable for LoanEntity {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::loans::domain::model::LoanEntity;

    #[tokio::test]
    async fn test_should_build_loan() {
        let loan = LoanEntity::new("BR1", "item1", "patron1");
        assert_eq!("item1", loan.item_id.as_str());
        assert_eq!("patron1", loan.patron_id.as_str());
        assert!(loan.is_open());
    }

    #[tokio::test]
    async fn test_should_close_loan() {
        let mut loan = LoanEntity::new("BR1", "item1", "patron1");
        loan.closed_at = Some(Utc::now().naive_utc());
        assert!(!loan.is_open());
        loan.closed_at = None;
        loan.returned_at = Some(Utc::now().naive_utc());
        assert!(!loan.is_open());
    }

    #[tokio::test]
    async fn test_should_serialize_open_loan() {
        let loan = LoanEntity::new("BR1", "item1", "patron1");
        let json = serde_json::to_string(&loan).expect("should serialize");
        let loaded: LoanEntity = serde_json::from_str(json.as_str()).expect("should deserialize");
        assert_eq!(loan.loan_id, loaded.loan_id);
        assert_eq!(None, loaded.returned_at);
    }
}
