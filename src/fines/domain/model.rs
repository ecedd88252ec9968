use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::library::PenaltyCode;

// PenaltyThresholdEntity is one configured limit for a penalty class at an
// org unit. An org unit may carry several rows, one per grant group.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PenaltyThresholdEntity {
    pub threshold_id: String,
    pub org_unit_id: String,
    pub penalty: PenaltyCode,
    pub grant_group: String,
    pub threshold: Decimal,
}

impl PenaltyThresholdEntity {
    pub fn new(org_unit_id: &str, grant_group: &str, threshold: Decimal) -> Self {
        Self {
            threshold_id: Uuid::new_v4().to_string(),
            org_unit_id: org_unit_id.to_string(),
            penalty: PenaltyCode::ExceedsFines,
            grant_group: grant_group.to_string(),
            threshold,
        }
    }
}

// BalanceEntity is the outstanding balance of one billable transaction.
// Negative balances are credits.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BalanceEntity {
    pub xact_id: String,
    pub patron_id: String,
    pub balance_owed: Decimal,
}

impl BalanceEntity {
    pub fn new(patron_id: &str, balance_owed: Decimal) -> Self {
        Self {
            xact_id: Uuid::new_v4().to_string(),
            patron_id: patron_id.to_string(),
            balance_owed,
        }
    }
}
