use std::collections::BTreeMap;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::library::RenewalGate;
use crate::loans::domain::model::LoanEntity;
use crate::renewal::domain::gates::Verdict;
use crate::utils::date::serializer;

// DecisionDto is the renewal verdict for one loan along with the diagnostics behind it
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DecisionDto {
    pub loan_id: String,
    pub patron_id: String,
    pub item_id: String,
    pub org_unit_id: String,
    #[serde(with = "serializer")]
    pub due_at: NaiveDateTime,
    pub fines_over_threshold: Decimal,
    pub blocking_holds: i64,
    pub renewals_remaining: i64,
    pub blocked_by: Option<RenewalGate>,
}

impl DecisionDto {
    pub fn new(loan: &LoanEntity, fines_over_threshold: Decimal, blocking_holds: i64, verdict: Verdict) -> Self {
        Self {
            loan_id: loan.loan_id.to_string(),
            patron_id: loan.patron_id.to_string(),
            item_id: loan.item_id.to_string(),
            org_unit_id: loan.org_unit_id.to_string(),
            due_at: loan.due_at,
            fines_over_threshold,
            blocking_holds,
            renewals_remaining: verdict.renewals_remaining,
            blocked_by: verdict.blocked_by,
        }
    }

    pub fn is_renewable(&self) -> bool {
        self.renewals_remaining > 0
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct RenewalSummary {
    pub evaluated: usize,
    pub eligible: usize,
    pub blocked: usize,
    // blocked loans per first failing gate
    pub blocked_by: BTreeMap<String, usize>,
}

impl RenewalSummary {
    pub fn from_decisions(decisions: &[DecisionDto]) -> Self {
        let mut summary = RenewalSummary::default();
        for decision in decisions {
            summary.evaluated += 1;
            match decision.blocked_by {
                Some(gate) => {
                    summary.blocked += 1;
                    *summary.blocked_by.entry(gate.to_string()).or_insert(0) += 1;
                }
                None => summary.eligible += 1,
            }
        }
        summary
    }
}
