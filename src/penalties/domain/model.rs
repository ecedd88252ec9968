use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::library::PenaltyCode;
use crate::utils::date::{opt_serializer, serializer};

// StandingPenaltyEntity is a persistent flag on a patron restricting circulation
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StandingPenaltyEntity {
    pub penalty_id: String,
    pub patron_id: String,
    pub org_unit_id: String,
    pub penalty: PenaltyCode,
    #[serde(with = "serializer")]
    pub set_at: NaiveDateTime,
    #[serde(with = "opt_serializer", default)]
    pub stop_at: Option<NaiveDateTime>,
}

impl StandingPenaltyEntity {
    pub fn new(patron_id: &str, penalty: PenaltyCode) -> Self {
        Self {
            penalty_id: Uuid::new_v4().to_string(),
            patron_id: patron_id.to_string(),
            org_unit_id: "".to_string(),
            penalty,
            set_at: Utc::now().naive_utc(),
            stop_at: None,
        }
    }

    // a penalty stopping exactly at `now` has already lapsed
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        match self.stop_at {
            Some(stop_at) => stop_at > now,
            None => true,
        }
    }
}
