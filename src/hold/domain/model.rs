use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::policy::HoldPermitRequest;
use crate::utils::date::{opt_serializer, serializer};

// HoldEntity abstracts a request reserving an item for pickup
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HoldEntity {
    pub hold_id: String,
    pub version: i64,
    pub pickup_org_unit_id: String,
    pub request_org_unit_id: String,
    pub patron_id: String,
    pub requestor_id: String,
    pub current_copy: Option<String>,
    #[serde(with = "serializer")]
    pub hold_at: NaiveDateTime,
    #[serde(with = "opt_serializer", default)]
    pub cancelled_at: Option<NaiveDateTime>,
    #[serde(with = "opt_serializer", default)]
    pub fulfilled_at: Option<NaiveDateTime>,
    pub frozen: bool,
    #[serde(with = "opt_serializer", default)]
    pub thaw_at: Option<NaiveDateTime>,
    #[serde(with = "opt_serializer", default)]
    pub expires_at: Option<NaiveDateTime>,
}

impl HoldEntity {
    pub fn new(org_unit_id: &str, patron_id: &str) -> Self {
        Self {
            hold_id: Uuid::new_v4().to_string(),
            version: 0,
            pickup_org_unit_id: org_unit_id.to_string(),
            request_org_unit_id: org_unit_id.to_string(),
            patron_id: patron_id.to_string(),
            requestor_id: patron_id.to_string(),
            current_copy: None,
            hold_at: Utc::now().naive_utc(),
            cancelled_at: None,
            fulfilled_at: None,
            frozen: false,
            thaw_at: None,
            expires_at: Some(Utc::now().naive_utc() + Duration::days(180)),
        }
    }

    // a frozen hold counts again once its thaw date has passed
    pub fn is_thawed(&self, now: NaiveDateTime) -> bool {
        !self.frozen || self.thaw_at.map(|thaw_at| thaw_at <= now).unwrap_or(false)
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at.map(|expires_at| expires_at <= now).unwrap_or(false)
    }

    pub fn is_candidate(&self, now: NaiveDateTime) -> bool {
        self.cancelled_at.is_none() && self.fulfilled_at.is_none()
            && self.is_thawed(now) && !self.is_expired(now)
    }

    pub fn permit_request(&self, item_id: &str) -> HoldPermitRequest {
        HoldPermitRequest {
            pickup_org_unit_id: self.pickup_org_unit_id.to_string(),
            request_org_unit_id: self.request_org_unit_id.to_string(),
            item_id: item_id.to_string(),
            patron_id: self.patron_id.to_string(),
            requestor_id: self.requestor_id.to_string(),
        }
    }
}

impl Identifiable for HoldEntity {
    fn id(&self) -> String {
        self.hold_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

// HoldCopyMapEntity links a hold to one of the items that could fill it
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HoldCopyMapEntity {
    pub map_id: String,
    pub hold_id: String,
    pub item_id: String,
}

impl HoldCopyMapEntity {
    pub fn new(hold_id: &str, item_id: &str) -> Self {
        Self {
            map_id: Uuid::new_v4().to_string(),
            hold_id: hold_id.to_string(),
            item_id: item_id.to_string(),
        }
    }
}
