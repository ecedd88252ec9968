use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::patrons::Patron;

// PatronEntity abstracts the borrower and the notification settings that put
// them in scope for SMS courtesy notices.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PatronEntity {
    pub patron_id: String,
    pub version: i64,
    pub home_org_unit_id: String,
    pub deleted: bool,
    pub sms_opt_in: bool,
    // e.g. "email:sms" or "phone,sms"
    pub notify_channels: String,
    pub sms_number: Option<String>,
}

impl PatronEntity {
    pub fn new(home_org_unit_id: &str) -> Self {
        Self {
            patron_id: Uuid::new_v4().to_string(),
            version: 0,
            home_org_unit_id: home_org_unit_id.to_string(),
            deleted: false,
            sms_opt_in: true,
            notify_channels: "sms".to_string(),
            sms_number: None,
        }
    }
}

impl Identifiable for PatronEntity {
    fn id(&self) -> String {
        self.patron_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Patron for PatronEntity {
    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn is_sms_opted_in(&self) -> bool {
        self.sms_opt_in
    }

    fn prefers_channel(&self, channel: &str) -> bool {
        self.notify_channels.to_lowercase().contains(channel)
    }
}
