use crate::core::domain::Identifiable;

pub mod domain;
pub mod factory;
pub mod repository;

pub trait Patron: Identifiable {
    fn is_deleted(&self) -> bool;
    fn is_sms_opted_in(&self) -> bool;
    fn prefers_channel(&self, channel: &str) -> bool;

    // only live patrons who opted in and list sms among their channels get courtesy notices
    fn is_sms_eligible(&self) -> bool {
        !self.is_deleted() && self.is_sms_opted_in() && self.prefers_channel("sms")
    }
}
