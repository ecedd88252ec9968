use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::core::library::LibraryResult;

pub mod model;
pub mod service;

#[async_trait]
pub trait FineThresholdResolver: Sync + Send {
    // largest "exceeds fines" threshold configured for the org unit, if any
    async fn threshold(&self, org_unit_id: &str) -> LibraryResult<Option<Decimal>>;

    // sum of the patron's positive balances, credits are not netted
    async fn total_fines(&self, patron_id: &str) -> LibraryResult<Decimal>;
}

// amount owed beyond the threshold, zero when the org unit has no threshold
pub fn fines_over_threshold(total_fines: Decimal, threshold: Option<Decimal>) -> Decimal {
    match threshold {
        Some(limit) => (total_fines - limit).max(Decimal::ZERO),
        None => Decimal::ZERO,
    }
}
