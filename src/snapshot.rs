//! Point-in-time circulation batch held in memory.
//!
//! `CirculationSnapshot` answers every repository and predicate trait the
//! engine reads through, so a caller that already extracted loans, patrons,
//! fines, penalties and holds can evaluate them without a database.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::domain::DueWindow;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult, PenaltyCode};
use crate::core::repository::Repository;
use crate::fines::domain::model::{BalanceEntity, PenaltyThresholdEntity};
use crate::fines::repository::{BalanceRepository, ThresholdRepository};
use crate::hold::domain::model::{HoldCopyMapEntity, HoldEntity};
use crate::hold::repository::HoldRepository;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;
use crate::penalties::domain::model::StandingPenaltyEntity;
use crate::penalties::repository::StandingPenaltyRepository;
use crate::policy::{HoldPermit, HoldPermitRequest, PolicyOutcome, RenewalPolicy};
use crate::policy::ddb_policy::policy_key;

/// Raw records of one batch. Loans and holds are ordered by id so pages and
/// results come back in a stable order.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    loans: BTreeMap<String, LoanEntity>,
    #[serde(default)]
    patrons: HashMap<String, PatronEntity>,
    #[serde(default)]
    thresholds: Vec<PenaltyThresholdEntity>,
    #[serde(default)]
    balances: Vec<BalanceEntity>,
    #[serde(default)]
    penalties: Vec<StandingPenaltyEntity>,
    #[serde(default)]
    holds: BTreeMap<String, HoldEntity>,
    #[serde(default)]
    copy_maps: Vec<HoldCopyMapEntity>,
    #[serde(default)]
    policy_outcomes: HashMap<String, Vec<PolicyOutcome>>,
    #[serde(default)]
    permitted: HashSet<HoldPermitRequest>,
    // items whose hold lookup fails as an unreachable source
    #[serde(skip)]
    unreadable_items: HashSet<String>,
}

impl SnapshotData {
    pub fn from_json(json: &str) -> LibraryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn add_loan(&mut self, loan: LoanEntity) {
        self.loans.insert(loan.loan_id.to_string(), loan);
    }

    pub fn add_patron(&mut self, patron: PatronEntity) {
        self.patrons.insert(patron.patron_id.to_string(), patron);
    }

    pub fn add_threshold(&mut self, threshold: PenaltyThresholdEntity) {
        self.thresholds.push(threshold);
    }

    pub fn add_balance(&mut self, balance: BalanceEntity) {
        self.balances.push(balance);
    }

    pub fn add_penalty(&mut self, penalty: StandingPenaltyEntity) {
        self.penalties.push(penalty);
    }

    pub fn add_hold(&mut self, hold: HoldEntity) {
        self.holds.insert(hold.hold_id.to_string(), hold);
    }

    pub fn add_copy_map(&mut self, map: HoldCopyMapEntity) {
        self.copy_maps.push(map);
    }

    pub fn add_policy_outcome(&mut self, org_unit_id: &str, item_id: &str, patron_id: &str, outcome: PolicyOutcome) {
        self.policy_outcomes
            .entry(policy_key(org_unit_id, item_id, patron_id))
            .or_default()
            .push(outcome);
    }

    // records that the permit test allows the request
    pub fn permit(&mut self, request: &HoldPermitRequest) {
        self.permitted.insert(request.clone());
    }

    pub fn make_unreadable(&mut self, item_id: &str) {
        self.unreadable_items.insert(item_id.to_string());
    }

    fn check_readable(&self, item_id: &str) -> LibraryResult<()> {
        if self.unreadable_items.contains(item_id) {
            return Err(LibraryError::unavailable(
                format!("holds for {} could not be read", item_id).as_str(), None, true));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CirculationSnapshot {
    data: Arc<SnapshotData>,
    permit_calls: Arc<AtomicUsize>,
}

impl CirculationSnapshot {
    pub fn new(data: SnapshotData) -> Self {
        Self {
            data: Arc::new(data),
            permit_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    // number of hold permit tests answered so far, across clones
    pub fn permit_calls(&self) -> usize {
        self.permit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoanRepository for CirculationSnapshot {
    async fn query_due(&self, org_unit_id: &str, window: &DueWindow,
                       page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        let offset = match page {
            Some(token) => token.parse::<usize>()
                .map_err(|err| LibraryError::validation(format!("bad page token {} {:?}", token, err).as_str(), None))?,
            None => 0,
        };
        let (from, to) = window.bounds()?;
        let matching: Vec<&LoanEntity> = self.data.loans.values()
            .filter(|loan| loan.org_unit_id == org_unit_id && loan.due_at >= from && loan.due_at <= to)
            .collect();
        let records: Vec<LoanEntity> = matching.iter().skip(offset).take(page_size).map(|l| (*l).clone()).collect();
        let next = offset + records.len();
        let next_page = if next < matching.len() { Some(next.to_string()) } else { None };
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

#[async_trait]
impl Repository<PatronEntity> for CirculationSnapshot {
    async fn get(&self, id: &str) -> LibraryResult<PatronEntity> {
        self.data.patrons.get(id)
            .cloned()
            .ok_or_else(|| LibraryError::not_found(format!("patron not found for {}", id).as_str()))
    }
}

impl PatronRepository for CirculationSnapshot {}

#[async_trait]
impl ThresholdRepository for CirculationSnapshot {
    async fn find_thresholds(&self, org_unit_id: &str, penalty: PenaltyCode) -> LibraryResult<Vec<PenaltyThresholdEntity>> {
        Ok(self.data.thresholds.iter()
            .filter(|t| t.org_unit_id == org_unit_id && t.penalty == penalty)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BalanceRepository for CirculationSnapshot {
    async fn find_balances(&self, patron_id: &str) -> LibraryResult<Vec<BalanceEntity>> {
        Ok(self.data.balances.iter().filter(|b| b.patron_id == patron_id).cloned().collect())
    }
}

#[async_trait]
impl StandingPenaltyRepository for CirculationSnapshot {
    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<StandingPenaltyEntity>> {
        Ok(self.data.penalties.iter().filter(|p| p.patron_id == patron_id).cloned().collect())
    }
}

#[async_trait]
impl Repository<HoldEntity> for CirculationSnapshot {
    async fn get(&self, id: &str) -> LibraryResult<HoldEntity> {
        self.data.holds.get(id)
            .cloned()
            .ok_or_else(|| LibraryError::not_found(format!("hold not found for {}", id).as_str()))
    }
}

#[async_trait]
impl HoldRepository for CirculationSnapshot {
    async fn find_by_current_copy(&self, item_id: &str) -> LibraryResult<Vec<HoldEntity>> {
        self.data.check_readable(item_id)?;
        Ok(self.data.holds.values()
            .filter(|h| h.current_copy.as_deref() == Some(item_id))
            .cloned()
            .collect())
    }

    async fn find_by_copy_map(&self, item_id: &str) -> LibraryResult<Vec<HoldEntity>> {
        self.data.check_readable(item_id)?;
        Ok(self.data.copy_maps.iter()
            .filter(|m| m.item_id == item_id)
            .filter_map(|m| self.data.holds.get(&m.hold_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RenewalPolicy for CirculationSnapshot {
    async fn test(&self, org_unit_id: &str, item_id: &str, patron_id: &str) -> LibraryResult<Vec<PolicyOutcome>> {
        Ok(self.data.policy_outcomes
            .get(&policy_key(org_unit_id, item_id, patron_id))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl HoldPermit for CirculationSnapshot {
    async fn permitted(&self, request: &HoldPermitRequest) -> LibraryResult<bool> {
        self.permit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.permitted.contains(request))
    }
}
