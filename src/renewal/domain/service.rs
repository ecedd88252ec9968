use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::core::domain::{EvaluationScope, HoldScan, RenewalConfiguration};
use crate::core::library::LibraryResult;
use crate::fines::domain::{fines_over_threshold, FineThresholdResolver};
use crate::hold::domain::HoldConflictResolver;
use crate::loans::domain::CandidateLoader;
use crate::loans::domain::model::LoanEntity;
use crate::penalties::domain::StandingPenaltyChecker;
use crate::policy::{policy_success, RenewalPolicy};
use crate::renewal::domain::gates::{decide, passes_pre_hold_gates, GateInputs};
use crate::renewal::domain::RenewalService;
use crate::renewal::dto::{DecisionDto, RenewalSummary};

// lookups shared by the loans of one run, dropped when the run ends
#[derive(Default)]
struct RunCache {
    thresholds: HashMap<String, Option<Decimal>>,
    fines: HashMap<String, Decimal>,
    penalties: HashMap<String, bool>,
    holds: HashMap<String, i64>,
}

pub(crate) struct RenewalServiceImpl {
    config: RenewalConfiguration,
    candidate_loader: Box<dyn CandidateLoader>,
    renewal_policy: Box<dyn RenewalPolicy>,
    fine_resolver: Box<dyn FineThresholdResolver>,
    penalty_checker: Box<dyn StandingPenaltyChecker>,
    hold_resolver: Box<dyn HoldConflictResolver>,
}

impl RenewalServiceImpl {
    pub(crate) fn new(config: &RenewalConfiguration,
                      candidate_loader: Box<dyn CandidateLoader>,
                      renewal_policy: Box<dyn RenewalPolicy>,
                      fine_resolver: Box<dyn FineThresholdResolver>,
                      penalty_checker: Box<dyn StandingPenaltyChecker>,
                      hold_resolver: Box<dyn HoldConflictResolver>) -> Self {
        Self {
            config: config.clone(),
            candidate_loader,
            renewal_policy,
            fine_resolver,
            penalty_checker,
            hold_resolver,
        }
    }

    async fn fines_over(&self, loan: &LoanEntity, cache: &mut RunCache) -> LibraryResult<Decimal> {
        let threshold = match cache.thresholds.get(&loan.org_unit_id) {
            Some(threshold) => *threshold,
            None => {
                let threshold = self.fine_resolver.threshold(loan.org_unit_id.as_str()).await?;
                cache.thresholds.insert(loan.org_unit_id.to_string(), threshold);
                threshold
            }
        };
        let total = match cache.fines.get(&loan.patron_id) {
            Some(total) => *total,
            None => {
                let total = self.fine_resolver.total_fines(loan.patron_id.as_str()).await?;
                cache.fines.insert(loan.patron_id.to_string(), total);
                total
            }
        };
        Ok(fines_over_threshold(total, threshold))
    }

    async fn blocking_penalty(&self, loan: &LoanEntity, now: NaiveDateTime, cache: &mut RunCache) -> LibraryResult<bool> {
        if let Some(blocked) = cache.penalties.get(&loan.patron_id) {
            return Ok(*blocked);
        }
        let blocked = self.penalty_checker.has_blocking_penalty(loan.patron_id.as_str(), now).await?;
        cache.penalties.insert(loan.patron_id.to_string(), blocked);
        Ok(blocked)
    }

    async fn blocking_holds(&self, loan: &LoanEntity, now: NaiveDateTime, cache: &mut RunCache) -> LibraryResult<i64> {
        if let Some(count) = cache.holds.get(&loan.item_id) {
            return Ok(*count);
        }
        let count = self.hold_resolver.blocking_hold_count(loan.item_id.as_str(), now).await?;
        cache.holds.insert(loan.item_id.to_string(), count);
        Ok(count)
    }

    async fn decide_loan(&self, loan: &LoanEntity, now: NaiveDateTime, cache: &mut RunCache) -> LibraryResult<DecisionDto> {
        let outcomes = self.renewal_policy.test(
            loan.org_unit_id.as_str(), loan.item_id.as_str(), loan.patron_id.as_str()).await?;
        let policy_passed = policy_success(&outcomes);
        let fines_over_threshold = self.fines_over(loan, cache).await?;
        let blocking_penalty = self.blocking_penalty(loan, now, cache).await?;

        let scan_holds = match self.config.hold_scan {
            HoldScan::All => true,
            HoldScan::Eligible => passes_pre_hold_gates(
                policy_passed, fines_over_threshold, blocking_penalty, loan.renewals_remaining),
        };
        let blocking_holds = if scan_holds { self.blocking_holds(loan, now, cache).await? } else { 0 };

        let verdict = decide(&GateInputs {
            policy_passed,
            fines_over_threshold,
            blocking_penalty,
            blocking_holds,
            renewals_remaining: loan.renewals_remaining,
        });
        debug!(loan_id = loan.loan_id.as_str(), renewals_remaining = verdict.renewals_remaining,
            blocked_by = ?verdict.blocked_by, "decided renewal");
        Ok(DecisionDto::new(loan, fines_over_threshold, blocking_holds, verdict))
    }

    async fn decide_all(&self, loans: &[LoanEntity], now: NaiveDateTime) -> LibraryResult<Vec<DecisionDto>> {
        let mut cache = RunCache::default();
        let mut decisions: BTreeMap<String, DecisionDto> = BTreeMap::new();
        for loan in loans {
            if decisions.contains_key(&loan.loan_id) {
                continue;
            }
            let decision = self.decide_loan(loan, now, &mut cache).await?;
            decisions.insert(loan.loan_id.to_string(), decision);
        }
        Ok(decisions.into_values().collect())
    }
}

#[async_trait]
impl RenewalService for RenewalServiceImpl {
    async fn evaluate(&self, scope: &EvaluationScope) -> LibraryResult<Vec<DecisionDto>> {
        self.config.validate()?;
        let mut loans = vec![];
        for org_unit_id in &scope.org_units {
            loans.extend(self.candidate_loader.load(org_unit_id.as_str(), &scope.window).await?);
        }
        let decisions = self.decide_all(&loans, scope.as_of).await?;
        let summary = RenewalSummary::from_decisions(&decisions);
        info!(org_units = ?scope.org_units, from = %scope.window.start, to = %scope.window.last_day(),
            evaluated = summary.evaluated, eligible = summary.eligible, blocked = summary.blocked,
            "evaluated renewals");
        Ok(decisions)
    }

    async fn evaluate_loans(&self, loans: &[LoanEntity], now: NaiveDateTime) -> LibraryResult<Vec<DecisionDto>> {
        self.config.validate()?;
        self.decide_all(loans, now).await
    }
}
