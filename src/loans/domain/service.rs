use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::domain::{DueWindow, RenewalConfiguration};
use crate::core::library::{LibraryError, LibraryResult};
use crate::loans::domain::CandidateLoader;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::patrons::Patron;
use crate::patrons::repository::PatronRepository;

pub(crate) struct CandidateLoaderImpl {
    page_size: usize,
    loan_repository: Box<dyn LoanRepository>,
    patron_repository: Box<dyn PatronRepository>,
}

impl CandidateLoaderImpl {
    pub(crate) fn new(config: &RenewalConfiguration, loan_repository: Box<dyn LoanRepository>,
                      patron_repository: Box<dyn PatronRepository>) -> Self {
        Self {
            page_size: config.page_size,
            loan_repository,
            patron_repository,
        }
    }

    // a patron that no longer exists behaves like a failed join and drops the loan
    async fn is_in_scope(&self, patron_id: &str) -> LibraryResult<bool> {
        match self.patron_repository.get(patron_id).await {
            Ok(patron) => Ok(patron.is_sms_eligible()),
            Err(LibraryError::NotFound { .. }) => {
                debug!(patron_id, "patron not found, skipping loans");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl CandidateLoader for CandidateLoaderImpl {
    async fn load(&self, org_unit_id: &str, window: &DueWindow) -> LibraryResult<Vec<LoanEntity>> {
        let mut patrons_in_scope: HashMap<String, bool> = HashMap::new();
        let mut candidates = vec![];
        let mut scanned = 0;
        let mut next_page: Option<String> = None;
        loop {
            let res = self.loan_repository.query_due(
                org_unit_id, window, next_page.as_deref(), self.page_size).await?;
            scanned += res.records.len();
            for loan in res.records {
                if !loan.is_open() || !window.contains(loan.due_at) {
                    continue;
                }
                let in_scope = match patrons_in_scope.get(&loan.patron_id) {
                    Some(in_scope) => *in_scope,
                    None => {
                        let in_scope = self.is_in_scope(loan.patron_id.as_str()).await?;
                        patrons_in_scope.insert(loan.patron_id.to_string(), in_scope);
                        in_scope
                    }
                };
                if in_scope {
                    candidates.push(loan);
                }
            }
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        info!(org_unit_id, scanned, candidates = candidates.len(), "loaded renewal candidates");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use crate::core::domain::{DueWindow, RenewalConfiguration};
    use crate::loans::domain::CandidateLoader;
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::domain::service::CandidateLoaderImpl;
    use crate::patrons::domain::model::PatronEntity;
    use crate::snapshot::{CirculationSnapshot, SnapshotData};

    fn today() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn loan(patron: &PatronEntity, due_at: NaiveDateTime) -> LoanEntity {
        let mut loan = LoanEntity::new("BR1", "item", patron.patron_id.as_str());
        loan.due_at = due_at;
        loan
    }

    fn build_loader(data: SnapshotData, page_size: usize) -> CandidateLoaderImpl {
        let snapshot = CirculationSnapshot::new(data);
        let mut config = RenewalConfiguration::new();
        config.page_size = page_size;
        CandidateLoaderImpl::new(&config, Box::new(snapshot.clone()), Box::new(snapshot))
    }

    #[tokio::test]
    async fn test_should_load_open_loans_in_window() {
        let patron = PatronEntity::new("BR1");
        let mut data = SnapshotData::default();
        let due_today = loan(&patron, today());
        let due_last_day = loan(&patron, today() + Duration::days(3));
        let due_later = loan(&patron, today() + Duration::days(4));
        let mut returned = loan(&patron, today());
        returned.returned_at = Some(today());
        data.add_patron(patron);
        for l in [&due_today, &due_last_day, &due_later, &returned] {
            data.add_loan(l.clone());
        }

        let loader = build_loader(data, 100);
        let loans = loader.load("BR1", &DueWindow::new(today().date(), 3).expect("should build window")).await.expect("should load");
        let ids: Vec<String> = loans.iter().map(|l| l.loan_id.to_string()).collect();
        assert_eq!(2, ids.len());
        assert!(ids.contains(&due_today.loan_id));
        assert!(ids.contains(&due_last_day.loan_id));
    }

    #[tokio::test]
    async fn test_should_skip_out_of_scope_patrons() {
        let eligible = PatronEntity::new("BR1");
        let mut deleted = PatronEntity::new("BR1");
        deleted.deleted = true;
        let mut email_only = PatronEntity::new("BR1");
        email_only.notify_channels = "email".to_string();
        let missing = PatronEntity::new("BR1");

        let mut data = SnapshotData::default();
        let kept = loan(&eligible, today());
        data.add_loan(kept.clone());
        data.add_loan(loan(&deleted, today()));
        data.add_loan(loan(&email_only, today()));
        data.add_loan(loan(&missing, today()));
        data.add_patron(eligible);
        data.add_patron(deleted);
        data.add_patron(email_only);

        let loader = build_loader(data, 100);
        let loans = loader.load("BR1", &DueWindow::new(today().date(), 3).expect("should build window")).await.expect("should load");
        assert_eq!(1, loans.len());
        assert_eq!(kept.loan_id, loans[0].loan_id);
    }

    #[tokio::test]
    async fn test_should_follow_pages() {
        let patron = PatronEntity::new("BR1");
        let mut data = SnapshotData::default();
        for _ in 0..25 {
            data.add_loan(loan(&patron, today() + Duration::days(1)));
        }
        data.add_patron(patron);

        let loader = build_loader(data, 10);
        let loans = loader.load("BR1", &DueWindow::new(today().date(), 3).expect("should build window")).await.expect("should load");
        assert_eq!(25, loans.len());
    }

    #[tokio::test]
    async fn test_should_only_load_requested_org_unit() {
        let patron = PatronEntity::new("BR1");
        let mut data = SnapshotData::default();
        let mut other = loan(&patron, today());
        other.org_unit_id = "BR2".to_string();
        data.add_loan(other);
        data.add_patron(patron);

        let loader = build_loader(data, 10);
        let loans = loader.load("BR1", &DueWindow::new(today().date(), 3).expect("should build window")).await.expect("should load");
        assert!(loans.is_empty());
    }
}
