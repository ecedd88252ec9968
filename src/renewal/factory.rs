use crate::core::domain::RenewalConfiguration;
use crate::core::repository::RepositoryStore;
use crate::fines::domain::service::FineThresholdResolverImpl;
use crate::fines::factory::create_fine_resolver;
use crate::hold::domain::service::HoldConflictResolverImpl;
use crate::hold::factory::create_hold_resolver;
use crate::loans::domain::service::CandidateLoaderImpl;
use crate::loans::factory::create_candidate_loader;
use crate::penalties::domain::service::StandingPenaltyCheckerImpl;
use crate::penalties::factory::create_penalty_checker;
use crate::policy::factory::create_renewal_policy;
use crate::renewal::domain::RenewalService;
use crate::renewal::domain::service::RenewalServiceImpl;
use crate::snapshot::CirculationSnapshot;

pub async fn create_renewal_service(config: &RenewalConfiguration, store: RepositoryStore) -> Box<dyn RenewalService> {
    let candidate_loader = create_candidate_loader(config, store).await;
    let renewal_policy = create_renewal_policy(store).await;
    let fine_resolver = create_fine_resolver(store).await;
    let penalty_checker = create_penalty_checker(config, store).await;
    let hold_resolver = create_hold_resolver(store).await;
    Box::new(RenewalServiceImpl::new(config, candidate_loader, renewal_policy,
                                     fine_resolver, penalty_checker, hold_resolver))
}

// every collaborator reads the same in-memory batch
pub fn create_snapshot_service(config: &RenewalConfiguration, snapshot: &CirculationSnapshot) -> Box<dyn RenewalService> {
    let candidate_loader = CandidateLoaderImpl::new(
        config, Box::new(snapshot.clone()), Box::new(snapshot.clone()));
    let fine_resolver = FineThresholdResolverImpl::new(Box::new(snapshot.clone()), Box::new(snapshot.clone()));
    let penalty_checker = StandingPenaltyCheckerImpl::new(config, Box::new(snapshot.clone()));
    let hold_resolver = HoldConflictResolverImpl::new(Box::new(snapshot.clone()), Box::new(snapshot.clone()));
    Box::new(RenewalServiceImpl::new(config,
                                     Box::new(candidate_loader),
                                     Box::new(snapshot.clone()),
                                     Box::new(fine_resolver),
                                     Box::new(penalty_checker),
                                     Box::new(hold_resolver)))
}
