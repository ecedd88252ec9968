use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::core::domain::RenewalConfiguration;
use crate::renewal::domain::RenewalService;
use crate::renewal::dto::{DecisionDto, RenewalSummary};

pub struct EvaluateRenewalsCommand {
    config: RenewalConfiguration,
    renewal_service: Box<dyn RenewalService>,
}

impl EvaluateRenewalsCommand {
    pub fn new(config: &RenewalConfiguration, renewal_service: Box<dyn RenewalService>) -> Self {
        Self {
            config: config.clone(),
            renewal_service,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateRenewalsCommandRequest {
    pub org_units: Vec<String>,
    /// Library-local evaluation day. When absent the current UTC date is used,
    /// which is a day off for libraries far from UTC near midnight.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl EvaluateRenewalsCommandRequest {
    pub fn new(org_units: &[&str], today: Option<NaiveDate>) -> Self {
        Self {
            org_units: org_units.iter().map(|o| o.to_string()).collect(),
            today,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateRenewalsCommandResponse {
    pub results: Vec<DecisionDto>,
    pub summary: RenewalSummary,
}

impl EvaluateRenewalsCommandResponse {
    pub fn new(results: Vec<DecisionDto>) -> Self {
        let summary = RenewalSummary::from_decisions(&results);
        Self {
            results,
            summary,
        }
    }
}

// the caller's day wins over the UTC date; the time of day is kept for hold and penalty cutoffs
fn evaluation_instant(today: Option<NaiveDate>, now: NaiveDateTime) -> NaiveDateTime {
    today.map(|day| day.and_time(now.time())).unwrap_or(now)
}

#[async_trait]
impl Command<EvaluateRenewalsCommandRequest, EvaluateRenewalsCommandResponse> for EvaluateRenewalsCommand {
    async fn execute(&self, req: EvaluateRenewalsCommandRequest) -> Result<EvaluateRenewalsCommandResponse, CommandError> {
        if req.org_units.is_empty() {
            return Err(CommandError::Validation { message: "no org units requested".to_string(), reason_code: None });
        }
        let as_of = evaluation_instant(req.today, Utc::now().naive_utc());
        let scope = self.config.scope(&req.org_units, as_of)?;
        self.renewal_service.evaluate(&scope)
            .await.map_err(CommandError::from).map(EvaluateRenewalsCommandResponse::new)
    }
}
