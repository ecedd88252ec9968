use axum::{
    extract::State,
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::renewal::command::evaluate_renewals_cmd::{EvaluateRenewalsCommand, EvaluateRenewalsCommandRequest, EvaluateRenewalsCommandResponse};
use crate::renewal::factory;

pub async fn evaluate_renewals(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<EvaluateRenewalsCommandResponse>, ServerError> {
    let req: EvaluateRenewalsCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = factory::create_renewal_service(&state.config, state.store).await;
    let res = EvaluateRenewalsCommand::new(&state.config, svc).execute(req).await?;
    Ok(Json(res))
}
