use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use crate::core::command::CommandError;
use crate::core::domain::RenewalConfiguration;
use crate::core::repository::RepositoryStore;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppState {
    pub config: RenewalConfiguration,
    pub store: RepositoryStore,
}

impl AppState {
    pub fn new(store: RepositoryStore) -> AppState {
        AppState {
            config: RenewalConfiguration::new(),
            store,
        }
    }
}

pub type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Access { .. } => {
                (StatusCode::BAD_REQUEST, format!("{:?}", err))
            }
            CommandError::DataSource { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, format!("{:?}", err))
            }
            CommandError::Configuration { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, format!("{:?}", err))
            }
            CommandError::Runtime { retryable: true, .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, format!("{:?}", err))
            }
            CommandError::Runtime { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::Serialization { .. } => {
                (StatusCode::BAD_REQUEST, format!("{:?}", err))
            }
            CommandError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, format!("{:?}", err))
            }
        }
    }
}
