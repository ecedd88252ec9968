use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
    Access {
        message: String,
        reason_code: Option<String>,
    },
    DataSource {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    NotFound {
        message: String,
    },
    Configuration {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::DataSource { message, reason_code, retryable } => {
                CommandError::DataSource { message, reason_code, retryable }
            }
            LibraryError::AccessDenied { message, reason_code } => {
                CommandError::Access { message, reason_code }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                CommandError::Runtime { message, reason_code, retryable }
            }
            LibraryError::Configuration { message } => {
                CommandError::Configuration { message }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code, retryable: true }
            }
        }
    }
}
