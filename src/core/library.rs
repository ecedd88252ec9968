use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
    // Candidate data or an external predicate could not be read. The whole
    // scope being evaluated is abandoned, no partial results are emitted.
    DataSource {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    AccessDenied {
        message: String,
        reason_code: Option<String>,
    },
    NotFound {
        message: String,
    },
    // The data source is throttling or temporarily unreachable, the caller may
    // retry the batch with or without a backoff.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    // Raised before any data is read when the engine is invoked without a
    // blocking penalty set or a due-date window.
    Configuration {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn data_source(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::DataSource { message: message.to_string(), reason_code, retryable }
    }

    pub fn access_denied(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::AccessDenied { message: message.to_string(), reason_code }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn data_source_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb data source unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("400") {
                LibraryError::access_denied(
                    format!("access-denied error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                LibraryError::data_source(
                    format!("ddb data source error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::data_source(
                format!("ddb data source error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn configuration(message: &str) -> LibraryError {
        LibraryError::Configuration { message: message.to_string() }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::DataSource { retryable, .. } => { *retryable }
            LibraryError::AccessDenied { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::Configuration { .. } => { false }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::DataSource { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::AccessDenied { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Configuration { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the renewal engine and its repositories.
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

// PenaltyCode identifies a standing penalty or threshold class.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum PenaltyCode {
    ExceedsFines,
    ExceedsOverdueCount,
    ExceedsCheckoutCount,
    ExceedsLostCount,
    ExceedsLongOverdueCount,
    Unknown,
}

impl PenaltyCode {
    // codes that block a renewal unless configured otherwise
    pub fn default_blocking() -> Vec<PenaltyCode> {
        vec![
            PenaltyCode::ExceedsOverdueCount,
            PenaltyCode::ExceedsCheckoutCount,
            PenaltyCode::ExceedsLostCount,
            PenaltyCode::ExceedsLongOverdueCount,
        ]
    }
}

impl From<String> for PenaltyCode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PATRON_EXCEEDS_FINES" => PenaltyCode::ExceedsFines,
            "PATRON_EXCEEDS_OVERDUE_COUNT" => PenaltyCode::ExceedsOverdueCount,
            "PATRON_EXCEEDS_CHECKOUT_COUNT" => PenaltyCode::ExceedsCheckoutCount,
            "PATRON_EXCEEDS_LOST_COUNT" => PenaltyCode::ExceedsLostCount,
            "PATRON_EXCEEDS_LONGOVERDUE_COUNT" => PenaltyCode::ExceedsLongOverdueCount,
            _ => PenaltyCode::Unknown,
        }
    }
}

impl Display for PenaltyCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PenaltyCode::ExceedsFines => write!(f, "PATRON_EXCEEDS_FINES"),
            PenaltyCode::ExceedsOverdueCount => write!(f, "PATRON_EXCEEDS_OVERDUE_COUNT"),
            PenaltyCode::ExceedsCheckoutCount => write!(f, "PATRON_EXCEEDS_CHECKOUT_COUNT"),
            PenaltyCode::ExceedsLostCount => write!(f, "PATRON_EXCEEDS_LOST_COUNT"),
            PenaltyCode::ExceedsLongOverdueCount => write!(f, "PATRON_EXCEEDS_LONGOVERDUE_COUNT"),
            PenaltyCode::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// RenewalGate names the precondition that blocked a renewal, in evaluation order.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum RenewalGate {
    Policy,
    Fines,
    StandingPenalty,
    Holds,
    RenewalsRemaining,
}

impl From<String> for RenewalGate {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Policy" => RenewalGate::Policy,
            "Fines" => RenewalGate::Fines,
            "StandingPenalty" => RenewalGate::StandingPenalty,
            "Holds" => RenewalGate::Holds,
            _ => RenewalGate::RenewalsRemaining,
        }
    }
}

impl Display for RenewalGate {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RenewalGate::Policy => write!(f, "Policy"),
            RenewalGate::Fines => write!(f, "Fines"),
            RenewalGate::StandingPenalty => write!(f, "StandingPenalty"),
            RenewalGate::Holds => write!(f, "Holds"),
            RenewalGate::RenewalsRemaining => write!(f, "RenewalsRemaining"),
        }
    }
}
