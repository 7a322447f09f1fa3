use std::fmt::{self, Display};
use std::io;

/// Provides `EpiError` and maps other errors to
/// convert to an `EpiError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum EpiError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    InvalidParameter { name: &'static str, reason: String },
    CannotMakeEdgeToSelf(usize),
    EdgeAlreadyExists(usize, usize),
    InvalidIndividual(usize),
    NotSusceptible(usize),
    ReportError(String),
    EpiError(String),
}

impl EpiError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        EpiError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for EpiError {
    fn from(error: io::Error) -> Self {
        EpiError::IoError(error)
    }
}

impl From<serde_json::Error> for EpiError {
    fn from(error: serde_json::Error) -> Self {
        EpiError::JsonError(error)
    }
}

impl From<csv::Error> for EpiError {
    fn from(error: csv::Error) -> Self {
        EpiError::CsvError(error)
    }
}

impl From<String> for EpiError {
    fn from(error: String) -> Self {
        EpiError::EpiError(error)
    }
}

impl From<&str> for EpiError {
    fn from(error: &str) -> Self {
        EpiError::EpiError(error.to_string())
    }
}

impl std::error::Error for EpiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EpiError::IoError(error) => Some(error),
            EpiError::JsonError(error) => Some(error),
            EpiError::CsvError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for EpiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EpiError::IoError(error) => write!(f, "I/O error: {error}"),
            EpiError::JsonError(error) => write!(f, "JSON error: {error}"),
            EpiError::CsvError(error) => write!(f, "CSV error: {error}"),
            EpiError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{name}`: {reason}")
            }
            EpiError::CannotMakeEdgeToSelf(node) => {
                write!(f, "cannot make an edge from node {node} to itself")
            }
            EpiError::EdgeAlreadyExists(a, b) => {
                write!(f, "an edge between nodes {a} and {b} already exists")
            }
            EpiError::InvalidIndividual(id) => write!(f, "no individual with id {id}"),
            EpiError::NotSusceptible(id) => write!(f, "individual {id} is not susceptible"),
            EpiError::ReportError(message) | EpiError::EpiError(message) => {
                write!(f, "{message}")
            }
        }
    }
}
