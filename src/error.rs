use std::fmt;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Remote service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    GitHub,
    ZenHub,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::GitHub => write!(f, "GitHub"),
            Service::ZenHub => write!(f, "ZenHub"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token settings are missing in {}", path.display())]
    MissingToken { path: PathBuf },

    #[error("{service} rejected the credentials ({status})")]
    Authentication { service: Service, status: StatusCode },

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("{service} rejected the request while {operation}: {message}")]
    Rejected {
        service: Service,
        operation: String,
        message: String,
    },

    #[error("{service} is unavailable while {operation}: {reason}")]
    Unavailable {
        service: Service,
        operation: String,
        reason: String,
    },

    #[error("Unexpected response from {service} while {operation}: {reason}")]
    UnexpectedResponse {
        service: Service,
        operation: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP client error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Enrichment task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification used when reporting a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    NotFound,
    Rejected,
    Unavailable,
    UnexpectedResponse,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Authentication => "authentication",
            ErrorKind::NotFound => "not found",
            ErrorKind::Rejected => "request rejected",
            ErrorKind::Unavailable => "service unavailable",
            ErrorKind::UnexpectedResponse => "unexpected response",
            ErrorKind::Internal => "internal",
        };
        f.write_str(label)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::MissingToken { .. } | Error::Toml(_) => {
                ErrorKind::Configuration
            }
            Error::InvalidHeader(_) => ErrorKind::Configuration,
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::RepoNotFound(_) => ErrorKind::NotFound,
            Error::Rejected { .. } => ErrorKind::Rejected,
            Error::Unavailable { .. } => ErrorKind::Unavailable,
            Error::UnexpectedResponse { .. } => ErrorKind::UnexpectedResponse,
            Error::Io(_) | Error::Task(_) | Error::Network(_) => ErrorKind::Internal,
        }
    }

    /// Classifies a non-success HTTP status returned by `service`.
    pub(crate) fn from_status(
        service: Service,
        operation: &str,
        status: StatusCode,
        body: String,
    ) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Error::Authentication { service, status };
        }

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Error::Unavailable {
                service,
                operation: operation.to_string(),
                reason: format!("{} - {}", status, body),
            };
        }

        Error::Rejected {
            service,
            operation: operation.to_string(),
            message: format!("{} - {}", status, body),
        }
    }

    pub(crate) fn unavailable(service: Service, operation: &str, source: reqwest::Error) -> Self {
        Error::Unavailable {
            service,
            operation: operation.to_string(),
            reason: source.to_string(),
        }
    }

    pub(crate) fn unexpected(service: Service, operation: &str, reason: impl fmt::Display) -> Self {
        Error::UnexpectedResponse {
            service,
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let auth = Error::from_status(
            Service::ZenHub,
            "fetching board",
            StatusCode::UNAUTHORIZED,
            String::new(),
        );
        assert_eq!(auth.kind(), ErrorKind::Authentication);

        let down = Error::from_status(
            Service::GitHub,
            "looking up issue #1",
            StatusCode::BAD_GATEWAY,
            String::new(),
        );
        assert_eq!(down.kind(), ErrorKind::Unavailable);

        let rejected = Error::from_status(
            Service::ZenHub,
            "fetching board",
            StatusCode::UNPROCESSABLE_ENTITY,
            "bad id".to_string(),
        );
        assert_eq!(rejected.kind(), ErrorKind::Rejected);
        assert!(rejected.to_string().contains("bad id"));
    }

    #[test]
    fn test_unexpected_response_is_distinct_from_unavailable() {
        let err = Error::unexpected(Service::ZenHub, "fetching board", "missing field `pipelines`");
        assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
        assert_eq!(
            err.to_string(),
            "Unexpected response from ZenHub while fetching board: missing field `pipelines`"
        );
    }

    #[tokio::test]
    async fn test_local_client_failure_is_internal() {
        let err: Error = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
