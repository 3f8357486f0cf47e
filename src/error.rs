use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum NarcisError {
    #[error("\"{0}\" is not currently supported!")]
    UnsupportedScheme(String),

    #[error("no webdriver attached to the session")]
    DriverUnattached,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Protocol handler error: {0}")]
    Handler(String),
}

impl NarcisError {
    pub fn unsupported_scheme(scheme: impl Into<String>) -> Self {
        NarcisError::UnsupportedScheme(scheme.into())
    }

    pub fn driver(message: impl Into<String>) -> Self {
        NarcisError::Driver(message.into())
    }

    pub fn handler(message: impl Into<String>) -> Self {
        NarcisError::Handler(message.into())
    }

    /// The scheme an [`UnsupportedScheme`](NarcisError::UnsupportedScheme)
    /// error was raised for, if any.
    pub fn scheme(&self) -> Option<&str> {
        match self {
            NarcisError::UnsupportedScheme(scheme) => Some(scheme),
            _ => None,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            NarcisError::UnsupportedScheme(scheme) => ErrorPayload::new(
                ErrorCategory::Protocol,
                self.to_string(),
                format!("Register a protocol handler for \"{scheme}\" before calling upload()."),
            ),
            NarcisError::DriverUnattached => ErrorPayload::new(
                ErrorCategory::Driver,
                self.to_string(),
                "Call attach_driver() before capturing screenshots.",
            ),
            NarcisError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify the project URL (e.g., https://narcis.example.com/project).",
            ),
            NarcisError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            NarcisError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check config and payload inputs for invalid JSON values.",
            ),
            NarcisError::Driver(msg) => ErrorPayload::new(
                ErrorCategory::Driver,
                msg.to_string(),
                "Verify the webdriver session is still alive and can take screenshots.",
            ),
            NarcisError::Handler(msg) => ErrorPayload::new(
                ErrorCategory::Protocol,
                msg.to_string(),
                "Inspect the registered handler for this scheme; transport failures are its responsibility.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, NarcisError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Driver,
    Protocol,
    Network,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_scheme_message_quotes_the_scheme() {
        let err = NarcisError::unsupported_scheme("https");

        assert_eq!(format!("{}", err), "\"https\" is not currently supported!");
        assert_eq!(err.scheme(), Some("https"));
    }

    #[test]
    fn scheme_accessor_is_none_for_other_variants() {
        assert_eq!(NarcisError::DriverUnattached.scheme(), None);
    }

    #[test]
    fn unsupported_scheme_payload_suggests_registration() {
        let payload = NarcisError::unsupported_scheme("ftp").to_payload();

        assert_eq!(payload.category, ErrorCategory::Protocol);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("ftp"),
            "expected remediation to name the scheme, got: {remediation}"
        );
    }

    #[test]
    fn unattached_driver_payload_mentions_attach_driver() {
        let payload = NarcisError::DriverUnattached.to_payload();

        assert_eq!(payload.category, ErrorCategory::Driver);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("attach_driver"),
            "expected attach_driver remediation, got: {remediation}"
        );
    }
}
