//! Conversions from external infrastructure errors into domain errors.

use qstor_domain::QuantaStorError;
use reqwest::Error as HttpError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub QuantaStorError);

impl From<InfraError> for QuantaStorError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<QuantaStorError> for InfraError {
    fn from(value: QuantaStorError) -> Self {
        Self(value)
    }
}

trait IntoQuantaStorError {
    fn into_quantastor(self) -> QuantaStorError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → QuantaStorError */
/* -------------------------------------------------------------------------- */

impl IntoQuantaStorError for HttpError {
    fn into_quantastor(self) -> QuantaStorError {
        if self.is_timeout() {
            return QuantaStorError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return QuantaStorError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return QuantaStorError::Network(format!("failed to decode response body: {self}"));
        }

        if let Some(status) = self.status() {
            return QuantaStorError::Network(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        QuantaStorError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_quantastor())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → QuantaStorError */
/* -------------------------------------------------------------------------- */

impl IntoQuantaStorError for UrlError {
    fn into_quantastor(self) -> QuantaStorError {
        QuantaStorError::Config(format!("invalid API base URL: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        Self(value.into_quantastor())
    }
}
