use thiserror::Error;

/// Failures talking to an external collaborator.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("place not found: {0}")]
    PlaceNotFound(String),
    #[error("routing provider returned no routes ({0})")]
    NoRoutes(String),
    #[error("malformed {service} payload: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Whether the failure means "nothing to route", as opposed to an outage.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::PlaceNotFound(_) | ProviderError::NoRoutes(_))
    }

    pub(crate) fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ProviderError::Transport { service, source }
    }

    pub(crate) fn malformed(service: &'static str, message: impl ToString) -> Self {
        ProviderError::Malformed {
            service,
            message: message.to_string(),
        }
    }
}

/// Turn a non-success response into [`ProviderError::Status`].
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        service,
        status,
        body,
    })
}
