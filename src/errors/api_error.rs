use thiserror::Error;

/// Outcome of a failed request against the WIP REST API.
///
/// `Api` is the normalized form of any non-2xx response. `Transport` covers
/// everything that happened before a complete response was available; its
/// source has the request URL stripped so the credential never leaks into
/// messages.
#[derive(Debug, Error)]
pub enum WipApiError {
    #[error("WIP API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("WIP API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid WIP API request: {0}")]
    InvalidRequest(String),
}

impl WipApiError {
    pub fn transport(err: reqwest::Error) -> Self {
        WipApiError::Transport(err.without_url())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            WipApiError::Api { status, .. } => Some(*status),
            WipApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            WipApiError::InvalidRequest(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WipApiError;

    #[test]
    fn api_error_message_format() {
        let err = WipApiError::Api {
            status: 500,
            message: "HTTP 500".to_string(),
        };
        assert_eq!(err.to_string(), "WIP API error (500): HTTP 500");
        assert_eq!(err.status(), Some(500));
    }
}
