use serde::Deserialize;

pub type ClientResult<T> = Result<T, ClientError>;

/// The one error type the rest of the client ever sees.
///
/// Transport and server failures are normalized into this shape at the API
/// client boundary; callers only need [`ClientError::message`] for display.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Unknown(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Human-readable message suitable for showing inline in a form.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Transport(message)
            | ClientError::Server { message, .. }
            | ClientError::Unknown(message)
            | ClientError::Configuration(message) => message.as_str(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Builds the error for a non-success response, preferring the `error`
    /// field of a JSON body over the generic status description.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = server_message(body)
            .unwrap_or_else(|| format!("request failed with status code {status}"));
        Self::server(status, message)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn server_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Transport("request timed out".to_string());
        }
        if err.is_builder() {
            return Self::Configuration(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::server(status.as_u16(), format!("request failed with status code {}", status.as_u16()));
        }
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unknown(err.to_string())
    }
}
