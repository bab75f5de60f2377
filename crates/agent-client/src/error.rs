use thiserror::Error;

/// Failure categories for agent runtime calls.
///
/// Connection refusal is its own variant so the HTTP surface can answer 503
/// rather than a generic 500; timeouts likewise map to 504 on the chat path.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("could not connect to agent service: {0}")]
    Unavailable(String),
    #[error("agent service request timed out")]
    Timeout,
    #[error("agent service returned status {status}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Unavailable(err.to_string())
        } else if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}
