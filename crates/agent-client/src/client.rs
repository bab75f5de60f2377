use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::error::AgentError;
use crate::events::{AgentEvent, collect_response_text};

pub const DEFAULT_AGENT_BASE: &str = "http://localhost:8080";
pub const DEFAULT_APP_NAME: &str = "root_agent";

const SESSION_TIMEOUT: Duration = Duration::from_secs(10);
const RUN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct CreatedSession {
    #[serde(default)]
    id: Option<String>,
}

/// Client for the agent runtime's session and `/run` endpoints.
///
/// Sessions are owned by the runtime; this client only checks, creates and
/// messages them.
pub struct AgentClient {
    client: reqwest::Client,
    base_url: String,
    app_name: String,
}

impl AgentClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_app_name(base_url, DEFAULT_APP_NAME)
    }

    pub fn with_app_name(base_url: &str, app_name: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            app_name: app_name.to_string(),
        }
    }

    fn session_url(&self, user_id: &str, session_id: &str) -> String {
        format!(
            "{}/apps/{}/users/{user_id}/sessions/{session_id}",
            self.base_url, self.app_name
        )
    }

    /// Does this `(user, session)` pair exist on the runtime?
    ///
    /// Any non-success status reads as "no"; connection refusal and timeout
    /// come back as their own error variants.
    pub async fn session_exists(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<bool, AgentError> {
        let resp = self
            .client
            .get(self.session_url(user_id, session_id))
            .timeout(SESSION_TIMEOUT)
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Create a session seeded with the repository it will discuss.
    ///
    /// Returns the server-assigned session id, falling back to the requested
    /// one when the response omits it.
    pub async fn create_session(
        &self,
        user_id: &str,
        session_id: &str,
        repository: &str,
    ) -> Result<String, AgentError> {
        let payload = json!({
            "state": {
                "repository": repository,
                "initialized": true,
            }
        });
        let resp = self
            .client
            .post(self.session_url(user_id, session_id))
            .timeout(SESSION_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedSession = resp.json().await?;
        Ok(created.id.unwrap_or_else(|| session_id.to_string()))
    }

    /// Submit one message to the session and collapse the event list into a
    /// single reply string.
    pub async fn run(
        &self,
        user_id: &str,
        session_id: &str,
        text: &str,
    ) -> Result<String, AgentError> {
        let payload = json!({
            "app_name": self.app_name,
            "user_id": user_id,
            "session_id": session_id,
            "new_message": {
                "role": "user",
                "parts": [{"text": text}],
            }
        });
        let resp = self
            .client
            .post(format!("{}/run", self.base_url))
            .timeout(RUN_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let events: Vec<AgentEvent> = resp.json().await?;
        tracing::debug!("agent run for {session_id} returned {} events", events.len());
        Ok(collect_response_text(&events))
    }
}
