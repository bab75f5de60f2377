pub mod client;
pub mod error;
pub mod events;

pub use client::{AgentClient, DEFAULT_AGENT_BASE, DEFAULT_APP_NAME};
pub use error::AgentError;
pub use events::{AgentEvent, NO_RESPONSE_FALLBACK, collect_response_text};
