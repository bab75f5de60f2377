use serde::Deserialize;

/// Substituted when a run produced no text fragments at all.
pub const NO_RESPONSE_FALLBACK: &str = "No response from agent";

/// One event from the agent's `/run` response list.
///
/// Events carry many fields (authors, invocation ids, tool calls); only the
/// textual content parts matter here, everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct AgentEvent {
    #[serde(default)]
    pub content: Option<EventContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Concatenate every text fragment in event order; never returns empty.
pub fn collect_response_text(events: &[AgentEvent]) -> String {
    let mut out = String::new();
    for event in events {
        let Some(content) = &event.content else {
            continue;
        };
        for part in &content.parts {
            if let Some(text) = &part.text {
                out.push_str(text);
            }
        }
    }
    if out.is_empty() {
        NO_RESPONSE_FALLBACK.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Vec<AgentEvent> {
        serde_json::from_str(raw).expect("parse events")
    }

    #[test]
    fn concatenates_parts_across_events() {
        let events = parse(
            r#"[
                {"author": "root_agent"},
                {"content": {"parts": [{"text": "Hello"}, {"text": " world"}]}}
            ]"#,
        );
        assert_eq!(collect_response_text(&events), "Hello world");
    }

    #[test]
    fn skips_non_text_parts() {
        let events = parse(
            r#"[{"content": {"parts": [
                {"function_call": {"name": "lookup"}},
                {"text": "done"}
            ]}}]"#,
        );
        assert_eq!(collect_response_text(&events), "done");
    }

    #[test]
    fn empty_event_list_yields_the_fallback() {
        assert_eq!(collect_response_text(&[]), NO_RESPONSE_FALLBACK);
    }

    #[test]
    fn events_without_text_yield_the_fallback() {
        let events = parse(r#"[{"content": {"parts": []}}, {"content": {}}]"#);
        assert_eq!(collect_response_text(&events), NO_RESPONSE_FALLBACK);
    }
}
