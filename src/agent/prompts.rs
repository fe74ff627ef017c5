//! Instruction strings for the agent loop
//!
//! Base rules are fixed; deployments append their own via
//! `extend_system_message` / `extend_planner_system_message` in config.

/// Behavior rules every run starts from
pub const BASE_SYSTEM_RULES: &str = r#"You are a browsing agent. You control a browser to complete the user's task.

Respond to every message with exactly one JSON action object, nothing else:
- {"action": "navigate", "url": "..."} - go to a URL
- {"action": "click", "ref": "eN"} - click an element from the latest snapshot
- {"action": "fill", "ref": "eN", "text": "..."} - type into an element
- {"action": "extract"} - record the visible page text (add "ref" for one element)
- {"action": "done", "result": "..."} - finish and report the answer

Rules:
1. Never fill in login credentials unless the user provided an account name and password.
2. Use EXACT element refs from the latest snapshot. Do not invent refs.
3. Focus on the main content and information of the page.
4. Report your final answer with the done action once the task is complete."#;

/// Planning rules appended after the base rules
pub const BASE_PLANNER_RULES: &str = r#"Planning rules:
1. On security warning pages ("your connection is not private", "not secure",
   certificate errors): click the "Advanced" / "Details" button, then the
   "Proceed to" / "Continue" link. These steps are required, do not skip them.
2. If a page fails to load, retry it once.
3. Prefer extracting page text over complex interactions.
4. Try to finish the task within five steps."#;

/// Assemble the full system message for a run
pub fn build_system_message(
    extend_system: Option<&str>,
    extend_planner: Option<&str>,
) -> String {
    let mut message = String::from(BASE_SYSTEM_RULES);

    if let Some(extra) = extend_system {
        message.push_str("\n\n");
        message.push_str(extra.trim());
    }

    message.push_str("\n\n");
    message.push_str(BASE_PLANNER_RULES);

    if let Some(extra) = extend_planner {
        message.push_str("\n");
        message.push_str(extra.trim());
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_message_contains_action_protocol() {
        let message = build_system_message(None, None);
        assert!(message.contains(r#""action": "navigate""#));
        assert!(message.contains("Planning rules"));
    }

    #[test]
    fn test_extensions_are_appended() {
        let message = build_system_message(
            Some("Answer in Chinese."),
            Some("5. Wait at most ten seconds for slow pages."),
        );
        assert!(message.contains("Answer in Chinese."));
        assert!(message.contains("ten seconds"));
        // Extension order: system rules first, planner rules after
        let sys_pos = message.find("Answer in Chinese.").unwrap();
        let planner_pos = message.find("ten seconds").unwrap();
        assert!(sys_pos < planner_pos);
    }
}
