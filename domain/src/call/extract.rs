//! Tool-call extraction from LLM responses.
//!
//! Models are instructed to answer with a literal `TOOL_CALL:` line, but in
//! practice they also wrap the call in backticks, prefix it with a colon, or
//! emit it bare. Extraction runs an ordered list of matcher strategies, each
//! tagged with a confidence level; the first accepted candidate wins.
//!
//! The marker form is accepted unconditionally. The looser forms only accept
//! identifiers that look like tool names, so prose such as "see also(below)"
//! is not mistaken for an invocation.

use regex::Regex;
use std::sync::LazyLock;

/// Identifier suffix used by MCP-style tool families.
const TOOL_SUFFIX: &str = "_mcp";

/// Verbs that mark an identifier as a plausible tool name.
const TOOL_VERBS: &[&str] = &["get", "search", "list", "analyze", "query", "fetch", "find"];

/// How confidently a candidate was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchConfidence {
    /// Literal `TOOL_CALL:` marker — accepted unconditionally.
    Marker,
    /// Call wrapped in backticks or asterisks.
    CodeWrapped,
    /// Call prefixed with a colon, e.g. "I'll run: get_monitors(...)".
    ColonPrefixed,
    /// Bare `name(args)` anywhere in the text.
    Bare,
}

/// A tool invocation found in response text, arguments still unparsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedCall {
    pub tool_name: String,
    pub raw_arguments: String,
    pub confidence: MatchConfidence,
}

static MATCHERS: LazyLock<Vec<(MatchConfidence, Regex)>> = LazyLock::new(|| {
    vec![
        // Non-greedy multi-line capture: the closing paren must be followed
        // by whitespace or end of input, so nested parens inside quoted
        // arguments survive. Deeply nested parens in the loose forms below
        // may still mis-extract; kept for compatibility with what models
        // actually emit.
        (
            MatchConfidence::Marker,
            Regex::new(r"(?s)TOOL_CALL:\s*(\w+)\((.*?)\)(?:\s|$)").expect("marker pattern"),
        ),
        // One pattern per delimiter so an opening backtick cannot pair with
        // a closing asterisk
        (
            MatchConfidence::CodeWrapped,
            Regex::new(r"`(\w+)\(([^)]*)\)`").expect("backtick-wrapped pattern"),
        ),
        (
            MatchConfidence::CodeWrapped,
            Regex::new(r"\*(\w+)\(([^)]*)\)\*").expect("asterisk-wrapped pattern"),
        ),
        (
            MatchConfidence::ColonPrefixed,
            Regex::new(r":\s*(\w+)\(([^)]*)\)").expect("colon-prefixed pattern"),
        ),
        (
            MatchConfidence::Bare,
            Regex::new(r"\b(\w+)\(([^)]*)\)").expect("bare pattern"),
        ),
    ]
});

/// Check whether an identifier plausibly names a tool.
fn is_plausible_tool_name(name: &str) -> bool {
    if name.ends_with(TOOL_SUFFIX) {
        return true;
    }
    let lower = name.to_lowercase();
    TOOL_VERBS.iter().any(|verb| lower.contains(verb))
}

/// Find a tool invocation in LLM response text.
///
/// Returns `None` when the text contains no invocation — a valid outcome
/// meaning the response is a direct answer, not an error.
pub fn extract_tool_call(text: &str) -> Option<ExtractedCall> {
    for (confidence, pattern) in MATCHERS.iter() {
        for caps in pattern.captures_iter(text) {
            let name = &caps[1];
            if *confidence != MatchConfidence::Marker && !is_plausible_tool_name(name) {
                continue;
            }
            return Some(ExtractedCall {
                tool_name: name.to_string(),
                raw_arguments: caps[2].trim().to_string(),
                confidence: *confidence,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_form_extracts() {
        let text = "Let me check.\nTOOL_CALL: get_monitors(group_states=\"alert\")\n";
        let call = extract_tool_call(text).unwrap();
        assert_eq!(call.tool_name, "get_monitors");
        assert_eq!(call.raw_arguments, "group_states=\"alert\"");
        assert_eq!(call.confidence, MatchConfidence::Marker);
    }

    #[test]
    fn marker_form_accepts_any_name() {
        // The explicit marker is trusted even for implausible names
        let call = extract_tool_call("TOOL_CALL: frobnicate(x=1)").unwrap();
        assert_eq!(call.tool_name, "frobnicate");
        assert_eq!(call.confidence, MatchConfidence::Marker);
    }

    #[test]
    fn marker_form_multiline_arguments() {
        let text = "TOOL_CALL: search_logs(query=\"service:web\",\n  time_range=\"1 hour\")\nDone.";
        let call = extract_tool_call(text).unwrap();
        assert_eq!(call.tool_name, "search_logs");
        assert!(call.raw_arguments.contains("time_range"));
    }

    #[test]
    fn zero_argument_call_is_valid() {
        let call = extract_tool_call("TOOL_CALL: list_dashboards()").unwrap();
        assert_eq!(call.tool_name, "list_dashboards");
        assert_eq!(call.raw_arguments, "");
    }

    #[test]
    fn code_wrapped_form() {
        let call = extract_tool_call("I'll use `get_monitors(limit=5)` for this.").unwrap();
        assert_eq!(call.tool_name, "get_monitors");
        assert_eq!(call.confidence, MatchConfidence::CodeWrapped);
    }

    #[test]
    fn asterisk_wrapped_form() {
        let call = extract_tool_call("Try *list_dashboards(name=\"web\")* next.").unwrap();
        assert_eq!(call.tool_name, "list_dashboards");
        assert_eq!(call.confidence, MatchConfidence::CodeWrapped);
    }

    #[test]
    fn mismatched_wrappers_do_not_count_as_code_wrapped() {
        let call = extract_tool_call("`get_monitors(limit=5)*").unwrap();
        assert_eq!(call.tool_name, "get_monitors");
        assert_eq!(call.confidence, MatchConfidence::Bare);
    }

    #[test]
    fn colon_prefixed_form() {
        let call = extract_tool_call("Running: search_events(query=\"deploy\")").unwrap();
        assert_eq!(call.tool_name, "search_events");
        assert_eq!(call.confidence, MatchConfidence::ColonPrefixed);
    }

    #[test]
    fn bare_form_with_plausible_name() {
        let call = extract_tool_call("query_metrics(query=\"avg:system.cpu.user{*}\")").unwrap();
        assert_eq!(call.tool_name, "query_metrics");
        assert_eq!(call.confidence, MatchConfidence::Bare);
    }

    #[test]
    fn mcp_suffix_passes_heuristic() {
        let call = extract_tool_call("Use `monitors_mcp(state=\"alert\")` here.").unwrap();
        assert_eq!(call.tool_name, "monitors_mcp");
    }

    #[test]
    fn implausible_names_rejected_in_loose_forms() {
        assert!(extract_tool_call("This works (mostly) fine. See also(below).").is_none());
        assert!(extract_tool_call("f(x) = x + 1").is_none());
    }

    #[test]
    fn implausible_candidate_does_not_shadow_later_plausible_one() {
        let call = extract_tool_call("note(aside) then get_recent_events(limit=3)").unwrap();
        assert_eq!(call.tool_name, "get_recent_events");
    }

    #[test]
    fn marker_wins_over_loose_forms() {
        let text = "`list_dashboards()` or TOOL_CALL: get_monitors()";
        let call = extract_tool_call(text).unwrap();
        assert_eq!(call.tool_name, "get_monitors");
        assert_eq!(call.confidence, MatchConfidence::Marker);
    }

    #[test]
    fn plain_text_yields_none() {
        assert!(extract_tool_call("Your CPU usage looks normal to me.").is_none());
        assert!(extract_tool_call("").is_none());
    }
}
