//! Parses tool requests out of raw model output.
//!
//! The model signals a tool call with two marked lines:
//!
//! ```text
//! Action: query_document
//! Action Input: refund policy
//! ```
//!
//! Both markers must appear somewhere in the content for a call to be
//! recognized; otherwise the content is the answer as-is. Only the first
//! line carrying each marker is read. Later duplicate markers are
//! ignored, and output interleaving several action blocks has no defined
//! meaning beyond that.

pub const ACTION_MARKER: &str = "Action:";
pub const ACTION_INPUT_MARKER: &str = "Action Input:";

/// What the model asked for, as a typed value the orchestrator can branch
/// on instead of re-scanning the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelDirective {
    /// No tool requested; the content is the final answer.
    Direct(String),
    /// A tool invocation with its single string argument. Either field may
    /// be empty when the marker appeared mid-line rather than as a line
    /// prefix; lookup against the registry decides what happens next.
    ToolCall { name: String, argument: String },
}

pub fn parse_directive(content: &str) -> ModelDirective {
    if !content.contains(ACTION_MARKER) || !content.contains(ACTION_INPUT_MARKER) {
        return ModelDirective::Direct(content.to_string());
    }

    ModelDirective::ToolCall {
        name: first_marked_line(content, ACTION_MARKER),
        argument: first_marked_line(content, ACTION_INPUT_MARKER),
    }
}

fn first_marked_line(content: &str, marker: &str) -> String {
    content
        .lines()
        .find_map(|line| line.strip_prefix(marker))
        .map(|rest| rest.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{parse_directive, ModelDirective};

    #[test]
    fn content_without_markers_is_a_direct_answer() {
        let content = "The capital of France is Paris.";
        assert_eq!(
            parse_directive(content),
            ModelDirective::Direct(content.to_string())
        );
    }

    #[test]
    fn a_single_marker_is_not_enough() {
        let content = "Action: query_document\nbut no input line";
        assert_eq!(
            parse_directive(content),
            ModelDirective::Direct(content.to_string())
        );
    }

    #[test]
    fn both_markers_parse_into_a_tool_call() {
        let content = "I should look this up.\nAction: query_document\nAction Input: refund policy";
        assert_eq!(
            parse_directive(content),
            ModelDirective::ToolCall {
                name: "query_document".to_string(),
                argument: "refund policy".to_string(),
            }
        );
    }

    #[test]
    fn first_marked_lines_win_over_later_duplicates() {
        let content = "Action: query_document\nAction Input: first query\n\
                       Action: ingest_document\nAction Input: second query";
        assert_eq!(
            parse_directive(content),
            ModelDirective::ToolCall {
                name: "query_document".to_string(),
                argument: "first query".to_string(),
            }
        );
    }

    #[test]
    fn surrounding_whitespace_is_stripped_from_both_fields() {
        let content = "Action:   ingest_document   \nAction Input:   /tmp/report.pdf  ";
        assert_eq!(
            parse_directive(content),
            ModelDirective::ToolCall {
                name: "ingest_document".to_string(),
                argument: "/tmp/report.pdf".to_string(),
            }
        );
    }

    #[test]
    fn mid_line_markers_yield_empty_fields() {
        // The substring test passes but no line starts with either marker,
        // so the call surfaces with empty name and argument and fails the
        // registry lookup downstream.
        let content = "I could emit Action: here and Action Input: there, inline.";
        assert_eq!(
            parse_directive(content),
            ModelDirective::ToolCall {
                name: String::new(),
                argument: String::new(),
            }
        );
    }

    #[test]
    fn input_marker_line_does_not_satisfy_the_action_marker() {
        let content = "Action Input: orphaned input\nAction: lookup";
        assert_eq!(
            parse_directive(content),
            ModelDirective::ToolCall {
                name: "lookup".to_string(),
                argument: "orphaned input".to_string(),
            }
        );
    }
}
