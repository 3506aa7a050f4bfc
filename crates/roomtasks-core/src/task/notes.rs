//! Link side channel carried in task notes.
//!
//! The Tasks API does not accept links on creation, so tasks created from a
//! chat message end their notes with a line such as
//! `:slack: <https://example.slack.com/archives/C1/p2|the question>`.

use super::{LinkKind, TaskLink};

const SLACK_LINK_PREFIX: &str = ":slack: <http";

/// Extract the link stored on the last line of `notes`, if any.
pub fn extract_link(notes: &str) -> Option<TaskLink> {
    let last_line = notes.rsplit('\n').next()?;
    if !last_line.starts_with(SLACK_LINK_PREFIX) {
        return None;
    }

    let (_, target) = last_line.split_once('<')?;
    let (url, description) = target.split_once('|')?;
    let description = description.strip_suffix('>').unwrap_or(description);

    Some(TaskLink::new(url, description, LinkKind::Slack))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_link_from_last_line() {
        let notes = "call back the supplier\n:slack: <https://team.slack.com/archives/C1/p2|order thread>";
        let link = extract_link(notes).unwrap();
        assert_eq!(link.url, "https://team.slack.com/archives/C1/p2");
        assert_eq!(link.description, "order thread");
        assert_eq!(link.kind, LinkKind::Slack);
    }

    #[test]
    fn single_line_notes() {
        let link = extract_link(":slack: <https://x.slack.com/a|msg>").unwrap();
        assert_eq!(link.description, "msg");
    }

    #[test]
    fn ignores_marker_not_on_last_line() {
        let notes = ":slack: <https://x.slack.com/a|msg>\nsee above";
        assert!(extract_link(notes).is_none());
    }

    #[test]
    fn ignores_plain_notes_and_malformed_marker() {
        assert!(extract_link("").is_none());
        assert!(extract_link("buy milk").is_none());
        assert!(extract_link(":slack: <https://x.slack.com/a>").is_none());
    }
}
