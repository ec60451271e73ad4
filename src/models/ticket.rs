use serde::{Deserialize, Serialize};

/// Assignee value substituted when the tracker reports no assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Workflow statuses that count as completed work.
const COMPLETED_STATUSES: [&str; 3] = ["closed", "done", "resolved"];

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
pub struct RawIssue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields {
    #[serde(rename = "issuetype")]
    pub issue_type: IssueType,
    #[serde(default)]
    pub assignee: Option<User>,
    pub status: Status,
}

#[derive(Debug, Deserialize)]
pub struct IssueType {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Status {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct User {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// One normalized row of the snapshot. `is_closed` is derived from the
/// status name once, at normalization time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticket {
    pub key: String,
    pub issue_type: String,
    pub assignee: String,
    pub status: String,
    pub is_closed: bool,
}

impl Ticket {
    pub fn from_raw(raw: RawIssue) -> Self {
        let status = raw.fields.status.name;
        let is_closed = status_is_completed(&status);

        Self {
            key: raw.key,
            issue_type: raw.fields.issue_type.name,
            assignee: raw
                .fields
                .assignee
                .map(|user| user.display_name)
                .unwrap_or_else(|| UNASSIGNED.to_string()),
            status,
            is_closed,
        }
    }
}

fn status_is_completed(status: &str) -> bool {
    COMPLETED_STATUSES.contains(&status.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(key: &str, issue_type: &str, assignee: Option<&str>, status: &str) -> RawIssue {
        RawIssue {
            key: key.to_string(),
            fields: IssueFields {
                issue_type: IssueType {
                    name: issue_type.to_string(),
                },
                assignee: assignee.map(|name| User {
                    display_name: name.to_string(),
                }),
                status: Status {
                    name: status.to_string(),
                },
            },
        }
    }

    #[test]
    fn test_completed_statuses_any_case() {
        for status in ["Closed", "DONE", "resolved", "Done"] {
            let ticket = Ticket::from_raw(raw("TKTS-1", "Video", Some("Alice"), status));
            assert!(ticket.is_closed, "expected '{}' to count as closed", status);
        }
    }

    #[test]
    fn test_open_statuses_stay_open() {
        for status in ["Open", "In Progress", "To Do", "Blocked", ""] {
            let ticket = Ticket::from_raw(raw("TKTS-2", "Video", Some("Alice"), status));
            assert!(!ticket.is_closed, "expected '{}' to stay open", status);
        }
    }

    #[test]
    fn test_missing_assignee_becomes_unassigned() {
        let ticket = Ticket::from_raw(raw("TKTS-3", "ANZ - Display", None, "Open"));
        assert_eq!(ticket.assignee, UNASSIGNED);
        assert_eq!(ticket.issue_type, "ANZ - Display");
    }

    #[test]
    fn test_from_raw_keeps_original_status_text() {
        let ticket = Ticket::from_raw(raw("TKTS-4", "Pixel", Some("Bob"), "Done"));
        assert_eq!(ticket.status, "Done");
        assert!(ticket.is_closed);
    }
}
