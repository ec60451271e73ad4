use crate::models::summary::{CategorySummary, ShareReport};
use crate::models::ticket::Ticket;
use anyhow::Result;

/// Distinct assignee values in the snapshot, sorted. These populate the
/// selection control; "Unassigned" appears like any other member.
pub fn team_members(snapshot: &[Ticket]) -> Vec<String> {
    let mut members: Vec<String> = snapshot
        .iter()
        .map(|ticket| ticket.assignee.clone())
        .collect();
    members.sort();
    members.dedup();
    members
}

/// One breakdown row. A ticket belongs to the category when its type name
/// contains the category as a case-insensitive substring, so "ANZ - Display"
/// and "UK - Display" both land in "Display". Categories are allowed to
/// overlap; they are not a partition.
pub fn category_summary(snapshot: &[Ticket], assignee: &str, category: &str) -> CategorySummary {
    let needle = category.to_lowercase();
    let pool: Vec<&Ticket> = snapshot
        .iter()
        .filter(|ticket| ticket.issue_type.to_lowercase().contains(&needle))
        .collect();

    let team_total = pool.len();
    let user_completed = pool
        .iter()
        .filter(|ticket| ticket.assignee == assignee && ticket.is_closed)
        .count();

    let share_percent = if team_total > 0 {
        user_completed as f64 / team_total as f64 * 100.0
    } else {
        0.0
    };

    CategorySummary {
        category: category.to_string(),
        team_total,
        user_completed,
        share_percent,
    }
}

/// Full report for one selected member: one row per configured category, the
/// first category surfaced as the headline metric.
pub fn compute_summary(
    snapshot: &[Ticket],
    assignee: &str,
    categories: &[String],
) -> Result<ShareReport> {
    anyhow::ensure!(!categories.is_empty(), "No categories configured");

    let rows: Vec<CategorySummary> = categories
        .iter()
        .map(|category| category_summary(snapshot, assignee, category))
        .collect();

    Ok(ShareReport {
        assignee: assignee.to_string(),
        primary: rows[0].clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(key: &str, issue_type: &str, assignee: &str, status: &str) -> Ticket {
        Ticket {
            key: key.to_string(),
            issue_type: issue_type.to_string(),
            assignee: assignee.to_string(),
            status: status.to_string(),
            is_closed: matches!(
                status.to_lowercase().as_str(),
                "closed" | "done" | "resolved"
            ),
        }
    }

    fn sample_snapshot() -> Vec<Ticket> {
        vec![
            ticket("TKTS-1", "ANZ - Display", "Alice", "Done"),
            ticket("TKTS-2", "UK - Display", "Bob", "Open"),
            ticket("TKTS-3", "Video", "Alice", "Closed"),
        ]
    }

    #[test]
    fn test_team_members_sorted_distinct() {
        let members = team_members(&sample_snapshot());
        assert_eq!(members, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_display_share_for_alice() {
        let row = category_summary(&sample_snapshot(), "Alice", "Display");
        assert_eq!(row.team_total, 2);
        assert_eq!(row.user_completed, 1);
        assert_eq!(row.share_percent, 50.0);
    }

    #[test]
    fn test_video_share_for_alice() {
        let row = category_summary(&sample_snapshot(), "Alice", "Video");
        assert_eq!(row.team_total, 1);
        assert_eq!(row.user_completed, 1);
        assert_eq!(row.share_percent, 100.0);
    }

    #[test]
    fn test_empty_category_yields_zero_share() {
        let row = category_summary(&sample_snapshot(), "Alice", "Pixel");
        assert_eq!(row.team_total, 0);
        assert_eq!(row.user_completed, 0);
        assert_eq!(row.share_percent, 0.0);
    }

    #[test]
    fn test_open_tickets_do_not_count_as_completed() {
        let row = category_summary(&sample_snapshot(), "Bob", "Display");
        assert_eq!(row.team_total, 2);
        assert_eq!(row.user_completed, 0);
        assert_eq!(row.share_percent, 0.0);
    }

    #[test]
    fn test_category_match_is_case_insensitive() {
        let snapshot = vec![ticket("TKTS-9", "display banner", "Alice", "Done")];
        let row = category_summary(&snapshot, "Alice", "Display");
        assert_eq!(row.team_total, 1);
        assert_eq!(row.user_completed, 1);
    }

    #[test]
    fn test_one_ticket_may_land_in_several_categories() {
        let snapshot = vec![ticket("TKTS-10", "Display Video Combo", "Alice", "Done")];
        let display = category_summary(&snapshot, "Alice", "Display");
        let video = category_summary(&snapshot, "Alice", "Video");
        assert_eq!(display.team_total, 1);
        assert_eq!(video.team_total, 1);
    }

    #[test]
    fn test_unassigned_aggregates_like_any_member() {
        let snapshot = vec![
            ticket("TKTS-11", "Pixel", "Unassigned", "Done"),
            ticket("TKTS-12", "Pixel", "Alice", "Open"),
        ];
        let members = team_members(&snapshot);
        assert!(members.contains(&"Unassigned".to_string()));

        let row = category_summary(&snapshot, "Unassigned", "Pixel");
        assert_eq!(row.team_total, 2);
        assert_eq!(row.user_completed, 1);
        assert_eq!(row.share_percent, 50.0);
    }

    #[test]
    fn test_compute_summary_matches_example_scenario() {
        let categories: Vec<String> = ["Display", "Video", "Pixel", "Bespoke"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let report = compute_summary(&sample_snapshot(), "Alice", &categories).unwrap();

        assert_eq!(report.assignee, "Alice");
        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.primary, report.rows[0]);
        assert_eq!(report.primary.category, "Display");
        assert_eq!(report.primary.share_percent, 50.0);
        assert_eq!(report.rows[1].share_percent, 100.0);
        assert_eq!(report.rows[2].share_percent, 0.0);
        assert_eq!(report.rows[3].team_total, 0);
    }

    #[test]
    fn test_compute_summary_is_deterministic() {
        let categories = vec!["Display".to_string(), "Video".to_string()];
        let snapshot = sample_snapshot();

        let first = compute_summary(&snapshot, "Alice", &categories).unwrap();
        let second = compute_summary(&snapshot, "Alice", &categories).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_summary_rejects_empty_category_list() {
        assert!(compute_summary(&sample_snapshot(), "Alice", &[]).is_err());
    }
}
