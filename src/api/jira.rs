use crate::models::ticket::{SearchResponse, Ticket};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;

/// Fields requested from the search endpoint. Everything the normalizer
/// reads and nothing more.
const SEARCH_FIELDS: [&str; 3] = ["issuetype", "assignee", "status"];

pub struct JiraClient {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(base_url: String, email: String, api_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            email,
            api_token,
        }
    }

    /// Fetch one page of tickets created on or after `since_date` and
    /// normalize them into snapshot rows. Only the first `max_results`
    /// tickets are returned; no pagination is performed.
    pub async fn search_created_since(
        &self,
        project_key: &str,
        since_date: &str,
        max_results: u32,
    ) -> Result<Vec<Ticket>> {
        let jql = Self::build_jql(project_key, since_date)?;
        let url = format!("{}/rest/api/3/search/jql", self.base_url);

        let payload = serde_json::json!({
            "jql": jql,
            "fields": SEARCH_FIELDS,
            "maxResults": max_results,
        });

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&payload)
            .send()
            .await
            .context("Failed to send search request to Jira")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Jira API error ({}): {}", status, text);
        }

        let search = response
            .json::<SearchResponse>()
            .await
            .context("Failed to parse Jira search response")?;

        Ok(search.issues.into_iter().map(Ticket::from_raw).collect())
    }

    /// The query sent to the tracker. `since_date` must be a real calendar
    /// date; rejected here, before any network traffic.
    pub fn build_jql(project_key: &str, since_date: &str) -> Result<String> {
        NaiveDate::parse_from_str(since_date, "%Y-%m-%d").with_context(|| {
            format!(
                "Invalid go-live date '{}' (expected YYYY-MM-DD)",
                since_date
            )
        })?;

        Ok(format!(
            "project = {} AND created >= \"{}\"",
            project_key, since_date
        ))
    }
}
