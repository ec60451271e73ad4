use clap::{Parser, Subcommand};
use colored::*;

use crate::models::summary::ShareReport;

mod analysis;
mod api;
mod cache;
mod config;
mod errors;
mod models;

#[derive(Parser)]
#[command(name = "okrdash")]
#[command(version = "0.1.0")]
#[command(about = "Track your share of completed team tickets against an OKR goal", long_about = None)]
struct Cli {
    /// for debugging purposes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up tracker credentials and tracking preferences
    Init,

    /// Show the performance dashboard (default command)
    Dashboard {
        /// Render for a specific team member instead of prompting
        #[arg(long)]
        assignee: Option<String>,

        /// Output the summary as JSON for scripting (requires --assignee)
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display current configuration (with masked secrets)
    Show,

    /// Set a specific configuration value
    Set {
        /// Configuration key (e.g., jira.email, tracking.goal_percent)
        key: String,
        /// New value
        value: String,
    },

    /// Validate configuration by testing the Jira connection
    Validate,

    /// Get the path to the config file
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    println!("{}", "okrdash v0.1.0".bright_cyan().bold());
    println!();

    let command = cli.command.unwrap_or(Commands::Dashboard {
        assignee: None,
        json: false,
    });

    let result = match command {
        Commands::Init => handle_init().await,

        Commands::Dashboard { assignee, json } => {
            handle_dashboard(assignee.as_deref(), json, cli.verbose).await
        }

        Commands::Config { action } => handle_config(action).await,
    };

    if let Err(e) = result {
        eprintln!("\n{}", e);
        std::process::exit(1);
    }

    println!();
}

async fn handle_dashboard(
    assignee: Option<&str>,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    use config::settings::Settings;
    use std::time::Duration;

    if json && assignee.is_none() {
        anyhow::bail!("--json requires --assignee (there is no prompt in scripted mode)");
    }

    let settings = Settings::load()?;
    let tracking = &settings.tracking;

    if !json {
        println!("{}", "Performance Tracker".cyan().bold());
        println!(
            "{}",
            format!(
                "  Tracking tickets created from {} onwards",
                tracking.go_live_date
            )
            .dimmed()
        );
        println!();
    }

    if verbose {
        let jql =
            api::jira::JiraClient::build_jql(&settings.jira.project_key, &tracking.go_live_date)?;
        println!("{}", format!("  JQL: {}", jql).dimmed());
        println!();
    }

    let jira = api::jira::JiraClient::new(
        settings.jira.url.clone(),
        settings.jira.email.clone(),
        settings.jira.api_token.clone(),
    );

    let mut cache =
        cache::TtlCache::new(Duration::from_secs(tracking.cache_minutes * 60));

    loop {
        if !json {
            if !cache.is_fresh() {
                println!("{}", "  Fetching tickets from Jira...".dimmed());
            } else if verbose {
                println!("{}", "  Using cached snapshot.".dimmed());
            }
        }

        let snapshot = cache
            .get_or_refresh(|| {
                jira.search_created_since(
                    &settings.jira.project_key,
                    &tracking.go_live_date,
                    tracking.max_results,
                )
            })
            .await?;

        if snapshot.is_empty() {
            println!();
            println!(
                "{}",
                "No tickets found for the current tracking period.".yellow()
            );
            return Ok(());
        }

        if !json && snapshot.len() == tracking.max_results as usize {
            println!(
                "{}",
                format!(
                    "  Showing the first {} tickets. Older tickets may be cut off.",
                    tracking.max_results
                )
                .dimmed()
            );
        }

        let members = analysis::share::team_members(snapshot);

        let selected = match assignee {
            Some(name) => {
                if !members.iter().any(|member| member == name) {
                    return Err(anyhow::anyhow!(
                        "{}",
                        errors::OkrDashError::UnknownAssignee(
                            name.to_string(),
                            members.join(", ")
                        )
                    ));
                }
                name.to_string()
            }
            None => {
                use dialoguer::Select;

                println!();
                let selection = Select::new()
                    .with_prompt("Select a team member to track")
                    .items(&members)
                    .interact_opt()?;

                match selection {
                    Some(index) => members[index].clone(),
                    None => return Ok(()),
                }
            }
        };

        let report =
            analysis::share::compute_summary(snapshot, &selected, &tracking.categories)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        render_dashboard(&report, tracking.goal_percent);

        if assignee.is_some() {
            return Ok(());
        }

        println!();
    }
}

const BAR_WIDTH: usize = 50;

fn render_dashboard(report: &ShareReport, goal_percent: f64) {
    let primary = &report.primary;
    let on_track = primary.share_percent >= goal_percent;

    let metric = if on_track {
        primary.formatted_share().green().bold()
    } else {
        primary.formatted_share().yellow().bold()
    };

    println!();
    println!(
        "  {} {}",
        format!("Your {} Market Share:", primary.category).bold(),
        metric
    );
    println!(
        "  {} {} {} tickets raised team-wide",
        "Total pool:".bold(),
        primary.team_total.to_string().bright_white(),
        primary.category
    );
    println!(
        "  {} {} tickets completed",
        "Your work:".bold(),
        primary.user_completed.to_string().bright_white()
    );

    let bar = render_share_bar(primary.share_percent, goal_percent, BAR_WIDTH);
    let bar = if on_track { bar.green() } else { bar.yellow() };

    println!();
    println!("  {} {}", bar, primary.formatted_share());
    println!(
        "  {}",
        format!("The ┊ marker is the {:.1}% target.", goal_percent).dimmed()
    );

    println!();
    println!("  {}", "Your Share Across All Categories".cyan().bold());
    println!();
    println!(
        "  {} {} {} {}",
        format!("{:<12}", "Category").bold(),
        format!("{:>12}", "Team Total").bold(),
        format!("{:>16}", "Your Completed").bold(),
        format!("{:>16}", "Current Share %").bold()
    );

    for row in &report.rows {
        println!(
            "  {:<12} {:>12} {:>16} {:>16}",
            row.category,
            row.team_total,
            row.user_completed,
            row.formatted_share()
        );
    }
}

/// Plain progress bar over a fixed [0, 100] domain, with the goal threshold
/// marked. Coloring is applied by the caller.
fn render_share_bar(share_percent: f64, goal_percent: f64, width: usize) -> String {
    let filled = ((share_percent / 100.0 * width as f64).round() as usize).min(width);
    let goal_cell = ((goal_percent / 100.0 * width as f64).round() as usize)
        .min(width.saturating_sub(1));

    (0..width)
        .map(|cell| {
            if cell == goal_cell {
                '┊'
            } else if cell < filled {
                '█'
            } else {
                '░'
            }
        })
        .collect()
}

fn mask_secret(secret: &str) -> String {
    format!(
        "{}***{}",
        &secret[..4.min(secret.len())],
        &secret[secret.len().saturating_sub(4)..]
    )
}

async fn handle_init() -> anyhow::Result<()> {
    use config::settings::{JiraConfig, Settings, TrackingConfig};

    println!("{}", "okrdash Configuration Setup".cyan().bold());
    println!();
    println!(
        "{}",
        "This will store your credentials in ~/.okrdash/config.toml".dimmed()
    );
    println!(
        "{}",
        "The file will be created with read-only permissions (600)".dimmed()
    );
    println!();

    println!("{}", "Jira Configuration".bold());
    let jira_url = prompt("Jira URL (e.g., https://yourcompany.atlassian.net)")?;
    let jira_email = prompt("Jira email")?;

    println!();
    println!("{}", "To create a Jira API token:".dimmed());
    println!(
        "{}",
        "  1. Go to https://id.atlassian.com/manage-profile/security/api-tokens".dimmed()
    );
    println!("{}", "  2. Click 'Create API token'".dimmed());
    println!("{}", "  3. Copy and paste it here".dimmed());
    println!();
    let api_token = prompt_password("Jira API token")?;
    let project_key = prompt_with_default("Project key", "TKTS")?;

    println!();
    println!("{}", "Tracking Preferences".bold());
    let go_live_date = prompt_with_default("Go-live date (YYYY-MM-DD)", "2026-02-01")?;
    let goal_input = prompt_with_default("Goal share percent", "20")?;
    let goal_percent: f64 = goal_input
        .parse()
        .map_err(|_| anyhow::anyhow!("Goal share percent must be a number, got '{}'", goal_input))?;

    let settings = Settings {
        jira: JiraConfig {
            url: jira_url.clone(),
            email: jira_email.clone(),
            api_token: api_token.clone(),
            project_key: project_key.clone(),
        },
        tracking: TrackingConfig {
            go_live_date,
            goal_percent,
            ..TrackingConfig::default()
        },
    };

    settings.validate()?;

    println!();
    println!("{}", "Validating configuration...".cyan());
    println!();

    print!("{}", "  Testing Jira connection... ".dimmed());
    std::io::Write::flush(&mut std::io::stdout())?;

    let jira = api::jira::JiraClient::new(jira_url, jira_email, api_token);

    match jira
        .search_created_since(&project_key, &settings.tracking.go_live_date, 1)
        .await
    {
        Ok(_) => {
            println!("{}", "✓".green().bold());
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            return Err(anyhow::anyhow!(
                "{}",
                errors::OkrDashError::ConfigValidationFailed(format!(
                    "Jira connection failed: {}",
                    e
                ))
            ));
        }
    }

    settings.save()?;

    let config_path = Settings::config_dir()?.join("config.toml");
    println!();
    println!("{}", "Configuration saved!".green().bold());
    println!(
        "  Location: {}",
        config_path.display().to_string().bright_white()
    );
    println!();
    println!("{}", "Keep your API token secure!".yellow());
    println!("{}", "  Never commit config.toml to git".dimmed());

    Ok(())
}

async fn handle_config(action: ConfigAction) -> anyhow::Result<()> {
    use anyhow::Context;
    use config::settings::Settings;

    match action {
        ConfigAction::Show => {
            let settings = Settings::load()?;

            println!("{}", "Current Configuration".cyan().bold());
            println!();

            println!("{}", "[jira]".bold());
            println!("  {} {}", "url:".dimmed(), settings.jira.url.bright_white());
            println!(
                "  {} {}",
                "email:".dimmed(),
                settings.jira.email.bright_white()
            );
            println!(
                "  {} {}",
                "api_token:".dimmed(),
                mask_secret(&settings.jira.api_token).yellow()
            );
            println!(
                "  {} {}",
                "project_key:".dimmed(),
                settings.jira.project_key.bright_white()
            );

            println!();
            println!("{}", "[tracking]".bold());
            println!(
                "  {} {}",
                "go_live_date:".dimmed(),
                settings.tracking.go_live_date.bright_white()
            );
            println!(
                "  {} {}",
                "goal_percent:".dimmed(),
                settings.tracking.goal_percent.to_string().bright_white()
            );
            println!(
                "  {} {}",
                "categories:".dimmed(),
                settings.tracking.categories.join(", ").bright_white()
            );
            println!(
                "  {} {}",
                "max_results:".dimmed(),
                settings.tracking.max_results.to_string().bright_white()
            );
            println!(
                "  {} {}",
                "cache_minutes:".dimmed(),
                settings.tracking.cache_minutes.to_string().bright_white()
            );

            Ok(())
        }

        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;

            let parts: Vec<&str> = key.split('.').collect();
            if parts.len() != 2 {
                return Err(anyhow::anyhow!(
                    "Invalid key format. Use format: section.field (e.g., jira.email)"
                ));
            }

            let section = parts[0];
            let field = parts[1];

            match (section, field) {
                ("jira", "url") => settings.jira.url = value.clone(),
                ("jira", "email") => settings.jira.email = value.clone(),
                ("jira", "api_token") => settings.jira.api_token = value.clone(),
                ("jira", "project_key") => settings.jira.project_key = value.clone(),
                ("tracking", "go_live_date") => settings.tracking.go_live_date = value.clone(),
                ("tracking", "goal_percent") => {
                    settings.tracking.goal_percent = value
                        .parse()
                        .context("tracking.goal_percent must be a number")?
                }
                ("tracking", "max_results") => {
                    settings.tracking.max_results = value
                        .parse()
                        .context("tracking.max_results must be a positive integer")?
                }
                ("tracking", "cache_minutes") => {
                    settings.tracking.cache_minutes = value
                        .parse()
                        .context("tracking.cache_minutes must be a positive integer")?
                }
                _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
            }

            settings.validate()?;
            settings.save()?;

            println!(
                "{}",
                format!("✓ Updated {} to: {}", key, value).green().bold()
            );
            println!();
            println!("{}", "Configuration saved successfully!".green());

            Ok(())
        }

        ConfigAction::Validate => {
            println!("{}", "Validating configuration...".cyan().bold());
            println!();

            let settings = Settings::load()?;

            print!("{}", "  Testing Jira connection... ".dimmed());
            std::io::Write::flush(&mut std::io::stdout())?;

            let jira = api::jira::JiraClient::new(
                settings.jira.url.clone(),
                settings.jira.email.clone(),
                settings.jira.api_token.clone(),
            );

            match jira
                .search_created_since(
                    &settings.jira.project_key,
                    &settings.tracking.go_live_date,
                    1,
                )
                .await
            {
                Ok(_) => {
                    println!("{}", "✓".green().bold());
                }
                Err(e) => {
                    println!("{}", "✗".red().bold());
                    println!();
                    println!("{}", format!("  Jira connection failed: {}", e).red());
                    println!();
                    println!("{}", "  To fix:".yellow());
                    println!("{}", "    1. Check your Jira URL is correct".dimmed());
                    println!(
                        "{}",
                        "    2. Verify your authentication token is valid".dimmed()
                    );
                    println!(
                        "{}",
                        "    3. Update with: okrdash config set jira.api_token <new-token>"
                            .dimmed()
                    );
                    return Err(anyhow::anyhow!("Jira validation failed"));
                }
            }

            println!();
            println!("{}", "✓ All validations passed!".green().bold());

            Ok(())
        }

        ConfigAction::Path => {
            let config_path = Settings::config_dir()?.join("config.toml");
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn prompt(message: &str) -> anyhow::Result<String> {
    use std::io::Write;
    print!("{}: ", message.bright_white());
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_password(message: &str) -> anyhow::Result<String> {
    use std::io::Write;
    print!("{}: ", message.bright_white());
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(message: &str, default: &str) -> anyhow::Result<String> {
    use std::io::Write;
    print!("{} [{}]: ", message.bright_white(), default.dimmed());
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_bar_has_fixed_width() {
        let bar = render_share_bar(50.0, 20.0, 50);
        assert_eq!(bar.chars().count(), 50);
    }

    #[test]
    fn test_share_bar_fills_to_share() {
        let bar = render_share_bar(50.0, 20.0, 50);
        let chars: Vec<char> = bar.chars().collect();
        assert_eq!(chars[0], '█');
        assert_eq!(chars[24], '█');
        assert_eq!(chars[25], '░');
    }

    #[test]
    fn test_share_bar_marks_goal_cell() {
        let bar = render_share_bar(50.0, 20.0, 50);
        assert_eq!(bar.chars().nth(10), Some('┊'));
    }

    #[test]
    fn test_share_bar_empty_share() {
        let bar = render_share_bar(0.0, 20.0, 50);
        let chars: Vec<char> = bar.chars().collect();
        assert_eq!(chars[0], '░');
        assert_eq!(chars[10], '┊');
        assert_eq!(chars[49], '░');
    }

    #[test]
    fn test_share_bar_full_share() {
        let bar = render_share_bar(100.0, 20.0, 50);
        let chars: Vec<char> = bar.chars().collect();
        assert_eq!(chars[0], '█');
        assert_eq!(chars[49], '█');
        assert_eq!(chars[10], '┊');
    }

    #[test]
    fn test_share_bar_goal_at_domain_edge_stays_in_bounds() {
        let bar = render_share_bar(0.0, 100.0, 50);
        assert_eq!(bar.chars().count(), 50);
        assert_eq!(bar.chars().nth(49), Some('┊'));
    }

    #[test]
    fn test_mask_secret_keeps_edges() {
        assert_eq!(mask_secret("abcdefghij"), "abcd***ghij");
    }

    #[test]
    fn test_mask_secret_short_value() {
        let masked = mask_secret("ab");
        assert!(masked.contains("***"));
    }
}
