//! Command handlers for the sweep CLI.

use libsweep::{CleanSummary, Config, Credentials, Result, Sweep};
use owo_colors::OwoColorize;


/// Turns CLI auth flags into credentials.
///
/// A username without a password triggers an interactive prompt; no
/// username means anonymous access.
pub fn resolve_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Option<Credentials> {
    match (username, password) {
        (Some(user), Some(pass)) => Some(Credentials::basic(user, pass)),
        (Some(user), None) => {
            let pass = rpassword::prompt_password("Password: ").unwrap_or_default();
            Some(Credentials::basic(user, pass))
        }
        (None, _) => None,
    }
}

async fn build_sweep(
    config: Config,
    registry_url: &str,
    credentials: Option<Credentials>,
) -> Result<Sweep> {
    let mut builder = Sweep::builder(registry_url).with_config(config);
    if let Some(creds) = credentials {
        builder = builder.with_credentials(creds);
    }
    builder.build().await
}

/// Handles `sweep repos <registry>`.
pub async fn handle_repos(
    config: Config,
    registry_url: &str,
    credentials: Option<Credentials>,
) -> Result<()> {
    let sweep = build_sweep(config, registry_url, credentials).await?;
    for repository in sweep.list_repositories().await {
        println!("{}", repository);
    }
    Ok(())
}

/// Handles `sweep tags <registry> <repository>`.
pub async fn handle_tags(
    config: Config,
    registry_url: &str,
    repository: &str,
    credentials: Option<Credentials>,
) -> Result<()> {
    let sweep = build_sweep(config, registry_url, credentials).await?;
    for tag in sweep.list_tags(repository).await {
        println!("{}", tag);
    }
    Ok(())
}

/// Handles `sweep clean <registry>`.
pub async fn handle_clean(
    config: Config,
    registry_url: &str,
    prefix: Option<&str>,
    dry_run: bool,
    credentials: Option<Credentials>,
) -> Result<()> {
    let prefix = prefix
        .map(str::to_owned)
        .unwrap_or_else(|| config.clean.prefix.clone());

    let sweep = build_sweep(config, registry_url, credentials).await?;
    let summary = sweep.clean(&prefix, dry_run).await;

    for line in summary_lines(&summary) {
        println!("{}", line);
    }

    let failures: usize = summary.reports.iter().map(|r| r.failed.len()).sum();
    let tally = format!(
        "{} repositories processed, {} skipped, {} tag failures",
        summary.reports.len(),
        summary.skipped.len(),
        failures
    );
    if failures == 0 {
        println!("{}", tally.green());
    } else {
        println!("{}", tally.yellow());
    }

    Ok(())
}

/// Renders a clean summary as plain report lines.
pub fn summary_lines(summary: &CleanSummary) -> Vec<String> {
    let mut lines = Vec::new();

    for report in &summary.reports {
        let kept = report
            .retained
            .as_ref()
            .map(|tag| format!(" (kept {})", tag))
            .unwrap_or_default();

        if report.deleted.is_empty() && report.failed.is_empty() {
            lines.push(format!("{}: nothing to delete{}", report.repository, kept));
        } else if !report.deleted.is_empty() {
            let action = if report.dry_run {
                "would delete"
            } else {
                "deleted"
            };
            lines.push(format!(
                "{}: {} {}{}",
                report.repository,
                action,
                report.deleted.join(", "),
                kept
            ));
        }

        for failure in &report.failed {
            lines.push(format!(
                "{}: skipped {} ({})",
                report.repository, failure.tag, failure.reason
            ));
        }
    }

    for repository in &summary.skipped {
        lines.push(format!("{}: skipped (does not match prefix)", repository));
    }

    lines
}
