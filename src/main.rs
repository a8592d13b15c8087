use std::fs::{self, File};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use crossterm::style::Stylize;
use serde_json::Value;

use handlecheck::config::config::Config;
use handlecheck::{display, exporter, HistoryClient};

#[derive(Parser)]
#[command(
    name = "handlecheck",
    version,
    about = "Twitter/X username history checker"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check username history for one or more accounts
    Check {
        /// Twitter/X username(s), with or without a leading @
        #[arg(required = true)]
        usernames: Vec<String>,

        /// Save results to a file
        #[arg(long)]
        save: bool,

        /// Output filename (defaults to a timestamped name)
        #[arg(long)]
        output: Option<String>,

        /// Export format: json or csv
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Full profile analysis for a single account
    Analyze {
        /// Twitter/X username
        username: String,

        /// Save the raw analysis payload to a file
        #[arg(long)]
        save: bool,
    },

    /// Check every username listed in a file (one per line)
    Batch {
        /// File with one username per line; blank lines are skipped
        file: String,

        /// Seconds to wait between requests (default from config)
        #[arg(long)]
        delay: Option<f64>,

        /// Output filename for the JSON results
        #[arg(long)]
        output: Option<String>,
    },

    /// Show the API rate-limit status
    RateLimit,
}

fn main() {
    handlecheck::logging::init_tracing();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        std::process::exit(1);
    };

    if let Err(e) = run(command) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    let config = Config::load()?;
    let client = HistoryClient::from_config(&config)?;

    match command {
        Commands::Check {
            usernames,
            save,
            output,
            format,
        } => check(&client, &config, &usernames, save, output, &format),
        Commands::Analyze { username, save } => analyze(&client, &username, save),
        Commands::Batch {
            file,
            delay,
            output,
        } => batch(&client, &config, &file, delay, output),
        Commands::RateLimit => rate_limit(&client),
    }
}

fn check(
    client: &HistoryClient,
    config: &Config,
    usernames: &[String],
    save: bool,
    output: Option<String>,
    format: &str,
) -> Result<()> {
    if let [username] = usernames {
        println!("{}", format!("Checking @{}...", username).cyan());

        let result = client.check_username_history(username)?.tagged(username);
        println!("{}", display::format_result(&result));

        if save {
            let path = output.unwrap_or_else(|| {
                exporter::default_export_path(&format!("handlecheck_{}", username), format)
            });
            exporter::export_results(std::slice::from_ref(&result), &path, format)?;
            println!("Results exported to {}", path);
        }
        return Ok(());
    }

    let delay = Duration::from_secs_f64(config.batch.delay_secs);
    let results = client.batch_check(usernames, delay, None);

    for result in &results {
        println!("{}", display::format_result(result));
    }

    if save {
        let path =
            output.unwrap_or_else(|| exporter::default_export_path("handlecheck_batch", format));
        exporter::export_results(&results, &path, format)?;
        println!("Results exported to {}", path);
    }

    Ok(())
}

fn analyze(client: &HistoryClient, username: &str, save: bool) -> Result<()> {
    println!("{}", format!("Analyzing @{}...", username).cyan());

    let analysis = client.analyze_profile(username)?;

    let success = analysis
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !success {
        let error = analysis
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        anyhow::bail!("{}", error);
    }

    println!("\nProfile Analysis for @{}", username);
    println!("==================================================");
    println!(
        "Followers: {}",
        render_count(analysis.pointer("/profile/followers_count"))
    );
    println!(
        "Following: {}",
        render_count(analysis.pointer("/profile/following_count"))
    );
    println!(
        "Network size: {}",
        analysis
            .get("network")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    );

    if save {
        let path = exporter::default_export_path(&format!("handlecheck_analysis_{}", username), "json");
        let file = File::create(&path).with_context(|| format!("cannot create {}", path))?;
        serde_json::to_writer_pretty(file, &analysis)?;
        println!("\nAnalysis saved to {}", path);
    }

    Ok(())
}

fn batch(
    client: &HistoryClient,
    config: &Config,
    file: &str,
    delay: Option<f64>,
    output: Option<String>,
) -> Result<()> {
    let contents =
        fs::read_to_string(file).with_context(|| format!("cannot read username list {}", file))?;
    let usernames = read_usernames(&contents);

    println!("Loaded {} usernames from {}", usernames.len(), file);

    let delay = Duration::from_secs_f64(delay.unwrap_or(config.batch.delay_secs));
    let results = client.batch_check(&usernames, delay, None);

    println!("{}", display::render_results_table(&results));
    println!("\n{}", display::batch_summary(&results));

    let path = output.unwrap_or_else(|| exporter::default_export_path("handlecheck_batch", "json"));
    exporter::export_results(&results, &path, "json")?;
    println!("\nDetailed results saved to {}", path);

    Ok(())
}

fn rate_limit(client: &HistoryClient) -> Result<()> {
    let status = client.rate_limit_status();
    println!("{}", serde_json::to_string_pretty(&Value::Object(status))?);
    Ok(())
}

fn render_count(value: Option<&Value>) -> String {
    match value {
        Some(v) if !v.is_null() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

/// One username per line; surrounding whitespace and blank lines dropped.
fn read_usernames(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::read_usernames;

    #[test]
    fn username_list_skips_blank_lines() {
        let usernames = read_usernames("jack\n\n  \n@elonmusk  \n");
        assert_eq!(usernames, vec!["jack", "@elonmusk"]);
    }
}
