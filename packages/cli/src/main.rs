mod checksum;
mod client;
mod table;

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use common::auth::{self, RELEASE_MANAGE};
use common::validate::is_eula_update_allowed;
use console::style;
use tracing::Level;

use crate::client::{ActionStatus, TrackerClient};

/// Publish and inspect releases on a release tracker server.
#[derive(Parser, Debug)]
#[command(name = "tracker", version, about, long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(long, env = "TRACKER_SERVER", default_value = "http://127.0.0.1:3000", global = true)]
    server: String,

    /// Bearer token with `release:manage`, needed for updates
    #[arg(long, env = "TRACKER_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Log HTTP traffic
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the published platform releases
    Versions,
    /// Print the current EULA
    Eula,
    /// Validate a platform table file and publish it, replacing the current table
    PushVersions {
        /// TOML file with one `[[platform]]` entry per platform
        table: PathBuf,
    },
    /// Publish a new EULA
    SetEula {
        #[arg(long)]
        version: String,
        /// File holding the EULA text; HTML is published as written
        #[arg(long)]
        text_file: PathBuf,
    },
    /// Print the SHA-256 checksum of a file
    Checksum { file: PathBuf },
    /// Mint a token granting `release:manage`
    Token {
        /// Secret the server verifies tokens with
        #[arg(long, env = "TRACKER__AUTH__JWT_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(long, default_value = "release-manager")]
        subject: String,
        /// Validity in days
        #[arg(long, default_value_t = 30)]
        days: i64,
    },
    /// Delete every option the server stores
    Purge,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let client = || TrackerClient::new(&cli.server, cli.token.clone());

    match cli.command {
        Command::Versions => {
            let table = client()?.versions()?;
            if table.is_empty() {
                println!("{}", style("No platforms published").dim());
            }
            for (id, record) in table.iter() {
                println!(
                    "{} {} {}",
                    style(id).cyan().bold(),
                    style(&record.version).green(),
                    style(&record.name).dim()
                );
                println!("  url:    {}", record.download_url);
                println!("  sha256: {}", record.shasum);
                if !record.payload_url.is_empty() {
                    println!("  payload: {}", record.payload_url);
                }
            }
        }
        Command::Eula => {
            let eula = client()?.eula()?;
            println!("{} {}", style("version:").bold(), eula.version);
            println!("{}", eula.text);
        }
        Command::PushVersions { table: path } => {
            let rows = table::load_rows(&path)?;
            let table = match table::check_rows(rows) {
                Ok(table) => table,
                Err(reports) => {
                    for report in &reports {
                        eprintln!(
                            "{} row {} ({}): invalid {}",
                            style("✗").red(),
                            report.position,
                            if report.platform_id.is_empty() {
                                "no id"
                            } else {
                                report.platform_id.as_str()
                            },
                            report.fields.join(", ")
                        );
                    }
                    bail!("{} invalid row(s), nothing was sent", reports.len());
                }
            };
            let status = client()?.update_version_data(&table)?;
            report_status(&status)?;
            println!("Published {} platform(s)", table.len());
        }
        Command::SetEula { version, text_file } => {
            let text = std::fs::read_to_string(&text_file)
                .with_context(|| format!("Failed to read {}", text_file.display()))?;
            if !is_eula_update_allowed(&version, &text) {
                bail!("Both the EULA version and text must be non-empty");
            }
            let status = client()?.update_eula(&version, &text)?;
            report_status(&status)?;
        }
        Command::Checksum { file } => {
            println!("{}", checksum::sha256_file(&file)?);
        }
        Command::Token {
            secret,
            subject,
            days,
        } => {
            let token = auth::sign(
                &subject,
                vec![RELEASE_MANAGE.to_string()],
                &secret,
                token_ttl(days)?,
            )
            .context("Failed to sign token")?;
            println!("{token}");
        }
        Command::Purge => {
            let status = client()?.purge()?;
            report_status(&status)?;
            println!("Removed {} option(s)", status.removed.unwrap_or(0));
        }
    }

    Ok(())
}

/// Token lifetime of `days` days, refusing values that cannot be signed.
fn token_ttl(days: i64) -> anyhow::Result<TimeDelta> {
    if days <= 0 {
        bail!("Token validity must be at least one day, got {days}");
    }
    let Some(ttl) = TimeDelta::try_days(days) else {
        bail!("Token validity of {days} days is out of range");
    };
    if Utc::now().checked_add_signed(ttl).is_none() {
        bail!("Token validity of {days} days is out of range");
    }
    Ok(ttl)
}

fn report_status(status: &ActionStatus) -> anyhow::Result<()> {
    if !status.is_ok() {
        bail!("Server refused the update: {}", status.status);
    }
    println!("{} {}", style("✓").green(), status.status);
    Ok(())
}
