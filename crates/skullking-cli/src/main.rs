use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use skullking_cli::config::ScorekeeperConfig;
use skullking_cli::logging::init_logging;
use skullking_cli::session::{Action, Session, copy_link};

/// Score keeper for Skull King. The whole game travels in a link.
#[derive(Debug, Parser)]
#[command(
    name = "skullking",
    author,
    version,
    about = "Skull King score keeper with shareable game links"
)]
struct Cli {
    /// Optional YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Link (or bare `s=` query) holding the game so far.
    #[arg(short, long, value_name = "URL")]
    link: Option<String>,

    /// Round to view or edit, numbered from 1 (defaults to the latest).
    #[arg(short, long, value_name = "ROUND")]
    round: Option<usize>,

    /// Also write the resulting link to this file.
    #[arg(long, value_name = "FILE")]
    copy_to: Option<PathBuf>,

    /// Print a JSON summary instead of the table.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    action: Action,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ScorekeeperConfig::load(cli.config.as_deref())
        .context("loading scorekeeper configuration")?;
    let _logging_guard = init_logging(&config.logging)?;

    let mut session = Session::open(cli.link.as_deref(), &config);
    if let Some(round) = cli.round {
        session.select_round(round);
    }
    session.apply(&cli.action);

    let summary = session.summary().context("encoding game link")?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", session.render());
        println!("{}", summary.link);
    }

    if let Some(path) = cli.copy_to.as_deref() {
        copy_link(path, &summary.link);
    }

    Ok(())
}
