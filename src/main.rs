use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::Colorize;
use mac_presence::cli::RunOptions;
use mac_presence::notify::DEFAULT_BASE_URL;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mac-presence")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Detect who is home from the ARP table and update SmartThings", long_about = None)]
struct Cli {
    /// CSV file to load config from (name,mac,appid,token); replaces saved state
    #[arg(long, value_name = "CSV")]
    load: Option<PathBuf>,

    /// JSON state file location [default: ~/.presence.json]
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// SmartThings API base URL
    #[arg(long = "baseurl", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Force SmartThings state update even if nothing changed
    #[arg(long)]
    force: bool,

    /// Echo every ARP line to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        RunOptions {
            load: cli.load,
            state: cli.state,
            base_url: cli.base_url,
            force: cli.force,
            verbose: cli.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "mac-presence", &mut io::stdout());
        return;
    }

    // One sequential cycle; a current-thread runtime is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(mac_presence::cli::run(cli.into())) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}
