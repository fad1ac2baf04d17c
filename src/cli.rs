//! CLI argument parsing module for kernup

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a timeout: plain seconds, or a number with an s/m/h suffix
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty timeout".to_string());
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 60 * 60)
    } else {
        (s, 1)
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in timeout: {}", num_str))?;
    if num == 0 {
        return Err("timeout must be greater than zero".to_string());
    }

    Ok(Duration::from_secs(num * multiplier))
}

/// Download and install an Ubuntu mainline kernel build
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "kernup",
    version,
    about = "Download and install Ubuntu mainline kernel builds"
)]
pub struct CliArgs {
    // Source and staging
    /// Base URL of the mainline build index
    #[arg(long, value_name = "URL")]
    pub index_url: Option<String>,

    /// Directory downloads are staged in (removed on exit)
    #[arg(long, value_name = "PATH")]
    pub staging_root: Option<PathBuf>,

    /// Number of most recent versions to offer
    #[arg(long = "count", value_name = "N")]
    pub max_versions: Option<usize>,

    /// Per-request timeout, e.g. 30, 90s, 5m (default: none)
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Pick packages by file name instead of by row position
    #[arg(long)]
    pub match_by_role: bool,

    /// Report success even when the package install fails
    #[arg(long)]
    pub ignore_install_status: bool,

    /// Read settings from a TOML file (CLI flags take precedence)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // Selection
    /// Index to install, skipping the interactive prompt
    #[arg(long, value_name = "INDEX", allow_hyphen_values = true)]
    pub pick: Option<String>,

    // Modes
    /// Only list the available versions and the running kernel
    #[arg(long)]
    pub list: bool,

    /// Resolve the packages to download, then stop
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output --list or --dry-run results as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    // General options
    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}
