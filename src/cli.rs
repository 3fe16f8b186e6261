use clap::Parser;

/// Count the transitive dependencies of an npm package
#[derive(Parser, Debug)]
#[command(name = "lsdeps")]
#[command(about, long_about = None)]
pub struct Cli {
    /// The npm package to count dependencies for
    pub package: String,

    /// The version of the package being fetched
    #[arg(short = 'v', long, default_value = "latest")]
    pub version: String,

    /// Skip counting peer dependencies
    #[arg(short = 'p', long)]
    pub skip_peer: bool,

    /// Skip counting optional dependencies
    #[arg(short = 'o', long)]
    pub skip_optional: bool,

    /// Hide the "Fetching dependencies for..." messages
    #[arg(long)]
    pub silent: bool,

    /// Registry base URL (overrides config)
    #[arg(long)]
    pub registry: Option<String>,

    /// Maximum concurrent registry requests (overrides config)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Retry dependencies whose version is missing with `latest`
    #[arg(long)]
    pub fallback_latest: bool,

    /// List every dependency name after the report
    #[arg(long)]
    pub list: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-V debug, -VV trace)
    #[arg(short = 'V', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
