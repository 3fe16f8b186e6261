mod cli;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;
use lsdeps::config::Config;
use lsdeps::{NpmRegistry, ResolveError, Resolver};
use output::Report;
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.silent);

    if let Err(e) = run(cli) {
        eprintln!("{}", console::style(format!("Error: {}", e)).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let mut options = config.resolve_options();
    options.skip_peer |= cli.skip_peer;
    options.skip_optional |= cli.skip_optional;
    options.fallback_to_latest |= cli.fallback_latest;
    if let Some(jobs) = cli.jobs {
        options.jobs = jobs.max(1);
    }

    let registry_url = cli.registry.as_deref().unwrap_or(&config.registry);
    let timeout = cli.timeout.map(Duration::from_secs).unwrap_or(config.timeout());
    let registry = NpmRegistry::new(registry_url, timeout);

    // First signal cancels the run, a second one exits immediately
    let cancel = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(&cancel))?;
        signal_hook::flag::register(signal, Arc::clone(&cancel))?;
    }

    let resolver = Resolver::new(registry, options).with_cancel_flag(cancel);
    let resolution = match resolver.resolve(&cli.package, &cli.version) {
        Ok(resolution) => resolution,
        Err(ResolveError::Cancelled { partial }) => {
            eprintln!(
                "Interrupted: {} dependencies discovered before cancellation (incomplete)",
                partial
            );
            return Err("resolution cancelled".into());
        }
        Err(e) => return Err(e.into()),
    };

    if !cli.silent {
        output::print_failures(resolution.failures());
    }

    let report = Report::new(&resolution);
    if cli.json {
        output::print_json(&report);
    } else {
        println!("{}", report.to_text(cli.list));
    }

    Ok(())
}
