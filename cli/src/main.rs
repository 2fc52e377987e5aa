mod cli;
mod config;
mod error;
mod run;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn init_tracing(quiet: bool) {
    if quiet {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if let Err(err) = run::run(&cli) {
        tracing::error!("{err}");
        std::process::exit(err.exit_code());
    }
}
