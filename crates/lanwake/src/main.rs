mod cli;
mod commands;
mod config;
mod error;
mod output;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lanwake_core::Dashboard;

use crate::cli::{Cli, Command};
use crate::commands::Frontend;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Mac { raw } => commands::mac::handle(&raw, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "lanwake", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let config = config::build_dashboard_config(&cli.global)?;
            let frontend = Frontend::new(&cli.global);
            let dashboard =
                Dashboard::connect(config, frontend.renderer.clone(), frontend.notifier.clone())?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &dashboard, &frontend, &cli.global).await;
            dashboard.shutdown().await;
            result
        }
    }
}
