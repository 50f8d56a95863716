use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use residual::cli::{
    handle_calc_command, handle_config_command, handle_link_command, handle_rate_command,
    CalcArgs, ConfigCommands, LinkCommands, RateArgs,
};
use residual::config::{ResidualPaths, Settings};
use residual::logging::init_logging;

#[derive(Parser)]
#[command(
    name = "residual",
    version,
    about = "Remaining-value calculator for prepaid VPS subscriptions",
    long_about = "Residual works out how much prepaid server time is worth on a given \
                  day, converting the renewal price to CNY with a live or manual \
                  exchange rate. Run without a subcommand for the interactive UI."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui {
        /// Share link to prefill the form from
        #[arg(short, long)]
        link: Option<String>,
    },

    /// Calculate the remaining value
    Calc(CalcArgs),

    /// Fetch the current exchange rate to CNY
    Rate(RateArgs),

    /// Encode or decode share links
    #[command(subcommand)]
    Link(LinkCommands),

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = ResidualPaths::new()?;
    paths.ensure_directories()?;
    init_logging(&paths)?;

    let mut settings = Settings::load_or_create(&paths)?;
    if settings.reconcile_version(env!("CARGO_PKG_VERSION")) {
        if let Err(e) = settings.save(&paths) {
            warn!(error = %e, "could not record application version");
        }
    }

    match cli.command {
        None => residual::tui::run_tui(settings, paths, None)?,
        Some(Commands::Tui { link }) => residual::tui::run_tui(settings, paths, link.as_deref())?,
        Some(Commands::Calc(args)) => handle_calc_command(args, &settings)?,
        Some(Commands::Rate(args)) => handle_rate_command(args)?,
        Some(Commands::Link(cmd)) => handle_link_command(cmd, &settings)?,
        Some(Commands::Config(cmd)) => handle_config_command(cmd, &mut settings, &paths)?,
    }

    Ok(())
}
