// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use tracing_subscriber::EnvFilter;

use expense_tracker::{Config, Controller};

fn main() -> Result<()> {
    // Logs go to stderr so they never land in the table on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Optional first argument: JSON config file
    let config_path = env::args().nth(1);
    let config = Config::load(config_path.as_deref())?;

    // The one session for this process
    let controller = Controller::from_config(&config)?;
    tracing::info!(
        categories = ?config.categories,
        version = expense_tracker::VERSION,
        "Session started"
    );

    run_ui_mode(controller, config)
}

#[cfg(feature = "tui")]
fn run_ui_mode(controller: Controller, config: Config) -> Result<()> {
    let mut app = ui::App::new(controller, config.date_format);
    ui::run_ui(&mut app)?;

    let projection = app.controller.projection();
    println!(
        "{} transaction(s), total {:.2}",
        projection.transaction_row_count(),
        projection.total()
    );

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_controller: Controller, _config: Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
