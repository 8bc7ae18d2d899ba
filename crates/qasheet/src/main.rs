use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // `log` records from the library crates are bridged into tracing by `init`.
    let filter = EnvFilter::try_from_env("QASHEET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    qasheet::cli::run()
}
