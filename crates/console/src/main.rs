use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use stockledger_inventory::{InventorySession, SessionConfig};

#[derive(Debug, Parser)]
#[command(
    name = "stockledger-console",
    version,
    about = "Inventory session driven by one command per stdin line"
)]
struct Args {
    /// JSON session config; built-in starter stock when absent
    #[arg(long, env = "STOCKLEDGER_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    stockledger_observability::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading session config {}", path.display()))?,
        None => {
            tracing::info!("no session config given; using built-in starter stock");
            SessionConfig::default()
        }
    };

    let mut session = InventorySession::new(config).context("starting inventory session")?;
    tracing::info!(session_id = %session.id(), "inventory console ready");

    stockledger_console::run(&mut session, io::stdin().lock(), io::stdout().lock())?;

    tracing::info!(
        session_id = %session.id(),
        changes = session.version(),
        "inventory console finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flag_is_optional() {
        let args = Args::try_parse_from(["stockledger-console"]).unwrap();
        assert!(args.config.is_none() || std::env::var_os("STOCKLEDGER_CONFIG").is_some());

        let args =
            Args::try_parse_from(["stockledger-console", "--config", "/tmp/stock.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/stock.json")));
    }
}
