use std::io::{BufRead, Write};

use serde_json::{Value, json};
use tracing::debug;

use stockledger_inventory::{AuditEntry, Clock, InventorySession};

use crate::command::ConsoleCommand;
use crate::render;

/// Whether the loop should keep reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Run commands from `input` against `session` until EOF or `quit`.
pub fn run<C, R, W>(session: &mut InventorySession<C>, input: R, mut output: W) -> anyhow::Result<()>
where
    C: Clock,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let (response, flow) = match ConsoleCommand::parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => handle(session, command),
            Err(err) if err.is_help() => (json!({ "help": err.to_string() }), Flow::Continue),
            Err(err) => (render::error_to_json("parse", err), Flow::Continue),
        };

        serde_json::to_writer(&mut output, &response)?;
        writeln!(output)?;
        output.flush()?;

        if flow == Flow::Stop {
            break;
        }
    }
    Ok(())
}

fn handle<C: Clock>(session: &mut InventorySession<C>, command: ConsoleCommand) -> (Value, Flow) {
    debug!(?command, "console command");

    let response = match command {
        ConsoleCommand::List => render::entries_to_json(
            session.ledger().entries(),
            session.ledger().total_units(),
        ),
        ConsoleCommand::History => render::history_to_json(session.audit().entries()),
        ConsoleCommand::Low { threshold } => {
            let threshold = threshold.unwrap_or(session.config().low_stock_threshold);
            render::low_stock_to_json(threshold, &session.low_stock_alert(threshold))
        }
        ConsoleCommand::Quit => return (json!({ "bye": true }), Flow::Stop),
        ConsoleCommand::Add { name, quantity } => {
            changed(session.add_or_increment(&name, quantity).map(Vec::from_iter), session.version())
        }
        ConsoleCommand::Remove { name } => {
            changed(session.remove(&name).map(Vec::from_iter), session.version())
        }
        ConsoleCommand::Buy { name, quantity } => {
            changed(session.purchase(&name, quantity).map(Vec::from_iter), session.version())
        }
        ConsoleCommand::Batch => changed(session.batch_add_configured(), session.version()),
    };

    (response, Flow::Continue)
}

fn changed(
    result: stockledger_core::DomainResult<Vec<AuditEntry>>,
    version: u64,
) -> Value {
    match result {
        Ok(recorded) => render::change_to_json(&recorded, version),
        Err(err) => render::error_to_json("rejected", err),
    }
}
