use clap::{Parser, Subcommand};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unbalanced quotes in '{0}'")]
    Quoting(String),

    #[error("{0}")]
    Cli(#[from] clap::Error),
}

impl ParseError {
    /// `help` and `--help` come back from clap as errors carrying the text.
    pub fn is_help(&self) -> bool {
        matches!(
            self,
            ParseError::Cli(err) if err.kind() == clap::error::ErrorKind::DisplayHelp
        )
    }
}

/// One line of console input, tokenised like a shell command line.
#[derive(Debug, Parser)]
#[command(name = "stockledger", no_binary_name = true)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

/// Product names containing spaces must be quoted: `add 4 "Monitor 27''"`.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ConsoleCommand {
    /// Show current stock
    #[command(visible_alias = "ls")]
    List,
    /// Add units of a product, creating it if needed
    Add {
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        name: String,
    },
    /// Delete a product entirely
    #[command(visible_alias = "rm")]
    Remove { name: String },
    /// Take units of a product; stock stops at zero
    Buy {
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        name: String,
    },
    /// Apply the configured batch payload
    Batch,
    /// Show the audit history
    History,
    /// List products below a threshold (configured one by default)
    Low {
        #[arg(allow_negative_numbers = true)]
        threshold: Option<i64>,
    },
    /// Stop reading commands
    #[command(visible_alias = "exit")]
    Quit,
}

impl ConsoleCommand {
    /// Parse a line. Blank lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, ParseError> {
        let words = shlex::split(line).ok_or_else(|| ParseError::Quoting(line.to_string()))?;
        if words.is_empty() {
            return Ok(None);
        }

        let parsed = ConsoleLine::try_parse_from(words)?;
        Ok(Some(parsed.command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_names_are_kept_verbatim() {
        let cmd = ConsoleCommand::parse_line(r#"remove "Monitor  27""#).unwrap();
        assert_eq!(
            cmd,
            Some(ConsoleCommand::Remove {
                name: "Monitor  27".to_string()
            })
        );

        let cmd = ConsoleCommand::parse_line(r#"add 4 "Monitor 27''""#).unwrap();
        assert_eq!(
            cmd,
            Some(ConsoleCommand::Add {
                name: "Monitor 27''".to_string(),
                quantity: 4
            })
        );
    }

    #[test]
    fn blank_line_is_not_a_command() {
        assert_eq!(ConsoleCommand::parse_line("   ").unwrap(), None);
    }

    #[test]
    fn low_threshold_is_optional() {
        assert_eq!(
            ConsoleCommand::parse_line("low").unwrap(),
            Some(ConsoleCommand::Low { threshold: None })
        );
        assert_eq!(
            ConsoleCommand::parse_line("low 8").unwrap(),
            Some(ConsoleCommand::Low { threshold: Some(8) })
        );
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(ConsoleCommand::parse_line("ls").unwrap(), Some(ConsoleCommand::List));
        assert_eq!(ConsoleCommand::parse_line("exit").unwrap(), Some(ConsoleCommand::Quit));
    }

    #[test]
    fn negative_quantities_parse_and_are_left_to_the_ledger() {
        assert_eq!(
            ConsoleCommand::parse_line("buy -2 Headset").unwrap(),
            Some(ConsoleCommand::Buy {
                name: "Headset".to_string(),
                quantity: -2
            })
        );
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(matches!(
            ConsoleCommand::parse_line("buy lots Headset").unwrap_err(),
            ParseError::Cli(_)
        ));
        assert!(matches!(
            ConsoleCommand::parse_line("add 3").unwrap_err(),
            ParseError::Cli(_)
        ));
        assert!(matches!(
            ConsoleCommand::parse_line("add 3 Monitor 27").unwrap_err(),
            ParseError::Cli(_)
        ));
        assert!(matches!(
            ConsoleCommand::parse_line("sell 1 A").unwrap_err(),
            ParseError::Cli(_)
        ));
        assert!(matches!(
            ConsoleCommand::parse_line(r#"remove "Monitor"#).unwrap_err(),
            ParseError::Quoting(_)
        ));
    }

    #[test]
    fn help_is_recognised() {
        assert!(ConsoleCommand::parse_line("help").unwrap_err().is_help());
        assert!(ConsoleCommand::parse_line("add --help").unwrap_err().is_help());
        assert!(!ConsoleCommand::parse_line("sell").unwrap_err().is_help());
    }
}
