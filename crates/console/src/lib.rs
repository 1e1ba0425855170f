//! Line-oriented front end for an inventory session.
//!
//! Reads one command per line and answers with one JSON object per line.
//! It only presents state; every change goes through the session.

pub mod command;
pub mod render;
pub mod repl;

pub use command::{ConsoleCommand, ParseError};
pub use repl::run;
