//! 交互式控制台

mod commands;
mod completer;
mod printer;

pub use commands::{is_console_command, CommandResult, Session};
pub use completer::CommandCompleter;
pub use printer::{check_vertical_display, PrintMode, Printer};
