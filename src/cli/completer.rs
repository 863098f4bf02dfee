//! 命令补全器
//!
//! 基于 rustyline 实现 Tab 补全功能

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// 命令列表
const COMMANDS: &[&str] = &[
    "new", "load", "save", "show", "vertex", "edge", "neighbours",
    "bridges", "scc", "cycles", "path", "mst", "key", "communities",
];

/// 子命令映射
fn get_sub_commands(command: &str) -> Option<&'static [&'static str]> {
    match command {
        "new" => Some(&["directed", "undirected"]),
        "directed" | "undirected" => Some(&["weighted"]),
        "vertex" | "v" | "edge" | "e" => Some(&["add", "rm"]),
        _ => None,
    }
}

/// 控制台命令列表
const CONSOLE_COMMANDS: &[&str] = &[
    ":help", ":h",
    ":quit", ":q",
    ":exit",
    ":stats",
    ":clear",
];

/// GraphKit CLI 补全器
#[derive(Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    pub fn new() -> Self {
        Self
    }

    fn candidates(words: &[&'static str], prefix: &str) -> Vec<Pair> {
        words
            .iter()
            .filter(|w| w.starts_with(prefix))
            .map(|w| Pair {
                display: w.to_string(),
                replacement: w.to_string(),
            })
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];

        // 控制台命令
        if line_to_cursor.starts_with(':') {
            return Ok((0, Self::candidates(CONSOLE_COMMANDS, line_to_cursor)));
        }

        let words: Vec<&str> = line_to_cursor.split_whitespace().collect();
        let Some(&last) = words.last() else {
            return Ok((pos, Self::candidates(COMMANDS, "")));
        };

        if line_to_cursor.ends_with(' ') {
            // 在空格后，提供子命令建议
            let completions = get_sub_commands(&last.to_lowercase())
                .map(|subs| Self::candidates(subs, ""))
                .unwrap_or_default();
            return Ok((pos, completions));
        }

        let current = last.to_lowercase();
        let start_pos = pos - last.len();
        if words.len() == 1 {
            return Ok((start_pos, Self::candidates(COMMANDS, &current)));
        }

        let prev = words[words.len() - 2].to_lowercase();
        let completions = get_sub_commands(&prev)
            .map(|subs| Self::candidates(subs, &current))
            .unwrap_or_default();
        Ok((start_pos, completions))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::DefaultHistory;

    fn complete(line: &str) -> (usize, Vec<String>) {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = CommandCompleter::new()
            .complete(line, line.len(), &ctx)
            .unwrap();
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn test_complete_command() {
        assert_eq!(complete("br"), (0, vec!["bridges".to_string()]));
        assert_eq!(complete("c").1, vec!["cycles", "communities"]);
    }

    #[test]
    fn test_complete_sub_command() {
        assert_eq!(complete("vertex ").1, vec!["add", "rm"]);
        assert_eq!(complete("new un"), (4, vec!["undirected".to_string()]));
        assert_eq!(complete("new directed ").1, vec!["weighted"]);
    }

    #[test]
    fn test_complete_console_command() {
        assert_eq!(complete(":st").1, vec![":stats"]);
    }
}
