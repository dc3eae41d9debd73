// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Interactive REPL for the Vitro script engine.

use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Config, Editor, Helper};
use std::path::PathBuf;
use vitro_script::{Callable, Engine, Value};

const HISTORY_FILE: &str = ".vitro_history";
const MAX_HISTORY_SIZE: usize = 1000;

/// REPL commands, entered with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Load,
}

impl ReplCommand {
    /// Parses a dot command from an input line.
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let input = input.trim();
        if !input.starts_with('.') {
            return None;
        }

        let parts: Vec<&str> = input[1..].splitn(2, char::is_whitespace).collect();
        let cmd = parts.first()?.to_lowercase();
        let arg = parts.get(1).copied();

        match cmd.as_str() {
            "help" | "h" | "?" => Some((ReplCommand::Help, arg)),
            "exit" | "quit" | "q" => Some((ReplCommand::Exit, arg)),
            "clear" | "cls" => Some((ReplCommand::Clear, arg)),
            "load" | "l" => Some((ReplCommand::Load, arg)),
            _ => None,
        }
    }

    fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".load <file>", "Load and evaluate a script file"),
        ]
    }
}

/// rustyline helper: keyword completion plus multi-line validation.
#[derive(Default)]
struct VitroHelper {
    keywords: Vec<String>,
}

impl VitroHelper {
    fn new() -> Self {
        let keywords = vec![
            // Keywords the engine understands
            "break", "const", "continue", "else", "false", "for", "function", "if", "let",
            "null", "return", "this", "throw", "true", "typeof", "undefined", "var", "while",
            // Host bindings
            "console", "console.log", "console.error",
            // REPL commands
            ".help", ".exit", ".clear", ".load",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self { keywords }
    }
}

impl Completer for VitroHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| !c.is_alphanumeric() && c != '_' && c != '.')
            .map(|i| i + 1)
            .unwrap_or(0);

        let word = &line[start..pos];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches: Vec<Pair> = self
            .keywords
            .iter()
            .filter(|kw| kw.starts_with(word))
            .map(|kw| Pair {
                display: kw.clone(),
                replacement: kw[word.len()..].to_string(),
            })
            .collect();

        Ok((pos, matches))
    }
}

impl Hinter for VitroHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }

        let start = line
            .rfind(|c: char| !c.is_alphanumeric() && c != '_' && c != '.')
            .map(|i| i + 1)
            .unwrap_or(0);

        let word = &line[start..];
        if word.len() < 2 {
            return None;
        }

        self.keywords
            .iter()
            .find(|kw| kw.starts_with(word) && kw.len() > word.len())
            .map(|kw| kw[word.len()..].to_string().dimmed().to_string())
    }
}

impl Highlighter for VitroHelper {}

impl Validator for VitroHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if !is_balanced(ctx.input()) {
            return Ok(ValidationResult::Incomplete);
        }
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for VitroHelper {}

/// Checks bracket/brace/paren balance, ignoring string contents.
fn is_balanced(input: &str) -> bool {
    let mut stack = Vec::new();
    let mut in_string = None;
    let mut escape_next = false;

    for c in input.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string.is_some() {
            escape_next = true;
            continue;
        }

        match in_string {
            Some(quote) if c == quote => in_string = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' | '`' => in_string = Some(c),
                '(' => stack.push(')'),
                '[' => stack.push(']'),
                '{' => stack.push('}'),
                ')' | ']' | '}' => {
                    if stack.pop() != Some(c) {
                        // Let the parser report the mismatch
                        return true;
                    }
                }
                _ => {}
            },
        }
    }

    stack.is_empty() && in_string.is_none()
}

/// The interactive REPL: one persistent engine per session.
pub struct Repl {
    engine: Engine,
    editor: Editor<VitroHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Repl {
    /// Creates a new REPL with history loaded from the user data dir.
    pub fn new() -> rustyline::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(MAX_HISTORY_SIZE)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(VitroHelper::new()));

        let history_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitro")
            .join(HISTORY_FILE);

        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.load_history(&history_path);

        Ok(Self {
            engine: Engine::new(),
            editor,
            history_path,
        })
    }

    /// Runs the read-eval-print loop until exit.
    pub fn run(&mut self) -> rustyline::Result<()> {
        self.print_banner();

        loop {
            let prompt = format!("{} ", "vitro>".bright_green().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    self.eval_and_print(trimmed);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        let _ = self.editor.save_history(&self.history_path);
        Ok(())
    }

    fn print_banner(&self) {
        let version = env!("CARGO_PKG_VERSION");
        println!();
        println!(
            "  {} {}{}",
            "Vitro".bright_cyan().bold(),
            "v".dimmed(),
            version.bright_yellow()
        );
        println!(
            "  {}",
            "Sandboxed module loader and component renderer".dimmed()
        );
        println!();
        println!(
            "  {} {} {}",
            "Type".dimmed(),
            ".help".cyan(),
            "for available commands".dimmed()
        );
        println!();
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => {
                println!();
                println!("{}", "REPL Commands:".white().bold());
                println!();
                for (command, description) in ReplCommand::all_commands() {
                    println!("  {:16} {}", command.cyan(), description.dimmed());
                }
                println!();
                CommandResult::Continue
            }
            ReplCommand::Exit => CommandResult::Exit,
            ReplCommand::Clear => {
                print!("\x1B[2J\x1B[H");
                CommandResult::Continue
            }
            ReplCommand::Load => {
                match arg {
                    Some(path) => self.load_file(path),
                    None => eprintln!(
                        "{}: {} requires a file path",
                        "Error".red().bold(),
                        ".load".cyan()
                    ),
                }
                CommandResult::Continue
            }
        }
    }

    fn load_file(&mut self, path: &str) {
        match std::fs::read_to_string(path.trim()) {
            Ok(source) => self.eval_and_print(&source),
            Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
        }
    }

    fn eval_and_print(&mut self, input: &str) {
        match self.engine.eval(input) {
            Ok(value) => println!("{}", format_value(&value)),
            Err(e) => print_error(&e),
        }
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

/// Formats a value for display with syntax coloring.
fn format_value(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".blue().dimmed().to_string(),
        Value::Null => "null".blue().to_string(),
        Value::Boolean(b) => b.to_string().yellow().to_string(),
        Value::Number(_) => value.to_display_string().yellow().to_string(),
        Value::String(s) => format!("'{}'", s).green().to_string(),
        Value::Array(_) => value.to_string().cyan().to_string(),
        Value::Object(object) => {
            let keys: Vec<String> = object
                .borrow()
                .keys()
                .map(|k| k.to_string())
                .collect();
            format!("{{ {} }}", keys.join(", ")).cyan().to_string()
        }
        Value::Function(callable) => match callable.as_ref() {
            Callable::Script(func) => match &func.name {
                Some(name) => format!("[Function: {}]", name).magenta().to_string(),
                None => "[Function (anonymous)]".magenta().to_string(),
            },
            Callable::Native { name, .. } => {
                format!("[Function: {} (native)]", name).magenta().to_string()
            }
        },
    }
}

/// Prints an error with its kind highlighted.
fn print_error(error: &vitro_script::Error) {
    let error_str = error.to_string();

    if let Some(colon_pos) = error_str.find(':') {
        let (error_type, message) = error_str.split_at(colon_pos);
        eprintln!("{}{}", error_type.red().bold(), message);
    } else {
        eprintln!("{}", error_str.red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_command_parse() {
        assert!(matches!(
            ReplCommand::parse(".help"),
            Some((ReplCommand::Help, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".load script.js"),
            Some((ReplCommand::Load, Some("script.js")))
        ));
        assert!(ReplCommand::parse("let x = 1;").is_none());
        assert!(ReplCommand::parse(".bogus").is_none());
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced("(1 + 2)"));
        assert!(is_balanced("function() { return 1; }"));
        assert!(!is_balanced("(1 + 2"));
        assert!(!is_balanced("{ a: 1"));
        assert!(is_balanced("'string with (unbalanced'"));
    }
}
