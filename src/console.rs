//! Line-oriented interactive front end over a [`Session`].

use std::io::{BufRead, Write};

use crate::candidates::FilterMode;
use crate::draw::RandomSource;
use crate::session::{Command, Session};

pub const HELP: &str = "\
commands:
  range <start> <end>   set the inclusive range
  start <n>             set the start (end follows if needed)
  end <n>               set the end
  mode none|include|exclude
  filter <text>         numbers or spans for the current mode, e.g. 1,3 5-7
  clear-range           back to the default range
  clear-filter          clear the current mode's filter
  draw                  draw one number
  history               show drawn numbers
  clear-history         forget drawn numbers
  show                  show range, mode and filter
  help                  this text
  quit                  leave";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    BadArgs { command: String, expected: &'static str },
}

/// What one input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Update(Command),
    Draw,
    History,
    Show,
    Help,
    Quit,
    Nothing,
}

fn bad(command: &str, expected: &'static str) -> CommandError {
    CommandError::BadArgs {
        command: command.to_string(),
        expected,
    }
}

fn number(command: &str, arg: Option<&str>) -> Result<u64, CommandError> {
    arg.and_then(|a| a.parse::<u64>().ok())
        .ok_or_else(|| bad(command, "a non-negative integer"))
}

pub fn parse_line(line: &str) -> Result<Action, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let action = match word.to_ascii_lowercase().as_str() {
        "" => Action::Nothing,
        "range" => {
            let start = number(word, args.next())?;
            let end = number(word, args.next())?;
            if args.next().is_some() {
                return Err(bad(word, "two integers"));
            }
            Action::Update(Command::SetRange { start, end })
        }
        "start" => Action::Update(Command::SetStart(number(word, args.next())?)),
        "end" => Action::Update(Command::SetEnd(number(word, args.next())?)),
        "mode" => {
            let mode = match args.next().map(str::to_ascii_lowercase).as_deref() {
                Some("none") => FilterMode::None,
                Some("include") => FilterMode::IncludeOnly,
                Some("exclude") => FilterMode::Exclude,
                _ => return Err(bad(word, "one of none, include, exclude")),
            };
            Action::Update(Command::SetMode(mode))
        }
        // the raw remainder is kept as typed; the parser handles separators
        "filter" => Action::Update(Command::SetFilter(rest.to_string())),
        "clear-range" => Action::Update(Command::ClearRange),
        "clear-filter" => Action::Update(Command::ClearFilter),
        "clear-history" => Action::Update(Command::ClearHistory),
        "draw" => Action::Draw,
        "history" => Action::History,
        "show" => Action::Show,
        "help" | "?" => Action::Help,
        "quit" | "exit" => Action::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(action)
}

fn format_history(history: &[u64]) -> String {
    if history.is_empty() {
        return "history: (empty)".to_string();
    }
    let items: Vec<String> = history.iter().map(|n| n.to_string()).collect();
    format!("history: {}", items.join(", "))
}

/// Read commands from `input` until EOF or `quit`, writing responses to `out`.
/// Command failures are printed and the loop continues.
pub fn run_console<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    rng: &dyn RandomSource,
) -> std::io::Result<()> {
    writeln!(out, "range {}-{}, type 'help' for commands", session.start(), session.end())?;
    for line in input.lines() {
        let line = line?;
        let action = match parse_line(&line) {
            Ok(a) => a,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };
        match action {
            Action::Nothing => continue,
            Action::Quit => break,
            Action::Help => writeln!(out, "{}", HELP)?,
            Action::History => writeln!(out, "{}", format_history(session.history()))?,
            Action::Show => {
                let count = session.candidates().len();
                writeln!(
                    out,
                    "range {}-{} | mode {} | filter '{}' | candidates: {}",
                    session.start(),
                    session.end(),
                    session.mode(),
                    session.filter_text(),
                    count
                )?;
            }
            Action::Draw => match session.draw(rng) {
                Ok(n) => writeln!(out, "drew: {}", n)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            },
            Action::Update(cmd) => match session.execute(cmd) {
                Ok(candidates) => writeln!(out, "candidates: {}", candidates.len())?,
                Err(e) => writeln!(out, "error: {}", e)?,
            },
        }
        out.flush()?;
    }
    Ok(())
}
