//! A small line-oriented command language for driving a [`SearchTree`].
//!
//! Each line holds one command:
//!
//! | Line                | Effect                                      |
//! |---------------------|---------------------------------------------|
//! | `add <key> <value>` | insert or overwrite an entry                |
//! | `delete <key>`      | remove an entry                             |
//! | `search <key>`      | print the value, or `Not found`             |
//! | `min` / `max`       | print the value of the least/greatest key   |
//! | `print`             | print the tree's shape, or `empty tree`     |
//!
//! Keys and values are parsed with [`FromStr`]. A malformed line is not fatal:
//! [`run_script`] records it as a [`Diagnostic`] and moves on to the next one.
//!
//! ```
//! use search_trees::{TreeKind, command};
//!
//! let mut tree = TreeKind::RedBlack.build::<i32, i32>();
//! let mut output = String::new();
//! let script = "add 1 10\nadd 2 20\nsearch 2\ndelete 2\nsearch 2\nfrobnicate\nmax\n";
//!
//! let diagnostics = command::run_script(&mut *tree, script, &mut output).unwrap();
//! assert_eq!(output, "20\nNot found\n10\n");
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].line, 6);
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::{FromStr, SplitWhitespace};

use thiserror::Error;

use crate::SearchTree;

const NOT_FOUND: &str = "Not found";

/// One parsed command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command<K, V> {
    /// `add <key> <value>`
    Add(K, V),
    /// `delete <key>`
    Delete(K),
    /// `search <key>`
    Search(K),
    /// `min`
    Min,
    /// `max`
    Max,
    /// `print`
    Print,
}

/// Why a line could not be parsed into a [`Command`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unrecognized command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' is missing its {argument}")]
    MissingArgument { command: &'static str, argument: &'static str },
    #[error("'{command}' got an invalid {argument} '{text}'")]
    InvalidArgument {
        command: &'static str,
        argument: &'static str,
        text: String,
    },
    #[error("'{command}' takes no argument '{text}'")]
    UnexpectedArgument { command: &'static str, text: String },
}

/// A rejected script line.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("line {line}: {error}: '{text}'")]
pub struct Diagnostic {
    /// One-based line number within the script.
    pub line: usize,
    /// The line as written.
    pub text: String,
    #[source]
    pub error: ParseError,
}

/// Splits the arguments of one command and checks their count.
struct Arguments<'a> {
    command: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl Arguments<'_> {
    fn next<T: FromStr>(&mut self, argument: &'static str) -> Result<T, ParseError> {
        let command = self.command;
        let text = self.tokens.next().ok_or(ParseError::MissingArgument { command, argument })?;
        text.parse().map_err(|_| ParseError::InvalidArgument {
            command,
            argument,
            text: String::from(text),
        })
    }

    fn finish(mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(text) => Err(ParseError::UnexpectedArgument {
                command: self.command,
                text: String::from(text),
            }),
        }
    }
}

impl<K: FromStr, V: FromStr> FromStr for Command<K, V> {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(ParseError::Empty)?;

        let (command, arguments) = match name {
            "add" => {
                let mut arguments = Arguments { command: "add", tokens };
                let key = arguments.next("key")?;
                let value = arguments.next("value")?;
                (Command::Add(key, value), arguments)
            }
            "delete" => {
                let mut arguments = Arguments { command: "delete", tokens };
                (Command::Delete(arguments.next("key")?), arguments)
            }
            "search" => {
                let mut arguments = Arguments { command: "search", tokens };
                (Command::Search(arguments.next("key")?), arguments)
            }
            "min" => (Command::Min, Arguments { command: "min", tokens }),
            "max" => (Command::Max, Arguments { command: "max", tokens }),
            "print" => (Command::Print, Arguments { command: "print", tokens }),
            other => return Err(ParseError::UnknownCommand(String::from(other))),
        };

        arguments.finish()?;
        Ok(command)
    }
}

impl<K: Ord + fmt::Display, V: fmt::Display> Command<K, V> {
    /// Runs the command against `tree`, writing any result to `out`.
    ///
    /// `search`, `min` and `max` write one line holding the value or
    /// `Not found`; `print` writes the tree's rendering; `add` and `delete`
    /// write nothing.
    ///
    /// # Errors
    ///
    /// Only fails if writing to `out` fails.
    pub fn execute<T, W>(self, tree: &mut T, out: &mut W) -> fmt::Result
    where
        T: SearchTree<K, V> + ?Sized,
        W: fmt::Write,
    {
        match self {
            Command::Add(key, value) => {
                tree.insert(key, value);
                Ok(())
            }
            Command::Delete(key) => {
                tree.remove(&key);
                Ok(())
            }
            Command::Search(key) => write_value(out, tree.find(&key)),
            Command::Min => write_value(out, tree.minimum()),
            Command::Max => write_value(out, tree.maximum()),
            Command::Print => writeln!(out, "{}", tree.render()),
        }
    }
}

fn write_value<V: fmt::Display, W: fmt::Write>(out: &mut W, value: Option<&V>) -> fmt::Result {
    match value {
        Some(value) => writeln!(out, "{value}"),
        None => writeln!(out, "{NOT_FOUND}"),
    }
}

/// Parses and executes every line of `script` in order, skipping blank lines.
///
/// Lines that fail to parse are skipped and returned as diagnostics; the
/// remaining lines still run.
///
/// # Errors
///
/// Only fails if writing to `out` fails.
pub fn run_script<K, V, T, W>(tree: &mut T, script: &str, out: &mut W) -> Result<Vec<Diagnostic>, fmt::Error>
where
    K: Ord + FromStr + fmt::Display,
    V: FromStr + fmt::Display,
    T: SearchTree<K, V> + ?Sized,
    W: fmt::Write,
{
    let mut diagnostics = Vec::new();
    for (index, text) in script.lines().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        match text.parse::<Command<K, V>>() {
            Ok(command) => command.execute(tree, out)?,
            Err(error) => {
                warn_log!(line = index + 1, %error, "skipping malformed command");
                diagnostics.push(Diagnostic {
                    line: index + 1,
                    text: String::from(text),
                    error,
                });
            }
        }
    }
    Ok(diagnostics)
}
