//! Line-oriented admin console for the in-memory host.

use crate::admin::commands::MONSTERS_COMMAND;
use crate::host::memory::CommandMap;
use crate::host::{CommandExecutor, Server, TabCompleter};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine<'a> {
    Empty,
    Stop,
    Help,
    /// `monsters o?` asks for completions of the argument ending in `?`.
    Complete { name: &'a str, args: Vec<&'a str> },
    Command { name: &'a str, args: Vec<&'a str> },
}

pub fn parse_console_line(line: &str) -> ConsoleLine<'_> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let mut parts = trimmed.split_whitespace();
    let name = match parts.next() {
        Some(name) => name,
        None => return ConsoleLine::Empty,
    };
    let mut args: Vec<&str> = parts.collect();

    if let Some(partial) = args.last().copied().and_then(|last| last.strip_suffix('?')) {
        let index = args.len() - 1;
        args[index] = partial;
        return ConsoleLine::Complete { name, args };
    }
    match (name, args.is_empty()) {
        ("stop", _) => ConsoleLine::Stop,
        ("help", true) => ConsoleLine::Help,
        _ => ConsoleLine::Command { name, args },
    }
}

/// Reads commands until `stop` or end of input, routing the `monsters`
/// command to `plugin`.
pub fn run_console<R, W, P>(
    input: R,
    mut output: W,
    plugin: &mut P,
    server: &mut dyn Server,
    commands: &CommandMap,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    P: CommandExecutor + TabCompleter,
{
    for line in input.lines() {
        let line = line?;
        match parse_console_line(&line) {
            ConsoleLine::Empty => {}
            ConsoleLine::Stop => break,
            ConsoleLine::Help => {
                for name in commands.names() {
                    if let Some(spec) = commands.get(name) {
                        writeln!(output, "{} - {}", spec.usage, spec.description)?;
                    }
                }
                writeln!(output, "stop - Stops the server.")?;
            }
            ConsoleLine::Complete { name, args } => {
                let suggestions = if handled_by_plugin(commands, name) {
                    plugin.on_tab_complete(&args)
                } else {
                    Vec::new()
                };
                writeln!(output, "{}", suggestions.join(" "))?;
            }
            ConsoleLine::Command { name, args } => match commands.get(name) {
                Some(spec) if spec.name == MONSTERS_COMMAND.name => {
                    let outcome = plugin.on_command(server, &args);
                    writeln!(output, "{}", outcome.message)?;
                    if !outcome.success {
                        writeln!(output, "Usage: {}", spec.usage)?;
                    }
                }
                Some(spec) => {
                    writeln!(output, "Command \"{}\" has no handler.", spec.name)?
                }
                None => writeln!(
                    output,
                    "Unknown command \"{}\". Type \"help\" for help.",
                    name
                )?,
            },
        }
        output.flush()?;
    }
    Ok(())
}

fn handled_by_plugin(commands: &CommandMap, name: &str) -> bool {
    commands
        .get(name)
        .map_or(false, |spec| spec.name == MONSTERS_COMMAND.name)
}
