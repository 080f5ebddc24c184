use crate::host::CommandSpec;

pub const MONSTERS_COMMAND: CommandSpec = CommandSpec {
    name: "monsters",
    usage: "/monsters [on|off]",
    description: "Shows or toggles whether monsters are allowed.",
};

const OPTIONS: [&str; 2] = ["on", "off"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonstersCommand {
    Status,
    Set { enabled: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRejection {
    ArgumentCount(usize),
    InvalidOption(String),
}

impl CommandRejection {
    pub fn message(&self) -> &'static str {
        match self {
            CommandRejection::ArgumentCount(_) => "Invalid number of arguments.",
            CommandRejection::InvalidOption(_) => "Invalid option.",
        }
    }
}

/// Reply sent back to whoever issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub message: String,
    pub success: bool,
}

impl CommandOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

pub fn parse_monsters_args(args: &[&str]) -> Result<MonstersCommand, CommandRejection> {
    match args {
        [] => Ok(MonstersCommand::Status),
        ["on"] => Ok(MonstersCommand::Set { enabled: true }),
        ["off"] => Ok(MonstersCommand::Set { enabled: false }),
        [other] => Err(CommandRejection::InvalidOption((*other).to_string())),
        _ => Err(CommandRejection::ArgumentCount(args.len())),
    }
}

pub fn status_message(enabled: bool) -> &'static str {
    if enabled {
        "Monsters are turned on."
    } else {
        "Monsters are turned off."
    }
}

pub fn toggled_message(enabled: bool) -> &'static str {
    if enabled {
        "Monsters turned on."
    } else {
        "Monsters turned off."
    }
}

/// Suggestions for the zero-based argument `position`.
pub fn complete_argument(position: usize) -> Vec<String> {
    if position == 0 {
        OPTIONS.iter().map(|option| option.to_string()).collect()
    } else {
        Vec::new()
    }
}

/// Suggestions for the last of the arguments typed so far.
pub fn complete_args(args: &[&str]) -> Vec<String> {
    match args.len() {
        0 => Vec::new(),
        len => complete_argument(len - 1),
    }
}
