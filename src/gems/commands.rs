//! `/protectiongem` command parsing.
//!
//! Parsing only checks shape. Player lookup comes before amount validation when
//! the command runs, so `give Nobody abc` reports the missing player first.

/// Name the host registers the command under.
pub const COMMAND_NAME: &str = "protectiongem";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GemCommand {
    /// `give <player> <amount>`; amount is validated when executed.
    Give { player: String, amount: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    /// Wrong subcommand or wrong number of tokens.
    Usage,
}

/// Whether `command` (the label the host matched) belongs to this plugin.
pub fn is_gem_command(command: &str) -> bool {
    command.eq_ignore_ascii_case(COMMAND_NAME)
}

pub fn parse_command(args: &[&str]) -> Result<GemCommand, CommandParseError> {
    match args {
        [sub, player, amount] if *sub == "give" => Ok(GemCommand::Give {
            player: player.to_string(),
            amount: amount.to_string(),
        }),
        _ => Err(CommandParseError::Usage),
    }
}

/// A strictly positive gem count, or `None`.
pub fn parse_amount(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|&n| n > 0)
}
