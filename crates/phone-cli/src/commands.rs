//! Interactive command parsing

use anyhow::{anyhow, bail, Result};
use mockphone_core::views::Tab;
use mockphone_core::ContactId;

pub const HELP: &str = "\
Commands:
  contacts [query]         show contacts, optionally filtered
  call <id>                call a contact
  ring <id>                simulate an incoming call from a contact
  answer | decline         respond to an incoming call
  hangup                   end the current call
  missed                   show missed calls
  back                     leave the missed calls screen
  history                  show call history
  tab <contacts|history>   switch tab
  help                     show this help
  quit                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Contacts(String),
    Call(ContactId),
    Ring(ContactId),
    Answer,
    Decline,
    Hangup,
    Missed,
    Back,
    Tab(Tab),
    Help,
    Quit,
    Empty,
}

impl Input {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let input = match word.to_ascii_lowercase().as_str() {
            "" => Input::Empty,
            "contacts" | "c" => Input::Contacts(rest.to_string()),
            "call" => Input::Call(contact_arg(word, rest)?),
            "ring" => Input::Ring(contact_arg(word, rest)?),
            "answer" | "a" => Input::Answer,
            "decline" | "d" => Input::Decline,
            "hangup" | "end" | "h" => Input::Hangup,
            "missed" | "m" => Input::Missed,
            "back" | "b" => Input::Back,
            "history" => Input::Tab(Tab::History),
            "tab" => Input::Tab(rest.parse().map_err(|e| anyhow!("{}", e))?),
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            other => bail!("Unknown command '{}', type 'help' for a list", other),
        };
        Ok(input)
    }
}

fn contact_arg(command: &str, rest: &str) -> Result<ContactId> {
    if rest.is_empty() {
        bail!("Usage: {} <contact id>", command);
    }
    Ok(ContactId::new(rest))
}
