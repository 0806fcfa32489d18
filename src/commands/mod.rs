pub mod odds;
pub mod random;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::giphy::ImageSearch;
use crate::platform::Reply;

/// Argument failures, displayed to the user as the reply text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Error: {prefix}{name} command is missing an argument - See '{prefix}help {prefix}{name}' for details.")]
    MissingArgument { prefix: String, name: &'static str },
    #[error("Error: {prefix}{name} arguments have to be {expected} - See '{prefix}help {prefix}{name}' for details.")]
    InvalidArgument {
        prefix: String,
        name: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Help,
    Odds,
    Random,
}

/// A registered command and its help text. `{bot}` in text is replaced by the bot name.
#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub brief: &'static str,
    pub usage: &'static str,
    /// Example arguments shown under the usage line
    pub example: &'static str,
    pub description: &'static str,
    pub min_args: usize,
    handler: Handler,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        brief: "Shows this message",
        usage: "[command]",
        example: "random",
        description: "Lists every command, or shows details for one command.",
        min_args: 0,
        handler: Handler::Help,
    },
    CommandSpec {
        name: "odds",
        brief: "Plays \"Odds Are\" against {bot}",
        usage: "<Odds (Number from 1 to 100)> <Your Guess (Number from 1 to Odds)>",
        example: "10 4",
        description: "Plays \"Odds Are\" against {bot}",
        min_args: 2,
        handler: Handler::Odds,
    },
    CommandSpec {
        name: "random",
        brief: "Shows a random gif",
        usage: "<Search Query>",
        example: "fat mac",
        description: "Shows a random gif loosely based on the search query.",
        min_args: 1,
        handler: Handler::Random,
    },
];

/// A prefixed message split into command name and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Parse the text that follows the prefix. Returns None when no name follows it.
    pub fn parse(rest: &str) -> Option<Self> {
        // A space right after the prefix is not a command
        if rest.starts_with(char::is_whitespace) {
            return None;
        }
        let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            args: split_args(args),
        })
    }
}

/// Split on whitespace; a `"quoted run"` is one argument without its quotes.
/// An unclosed quote runs to the end of the text.
fn split_args(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut chars = text.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(first) = chars.next() else {
            break;
        };

        let mut arg = String::new();
        if first == '"' {
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                arg.push(c);
            }
        } else {
            arg.push(first);
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                arg.push(c);
            }
        }
        args.push(arg);
    }

    args
}

/// Maps command names to handlers and produces one reply per known command.
pub struct CommandDispatcher {
    prefix: String,
    bot_name: String,
    images: Arc<dyn ImageSearch>,
}

impl CommandDispatcher {
    pub fn new(prefix: &str, bot_name: &str, images: Arc<dyn ImageSearch>) -> Self {
        Self {
            prefix: prefix.to_string(),
            bot_name: bot_name.to_string(),
            images,
        }
    }

    fn find(&self, name: &str) -> Option<&'static CommandSpec> {
        COMMANDS.iter().find(|c| c.name == name)
    }

    /// Run a command. Unknown commands yield no reply.
    pub async fn dispatch(&self, invocation: &Invocation) -> Option<Reply> {
        let Some(spec) = self.find(&invocation.name) else {
            warn!("Unknown command: {}{}", self.prefix, invocation.name);
            return None;
        };

        info!("[Command] {}{}", self.prefix, spec.name);

        if invocation.args.len() < spec.min_args {
            let err = CommandError::MissingArgument {
                prefix: self.prefix.clone(),
                name: spec.name,
            };
            return Some(Reply::text(err.to_string()));
        }

        let reply = match spec.handler {
            Handler::Help => self.help(invocation.args.first().map(String::as_str)),
            Handler::Odds => self.odds(&invocation.args),
            Handler::Random => random::run(self.images.as_ref(), &invocation.args).await,
        };
        Some(reply)
    }

    fn odds(&self, args: &[String]) -> Reply {
        // min_args guarantees both are present
        let result =
            odds::parse_args(&args[0], &args[1]).map_err(|_| CommandError::InvalidArgument {
                prefix: self.prefix.clone(),
                name: "odds",
                expected: "whole numbers",
            });
        match result {
            Ok((odds, guess)) => {
                Reply::text(odds::play(&odds, &guess, &self.bot_name, &mut rand::thread_rng()))
            }
            Err(e) => Reply::text(e.to_string()),
        }
    }

    fn help(&self, topic: Option<&str>) -> Reply {
        let Some(topic) = topic else {
            let width = COMMANDS.iter().map(|c| c.name.len()).max().unwrap_or(0);
            let mut text = String::from("Commands:\n");
            for command in COMMANDS {
                text.push_str(&format!(
                    "  {}{:<width$}  {}\n",
                    self.prefix,
                    command.name,
                    self.fill(command.brief),
                    width = width
                ));
            }
            text.push_str(&format!(
                "\nType {}help <command> for more info on a command.",
                self.prefix
            ));
            return Reply::Monospace(text);
        };

        let name = topic.strip_prefix(self.prefix.as_str()).unwrap_or(topic);
        match self.find(name) {
            Some(command) => Reply::Monospace(format!(
                "{p}{name} {usage}\n{p}{name} {example}\n\n{description}",
                p = self.prefix,
                name = command.name,
                usage = command.usage,
                example = command.example,
                description = self.fill(command.description),
            )),
            None => Reply::text(format!("No command called \"{}\" found.", name)),
        }
    }

    fn fill(&self, text: &str) -> String {
        text.replace("{bot}", &self.bot_name)
    }
}
