//! `#`-command grammar and execution.
//!
//! A command is `#verb [arg1 [arg2]]`. The verb and `arg1` are
//! case-insensitive; `arg2` is everything after `arg1`, verbatim apart from
//! surrounding whitespace, so prompts keep their spacing and case.

use std::fmt;
use std::ops::RangeInclusive;

use brain_core::{ImageGenerator, ImageSize};
use database::{message, Database, Settings};
use image_pipeline::{fetch_and_normalize, ImageFetcher};
use tracing::{info, warn};

use crate::catalog::ModelCatalog;
use crate::error::OrchestratorError;
use crate::limits::UsageLimits;
use crate::settings::{SettingField, SettingsResolver};

/// Leading character that marks a message as a command.
pub const COMMAND_MARKER: char = '#';

/// Reply to `#help`.
pub const HELP_TEXT: &str = "TextGPT Commands:
#help
- prints this help message

#get [<key>|'settings']
- get your current setting for <key> or all settings

#set <key> <value>
- set your current setting for <key> to <value>

Keys for #get and #set:
- model: the OpenAI model to use
- system_prompt: the prompt to use to instruct the model of what to do
- stop_sequence: the sequence of tokens to use to stop the model from generating more tokens
- max_tokens: the maximum number of tokens to generate
- temperature: the sample temperature to use when generating tokens (higher = more random)
- top_p: the nucleus sampling probability to use when generating tokens (higher = more random)
- frequency_penalty: the frequency penalty to use when generating tokens (higher = more conservative)
- presence_penalty: the presence penalty to use when generating tokens (higher = more conservative)

#reset ['all'|'messages'|'settings']
- all: resets everything
- messages: resets all messages
- settings: resets all settings

#models
- prints all available models

#limits
- prints your current usage limits

#image <'create'|'edit'|'variation'> <prompt>
- create: creates an image from the prompt
- edit: edits an image from the prompt
- variation: creates a new variation of an image
";

/// Whether a message body is a command.
pub fn is_command(body: &str) -> bool {
    body.starts_with(COMMAND_MARKER)
}

/// Command verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Help,
    Get,
    Set,
    Reset,
    Models,
    Limits,
    Image,
}

impl Verb {
    pub const ALL: [Verb; 7] = [
        Self::Help,
        Self::Get,
        Self::Set,
        Self::Reset,
        Self::Models,
        Self::Limits,
        Self::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Get => "get",
            Self::Set => "set",
            Self::Reset => "reset",
            Self::Models => "models",
            Self::Limits => "limits",
            Self::Image => "image",
        }
    }

    /// How many arguments the verb accepts.
    pub fn arity(&self) -> RangeInclusive<usize> {
        match self {
            Self::Help | Self::Models | Self::Limits => 0..=0,
            Self::Get => 1..=1,
            Self::Set => 2..=2,
            Self::Reset => 0..=1,
            Self::Image => 1..=2,
        }
    }

    fn parse(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.as_str() == word)
    }
}

/// What `#reset` clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    Settings,
    Messages,
    All,
}

/// `#image` sub-commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAction {
    Create,
    Edit,
    Variation,
}

impl ImageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Variation => "variation",
        }
    }
}

/// A validated command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    GetAll,
    Get(SettingField),
    Set(SettingField, String),
    Reset(ResetScope),
    Models,
    Limits,
    Image { action: ImageAction, prompt: String },
}

/// A message that does not match the command grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand {
    /// The text after the marker, trimmed and lowercased.
    pub text: String,
}

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {} is not a valid command.", self.text)
    }
}

impl std::error::Error for UnknownCommand {}

/// Split `text` into at most three whitespace-separated parts; the third
/// keeps its inner whitespace.
fn split_words(text: &str) -> Vec<&str> {
    let mut parts = Vec::with_capacity(3);
    let mut rest = text.trim();

    while !rest.is_empty() {
        if parts.len() == 2 {
            parts.push(rest);
            break;
        }
        match rest.split_once(char::is_whitespace) {
            Some((word, tail)) => {
                parts.push(word);
                rest = tail.trim_start();
            }
            None => {
                parts.push(rest);
                break;
            }
        }
    }

    parts
}

impl Command {
    /// Parse a marker-prefixed message body.
    pub fn parse(body: &str) -> Result<Self, UnknownCommand> {
        let text = body
            .strip_prefix(COMMAND_MARKER)
            .unwrap_or(body)
            .trim()
            .to_string();
        let unknown = || UnknownCommand {
            text: text.to_lowercase(),
        };

        let parts = split_words(&text);
        let Some((verb_word, args)) = parts.split_first() else {
            return Err(unknown());
        };
        let verb = Verb::parse(&verb_word.to_lowercase()).ok_or_else(unknown)?;
        if !verb.arity().contains(&args.len()) {
            return Err(unknown());
        }

        let arg1 = args.first().map(|a| a.to_lowercase());
        let arg2 = args.get(1).map(|a| a.to_string());

        let command = match (verb, arg1.as_deref()) {
            (Verb::Help, _) => Command::Help,
            (Verb::Models, _) => Command::Models,
            (Verb::Limits, _) => Command::Limits,
            (Verb::Get, Some("settings")) => Command::GetAll,
            (Verb::Get, Some(key)) => Command::Get(key.parse().map_err(|_| unknown())?),
            (Verb::Set, Some(key)) => Command::Set(
                key.parse().map_err(|_| unknown())?,
                arg2.unwrap_or_default(),
            ),
            (Verb::Reset, None | Some("all")) => Command::Reset(ResetScope::All),
            (Verb::Reset, Some("settings")) => Command::Reset(ResetScope::Settings),
            (Verb::Reset, Some("messages")) => Command::Reset(ResetScope::Messages),
            (Verb::Image, Some(sub)) => {
                let action = match sub {
                    "create" => ImageAction::Create,
                    "edit" => ImageAction::Edit,
                    "variation" => ImageAction::Variation,
                    _ => return Err(unknown()),
                };
                Command::Image {
                    action,
                    prompt: arg2.unwrap_or_default(),
                }
            }
            _ => return Err(unknown()),
        };

        Ok(command)
    }
}

/// Reply text for a failed operation.
pub fn error_reply(err: &OrchestratorError) -> String {
    match err {
        OrchestratorError::Pipeline(e) => e.to_string(),
        other => format!("Error: {}", other),
    }
}

/// Executes commands against the store and providers.
///
/// Execution never fails: every outcome, including errors, is reply text.
pub struct CommandInterpreter<'a> {
    pub db: &'a Database,
    pub resolver: &'a SettingsResolver,
    pub catalog: &'a ModelCatalog,
    pub images: &'a dyn ImageGenerator,
    pub fetcher: &'a dyn ImageFetcher,
    pub limits: &'a dyn UsageLimits,
}

impl CommandInterpreter<'_> {
    /// Run the command in `body` for `identity` and return the reply.
    pub async fn execute(
        &self,
        identity: &str,
        body: &str,
        settings: &Settings,
        media_url: Option<&str>,
    ) -> String {
        let command = match Command::parse(body) {
            Ok(command) => command,
            Err(unknown) => {
                info!("Rejected command from {}: {}", identity, unknown.text);
                return unknown.to_string();
            }
        };

        info!("Executing {:?} for {}", command, identity);
        match self.run(identity, command, settings, media_url).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Command for {} failed: {}", identity, e);
                error_reply(&e)
            }
        }
    }

    async fn run(
        &self,
        identity: &str,
        command: Command,
        settings: &Settings,
        media_url: Option<&str>,
    ) -> Result<String, OrchestratorError> {
        let reply = match command {
            Command::Help => HELP_TEXT.to_string(),
            Command::GetAll => {
                let lines: Vec<String> = SettingField::ALL
                    .iter()
                    .map(|field| format!("{}:\n{}", field, field.display(settings)))
                    .collect();
                format!("Your settings are:\n{}", lines.join("\n"))
            }
            Command::Get(field) => {
                format!("Your current {} is:\n{}", field, field.display(settings))
            }
            Command::Set(field, value) => {
                let shown = self.resolver.update(identity, field, &value).await?;
                format!("Your {} has been set to:\n{}", field, shown)
            }
            Command::Reset(scope) => self.reset(identity, scope).await?,
            Command::Models => format!("Available Models:\n{}", self.catalog.names().join("\n")),
            Command::Limits => self.limits.describe(identity).await,
            Command::Image { action, prompt } => self.image(action, &prompt, media_url).await?,
        };
        Ok(reply)
    }

    async fn reset(&self, identity: &str, scope: ResetScope) -> Result<String, OrchestratorError> {
        if matches!(scope, ResetScope::Settings | ResetScope::All) {
            self.resolver.reset(identity).await?;
        }
        if matches!(scope, ResetScope::Messages | ResetScope::All) {
            let removed = message::delete_messages_for(self.db.pool(), identity).await?;
            info!("Conversation reset for {} ({} messages)", identity, removed);
        }

        Ok(match scope {
            ResetScope::Settings => "Your settings have been reset to defaults",
            ResetScope::Messages => "Your conversation has been reset.",
            ResetScope::All => "Your settings and conversation have been reset.",
        }
        .to_string())
    }

    async fn image(
        &self,
        action: ImageAction,
        prompt: &str,
        media_url: Option<&str>,
    ) -> Result<String, OrchestratorError> {
        let (size, prompt) = ImageSize::extract_from_prompt(prompt);
        let prompt = prompt.trim();

        if action == ImageAction::Create {
            return Ok(self.images.create(prompt, size).await?);
        }

        let Some(url) = media_url else {
            return Ok(format!(
                "Error: attach an image to use #image {}.",
                action.as_str()
            ));
        };
        let normalized = fetch_and_normalize(self.fetcher, url).await?;
        info!(
            "Image normalized to {}x{} for {}",
            normalized.width,
            normalized.height,
            action.as_str()
        );

        let url = match action {
            ImageAction::Edit => {
                self.images
                    .edit(prompt, size, normalized.image, normalized.mask)
                    .await?
            }
            _ => self.images.variation(normalized.image, size).await?,
        };
        Ok(url)
    }
}
