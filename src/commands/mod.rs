//! Command registry: named actions with keywords, an availability check and a handler.

mod builtin;
mod matcher;

use std::fmt;

use anyhow::Result;
use tracing::warn;

pub use builtin::builtin_registry;
pub use matcher::{
    score_command, split_first_token, CommandMatcher, ScoredMatch, BROWSE_SCORE, DIRECT_SCORE,
};

type Handler = Box<dyn Fn(Option<&str>) -> Result<()>>;
type Availability = Box<dyn Fn() -> Result<bool>>;

/// One registered palette command.
pub struct Command {
    pub id: String,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// Placeholder shown when the command needs a parameter, e.g. `<pipeline>`.
    pub param_hint: Option<String>,
    handler: Handler,
    availability: Option<Availability>,
}

impl Command {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl Fn(Option<&str>) -> Result<()> + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            keywords: Vec::new(),
            param_hint: None,
            handler: Box::new(handler),
            availability: None,
        }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_param_hint(mut self, hint: impl Into<String>) -> Self {
        self.param_hint = Some(hint.into());
        self
    }

    pub fn available_when(mut self, check: impl Fn() -> Result<bool> + 'static) -> Self {
        self.availability = Some(Box::new(check));
        self
    }

    /// A failing availability check counts as unavailable.
    pub fn is_available(&self) -> bool {
        match &self.availability {
            None => true,
            Some(check) => match check() {
                Ok(available) => available,
                Err(e) => {
                    warn!(command = %self.id, error = %e, "availability check failed");
                    false
                }
            },
        }
    }

    /// Run the handler with the resolved parameter string.
    pub fn execute(&self, params: Option<&str>) -> Result<()> {
        (self.handler)(params)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("keywords", &self.keywords)
            .finish_non_exhaustive()
    }
}

/// Commands in registration order.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Re-registering an id replaces the old entry in place.
    pub fn register(&mut self, command: Command) {
        if let Some(existing) = self.commands.iter_mut().find(|c| c.id == command.id) {
            warn!(command = %command.id, "replacing registered command");
            *existing = command;
        } else {
            self.commands.push(command);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn available(&self) -> Vec<&Command> {
        self.commands.iter().filter(|c| c.is_available()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
