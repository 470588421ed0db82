//! User-defined aliases: short names for a command plus optional default parameters.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::commands::{split_first_token, CommandRegistry};
use crate::error::AliasError;
use crate::store::{self, KeyValueStore};

const ALIASES_KEY: &str = "aliases";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub id: String,
    pub name: String,
    pub command_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Alias {
    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Alias persistence collaborator.
pub trait AliasStore {
    fn aliases(&self) -> Result<Vec<Alias>>;
    /// Insert or replace by id.
    fn set_alias(&self, alias: Alias) -> Result<()>;
    fn delete_alias(&self, id: &str) -> Result<()>;

    fn find_alias_by_name(&self, name: &str) -> Result<Option<Alias>> {
        Ok(self.aliases()?.into_iter().find(|a| a.is_named(name)))
    }
}

/// Aliases kept as one JSON list in a key-value store.
pub struct StoredAliases<S: ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> StoredAliases<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore + ?Sized> AliasStore for StoredAliases<S> {
    fn aliases(&self) -> Result<Vec<Alias>> {
        store::load_or_default(self.store.as_ref(), ALIASES_KEY)
    }

    fn set_alias(&self, alias: Alias) -> Result<()> {
        let mut aliases = self.aliases()?;
        match aliases.iter_mut().find(|a| a.id == alias.id) {
            Some(existing) => *existing = alias,
            None => aliases.push(alias),
        }
        store::save(self.store.as_ref(), ALIASES_KEY, &aliases)
    }

    fn delete_alias(&self, id: &str) -> Result<()> {
        let mut aliases = self.aliases()?;
        aliases.retain(|a| a.id != id);
        store::save(self.store.as_ref(), ALIASES_KEY, &aliases)
    }
}

/// Unvalidated alias input, as typed into the palette or a form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasDraft {
    pub name: String,
    pub command_id: Option<String>,
    pub default_params: Option<String>,
    pub description: Option<String>,
}

impl AliasDraft {
    /// Parse `name command [default params...]`.
    pub fn parse(input: &str) -> Self {
        let (name, rest) = split_first_token(input);
        let (command, params) = split_first_token(rest);
        Self {
            name: name.to_string(),
            command_id: Some(command.to_string()).filter(|s| !s.is_empty()),
            default_params: Some(params.to_string()).filter(|s| !s.is_empty()),
            description: None,
        }
    }

    /// Check the draft against the current alias snapshot and registry.
    pub fn validate(
        &self,
        existing: &[Alias],
        registry: &CommandRegistry,
    ) -> Result<Alias, AliasError> {
        if self.name.trim().is_empty() {
            return Err(AliasError::EmptyName);
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(AliasError::NameHasWhitespace(self.name.clone()));
        }
        if existing.iter().any(|a| a.is_named(&self.name)) {
            return Err(AliasError::DuplicateName(self.name.clone()));
        }
        let command_id = match self.command_id.as_deref() {
            None | Some("") => return Err(AliasError::NoCommandSelected),
            Some(id) => id,
        };
        if registry.get(command_id).is_none() {
            return Err(AliasError::UnknownCommand(command_id.to_string()));
        }

        Ok(Alias {
            id: format!("alias-{}", self.name.to_lowercase()),
            name: self.name.clone(),
            command_id: command_id.to_string(),
            default_params: self.default_params.clone().filter(|p| !p.trim().is_empty()),
            description: self.description.clone().filter(|d| !d.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::store::MemoryStore;

    fn registry() -> CommandRegistry {
        let mut r = CommandRegistry::new();
        r.register(Command::new("pipeline", "Go to Pipeline", "", |_| Ok(())));
        r
    }

    fn draft(name: &str, command: Option<&str>) -> AliasDraft {
        AliasDraft {
            name: name.into(),
            command_id: command.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn parse_splits_name_command_and_params() {
        let d = AliasDraft::parse("  go pipeline backend api ");
        assert_eq!(d.name, "go");
        assert_eq!(d.command_id.as_deref(), Some("pipeline"));
        assert_eq!(d.default_params.as_deref(), Some("backend api"));

        let d = AliasDraft::parse("go");
        assert_eq!(d.command_id, None);
        assert_eq!(d.default_params, None);
    }

    #[test]
    fn validation_rejects_bad_drafts() {
        let r = registry();
        let existing = vec![draft("Go", Some("pipeline")).validate(&[], &r).unwrap()];

        assert_eq!(draft("", Some("pipeline")).validate(&[], &r), Err(AliasError::EmptyName));
        assert_eq!(
            draft("g o", Some("pipeline")).validate(&[], &r),
            Err(AliasError::NameHasWhitespace("g o".into()))
        );
        assert_eq!(
            draft("gO", Some("pipeline")).validate(&existing, &r),
            Err(AliasError::DuplicateName("gO".into()))
        );
        assert_eq!(draft("p", None).validate(&[], &r), Err(AliasError::NoCommandSelected));
        assert_eq!(
            draft("p", Some("nope")).validate(&[], &r),
            Err(AliasError::UnknownCommand("nope".into()))
        );
    }

    #[test]
    fn valid_draft_builds_alias() {
        let mut d = draft("Go", Some("pipeline"));
        d.default_params = Some("backend-api".into());
        d.description = Some("  ".into());
        let alias = d.validate(&[], &registry()).unwrap();
        assert_eq!(alias.id, "alias-go");
        assert_eq!(alias.default_params.as_deref(), Some("backend-api"));
        assert_eq!(alias.description, None);
    }

    #[test]
    fn stored_aliases_upsert_find_and_delete() {
        let aliases = StoredAliases::new(Arc::new(MemoryStore::new()));
        let alias = draft("go", Some("pipeline")).validate(&[], &registry()).unwrap();
        aliases.set_alias(alias.clone()).unwrap();
        aliases.set_alias(Alias {
            default_params: Some("web".into()),
            ..alias.clone()
        })
        .unwrap();

        assert_eq!(aliases.aliases().unwrap().len(), 1);
        let found = aliases.find_alias_by_name("GO").unwrap().unwrap();
        assert_eq!(found.default_params.as_deref(), Some("web"));

        aliases.delete_alias(&alias.id).unwrap();
        assert!(aliases.find_alias_by_name("go").unwrap().is_none());
    }
}
