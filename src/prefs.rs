//! Preferences: favorite commands and pipelines, recently used commands.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::{self, KeyValueStore};

const FAVORITE_COMMANDS_KEY: &str = "favorite_commands";
const FAVORITE_PIPELINES_KEY: &str = "favorite_pipelines";
const RECENT_COMMANDS_KEY: &str = "recent_commands";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCommand {
    pub command_id: String,
    pub count: u32,
    pub last_used: SystemTime,
}

pub struct Preferences<S: ?Sized> {
    store: Arc<S>,
    max_recents: usize,
}

impl<S: KeyValueStore + ?Sized> Preferences<S> {
    pub fn new(store: Arc<S>, max_recents: usize) -> Self {
        Self { store, max_recents }
    }

    pub fn favorite_commands(&self) -> Result<Vec<String>> {
        store::load_or_default(self.store.as_ref(), FAVORITE_COMMANDS_KEY)
    }

    /// Returns whether the command is a favorite afterwards.
    pub fn toggle_favorite_command(&self, id: &str) -> Result<bool> {
        self.toggle(FAVORITE_COMMANDS_KEY, id)
    }

    pub fn favorite_pipelines(&self) -> Result<Vec<String>> {
        store::load_or_default(self.store.as_ref(), FAVORITE_PIPELINES_KEY)
    }

    /// Returns whether the pipeline is a favorite afterwards.
    pub fn toggle_favorite_pipeline(&self, id: &str) -> Result<bool> {
        self.toggle(FAVORITE_PIPELINES_KEY, id)
    }

    /// Favorite status for each id, read from the store once.
    pub fn pipeline_favorite_lookup<'a, I>(&self, ids: I) -> Result<HashMap<String, bool>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let favorites = self.favorite_pipelines()?;
        Ok(ids
            .into_iter()
            .map(|id| (id.to_string(), favorites.iter().any(|f| f == id)))
            .collect())
    }

    /// Most recently used first.
    pub fn recent_commands(&self) -> Result<Vec<RecentCommand>> {
        store::load_or_default(self.store.as_ref(), RECENT_COMMANDS_KEY)
    }

    /// Bump the use count of `id` and move it to the front.
    pub fn record_command_use(&self, id: &str) -> Result<()> {
        self.record_command_use_at(id, SystemTime::now())
    }

    fn record_command_use_at(&self, id: &str, now: SystemTime) -> Result<()> {
        let mut recents = self.recent_commands()?;
        let count = match recents.iter().position(|r| r.command_id == id) {
            Some(at) => recents.remove(at).count + 1,
            None => 1,
        };
        recents.insert(
            0,
            RecentCommand {
                command_id: id.to_string(),
                count,
                last_used: now,
            },
        );
        recents.truncate(self.max_recents);
        store::save(self.store.as_ref(), RECENT_COMMANDS_KEY, &recents)
    }

    fn toggle(&self, key: &str, id: &str) -> Result<bool> {
        let mut ids: Vec<String> = store::load_or_default(self.store.as_ref(), key)?;
        let now_favorite = match ids.iter().position(|f| f == id) {
            Some(at) => {
                ids.remove(at);
                false
            }
            None => {
                ids.push(id.to_string());
                true
            }
        };
        store::save(self.store.as_ref(), key, &ids)?;
        Ok(now_favorite)
    }
}
