//! Ranked command matching with `/alias` and `/id` short-circuits.

use tracing::debug;

use super::{Command, CommandRegistry};
use crate::aliases::Alias;

/// Score given to every command when the input is blank.
pub const BROWSE_SCORE: u32 = 1;
/// Score for a `/name` reference that resolves to an alias or command id.
pub const DIRECT_SCORE: u32 = 100;

const EXACT_ID: u32 = 100;
const EXACT_NAME: u32 = 90;
/// Partial matches never reach the exact-name tier.
const PARTIAL_CAP: u32 = EXACT_NAME - 1;

// Tiers, highest first: prefix, substring, first word, per word, keyword, description.
const ID_PREFIX: u32 = 50;
const NAME_PREFIX: u32 = 45;
const ID_SUBSTRING: u32 = 30;
const NAME_SUBSTRING: u32 = 25;
const FIRST_WORD_PREFIX: u32 = 15;
const WORD_IN_ID: u32 = 8;
const WORD_IN_NAME: u32 = 8;
const WORD_IN_KEYWORD: u32 = 7;
const WORD_IN_DESCRIPTION: u32 = 6;
const KEYWORD_EXACT: u32 = 5;
const KEYWORD_SUBSTRING: u32 = 4;
const DESCRIPTION_SUBSTRING: u32 = 3;

/// A ranked candidate plus whatever alias resolution attached to it.
#[derive(Clone, Debug)]
pub struct ScoredMatch<'a, T> {
    pub item: &'a T,
    pub score: u32,
    /// Name of the alias this match was resolved through.
    pub alias: Option<String>,
    /// Parameters to run with: the user's trailing text, else the alias default.
    pub params: Option<String>,
}

impl<'a, T> ScoredMatch<'a, T> {
    fn plain(item: &'a T, score: u32) -> Self {
        Self {
            item,
            score,
            alias: None,
            params: None,
        }
    }
}

impl ScoredMatch<'_, Command> {
    pub fn execute(&self) -> anyhow::Result<()> {
        self.item.execute(self.params.as_deref())
    }
}

/// Split off the first whitespace-delimited token; the rest is trimmed.
pub fn split_first_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(at) => (&input[..at], input[at..].trim()),
        None => (input, ""),
    }
}

/// Matches free-text input against the available commands of a registry.
pub struct CommandMatcher<'a> {
    registry: &'a CommandRegistry,
    aliases: &'a [Alias],
}

impl<'a> CommandMatcher<'a> {
    pub fn new(registry: &'a CommandRegistry, aliases: &'a [Alias]) -> Self {
        Self { registry, aliases }
    }

    /// Ranked matches for `input`, best first, ties in registry order.
    pub fn search(&self, input: &str) -> Vec<ScoredMatch<'a, Command>> {
        let available = self.registry.available();
        let mut query = input.trim();

        if let Some(rest) = query.strip_prefix('/') {
            let (token, tail) = split_first_token(rest);
            if !token.is_empty() {
                if let Some(hit) = self.resolve_direct(&available, token, tail) {
                    debug!(command = %hit.item.id, alias = ?hit.alias, "direct command reference");
                    return vec![hit];
                }
            }
            query = rest.trim();
        }

        if query.is_empty() {
            return available
                .into_iter()
                .map(|c| ScoredMatch::plain(c, BROWSE_SCORE))
                .collect();
        }

        let mut matches: Vec<ScoredMatch<'a, Command>> = available
            .into_iter()
            .filter_map(|c| match score_command(c, query) {
                0 => None,
                score => Some(ScoredMatch::plain(c, score)),
            })
            .collect();
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }

    fn resolve_direct(
        &self,
        available: &[&'a Command],
        token: &str,
        tail: &str,
    ) -> Option<ScoredMatch<'a, Command>> {
        let user_params = Some(tail.to_string()).filter(|t| !t.is_empty());

        if let Some(alias) = self.aliases.iter().find(|a| a.is_named(token)) {
            if let Some(command) = available.iter().find(|c| c.id == alias.command_id) {
                return Some(ScoredMatch {
                    item: *command,
                    score: DIRECT_SCORE,
                    alias: Some(alias.name.clone()),
                    params: user_params.or_else(|| alias.default_params.clone()),
                });
            }
        }

        available.iter().find(|c| c.id == token).map(|command| ScoredMatch {
            item: *command,
            score: DIRECT_SCORE,
            alias: None,
            params: user_params,
        })
    }
}

/// Composite score of one command against a non-blank query.
///
/// Exact id and exact name short-circuit at 100 and 90; every partial bonus is
/// summed and capped below 90 so no pile of partial matches outranks them.
pub fn score_command(command: &Command, query: &str) -> u32 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }

    let id = command.id.to_lowercase();
    let name = command.name.to_lowercase();
    let description = command.description.to_lowercase();
    let keywords: Vec<String> = command.keywords.iter().map(|k| k.to_lowercase()).collect();

    if id == query {
        return EXACT_ID;
    }
    if name == query {
        return EXACT_NAME;
    }

    let mut score = 0;

    if id.starts_with(&query) {
        score += ID_PREFIX;
    } else if id.contains(&query) {
        score += ID_SUBSTRING;
    }

    if name.starts_with(&query) {
        score += NAME_PREFIX;
    } else if name.contains(&query) {
        score += NAME_SUBSTRING;
    }

    let words: Vec<&str> = query.split_whitespace().collect();
    if let (Some(first), Some(name_first)) = (words.first(), name.split_whitespace().next()) {
        if name_first.starts_with(first) {
            score += FIRST_WORD_PREFIX;
        }
    }

    for word in &words {
        if id.contains(word) {
            score += WORD_IN_ID;
        }
        if name.contains(word) {
            score += WORD_IN_NAME;
        }
        if description.contains(word) {
            score += WORD_IN_DESCRIPTION;
        }
        if keywords.iter().any(|k| k.contains(word)) {
            score += WORD_IN_KEYWORD;
        }
    }

    if keywords.iter().any(|k| *k == query) {
        score += KEYWORD_EXACT;
    } else if keywords.iter().any(|k| k.contains(&query)) {
        score += KEYWORD_SUBSTRING;
    }

    if description.contains(&query) {
        score += DESCRIPTION_SUBSTRING;
    }

    score.min(PARTIAL_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(id: &str, name: &str, description: &str, keywords: &[&str]) -> Command {
        Command::new(id, name, description, |_| Ok(())).with_keywords(keywords)
    }

    fn registry() -> CommandRegistry {
        let mut r = CommandRegistry::new();
        r.register(cmd(
            "pipeline",
            "Go to Pipeline",
            "Open a pipeline page",
            &["open", "navigate"],
        ));
        r.register(cmd(
            "new-build",
            "Create Build",
            "Start a new build on a pipeline",
            &["run", "trigger"],
        ));
        r.register(cmd("builds", "Show Recent Builds", "List the latest builds", &["history"]));
        r.register(cmd("hidden", "Hidden", "", &[]).available_when(|| Ok(false)));
        r
    }

    fn ids(matches: &[ScoredMatch<'_, Command>]) -> Vec<String> {
        matches.iter().map(|m| m.item.id.clone()).collect()
    }

    #[test]
    fn split_first_token_trims() {
        assert_eq!(split_first_token("  go  backend-api "), ("go", "backend-api"));
        assert_eq!(split_first_token("go"), ("go", ""));
        assert_eq!(split_first_token(""), ("", ""));
    }

    #[test]
    fn blank_input_browses_available_commands_in_order() {
        let r = registry();
        let matches = CommandMatcher::new(&r, &[]).search("   ");
        assert_eq!(ids(&matches), vec!["pipeline", "new-build", "builds"]);
        assert!(matches.iter().all(|m| m.score == BROWSE_SCORE));
    }

    #[test]
    fn exact_tiers_short_circuit() {
        let r = registry();
        assert_eq!(score_command(r.get("pipeline").unwrap(), "PIPELINE"), 100);
        assert_eq!(score_command(r.get("new-build").unwrap(), "create build"), 90);
    }

    #[test]
    fn partial_scores_stay_below_exact_name() {
        let c = cmd("deploy", "Deploy Now", "deploy deploy", &["deploy", "deployment"]);
        assert_eq!(score_command(&c, "deplo"), PARTIAL_CAP);
    }

    #[test]
    fn exact_id_outranks_partials_of_other_commands() {
        let mut r = CommandRegistry::new();
        r.register(cmd("build-all", "Build All", "build build", &["build"]));
        r.register(cmd("build", "Start", "", &[]));
        let matches = CommandMatcher::new(&r, &[]).search("build");
        assert_eq!(ids(&matches), vec!["build", "build-all"]);
    }

    #[test]
    fn tier_constants_are_strictly_ordered() {
        let tiers = [
            EXACT_ID,
            EXACT_NAME,
            ID_PREFIX,
            NAME_PREFIX,
            ID_SUBSTRING,
            NAME_SUBSTRING,
            FIRST_WORD_PREFIX,
            WORD_IN_ID,
            WORD_IN_KEYWORD,
            WORD_IN_DESCRIPTION,
            KEYWORD_EXACT,
            KEYWORD_SUBSTRING,
            DESCRIPTION_SUBSTRING,
        ];
        assert!(tiers.windows(2).all(|pair| pair[0] > pair[1]), "{tiers:?}");
        assert!(WORD_IN_NAME <= WORD_IN_ID);
    }

    #[test]
    fn id_substring_outranks_keyword_and_description_hits() {
        let mut r = CommandRegistry::new();
        r.register(cmd("notes", "Notes", "how to deploy", &[]));
        r.register(cmd("ship", "Ship", "", &["deploy"]));
        r.register(cmd("redeploy", "Again", "", &[]));
        r.register(cmd("deployer", "Queue", "", &[]));

        let matches = CommandMatcher::new(&r, &[]).search("deploy");
        assert_eq!(ids(&matches), vec!["deployer", "redeploy", "ship", "notes"]);
    }

    #[test]
    fn equal_scores_keep_registry_order() {
        let mut r = CommandRegistry::new();
        r.register(cmd("zz-build", "Zed", "", &[]));
        r.register(cmd("aa-build", "Aye", "", &[]));
        r.register(cmd("mm-build", "Em", "", &[]));

        let matches = CommandMatcher::new(&r, &[]).search("build");
        assert!(matches.iter().all(|m| m.score == matches[0].score));
        assert_eq!(ids(&matches), vec!["zz-build", "aa-build", "mm-build"]);
    }

    #[test]
    fn non_matching_commands_are_dropped() {
        let r = registry();
        let matches = CommandMatcher::new(&r, &[]).search("zzz");
        assert!(matches.is_empty());
    }

    #[test]
    fn keyword_match_ranks_command() {
        let r = registry();
        let matches = CommandMatcher::new(&r, &[]).search("trigger");
        assert_eq!(ids(&matches)[0], "new-build");
    }

    #[test]
    fn slash_alias_attaches_default_and_user_override() {
        let r = registry();
        let aliases = vec![Alias {
            id: "alias-go".into(),
            name: "go".into(),
            command_id: "pipeline".into(),
            default_params: Some("frontend".into()),
            description: None,
        }];
        let matcher = CommandMatcher::new(&r, &aliases);

        let hit = matcher.search("/GO");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].score, 100);
        assert_eq!(hit[0].alias.as_deref(), Some("go"));
        assert_eq!(hit[0].params.as_deref(), Some("frontend"));

        let hit = matcher.search("/go backend-api");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].item.id, "pipeline");
        assert_eq!(hit[0].params.as_deref(), Some("backend-api"));
    }

    #[test]
    fn slash_command_id_is_direct() {
        let r = registry();
        let hit = CommandMatcher::new(&r, &[]).search("/builds web");
        assert_eq!(ids(&hit), vec!["builds"]);
        assert_eq!(hit[0].params.as_deref(), Some("web"));
    }

    #[test]
    fn slash_unknown_falls_back_to_search() {
        let r = registry();
        let hits = CommandMatcher::new(&r, &[]).search("/pipe");
        assert_eq!(ids(&hits)[0], "pipeline");
        assert!(hits[0].score < DIRECT_SCORE);

        assert!(CommandMatcher::new(&r, &[]).search("/hidden").is_empty());
        assert_eq!(CommandMatcher::new(&r, &[]).search("/").len(), 3);
    }
}
