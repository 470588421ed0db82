//! Environment-driven configuration.

use std::time::Duration;

use crate::error::ConfigError;
use crate::nav::DigitModifier;

pub const DEFAULT_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_MAX_RECENTS: usize = 10;
pub const DEFAULT_API_URL: &str = "https://api.buildkite.com";
pub const DEFAULT_LOG_FILE: &str = "bk-palette.log";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildkiteConfig {
    pub org: String,
    pub token: String,
    pub api_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub debounce: Duration,
    /// Selection index restored whenever the palette resets.
    pub initial_index: usize,
    pub digit_modifier: DigitModifier,
    pub max_recents: usize,
    pub debug: bool,
    pub log_file: String,
    /// `None` when no Buildkite organization is configured.
    pub buildkite: Option<BuildkiteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            initial_index: 0,
            digit_modifier: DigitModifier::Alt,
            max_recents: DEFAULT_MAX_RECENTS,
            debug: false,
            log_file: DEFAULT_LOG_FILE.to_string(),
            buildkite: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset or blank values
    /// take defaults; malformed values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let debounce = match get("BK_PALETTE_DEBOUNCE_MS") {
            Some(v) => Duration::from_millis(parse_number("BK_PALETTE_DEBOUNCE_MS", &v)?),
            None => defaults.debounce,
        };
        let initial_index = match get("BK_PALETTE_INITIAL_INDEX") {
            Some(v) => parse_number("BK_PALETTE_INITIAL_INDEX", &v)?,
            None => defaults.initial_index,
        };
        let max_recents = match get("BK_PALETTE_MAX_RECENTS") {
            Some(v) => parse_number("BK_PALETTE_MAX_RECENTS", &v)?,
            None => defaults.max_recents,
        };
        let digit_choice = get("BK_PALETTE_DIGIT_MODIFIER").map(|v| v.to_lowercase());
        let digit_modifier = match digit_choice.as_deref() {
            None | Some("alt") => DigitModifier::Alt,
            Some("ctrl") => DigitModifier::Ctrl,
            Some(other) => {
                return Err(ConfigError::InvalidChoice {
                    var: "BK_PALETTE_DIGIT_MODIFIER",
                    expected: "alt, ctrl",
                    value: other.to_string(),
                })
            }
        };
        let debug = matches!(
            get("BK_PALETTE_DEBUG").map(|v| v.to_lowercase()).as_deref(),
            Some("1" | "true" | "yes" | "on")
        );
        let log_file = get("BK_PALETTE_LOG").unwrap_or(defaults.log_file);

        let buildkite = match (get("BUILDKITE_ORG"), get("BUILDKITE_API_TOKEN")) {
            (Some(org), Some(token)) => Some(BuildkiteConfig {
                org,
                token,
                api_url: get("BUILDKITE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            }),
            (Some(_), None) => return Err(ConfigError::MissingToken),
            (None, _) => None,
        };

        Ok(Self {
            debounce,
            initial_index,
            digit_modifier,
            max_recents,
            debug,
            log_file,
            buildkite,
        })
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let c = config(&[
            ("BK_PALETTE_DEBOUNCE_MS", "100"),
            ("BK_PALETTE_DIGIT_MODIFIER", "Ctrl"),
            ("BK_PALETTE_DEBUG", "true"),
            ("BUILDKITE_ORG", "acme"),
            ("BUILDKITE_API_TOKEN", "t0k"),
        ])
        .unwrap();
        assert_eq!(c.debounce, Duration::from_millis(100));
        assert_eq!(c.digit_modifier, DigitModifier::Ctrl);
        assert!(c.debug);
        let bk = c.buildkite.unwrap();
        assert_eq!(bk.org, "acme");
        assert_eq!(bk.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(matches!(
            config(&[("BK_PALETTE_DEBOUNCE_MS", "soon")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            config(&[("BK_PALETTE_DIGIT_MODIFIER", "hyper")]),
            Err(ConfigError::InvalidChoice { .. })
        ));
        assert!(matches!(config(&[("BUILDKITE_ORG", "acme")]), Err(ConfigError::MissingToken)));
    }
}
