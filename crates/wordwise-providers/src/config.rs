//! `wordwise.toml` configuration and generator factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wordwise_core::goals::DEFAULT_GOAL_LIMIT;
use wordwise_core::lesson::LessonOptions;
use wordwise_core::traits::TextGenerator;

use crate::offline::OfflineGenerator;
use crate::openai::OpenAiGenerator;

/// Name of the per-project config file.
pub const CONFIG_FILE_NAME: &str = "wordwise.toml";

/// Environment variable that overrides the OpenAI API key.
pub const OPENAI_KEY_ENV: &str = "WORDWISE_OPENAI_KEY";

/// Configuration for the text generator.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeneratorConfig {
    OpenAI {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    Offline,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorConfig::OpenAI {
                api_key: _,
                base_url,
                model,
                timeout_secs,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .field("timeout_secs", timeout_secs)
                .finish(),
            GeneratorConfig::Offline => f.write_str("Offline"),
        }
    }
}

/// Top-level wordwise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordwiseConfig {
    /// Where the review state is kept.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
    /// Where learner goals are kept; next to the state file when absent.
    #[serde(default)]
    pub goals_path: Option<PathBuf>,
    /// Size of the default word list for a new learner.
    #[serde(default = "default_word_limit")]
    pub default_word_limit: usize,
    /// Maximum new words per lesson.
    #[serde(default = "default_new_word_limit")]
    pub new_word_limit: usize,
    /// Maximum review words per lesson.
    #[serde(default = "default_review_limit")]
    pub review_limit: usize,
    /// Grammar tip cadence in new words (0 disables).
    #[serde(default = "default_grammar_every")]
    pub grammar_every: usize,
    /// Default blurb length in words.
    #[serde(default = "default_blurb_length")]
    pub blurb_length: usize,
    /// Text generator; offline when absent.
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
}

fn default_state_path() -> PathBuf {
    PathBuf::from("wordwise-state.json")
}
fn default_word_limit() -> usize {
    DEFAULT_GOAL_LIMIT
}
fn default_new_word_limit() -> usize {
    LessonOptions::default().new_word_limit
}
fn default_review_limit() -> usize {
    LessonOptions::default().review_limit
}
fn default_grammar_every() -> usize {
    LessonOptions::default().grammar_every
}
fn default_blurb_length() -> usize {
    12
}

impl Default for WordwiseConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            goals_path: None,
            default_word_limit: default_word_limit(),
            new_word_limit: default_new_word_limit(),
            review_limit: default_review_limit(),
            grammar_every: default_grammar_every(),
            blurb_length: default_blurb_length(),
            generator: None,
        }
    }
}

impl WordwiseConfig {
    /// The goals file for `state_path`: `goals_path` if set, otherwise the
    /// state file name with a `.goals.json` extension.
    pub fn goals_path_for(&self, state_path: &Path) -> PathBuf {
        self.goals_path
            .clone()
            .unwrap_or_else(|| state_path.with_extension("goals.json"))
    }

    /// Lesson knobs taken from this config.
    pub fn lesson_options(&self) -> LessonOptions {
        LessonOptions {
            new_word_limit: self.new_word_limit,
            review_limit: self.review_limit,
            grammar_every: self.grammar_every,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables resolve to the empty string.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_generator_config(config: &GeneratorConfig) -> GeneratorConfig {
    match config {
        GeneratorConfig::OpenAI {
            api_key,
            base_url,
            model,
            timeout_secs,
        } => GeneratorConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            model: model.as_deref().map(resolve_env_vars),
            timeout_secs: *timeout_secs,
        },
        GeneratorConfig::Offline => GeneratorConfig::Offline,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `wordwise.toml` in the current directory
/// 2. `~/.config/wordwise/config.toml`
///
/// Environment variable override: `WORDWISE_OPENAI_KEY`.
pub fn load_config() -> Result<WordwiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<WordwiseConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => WordwiseConfig::default(),
    };

    apply_env_overrides(&mut config, std::env::var(OPENAI_KEY_ENV).ok());
    config.generator = config.generator.as_ref().map(resolve_generator_config);

    Ok(config)
}

/// Parse a config document.
pub fn parse_config(content: &str) -> Result<WordwiseConfig> {
    Ok(toml::from_str::<WordwiseConfig>(content)?)
}

fn apply_env_overrides(config: &mut WordwiseConfig, openai_key: Option<String>) {
    let Some(key) = openai_key else {
        return;
    };
    match &mut config.generator {
        Some(GeneratorConfig::OpenAI { api_key, .. }) => *api_key = key,
        // An explicit offline choice stays offline.
        Some(GeneratorConfig::Offline) => {}
        None => {
            config.generator = Some(GeneratorConfig::OpenAI {
                api_key: key,
                base_url: None,
                model: None,
                timeout_secs: None,
            })
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("wordwise"))
}

/// Create a generator from configuration. `None` yields the offline one.
pub fn create_generator(config: Option<&GeneratorConfig>) -> Result<Box<dyn TextGenerator>> {
    match config {
        Some(GeneratorConfig::OpenAI {
            api_key,
            base_url,
            model,
            timeout_secs,
        }) => {
            if api_key.is_empty() {
                anyhow::bail!("openai generator needs an api_key (or {OPENAI_KEY_ENV})");
            }
            let generator =
                OpenAiGenerator::new(api_key, base_url.clone(), model.clone(), *timeout_secs)?;
            Ok(Box::new(generator))
        }
        Some(GeneratorConfig::Offline) | None => Ok(Box::new(OfflineGenerator::new())),
    }
}

/// Starter config written by `wordwise init`.
pub fn starter_config() -> String {
    format!(
        r#"# wordwise configuration

state_path = "wordwise-state.json"
# goals_path = "wordwise-state.goals.json"
default_word_limit = {default_word_limit}
new_word_limit = {new_word_limit}
review_limit = {review_limit}
grammar_every = {grammar_every}
blurb_length = {blurb_length}

# [generator]
# type = "openai"
# api_key = "${{{OPENAI_KEY_ENV}}}"
# model = "gpt-4.1-mini"
"#,
        default_word_limit = default_word_limit(),
        new_word_limit = default_new_word_limit(),
        review_limit = default_review_limit(),
        grammar_every = default_grammar_every(),
        blurb_length = default_blurb_length(),
    )
}
