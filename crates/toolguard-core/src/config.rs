use std::collections::HashMap;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::types::IntelligenceLevel;

pub const DEFAULT_MAX_VIOLATIONS_SHOWN: usize = 3;
pub const ENV_PREFIX: &str = "TOOLGUARD_";

/// Top-level config (toolguard.toml + TOOLGUARD_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Level applied to every tool without its own override.
    #[serde(default)]
    pub intelligence: IntelligenceLevel,
    /// Emit per-field sanitization decisions at debug level.
    /// Override with env var: TOOLGUARD_DEBUG_DECISIONS=true
    #[serde(default)]
    pub debug_decisions: bool,
    /// How many schema violations are listed in a rejection message.
    #[serde(default = "default_max_violations_shown")]
    pub max_violations_shown: usize,
    /// Per-tool overrides keyed by tool name.
    #[serde(default)]
    pub tools: HashMap<String, ToolPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolPolicy {
    pub intelligence: Option<IntelligenceLevel>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            intelligence: IntelligenceLevel::default(),
            debug_decisions: false,
            max_violations_shown: DEFAULT_MAX_VIOLATIONS_SHOWN,
            tools: HashMap::new(),
        }
    }
}

fn default_max_violations_shown() -> usize {
    DEFAULT_MAX_VIOLATIONS_SHOWN
}

impl GuardConfig {
    /// Load config from a TOML file with TOOLGUARD_* env var overrides.
    ///
    /// Uses the explicit path when given, otherwise ~/.toolguard/toolguard.toml.
    /// A missing file is not an error: defaults plus env apply.
    /// Nested keys in env vars are separated by `__`, e.g.
    /// `TOOLGUARD_TOOLS__RUN_SCRIPT__INTELLIGENCE=strict`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        tracing::debug!(path = %path, "loading toolguard config");

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(&path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Extract from an already-assembled figment, layered over the defaults.
    pub fn from_figment(figment: Figment) -> crate::error::Result<Self> {
        let config: GuardConfig = Figment::from(Serialized::defaults(GuardConfig::default()))
            .merge(figment)
            .extract()
            .map_err(|e| crate::error::GuardError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Effective level for `tool`: its override if any, else the global level.
    pub fn intelligence_for(&self, tool: &str) -> IntelligenceLevel {
        self.tools
            .get(tool)
            .and_then(|policy| policy.intelligence)
            .unwrap_or(self.intelligence)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.toolguard/toolguard.toml", home)
}
