//! Configuration loading for the skirmish tool.
//!
//! All settings are loaded from a TOML configuration file. Every section and
//! key is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

use skirmish_events::{Faction, FactionNames, LabelState, LoadOptions, SeedError};

use crate::report::ReportOptions;

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Error serializing config to TOML
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkirmishConfig {
    /// How the interaction log is read
    #[serde(default)]
    pub input: LoadOptions,
    /// Display names for the two factions
    #[serde(default)]
    pub factions: FactionNames,
    /// Known faction members
    #[serde(default)]
    pub seeds: SeedConfig,
    /// Inference engine settings
    #[serde(default)]
    pub inference: InferenceConfig,
    /// Report settings
    #[serde(default)]
    pub report: ReportOptions,
}

impl SkirmishConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Seed membership lists, one per faction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Participants known to be in faction A
    pub a: Vec<String>,
    /// Participants known to be in faction B
    pub b: Vec<String>,
}

impl SeedConfig {
    /// Builds the initial label state from both lists.
    pub fn labels(&self) -> Result<LabelState, SeedError> {
        let a = self.a.iter().map(|name| (name.as_str(), Faction::A));
        let b = self.b.iter().map(|name| (name.as_str(), Faction::B));
        LabelState::from_seeds(a.chain(b))
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty()
    }
}

/// Inference engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Stop after this many passes even without a fixpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<usize>,
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Skirmish Configuration

[input]
subject_field = "attacker"
object_field = "victim"
time_field = "time"
skip_invalid_rows = true

[factions]
a = "Reindeer"
b = "Penguin"

[seeds]
a = ["bsims", "SammyxxFairy"]
b = ["VMKNeec", "Luckymaxer", "Winnie", "BuckyBarnes"]

[inference]
# max_passes = 100

[report]
# highlight = "Winnie"
"#
    .to_string()
}
