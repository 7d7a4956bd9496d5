use std::io::Read;
use std::path::Path;

/// Weights for [`HeuristicAgent`](crate::agent::HeuristicAgent).
///
/// Defaults reproduce the tuned agent: `total = merge * 2.0 + position / 5.0`,
/// with a corner penalty of `10 * max_tile`.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    #[serde(default = "defaults::merge_weight")]
    pub merge_weight: f64,
    #[serde(default = "defaults::position_divisor")]
    pub position_divisor: f64,
    /// Multiplier on the max tile subtracted when it is not in the anchor corner.
    #[serde(default = "defaults::corner_penalty")]
    pub corner_penalty: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            merge_weight: defaults::merge_weight(),
            position_divisor: defaults::position_divisor(),
            corner_penalty: defaults::corner_penalty(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("merge_weight", self.merge_weight),
            ("position_divisor", self.position_divisor),
            ("corner_penalty", self.corner_penalty),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("agent.{name} must be finite, got {value}")));
            }
        }
        if self.position_divisor == 0.0 {
            return Err(ConfigError::Invalid("agent.position_divisor must be nonzero".into()));
        }
        Ok(())
    }
}

/// Settings for a driven game.
///
/// ```
/// use auto_2048::config::GameConfig;
/// let cfg = GameConfig::from_toml_str("seed = 7\n[agent]\nmerge_weight = 3.0\n").unwrap();
/// assert_eq!(cfg.seed, Some(7));
/// assert_eq!(cfg.agent.merge_weight, 3.0);
/// assert_eq!(cfg.agent.position_divisor, 5.0);
/// ```
#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Seed for tile spawns; `None` draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Stop after this many moves even if the game is not over.
    #[serde(default)]
    pub max_moves: Option<u64>,
    #[serde(default)]
    pub agent: AgentConfig,
}

impl GameConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.agent.validate()?;
        Ok(cfg)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

mod defaults {
    pub fn merge_weight() -> f64 { 2.0 }
    pub fn position_divisor() -> f64 { 5.0 }
    pub fn corner_penalty() -> f64 { 10.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.agent, AgentConfig { merge_weight: 2.0, position_divisor: 5.0, corner_penalty: 10.0 });
    }

    #[test]
    fn loads_from_path() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "max_moves = 500\n\n[agent]\ncorner_penalty = 4.5").unwrap();
        let cfg = GameConfig::from_toml(tmp.path()).unwrap();
        assert_eq!(cfg.max_moves, Some(500));
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.agent.corner_penalty, 4.5);
        assert_eq!(cfg.agent.merge_weight, 2.0);
    }

    #[test]
    fn rejects_zero_divisor() {
        let err = GameConfig::from_toml_str("[agent]\nposition_divisor = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = GameConfig::from_toml_str("[agent]\nlookahead = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::from_toml("/nonexistent/auto-2048.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
