//! Configuration for promptx

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the wildcard vocabulary
    #[serde(default = "default_wildcards_root")]
    pub wildcards_root: PathBuf,

    /// Cap on rewrite iterations before expansion gives up on a fixpoint
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_wildcards_root() -> PathBuf {
    PathBuf::from(vocabstore::DEFAULT_ROOT)
}

fn default_max_iterations() -> usize {
    crate::engine::DEFAULT_MAX_ITERATIONS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wildcards_root: default_wildcards_root(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("promptx").join("config.yml")),
            Some(PathBuf::from("promptx.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }
}
