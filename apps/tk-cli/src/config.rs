//! Engine configuration loaded from YAML.

use crate::error::{CliError, CliResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tk_core::units::constants::{GAMMA_AIR, R_AIR_KJ_PER_KG_K};
use tk_props::{PropertyProvider, SimplifiedProvider, TableProvider};
use tk_vle::DEFAULT_PXY_POINTS;

/// Environment variable naming a default configuration file.
pub const CONFIG_ENV: &str = "TK_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Placeholder constants, no external data
    #[default]
    Simplified,
    /// Real-fluid properties from CoolProp
    Table,
}

impl ProviderKind {
    pub fn build(self) -> Arc<dyn PropertyProvider> {
        match self {
            ProviderKind::Simplified => Arc::new(SimplifiedProvider::default()),
            ProviderKind::Table => Arc::new(TableProvider::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BraytonConfig {
    pub gamma: f64,
    /// Specific gas constant [kJ/(kg·K)]
    pub gas_constant: f64,
}

impl Default for BraytonConfig {
    fn default() -> Self {
        Self {
            gamma: GAMMA_AIR,
            gas_constant: R_AIR_KJ_PER_KG_K,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub provider: ProviderKind,
    pub format: OutputFormat,
    pub brayton: BraytonConfig,
    /// Resolution of Pxy curves.
    pub pxy_points: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            format: OutputFormat::default(),
            brayton: BraytonConfig::default(),
            pxy_points: DEFAULT_PXY_POINTS,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(content: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from the explicit path, else from `TK_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.pxy_points, 11);
        assert_eq!(config.brayton.gamma, 1.4);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let yaml = "provider: table\nbrayton:\n  gamma: 1.35\n";
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.provider, ProviderKind::Table);
        assert_eq!(config.brayton.gamma, 1.35);
        assert_eq!(config.brayton.gas_constant, 0.287);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn unknown_provider_rejected() {
        assert!(EngineConfig::from_yaml_str("provider: iapws").is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = EngineConfig::load(Path::new("/nonexistent/tk.yaml")).unwrap_err();
        assert!(matches!(err, CliError::FileRead { .. }));
    }
}
