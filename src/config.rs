// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Slice configuration

use crate::error::SliceError;
use crate::geometry::{TextureRegion, DEFAULT_EPSILON};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file looked up in the working directory by [`SliceConfig::load`]
pub const CONFIG_FILE: &str = "hullslice.toml";

/// Settings shared by every slice a [`crate::Slicer`] performs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Tolerance for plane classification and segment intersection
    pub epsilon: f64,
    /// Submesh range that receives the cap triangles.
    /// `None`, or an index past the last submesh, appends a new range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_section_index: Option<usize>,
    /// Split submeshes on the rayon thread pool
    pub parallel: bool,
    /// Texture rectangle the cap UVs are mapped into
    pub cross_section_region: TextureRegion,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            cross_section_index: None,
            parallel: false,
            cross_section_region: TextureRegion::full(),
        }
    }
}

impl SliceConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: SliceConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `hullslice.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            let config = Self::from_file(CONFIG_FILE)?;
            info!("Loaded slice config from `{}`", CONFIG_FILE);
            config
        } else {
            Self::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `HULLSLICE_*` overrides looked up through `var`.
    ///
    /// An empty `HULLSLICE_CROSS_SECTION_INDEX` clears the index.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(epsilon) = var("HULLSLICE_EPSILON") {
            self.epsilon = epsilon
                .trim()
                .parse()
                .with_context(|| format!("Invalid HULLSLICE_EPSILON: {epsilon:?}"))?;
        }

        if let Some(parallel) = var("HULLSLICE_PARALLEL") {
            self.parallel = parallel
                .trim()
                .parse()
                .with_context(|| format!("Invalid HULLSLICE_PARALLEL: {parallel:?}"))?;
        }

        if let Some(index) = var("HULLSLICE_CROSS_SECTION_INDEX") {
            self.cross_section_index = match index.trim() {
                "" => None,
                value => Some(value.parse().with_context(|| {
                    format!("Invalid HULLSLICE_CROSS_SECTION_INDEX: {index:?}")
                })?),
            };
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Reject values the slicer cannot work with
    pub fn validate(&self) -> Result<(), SliceError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(SliceError::InvalidTolerance(self.epsilon));
        }
        self.cross_section_region.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn overridden(vars: &[(&str, &str)]) -> Result<SliceConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = SliceConfig::default();
        config.apply_overrides(|name| vars.get(name).cloned())?;
        Ok(config)
    }

    #[test]
    fn test_default_config() {
        let config = SliceConfig::default();
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
        assert_eq!(config.cross_section_region, TextureRegion::full());
        assert!(config.cross_section_index.is_none());
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slice.toml");

        let config = SliceConfig {
            epsilon: 1e-6,
            cross_section_index: Some(1),
            parallel: true,
            cross_section_region: TextureRegion::new(0.0, 0.5, 0.5, 1.0),
        };
        config.save(&path).unwrap();

        assert_eq!(SliceConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slice.toml");
        std::fs::write(&path, "parallel = true\n").unwrap();

        let config = SliceConfig::from_file(&path).unwrap();
        assert!(config.parallel);
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = SliceConfig::from_file("/nonexistent/hullslice.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = SliceConfig {
            epsilon: -1.0,
            ..SliceConfig::default()
        };
        assert_eq!(config.validate(), Err(SliceError::InvalidTolerance(-1.0)));

        let config = SliceConfig {
            cross_section_region: TextureRegion::new(f64::INFINITY, 0.0, 1.0, 1.0),
            ..SliceConfig::default()
        };
        assert_eq!(config.validate(), Err(SliceError::InvalidTextureRegion));
    }

    #[test]
    fn test_env_overrides() {
        let config = overridden(&[
            ("HULLSLICE_EPSILON", "1e-6"),
            ("HULLSLICE_PARALLEL", "true"),
            ("HULLSLICE_CROSS_SECTION_INDEX", " 2 "),
        ])
        .unwrap();

        assert_eq!(config.epsilon, 1e-6);
        assert!(config.parallel);
        assert_eq!(config.cross_section_index, Some(2));

        assert_eq!(overridden(&[]).unwrap(), SliceConfig::default());
    }

    #[test]
    fn test_empty_index_override_clears_index() {
        let mut config = SliceConfig {
            cross_section_index: Some(1),
            ..SliceConfig::default()
        };
        config
            .apply_overrides(|name| (name == "HULLSLICE_CROSS_SECTION_INDEX").then(String::new))
            .unwrap();
        assert!(config.cross_section_index.is_none());
    }

    #[test]
    fn test_malformed_env_overrides_are_errors() {
        for (name, value) in [
            ("HULLSLICE_EPSILON", "tiny"),
            ("HULLSLICE_PARALLEL", "yes"),
            ("HULLSLICE_PARALLEL", "1"),
            ("HULLSLICE_CROSS_SECTION_INDEX", "-1"),
            ("HULLSLICE_CROSS_SECTION_INDEX", "first"),
        ] {
            let err = overridden(&[(name, value)]).unwrap_err();
            assert!(
                err.to_string().contains(name),
                "{name}={value:?} gave {err}"
            );
        }
    }
}
