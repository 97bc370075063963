// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geodesy::EarthModel;
use crate::metrics::DEFAULT_CUTOFF_KM;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "airnet.json";

/// Factors for turning short-haul distance into a CO2 figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionFactors {
    /// Grams of CO2 per passenger-kilometre on a domestic flight.
    pub flight_grams_per_km: f64,
    /// How many times more a flight emits than a train over the same distance.
    pub train_ratio: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            flight_grams_per_km: 246.0,
            train_ratio: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory with the CSV files, or the dataset zip archive.
    pub data_path: Option<PathBuf>,
    pub cutoff_km: f64,
    pub top_n: usize,
    pub earth_model: EarthModel,
    pub emissions: EmissionFactors,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            cutoff_km: DEFAULT_CUTOFF_KM,
            top_n: 5,
            earth_model: EarthModel::default(),
            emissions: EmissionFactors::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config_path: crate::get_config_root().join(CONFIG_FILE),
        }
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<AnalysisConfig> {
        if !self.config_path.exists() {
            return Ok(AnalysisConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read {}", self.config_path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.config_path.display()))
    }

    pub fn save(&self, config: &AnalysisConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))
    }
}
