// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod config;
pub mod geodesy;
pub mod loader;
pub mod lookup;
pub mod merge;
pub mod metrics;
pub mod network;
pub mod tables;

use std::path::PathBuf;
use thiserror::Error;

pub use geodesy::{distance, EarthModel};
pub use merge::{merge, FlightRecord, FlightRecordTable, MergeStats};
pub use metrics::{FlightScope, ShortHaulEstimate};
pub use network::FlightNetwork;
pub use tables::{Airline, AirplaneModel, Airport, ReferenceTables, Route};

#[derive(Error, Debug)]
pub enum AirnetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Dataset file not found: {0}")]
    MissingTable(String),
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },
    #[error("Unsupported dataset source: {0}")]
    UnsupportedSource(String),
}

/// Directory holding `airnet.json`. Falls back to the working directory when
/// the platform has no config location.
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "airnet", "airnet")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
