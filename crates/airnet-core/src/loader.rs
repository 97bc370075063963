// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::tables::{RawTable, ReferenceTables};
use crate::AirnetError;
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const AIRLINES_FILE: &str = "airlines.csv";
pub const AIRPLANES_FILE: &str = "airplanes.csv";
pub const AIRPORTS_FILE: &str = "airports.csv";
pub const ROUTES_FILE: &str = "routes.csv";

/// Reads the four dataset CSVs from a directory or from the zip archive they
/// are distributed in. Fetching the archive is left to the caller.
pub struct DatasetLoader;

impl DatasetLoader {
    /// `path` is either a directory holding the CSV files or a `.zip` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ReferenceTables, AirnetError> {
        let path = path.as_ref();
        if path.is_dir() {
            return Self::load_dir(path);
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match extension.as_deref() {
            Some("zip") => Self::load_zip(path),
            _ if !path.exists() => Err(AirnetError::MissingTable(path.display().to_string())),
            _ => Err(AirnetError::UnsupportedSource(path.display().to_string())),
        }
    }

    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<ReferenceTables, AirnetError> {
        let dir = dir.as_ref();
        info!("Loading flight datasets from {}", dir.display());

        let open = |name: &str| -> Result<RawTable, AirnetError> {
            let path = dir.join(name);
            if !path.exists() {
                return Err(AirnetError::MissingTable(path.display().to_string()));
            }
            read_table(table_name(name), File::open(&path)?)
        };

        let tables = ReferenceTables::from_raw(
            &open(AIRLINES_FILE)?,
            &open(AIRPLANES_FILE)?,
            &open(AIRPORTS_FILE)?,
            &open(ROUTES_FILE)?,
        )?;
        log_counts(&tables);
        Ok(tables)
    }

    /// Files may sit at the archive root or inside a folder.
    pub fn load_zip<P: AsRef<Path>>(path: P) -> Result<ReferenceTables, AirnetError> {
        let path = path.as_ref();
        info!("Loading flight datasets from archive {}", path.display());

        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let mut read = |name: &str| -> Result<RawTable, AirnetError> {
            let entry_name = archive
                .file_names()
                .find(|entry| {
                    Path::new(entry)
                        .file_name()
                        .and_then(|f| f.to_str())
                        .is_some_and(|f| f.eq_ignore_ascii_case(name))
                })
                .map(str::to_string)
                .ok_or_else(|| AirnetError::MissingTable(format!("{}:{}", path.display(), name)))?;

            debug!("Reading {} from archive entry {}", name, entry_name);
            let entry = archive.by_name(&entry_name)?;
            read_table(table_name(name), entry)
        };

        let airlines = read(AIRLINES_FILE)?;
        let airplanes = read(AIRPLANES_FILE)?;
        let airports = read(AIRPORTS_FILE)?;
        let routes = read(ROUTES_FILE)?;

        let tables = ReferenceTables::from_raw(&airlines, &airplanes, &airports, &routes)?;
        log_counts(&tables);
        Ok(tables)
    }

    /// Builds the tables from already-open CSV sources.
    pub fn from_readers<A, P, T, R>(
        airlines: A,
        airplanes: P,
        airports: T,
        routes: R,
    ) -> Result<ReferenceTables, AirnetError>
    where
        A: Read,
        P: Read,
        T: Read,
        R: Read,
    {
        ReferenceTables::from_raw(
            &read_table("airlines", airlines)?,
            &read_table("airplanes", airplanes)?,
            &read_table("airports", airports)?,
            &read_table("routes", routes)?,
        )
    }
}

fn table_name(file: &str) -> &str {
    file.trim_end_matches(".csv")
}

/// Reads one CSV with a header row. Short rows are accepted; their trailing
/// cells read as missing.
pub fn read_table<R: Read>(name: &str, reader: R) -> Result<RawTable, AirnetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Read table '{}' ({} columns, {} rows)",
        name,
        headers.len(),
        records.len()
    );
    Ok(RawTable::new(name, headers, records))
}

fn log_counts(tables: &ReferenceTables) {
    info!(
        "Loaded {} airlines, {} airplane models, {} airports, {} routes",
        tables.airlines.len(),
        tables.airplanes.len(),
        tables.airports.len(),
        tables.routes.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_table_keeps_short_rows() {
        let data = "a,b,c\n1,2,3\n4,5\n";
        let table = read_table("t", Cursor::new(data)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].get(2), None);
        assert_eq!(table.optional_column("c"), Some(2));
    }

    #[test]
    fn test_unsupported_source_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flights.parquet");
        std::fs::write(&path, b"PAR1").unwrap();

        match DatasetLoader::load(&path) {
            Err(AirnetError::UnsupportedSource(p)) => assert!(p.ends_with("flights.parquet")),
            other => panic!("expected UnsupportedSource, got {:?}", other.map(|_| ())),
        }
    }
}
