// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geodesy::EarthModel;
use crate::loader::DatasetLoader;
use crate::lookup::{self, Lookup};
use crate::merge::{merge_with, FlightRecordTable};
use crate::metrics::{self, AirportCount, CountrySplit, FlightScope, HistogramBin, ShortHaulEstimate};
use crate::tables::{AirplaneModel, Airport, ReferenceTables};
use crate::AirnetError;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// One loaded dataset and the flight records merged from it.
///
/// Cloning is cheap and every clone sees the same immutable data, so
/// several networks (fixtures, production data) can live side by side.
#[derive(Debug, Clone)]
pub struct FlightNetwork {
    tables: Arc<ReferenceTables>,
    records: FlightRecordTable,
    airport_keys: Arc<HashMap<String, usize>>,
}

impl FlightNetwork {
    pub fn new(tables: ReferenceTables) -> Self {
        Self::with_earth_model(tables, EarthModel::default())
    }

    pub fn with_earth_model(tables: ReferenceTables, earth_model: EarthModel) -> Self {
        let records = merge_with(&tables, earth_model);

        let mut airport_keys = HashMap::with_capacity(tables.airports.len() * 2);
        for (i, airport) in tables.airports.iter().enumerate() {
            airport_keys.entry(airport.id.to_string()).or_insert(i);
            if let Some(code) = &airport.iata {
                airport_keys.entry(code.to_ascii_uppercase()).or_insert(i);
            }
        }

        Self {
            tables: Arc::new(tables),
            records,
            airport_keys: Arc::new(airport_keys),
        }
    }

    /// Loads a dataset directory or archive and merges it.
    pub fn load<P: AsRef<Path>>(path: P, earth_model: EarthModel) -> Result<Self, AirnetError> {
        let tables = DatasetLoader::load(path)?;
        Ok(Self::with_earth_model(tables, earth_model))
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn flight_records(&self) -> &FlightRecordTable {
        &self.records
    }

    pub fn earth_model(&self) -> EarthModel {
        self.records.earth_model()
    }

    /// Finds an airport by IATA code (any case) or numeric id.
    pub fn find_airport(&self, key: &str) -> Option<&Airport> {
        self.airport_keys
            .get(&key.trim().to_ascii_uppercase())
            .and_then(|&i| self.tables.airports.get(i))
    }

    /// Distance in km between two airports given by IATA code or id. An
    /// unknown airport resolves to 0 like any other invalid coordinate.
    pub fn distance(&self, airport_a: &str, airport_b: &str) -> f64 {
        match (self.find_airport(airport_a), self.find_airport(airport_b)) {
            (Some(a), Some(b)) => self.earth_model().distance_km(a.lat, a.lon, b.lat, b.lon),
            _ => 0.0,
        }
    }

    pub fn outgoing_counts(&self, airport: &str, top_n: usize) -> Vec<(String, usize)> {
        metrics::outgoing_counts(&self.records, airport, top_n)
    }

    pub fn outgoing_counts_in(
        &self,
        airport: &str,
        top_n: usize,
        scope: FlightScope,
    ) -> Vec<(String, usize)> {
        metrics::outgoing_counts_in(&self.records, airport, top_n, scope)
    }

    pub fn airport_flight_counts(&self, scope: FlightScope) -> Vec<AirportCount> {
        metrics::airport_flight_counts(&self.records, scope)
    }

    pub fn country_flight_counts(&self, country: &str, scope: FlightScope) -> usize {
        metrics::country_flight_counts(&self.records, country, scope)
    }

    pub fn country_breakdown(&self) -> BTreeMap<String, CountrySplit> {
        metrics::country_breakdown(&self.records)
    }

    pub fn airports_in_country(&self, country: &str) -> Vec<String> {
        metrics::airports_in_country(&self.records, country)
    }

    /// `None` and an empty slice both mean every country.
    pub fn model_frequencies(&self, countries: Option<&[&str]>) -> BTreeMap<String, usize> {
        metrics::model_frequencies(&self.records, countries.unwrap_or_default())
    }

    pub fn top_models(&self, n: usize, countries: Option<&[&str]>) -> Vec<(String, usize)> {
        metrics::top_models(&self.records, n, countries.unwrap_or_default())
    }

    pub fn short_haul_estimate(&self, country: Option<&str>, cutoff_km: f64) -> ShortHaulEstimate {
        metrics::short_haul_estimate(&self.records, country, cutoff_km)
    }

    pub fn distance_histogram(&self, bins: usize) -> Vec<HistogramBin> {
        metrics::distance_histogram(&self.records, bins)
    }

    pub fn aircraft_info(&self, name: &str) -> Lookup<'_, AirplaneModel> {
        lookup::aircraft_info(&self.tables.airplanes, name)
    }

    pub fn airport_info(&self, name: &str) -> Lookup<'_, Airport> {
        lookup::airport_info(&self.tables.airports, name)
    }

    pub fn aircraft_models(&self) -> Vec<&str> {
        lookup::aircraft_models(&self.tables.airplanes)
    }
}
