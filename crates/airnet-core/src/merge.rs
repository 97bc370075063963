// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geodesy::EarthModel;
use crate::tables::{Airline, AirplaneModel, Airport, ReferenceTables, Route};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Airline name/country reported when a route's airline cannot be resolved.
pub const UNKNOWN_AIRLINE: &str = "unknown";

/// One end of a flight, copied out of the Airports table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub airport_id: i64,
    pub code: Option<String>,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Endpoint {
    fn from_airport(airport: &Airport) -> Self {
        Self {
            airport_id: airport.id,
            code: airport.iata.clone(),
            name: airport.name.clone(),
            city: airport.city.clone(),
            country: airport.country.clone(),
            lat: airport.lat,
            lon: airport.lon,
        }
    }

    /// IATA code when present, otherwise the numeric airport id.
    pub fn label(&self) -> String {
        self.code
            .clone()
            .unwrap_or_else(|| self.airport_id.to_string())
    }

    /// True when `key` is this airport's IATA code (any case) or its id.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(key))
            || key.parse::<i64>().is_ok_and(|id| id == self.airport_id)
    }

    pub fn in_country(&self, country: &str) -> bool {
        self.country
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(country.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirlineRef {
    pub id: i64,
    pub name: String,
    pub country: Option<String>,
}

impl From<&Airline> for AirlineRef {
    fn from(airline: &Airline) -> Self {
        Self {
            id: airline.id,
            name: airline.name.clone(),
            country: airline.country.clone(),
        }
    }
}

/// A route joined to both of its airports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    /// Position of the originating row in the Routes table.
    pub route_index: usize,
    pub airline: Option<AirlineRef>,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub stops: Option<u32>,
    /// Distinct airplane model names flown on the route. Codes with no
    /// matching model are kept verbatim.
    pub models: Vec<String>,
    pub distance_km: f64,
}

impl FlightRecord {
    /// Both endpoints are known to be in the same country.
    pub fn is_domestic(&self) -> bool {
        matches!(
            (&self.source.country, &self.destination.country),
            (Some(a), Some(b)) if a == b
        )
    }

    pub fn airline_name(&self) -> &str {
        self.airline
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or(UNKNOWN_AIRLINE)
    }

    pub fn airline_country(&self) -> &str {
        self.airline
            .as_ref()
            .and_then(|a| a.country.as_deref())
            .unwrap_or(UNKNOWN_AIRLINE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub routes_read: usize,
    /// Routes dropped because an endpoint airport could not be found.
    pub unresolved_airport: usize,
    /// Routes kept with an unknown airline.
    pub unknown_airline: usize,
    pub records: usize,
}

/// Output of the merge. Cloning shares the rows.
#[derive(Debug, Clone)]
pub struct FlightRecordTable {
    records: Arc<[FlightRecord]>,
    stats: MergeStats,
    earth_model: EarthModel,
}

impl FlightRecordTable {
    pub fn empty() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            stats: MergeStats::default(),
            earth_model: EarthModel::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightRecord> {
        self.records.iter()
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    pub fn earth_model(&self) -> EarthModel {
        self.earth_model
    }

    /// Fan-out of records to the models they fly: one item per (record, model).
    pub fn model_usage(&self) -> impl Iterator<Item = (&FlightRecord, &str)> + '_ {
        self.records
            .iter()
            .flat_map(|r| r.models.iter().map(move |m| (r, m.as_str())))
    }
}

impl Default for FlightRecordTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a FlightRecordTable {
    type Item = &'a FlightRecord;
    type IntoIter = std::slice::Iter<'a, FlightRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

struct AirportIndex<'a> {
    by_id: HashMap<i64, &'a Airport>,
    by_code: HashMap<String, &'a Airport>,
}

impl<'a> AirportIndex<'a> {
    fn new(airports: &'a [Airport]) -> Self {
        let mut by_id = HashMap::with_capacity(airports.len());
        let mut by_code = HashMap::with_capacity(airports.len());
        for airport in airports {
            by_id.entry(airport.id).or_insert(airport);
            if let Some(code) = &airport.iata {
                by_code.entry(code.to_ascii_uppercase()).or_insert(airport);
            }
        }
        Self { by_id, by_code }
    }

    /// The id wins when present; the code is only consulted without one.
    fn resolve(&self, id: Option<i64>, code: Option<&str>) -> Option<&'a Airport> {
        match id {
            Some(id) => self.by_id.get(&id).copied(),
            None => code.and_then(|c| self.by_code.get(&c.to_ascii_uppercase()).copied()),
        }
    }
}

struct AirlineIndex<'a> {
    by_id: HashMap<i64, &'a Airline>,
    by_code: HashMap<String, &'a Airline>,
}

impl<'a> AirlineIndex<'a> {
    fn new(airlines: &'a [Airline]) -> Self {
        let mut by_id = HashMap::with_capacity(airlines.len());
        let mut by_code = HashMap::new();
        for airline in airlines {
            by_id.entry(airline.id).or_insert(airline);
            for code in [&airline.iata, &airline.icao].into_iter().flatten() {
                by_code.entry(code.to_ascii_uppercase()).or_insert(airline);
            }
        }
        Self { by_id, by_code }
    }

    fn resolve(&self, id: Option<i64>, code: Option<&str>) -> Option<&'a Airline> {
        match id {
            Some(id) => self.by_id.get(&id).copied(),
            None => code.and_then(|c| self.by_code.get(&c.to_ascii_uppercase()).copied()),
        }
    }
}

struct ModelIndex<'a> {
    by_code: HashMap<String, &'a str>,
}

impl<'a> ModelIndex<'a> {
    fn new(models: &'a [AirplaneModel]) -> Self {
        let mut by_code = HashMap::with_capacity(models.len() * 2);
        // IATA codes first so they take precedence over a clashing ICAO code
        for model in models {
            if let Some(code) = &model.iata_code {
                by_code
                    .entry(code.to_ascii_uppercase())
                    .or_insert(model.name.as_str());
            }
        }
        for model in models {
            if let Some(code) = &model.icao_code {
                by_code
                    .entry(code.to_ascii_uppercase())
                    .or_insert(model.name.as_str());
            }
        }
        Self { by_code }
    }

    fn names_for(&self, equipment: &[String]) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(equipment.len());
        for code in equipment {
            let name = self
                .by_code
                .get(&code.to_ascii_uppercase())
                .copied()
                .unwrap_or(code.as_str());
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

/// Joins the four reference tables into the flight record table using the
/// WGS84 earth model.
pub fn merge(tables: &ReferenceTables) -> FlightRecordTable {
    merge_with(tables, EarthModel::default())
}

pub fn merge_with(tables: &ReferenceTables, earth_model: EarthModel) -> FlightRecordTable {
    merge_parts(
        &tables.airlines,
        &tables.airplanes,
        &tables.airports,
        &tables.routes,
        earth_model,
    )
}

/// Routes with an unresolvable source or destination airport are dropped;
/// an unresolvable airline is kept as unknown. Never fails.
pub fn merge_parts(
    airlines: &[Airline],
    airplanes: &[AirplaneModel],
    airports: &[Airport],
    routes: &[Route],
    earth_model: EarthModel,
) -> FlightRecordTable {
    let airport_index = AirportIndex::new(airports);
    let airline_index = AirlineIndex::new(airlines);
    let model_index = ModelIndex::new(airplanes);

    let mut stats = MergeStats {
        routes_read: routes.len(),
        ..MergeStats::default()
    };
    let mut records = Vec::with_capacity(routes.len());

    for (route_index, route) in routes.iter().enumerate() {
        let source = airport_index.resolve(route.source_id, route.source_code.as_deref());
        let destination =
            airport_index.resolve(route.destination_id, route.destination_code.as_deref());
        let (Some(source), Some(destination)) = (source, destination) else {
            stats.unresolved_airport += 1;
            continue;
        };

        let airline = airline_index
            .resolve(route.airline_id, route.airline_code.as_deref())
            .map(AirlineRef::from);
        if airline.is_none() {
            stats.unknown_airline += 1;
        }

        records.push(FlightRecord {
            route_index,
            airline,
            source: Endpoint::from_airport(source),
            destination: Endpoint::from_airport(destination),
            stops: route.stops,
            models: model_index.names_for(&route.equipment),
            distance_km: 0.0,
        });
    }

    records.par_iter_mut().for_each(|r| {
        r.distance_km = earth_model.distance_km(
            r.source.lat,
            r.source.lon,
            r.destination.lat,
            r.destination.lon,
        );
    });

    stats.records = records.len();
    info!(
        "Merged {} routes into {} flight records ({} dropped for unknown airports, {} with unknown airline)",
        stats.routes_read, stats.records, stats.unresolved_airport, stats.unknown_airline
    );
    debug!("Distances computed with {:?} earth model", earth_model);

    FlightRecordTable {
        records: records.into(),
        stats,
        earth_model,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(id: i64, iata: Option<&str>, country: &str) -> Airport {
        Airport {
            id,
            name: format!("Airport {}", id),
            city: None,
            country: Some(country.to_string()),
            iata: iata.map(str::to_string),
            icao: None,
            lat: Some(0.0),
            lon: Some(id as f64 / 10.0),
        }
    }

    #[test]
    fn test_id_takes_precedence_over_code() {
        let airports = vec![airport(1, Some("AAA"), "X"), airport(2, Some("BBB"), "X")];
        let index = AirportIndex::new(&airports);

        assert_eq!(index.resolve(Some(2), Some("AAA")).map(|a| a.id), Some(2));
        assert_eq!(index.resolve(Some(99), Some("AAA")).map(|a| a.id), None);
        assert_eq!(index.resolve(None, Some("aaa")).map(|a| a.id), Some(1));
        assert_eq!(index.resolve(None, None).map(|a| a.id), None);
    }

    #[test]
    fn test_model_names_prefer_iata_and_collapse_aliases() {
        let models = vec![
            AirplaneModel {
                name: "Airbus A320".to_string(),
                iata_code: Some("320".to_string()),
                icao_code: Some("A320".to_string()),
            },
            AirplaneModel {
                name: "Boeing 737-800".to_string(),
                iata_code: Some("738".to_string()),
                icao_code: Some("B738".to_string()),
            },
        ];
        let index = ModelIndex::new(&models);
        let names = index.names_for(&[
            "320".to_string(),
            "a320".to_string(),
            "738".to_string(),
            "XYZ".to_string(),
        ]);
        assert_eq!(names, vec!["Airbus A320", "Boeing 737-800", "XYZ"]);
    }

    #[test]
    fn test_unknown_country_is_never_domestic() {
        let a = Endpoint::from_airport(&airport(1, None, "X"));
        let mut b = a.clone();
        b.country = None;
        let record = FlightRecord {
            route_index: 0,
            airline: None,
            source: b.clone(),
            destination: b,
            stops: None,
            models: vec![],
            distance_km: 0.0,
        };
        assert!(!record.is_domestic());
        assert_eq!(record.airline_name(), UNKNOWN_AIRLINE);
        assert!(a.matches("1"));
        assert!(!a.matches("AAA"));
    }
}
