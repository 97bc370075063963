// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::AirnetError;
use csv::StringRecord;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cell values the raw datasets use for "no value".
pub const MISSING_MARKERS: &[&str] = &["", "\\N", "NaN", "nan"];

/// A table exactly as read from its source: one header row and string cells.
/// Typed tables are built from this with `from_table`.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: String,
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: StringRecord, records: Vec<StringRecord>) -> Self {
        Self {
            name: name.into(),
            headers,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub fn optional_column(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))
    }

    /// Index of a column the table cannot be interpreted without.
    pub fn required_column(&self, column: &str) -> Result<usize, AirnetError> {
        self.optional_column(column)
            .ok_or_else(|| AirnetError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    let value = record.get(idx?)?.trim();
    if MISSING_MARKERS.contains(&value) {
        None
    } else {
        Some(value)
    }
}

fn text(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    cell(record, idx).map(str::to_string)
}

fn number<T: FromStr>(record: &StringRecord, idx: Option<usize>) -> Option<T> {
    cell(record, idx).and_then(|v| v.parse::<T>().ok())
}

/// Space-delimited equipment codes. Repeated codes are kept once.
pub fn parse_equipment(raw: Option<&str>) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for code in raw.unwrap_or_default().split_whitespace() {
        if !codes.iter().any(|c| c == code) {
            codes.push(code.to_string());
        }
    }
    codes
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub id: i64,
    pub name: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub country: Option<String>,
}

impl Airline {
    pub fn from_table(raw: &RawTable) -> Result<Vec<Airline>, AirnetError> {
        let id = raw.required_column("Airline ID")?;
        let name = raw.required_column("Name")?;
        let country = raw.required_column("Country")?;
        let iata = raw.optional_column("IATA");
        let icao = raw.optional_column("ICAO");

        let mut skipped = 0usize;
        let mut airlines = Vec::with_capacity(raw.len());
        for record in raw.records() {
            let Some(airline_id) = number::<i64>(record, Some(id)) else {
                skipped += 1;
                continue;
            };
            airlines.push(Airline {
                id: airline_id,
                name: text(record, Some(name)).unwrap_or_default(),
                iata: text(record, iata),
                icao: text(record, icao),
                country: text(record, Some(country)),
            });
        }

        if skipped > 0 {
            warn!("Skipped {} airline rows without a numeric id", skipped);
        }
        debug!("Parsed {} airlines", airlines.len());
        Ok(airlines)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirplaneModel {
    pub name: String,
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
}

impl AirplaneModel {
    pub fn from_table(raw: &RawTable) -> Result<Vec<AirplaneModel>, AirnetError> {
        let name = raw.required_column("Name")?;
        let iata = raw.optional_column("IATA code");
        let icao = raw.optional_column("ICAO code");

        let models: Vec<AirplaneModel> = raw
            .records()
            .iter()
            .filter_map(|record| {
                Some(AirplaneModel {
                    name: text(record, Some(name))?,
                    iata_code: text(record, iata),
                    icao_code: text(record, icao),
                })
            })
            .collect();

        debug!("Parsed {} airplane models", models.len());
        Ok(models)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    /// Raw latitude; not range-checked here.
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Airport {
    /// IATA code when the airport has one, otherwise its numeric id.
    pub fn label(&self) -> String {
        self.iata.clone().unwrap_or_else(|| self.id.to_string())
    }

    pub fn from_table(raw: &RawTable) -> Result<Vec<Airport>, AirnetError> {
        let id = raw.required_column("Airport ID")?;
        let name = raw.required_column("Name")?;
        let city = raw.required_column("City")?;
        let country = raw.required_column("Country")?;
        let iata = raw.required_column("IATA")?;
        let lat = raw.required_column("Latitude")?;
        let lon = raw.required_column("Longitude")?;
        let icao = raw.optional_column("ICAO");

        let mut skipped = 0usize;
        let mut airports = Vec::with_capacity(raw.len());
        for record in raw.records() {
            let Some(airport_id) = number::<i64>(record, Some(id)) else {
                skipped += 1;
                continue;
            };
            airports.push(Airport {
                id: airport_id,
                name: text(record, Some(name)).unwrap_or_default(),
                city: text(record, Some(city)),
                country: text(record, Some(country)),
                iata: text(record, Some(iata)),
                icao: text(record, icao),
                lat: number(record, Some(lat)),
                lon: number(record, Some(lon)),
            });
        }

        if skipped > 0 {
            warn!("Skipped {} airport rows without a numeric id", skipped);
        }
        debug!("Parsed {} airports", airports.len());
        Ok(airports)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    pub airline_code: Option<String>,
    pub airline_id: Option<i64>,
    pub source_code: Option<String>,
    pub source_id: Option<i64>,
    pub destination_code: Option<String>,
    pub destination_id: Option<i64>,
    pub stops: Option<u32>,
    /// Airplane codes flown on the route, in listed order.
    pub equipment: Vec<String>,
}

impl Route {
    pub fn from_table(raw: &RawTable) -> Result<Vec<Route>, AirnetError> {
        let source_id = raw.required_column("Source airport ID")?;
        let destination_id = raw.required_column("Destination airport ID")?;
        let airline_id = raw.required_column("Airline ID")?;
        let equipment = raw.required_column("Equipment")?;
        let airline_code = raw.optional_column("Airline");
        let source_code = raw.optional_column("Source airport");
        let destination_code = raw.optional_column("Destination airport");
        let stops = raw.optional_column("Stops");

        let routes: Vec<Route> = raw
            .records()
            .iter()
            .map(|record| Route {
                airline_code: text(record, airline_code),
                airline_id: number(record, Some(airline_id)),
                source_code: text(record, source_code),
                source_id: number(record, Some(source_id)),
                destination_code: text(record, destination_code),
                destination_id: number(record, Some(destination_id)),
                stops: number(record, stops),
                equipment: parse_equipment(cell(record, Some(equipment))),
            })
            .collect();

        debug!("Parsed {} routes", routes.len());
        Ok(routes)
    }
}

/// The four datasets of one load. Never mutated once built.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub airlines: Vec<Airline>,
    pub airplanes: Vec<AirplaneModel>,
    pub airports: Vec<Airport>,
    pub routes: Vec<Route>,
}

impl ReferenceTables {
    pub fn from_raw(
        airlines: &RawTable,
        airplanes: &RawTable,
        airports: &RawTable,
        routes: &RawTable,
    ) -> Result<Self, AirnetError> {
        Ok(Self {
            airlines: Airline::from_table(airlines)?,
            airplanes: AirplaneModel::from_table(airplanes)?,
            airports: Airport::from_table(airports)?,
            routes: Route::from_table(routes)?,
        })
    }
}
