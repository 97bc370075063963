// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Aggregations over a [`FlightRecordTable`].
//!
//! Every function here reads the table and folds it into fresh counters.
//! Empty tables, unknown airports and unknown countries all produce the empty
//! (or zero) result rather than an error.

use crate::merge::{FlightRecord, FlightRecordTable};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Cutoff separating short-haul from long-haul flights.
pub const DEFAULT_CUTOFF_KM: f64 = 500.0;

/// Which flights an aggregation looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightScope {
    #[default]
    All,
    Domestic,
    International,
}

impl FlightScope {
    pub fn includes(&self, record: &FlightRecord) -> bool {
        match self {
            FlightScope::All => true,
            FlightScope::Domestic => record.is_domestic(),
            FlightScope::International => !record.is_domestic(),
        }
    }
}

// Highest count first, then key ascending.
fn rank(counts: impl IntoIterator<Item = (String, usize)>, top_n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked
}

/// Most frequent destinations from one airport (IATA code or numeric id).
pub fn outgoing_counts(table: &FlightRecordTable, airport: &str, top_n: usize) -> Vec<(String, usize)> {
    outgoing_counts_in(table, airport, top_n, FlightScope::All)
}

pub fn outgoing_counts_in(
    table: &FlightRecordTable,
    airport: &str,
    top_n: usize,
    scope: FlightScope,
) -> Vec<(String, usize)> {
    let counts = table
        .iter()
        .filter(|r| r.source.matches(airport) && scope.includes(r))
        .fold(HashMap::new(), |mut acc, r| {
            *acc.entry(r.destination.label()).or_insert(0usize) += 1;
            acc
        });
    rank(counts, top_n)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirportCount {
    pub airport: String,
    pub name: String,
    pub country: Option<String>,
    pub flights: usize,
}

/// Outgoing flight totals for every source airport, busiest first.
pub fn airport_flight_counts(table: &FlightRecordTable, scope: FlightScope) -> Vec<AirportCount> {
    let mut by_airport: HashMap<i64, AirportCount> = HashMap::new();
    for record in table.iter().filter(|r| scope.includes(r)) {
        by_airport
            .entry(record.source.airport_id)
            .or_insert_with(|| AirportCount {
                airport: record.source.label(),
                name: record.source.name.clone(),
                country: record.source.country.clone(),
                flights: 0,
            })
            .flights += 1;
    }

    let mut counts: Vec<AirportCount> = by_airport.into_values().collect();
    counts.sort_by(|a, b| {
        b.flights
            .cmp(&a.flights)
            .then_with(|| a.airport.cmp(&b.airport))
    });
    counts
}

/// Flights leaving `country`, restricted to `scope`.
pub fn country_flight_counts(table: &FlightRecordTable, country: &str, scope: FlightScope) -> usize {
    table
        .iter()
        .filter(|r| r.source.in_country(country) && scope.includes(r))
        .count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountrySplit {
    pub domestic: usize,
    pub international: usize,
}

impl CountrySplit {
    pub fn total(&self) -> usize {
        self.domestic + self.international
    }

    fn combine(self, other: CountrySplit) -> CountrySplit {
        CountrySplit {
            domestic: self.domestic + other.domestic,
            international: self.international + other.international,
        }
    }
}

/// Domestic/international split for every source country. Records whose
/// source country is unknown are left out.
pub fn country_breakdown(table: &FlightRecordTable) -> BTreeMap<String, CountrySplit> {
    table
        .records()
        .par_iter()
        .filter_map(|r| r.source.country.as_ref().map(|c| (c, r.is_domestic())))
        .fold(
            BTreeMap::new,
            |mut acc: BTreeMap<String, CountrySplit>, (country, domestic)| {
                let split = acc.entry(country.clone()).or_default();
                if domestic {
                    split.domestic += 1;
                } else {
                    split.international += 1;
                }
                acc
            },
        )
        .reduce(BTreeMap::new, |mut left, right| {
            for (country, split) in right {
                let entry = left.entry(country).or_default();
                *entry = entry.combine(split);
            }
            left
        })
}

/// Distinct airports with at least one departure from `country`, by label.
pub fn airports_in_country(table: &FlightRecordTable, country: &str) -> Vec<String> {
    table
        .iter()
        .filter(|r| r.source.in_country(country))
        .map(|r| r.source.label())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Routes per airplane model. A route flying several models counts once for
/// each. An empty `countries` slice means no country filter.
pub fn model_frequencies(table: &FlightRecordTable, countries: &[&str]) -> BTreeMap<String, usize> {
    table
        .model_usage()
        .filter(|(r, _)| countries.is_empty() || countries.iter().any(|c| r.source.in_country(c)))
        .fold(BTreeMap::new(), |mut acc, (_, model)| {
            *acc.entry(model.to_string()).or_insert(0usize) += 1;
            acc
        })
}

pub fn top_models(table: &FlightRecordTable, n: usize, countries: &[&str]) -> Vec<(String, usize)> {
    rank(model_frequencies(table, countries), n)
}

/// Domestic flights at or under a distance cutoff: the candidates for
/// replacement by ground transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ShortHaulEstimate {
    pub cutoff_km: f64,
    pub domestic_flights: usize,
    pub count: usize,
    pub total_distance_km: f64,
    pub long_haul_count: usize,
    /// Short-haul airport pairs with A→B and B→A counted once.
    pub distinct_routes: usize,
    pub distinct_distance_km: f64,
}

/// `country = None` covers the whole network. Distances of 0 from invalid
/// coordinates count as short-haul.
pub fn short_haul_estimate(
    table: &FlightRecordTable,
    country: Option<&str>,
    cutoff_km: f64,
) -> ShortHaulEstimate {
    let mut estimate = ShortHaulEstimate {
        cutoff_km,
        ..ShortHaulEstimate::default()
    };
    let mut seen_pairs: HashSet<(i64, i64)> = HashSet::new();

    let domestic = table.iter().filter(|r| {
        r.is_domestic() && country.map_or(true, |c| r.source.in_country(c))
    });
    for record in domestic {
        estimate.domestic_flights += 1;
        if record.distance_km <= cutoff_km {
            estimate.count += 1;
            estimate.total_distance_km += record.distance_km;

            let (a, b) = (record.source.airport_id, record.destination.airport_id);
            if seen_pairs.insert((a.min(b), a.max(b))) {
                estimate.distinct_routes += 1;
                estimate.distinct_distance_km += record.distance_km;
            }
        } else {
            estimate.long_haul_count += 1;
        }
    }
    estimate
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower_km: f64,
    pub upper_km: f64,
    pub count: usize,
}

/// Equal-width bins over [0, longest distance]. The last bin is closed.
pub fn distance_histogram(table: &FlightRecordTable, bins: usize) -> Vec<HistogramBin> {
    if bins == 0 || table.is_empty() {
        return Vec::new();
    }
    let max = table.iter().map(|r| r.distance_km).fold(0.0_f64, f64::max);
    let width = if max > 0.0 { max / bins as f64 } else { 1.0 };

    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower_km: i as f64 * width,
            upper_km: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for record in table.iter() {
        let idx = ((record.distance_km / width) as usize).min(bins - 1);
        histogram[idx].count += 1;
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_breaks_ties_by_key() {
        let ranked = rank(
            vec![
                ("ZRH".to_string(), 2),
                ("AMS".to_string(), 2),
                ("CDG".to_string(), 5),
                ("BCN".to_string(), 1),
            ],
            3,
        );
        assert_eq!(
            ranked,
            vec![
                ("CDG".to_string(), 5),
                ("AMS".to_string(), 2),
                ("ZRH".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_empty_table_aggregates_to_nothing() {
        let table = FlightRecordTable::empty();
        assert!(outgoing_counts(&table, "CDG", 5).is_empty());
        assert_eq!(country_flight_counts(&table, "France", FlightScope::All), 0);
        assert!(country_breakdown(&table).is_empty());
        assert!(model_frequencies(&table, &[]).is_empty());
        assert!(distance_histogram(&table, 30).is_empty());

        let estimate = short_haul_estimate(&table, None, DEFAULT_CUTOFF_KM);
        assert_eq!(estimate.count, 0);
        assert_eq!(estimate.total_distance_km, 0.0);
        assert_eq!(estimate.cutoff_km, DEFAULT_CUTOFF_KM);
    }

    #[test]
    fn test_country_split_combines_associatively() {
        let a = CountrySplit { domestic: 1, international: 2 };
        let b = CountrySplit { domestic: 3, international: 0 };
        let c = CountrySplit { domestic: 0, international: 4 };
        assert_eq!(a.combine(b).combine(c), a.combine(b.combine(c)));
        assert_eq!(a.combine(b).total(), 6);
    }
}
