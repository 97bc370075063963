// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use airnet_core::merge::{merge, FlightRecordTable};
use airnet_core::metrics::{
    airport_flight_counts, airports_in_country, country_breakdown, country_flight_counts,
    distance_histogram, model_frequencies, outgoing_counts, outgoing_counts_in,
    short_haul_estimate, top_models, CountrySplit, FlightScope, DEFAULT_CUTOFF_KM,
};
use airnet_core::tables::{Airline, AirplaneModel, Airport, ReferenceTables, Route};

// --- Fixture ---
//
// A small slice of the French network:
//   0  CDG -> NCE  AF   320        domestic, ~694 km
//   1  NCE -> CDG  AF   320 321    domestic, ~694 km
//   2  CDG -> ORY  AF   319        domestic, ~34 km
//   3  ORY -> CDG  ??   -          domestic, unknown airline
//   4  CDG -> JFK  AF   388        international
//   5  CDG -> LHR  BA   320        international
//   6  CDG -> 9999                 dropped
//   7  LHR -> CDG  BA   320        international
//   8  CDG -> XXX  AF   CRJ        domestic, XXX has no coordinates
//   9  CDG -> NCE  U2   319        domestic, airline by code only

fn make_airport(id: i64, iata: &str, country: &str, coords: Option<(f64, f64)>) -> Airport {
    Airport {
        id,
        name: format!("{} Airport", iata),
        city: None,
        country: Some(country.to_string()),
        iata: Some(iata.to_string()),
        icao: None,
        lat: coords.map(|c| c.0),
        lon: coords.map(|c| c.1),
    }
}

fn make_model(name: &str, iata: &str, icao: &str) -> AirplaneModel {
    AirplaneModel {
        name: name.to_string(),
        iata_code: Some(iata.to_string()),
        icao_code: Some(icao.to_string()),
    }
}

fn make_route(airline_id: Option<i64>, source_id: i64, destination_id: i64, equipment: &str) -> Route {
    Route {
        airline_id,
        source_id: Some(source_id),
        destination_id: Some(destination_id),
        equipment: equipment.split_whitespace().map(str::to_string).collect(),
        ..Route::default()
    }
}

fn french_network() -> FlightRecordTable {
    let airlines = vec![
        Airline {
            id: 137,
            name: "Air France".to_string(),
            iata: Some("AF".to_string()),
            icao: Some("AFR".to_string()),
            country: Some("France".to_string()),
        },
        Airline {
            id: 1355,
            name: "British Airways".to_string(),
            iata: Some("BA".to_string()),
            icao: Some("BAW".to_string()),
            country: Some("United Kingdom".to_string()),
        },
        Airline {
            id: 2297,
            name: "easyJet".to_string(),
            iata: Some("U2".to_string()),
            icao: Some("EZY".to_string()),
            country: Some("United Kingdom".to_string()),
        },
    ];
    let airplanes = vec![
        make_model("Airbus A319", "319", "A319"),
        make_model("Airbus A320", "320", "A320"),
        make_model("Airbus A321", "321", "A321"),
        make_model("Airbus A380-800", "388", "A388"),
    ];
    let airports = vec![
        make_airport(1, "CDG", "France", Some((49.0097, 2.5479))),
        make_airport(2, "ORY", "France", Some((48.7233, 2.3794))),
        make_airport(3, "NCE", "France", Some((43.6584, 7.2159))),
        make_airport(4, "JFK", "United States", Some((40.6413, -73.7781))),
        make_airport(5, "LHR", "United Kingdom", Some((51.4700, -0.4543))),
        make_airport(6, "XXX", "France", None),
    ];
    let mut by_code = Route {
        airline_code: Some("U2".to_string()),
        ..make_route(None, 1, 3, "319")
    };
    by_code.stops = Some(0);

    let routes = vec![
        make_route(Some(137), 1, 3, "320"),
        make_route(Some(137), 3, 1, "320 321"),
        make_route(Some(137), 1, 2, "319"),
        make_route(Some(9999), 2, 1, ""),
        make_route(Some(137), 1, 4, "388"),
        make_route(Some(1355), 1, 5, "320"),
        make_route(Some(137), 1, 9999, "320"),
        make_route(Some(1355), 5, 1, "320"),
        make_route(Some(137), 1, 6, "CRJ"),
        by_code,
    ];

    merge(&ReferenceTables {
        airlines,
        airplanes,
        airports,
        routes,
    })
}

fn pairs(items: &[(&str, usize)]) -> Vec<(String, usize)> {
    items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// --- Merge sanity ---

#[test]
fn test_fixture_merges_as_expected() {
    let table = french_network();
    assert_eq!(table.len(), 9);
    assert_eq!(table.stats().unresolved_airport, 1);
    assert_eq!(table.stats().unknown_airline, 1);
    assert_eq!(table.records()[8].airline_name(), "easyJet");
    assert_eq!(table.records()[8].stops, Some(0));
}

// --- Outgoing counts ---

#[test]
fn test_outgoing_counts_rank_by_count_then_code() {
    let table = french_network();
    let top = outgoing_counts(&table, "CDG", 3);
    assert_eq!(top, pairs(&[("NCE", 2), ("JFK", 1), ("LHR", 1)]));

    let all = outgoing_counts(&table, "cdg", 100);
    assert_eq!(all.len(), 5);
    assert_eq!(all.iter().map(|(_, n)| n).sum::<usize>(), 6);
}

#[test]
fn test_outgoing_counts_accept_airport_id() {
    let table = french_network();
    assert_eq!(outgoing_counts(&table, "1", 1), outgoing_counts(&table, "CDG", 1));
}

#[test]
fn test_outgoing_counts_for_unknown_airport_are_empty() {
    let table = french_network();
    assert!(outgoing_counts(&table, "ZZZ", 5).is_empty());
    assert!(outgoing_counts(&table, "XXX", 5).is_empty());
    assert!(outgoing_counts(&table, "CDG", 0).is_empty());
}

#[test]
fn test_outgoing_counts_respect_scope() {
    let table = french_network();
    let domestic = outgoing_counts_in(&table, "CDG", 10, FlightScope::Domestic);
    assert_eq!(domestic, pairs(&[("NCE", 2), ("ORY", 1), ("XXX", 1)]));

    let international = outgoing_counts_in(&table, "CDG", 10, FlightScope::International);
    assert_eq!(international, pairs(&[("JFK", 1), ("LHR", 1)]));
}

// --- Country counts ---

#[test]
fn test_country_flight_counts() {
    let table = french_network();
    assert_eq!(country_flight_counts(&table, "France", FlightScope::All), 8);
    assert_eq!(country_flight_counts(&table, "france", FlightScope::Domestic), 6);
    assert_eq!(country_flight_counts(&table, "France", FlightScope::International), 2);
    assert_eq!(country_flight_counts(&table, "United Kingdom", FlightScope::Domestic), 0);
    assert_eq!(country_flight_counts(&table, "Germany", FlightScope::All), 0);
}

#[test]
fn test_domestic_count_equals_sum_over_country_airports() {
    let table = french_network();
    let expected = country_flight_counts(&table, "France", FlightScope::Domestic);

    let summed: usize = airports_in_country(&table, "France")
        .iter()
        .flat_map(|code| outgoing_counts_in(&table, code, usize::MAX, FlightScope::Domestic))
        .map(|(_, n)| n)
        .sum();
    assert_eq!(summed, expected);
}

#[test]
fn test_airports_in_country_lists_departure_airports() {
    let table = french_network();
    assert_eq!(airports_in_country(&table, "France"), vec!["CDG", "NCE", "ORY"]);
    assert!(airports_in_country(&table, "Germany").is_empty());
}

#[test]
fn test_airport_flight_counts_busiest_first() {
    let table = french_network();
    let counts = airport_flight_counts(&table, FlightScope::All);
    let summary: Vec<(&str, usize)> = counts
        .iter()
        .map(|c| (c.airport.as_str(), c.flights))
        .collect();
    assert_eq!(summary, vec![("CDG", 6), ("LHR", 1), ("NCE", 1), ("ORY", 1)]);
    assert_eq!(counts[0].country.as_deref(), Some("France"));
}

#[test]
fn test_country_breakdown() {
    let table = french_network();
    let breakdown = country_breakdown(&table);

    assert_eq!(breakdown.len(), 2);
    assert_eq!(
        breakdown["France"],
        CountrySplit {
            domestic: 6,
            international: 2
        }
    );
    assert_eq!(
        breakdown["United Kingdom"],
        CountrySplit {
            domestic: 0,
            international: 1
        }
    );
    assert_eq!(breakdown.values().map(|s| s.total()).sum::<usize>(), table.len());
}

// --- Models ---

#[test]
fn test_model_frequencies_fan_out_over_equipment() {
    let table = french_network();
    let freq = model_frequencies(&table, &[]);

    assert_eq!(freq["Airbus A320"], 4);
    assert_eq!(freq["Airbus A319"], 2);
    assert_eq!(freq["Airbus A321"], 1);
    assert_eq!(freq["Airbus A380-800"], 1);
    assert_eq!(freq["CRJ"], 1);
    assert_eq!(freq.len(), 5);
}

#[test]
fn test_model_frequencies_filter_by_country() {
    let table = french_network();
    let uk = model_frequencies(&table, &["United Kingdom"]);
    assert_eq!(uk.into_iter().collect::<Vec<_>>(), pairs(&[("Airbus A320", 1)]));

    assert!(model_frequencies(&table, &["Germany"]).is_empty());

    let both = model_frequencies(&table, &["France", "United Kingdom"]);
    assert_eq!(both, model_frequencies(&table, &[]));
}

#[test]
fn test_top_models() {
    let table = french_network();
    assert_eq!(
        top_models(&table, 2, &[]),
        pairs(&[("Airbus A320", 4), ("Airbus A319", 2)])
    );
    // Ties at one flight resolve alphabetically
    assert_eq!(
        top_models(&table, 4, &["France"]),
        pairs(&[
            ("Airbus A320", 3),
            ("Airbus A319", 2),
            ("Airbus A321", 1),
            ("Airbus A380-800", 1)
        ])
    );
}

// --- Short haul ---

#[test]
fn test_short_haul_estimate_default_cutoff() {
    let table = french_network();
    let estimate = short_haul_estimate(&table, Some("France"), DEFAULT_CUTOFF_KM);

    let cdg_ory = table.records()[2].distance_km;
    assert!((cdg_ory - 34.1).abs() < 0.5, "{}", cdg_ory);

    assert_eq!(estimate.domestic_flights, 6);
    // CDG-ORY both ways plus the zero-distance CDG-XXX
    assert_eq!(estimate.count, 3);
    assert_eq!(estimate.long_haul_count, 3);
    assert!((estimate.total_distance_km - 2.0 * cdg_ory).abs() < 1e-9);
    assert_eq!(estimate.distinct_routes, 2);
    assert!((estimate.distinct_distance_km - cdg_ory).abs() < 1e-9);
}

#[test]
fn test_short_haul_count_matches_definition() {
    let table = french_network();
    for cutoff in [0.0, 10.0, 100.0, 500.0, 1000.0] {
        let estimate = short_haul_estimate(&table, None, cutoff);
        let expected = table
            .iter()
            .filter(|r| r.is_domestic() && r.distance_km <= cutoff)
            .count();
        assert_eq!(estimate.count, expected, "cutoff {}", cutoff);
        assert_eq!(estimate.count + estimate.long_haul_count, estimate.domestic_flights);
    }
}

#[test]
fn test_short_haul_count_grows_with_cutoff() {
    let table = french_network();
    let mut previous = 0;
    for cutoff in [0.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 20_000.0] {
        let count = short_haul_estimate(&table, None, cutoff).count;
        assert!(count >= previous, "cutoff {} gave {} < {}", cutoff, count, previous);
        previous = count;
    }
    assert_eq!(short_haul_estimate(&table, None, 0.0).count, 1);
    assert_eq!(short_haul_estimate(&table, None, 1000.0).count, 6);
}

#[test]
fn test_short_haul_for_country_without_domestic_flights() {
    let table = french_network();
    let estimate = short_haul_estimate(&table, Some("United Kingdom"), DEFAULT_CUTOFF_KM);
    assert_eq!(estimate.domestic_flights, 0);
    assert_eq!(estimate.count, 0);
    assert_eq!(estimate.total_distance_km, 0.0);
}

// --- Histogram ---

#[test]
fn test_distance_histogram_covers_every_record() {
    let table = french_network();
    let histogram = distance_histogram(&table, 10);

    assert_eq!(histogram.len(), 10);
    assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), table.len());
    assert_eq!(histogram[0].lower_km, 0.0);

    let longest = table.iter().map(|r| r.distance_km).fold(0.0, f64::max);
    assert!((histogram[9].upper_km - longest).abs() < 1e-6);
    // CDG-JFK is the only transatlantic flight
    assert_eq!(histogram[9].count, 1);
}

#[test]
fn test_distance_histogram_with_no_bins() {
    assert!(distance_histogram(&french_network(), 0).is_empty());
}
