// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use airnet_core::config::EmissionFactors;
use airnet_core::lookup::Lookup;
use airnet_core::metrics::{CountrySplit, HistogramBin};
use airnet_core::{FlightNetwork, ShortHaulEstimate};
use std::collections::BTreeMap;

/// CO2 for the short-haul distance, flown versus taken by train.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Savings {
    pub flight_kg: f64,
    pub train_kg: f64,
    pub reduction_kg: f64,
}

impl Co2Savings {
    pub fn new(distance_km: f64, factors: &EmissionFactors) -> Self {
        let flight_g = distance_km * factors.flight_grams_per_km;
        let train_g = if factors.train_ratio > 0.0 {
            flight_g / factors.train_ratio
        } else {
            flight_g
        };
        Self {
            flight_kg: flight_g / 1000.0,
            train_kg: train_g / 1000.0,
            reduction_kg: (flight_g - train_g) / 1000.0,
        }
    }
}

pub fn print_summary(network: &FlightNetwork) {
    let tables = network.tables();
    let stats = network.flight_records().stats();

    println!("Airlines:        {}", tables.airlines.len());
    println!("Airplane models: {}", tables.airplanes.len());
    println!("Airports:        {}", tables.airports.len());
    println!("Routes:          {}", stats.routes_read);
    println!("Flight records:  {}", stats.records);
    println!("  dropped (unknown airport): {}", stats.unresolved_airport);
    println!("  unknown airline:           {}", stats.unknown_airline);
    println!("Earth model:     {:?}", network.earth_model());
}

pub fn print_histogram(bins: &[HistogramBin]) {
    if bins.is_empty() {
        println!("No flights.");
        return;
    }
    let widest = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in bins {
        let bar = "#".repeat(bin.count * 40 / widest);
        println!(
            "{:>8.0} - {:>8.0} km {:>7} {}",
            bin.lower_km, bin.upper_km, bin.count, bar
        );
    }
}

pub fn print_ranking(title: &str, ranking: &[(String, usize)]) {
    println!("{}", title);
    if ranking.is_empty() {
        println!("  (none)");
    }
    for (i, (key, count)) in ranking.iter().enumerate() {
        println!("{:>3}. {:<40} {}", i + 1, key, count);
    }
}

pub fn print_breakdown(breakdown: &BTreeMap<String, CountrySplit>) {
    println!("{:<40} {:>9} {:>13}", "Country", "Domestic", "International");
    for (country, split) in breakdown {
        println!(
            "{:<40} {:>9} {:>13}",
            country, split.domestic, split.international
        );
    }
}

pub fn print_short_haul(label: &str, estimate: &ShortHaulEstimate, factors: &EmissionFactors) {
    let savings = Co2Savings::new(estimate.total_distance_km, factors);
    let distinct = Co2Savings::new(estimate.distinct_distance_km, factors);

    println!("Short-haul flights in {} (<= {} km)", label, estimate.cutoff_km);
    println!("  domestic flights:    {}", estimate.domestic_flights);
    println!("  short-haul:          {}", estimate.count);
    println!("  long-haul:           {}", estimate.long_haul_count);
    println!("  short-haul distance: {:.1} km", estimate.total_distance_km);
    println!(
        "  distinct routes:     {} ({:.1} km)",
        estimate.distinct_routes, estimate.distinct_distance_km
    );
    println!(
        "  CO2 by air {:.1} kg, by train {:.1} kg, potential reduction {:.1} kg",
        savings.flight_kg, savings.train_kg, savings.reduction_kg
    );
    println!(
        "  counting each round trip once: reduction {:.1} kg",
        distinct.reduction_kg
    );
}

/// Prints the suggestions of a failed lookup.
pub fn print_not_found<T>(what: &str, query: &str, lookup: &Lookup<'_, T>) {
    let Lookup::NotFound {
        close_matches,
        recommendations,
    } = lookup
    else {
        return;
    };

    println!("No {} named '{}'.", what, query);
    if !close_matches.is_empty() {
        println!("Did you mean:");
        for name in close_matches {
            println!("  {}", name);
        }
    } else if !recommendations.is_empty() {
        println!("Some you could try:");
        for name in recommendations {
            println!("  {}", name);
        }
    }
}
