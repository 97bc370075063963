// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::tables::{AirplaneModel, Airport};
use rand::seq::SliceRandom;

pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a, T> {
    Found(&'a T),
    /// `recommendations` is a random sample, only filled when nothing was
    /// close enough to suggest.
    NotFound {
        close_matches: Vec<String>,
        recommendations: Vec<String>,
    },
}

impl<'a, T> Lookup<'a, T> {
    pub fn found(&self) -> Option<&'a T> {
        match self {
            Lookup::Found(item) => Some(*item),
            Lookup::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

fn same(a: Option<&str>, query: &str) -> bool {
    a.is_some_and(|a| a.eq_ignore_ascii_case(query))
}

/// Looks an airplane model up by name, or by its IATA/ICAO code.
pub fn aircraft_info<'a>(models: &'a [AirplaneModel], name: &str) -> Lookup<'a, AirplaneModel> {
    let query = name.trim();
    let hit = models
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(query))
        .or_else(|| {
            models.iter().find(|m| {
                same(m.iata_code.as_deref(), query) || same(m.icao_code.as_deref(), query)
            })
        });

    match hit {
        Some(model) => Lookup::Found(model),
        None => not_found(query, models.iter().map(|m| m.name.as_str())),
    }
}

/// Looks an airport up by name, or by its IATA/ICAO code.
pub fn airport_info<'a>(airports: &'a [Airport], name: &str) -> Lookup<'a, Airport> {
    let query = name.trim();
    let hit = airports
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(query))
        .or_else(|| {
            airports
                .iter()
                .find(|a| same(a.iata.as_deref(), query) || same(a.icao.as_deref(), query))
        });

    match hit {
        Some(airport) => Lookup::Found(airport),
        None => not_found(query, airports.iter().map(|a| a.name.as_str())),
    }
}

pub fn aircraft_models(models: &[AirplaneModel]) -> Vec<&str> {
    models.iter().map(|m| m.name.as_str()).collect()
}

fn not_found<'a, T>(query: &str, names: impl Iterator<Item = &'a str> + Clone) -> Lookup<'a, T> {
    let close_matches = close_matches(query, names.clone());
    let recommendations = if close_matches.is_empty() {
        let mut pool: Vec<&str> = names.collect();
        pool.sort_unstable();
        pool.dedup();
        pool.choose_multiple(&mut rand::thread_rng(), MAX_SUGGESTIONS)
            .map(|s| s.to_string())
            .collect()
    } else {
        Vec::new()
    };

    Lookup::NotFound {
        close_matches,
        recommendations,
    }
}

// Scoring:
// 90 = exact name (case-insensitive)
// 80 = name starts with query
// 60 = name contains query
// 50 = every query token appears in the name
// 40 = query contains the whole name
// 0  = no match
fn match_score(query_lower: &str, candidate: &str) -> u8 {
    let name = candidate.to_lowercase();
    if query_lower.is_empty() {
        return 0;
    }
    if name == query_lower {
        90
    } else if name.starts_with(query_lower) {
        80
    } else if name.contains(query_lower) {
        60
    } else {
        let tokens: Vec<&str> = query_lower.split_whitespace().collect();
        if !tokens.is_empty() && tokens.iter().all(|t| name.contains(t)) {
            50
        } else if !name.is_empty() && query_lower.contains(&name) {
            40
        } else {
            0
        }
    }
}

fn close_matches<'a>(query: &str, names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut scored: Vec<(u8, &str)> = names
        .map(|n| (match_score(&query_lower, n), n))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);

    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, n)| n.to_string())
        .collect()
}
