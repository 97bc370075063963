// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Distances between airports.
//!
//! Every failure mode resolves to `0.0` km: a missing coordinate, one outside
//! lat [-90, 90] / lon [-180, 180], a non-finite value, or a non-finite
//! result from the formula. A bad row therefore reads as "same point" in
//! every aggregate.

use geo::{Distance, Geodesic, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Which surface distances are measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EarthModel {
    /// Geodesic on the WGS84 ellipsoid (Karney's algorithm).
    #[default]
    Wgs84,
    /// Great circle on a sphere of mean radius 6371.0088 km.
    Sphere,
}

impl EarthModel {
    /// Distance in kilometres. See the module docs for the failure policy.
    pub fn distance_km(
        &self,
        lat1: Option<f64>,
        lon1: Option<f64>,
        lat2: Option<f64>,
        lon2: Option<f64>,
    ) -> f64 {
        let (Some(a), Some(b)) = (valid_point(lat1, lon1), valid_point(lat2, lon2)) else {
            return 0.0;
        };
        if a == b {
            return 0.0;
        }

        // Always measure from the lower point so swapping the arguments
        // gives a bit-identical result.
        let (from, to) = if order_key(&a) <= order_key(&b) {
            (a, b)
        } else {
            (b, a)
        };

        let meters = match self {
            EarthModel::Wgs84 => Geodesic.distance(from, to),
            EarthModel::Sphere => Haversine.distance(from, to),
        };
        let km = meters / 1000.0;
        if km.is_finite() && km >= 0.0 {
            km
        } else {
            0.0
        }
    }
}

/// WGS84 geodesic distance in kilometres, `0.0` on any invalid input.
pub fn distance(lat1: Option<f64>, lon1: Option<f64>, lat2: Option<f64>, lon2: Option<f64>) -> f64 {
    EarthModel::Wgs84.distance_km(lat1, lon1, lat2, lon2)
}

pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub fn is_valid_longitude(lon: f64) -> bool {
    lon.is_finite() && (-180.0..=180.0).contains(&lon)
}

fn valid_point(lat: Option<f64>, lon: Option<f64>) -> Option<Point<f64>> {
    let (lat, lon) = (lat?, lon?);
    if is_valid_latitude(lat) && is_valid_longitude(lon) {
        // geo points are (x = lon, y = lat)
        Some(Point::new(lon, lat))
    } else {
        None
    }
}

fn order_key(p: &Point<f64>) -> (u64, u64) {
    (total_key(p.y()), total_key(p.x()))
}

// Maps an f64 to an integer with the same ordering (total order, -0.0 < 0.0).
fn total_key(v: f64) -> u64 {
    let bits = v.to_bits();
    if bits >> 63 == 1 {
        !bits
    } else {
        bits | (1 << 63)
    }
}
