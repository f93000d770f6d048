#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial helpers for district analysis.
//!
//! Great-circle distance between coordinates and the mean position of a set
//! of case coordinates. Inputs are WGS84 degrees and are not range-checked.

use geo::{Centroid, MultiPoint, Point};
use outbreak_map_district_models::Coordinate;

/// Earth radius used for all distance calculations, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in kilometres.
#[must_use]
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// [`distance_km`] between two [`Coordinate`]s.
#[must_use]
pub fn coordinate_distance_km(from: Coordinate, to: Coordinate) -> f64 {
    distance_km(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Arithmetic mean of a set of coordinates, or `None` when empty.
#[must_use]
pub fn mean_position(coordinates: &[Coordinate]) -> Option<Coordinate> {
    let points: MultiPoint<f64> = coordinates
        .iter()
        .map(|c| Point::new(c.longitude, c.latitude))
        .collect();

    points
        .centroid()
        .map(|centroid| Coordinate::new(centroid.y(), centroid.x()))
}
