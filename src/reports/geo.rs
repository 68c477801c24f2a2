//! Proximity search around a coordinate in the Chicago area.

use anyhow::Result;
use std::ops::RangeInclusive;

use crate::db::Database;
use crate::reports::types::{BoundingBox, Coordinate, LocatedStation, NearbyStations, Report};
use crate::reports::utility::round_to;

pub const LATITUDE_RANGE: RangeInclusive<f64> = 40.0..=43.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -88.0..=-87.0;

/// Degrees of latitude per mile.
pub const LAT_DEGREES_PER_MILE: f64 = 1.0 / 69.0;
/// Degrees of longitude per mile at Chicago's latitude.
pub const LON_DEGREES_PER_MILE: f64 = 1.0 / 51.0;

const BOUND_DECIMALS: i32 = 3;

/// `Some(OutOfRange)` if `latitude` lies outside the service area.
pub fn check_latitude<T>(latitude: f64) -> Option<Report<T>> {
    check(Coordinate::Latitude, latitude, &LATITUDE_RANGE)
}

/// `Some(OutOfRange)` if `longitude` lies outside the service area.
pub fn check_longitude<T>(longitude: f64) -> Option<Report<T>> {
    check(Coordinate::Longitude, longitude, &LONGITUDE_RANGE)
}

fn check<T>(coordinate: Coordinate, value: f64, range: &RangeInclusive<f64>) -> Option<Report<T>> {
    if range.contains(&value) {
        None
    } else {
        Some(Report::OutOfRange { coordinate, value })
    }
}

impl BoundingBox {
    /// The box one mile out from the point in each direction, bounds rounded
    /// to three decimals.
    pub fn around(latitude: f64, longitude: f64) -> Self {
        BoundingBox {
            min_lat: round_to(latitude - LAT_DEGREES_PER_MILE, BOUND_DECIMALS),
            max_lat: round_to(latitude + LAT_DEGREES_PER_MILE, BOUND_DECIMALS),
            min_lon: round_to(longitude - LON_DEGREES_PER_MILE, BOUND_DECIMALS),
            max_lon: round_to(longitude + LON_DEGREES_PER_MILE, BOUND_DECIMALS),
        }
    }
}

/// Stations with a stop within about a mile of the point, ascending by name.
///
/// Coordinates are validated before the database is touched.
#[tracing::instrument(skip(db))]
pub fn nearby_stations(db: &Database, latitude: f64, longitude: f64) -> Result<Report<NearbyStations>> {
    if let Some(rejected) = check_latitude(latitude).or_else(|| check_longitude(longitude)) {
        return Ok(rejected);
    }

    let bounds = BoundingBox::around(latitude, longitude);
    let stations: Vec<LocatedStation> = db
        .stations_within(bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon)?
        .into_iter()
        .map(LocatedStation::from)
        .collect();

    if stations.is_empty() {
        return Ok(Report::NotFound);
    }

    Ok(Report::Ok(NearbyStations {
        latitude,
        longitude,
        bounds,
        stations,
    }))
}
