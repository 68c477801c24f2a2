//! Data types produced by the report functions.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{LocatedStationRow, StationRow};
use crate::reports::utility::head_tail;

/// Outcome of a report. Only `Ok` carries data for the formatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Report<T> {
    Ok(T),
    /// The name or color matched nothing.
    NotFound,
    /// A pattern that must name one station matched none.
    StationNotFound,
    /// A pattern that must name one station matched several.
    Ambiguous { matches: usize },
    /// The line exists but has no stops in the requested direction.
    DirectionNotServed { color: String, direction: String },
    /// A coordinate was rejected before any query ran.
    OutOfRange { coordinate: Coordinate, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coordinate {
    Latitude,
    Longitude,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Station {
            id: row.id,
            name: row.name,
        }
    }
}

/// Riders and their fraction (0.0–1.0) of some total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Share {
    pub riders: i64,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTypeSplit {
    pub station: String,
    pub weekday: Share,
    pub saturday: Share,
    pub sunday_holiday: Share,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationShare {
    pub station: String,
    pub share: Share,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayRanking {
    pub stations: Vec<StationShare>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineStop {
    pub name: String,
    pub accessible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineStops {
    pub color: String,
    pub direction: String,
    pub stops: Vec<LineStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDirectionShare {
    pub color: String,
    pub direction: String,
    pub stops: i64,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopDistribution {
    pub groups: Vec<LineDirectionShare>,
    /// Independent count of every stop in the system.
    pub total_stops: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub riders: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyTrend {
    pub station: Station,
    pub years: Vec<YearTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub riders: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    pub station: Station,
    pub year: String,
    pub months: Vec<MonthTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyRiders {
    pub date: NaiveDate,
    pub riders: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationDays {
    pub station: Station,
    pub days: Vec<DailyRiders>,
}

/// Number of rows shown from each end of a daily series.
pub const DAILY_PREVIEW_ROWS: usize = 5;

impl StationDays {
    /// The first and last few days, each at most once, in chronological order.
    pub fn preview(&self) -> Vec<&DailyRiders> {
        head_tail(&self.days, DAILY_PREVIEW_ROWS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyComparison {
    pub year: String,
    pub first: StationDays,
    pub second: StationDays,
}

/// Rectangle approximating a one-mile radius around a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocatedStationRow> for LocatedStation {
    fn from(row: LocatedStationRow) -> Self {
        LocatedStation {
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyStations {
    pub latitude: f64,
    pub longitude: f64,
    pub bounds: BoundingBox,
    pub stations: Vec<LocatedStation>,
}
