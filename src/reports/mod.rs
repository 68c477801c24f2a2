//! Ridership reports.
//!
//! Each report runs one or two queries through [`crate::db::Database`],
//! derives shares, totals or bounds from the rows, and returns a tagged
//! [`Report`]. Nothing here prints; see [`crate::output`] and [`crate::chart`].

pub mod geo;
pub mod lines;
pub mod resolve;
pub mod station;
pub mod system;
pub mod types;
pub mod utility;

pub use geo::nearby_stations;
pub use lines::line_stops;
pub use resolve::{StationMatch, resolve_station};
pub use station::{daily_comparison, day_type_split, monthly_trend, station_lookup, yearly_trend};
pub use system::{stop_distribution, weekday_ranking};
pub use types::Report;
