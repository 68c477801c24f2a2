use anyhow::Result;
use serde::Serialize;

use crate::db::Database;

/// Database-wide figures printed once at startup.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSummary {
    pub stations: i64,
    pub stops: i64,
    pub ride_entries: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub total_riders: i64,
}

impl DatabaseSummary {
    #[tracing::instrument(skip(db))]
    pub fn from_db(db: &Database) -> Result<Self> {
        Ok(DatabaseSummary {
            stations: db.station_count()?,
            stops: db.stop_count()?,
            ride_entries: db.ride_entry_count()?,
            first_date: db.first_ride_date()?,
            last_date: db.last_ride_date()?,
            total_riders: db.total_riders()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::fixture_db;

    #[test]
    fn test_summary_from_fixture() {
        let summary = DatabaseSummary::from_db(&fixture_db()).unwrap();

        assert_eq!(summary.stations, 2);
        assert_eq!(summary.stops, 2);
        assert_eq!(summary.ride_entries, 3);
        assert_eq!(summary.first_date.as_deref(), Some("2020-01-02"));
        assert_eq!(summary.last_date.as_deref(), Some("2021-01-03"));
        assert_eq!(summary.total_riders, 450);
    }

    #[test]
    fn test_default_summary_is_empty() {
        let summary = DatabaseSummary::default();
        assert_eq!(summary.stations, 0);
        assert!(summary.first_date.is_none());
    }
}
