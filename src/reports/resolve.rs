use anyhow::Result;
use tracing::debug;

use crate::db::Database;
use crate::reports::types::{Report, Station};

/// Result of resolving a name pattern to a single station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationMatch {
    NotFound,
    Ambiguous(usize),
    Resolved(Station),
}

impl StationMatch {
    pub fn into_report(self) -> Report<Station> {
        match self.station() {
            Ok(station) => Report::Ok(station),
            Err(report) => report,
        }
    }

    /// The resolved station, or the outcome to report instead.
    pub fn station<T>(self) -> Result<Station, Report<T>> {
        match self {
            StationMatch::NotFound => Err(Report::StationNotFound),
            StationMatch::Ambiguous(matches) => Err(Report::Ambiguous { matches }),
            StationMatch::Resolved(station) => Ok(station),
        }
    }
}

/// Resolves a `LIKE` pattern that must name exactly one station.
pub fn resolve_station(db: &Database, pattern: &str) -> Result<StationMatch> {
    let mut rows = db.stations_like(pattern)?;
    let resolved = match rows.len() {
        0 => StationMatch::NotFound,
        1 => StationMatch::Resolved(rows.remove(0).into()),
        n => StationMatch::Ambiguous(n),
    };
    debug!(pattern, ?resolved, "Station resolved");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::fixture_db;

    #[test]
    fn test_resolve_unique() {
        let db = fixture_db();
        let m = resolve_station(&db, "clark%").unwrap();
        assert_eq!(
            m,
            StationMatch::Resolved(Station {
                id: 1,
                name: "Clark/Lake".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_ambiguous_is_not_first_match() {
        let db = fixture_db();
        assert_eq!(resolve_station(&db, "Cl%").unwrap(), StationMatch::Ambiguous(2));
    }

    #[test]
    fn test_resolve_not_found() {
        let db = fixture_db();
        let m = resolve_station(&db, "Howard").unwrap();
        assert_eq!(m.into_report(), Report::StationNotFound);
    }
}
