//! System-wide reports: weekday ranking and stop distribution.

use anyhow::Result;

use crate::db::Database;
use crate::reports::types::{
    LineDirectionShare, Report, Share, StationShare, StopDistribution, WeekdayRanking,
};
use crate::reports::utility::share;

/// Weekday ridership per station, largest first, with each station's share
/// of all weekday riders.
#[tracing::instrument(skip(db))]
pub fn weekday_ranking(db: &Database) -> Result<Report<WeekdayRanking>> {
    let rows = db.weekday_totals_by_station()?;
    if rows.is_empty() {
        return Ok(Report::NotFound);
    }

    let total: i64 = rows.iter().map(|r| r.riders).sum();
    let stations = rows
        .into_iter()
        .map(|row| StationShare {
            share: Share {
                riders: row.riders,
                fraction: share(row.riders, total),
            },
            station: row.key,
        })
        .collect();

    Ok(Report::Ok(WeekdayRanking { stations, total }))
}

/// Stop counts per line color and direction as a share of every stop in the system.
///
/// The denominator is counted separately from the grouped rows, since a stop
/// served by several lines appears in more than one group.
#[tracing::instrument(skip(db))]
pub fn stop_distribution(db: &Database) -> Result<Report<StopDistribution>> {
    let rows = db.stop_counts_by_line_direction()?;
    if rows.is_empty() {
        return Ok(Report::NotFound);
    }
    let total_stops = db.stop_count()?;

    let groups = rows
        .into_iter()
        .map(|row| LineDirectionShare {
            fraction: share(row.stops, total_stops),
            color: row.color,
            direction: row.direction,
            stops: row.stops,
        })
        .collect();

    Ok(Report::Ok(StopDistribution {
        groups,
        total_stops,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::fixture_db;

    #[test]
    fn test_weekday_ranking_orders_by_total() {
        let db = fixture_db();
        let Report::Ok(ranking) = weekday_ranking(&db).unwrap() else {
            panic!("expected ranking");
        };
        assert_eq!(ranking.total, 400);
        assert_eq!(ranking.stations[0].station, "Clinton");
        assert_eq!(ranking.stations[0].share.fraction, 0.75);
        assert_eq!(ranking.stations[1].share.fraction, 0.25);
    }

    #[test]
    fn test_stop_distribution_uses_total_stop_count() {
        let db = fixture_db();
        let Report::Ok(dist) = stop_distribution(&db).unwrap() else {
            panic!("expected distribution");
        };
        assert_eq!(dist.total_stops, 2);
        assert_eq!(dist.groups.len(), 2);
        assert!(dist.groups.iter().all(|g| g.fraction == 0.5));
    }
}
