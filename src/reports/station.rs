//! Reports scoped to one or two stations.

use anyhow::{Context, Result};

use crate::db::{Database, TotalRow};
use crate::reports::resolve::resolve_station;
use crate::reports::types::{
    DailyComparison, DailyRiders, DayTypeSplit, MonthTotal, MonthlyTrend, Report, Share, Station,
    StationDays, YearTotal, YearlyTrend,
};
use crate::reports::utility::share;

const WEEKDAY: &str = "W";
const SATURDAY: &str = "A";
const SUNDAY_HOLIDAY: &str = "U";

/// Every station whose name matches `pattern`, ascending by name.
#[tracing::instrument(skip(db))]
pub fn station_lookup(db: &Database, pattern: &str) -> Result<Report<Vec<Station>>> {
    let stations: Vec<Station> = db
        .stations_like(pattern)?
        .into_iter()
        .map(Station::from)
        .collect();

    if stations.is_empty() {
        return Ok(Report::NotFound);
    }
    Ok(Report::Ok(stations))
}

/// Weekday / Saturday / Sunday-Holiday ridership for an exact station name.
///
/// A day-type with no records counts as zero riders.
#[tracing::instrument(skip(db))]
pub fn day_type_split(db: &Database, station_name: &str) -> Result<Report<DayTypeSplit>> {
    let rows = db.day_type_totals(station_name)?;
    if rows.is_empty() {
        return Ok(Report::NotFound);
    }
    Ok(Report::Ok(split_from_rows(station_name, &rows)))
}

fn split_from_rows(station_name: &str, rows: &[TotalRow]) -> DayTypeSplit {
    let riders_for = |code: &str| -> i64 {
        rows.iter()
            .filter(|r| r.key == code)
            .map(|r| r.riders)
            .sum()
    };

    let weekday = riders_for(WEEKDAY);
    let saturday = riders_for(SATURDAY);
    let sunday_holiday = riders_for(SUNDAY_HOLIDAY);
    let total = weekday + saturday + sunday_holiday;

    let as_share = |riders: i64| Share {
        riders,
        fraction: share(riders, total),
    };

    DayTypeSplit {
        station: station_name.to_string(),
        weekday: as_share(weekday),
        saturday: as_share(saturday),
        sunday_holiday: as_share(sunday_holiday),
        total,
    }
}

/// Ridership per calendar year for the single station named by `pattern`.
#[tracing::instrument(skip(db))]
pub fn yearly_trend(db: &Database, pattern: &str) -> Result<Report<YearlyTrend>> {
    let station = match resolve_station(db, pattern)?.station() {
        Ok(station) => station,
        Err(report) => return Ok(report),
    };
    Ok(Report::Ok(years_for(db, station)?))
}

fn years_for(db: &Database, station: Station) -> Result<YearlyTrend> {
    let years = db
        .yearly_totals(station.id)?
        .into_iter()
        .map(|row| {
            let year = row
                .key
                .parse::<i32>()
                .with_context(|| format!("Unexpected year value {:?}", row.key))?;
            Ok(YearTotal {
                year,
                riders: row.riders,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(YearlyTrend { station, years })
}

/// Ridership per month of `year` for an already resolved station.
#[tracing::instrument(skip(db, station), fields(station = %station.name))]
pub fn monthly_trend(db: &Database, station: Station, year: &str) -> Result<MonthlyTrend> {
    let year = year.trim();
    let months = db
        .monthly_totals(station.id, year)?
        .into_iter()
        .map(|row| {
            let month = row
                .key
                .parse::<u32>()
                .with_context(|| format!("Unexpected month value {:?}", row.key))?;
            Ok(MonthTotal {
                month,
                riders: row.riders,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MonthlyTrend {
        station,
        year: year.to_string(),
        months,
    })
}

/// Daily ridership of two resolved stations over `year`.
#[tracing::instrument(skip(db, first, second), fields(first = %first.name, second = %second.name))]
pub fn daily_comparison(
    db: &Database,
    year: &str,
    first: Station,
    second: Station,
) -> Result<DailyComparison> {
    let year = year.trim();
    Ok(DailyComparison {
        year: year.to_string(),
        first: station_days(db, first, year)?,
        second: station_days(db, second, year)?,
    })
}

fn station_days(db: &Database, station: Station, year: &str) -> Result<StationDays> {
    let days = db
        .daily_ridership(station.id, year)?
        .into_iter()
        .map(|row| DailyRiders {
            date: row.date,
            riders: row.riders,
        })
        .collect();
    Ok(StationDays { station, days })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, riders: i64) -> TotalRow {
        TotalRow {
            key: key.to_string(),
            riders,
        }
    }

    #[test]
    fn test_split_maps_codes_not_positions() {
        let rows = vec![row("A", 200), row("U", 100), row("W", 700)];
        let split = split_from_rows("Clark/Lake", &rows);

        assert_eq!(split.total, 1000);
        assert_eq!(split.weekday.riders, 700);
        assert_eq!(split.saturday.riders, 200);
        assert_eq!(split.sunday_holiday.riders, 100);
        assert_eq!(split.weekday.fraction, 0.7);
    }

    #[test]
    fn test_split_missing_day_type_is_zero() {
        let rows = vec![row("W", 300)];
        let split = split_from_rows("Clinton", &rows);

        assert_eq!(split.total, 300);
        assert_eq!(split.saturday.riders, 0);
        assert_eq!(split.saturday.fraction, 0.0);
        assert_eq!(split.weekday.fraction, 1.0);
    }
}
