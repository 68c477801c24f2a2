//! Read-only access to the CTA ridership database.
//!
//! Every SQL statement the reports need lives here. Report code calls these
//! methods and never executes SQL directly.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags, params};
use std::path::Path;
use tracing::debug;

/// A station row: `(Station_ID, Station_Name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationRow {
    pub id: i64,
    pub name: String,
}

/// Ridership summed under one grouping key (day-type code, year, month, station name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalRow {
    pub key: String,
    pub riders: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRow {
    pub name: String,
    pub ada: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopCountRow {
    pub color: String,
    pub direction: String,
    pub stops: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub riders: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocatedStationRow {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Owns the session's single connection. Dropping it closes the database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database file at `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open database {}", path.display()))?;
        debug!(path = %path.display(), "Database opened");
        Ok(Self { conn })
    }

    /// Wraps an existing connection (used for in-memory fixtures).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn scalar_i64(&self, sql: &str) -> Result<i64> {
        let value: Option<i64> = self
            .conn
            .query_row(sql, [], |row| row.get(0))
            .with_context(|| format!("Query failed: {sql}"))?;
        Ok(value.unwrap_or(0))
    }

    fn scalar_text(&self, sql: &str) -> Result<Option<String>> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .with_context(|| format!("Query failed: {sql}"))
    }

    pub fn station_count(&self) -> Result<i64> {
        self.scalar_i64("SELECT count(*) FROM Stations")
    }

    pub fn stop_count(&self) -> Result<i64> {
        self.scalar_i64("SELECT count(*) FROM Stops")
    }

    pub fn ride_entry_count(&self) -> Result<i64> {
        self.scalar_i64("SELECT count(*) FROM Ridership")
    }

    pub fn total_riders(&self) -> Result<i64> {
        self.scalar_i64("SELECT sum(Num_Riders) FROM Ridership")
    }

    pub fn first_ride_date(&self) -> Result<Option<String>> {
        self.scalar_text("SELECT min(date(Ride_Date)) FROM Ridership")
    }

    pub fn last_ride_date(&self) -> Result<Option<String>> {
        self.scalar_text("SELECT max(date(Ride_Date)) FROM Ridership")
    }

    /// Stations whose name matches a `LIKE` pattern, ascending by name.
    pub fn stations_like(&self, pattern: &str) -> Result<Vec<StationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT Station_ID, Station_Name FROM Stations
             WHERE Station_Name LIKE ?1
             ORDER BY Station_Name ASC",
        )?;
        let rows = stmt
            .query_map(params![pattern], |row| {
                Ok(StationRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(pattern, rows = rows.len(), "stations_like");
        Ok(rows)
    }

    /// Ridership per day-type code for an exact station name, ascending by code.
    pub fn day_type_totals(&self, station_name: &str) -> Result<Vec<TotalRow>> {
        self.totals(
            "SELECT Type_Of_Day, sum(Num_Riders) FROM Ridership
             JOIN Stations ON Stations.Station_ID = Ridership.Station_ID
             WHERE Station_Name = ?1
             GROUP BY Type_Of_Day
             ORDER BY Type_Of_Day ASC",
            params![station_name],
        )
    }

    /// Weekday ridership per station, descending by total.
    pub fn weekday_totals_by_station(&self) -> Result<Vec<TotalRow>> {
        self.totals(
            "SELECT Station_Name, sum(Num_Riders) FROM Ridership
             JOIN Stations ON Ridership.Station_ID = Stations.Station_ID
             WHERE Type_Of_Day = 'W'
             GROUP BY Ridership.Station_ID
             ORDER BY sum(Num_Riders) DESC, Station_Name ASC",
            params![],
        )
    }

    /// Yearly ridership for one station, ascending by year.
    pub fn yearly_totals(&self, station_id: i64) -> Result<Vec<TotalRow>> {
        self.totals(
            "SELECT strftime('%Y', Ride_Date) AS Year, sum(Num_Riders) FROM Ridership
             WHERE Station_ID = ?1
             GROUP BY Year
             ORDER BY Year ASC",
            params![station_id],
        )
    }

    /// Monthly ridership for one station within a year, ascending by month.
    pub fn monthly_totals(&self, station_id: i64, year: &str) -> Result<Vec<TotalRow>> {
        self.totals(
            "SELECT strftime('%m', Ride_Date) AS Month, sum(Num_Riders) FROM Ridership
             WHERE Station_ID = ?1 AND strftime('%Y', Ride_Date) = ?2
             GROUP BY Month
             ORDER BY Month ASC",
            params![station_id, year],
        )
    }

    fn totals(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<TotalRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok(TotalRow {
                    key: row.get(0)?,
                    riders: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(rows = rows.len(), "totals query");
        Ok(rows)
    }

    /// Line ids whose color matches case-insensitively.
    pub fn lines_by_color(&self, color: &str) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT Line_ID FROM Lines WHERE lower(Color) = lower(?1)")?;
        let rows = stmt
            .query_map(params![color], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
    }

    /// Stops served by a line color in one direction, ascending by stop name.
    pub fn stops_for_line(&self, color: &str, direction: &str) -> Result<Vec<StopRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT Stop_Name, ADA FROM Lines
             JOIN StopDetails ON Lines.Line_ID = StopDetails.Line_ID
             JOIN Stops ON StopDetails.Stop_ID = Stops.Stop_ID
             WHERE lower(Color) = lower(?1) AND Direction = ?2
             ORDER BY Stop_Name ASC",
        )?;
        let rows = stmt
            .query_map(params![color, direction], |row| {
                Ok(StopRow {
                    name: row.get(0)?,
                    ada: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(color, direction, rows = rows.len(), "stops_for_line");
        Ok(rows)
    }

    /// Stop counts per (color, direction), ascending by color then direction.
    pub fn stop_counts_by_line_direction(&self) -> Result<Vec<StopCountRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT Color, Direction, count(Stops.Stop_ID) FROM Lines
             JOIN StopDetails ON Lines.Line_ID = StopDetails.Line_ID
             JOIN Stops ON StopDetails.Stop_ID = Stops.Stop_ID
             GROUP BY Color, Direction
             ORDER BY Color ASC, Direction ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StopCountRow {
                    color: row.get(0)?,
                    direction: row.get(1)?,
                    stops: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Daily ridership for one station within a year, chronological.
    pub fn daily_ridership(&self, station_id: i64, year: &str) -> Result<Vec<DailyRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT date(Ride_Date), Num_Riders FROM Ridership
             WHERE Station_ID = ?1 AND strftime('%Y', Ride_Date) = ?2
             ORDER BY Ride_Date ASC",
        )?;
        let raw = stmt
            .query_map(params![station_id, year], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut rows = Vec::with_capacity(raw.len());
        for (date, riders) in raw {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Malformed ride date {date}"))?;
            rows.push(DailyRow { date, riders });
        }
        debug!(station_id, year, rows = rows.len(), "daily_ridership");
        Ok(rows)
    }

    /// Distinct stations with a stop inside the given box, ascending by name.
    pub fn stations_within(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Result<Vec<LocatedStationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT Station_Name, Latitude, Longitude FROM Stations
             JOIN Stops ON Stations.Station_ID = Stops.Station_ID
             WHERE Latitude >= ?1 AND Latitude <= ?2
               AND Longitude >= ?3 AND Longitude <= ?4
             ORDER BY Station_Name ASC",
        )?;
        let rows = stmt
            .query_map(params![min_lat, max_lat, min_lon, max_lon], |row| {
                Ok(LocatedStationRow {
                    name: row.get(0)?,
                    latitude: row.get(1)?,
                    longitude: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(rows = rows.len(), "stations_within");
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A tiny in-memory database with the production schema.
    pub(crate) fn fixture_db() -> Database {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Stations (Station_ID INTEGER PRIMARY KEY, Station_Name TEXT);
             CREATE TABLE Stops (Stop_ID INTEGER PRIMARY KEY, Station_ID INTEGER, Stop_Name TEXT,
                                 Direction TEXT, ADA INTEGER, Latitude REAL, Longitude REAL);
             CREATE TABLE Lines (Line_ID INTEGER PRIMARY KEY, Color TEXT);
             CREATE TABLE StopDetails (Stop_ID INTEGER, Line_ID INTEGER);
             CREATE TABLE Ridership (Station_ID INTEGER, Ride_Date TEXT, Type_Of_Day TEXT, Num_Riders INTEGER);

             INSERT INTO Stations VALUES (1, 'Clark/Lake'), (2, 'Clinton');
             INSERT INTO Stops VALUES (10, 1, 'Clark/Lake (Loop-bound)', 'E', 1, 41.885737, -87.630886),
                                      (20, 2, 'Clinton (O''Hare-bound)', 'W', 0, 41.875539, -87.640984);
             INSERT INTO Lines VALUES (1, 'Blue');
             INSERT INTO StopDetails VALUES (10, 1), (20, 1);
             INSERT INTO Ridership VALUES (1, '2020-01-02 00:00:00', 'W', 100),
                                          (1, '2021-01-03 00:00:00', 'U', 50),
                                          (2, '2020-01-02 00:00:00', 'W', 300);",
        )
        .unwrap();
        Database::from_connection(conn)
    }

    #[test]
    fn test_scalar_aggregates() {
        let db = fixture_db();
        assert_eq!(db.station_count().unwrap(), 2);
        assert_eq!(db.stop_count().unwrap(), 2);
        assert_eq!(db.ride_entry_count().unwrap(), 3);
        assert_eq!(db.total_riders().unwrap(), 450);
        assert_eq!(db.first_ride_date().unwrap().as_deref(), Some("2020-01-02"));
        assert_eq!(db.last_ride_date().unwrap().as_deref(), Some("2021-01-03"));
    }

    #[test]
    fn test_stations_like_is_case_insensitive() {
        let db = fixture_db();
        let rows = db.stations_like("cl%").unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Clark/Lake", "Clinton"]);
    }

    #[test]
    fn test_lines_by_color_ignores_case() {
        let db = fixture_db();
        assert_eq!(db.lines_by_color("bLuE").unwrap(), vec![1]);
        assert!(db.lines_by_color("Teal").unwrap().is_empty());
    }

    #[test]
    fn test_daily_ridership_parses_dates() {
        let db = fixture_db();
        let rows = db.daily_ridership(1, "2020").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(rows[0].riders, 100);
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Ridership (Station_ID INTEGER, Ride_Date TEXT, Type_Of_Day TEXT, Num_Riders INTEGER);",
        )
        .unwrap();
        let db = Database::from_connection(conn);
        assert_eq!(db.total_riders().unwrap(), 0);
        assert_eq!(db.first_ride_date().unwrap(), None);
    }
}
