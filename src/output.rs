//! Text rendering of report results.
//!
//! Every function here is pure and returns display lines; the session decides
//! where they go.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::reports::types::{
    Coordinate, DailyComparison, DayTypeSplit, LineStops, MonthlyTrend, NearbyStations, Report,
    Station, StationDays, StopDistribution, WeekdayRanking, YearlyTrend,
};
use crate::stats::DatabaseSummary;

/// Formats an integer with `,` between each group of three digits.
pub fn fmt_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a fraction (0.0–1.0) as a percentage with two decimals, e.g. "33.33%".
pub fn fmt_pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// "MM/YYYY" with the month zero-padded.
pub fn fmt_month_year(month: u32, year: &str) -> String {
    format!("{:02}/{}", month, year)
}

/// Logs a report as JSON at debug level.
pub fn log_json<T: Serialize>(report: &Report<T>) -> Result<()> {
    debug!(report = %serde_json::to_string(report)?, "Report computed");
    Ok(())
}

/// Lines of text for a successful report payload.
pub trait ReportLines {
    fn lines(&self) -> Vec<String>;
}

/// Renders any report: its lines when `Ok`, otherwise the status message.
pub fn render<T: ReportLines>(report: &Report<T>) -> Vec<String> {
    match report {
        Report::Ok(data) => data.lines(),
        other => vec![status_message(other)],
    }
}

/// User-facing message for a report outcome.
pub fn status_message<T>(report: &Report<T>) -> String {
    match report {
        Report::Ok(_) => String::new(),
        Report::NotFound => "**No stations found...".to_string(),
        Report::StationNotFound => "**No station found...".to_string(),
        Report::Ambiguous { .. } => "**Multiple stations found...".to_string(),
        Report::DirectionNotServed { .. } => {
            "**That line does not run in the direction chosen...".to_string()
        }
        Report::OutOfRange {
            coordinate: Coordinate::Latitude,
            ..
        } => "**Latitude entered is out of bounds...".to_string(),
        Report::OutOfRange {
            coordinate: Coordinate::Longitude,
            ..
        } => "**Longitude entered is out of bounds...".to_string(),
    }
}

/// Message for a color that names no line.
pub const NO_SUCH_LINE: &str = "**No such line...";
/// Message for a day-type split with no ridership.
pub const NO_DATA: &str = "**No data found...";

pub fn summary_lines(summary: &DatabaseSummary) -> Vec<String> {
    vec![
        "General Statistics:".to_string(),
        format!("  # of stations: {}", fmt_count(summary.stations)),
        format!("  # of stops: {}", fmt_count(summary.stops)),
        format!("  # of ride entries: {}", fmt_count(summary.ride_entries)),
        format!(
            "  date range: {} - {}",
            summary.first_date.as_deref().unwrap_or("n/a"),
            summary.last_date.as_deref().unwrap_or("n/a")
        ),
        format!("  Total ridership: {}", fmt_count(summary.total_riders)),
    ]
}

impl ReportLines for Vec<Station> {
    fn lines(&self) -> Vec<String> {
        self.iter()
            .map(|s| format!("{} : {}", s.id, s.name))
            .collect()
    }
}

impl ReportLines for DayTypeSplit {
    fn lines(&self) -> Vec<String> {
        let line = |label: &str, riders: i64, fraction: f64| {
            format!(" {label} ridership: {} ({})", fmt_count(riders), fmt_pct(fraction))
        };
        vec![
            format!("Percentage of ridership for the {} station:", self.station),
            line("Weekday", self.weekday.riders, self.weekday.fraction),
            line("Saturday", self.saturday.riders, self.saturday.fraction),
            line(
                "Sunday/Holiday",
                self.sunday_holiday.riders,
                self.sunday_holiday.fraction,
            ),
            format!(" Total ridership: {}", fmt_count(self.total)),
        ]
    }
}

impl ReportLines for WeekdayRanking {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec!["Ridership on Weekdays for Each Station".to_string()];
        lines.extend(self.stations.iter().map(|s| {
            format!(
                "{} : {} ({})",
                s.station,
                fmt_count(s.share.riders),
                fmt_pct(s.share.fraction)
            )
        }));
        lines
    }
}

impl ReportLines for LineStops {
    fn lines(&self) -> Vec<String> {
        self.stops
            .iter()
            .map(|stop| {
                let ada = if stop.accessible {
                    "(handicap accessible)"
                } else {
                    "(not handicap accessible)"
                };
                format!("{} : direction = {} {}", stop.name, self.direction, ada)
            })
            .collect()
    }
}

impl ReportLines for StopDistribution {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec!["Number of Stops For Each Color By Direction".to_string()];
        lines.extend(self.groups.iter().map(|g| {
            format!(
                "{} going {} : {} ({})",
                g.color,
                g.direction,
                fmt_count(g.stops),
                fmt_pct(g.fraction)
            )
        }));
        lines
    }
}

impl ReportLines for YearlyTrend {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Yearly Ridership at {}", self.station.name)];
        lines.extend(
            self.years
                .iter()
                .map(|y| format!("{} : {}", y.year, fmt_count(y.riders))),
        );
        lines
    }
}

impl ReportLines for MonthlyTrend {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Monthly Ridership at {} for {}",
            self.station.name, self.year
        )];
        lines.extend(self.months.iter().map(|m| {
            format!(
                "{} : {}",
                fmt_month_year(m.month, &self.year),
                fmt_count(m.riders)
            )
        }));
        lines
    }
}

fn station_days_lines(label: &str, days: &StationDays) -> Vec<String> {
    let mut lines = vec![format!(
        "{label}: {} {}",
        days.station.id, days.station.name
    )];
    lines.extend(
        days.preview()
            .into_iter()
            .map(|d| format!("{} {}", d.date.format("%Y-%m-%d"), d.riders)),
    );
    lines
}

impl ReportLines for DailyComparison {
    fn lines(&self) -> Vec<String> {
        let mut lines = station_days_lines("Station 1", &self.first);
        lines.extend(station_days_lines("Station 2", &self.second));
        lines
    }
}

impl ReportLines for NearbyStations {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![String::new(), "List of Stations Within a Mile".to_string()];
        lines.extend(
            self.stations
                .iter()
                .map(|s| format!("{} : ({}, {})", s.name, s.latitude, s.longitude)),
        );
        lines
    }
}
