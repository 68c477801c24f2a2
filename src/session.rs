//! Interactive command loop.
//!
//! Reads a one-character selector, prompts for the report's parameters, runs
//! the report and prints it. Input and output are generic so a session can be
//! scripted in tests.

use anyhow::Result;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};

use crate::chart::ToChart;
use crate::chart::render::render;
use crate::db::Database;
use crate::output::{self, NO_DATA, NO_SUCH_LINE, ReportLines};
use crate::reports::geo::{check_latitude, check_longitude};
use crate::reports::lines::line_exists;
use crate::reports::types::Station;
use crate::reports::{self, Report, resolve_station};
use crate::stats::DatabaseSummary;

const COMMAND_PROMPT: &str = "\nPlease enter a command (1-9, x to exit): ";
const UNKNOWN_COMMAND: &str = "**Error, unknown command, try again...";
const INVALID_NUMBER: &str = "**Invalid number...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StationLookup,
    DayTypeSplit,
    WeekdayRanking,
    LineStops,
    StopDistribution,
    YearlyTrend,
    MonthlyTrend,
    DailyComparison,
    NearbyStations,
    Exit,
}

impl Command {
    /// Parses a selector. Only the exact strings `1`..`9` and `x` are accepted.
    pub fn parse(input: &str) -> Option<Self> {
        let command = match input {
            "1" => Command::StationLookup,
            "2" => Command::DayTypeSplit,
            "3" => Command::WeekdayRanking,
            "4" => Command::LineStops,
            "5" => Command::StopDistribution,
            "6" => Command::YearlyTrend,
            "7" => Command::MonthlyTrend,
            "8" => Command::DailyComparison,
            "9" => Command::NearbyStations,
            "x" => Command::Exit,
            _ => return None,
        };
        Some(command)
    }
}

/// Where rendered charts go and which map image backs the proximity chart.
#[derive(Debug, Clone)]
pub struct ChartSettings {
    pub dir: PathBuf,
    pub map_image: PathBuf,
}

pub struct Session<'a, R, W> {
    db: &'a Database,
    input: R,
    out: W,
    charts: ChartSettings,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(db: &'a Database, input: R, out: W, charts: ChartSettings) -> Self {
        Session {
            db,
            input,
            out,
            charts,
        }
    }

    /// Prints the welcome banner and summary, then serves commands until `x`
    /// or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "** Welcome to CTA L analysis app **")?;
        writeln!(self.out)?;

        let summary = DatabaseSummary::from_db(self.db)?;
        self.print_lines(&output::summary_lines(&summary))?;

        while let Some(choice) = self.prompt(COMMAND_PROMPT)? {
            match Command::parse(&choice) {
                Some(Command::Exit) => break,
                Some(command) => {
                    info!(?command, "Running report");
                    if let Err(e) = self.dispatch(command) {
                        error!(?command, error = %e, "Report failed");
                        writeln!(self.out, "**Error running report: {e:#}")?;
                    }
                }
                None => writeln!(self.out, "{UNKNOWN_COMMAND}")?,
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::StationLookup => {
                let pattern = self.ask("\nEnter partial station name (wildcards _ and %): ")?;
                let report = reports::station_lookup(self.db, &pattern)?;
                self.show(&report)
            }
            Command::DayTypeSplit => {
                let name = self.ask("\nEnter the name of the station you would like to analyze: ")?;
                let report = reports::day_type_split(self.db, &name)?;
                if matches!(report, Report::NotFound) {
                    writeln!(self.out, "{NO_DATA}")?;
                    return Ok(());
                }
                self.show(&report)
            }
            Command::WeekdayRanking => {
                let report = reports::weekday_ranking(self.db)?;
                self.show(&report)
            }
            Command::LineStops => {
                let color = self.ask("\nEnter a line color (e.g. Red or Yellow): ")?;
                if !line_exists(self.db, &color)? {
                    writeln!(self.out, "{NO_SUCH_LINE}")?;
                    return Ok(());
                }
                let direction = self.ask("Enter a direction (N/S/W/E): ")?;
                let report = reports::line_stops(self.db, &color, &direction)?;
                self.show(&report)
            }
            Command::StopDistribution => {
                let report = reports::stop_distribution(self.db)?;
                self.show(&report)
            }
            Command::YearlyTrend => {
                let pattern = self.ask("\nEnter a station name (wildcards _ and %): ")?;
                let report = reports::yearly_trend(self.db, &pattern)?;
                self.show_and_plot(&report, "Plot? (y/n) ")
            }
            Command::MonthlyTrend => {
                let Some(station) =
                    self.ask_station("\nEnter a station name (wildcards _ and %): ")?
                else {
                    return Ok(());
                };
                let year = self.ask("Enter a year: ")?;
                let report = Report::Ok(reports::monthly_trend(self.db, station, &year)?);
                self.show_and_plot(&report, "Plot? (y/n) ")
            }
            Command::DailyComparison => {
                let year = self.ask("\nYear to compare against? ")?;
                let Some(first) = self.ask_station("\nEnter station 1 (wildcards _ and %): ")?
                else {
                    return Ok(());
                };
                let Some(second) = self.ask_station("\nEnter station 2 (wildcards _ and %): ")?
                else {
                    return Ok(());
                };
                let report = Report::Ok(reports::daily_comparison(self.db, &year, first, second)?);
                self.show_and_plot(&report, "Plot? (y/n) ")
            }
            Command::NearbyStations => {
                let Some(latitude) = self.ask_number("\nEnter a latitude: ")? else {
                    return Ok(());
                };
                if let Some(rejected) = check_latitude::<()>(latitude) {
                    return self.show_status(&rejected);
                }
                let Some(longitude) = self.ask_number("Enter a longitude: ")? else {
                    return Ok(());
                };
                if let Some(rejected) = check_longitude::<()>(longitude) {
                    return self.show_status(&rejected);
                }
                let report = reports::nearby_stations(self.db, latitude, longitude)?;
                self.show_and_plot(&report, "\nPlot? (y/n) ")
            }
            Command::Exit => Ok(()),
        }
    }

    fn show<T: ReportLines + Serialize>(&mut self, report: &Report<T>) -> Result<()> {
        output::log_json(report)?;
        let lines = output::render(report);
        self.print_lines(&lines)
    }

    /// Shows a report and, when it succeeded, offers to chart it.
    fn show_and_plot<T>(&mut self, report: &Report<T>, question: &str) -> Result<()>
    where
        T: ReportLines + ToChart + Serialize,
    {
        self.show(report)?;
        if let Report::Ok(data) = report {
            self.offer_plot(data, question)?;
        }
        Ok(())
    }

    fn show_status(&mut self, report: &Report<()>) -> Result<()> {
        writeln!(self.out, "{}", output::status_message(report))?;
        Ok(())
    }

    fn offer_plot<T: ToChart>(&mut self, data: &T, question: &str) -> Result<()> {
        if self.ask(question)?.trim() != "y" {
            return Ok(());
        }
        let spec = data.chart();
        let path = self.charts.dir.join(&spec.file_name);
        render(&spec, &path, &self.charts.map_image)?;
        writeln!(self.out, "Chart saved to {}", path.display())?;
        Ok(())
    }

    fn print_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    /// Writes `question` and reads one line. `None` at end of input.
    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.out, "{question}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Like [`Self::prompt`], but end of input reads as an empty answer.
    fn ask(&mut self, question: &str) -> Result<String> {
        Ok(self.prompt(question)?.unwrap_or_default())
    }

    /// Asks for a pattern naming one station. Prints why when it does not.
    fn ask_station(&mut self, question: &str) -> Result<Option<Station>> {
        let pattern = self.ask(question)?;
        match resolve_station(self.db, &pattern)?.station::<()>() {
            Ok(station) => Ok(Some(station)),
            Err(report) => {
                self.show_status(&report)?;
                Ok(None)
            }
        }
    }

    fn ask_number(&mut self, question: &str) -> Result<Option<f64>> {
        let answer = self.ask(question)?;
        match answer.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => {
                writeln!(self.out, "{INVALID_NUMBER}")?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("1"), Some(Command::StationLookup));
        assert_eq!(Command::parse("9"), Some(Command::NearbyStations));
        assert_eq!(Command::parse(" 9 "), None);
        assert_eq!(Command::parse("9 "), None);
        assert_eq!(Command::parse("x"), Some(Command::Exit));
        assert_eq!(Command::parse("X"), None);
        assert_eq!(Command::parse("10"), None);
        assert_eq!(Command::parse(""), None);
    }
}
