//! Chart-ready shapes for the trend, comparison and proximity reports.
//!
//! These types carry series, labels and axis titles only. Drawing happens in
//! [`render`].

pub mod render;

use std::ops::Range;

use crate::reports::types::{DailyComparison, MonthlyTrend, NearbyStations, YearlyTrend};

/// Longitude and latitude covered by the Chicago background map.
pub const MAP_EXTENT: Extent = Extent {
    x: -87.9277..-87.5569,
    y: 41.7012..42.0868,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Extent {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisFormat {
    Plain,
    /// Values shown in millions, e.g. "1.2M".
    Millions,
}

impl AxisFormat {
    pub fn label(self, value: f64) -> String {
        match self {
            AxisFormat::Plain => format!("{value:.0}"),
            AxisFormat::Millions => format!("{:.1}M", value / 1_000_000.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
}

/// Text placed at a data coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// File name (without directory) the chart is written to.
    pub file_name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_format: AxisFormat,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
    /// Draw the background map stretched over this extent.
    pub background: Option<Extent>,
}

impl ChartSpec {
    fn new(file_name: &str, title: String, x_label: &str, y_label: &str) -> Self {
        ChartSpec {
            file_name: file_name.to_string(),
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            y_format: AxisFormat::Plain,
            series: Vec::new(),
            annotations: Vec::new(),
            background: None,
        }
    }

    /// Axis ranges: the background extent when there is one, otherwise the
    /// data bounds padded by 5%.
    pub fn ranges(&self) -> Extent {
        if let Some(extent) = &self.background {
            return extent.clone();
        }

        let points = self.series.iter().flat_map(|s| s.points.iter());
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.copied().unzip();
        Extent {
            x: padded(&xs, false),
            y: padded(&ys, true),
        }
    }
}

fn padded(values: &[f64], from_zero: bool) -> Range<f64> {
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() {
        return 0.0..1.0;
    }
    if from_zero {
        lo = lo.min(0.0);
    }
    if hi - lo < f64::EPSILON {
        hi += 1.0;
        if !from_zero {
            lo -= 1.0;
        }
    }
    let pad = (hi - lo) * 0.05;
    let lo = if from_zero && lo >= 0.0 { lo } else { lo - pad };
    lo..hi + pad
}

/// Builds a chart for a report payload.
pub trait ToChart {
    fn chart(&self) -> ChartSpec;
}

impl ToChart for YearlyTrend {
    fn chart(&self) -> ChartSpec {
        let mut spec = ChartSpec::new(
            "yearly_ridership.png",
            format!("Yearly riders at {}", self.station.name),
            "Years",
            "Millions of Riders",
        );
        spec.y_format = AxisFormat::Millions;
        spec.series.push(Series {
            label: Some(self.station.name.clone()),
            points: self
                .years
                .iter()
                .map(|y| (y.year as f64, y.riders as f64))
                .collect(),
        });
        spec
    }
}

impl ToChart for MonthlyTrend {
    fn chart(&self) -> ChartSpec {
        let mut spec = ChartSpec::new(
            "monthly_ridership.png",
            format!(
                "Monthly Ridership at {} Station ({})",
                self.station.name, self.year
            ),
            "Months",
            "Number of Riders",
        );
        spec.series.push(Series {
            label: Some(self.station.name.clone()),
            points: self
                .months
                .iter()
                .map(|m| (m.month as f64, m.riders as f64))
                .collect(),
        });
        spec
    }
}

impl ToChart for DailyComparison {
    /// Both stations are plotted against a 0-based day index, not the date.
    fn chart(&self) -> ChartSpec {
        let mut spec = ChartSpec::new(
            "daily_comparison.png",
            format!("Ridership Each Day of {}", self.year),
            "Day",
            "Number of Riders",
        );
        for station in [&self.first, &self.second] {
            spec.series.push(Series {
                label: Some(station.station.name.clone()),
                points: station
                    .days
                    .iter()
                    .enumerate()
                    .map(|(day, d)| (day as f64, d.riders as f64))
                    .collect(),
            });
        }
        spec
    }
}

impl ToChart for NearbyStations {
    fn chart(&self) -> ChartSpec {
        let mut spec = ChartSpec::new(
            "stations_near_you.png",
            "Stations Near You".to_string(),
            "Longitude",
            "Latitude",
        );
        spec.background = Some(MAP_EXTENT);
        spec.annotations = self
            .stations
            .iter()
            .map(|s| Annotation {
                text: s.name.clone(),
                x: s.longitude,
                y: s.latitude,
            })
            .collect();
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::types::{
        BoundingBox, DailyRiders, LocatedStation, Station, StationDays, YearTotal,
    };
    use chrono::NaiveDate;

    fn station(id: i64, name: &str) -> Station {
        Station {
            id,
            name: name.to_string(),
        }
    }

    fn days(n: u32, riders: i64) -> Vec<DailyRiders> {
        (1..=n)
            .map(|d| DailyRiders {
                date: NaiveDate::from_ymd_opt(2020, 1, d).unwrap(),
                riders,
            })
            .collect()
    }

    #[test]
    fn test_yearly_chart_series() {
        let trend = YearlyTrend {
            station: station(1, "Clark/Lake"),
            years: vec![
                YearTotal {
                    year: 2019,
                    riders: 1_500_000,
                },
                YearTotal {
                    year: 2020,
                    riders: 600_000,
                },
            ],
        };
        let spec = trend.chart();
        assert_eq!(spec.title, "Yearly riders at Clark/Lake");
        assert_eq!(spec.y_format, AxisFormat::Millions);
        assert_eq!(
            spec.series[0].points,
            vec![(2019.0, 1_500_000.0), (2020.0, 600_000.0)]
        );
    }

    #[test]
    fn test_comparison_uses_day_index_per_series() {
        let comparison = DailyComparison {
            year: "2020".to_string(),
            first: StationDays {
                station: station(1, "Clark/Lake"),
                days: days(3, 10),
            },
            second: StationDays {
                station: station(2, "Clinton"),
                days: days(2, 20),
            },
        };
        let spec = comparison.chart();
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].label.as_deref(), Some("Clark/Lake"));
        assert_eq!(
            spec.series[0].points,
            vec![(0.0, 10.0), (1.0, 10.0), (2.0, 10.0)]
        );
        assert_eq!(spec.series[1].points, vec![(0.0, 20.0), (1.0, 20.0)]);
    }

    #[test]
    fn test_nearby_chart_annotates_lon_lat() {
        let nearby = NearbyStations {
            latitude: 41.88,
            longitude: -87.63,
            bounds: BoundingBox::around(41.88, -87.63),
            stations: vec![LocatedStation {
                name: "Clark/Lake".to_string(),
                latitude: 41.885737,
                longitude: -87.630886,
            }],
        };
        let spec = nearby.chart();
        assert_eq!(spec.background, Some(MAP_EXTENT));
        assert_eq!(spec.ranges(), MAP_EXTENT);
        assert_eq!(
            spec.annotations,
            vec![Annotation {
                text: "Clark/Lake".to_string(),
                x: -87.630886,
                y: 41.885737
            }]
        );
    }

    #[test]
    fn test_ranges_pad_data() {
        let mut spec = ChartSpec::new("t.png", "t".to_string(), "x", "y");
        spec.series.push(Series {
            label: None,
            points: vec![(0.0, 100.0), (10.0, 200.0)],
        });
        let r = spec.ranges();
        assert!(r.x.start < 0.0 && r.x.end > 10.0);
        assert_eq!(r.y.start, 0.0);
        assert!(r.y.end > 200.0);
    }

    #[test]
    fn test_ranges_empty_series() {
        let spec = ChartSpec::new("t.png", "t".to_string(), "x", "y");
        let r = spec.ranges();
        assert_eq!(r.x, 0.0..1.0);
        assert_eq!(r.y, 0.0..1.0);
    }

    #[test]
    fn test_axis_format_millions() {
        assert_eq!(AxisFormat::Millions.label(1_200_000.0), "1.2M");
        assert_eq!(AxisFormat::Plain.label(42.4), "42");
    }
}
