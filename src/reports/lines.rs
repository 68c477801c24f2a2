use anyhow::Result;

use crate::db::Database;
use crate::reports::types::{LineStop, LineStops, Report};

/// Whether any line has this color, ignoring case.
pub fn line_exists(db: &Database, color: &str) -> Result<bool> {
    Ok(!db.lines_by_color(color.trim())?.is_empty())
}

/// Uppercased, trimmed direction code.
pub fn normalize_direction(direction: &str) -> String {
    direction.trim().to_uppercase()
}

/// Stops of a line in one direction, ascending by name, with accessibility.
#[tracing::instrument(skip(db))]
pub fn line_stops(db: &Database, color: &str, direction: &str) -> Result<Report<LineStops>> {
    let color = color.trim();
    if !line_exists(db, color)? {
        return Ok(Report::NotFound);
    }

    let direction = normalize_direction(direction);
    let rows = db.stops_for_line(color, &direction)?;
    if rows.is_empty() {
        return Ok(Report::DirectionNotServed {
            color: color.to_string(),
            direction,
        });
    }

    let stops = rows
        .into_iter()
        .map(|row| LineStop {
            name: row.name,
            accessible: row.ada == 1,
        })
        .collect();

    Ok(Report::Ok(LineStops {
        color: color.to_string(),
        direction,
        stops,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::fixture_db;

    #[test]
    fn test_normalize_direction() {
        assert_eq!(normalize_direction(" n "), "N");
        assert_eq!(normalize_direction("W"), "W");
    }

    #[test]
    fn test_unknown_color_is_not_found() {
        let db = fixture_db();
        assert_eq!(line_stops(&db, "Teal", "N").unwrap(), Report::NotFound);
    }

    #[test]
    fn test_direction_not_served() {
        let db = fixture_db();
        assert_eq!(
            line_stops(&db, "blue", "n").unwrap(),
            Report::DirectionNotServed {
                color: "blue".to_string(),
                direction: "N".to_string()
            }
        );
    }

    #[test]
    fn test_stops_flag_accessibility() {
        let db = fixture_db();
        let Report::Ok(line) = line_stops(&db, "BLUE", "e").unwrap() else {
            panic!("expected stops");
        };
        assert_eq!(line.direction, "E");
        assert_eq!(
            line.stops,
            vec![LineStop {
                name: "Clark/Lake (Loop-bound)".to_string(),
                accessible: true
            }]
        );
    }
}
