//! Draws a [`ChartSpec`] to a PNG file with plotters.

use anyhow::{Context, Result};
use image::DynamicImage;
use image::imageops::FilterType;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

use crate::chart::ChartSpec;

const CHART_SIZE: (u32, u32) = (1024, 768);

/// Renders `spec` into a PNG at `path`.
///
/// `map_image` is used only when `spec.background` is set; a missing or
/// unreadable image is logged and the chart is drawn without it.
#[tracing::instrument(skip_all, fields(title = %spec.title, path = %path.display()))]
pub fn render(spec: &ChartSpec, path: &Path, map_image: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create chart directory {}", parent.display()))?;
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let ranges = spec.ranges();
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(ranges.x.clone(), ranges.y.clone())?;

    let y_format = spec.y_format;
    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .y_label_formatter(&|y: &f64| y_format.label(*y))
        .draw()?;

    if spec.background.is_some() {
        if let Some(img) = load_background(map_image, chart.plotting_area().dim_in_pixel()) {
            let elem: BitMapElement<_> = ((ranges.x.start, ranges.y.end), img).into();
            chart.draw_series(std::iter::once(elem))?;
        }
    }

    for (idx, series) in spec.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let drawn = chart.draw_series(LineSeries::new(series.points.iter().copied(), color))?;
        if let Some(label) = &series.label {
            drawn
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }

    if !spec.annotations.is_empty() {
        chart.draw_series(
            spec.annotations
                .iter()
                .map(|a| Circle::new((a.x, a.y), 3, RED.filled())),
        )?;
        chart.draw_series(spec.annotations.iter().map(|a| {
            Text::new(
                a.text.clone(),
                (a.x, a.y),
                ("sans-serif", 14).into_font().color(&BLACK),
            )
        }))?;
    }

    if spec.series.iter().any(|s| s.label.is_some()) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    debug!(series = spec.series.len(), annotations = spec.annotations.len(), "Chart written");
    Ok(())
}

/// Loads the map stretched to `w` by `h` pixels, or `None` with a warning.
fn load_background(map_image: &Path, (w, h): (u32, u32)) -> Option<DynamicImage> {
    match image::open(map_image) {
        Ok(img) => Some(img.resize_exact(w, h, FilterType::Nearest)),
        Err(e) => {
            warn!(image = %map_image.display(), error = %e, "Background map unavailable, drawing without it");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Annotation, AxisFormat, MAP_EXTENT};
    use image::{Rgb, RgbImage};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("cta_reports_render_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_background_is_none() {
        let missing = scratch_dir("missing").join("no_such_map.png");
        assert!(load_background(&missing, (64, 48)).is_none());
    }

    #[test]
    fn test_background_scaled_to_plot_area() {
        let dir = scratch_dir("scaled");
        std::fs::create_dir_all(&dir).unwrap();
        let map = dir.join("map.png");
        RgbImage::from_pixel(10, 10, Rgb([200, 200, 200]))
            .save(&map)
            .unwrap();

        let img = load_background(&map, (64, 48)).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    // Draws text, so it needs a system sans-serif font.
    #[test]
    #[ignore = "needs system fonts"]
    fn test_render_without_background_map() {
        let spec = ChartSpec {
            title: "Stations Near You".to_string(),
            file_name: "nearby.png".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            y_format: AxisFormat::Plain,
            series: Vec::new(),
            annotations: vec![Annotation {
                x: -87.630886,
                y: 41.885737,
                text: "Clark/Lake".to_string(),
            }],
            background: Some(MAP_EXTENT),
        };
        let dir = scratch_dir("no_map");
        let path = dir.join(&spec.file_name);

        render(&spec, &path, &dir.join("no_such_map.png")).unwrap();
        assert!(path.exists());
    }
}
