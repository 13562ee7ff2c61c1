use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use tracing::debug;

use crate::models::{PriceRow, Series};
use crate::services::canvas::CanvasLayout;
use crate::utils::errors::ChartError;

/// Rasterize the same chart (both series, close markers, axes) to PNG bytes
pub fn generate_png(rows: &[PriceRow], layout: &CanvasLayout) -> Result<Vec<u8>, ChartError> {
    // Find date range; a single day is widened so the axis has some extent
    let first = rows.first().ok_or(ChartError::EmptyDataset)?.date;
    let (x_min, mut x_max) = rows.iter().fold((first, first), |(lo, hi), row| {
        (lo.min(row.date), hi.max(row.date))
    });
    if x_max == x_min {
        x_max = x_min + Duration::days(1);
    }

    // Find price range
    let y_max = rows
        .iter()
        .filter(|r| !r.open.is_nan() && !r.close.is_nan())
        .map(|r| r.open.max(r.close))
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    // BitMapBackend picks the encoder from the extension; the file is removed on drop
    let temp_file = tempfile::Builder::new()
        .prefix("linegraph_")
        .suffix(".png")
        .tempfile()?;

    {
        let size = (layout.width as u32, layout.height as u32);
        let root = BitMapBackend::new(temp_file.path(), size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Render(format!("Failed to fill canvas: {}", e)))?;

        let mut chart = ChartBuilder::on(&root)
            .margin_top(layout.margin.top as u32)
            .margin_right(layout.margin.right as u32)
            .x_label_area_size(layout.margin.bottom as u32)
            .y_label_area_size(layout.margin.left as u32)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(|e| ChartError::Render(format!("Failed to build chart: {}", e)))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .draw()
            .map_err(|e| ChartError::Render(format!("Failed to draw axes: {}", e)))?;

        // One path per run of finite points, so gaps match the SVG output
        chart
            .draw_series(
                finite_runs(rows, Series::Close)
                    .into_iter()
                    .map(|run| PathElement::new(run, &BLUE)),
            )
            .map_err(|e| ChartError::Render(format!("Failed to draw close line: {}", e)))?;
        chart
            .draw_series(
                finite_runs(rows, Series::Open)
                    .into_iter()
                    .map(|run| PathElement::new(run, &RED)),
            )
            .map_err(|e| ChartError::Render(format!("Failed to draw open line: {}", e)))?;

        // Draw close markers
        chart
            .draw_series(
                finite_runs(rows, Series::Close)
                    .into_iter()
                    .flatten()
                    .map(|point| Circle::new(point, 10, BLACK.stroke_width(2))),
            )
            .map_err(|e| ChartError::Render(format!("Failed to draw markers: {}", e)))?;

        root.present()
            .map_err(|e| ChartError::Render(format!("Failed to render chart: {}", e)))?;
    }

    let image_data = std::fs::read(temp_file.path())?;

    debug!("PNG export produced {} bytes", image_data.len());
    Ok(image_data)
}

/// Consecutive rows whose `series` value is finite, split wherever it is not
fn finite_runs(rows: &[PriceRow], series: Series) -> Vec<Vec<(NaiveDate, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for row in rows {
        let value = series.value(row);
        if value.is_finite() {
            current.push((row.date, value));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::loader::parse_csv;

    #[test]
    fn test_generate_png_rejects_empty() {
        let err = generate_png(&[], &CanvasLayout::default()).unwrap_err();
        assert!(matches!(err, ChartError::EmptyDataset));
    }

    #[test]
    fn test_generate_png_two_rows() {
        let rows = parse_csv("date,open,close\n1-May-12,10.0,12.0\n2-May-12,11.0,13.0\n").unwrap();
        let image_data = generate_png(&rows, &CanvasLayout::default()).expect("PNG export failed");
        assert!(image_data.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_finite_runs_split_at_gaps() {
        let rows = parse_csv(
            "date,open,close\n1-May-12,1,2\n2-May-12,1,x\n3-May-12,1,4\n4-May-12,1,5\n",
        )
        .unwrap();

        let close = finite_runs(&rows, Series::Close);
        assert_eq!(close.len(), 2);
        assert_eq!(close[0].len(), 1);
        assert_eq!(close[1].len(), 2);
        assert_eq!(close[1][0].1, 4.0);

        assert_eq!(finite_runs(&rows, Series::Open).len(), 1);
    }
}
