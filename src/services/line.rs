use crate::models::{PriceRow, Series};
use crate::services::scale::{LinearScale, TimeScale};
use crate::utils::svg::fmt_num;

/// Maps rows of one series to pixel points and straight-segment path data
#[derive(Debug, Clone, Copy)]
pub struct LineGenerator<'a> {
    x: &'a TimeScale,
    y: &'a LinearScale,
    series: Series,
}

impl<'a> LineGenerator<'a> {
    pub fn new(x: &'a TimeScale, y: &'a LinearScale, series: Series) -> Self {
        Self { x, y, series }
    }

    pub fn series(&self) -> Series {
        self.series
    }

    pub fn point(&self, row: &PriceRow) -> (f64, f64) {
        (self.x.apply(row.date), self.y.apply(self.series.value(row)))
    }

    /// One point per row, in row order
    pub fn points(&self, rows: &[PriceRow]) -> Vec<(f64, f64)> {
        rows.iter().map(|row| self.point(row)).collect()
    }

    /// `M x,y L x,y ...` path data. A non-finite point is left out and the next
    /// finite point opens a new subpath, so gaps stay visible.
    pub fn path_data(&self, rows: &[PriceRow]) -> String {
        let mut d = String::new();
        let mut pen_down = false;
        for (x, y) in self.points(rows) {
            if !(x.is_finite() && y.is_finite()) {
                pen_down = false;
                continue;
            }
            d.push(if pen_down { 'L' } else { 'M' });
            d.push_str(&fmt_num(x));
            d.push(',');
            d.push_str(&fmt_num(y));
            pen_down = true;
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows() -> Vec<PriceRow> {
        vec![
            PriceRow {
                date: NaiveDate::from_ymd_opt(2012, 5, 1).unwrap(),
                open: 10.0,
                close: 12.0,
            },
            PriceRow {
                date: NaiveDate::from_ymd_opt(2012, 5, 2).unwrap(),
                open: 11.0,
                close: 13.0,
            },
        ]
    }

    #[test]
    fn test_close_points_for_two_rows() {
        let rows = rows();
        let (w, h) = (890.0, 450.0);
        let x = TimeScale::from_rows(&rows, (0.0, w)).unwrap();
        let y = LinearScale::from_rows(&rows, (h, 0.0)).unwrap();
        let line = LineGenerator::new(&x, &y, Series::Close);

        let points = line.points(&rows);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].0, 0.0);
        assert!((points[0].1 - h * (1.0 - 12.0 / 13.0)).abs() < 1e-9);
        assert_eq!(points[1], (w, 0.0));
    }

    #[test]
    fn test_path_data_is_one_polyline() {
        let rows = rows();
        let x = TimeScale::from_rows(&rows, (0.0, 100.0)).unwrap();
        let y = LinearScale::new((0.0, 20.0), (100.0, 0.0));
        let line = LineGenerator::new(&x, &y, Series::Open);
        assert_eq!(line.path_data(&rows), "M0,50L100,45");
    }

    #[test]
    fn test_nan_splits_path() {
        let mut rows = rows();
        rows.push(PriceRow {
            date: NaiveDate::from_ymd_opt(2012, 5, 3).unwrap(),
            open: 4.0,
            close: 4.0,
        });
        rows[1].open = f64::NAN;

        let x = TimeScale::from_rows(&rows, (0.0, 100.0)).unwrap();
        let y = LinearScale::new((0.0, 20.0), (100.0, 0.0));
        let line = LineGenerator::new(&x, &y, Series::Open);
        assert_eq!(line.path_data(&rows), "M0,50M100,80");
    }
}
