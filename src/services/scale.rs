//! Scales mapping data values to pixel coordinates, plus tick generation for the axes.
//!
//! Both scales interpolate linearly over a closed domain. A degenerate domain
//! (both ends equal) maps everything to the middle of the range, and NaN maps
//! to NaN. Tick selection follows the usual "nice numbers" conventions so the
//! axes read like a d3 chart.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::models::PriceRow;
use crate::utils::errors::ChartError;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MILLIS_PER_DAY: f64 = 24.0 * MILLIS_PER_HOUR;
const MILLIS_PER_YEAR: f64 = 365.0 * MILLIS_PER_DAY;

fn interpolate(t: f64, r0: f64, r1: f64) -> f64 {
    r0 + (r1 - r0) * t
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Continuous time scale: `[d0, d1]` -> `[r0, r1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDateTime, NaiveDateTime),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        Self {
            domain: (midnight(domain.0), midnight(domain.1)),
            range,
        }
    }

    /// Domain is the date extent of `rows`, found in one pass
    pub fn from_rows(rows: &[PriceRow], range: (f64, f64)) -> Result<Self, ChartError> {
        let first = rows.first().ok_or(ChartError::EmptyDataset)?.date;
        let (min, max) = rows.iter().fold((first, first), |(lo, hi), row| {
            (lo.min(row.date), hi.max(row.date))
        });
        Ok(Self::new((min, max), range))
    }

    pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, date: NaiveDate) -> f64 {
        self.apply_datetime(midnight(date))
    }

    pub fn apply_datetime(&self, at: NaiveDateTime) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = (d1 - d0).num_milliseconds() as f64;
        if span == 0.0 {
            return interpolate(0.5, r0, r1);
        }
        let t = (at - d0).num_milliseconds() as f64 / span;
        interpolate(t, r0, r1)
    }

    /// Roughly `count` ticks aligned to calendar boundaries
    pub fn ticks(&self, count: usize) -> Vec<NaiveDateTime> {
        let (d0, d1) = self.domain;
        let (start, stop) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        if start == stop {
            return vec![start];
        }
        let span = (stop - start).num_milliseconds() as f64;
        TickInterval::choose(span, count).range(start, stop)
    }

    pub fn tick_format(&self, tick: NaiveDateTime) -> String {
        format_time_tick(tick)
    }
}

/// Calendar intervals a time axis may step by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickInterval {
    Hours(u32),
    Days(u32),
    Week,
    Months(u32),
    Years(i32),
}

impl TickInterval {
    fn approx_millis(&self) -> f64 {
        match self {
            TickInterval::Hours(n) => f64::from(*n) * MILLIS_PER_HOUR,
            TickInterval::Days(n) => f64::from(*n) * MILLIS_PER_DAY,
            TickInterval::Week => 7.0 * MILLIS_PER_DAY,
            TickInterval::Months(n) => f64::from(*n) * 30.0 * MILLIS_PER_DAY,
            TickInterval::Years(n) => f64::from(*n) * MILLIS_PER_YEAR,
        }
    }

    /// Pick the interval whose length is closest (by ratio) to `span / count`
    pub fn choose(span_millis: f64, count: usize) -> Self {
        const CANDIDATES: [TickInterval; 10] = [
            TickInterval::Hours(1),
            TickInterval::Hours(3),
            TickInterval::Hours(6),
            TickInterval::Hours(12),
            TickInterval::Days(1),
            TickInterval::Days(2),
            TickInterval::Week,
            TickInterval::Months(1),
            TickInterval::Months(3),
            TickInterval::Years(1),
        ];

        let target = span_millis / count.max(1) as f64;
        let upper = CANDIDATES.iter().position(|c| c.approx_millis() > target);
        match upper {
            Some(0) => CANDIDATES[0],
            Some(i) => {
                let (lo, hi) = (CANDIDATES[i - 1], CANDIDATES[i]);
                if target / lo.approx_millis() < hi.approx_millis() / target {
                    lo
                } else {
                    hi
                }
            }
            None => {
                let years = span_millis / MILLIS_PER_YEAR;
                let step = tick_increment(0.0, years, count).max(1.0);
                TickInterval::Years(step as i32)
            }
        }
    }

    fn matches(&self, at: NaiveDateTime) -> bool {
        let on_day = at.time() == NaiveTime::MIN;
        match self {
            TickInterval::Hours(n) => at.minute() == 0 && at.second() == 0 && at.hour() % n == 0,
            TickInterval::Days(n) => on_day && (at.day() - 1) % n == 0,
            TickInterval::Week => on_day && at.weekday() == Weekday::Sun,
            TickInterval::Months(n) => on_day && at.day() == 1 && at.month0() % n == 0,
            TickInterval::Years(n) => {
                on_day && at.day() == 1 && at.month() == 1 && at.year().rem_euclid(*n) == 0
            }
        }
    }

    /// Every boundary of this interval within `[start, stop]`
    pub fn range(&self, start: NaiveDateTime, stop: NaiveDateTime) -> Vec<NaiveDateTime> {
        let step = match self {
            TickInterval::Hours(_) => Duration::hours(1),
            _ => Duration::days(1),
        };

        // Align the cursor to the first candidate boundary at or after `start`
        let mut cursor = match self {
            TickInterval::Hours(_) => {
                let hour_floor = start.date().and_time(NaiveTime::MIN)
                    + Duration::hours(i64::from(start.hour()));
                if hour_floor < start {
                    hour_floor + step
                } else {
                    hour_floor
                }
            }
            _ => {
                let day_floor = midnight(start.date());
                if day_floor < start {
                    day_floor + step
                } else {
                    day_floor
                }
            }
        };

        let mut ticks = Vec::new();
        while cursor <= stop {
            if self.matches(cursor) {
                ticks.push(cursor);
            }
            cursor += step;
        }
        ticks
    }
}

/// Multi-scale time label: `%I %p` inside a day, `%a %d` / `%b %d` (Sundays)
/// inside a month, `%B` inside a year, `%Y` on year starts
pub fn format_time_tick(tick: NaiveDateTime) -> String {
    if tick.time() != NaiveTime::MIN {
        tick.format("%I %p").to_string()
    } else if tick.day() != 1 {
        if tick.weekday() == Weekday::Sun {
            tick.format("%b %d").to_string()
        } else {
            tick.format("%a %d").to_string()
        }
    } else if tick.month() != 1 {
        tick.format("%B").to_string()
    } else {
        tick.format("%Y").to_string()
    }
}

/// Linear price scale: `[d0, d1]` -> `[r0, r1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain is `[0, max(max(open, close))]`; rows where either price is NaN do
    /// not contribute to the max. With no usable price the domain collapses to `[0, 0]`.
    pub fn from_rows(rows: &[PriceRow], range: (f64, f64)) -> Result<Self, ChartError> {
        if rows.is_empty() {
            return Err(ChartError::EmptyDataset);
        }
        let max = rows
            .iter()
            .map(|row| {
                if row.open.is_nan() || row.close.is_nan() {
                    f64::NAN
                } else {
                    row.open.max(row.close)
                }
            })
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .unwrap_or(0.0);
        Ok(Self::new((0.0, max), range))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return interpolate(0.5, r0, r1);
        }
        interpolate((value - d0) / (d1 - d0), r0, r1)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        linear_ticks(d0.min(d1), d0.max(d1), count)
    }

    /// Fixed precision derived from the tick step, thousands grouped with commas
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let (d0, d1) = self.domain;
        let step = tick_step(d0.min(d1), d0.max(d1), count).abs();
        let precision = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        move |value| group_thousands(&format!("{:.*}", precision, value))
    }
}

/// Signed increment: positive means "multiply index", negative means "divide index"
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let inc = tick_increment(start, stop, count);
    if inc < 0.0 {
        -1.0 / inc
    } else {
        inc
    }
}

/// Evenly spaced "nice" values in `[start, stop]`, steps of 1, 2 or 5 times a power of ten
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let inc = tick_increment(start, stop, count);
    if !inc.is_finite() || inc == 0.0 {
        return Vec::new();
    }

    if inc > 0.0 {
        let mut i1 = (start / inc).round();
        let mut i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        (0..=((i2 - i1) as i64).max(-1))
            .map(|i| (i1 + i as f64) * inc)
            .collect()
    } else {
        let inv = -inc;
        let mut i1 = (start * inv).round();
        let mut i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        (0..=((i2 - i1) as i64).max(-1))
            .map(|i| (i1 + i as f64) / inv)
            .collect()
    }
}

fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(dot) => (&rest[..dot], &rest[dot..]),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}
