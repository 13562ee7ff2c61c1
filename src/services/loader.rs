use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::models::{PriceRow, RawRow};
use crate::utils::errors::ChartError;

/// Fixed date layout of the source file, e.g. `1-May-12`
pub const DATE_FORMAT: &str = "%d-%b-%y";

const REQUIRED_COLUMNS: [&str; 3] = ["date", "close", "open"];

/// Where the CSV comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Classify a resource identifier by its scheme; anything that is not http(s) is a path
    pub fn parse(resource: &str) -> Self {
        let lower = resource.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(resource.to_string())
        } else {
            DataSource::File(PathBuf::from(resource))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Retrieve the CSV and parse it into typed rows, preserving file order
pub async fn load_rows(source: &DataSource) -> Result<Vec<PriceRow>, ChartError> {
    info!("📥 Loading price data from {}", source);

    let text = match source {
        DataSource::File(path) => tokio::fs::read_to_string(path).await?,
        DataSource::Url(url) => fetch_text(url).await?,
    };

    let rows = parse_csv(&text)?;
    info!("Parsed {} rows from {}", rows.len(), source);
    Ok(rows)
}

async fn fetch_text(url: &str) -> Result<String, ChartError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| ChartError::Fetch {
            url: url.to_string(),
            reason: format!("Request failed: {}", e),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ChartError::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    response.text().await.map_err(|e| ChartError::Fetch {
        url: url.to_string(),
        reason: format!("Failed to read body: {}", e),
    })
}

/// Parse CSV text with a `date,open,close` header (column order is free, extra columns ignored)
pub fn parse_csv(text: &str) -> Result<Vec<PriceRow>, ChartError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ChartError::Csv(format!(
                "Missing required column '{}' (found: {})",
                column,
                headers.iter().collect::<Vec<_>>().join(", ")
            )));
        }
    }

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<RawRow>().enumerate() {
        let raw = record?;
        rows.push(parse_row(&raw, index + 1)?);
    }

    debug!("CSV parse produced {} rows", rows.len());
    Ok(rows)
}

fn parse_row(raw: &RawRow, line: usize) -> Result<PriceRow, ChartError> {
    let date = parse_date(&raw.date).ok_or_else(|| ChartError::InvalidDate {
        line,
        value: raw.date.clone(),
    })?;

    Ok(PriceRow {
        date,
        open: coerce_price(&raw.open),
        close: coerce_price(&raw.close),
    })
}

/// Parse `day-Mon-yy`; two-digit years 69-99 land in 1969-1999, 00-68 in 2000-2068
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()?;
    // chrono's `%y` window is 1970-2069, one year later than the usual POSIX one
    if date.year() >= 2069 {
        return date.with_year(date.year() - 100);
    }
    Some(date)
}

/// Numeric coercion that never fails: empty or non-numeric text becomes NaN
pub fn coerce_price(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    // `inf`/`infinity` parse in Rust but are not prices
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "date,close,open\n1-May-12,58.13,3.41\n30-Apr-12,53.98,4.55\n27-Apr-12,67.00,6.78\n";

    #[test]
    fn test_parse_date_documented_format() {
        let date = parse_date("1-May-12").expect("date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(2012, 5, 1).unwrap());

        let date = parse_date("26-Mar-99").expect("date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(1999, 3, 26).unwrap());

        let date = parse_date("1-Jan-69").expect("date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(1969, 1, 1).unwrap());

        let date = parse_date("31-Dec-68").expect("date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(2068, 12, 31).unwrap());

        assert!(parse_date("2012-05-01").is_none());
    }

    #[test]
    fn test_coerce_price() {
        assert_eq!(coerce_price("123.45"), 123.45);
        assert_eq!(coerce_price(" 7 "), 7.0);
        assert!(coerce_price("").is_nan());
        assert!(coerce_price("abc").is_nan());
        assert!(coerce_price("inf").is_nan());
        assert!(coerce_price("-inf").is_nan());
        assert!(coerce_price("infinity").is_nan());
    }

    #[test]
    fn test_parse_preserves_count_and_order() {
        let rows = parse_csv(SAMPLE).expect("sample should parse");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2012, 5, 1).unwrap());
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2012, 4, 30).unwrap());
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2012, 4, 27).unwrap());
        assert_eq!(rows[0].close, 58.13);
        assert_eq!(rows[0].open, 3.41);
    }

    #[test]
    fn test_non_numeric_price_is_nan_not_error() {
        let rows = parse_csv("date,open,close\n1-May-12,,oops\n").expect("should parse");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].open.is_nan());
        assert!(rows[0].close.is_nan());
    }

    #[test]
    fn test_infinite_price_does_not_flatten_chart() {
        let rows = parse_csv("date,open,close\n1-May-12,10,12\n2-May-12,11,inf\n").expect("should parse");
        assert!(rows[1].close.is_nan());
        assert_eq!(rows[1].open, 11.0);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let rows = parse_csv("volume,date,open,close\n100,1-May-12,1.5,2.5\n").expect("should parse");
        assert_eq!(rows[0].open, 1.5);
        assert_eq!(rows[0].close, 2.5);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = parse_csv("date,close\n1-May-12,3.0\n").unwrap_err();
        assert!(matches!(err, ChartError::Csv(msg) if msg.contains("'open'")));
    }

    #[test]
    fn test_invalid_date_reports_line() {
        let err = parse_csv("date,open,close\n1-May-12,1,2\nyesterday,1,2\n").unwrap_err();
        match err {
            ChartError::InvalidDate { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let rows = parse_csv("date,close,open\n").expect("should parse");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/data2.csv"),
            DataSource::Url("https://example.com/data2.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data2.csv"),
            DataSource::File(PathBuf::from("data2.csv"))
        );
    }

    #[tokio::test]
    async fn test_load_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");

        let source = DataSource::File(file.path().to_path_buf());
        let rows = load_rows(&source).await.expect("load should succeed");
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_load_rows_missing_file_is_fatal() {
        let source = DataSource::File(PathBuf::from("/definitely/not/here.csv"));
        let err = load_rows(&source).await.unwrap_err();
        assert!(matches!(err, ChartError::Io(_)));
    }
}
