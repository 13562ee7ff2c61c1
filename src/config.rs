//! Runtime configuration read from the environment (after `.env` is loaded)

use std::path::PathBuf;

use crate::services::canvas::CanvasLayout;
use crate::services::loader::DataSource;
use crate::utils::errors::ConfigError;

pub const DEFAULT_SOURCE: &str = "data2.csv";
pub const DEFAULT_OUTPUT: &str = "linegraph.html";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: DataSource,
    pub output: PathBuf,
    pub png_output: Option<PathBuf>,
    pub layout: CanvasLayout,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; every key is optional
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = lookup("LINEGRAPH_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        let output = lookup("LINEGRAPH_OUTPUT").unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
        let png_output = lookup("LINEGRAPH_PNG_OUTPUT")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let defaults = CanvasLayout::default();
        let width = parse_dimension("LINEGRAPH_WIDTH", lookup("LINEGRAPH_WIDTH"), defaults.width)?;
        let height = parse_dimension("LINEGRAPH_HEIGHT", lookup("LINEGRAPH_HEIGHT"), defaults.height)?;

        let layout = CanvasLayout::new(width, height);
        if layout.inner_width() <= 0.0 || layout.inner_height() <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "LINEGRAPH_WIDTH/LINEGRAPH_HEIGHT",
                value: format!("{}x{}", width, height),
                reason: "canvas is smaller than its margins".to_string(),
            });
        }

        Ok(Self {
            source: DataSource::parse(&source),
            output: PathBuf::from(output),
            png_output,
            layout,
        })
    }
}

fn parse_dimension(key: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: u32 = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })?;
    Ok(f64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.source, DataSource::File(PathBuf::from("data2.csv")));
        assert_eq!(config.output, PathBuf::from("linegraph.html"));
        assert!(config.png_output.is_none());
        assert_eq!(config.layout, CanvasLayout::default());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LINEGRAPH_SOURCE", "https://example.com/prices.csv"),
            ("LINEGRAPH_PNG_OUTPUT", "chart.png"),
            ("LINEGRAPH_WIDTH", "1200"),
        ]))
        .unwrap();
        assert!(matches!(config.source, DataSource::Url(_)));
        assert_eq!(config.png_output, Some(PathBuf::from("chart.png")));
        assert_eq!(config.layout.width, 1200.0);
        assert_eq!(config.layout.height, 500.0);
    }

    #[test]
    fn test_invalid_dimension() {
        let err = AppConfig::from_lookup(lookup(&[("LINEGRAPH_HEIGHT", "tall")])).unwrap_err();
        assert!(err.to_string().contains("LINEGRAPH_HEIGHT"));

        assert!(AppConfig::from_lookup(lookup(&[("LINEGRAPH_WIDTH", "40")])).is_err());
    }
}
