use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::ChartColors;
use crate::data::filter::MAX_OBSERVATIONS;
use crate::error::ChartError;
use crate::ui::anim::Ease;

/// Settings file looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "fossil-chart.json";

// ---------------------------------------------------------------------------
// Column mapping and row policy (shared with the loader)
// ---------------------------------------------------------------------------

/// Names of the source columns the chart reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub category: String,
    pub year: String,
    pub value: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            category: "country".into(),
            year: "year".into(),
            value: "fossil_fuel_consumption".into(),
        }
    }
}

/// What to do with a row whose year or value does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Drop the row and count it in the load log.
    #[default]
    Skip,
    /// Fail the whole load with `ChartError::MalformedField`.
    Reject,
}

/// Everything the loader needs to know besides the path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    pub columns: ColumnNames,
    pub malformed: MalformedPolicy,
}

// ---------------------------------------------------------------------------
// Chart geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: i8,
    pub right: i8,
    pub bottom: i8,
    pub left: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub line: String,
    pub marker: String,
    pub hover: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            line: "#000000".into(),
            marker: "#104e8b".into(),
            hover: "#7639e9".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChartConfig
// ---------------------------------------------------------------------------

/// User-tunable settings; every field falls back to its default when absent
/// from the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub data_path: PathBuf,
    pub columns: ColumnNames,
    pub malformed_rows: MalformedPolicy,
    pub default_category: String,
    pub max_observations: usize,
    pub year_domain: [i32; 2],
    pub canvas: Canvas,
    pub margin: Margin,
    pub transition_ms: u64,
    pub ease: Ease,
    pub tooltip_fade_ms: u64,
    pub unit_label: String,
    pub colors: ColorConfig,
    pub line_width: f32,
    pub marker_radius: f32,
    /// Radius of the hover-colour layer drawn over every marker.
    pub hover_radius: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("cleaned-owid-energy-data.csv"),
            columns: ColumnNames::default(),
            malformed_rows: MalformedPolicy::Skip,
            default_category: "Africa".into(),
            max_observations: MAX_OBSERVATIONS,
            year_domain: [1965, 2022],
            canvas: Canvas {
                width: 460.0,
                height: 400.0,
            },
            margin: Margin {
                top: 10,
                right: 30,
                bottom: 20,
                left: 40,
            },
            transition_ms: 1000,
            ease: Ease::InOutCubic,
            tooltip_fade_ms: 200,
            unit_label: "terawatt-hours".into(),
            colors: ColorConfig::default(),
            line_width: 2.0,
            marker_radius: 2.3,
            hover_radius: 2.5,
        }
    }
}

impl ChartConfig {
    /// Read `path` if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No {} found, using default settings", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: ChartConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.max_observations == 0 {
            return Err(ChartError::config("max_observations must be at least 1"));
        }
        let [first, last] = self.year_domain;
        if first >= last {
            return Err(ChartError::config(format!(
                "year_domain [{first}, {last}] is empty"
            )));
        }
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(ChartError::config("margins leave no drawing area"));
        }
        self.chart_colors()?;
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            columns: self.columns.clone(),
            malformed: self.malformed_rows,
        }
    }

    pub fn chart_colors(&self) -> Result<ChartColors, ChartError> {
        ChartColors::from_config(&self.colors)
    }

    /// Drawing-area width inside the margins.
    pub fn inner_width(&self) -> f32 {
        self.canvas.width - self.margin.left as f32 - self.margin.right as f32
    }

    /// Drawing-area height inside the margins.
    pub fn inner_height(&self) -> f32 {
        self.canvas.height - self.margin.top as f32 - self.margin.bottom as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_published_chart() {
        let cfg = ChartConfig::default();
        assert_eq!(cfg.max_observations, 38);
        assert_eq!(cfg.default_category, "Africa");
        assert_eq!(cfg.inner_width(), 390.0);
        assert_eq!(cfg.inner_height(), 370.0);
        assert_eq!(cfg.year_domain, [1965, 2022]);
        assert_eq!(cfg.hover_radius, 2.5);
        assert_eq!(
            cfg.chart_colors().map(|c| c.hover),
            Ok(eframe::egui::Color32::from_rgb(0x76, 0x39, 0xe9))
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: ChartConfig = serde_json::from_str(
            r#"{ "default_category": "Europe", "columns": { "value": "coal_consumption" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.default_category, "Europe");
        assert_eq!(cfg.columns.value, "coal_consumption");
        assert_eq!(cfg.columns.category, "country");
        assert_eq!(cfg.transition_ms, 1000);
    }

    #[test]
    fn policy_and_ease_parse_from_json() {
        let cfg: ChartConfig =
            serde_json::from_str(r#"{ "malformed_rows": "reject", "ease": "Linear" }"#).unwrap();
        assert_eq!(cfg.malformed_rows, MalformedPolicy::Reject);
        assert!(matches!(cfg.ease, Ease::Linear));
    }

    #[test]
    fn validation_rejects_nonsense() {
        let cfg = ChartConfig {
            max_observations: 0,
            ..ChartConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ChartConfig {
            year_domain: [2022, 1965],
            ..ChartConfig::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = ChartConfig::default();
        cfg.colors.line = "not-a-colour".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ChartConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg, ChartConfig::default());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "max_observations": 10 }"#).unwrap();
        let cfg = ChartConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg.max_observations, 10);
    }
}
