use crate::charts::Palette;
use crate::models::ViewMode;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Input dataset location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

/// Defaults for the rendered view
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub default_view_mode: ViewMode,

    #[serde(default = "default_organic_palette")]
    pub organic_palette: Palette,

    #[serde(default = "default_paid_palette")]
    pub paid_palette: Palette,

    #[serde(default)]
    pub show_raw_table: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_csv_path() -> PathBuf {
    PathBuf::from("data/youtube_channel_data.csv")
}
fn default_organic_palette() -> Palette {
    Palette::Green
}
fn default_paid_palette() -> Palette {
    Palette::Blue
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_view_mode: ViewMode::Daily,
            organic_palette: default_organic_palette(),
            paid_palette: default_paid_palette(),
            show_raw_table: false,
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("YTD").separator("__"))
            .build()?;

        let app_cfg = cfg.try_deserialize().unwrap_or_else(|e| {
            warn!("Invalid configuration ({}), using defaults", e);
            AppConfig::default()
        });
        Ok(app_cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[dashboard]\ndefault_view_mode = \"cumulative\"\npaid_palette = \"red\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.data.csv_path, PathBuf::from("data/youtube_channel_data.csv"));
        assert_eq!(cfg.dashboard.default_view_mode, ViewMode::Cumulative);
        assert_eq!(cfg.dashboard.organic_palette, Palette::Green);
        assert_eq!(cfg.dashboard.paid_palette, Palette::Red);
        assert!(!cfg.dashboard.show_raw_table);
    }

    #[test]
    fn test_unknown_palette_rejected() {
        let result = config::Config::builder()
            .add_source(config::File::from_str(
                "[dashboard]\norganic_palette = \"purple\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>();
        assert!(result.is_err());
    }
}
