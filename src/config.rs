use std::path::PathBuf;

use crate::controller::state::Theme;

#[derive(Debug, Clone)]
pub struct Config {
    /// Dataset JSON; the embedded seed is used when unset.
    pub data_path: Option<PathBuf>,
    pub sqlite_path: String,
    pub out_dir: PathBuf,
    /// Ambient color scheme used when no theme has been stored yet.
    pub color_scheme: Theme,
    /// Bars shown in the score-reduction chart.
    pub top_n: usize,
    pub docs_copy: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_path: std::env::var("RISKBOARD_DATA").ok().filter(|v| !v.is_empty()).map(PathBuf::from),
            sqlite_path: std::env::var("RISKBOARD_SQLITE").unwrap_or_else(|_| "./riskboard.sqlite".to_string()),
            out_dir: PathBuf::from(std::env::var("RISKBOARD_OUT").unwrap_or_else(|_| "out/dashboard".to_string())),
            color_scheme: std::env::var("RISKBOARD_COLOR_SCHEME").ok().and_then(|v| Theme::parse(&v)).unwrap_or(Theme::Light),
            top_n: std::env::var("RISKBOARD_TOP_N").ok().and_then(|v| v.parse().ok()).unwrap_or(10),
            docs_copy: std::env::var("RISKBOARD_DOCS_COPY").ok().and_then(|v| v.parse().ok()).unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            sqlite_path: "./riskboard.sqlite".to_string(),
            out_dir: PathBuf::from("out/dashboard"),
            color_scheme: Theme::Light,
            top_n: 10,
            docs_copy: false,
        }
    }
}
