use crate::error::{AppError, Result};

pub const DB_PATH: &str = "Airline_MA.db";

pub const API_PORT: u16 = 8050;

/// Only revenue-based multiples produce enterprise-value ranges.
pub const REVENUE_MULTIPLE: &str = "revenue";

/// A comparison view needs at least this many companies to be meaningful.
pub const MIN_COMPARISON_COMPANIES: usize = 2;

/// Chart styling shared by the view-model builders.
pub mod chart_style {
    pub const PANEL_BACKGROUND: &str = "#f5f5f5";
    pub const SANKEY_NODE_PAD: u32 = 15;
    pub const SANKEY_NODE_THICKNESS: u32 = 20;
    pub const SANKEY_NODE_FILL: &str = "#f5f5f5";
    pub const SANKEY_NODE_OUTLINE: &str = "#E0E0E0";
    pub const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";
    pub const AVERAGE_LINE: &str = "black";
    pub const STD_LINE: &str = "grey";
    pub const CHART_HEIGHT: u32 = 400;
    /// Fixed x-axis of the football field chart ($ in millions).
    pub const VALUATION_AXIS_RANGE: [f64; 2] = [0.0, 8000.0];
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    /// Apply the bundled fact-store schema before loading (DB_INIT_SCHEMA).
    /// Only meant for seeding a local database.
    pub init_schema: bool,
    /// Preferred default company for the overview page (DEFAULT_COMPANY).
    /// Ignored when the company has no income statements.
    pub default_company: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| DB_PATH.to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| API_PORT.to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            init_schema: parse_flag(std::env::var("DB_INIT_SCHEMA").ok().as_deref())?,
            default_company: std::env::var("DEFAULT_COMPANY")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

fn parse_flag(raw: Option<&str>) -> Result<bool> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(other) => Err(AppError::Config(format!(
            "DB_INIT_SCHEMA must be true or false, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_accepts_common_spellings() {
        assert!(!parse_flag(None).unwrap());
        assert!(!parse_flag(Some("false")).unwrap());
        assert!(parse_flag(Some("TRUE")).unwrap());
        assert!(parse_flag(Some(" 1 ")).unwrap());
    }

    #[test]
    fn flag_rejects_garbage() {
        assert!(matches!(parse_flag(Some("maybe")), Err(AppError::Config(_))));
    }
}
