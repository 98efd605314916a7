use std::env;

use chrono::NaiveDate;

use crate::services::dialogue::DEFAULT_DATE_FORMAT;
use crate::services::extraction::render_date;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// strftime pattern for dates derived from "today"/"tomorrow".
    pub date_format: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env::var("PORT").ok(), env::var("DATE_FORMAT").ok())
    }

    fn from_vars(port: Option<String>, date_format: Option<String>) -> Self {
        Self {
            port: port.and_then(|v| v.parse().ok()).unwrap_or(3000),
            date_format: date_format
                .filter(|f| is_valid_date_format(f))
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

fn is_valid_date_format(fmt: &str) -> bool {
    if fmt.trim().is_empty() {
        return false;
    }
    // A pattern is usable only if it can render a plain calendar date.
    let valid = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| render_date(d, fmt))
        .is_some();
    if !valid {
        tracing::warn!(format = fmt, "invalid DATE_FORMAT, using default");
    }
    valid
}
