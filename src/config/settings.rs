//! Compiler settings.
//!
//! Example:
//! ```toml
//! [settings]
//! dialect = "postgres"
//! display_rows = 500
//! ```

use serde::Deserialize;

use crate::sql::Dialect;

/// Row cap for tables that declare none.
pub const DEFAULT_DISPLAY_ROWS: u64 = 1000;

/// Settings shared by every table in a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQL dialect queries are rendered for.
    pub dialect: Dialect,

    /// Default LIMIT for composed stars and views.
    pub display_rows: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            display_rows: DEFAULT_DISPLAY_ROWS,
        }
    }
}
