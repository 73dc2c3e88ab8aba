//! # Constellation
//!
//! A star-schema query compiler. Tables, their relationships, calculated
//! fields and grouped views are declared in configuration; the crate turns
//! them into typed SQL for a database it never talks to directly.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            ConstellationConfig (TOML, serde)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Dimension / Fact / LookupTable, Fields, Filters      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [star + formula]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Star (joins, calculated fields), View (groups)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compose]
//! ┌─────────────────────────────────────────────────────────┐
//! │          sql::Query  ──►  QueryExecutor  ──►  rows        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`Constellation`] owns everything and keeps the foreign-key label
//! cache the display layer uses to render keys as text.

pub mod config;
pub mod constellation;
pub mod error;
pub mod formula;
pub mod model;
pub mod sql;
pub mod star;
pub mod value;

pub use config::{ConstellationConfig, Settings};
pub use constellation::{Constellation, Labels, QueryExecutor, Row, TypedRows};
pub use error::{Error, Result};
pub use model::{Dimension, Fact, Field, FieldInfo, FieldLike, Filter, LookupTable, Operator, Table};
pub use sql::{Dialect, Query};
pub use star::{CalculatedField, Star, View};
pub use value::{convert, format, FieldFormat, FieldType, RawValue, Value};
